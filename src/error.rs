//! Error handling for table reading operations.
//!
//! Every reader failure surfaces immediately to the caller with the path
//! involved and, where one exists, the line number or byte offset at which
//! the file stopped matching its format.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Position within an input file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    /// 1-based line number in a text file
    Line(usize),
    /// 0-based byte offset in a binary file
    ByteOffset(u64),
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Line(line) => write!(f, "line {}", line),
            Location::ByteOffset(offset) => write!(f, "byte offset {}", offset),
        }
    }
}

#[derive(Error, Debug)]
pub enum ReadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("File not found or unreadable: {path}")]
    NotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unexpected end of input in {path} at line {line}: expected {expected}")]
    EndOfInput {
        path: PathBuf,
        line: usize,
        expected: String,
    },

    #[error("Invalid format in {path} at {location}: {reason}")]
    Format {
        path: PathBuf,
        location: Location,
        reason: String,
    },

    #[error("Parse error in {path} at line {line}, field {field}: {reason}")]
    Parse {
        path: PathBuf,
        line: usize,
        field: usize,
        reason: String,
    },

    #[error("Invalid table: {reason}")]
    InvalidTable { reason: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl ReadError {
    /// Line or byte position the error refers to, if any
    pub fn location(&self) -> Option<Location> {
        match self {
            ReadError::EndOfInput { line, .. } | ReadError::Parse { line, .. } => {
                Some(Location::Line(*line))
            }
            ReadError::Format { location, .. } => Some(*location),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ReadError>;
