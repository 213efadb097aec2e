//! Scientific table readers
//!
//! Converts three simple scientific file formats into numeric column
//! tables for downstream visualization and analysis:
//! - GSLIB-style grid text with a title line, a column count and one title per column
//! - Packed big-endian binary arrays of 4- or 8-byte floating point values
//! - Generic delimited text with or without a title row
//!
//! Every reader performs a single pass over one file and returns a freshly
//! built [`Table`]; malformed input aborts the read with a [`ReadError`]
//! that names the offending line or byte offset.

pub mod cli;
pub mod config;
pub mod constants;
pub mod delimited_text;
pub mod error;
pub mod grid_text;
pub mod header;
pub mod packed_binary;
pub mod parsing;
pub mod table;
pub mod writer;

pub use config::{
    CompressionAlgorithm, DelimitedTextOptions, ExportOptions, FileFormat, GridTextOptions,
    OutputFormat, PackedBinaryOptions, Precision,
};
pub use delimited_text::read_delimited_text;
pub use error::{Location, ReadError, Result};
pub use grid_text::{read_grid_text, write_grid_text};
pub use header::{GridDimensions, GridHeader};
pub use packed_binary::{read_packed_binary, write_packed_binary};
pub use table::{Column, Table};
pub use writer::export_table;
