//! Reader and export configuration.
//!
//! Provides the option structures for each reader, the packed element
//! precision, file format detection by extension and the Parquet
//! compression settings used when exporting tables.

use crate::constants::{
    DEFAULT_DELIMITER, DELIMITED_TEXT_EXTENSIONS, DOUBLE_WIDTH, GRID_TEXT_EXTENSIONS,
    PACKED_BINARY_EXTENSIONS, SINGLE_WIDTH, TAB_DELIMITER,
};
use crate::error::{ReadError, Result};
use polars::prelude::ParquetCompression;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// Resolve the delimiter byte handed to the row tokenizer.
///
/// The tab flag wins over an explicit delimiter. Only single ASCII
/// characters can be used as delimiters.
pub fn resolve_delimiter(delimiter: char, use_tab: bool) -> Result<u8> {
    let delimiter = if use_tab { TAB_DELIMITER } else { delimiter };

    if !delimiter.is_ascii() || delimiter == '\n' || delimiter == '\r' || delimiter == '"' {
        return Err(ReadError::Configuration {
            message: format!("Unsupported delimiter {:?}", delimiter),
        });
    }

    Ok(delimiter as u8)
}

/// Options for the GSLIB-style grid text reader
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridTextOptions {
    /// Single character separating fields in data rows
    pub delimiter: char,

    /// Use a tab delimiter regardless of `delimiter`
    pub use_tab: bool,

    /// Number of leading lines ignored before the title line
    pub skip_lines: usize,
}

impl Default for GridTextOptions {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
            use_tab: false,
            skip_lines: 0,
        }
    }
}

impl GridTextOptions {
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_tab(mut self, use_tab: bool) -> Self {
        self.use_tab = use_tab;
        self
    }

    pub fn with_skip_lines(mut self, skip_lines: usize) -> Self {
        self.skip_lines = skip_lines;
        self
    }

    /// Check the options and return the effective delimiter byte
    pub fn validate(&self) -> Result<u8> {
        resolve_delimiter(self.delimiter, self.use_tab)
    }
}

/// Options for the generic delimited text reader
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelimitedTextOptions {
    /// Single character separating fields
    pub delimiter: char,

    /// Use a tab delimiter regardless of `delimiter`
    pub use_tab: bool,

    /// First retained line holds column titles rather than data
    pub has_titles: bool,

    /// Number of leading lines ignored
    pub skip_lines: usize,
}

impl Default for DelimitedTextOptions {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
            use_tab: false,
            has_titles: true,
            skip_lines: 0,
        }
    }
}

impl DelimitedTextOptions {
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_tab(mut self, use_tab: bool) -> Self {
        self.use_tab = use_tab;
        self
    }

    pub fn with_titles(mut self, has_titles: bool) -> Self {
        self.has_titles = has_titles;
        self
    }

    pub fn with_skip_lines(mut self, skip_lines: usize) -> Self {
        self.skip_lines = skip_lines;
        self
    }

    /// Check the options and return the effective delimiter byte
    pub fn validate(&self) -> Result<u8> {
        resolve_delimiter(self.delimiter, self.use_tab)
    }
}

/// Width of the values stored in a packed binary file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Precision {
    /// 4-byte IEEE float
    #[default]
    Single,
    /// 8-byte IEEE double
    Double,
}

impl Precision {
    pub fn from_double_flag(double: bool) -> Self {
        if double {
            Precision::Double
        } else {
            Precision::Single
        }
    }

    /// Size of one element in bytes
    pub fn element_width(&self) -> usize {
        match self {
            Precision::Single => SINGLE_WIDTH,
            Precision::Double => DOUBLE_WIDTH,
        }
    }
}

/// Options for the packed binary reader
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackedBinaryOptions {
    pub precision: Precision,

    /// Output column name; the file's base name is used when absent
    pub column_name: Option<String>,
}

impl PackedBinaryOptions {
    pub fn with_precision(mut self, precision: Precision) -> Self {
        self.precision = precision;
        self
    }

    pub fn with_column_name(mut self, name: impl Into<String>) -> Self {
        self.column_name = Some(name.into());
        self
    }

    /// Name for the output column, falling back to the base name of `path`
    pub fn resolve_column_name(&self, path: &Path) -> String {
        match self.column_name.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.to_string_lossy().into_owned()),
        }
    }
}

/// Input file formats understood by the readers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileFormat {
    GridText,
    PackedBinary,
    DelimitedText,
}

impl FileFormat {
    /// Detect the format from the file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = extension_of(path)?;

        if GRID_TEXT_EXTENSIONS.contains(&extension.as_str()) {
            Some(FileFormat::GridText)
        } else if PACKED_BINARY_EXTENSIONS.contains(&extension.as_str()) {
            Some(FileFormat::PackedBinary)
        } else if DELIMITED_TEXT_EXTENSIONS.contains(&extension.as_str()) {
            Some(FileFormat::DelimitedText)
        } else {
            None
        }
    }

    /// Delimiter conventionally used by files with this path's extension
    pub fn default_delimiter(path: &Path) -> char {
        match extension_of(path).as_deref() {
            Some("csv") => ',',
            Some("tsv") => TAB_DELIMITER,
            _ => DEFAULT_DELIMITER,
        }
    }

    /// Precision conventionally used by files with this path's extension
    pub fn default_precision(path: &Path) -> Precision {
        Precision::from_double_flag(extension_of(path).as_deref() == Some("dbl"))
    }
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

/// Output formats for exported tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Parquet,
    Csv,
}

impl OutputFormat {
    /// Pick the output format from the target extension, defaulting to Parquet
    pub fn from_path(path: &Path) -> Self {
        match extension_of(path).as_deref() {
            Some("csv") => OutputFormat::Csv,
            _ => OutputFormat::Parquet,
        }
    }
}

/// Supported compression algorithms for parquet files
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompressionAlgorithm {
    /// Snappy compression - good balance of speed and compression
    #[default]
    Snappy,
    /// ZSTD compression - better compression ratio, slower
    Zstd,
    /// LZ4 compression - fastest, lower compression ratio
    Lz4,
    /// No compression
    Uncompressed,
}

impl CompressionAlgorithm {
    /// Convert to polars ParquetCompression type
    pub fn to_polars_compression(&self) -> ParquetCompression {
        match self {
            CompressionAlgorithm::Snappy => ParquetCompression::Snappy,
            CompressionAlgorithm::Zstd => ParquetCompression::Zstd(None),
            CompressionAlgorithm::Lz4 => ParquetCompression::Lz4Raw,
            CompressionAlgorithm::Uncompressed => ParquetCompression::Uncompressed,
        }
    }
}

impl FromStr for CompressionAlgorithm {
    type Err = ReadError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "snappy" => Ok(CompressionAlgorithm::Snappy),
            "zstd" => Ok(CompressionAlgorithm::Zstd),
            "lz4" => Ok(CompressionAlgorithm::Lz4),
            "none" | "uncompressed" => Ok(CompressionAlgorithm::Uncompressed),
            other => Err(ReadError::Configuration {
                message: format!(
                    "Unknown compression '{}' (expected snappy, zstd, lz4 or none)",
                    other
                ),
            }),
        }
    }
}

/// Settings for exporting a table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportOptions {
    /// Explicit output format; detected from the output path when absent
    pub format: Option<OutputFormat>,
    pub compression: CompressionAlgorithm,
}

impl ExportOptions {
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn with_compression(mut self, compression: CompressionAlgorithm) -> Self {
        self.compression = compression;
        self
    }

    pub fn resolve_format(&self, path: &Path) -> OutputFormat {
        self.format.unwrap_or_else(|| OutputFormat::from_path(path))
    }
}
