//! Application constants for scitable
//!
//! Default values, synthesized names and file extension mappings shared
//! by the readers, the writers and the command line.

// =============================================================================
// Text Formats
// =============================================================================

/// Delimiter used when none is given (GSLIB files are space separated)
pub const DEFAULT_DELIMITER: char = ' ';

/// Delimiter selected by the tab flag
pub const TAB_DELIMITER: char = '\t';

/// Prefix of column titles synthesized when a file has no title row
pub const SYNTHESIZED_TITLE_PREFIX: &str = "Field";

// =============================================================================
// Packed Binary Format
// =============================================================================

/// Width in bytes of a single-precision element
pub const SINGLE_WIDTH: usize = 4;

/// Width in bytes of a double-precision element
pub const DOUBLE_WIDTH: usize = 8;

// =============================================================================
// File Extensions
// =============================================================================

/// Extensions recognised as GSLIB-style grid text
pub const GRID_TEXT_EXTENSIONS: &[&str] = &["gslib", "sgems", "geoeas"];

/// Extensions recognised as packed binary
pub const PACKED_BINARY_EXTENSIONS: &[&str] = &["bin", "raw", "flt", "dbl", "pck"];

/// Extensions recognised as generic delimited text
pub const DELIMITED_TEXT_EXTENSIONS: &[&str] = &["csv", "tsv", "txt", "dat"];

// =============================================================================
// Command Line
// =============================================================================

/// Rows shown by the summary preview when no output path is given
pub const DEFAULT_PREVIEW_ROWS: usize = 10;
