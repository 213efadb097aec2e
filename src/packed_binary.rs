//! Packed big-endian binary arrays.
//!
//! A packed file is nothing but consecutive big-endian IEEE values of one
//! width. The whole file becomes a single column; reshaping is left to the
//! consumer.

use crate::config::{PackedBinaryOptions, Precision};
use crate::error::{Location, ReadError, Result};
use crate::parsing::open_file;
use crate::table::Table;
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;
use tracing::debug;

/// Read a packed binary file into a one-column table
pub fn read_packed_binary(path: &Path, options: &PackedBinaryOptions) -> Result<Table> {
    let width = options.precision.element_width();

    let mut file = open_file(path)?;
    let size = file
        .metadata()
        .map_err(|source| ReadError::NotFound {
            path: path.to_path_buf(),
            source,
        })?
        .len();

    let remainder = size % width as u64;
    if remainder != 0 {
        return Err(ReadError::Format {
            path: path.to_path_buf(),
            location: Location::ByteOffset(size - remainder),
            reason: format!(
                "file size {} is not a multiple of the {}-byte element width ({} trailing bytes)",
                size, width, remainder
            ),
        });
    }

    let mut bytes = Vec::with_capacity(size as usize);
    file.read_to_end(&mut bytes)?;

    // The file may have changed between the size check and the read
    if bytes.len() % width != 0 {
        let remainder = bytes.len() % width;
        return Err(ReadError::Format {
            path: path.to_path_buf(),
            location: Location::ByteOffset((bytes.len() - remainder) as u64),
            reason: format!("truncated trailing element of {} bytes", remainder),
        });
    }

    let values = decode_big_endian(&bytes, options.precision);
    let name = options.resolve_column_name(path);

    debug!(
        "Decoded {} {:?} values from {} into column '{}'",
        values.len(),
        options.precision,
        path.display(),
        name
    );

    let mut table = Table::with_capacity(1);
    table.append_column(name, values)?;
    Ok(table)
}

/// Decode whole big-endian elements, widening singles to `f64`
fn decode_big_endian(bytes: &[u8], precision: Precision) -> Vec<f64> {
    match precision {
        Precision::Single => bytes
            .chunks_exact(4)
            .map(|chunk| {
                let mut buf = [0u8; 4];
                buf.copy_from_slice(chunk);
                f32::from_be_bytes(buf) as f64
            })
            .collect(),
        Precision::Double => bytes
            .chunks_exact(8)
            .map(|chunk| {
                let mut buf = [0u8; 8];
                buf.copy_from_slice(chunk);
                f64::from_be_bytes(buf)
            })
            .collect(),
    }
}

/// Write values as a packed big-endian binary file.
///
/// Single precision narrows each value to `f32`.
pub fn write_packed_binary(path: &Path, values: &[f64], precision: Precision) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    for value in values {
        match precision {
            Precision::Single => writer.write_all(&(*value as f32).to_be_bytes())?,
            Precision::Double => writer.write_all(&value.to_be_bytes())?,
        }
    }

    writer.flush()?;
    Ok(())
}
