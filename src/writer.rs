//! Export of tables through polars.
//!
//! Converts a [`Table`] into a DataFrame and writes it as Parquet or CSV
//! for downstream analysis tools.

use crate::config::{ExportOptions, OutputFormat};
use crate::error::Result;
use crate::table::Table;
use polars::prelude::{CsvWriter, ParquetWriter, SerWriter};
use std::fs::{self, File};
use std::path::Path;
use tracing::{debug, info};

/// Write `table` to `output_path`, returning the number of rows written
pub fn export_table(table: &Table, output_path: &Path, options: &ExportOptions) -> Result<usize> {
    let mut df = table.to_dataframe()?;
    let format = options.resolve_format(output_path);

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let file = File::create(output_path)?;

    match format {
        OutputFormat::Parquet => {
            debug!(
                "Writing parquet with {:?} compression to {}",
                options.compression,
                output_path.display()
            );
            ParquetWriter::new(file)
                .with_compression(options.compression.to_polars_compression())
                .finish(&mut df)?;
        }
        OutputFormat::Csv => {
            debug!("Writing CSV to {}", output_path.display());
            CsvWriter::new(file).include_header(true).finish(&mut df)?;
        }
    }

    info!(
        "Exported {} rows x {} columns to {}",
        df.height(),
        df.width(),
        output_path.display()
    );
    Ok(df.height())
}
