//! Command-line interface components.

use crate::config::{
    CompressionAlgorithm, DelimitedTextOptions, ExportOptions, FileFormat, GridTextOptions,
    PackedBinaryOptions, Precision,
};
use crate::constants::{DEFAULT_DELIMITER, DEFAULT_PREVIEW_ROWS};
use crate::delimited_text::read_delimited_text;
use crate::grid_text::read_grid_text;
use crate::header::GridHeader;
use crate::packed_binary::read_packed_binary;
use crate::table::Table;
use crate::writer::export_table;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(name = "scitable")]
#[command(about = "Read GSLIB grid text, packed binary and delimited text files into numeric tables")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Export the table to this path (.parquet or .csv) instead of printing a preview
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    /// Parquet compression algorithm (snappy, zstd, lz4, none)
    #[arg(long, global = true, default_value = "snappy")]
    pub compression: String,

    /// Number of rows shown in the preview
    #[arg(long, global = true, default_value_t = DEFAULT_PREVIEW_ROWS)]
    pub preview: usize,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Args {
    fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "warn"
        } else {
            "info"
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Read a GSLIB-style grid text file
    Grid(GridArgs),
    /// Read a packed big-endian binary file
    Binary(BinaryArgs),
    /// Read a generic delimited text file
    Delimited(DelimitedArgs),
    /// Read any supported file, choosing the reader from its extension
    Read(ReadArgs),
}

#[derive(clap::Args, Debug)]
pub struct GridArgs {
    pub path: PathBuf,

    /// Field delimiter for data rows
    #[arg(short, long, default_value_t = DEFAULT_DELIMITER)]
    pub delimiter: char,

    /// Use a tab delimiter
    #[arg(long)]
    pub tab: bool,

    /// Leading lines to ignore
    #[arg(long, default_value_t = 0)]
    pub skip: usize,
}

impl GridArgs {
    pub fn to_options(&self) -> GridTextOptions {
        GridTextOptions::default()
            .with_delimiter(self.delimiter)
            .with_tab(self.tab)
            .with_skip_lines(self.skip)
    }
}

#[derive(clap::Args, Debug)]
pub struct BinaryArgs {
    pub path: PathBuf,

    /// Values are 8-byte doubles instead of 4-byte floats
    #[arg(long)]
    pub double: bool,

    /// Column name (defaults to the file name)
    #[arg(long)]
    pub name: Option<String>,
}

impl BinaryArgs {
    pub fn to_options(&self) -> PackedBinaryOptions {
        PackedBinaryOptions {
            precision: Precision::from_double_flag(self.double),
            column_name: self.name.clone(),
        }
    }
}

#[derive(clap::Args, Debug)]
pub struct DelimitedArgs {
    pub path: PathBuf,

    /// Field delimiter
    #[arg(short, long, default_value_t = DEFAULT_DELIMITER)]
    pub delimiter: char,

    /// Use a tab delimiter
    #[arg(long)]
    pub tab: bool,

    /// The first row is data; columns are named Field0, Field1, ...
    #[arg(long)]
    pub no_titles: bool,

    /// Leading lines to ignore
    #[arg(long, default_value_t = 0)]
    pub skip: usize,
}

impl DelimitedArgs {
    pub fn to_options(&self) -> DelimitedTextOptions {
        DelimitedTextOptions::default()
            .with_delimiter(self.delimiter)
            .with_tab(self.tab)
            .with_titles(!self.no_titles)
            .with_skip_lines(self.skip)
    }
}

#[derive(clap::Args, Debug)]
pub struct ReadArgs {
    pub path: PathBuf,
}

/// Run the selected command
pub fn run(args: Args) -> Result<()> {
    setup_logging(&args)?;

    let compression: CompressionAlgorithm = args.compression.parse()?;
    let (table, header) = load_table(&args.command)?;

    if let Some(header) = &header {
        println!("{} {}", "Title:".bright_cyan(), header.title);
        if let Some(dims) = header.dimensions {
            println!(
                "{} {} x {} x {}",
                "Grid:".bright_cyan(),
                dims.nx,
                dims.ny,
                dims.nz
            );
        }
    }

    match &args.output {
        Some(output_path) => {
            let options = ExportOptions::default().with_compression(compression);
            let rows = export_table(&table, output_path, &options)
                .with_context(|| format!("Failed to export to {}", output_path.display()))?;
            println!(
                "{} {} rows x {} columns to {}",
                "Wrote".bright_green(),
                rows.to_string().bright_white().bold(),
                table.num_columns().to_string().bright_white().bold(),
                output_path.display()
            );
        }
        None => print_summary(&table, args.preview)?,
    }

    Ok(())
}

/// Dispatch to the reader selected by the command
pub fn load_table(command: &Commands) -> Result<(Table, Option<GridHeader>)> {
    match command {
        Commands::Grid(grid) => {
            let (table, header) = read_grid_text(&grid.path, &grid.to_options())?;
            Ok((table, Some(header)))
        }
        Commands::Binary(binary) => Ok((read_packed_binary(&binary.path, &binary.to_options())?, None)),
        Commands::Delimited(delimited) => Ok((
            read_delimited_text(&delimited.path, &delimited.to_options())?,
            None,
        )),
        Commands::Read(read) => {
            let path = &read.path;
            let format = FileFormat::from_path(path).with_context(|| {
                format!(
                    "Cannot tell the format of {} from its extension",
                    path.display()
                )
            })?;
            debug!("Detected {:?} for {}", format, path.display());

            match format {
                FileFormat::GridText => {
                    let options =
                        GridTextOptions::default().with_delimiter(FileFormat::default_delimiter(path));
                    let (table, header) = read_grid_text(path, &options)?;
                    Ok((table, Some(header)))
                }
                FileFormat::PackedBinary => {
                    let options = PackedBinaryOptions::default()
                        .with_precision(FileFormat::default_precision(path));
                    Ok((read_packed_binary(path, &options)?, None))
                }
                FileFormat::DelimitedText => {
                    let options = DelimitedTextOptions::default()
                        .with_delimiter(FileFormat::default_delimiter(path));
                    Ok((read_delimited_text(path, &options)?, None))
                }
            }
        }
    }
}

/// Print column ranges and the first rows of the table
fn print_summary(table: &Table, preview_rows: usize) -> Result<()> {
    println!(
        "{} {} rows x {} columns",
        "Table:".bright_cyan(),
        table.num_rows().to_string().bright_white().bold(),
        table.num_columns().to_string().bright_white().bold()
    );

    for column in table {
        let (min, max) = column
            .values()
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), value| {
                (min.min(*value), max.max(*value))
            });
        if column.is_empty() {
            println!("  {} (empty)", column.name().bright_yellow());
        } else {
            println!("  {} [{}, {}]", column.name().bright_yellow(), min, max);
        }
    }

    if preview_rows > 0 && !table.is_empty() {
        let df = table.to_dataframe()?;
        println!("\n{}", df.head(Some(preview_rows)));
    }

    Ok(())
}

/// Set up structured logging based on CLI arguments
fn setup_logging(args: &Args) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("scitable={}", log_level)));

    if args.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    }

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}
