//! Line and row parsing shared by the text readers.
//!
//! Text inputs are consumed in two phases. A `LineCursor` walks the
//! structural lines at the top of a file (skipped lines, titles, counts)
//! and then hands the remaining stream to a `RowReader`, which tokenizes
//! delimited data rows with the `csv` crate. `ColumnAccumulator` gathers
//! one field index across all rows into numeric columns.

use crate::error::{ReadError, Result};
use crate::table::Table;
use csv::StringRecord;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::warn;

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Open a regular file for reading, reporting any failure as `NotFound`
pub fn open_file(path: &Path) -> Result<File> {
    let not_found = |source| ReadError::NotFound {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(not_found)?;
    let metadata = file.metadata().map_err(not_found)?;
    if !metadata.is_file() {
        return Err(not_found(io::Error::new(
            io::ErrorKind::InvalidInput,
            "not a regular file",
        )));
    }

    Ok(file)
}

/// Sequential line reader that tracks absolute line numbers
pub struct LineCursor<R> {
    reader: R,
    path: PathBuf,
    lines_read: usize,
}

impl LineCursor<BufReader<File>> {
    pub fn open(path: &Path) -> Result<Self> {
        let file = open_file(path)?;
        Ok(Self::new(BufReader::new(file), path))
    }
}

impl<R: BufRead> LineCursor<R> {
    pub fn new(reader: R, path: &Path) -> Self {
        Self {
            reader,
            path: path.to_path_buf(),
            lines_read: 0,
        }
    }

    /// Number of lines consumed so far
    pub fn lines_read(&self) -> usize {
        self.lines_read
    }

    /// Discard `count` lines, failing if the file ends first
    pub fn skip(&mut self, count: usize) -> Result<()> {
        for index in 0..count {
            self.next_line(&format!("line {} of {} to skip", index + 1, count))?;
        }
        Ok(())
    }

    /// Read the next line without its line terminator.
    ///
    /// `expected` describes what the line should contain and is reported
    /// if the input has already ended.
    pub fn next_line(&mut self, expected: &str) -> Result<String> {
        self.try_next_line()?.ok_or_else(|| ReadError::EndOfInput {
            path: self.path.clone(),
            line: self.lines_read + 1,
            expected: expected.to_string(),
        })
    }

    /// Read the next line without its line terminator, or `None` at end of input.
    ///
    /// A UTF-8 byte order mark at the start of the file is dropped.
    pub fn try_next_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        let bytes = self.reader.read_line(&mut line).map_err(|err| {
            if err.kind() == io::ErrorKind::InvalidData {
                ReadError::Parse {
                    path: self.path.clone(),
                    line: self.lines_read + 1,
                    field: 0,
                    reason: "line is not valid UTF-8".to_string(),
                }
            } else {
                ReadError::Io(err)
            }
        })?;

        if bytes == 0 {
            return Ok(None);
        }

        self.lines_read += 1;
        let trimmed_len = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(trimmed_len);

        if self.lines_read == 1 && line.starts_with(BYTE_ORDER_MARK) {
            line.replace_range(..BYTE_ORDER_MARK.len_utf8(), "");
        }

        Ok(Some(line))
    }

    /// Hand the remainder of the input to a delimited row reader
    pub fn into_rows(self, delimiter: u8) -> RowReader<R> {
        RowReader {
            lines: self,
            record: StringRecord::new(),
            delimiter,
            collapse_whitespace: delimiter == b' ',
        }
    }
}

/// One tokenized data row
#[derive(Debug)]
pub struct Row<'a> {
    /// Absolute 1-based line number of the row
    pub line: usize,
    fields: Vec<&'a str>,
}

impl<'a> Row<'a> {
    pub fn fields(&self) -> &[&'a str] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Reader of delimited rows following the structural header lines.
///
/// Rows are read one line at a time so every row keeps its own line
/// number; a quoted field cannot span lines.
pub struct RowReader<R> {
    lines: LineCursor<R>,
    record: StringRecord,
    delimiter: u8,
    // Space-delimited files pad columns with runs of spaces
    collapse_whitespace: bool,
}

impl<R: BufRead> RowReader<R> {
    /// Read the next non-blank row, or `None` at end of input
    pub fn next_row(&mut self) -> Result<Option<Row<'_>>> {
        let line = loop {
            let Some(line) = self.lines.try_next_line()? else {
                return Ok(None);
            };

            let blank = if self.collapse_whitespace {
                line.trim().is_empty()
            } else {
                line.is_empty()
            };
            if !blank {
                break line;
            }
        };
        let line_number = self.lines.lines_read();

        let mut tokenizer = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(false)
            .flexible(true)
            .buffer_capacity(line.len() + 1)
            .from_reader(line.as_bytes());

        let has_record = tokenizer
            .read_record(&mut self.record)
            .map_err(|err| map_csv_error(&self.lines.path, line_number, err))?;
        if !has_record {
            self.record.clear();
        }

        let fields = if self.collapse_whitespace {
            self.record.iter().filter(|field| !field.is_empty()).collect()
        } else {
            self.record.iter().collect()
        };

        Ok(Some(Row {
            line: line_number,
            fields,
        }))
    }
}

fn map_csv_error(path: &Path, line: usize, err: csv::Error) -> ReadError {
    let reason = err.to_string();

    match err.into_kind() {
        csv::ErrorKind::Io(source) => ReadError::Io(source),
        _ => ReadError::Parse {
            path: path.to_path_buf(),
            line,
            field: 0,
            reason,
        },
    }
}

/// Parse one field as a floating point value
pub fn parse_value(path: &Path, line: usize, field: usize, raw: &str) -> Result<f64> {
    raw.trim().parse::<f64>().map_err(|_| ReadError::Parse {
        path: path.to_path_buf(),
        line,
        field,
        reason: format!("'{}' is not a number", raw),
    })
}

/// Column-major accumulation of numeric rows.
///
/// Every pushed row must carry at least as many fields as there are
/// columns; surplus fields are ignored. Create it once the titles have
/// been read so `width` is bounded by the file's contents.
pub struct ColumnAccumulator {
    path: PathBuf,
    columns: Vec<Vec<f64>>,
    rows_with_extra_fields: usize,
}

impl ColumnAccumulator {
    pub fn new(path: &Path, width: usize) -> Self {
        Self {
            path: path.to_path_buf(),
            columns: vec![Vec::new(); width],
            rows_with_extra_fields: 0,
        }
    }

    pub fn rows(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    pub fn push_row(&mut self, row: &Row<'_>) -> Result<()> {
        let width = self.columns.len();

        if row.len() < width {
            return Err(ReadError::Parse {
                path: self.path.clone(),
                line: row.line,
                field: row.len() + 1,
                reason: format!("row has {} fields, expected {}", row.len(), width),
            });
        }
        if row.len() > width {
            self.rows_with_extra_fields += 1;
        }

        // Parse the whole row before touching the columns so they stay equal length
        let values = row.fields()[..width]
            .iter()
            .enumerate()
            .map(|(index, raw)| parse_value(&self.path, row.line, index + 1, raw))
            .collect::<Result<Vec<f64>>>()?;

        for (column, value) in self.columns.iter_mut().zip(values) {
            column.push(value);
        }
        Ok(())
    }

    /// Pair the accumulated columns with their titles
    pub fn finish(self, titles: Vec<String>) -> Result<Table> {
        if titles.len() != self.columns.len() {
            return Err(ReadError::InvalidTable {
                reason: format!(
                    "{} titles given for {} columns",
                    titles.len(),
                    self.columns.len()
                ),
            });
        }

        if self.rows_with_extra_fields > 0 {
            warn!(
                "{}: ignored extra fields on {} rows beyond the {} declared columns",
                self.path.display(),
                self.rows_with_extra_fields,
                self.columns.len()
            );
        }

        let mut table = Table::with_capacity(titles.len());
        for (title, values) in titles.into_iter().zip(self.columns) {
            table.append_column(title, values)?;
        }
        Ok(table)
    }
}
