//! GSLIB-style grid text reading and writing.
//!
//! Layout of a grid text file after any skipped lines:
//!
//! ```text
//! <title line>
//! <N>
//! <title_0>
//! ...
//! <title_{N-1}>
//! <data rows, N delimiter-separated fields each>
//! ```
//!
//! The title line is returned as a [`GridHeader`] next to the table.

use crate::config::{GridTextOptions, resolve_delimiter};
use crate::error::{Location, ReadError, Result};
use crate::header::GridHeader;
use crate::parsing::{ColumnAccumulator, LineCursor};
use crate::table::Table;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// Read a grid text file into a table plus its title metadata
pub fn read_grid_text(path: &Path, options: &GridTextOptions) -> Result<(Table, GridHeader)> {
    let delimiter = options.validate()?;
    let mut lines = LineCursor::open(path)?;

    lines.skip(options.skip_lines)?;

    let header = GridHeader::parse(lines.next_line("title line")?);

    let count_line = lines.next_line("column count")?;
    let column_count = count_line
        .trim()
        .parse::<usize>()
        .map_err(|_| ReadError::Format {
            path: path.to_path_buf(),
            location: Location::Line(lines.lines_read()),
            reason: format!("column count '{}' is not a non-negative integer", count_line),
        })?;

    // The declared count is untrusted; titles grow with the lines actually present
    let mut titles = Vec::new();
    for index in 0..column_count {
        titles.push(lines.next_line(&format!("title {} of {}", index + 1, column_count))?);
    }

    debug!(
        "Reading {} columns from {} after {} header lines",
        column_count,
        path.display(),
        lines.lines_read()
    );

    let mut rows = lines.into_rows(delimiter);
    let mut columns = ColumnAccumulator::new(path, titles.len());
    while let Some(row) = rows.next_row()? {
        columns.push_row(&row)?;
    }

    let rows_read = columns.rows();
    let table = columns.finish(titles)?;

    debug!(
        "Read {} rows x {} columns from {}",
        rows_read,
        table.num_columns(),
        path.display()
    );

    Ok((table, header))
}

/// Write a table in grid text layout.
///
/// Values use the shortest representation that parses back to the same
/// `f64`, so reading the file again reproduces the table exactly.
pub fn write_grid_text(path: &Path, title: &str, table: &Table, delimiter: char) -> Result<()> {
    let delimiter = resolve_delimiter(delimiter, false)? as char;

    if title.contains(['\n', '\r']) {
        return Err(ReadError::Configuration {
            message: "Grid title must fit on a single line".to_string(),
        });
    }

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "{}", title)?;
    writeln!(writer, "{}", table.num_columns())?;
    for column in table {
        writeln!(writer, "{}", column.name())?;
    }

    let separator = delimiter.to_string();
    for row in 0..table.num_rows() {
        let fields = table
            .iter()
            .map(|column| column.values()[row].to_string())
            .collect::<Vec<_>>();
        writeln!(writer, "{}", fields.join(&separator))?;
    }

    writer.flush()?;
    debug!(
        "Wrote {} rows x {} columns to {}",
        table.num_rows(),
        table.num_columns(),
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn grid_file(contents: &str) -> NamedTempFile {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", contents).unwrap();
        temp_file.flush().unwrap();
        temp_file
    }

    #[test]
    fn test_read_demo_grid() {
        let temp_file = grid_file("Demo\n2\nX\nY\n1 2\n3 4\n");

        let (table, header) =
            read_grid_text(temp_file.path(), &GridTextOptions::default()).unwrap();

        assert_eq!(header.title, "Demo");
        assert_eq!(header.dimensions, None);
        assert_eq!(table.column_names(), vec!["X", "Y"]);
        assert_eq!(table.column("X").unwrap().values(), &[1.0, 3.0]);
        assert_eq!(table.column("Y").unwrap().values(), &[2.0, 4.0]);
    }

    #[test]
    fn test_skip_lines_and_tab_delimiter() {
        let temp_file = grid_file(
            "# exported by survey tool\n# second comment\nWells 2 1 1\n2\nporosity\npermeability\n0.25\t120.5\n0.31\t98\n",
        );
        let options = GridTextOptions::default()
            .with_skip_lines(2)
            .with_delimiter(',')
            .with_tab(true);

        let (table, header) = read_grid_text(temp_file.path(), &options).unwrap();

        assert_eq!(header.title, "Wells 2 1 1");
        assert_eq!(header.dimensions.and_then(|d| d.cell_count()), Some(2));
        assert_eq!(table.column("porosity").unwrap().values(), &[0.25, 0.31]);
        assert_eq!(
            table.column("permeability").unwrap().values(),
            &[120.5, 98.0]
        );
    }

    #[test]
    fn test_empty_data_section() {
        let temp_file = grid_file("Empty\n3\na\nb\nc\n");

        let (table, _) = read_grid_text(temp_file.path(), &GridTextOptions::default()).unwrap();

        assert_eq!(table.num_columns(), 3);
        assert!(table.iter().all(|column| column.is_empty()));
    }

    #[test]
    fn test_padded_rows_and_crlf() {
        let temp_file = grid_file("Padded\r\n2\r\nA\r\nB\r\n   1.0    2.0\r\n  -3.5   4e2\r\n");

        let (table, header) =
            read_grid_text(temp_file.path(), &GridTextOptions::default()).unwrap();

        assert_eq!(header.title, "Padded");
        assert_eq!(table.column_names(), vec!["A", "B"]);
        assert_eq!(table.column("A").unwrap().values(), &[1.0, -3.5]);
        assert_eq!(table.column("B").unwrap().values(), &[2.0, 400.0]);
    }

    #[test]
    fn test_invalid_column_count() {
        let temp_file = grid_file("Demo\ntwo\nX\nY\n");

        let result = read_grid_text(temp_file.path(), &GridTextOptions::default());

        match result {
            Err(ReadError::Format { location, .. }) => assert_eq!(location, Location::Line(2)),
            other => panic!("Expected Format error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_titles() {
        let temp_file = grid_file("Demo\n3\nX\nY\n");

        let result = read_grid_text(temp_file.path(), &GridTextOptions::default());

        match result {
            Err(ReadError::EndOfInput { line, expected, .. }) => {
                assert_eq!(line, 5);
                assert!(expected.contains("title 3"));
            }
            other => panic!("Expected EndOfInput error, got {:?}", other),
        }
    }

    #[test]
    fn test_huge_column_count_fails_at_end_of_titles() {
        let temp_file = grid_file("Demo\n18446744073709551615\nX\n");

        let result = read_grid_text(temp_file.path(), &GridTextOptions::default());

        match result {
            Err(ReadError::EndOfInput { line, expected, .. }) => {
                assert_eq!(line, 4);
                assert!(expected.contains("title 2"));
            }
            other => panic!("Expected EndOfInput error, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_lines_keep_row_line_numbers() {
        let temp_file = grid_file("Demo\n2\nX\nY\n1 2\n\n\n3\n");

        let result = read_grid_text(temp_file.path(), &GridTextOptions::default());

        match result {
            Err(ReadError::Parse { line, .. }) => assert_eq!(line, 8),
            other => panic!("Expected Parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_byte_order_mark_not_part_of_title() {
        let temp_file = grid_file("\u{feff}Demo 2 1 1\n1\nX\n1\n2\n");

        let (table, header) =
            read_grid_text(temp_file.path(), &GridTextOptions::default()).unwrap();

        assert_eq!(header.title, "Demo 2 1 1");
        assert_eq!(table.column("X").unwrap().values(), &[1.0, 2.0]);
    }

    #[test]
    fn test_directory_is_not_found() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let result = read_grid_text(temp_dir.path(), &GridTextOptions::default());
        assert!(matches!(result, Err(ReadError::NotFound { .. })));
    }

    #[test]
    fn test_skip_beyond_end() {
        let temp_file = grid_file("Demo\n");
        let options = GridTextOptions::default().with_skip_lines(4);

        let result = read_grid_text(temp_file.path(), &options);

        assert!(matches!(result, Err(ReadError::EndOfInput { .. })));
    }

    #[test]
    fn test_ragged_row() {
        let temp_file = grid_file("Demo\n2\nX\nY\n1 2\n3\n");

        let result = read_grid_text(temp_file.path(), &GridTextOptions::default());

        match result {
            Err(ReadError::Parse { line, .. }) => assert_eq!(line, 6),
            other => panic!("Expected Parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_non_numeric_value() {
        let temp_file = grid_file("Demo\n2\nX\nY\n1 2\n3 n/a\n");

        let result = read_grid_text(temp_file.path(), &GridTextOptions::default());

        match result {
            Err(ReadError::Parse { line, field, .. }) => {
                assert_eq!(line, 6);
                assert_eq!(field, 2);
            }
            other => panic!("Expected Parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_file() {
        let result = read_grid_text(
            Path::new("/nonexistent/grid.gslib"),
            &GridTextOptions::default(),
        );
        assert!(matches!(result, Err(ReadError::NotFound { .. })));
    }

    #[test]
    fn test_write_then_read() {
        let mut table = Table::new();
        table.append_column("X", vec![0.1, 1e-7, -2.5]).unwrap();
        table.append_column("Y", vec![1.0 / 3.0, 42.0, 6.02e23]).unwrap();

        let temp_file = NamedTempFile::new().unwrap();
        write_grid_text(temp_file.path(), "Round trip 3 1 1", &table, ' ').unwrap();

        let (read_back, header) =
            read_grid_text(temp_file.path(), &GridTextOptions::default()).unwrap();

        assert_eq!(header.title, "Round trip 3 1 1");
        assert_eq!(read_back, table);
    }

    #[test]
    fn test_write_rejects_multiline_title() {
        let temp_file = NamedTempFile::new().unwrap();
        let result = write_grid_text(temp_file.path(), "a\nb", &Table::new(), ' ');
        assert!(matches!(result, Err(ReadError::Configuration { .. })));
    }
}
