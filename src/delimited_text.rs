//! Generic delimited text reading.
//!
//! After the skipped lines, the first row either names the columns or,
//! when the file has no title row, is the first data row and fixes the
//! column count. Synthesized titles are `Field0`, `Field1`, ...

use crate::config::DelimitedTextOptions;
use crate::constants::SYNTHESIZED_TITLE_PREFIX;
use crate::error::{ReadError, Result};
use crate::parsing::{ColumnAccumulator, LineCursor};
use crate::table::Table;
use std::path::Path;
use tracing::debug;

pub fn read_delimited_text(path: &Path, options: &DelimitedTextOptions) -> Result<Table> {
    let delimiter = options.validate()?;
    let mut lines = LineCursor::open(path)?;

    lines.skip(options.skip_lines)?;
    let first_line = lines.lines_read() + 1;
    let mut rows = lines.into_rows(delimiter);

    let expected = if options.has_titles {
        "title row"
    } else {
        "first data row"
    };
    let missing_first_row = || ReadError::EndOfInput {
        path: path.to_path_buf(),
        line: first_line,
        expected: expected.to_string(),
    };

    let (titles, mut columns) = if options.has_titles {
        let row = rows.next_row()?.ok_or_else(missing_first_row)?;
        let titles = row
            .fields()
            .iter()
            .map(|title| title.to_string())
            .collect::<Vec<_>>();
        let columns = ColumnAccumulator::new(path, titles.len());
        (titles, columns)
    } else {
        let row = rows.next_row()?.ok_or_else(missing_first_row)?;
        let titles = synthesized_titles(row.len());
        let mut columns = ColumnAccumulator::new(path, titles.len());
        columns.push_row(&row)?;
        (titles, columns)
    };

    debug!(
        "Reading {} columns from {} (titles from file: {})",
        titles.len(),
        path.display(),
        options.has_titles
    );

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

    Ok(table)
}

/// Titles `Field0` .. `Field{count-1}`
fn synthesized_titles(count: usize) -> Vec<String> {
    (0..count)
        .map(|index| format!("{}{}", SYNTHESIZED_TITLE_PREFIX, index))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn text_file(contents: &str) -> NamedTempFile {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", contents).unwrap();
        temp_file.flush().unwrap();
        temp_file
    }

    #[test]
    fn test_titles_from_first_row() {
        let temp_file = text_file("depth,temp\n10,4.5\n20,3.25\n");
        let options = DelimitedTextOptions::default().with_delimiter(',');

        let table = read_delimited_text(temp_file.path(), &options).unwrap();

        assert_eq!(table.column_names(), vec!["depth", "temp"]);
        assert_eq!(table.column("depth").unwrap().values(), &[10.0, 20.0]);
        assert_eq!(table.column("temp").unwrap().values(), &[4.5, 3.25]);
    }

    #[test]
    fn test_byte_order_mark_not_part_of_first_title() {
        let temp_file = text_file("\u{feff}depth,temp\n10,4.5\n");
        let options = DelimitedTextOptions::default().with_delimiter(',');

        let table = read_delimited_text(temp_file.path(), &options).unwrap();

        assert_eq!(table.column_names(), vec!["depth", "temp"]);
        assert_eq!(table.column("depth").unwrap().values(), &[10.0]);
    }

    #[test]
    fn test_first_row_is_data_without_titles() {
        let temp_file = text_file("1 2 3\n4 5 6\n");
        let options = DelimitedTextOptions::default().with_titles(false);

        let table = read_delimited_text(temp_file.path(), &options).unwrap();

        assert_eq!(table.column_names(), vec!["Field0", "Field1", "Field2"]);
        assert_eq!(table.column("Field0").unwrap().values(), &[1.0, 4.0]);
        assert_eq!(table.column("Field2").unwrap().values(), &[3.0, 6.0]);
    }

    #[test]
    fn test_skip_lines_before_titles() {
        let temp_file = text_file("exported 2024-01-01\nunits: m, C\na\tb\n1\t2\n");
        let options = DelimitedTextOptions::default()
            .with_skip_lines(2)
            .with_tab(true);

        let table = read_delimited_text(temp_file.path(), &options).unwrap();

        assert_eq!(table.column_names(), vec!["a", "b"]);
        assert_eq!(table.num_rows(), 1);
    }

    #[test]
    fn test_quoted_titles() {
        let temp_file = text_file("\"x, east\",\"y, north\"\n1.5,2.5\n");
        let options = DelimitedTextOptions::default().with_delimiter(',');

        let table = read_delimited_text(temp_file.path(), &options).unwrap();

        assert_eq!(table.column_names(), vec!["x, east", "y, north"]);
    }

    #[test]
    fn test_titles_only_gives_empty_columns() {
        let temp_file = text_file("a b c\n");

        let table = read_delimited_text(temp_file.path(), &DelimitedTextOptions::default()).unwrap();

        assert_eq!(table.num_columns(), 3);
        assert_eq!(table.num_rows(), 0);
    }

    #[test]
    fn test_empty_file_fails() {
        let temp_file = text_file("");

        let result = read_delimited_text(temp_file.path(), &DelimitedTextOptions::default());

        match result {
            Err(ReadError::EndOfInput { line, expected, .. }) => {
                assert_eq!(line, 1);
                assert_eq!(expected, "title row");
            }
            other => panic!("Expected EndOfInput error, got {:?}", other),
        }
    }

    #[test]
    fn test_ragged_row_fails() {
        let temp_file = text_file("a,b\n1,2\n3\n");
        let options = DelimitedTextOptions::default().with_delimiter(',');

        let result = read_delimited_text(temp_file.path(), &options);

        match result {
            Err(ReadError::Parse { line, .. }) => assert_eq!(line, 3),
            other => panic!("Expected Parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_field_is_not_a_number() {
        let temp_file = text_file("a,b\n1,\n");
        let options = DelimitedTextOptions::default().with_delimiter(',');

        let result = read_delimited_text(temp_file.path(), &options);

        match result {
            Err(ReadError::Parse { line, field, .. }) => {
                assert_eq!(line, 2);
                assert_eq!(field, 2);
            }
            other => panic!("Expected Parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_titles_rejected() {
        let temp_file = text_file("a,a\n1,2\n");
        let options = DelimitedTextOptions::default().with_delimiter(',');

        let result = read_delimited_text(temp_file.path(), &options);

        assert!(matches!(result, Err(ReadError::InvalidTable { .. })));
    }

    #[test]
    fn test_synthesized_titles() {
        assert_eq!(synthesized_titles(2), vec!["Field0", "Field1"]);
        assert!(synthesized_titles(0).is_empty());
    }
}
