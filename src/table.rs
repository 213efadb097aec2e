//! In-memory numeric column table produced by every reader.
//!
//! A `Table` is an ordered set of uniquely named `f64` columns of equal
//! length. It is built once per read and handed to the caller, who can
//! iterate it directly or convert it into a polars `DataFrame`.

use crate::error::{ReadError, Result};
use polars::prelude::{Column as FrameColumn, DataFrame, NamedFrom};
use std::slice;

/// A named sequence of floating point values
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    values: Vec<f64>,
}

impl Column {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn into_values(self) -> Vec<f64> {
        self.values
    }
}

/// Ordered collection of named, equal-length numeric columns
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(columns: usize) -> Self {
        Self {
            columns: Vec::with_capacity(columns),
        }
    }

    /// Append a column after the existing ones.
    ///
    /// Fails if the name is already taken or if the column length differs
    /// from the columns already in the table.
    pub fn append_column(&mut self, name: impl Into<String>, values: Vec<f64>) -> Result<()> {
        let name = name.into();

        if self.columns.iter().any(|column| column.name == name) {
            return Err(ReadError::InvalidTable {
                reason: format!("Duplicate column name '{}'", name),
            });
        }

        if let Some(first) = self.columns.first() {
            if first.len() != values.len() {
                return Err(ReadError::InvalidTable {
                    reason: format!(
                        "Column '{}' has {} values but table rows number {}",
                        name,
                        values.len(),
                        first.len()
                    ),
                });
            }
        }

        self.columns.push(Column { name, values });
        Ok(())
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|column| column.name()).collect()
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Length shared by every column (zero for a table without columns)
    pub fn num_rows(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Columns in insertion order
    pub fn iter(&self) -> slice::Iter<'_, Column> {
        self.columns.iter()
    }

    pub fn into_columns(self) -> Vec<Column> {
        self.columns
    }

    /// Convert into a polars DataFrame of Float64 columns
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let columns = self
            .columns
            .iter()
            .map(|column| FrameColumn::new(column.name().into(), column.values()))
            .collect::<Vec<_>>();

        Ok(DataFrame::new(columns)?)
    }
}

impl<'a> IntoIterator for &'a Table {
    type Item = &'a Column;
    type IntoIter = slice::Iter<'a, Column>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for Table {
    type Item = Column;
    type IntoIter = std::vec::IntoIter<Column>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.into_iter()
    }
}
