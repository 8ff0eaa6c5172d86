//! Table types.

use serde::{Deserialize, Serialize};

/// A rectangular grid of cell strings.
///
/// Cells are normalized on construction: surrounding whitespace is trimmed
/// and embedded line breaks collapse to single spaces. Ragged input rows are
/// padded on the right with empty cells up to the widest row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    /// Rows in the table; the first row is the header.
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Create a new empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from rows of optional cells (absent cells are empty).
    pub fn from_cells<R, C>(rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator<Item = Option<String>>,
    {
        let mut rows: Vec<Vec<String>> = rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|cell| clean_cell(cell.as_deref().unwrap_or("")))
                    .collect()
            })
            .collect();

        let col_count = rows.iter().map(Vec::len).max().unwrap_or(0);
        for row in &mut rows {
            row.resize(col_count, String::new());
        }

        Self { rows }
    }

    /// Build a table from rows of text cells.
    pub fn from_strings<R, C, S>(rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_cells(rows.into_iter().map(|row| {
            row.into_iter()
                .map(|cell| Some(cell.into()))
                .collect::<Vec<Option<String>>>()
        }))
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.rows.first().map(Vec::len).unwrap_or(0)
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get the header row.
    pub fn header(&self) -> Option<&[String]> {
        self.rows.first().map(Vec::as_slice)
    }

    /// Get body rows (everything after the header).
    pub fn body(&self) -> &[Vec<String>] {
        self.rows.get(1..).unwrap_or(&[])
    }
}

/// Trim a cell and collapse embedded line breaks to single spaces.
fn clean_cell(cell: &str) -> String {
    cell.trim()
        .replace("\r\n", " ")
        .replace(['\n', '\r'], " ")
}
