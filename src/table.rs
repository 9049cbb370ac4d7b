//! The in-memory tabular input boundary.
//!
//! The collaborator (upload UI, CSV reader, test fixture) hands the engine
//! an already-loaded table of string cells. The engine parses the columns
//! it knows about and preserves everything else verbatim for passthrough
//! display.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns, rows: Vec::new() }
    }

    /// Appends one row. Rows shorter than the header are legal; the
    /// missing cells simply read as absent fields.
    pub fn push_row(&mut self, cells: Vec<String>) {
        self.rows.push(cells);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Raw cell lookup by row and column name. `None` when the column does
    /// not exist or the row is too short to reach it.
    pub fn cell<'a>(&'a self, row: &'a [String], name: &str) -> Option<&'a str> {
        let idx = self.column_index(name)?;
        row.get(idx).map(String::as_str)
    }
}
