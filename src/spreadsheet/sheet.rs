use crate::spreadsheet::cell::CellAddress;
use crate::spreadsheet::Table;
use std::collections::BTreeMap;

/// A sparse in-memory sheet of text cells.
///
/// Empty cells are not stored, so the tracked bounds always describe the
/// last populated row and column.
#[derive(Clone, Debug, Default)]
pub struct Sheet {
    /// Sheet name (file stem for sheets loaded from disk)
    pub(crate) name: String,
    /// Non-empty cells keyed by position
    cells: BTreeMap<CellAddress, String>,
    /// Actual data range (determined from cell data)
    pub(crate) row_upper_bound: Option<usize>,
    pub(crate) col_upper_bound: Option<usize>,
}

impl Sheet {
    /// Creates an empty sheet.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            ..Default::default()
        }
    }

    /// Builds a sheet from rows of cell text; row and column indexes follow
    /// iteration order.
    pub fn from_rows<I, R, S>(name: &str, rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut sheet = Self::new(name);
        for (row, record) in rows.into_iter().enumerate() {
            for (col, value) in record.into_iter().enumerate() {
                sheet.push(row, col, value);
            }
        }
        sheet
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns true if the sheet contains no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of non-empty cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Sets a cell, updating the data range. Empty text clears the cell
    /// without extending the range.
    pub fn push(&mut self, row: usize, col: usize, value: impl Into<String>) {
        let value = value.into();
        let address = CellAddress::new(row, col);
        if value.is_empty() {
            self.cells.remove(&address);
            return;
        }
        self.update_bound(row, col);
        self.cells.insert(address, value);
    }

    /// Updates the actual data range boundaries based on cell positions.
    fn update_bound(&mut self, row: usize, col: usize) {
        if self.row_upper_bound.map(|row_upper_bound| row_upper_bound < row).unwrap_or(true) {
            self.row_upper_bound = Some(row);
        }
        if self.col_upper_bound.map(|col_upper_bound| col_upper_bound < col).unwrap_or(true) {
            self.col_upper_bound = Some(col);
        }
    }
}

impl Table for Sheet {
    fn text(&self, row: usize, col: usize) -> Option<&str> {
        self.cells.get(&CellAddress::new(row, col)).map(String::as_str)
    }

    fn row_upper_bound(&self) -> Option<usize> {
        self.row_upper_bound
    }

    fn col_upper_bound(&self) -> Option<usize> {
        self.col_upper_bound
    }
}
