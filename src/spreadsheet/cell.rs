use crate::spreadsheet::reference::index_to_reference;
use std::fmt::Display;

/// Position of a cell in a table, both indexes 0-based.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellAddress {
    /// Row index (0-based)
    pub row: usize,
    /// Column index (0-based)
    pub col: usize,
}

impl CellAddress {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Returns the spreadsheet-style reference (e.g., "A1", "B2").
    pub fn reference(&self) -> String {
        index_to_reference(self.row, self.col)
    }
}

impl Display for CellAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reference())
    }
}

/// A concrete cell resolved from a table: its position and raw text.
///
/// Ordering is row-major, which keeps sets of cells in reading order.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cell {
    /// Row index (0-based)
    pub row: usize,
    /// Column index (0-based)
    pub col: usize,
    /// Cell text, None when the cell is empty or outside the table
    pub value: Option<String>,
}

impl Cell {
    pub fn new(row: usize, col: usize, value: Option<String>) -> Self {
        Self { row, col, value }
    }

    pub fn address(&self) -> CellAddress {
        CellAddress::new(self.row, self.col)
    }

    /// Returns the spreadsheet-style reference (e.g., "A1", "B2").
    pub fn reference(&self) -> String {
        index_to_reference(self.row, self.col)
    }

    pub fn text(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{}='{}'", self.reference(), value),
            None => write!(f, "{}=<empty>", self.reference()),
        }
    }
}
