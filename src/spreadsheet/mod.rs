//! # Spreadsheet Module
//!
//! Grid-side building blocks: spreadsheet-style references and ranges, the
//! cell model, and the [`Table`] trait through which the extraction engine
//! reads cells. [`Sheet`] is the in-memory implementation, loadable from CSV.
use crate::spreadsheet::cell::Cell;
use crate::spreadsheet::range::RangeReference;
use thiserror::Error;

pub mod cell;
pub mod csv;
pub mod range;
pub(crate) mod reference;
pub mod sheet;

pub use crate::spreadsheet::sheet::Sheet;

/// Errors raised while loading tabular data.
#[derive(Error, Debug)]
pub enum SpreadsheetError {
    /// Malformed CSV content
    #[error("Invalid csv file format: {0}")]
    InvalidCsvFileFormat(#[from] ::csv::Error),

    /// Reading the source failed
    #[error("{0}")]
    IoError(#[from] std::io::Error),

    /// Bytes could not be decoded with the configured encoding
    #[error("Malformed {encoding} text in '{name}'")]
    MalformedText { name: String, encoding: &'static str },

    /// Encoding label not known to the decoder
    #[error("Unknown text encoding '{label}'")]
    UnknownEncoding { label: String },
}

/// Read access to a rectangular grid of text cells.
///
/// Implementors only describe their content and extent; range resolution is
/// provided on top of that.
pub trait Table {
    /// Raw cell text, None if the cell is empty or out of bounds.
    fn text(&self, row: usize, col: usize) -> Option<&str>;

    /// Index of the last populated row, None for an empty table.
    fn row_upper_bound(&self) -> Option<usize>;

    /// Index of the last populated column, None for an empty table.
    fn col_upper_bound(&self) -> Option<usize>;

    /// Expands a range into concrete cells, row-major ascending.
    ///
    /// Upper bounds, open or not, stop at the last populated row or column.
    /// A single cell is always returned, with absent text when it lies
    /// outside the table.
    fn resolve(&self, range: &RangeReference) -> Vec<Cell> {
        range
            .addresses(self.row_upper_bound(), self.col_upper_bound())
            .into_iter()
            .map(|address| {
                let text = self.text(address.row, address.col).map(str::to_owned);
                Cell::new(address.row, address.col, text)
            })
            .collect()
    }
}

impl<T: Table + ?Sized> Table for &T {
    fn text(&self, row: usize, col: usize) -> Option<&str> {
        (**self).text(row, col)
    }

    fn row_upper_bound(&self) -> Option<usize> {
        (**self).row_upper_bound()
    }

    fn col_upper_bound(&self) -> Option<usize> {
        (**self).col_upper_bound()
    }
}
