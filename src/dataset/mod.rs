//! # Dataset Module
//!
//! Turns a table plus its field descriptions into data points. The
//! [`QueryableFields`] index answers "which fields apply at this cell", and
//! the [`DatasetAdapter`] emits one [`DataPoint`] per value cell.
use crate::spreadsheet::cell::CellAddress;
use std::fmt::Display;
use thiserror::Error;

pub mod adapter;
pub mod data_point;
pub mod fields;
pub mod options;

pub use crate::dataset::adapter::build_data_points;
pub use crate::dataset::adapter::DatasetAdapter;
pub use crate::dataset::data_point::DataPoint;
pub use crate::dataset::fields::QueryableFields;
pub use crate::dataset::options::ExtractOptions;

/// Reserved field naming the cells that become data points.
pub const VALUE_FIELD: &str = "value";

/// Errors that make a description unusable against a table.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DatasetError {
    /// Only the value field may span both rows and columns
    #[error("Only value can be in both column and row: field '{field}' uses range '{range}'")]
    RowAndColumnRange { field: String, range: String },
}

/// Why a pattern produced nothing for a cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MissReason {
    /// The cell has no text
    EmptyCell,
    /// The regex did not match the cell text
    NoMatch,
}

/// A non-fatal miss recorded while indexing fields.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub field: String,
    pub address: CellAddress,
    pub reason: MissReason,
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reason = match self.reason {
            MissReason::EmptyCell => "cell is empty",
            MissReason::NoMatch => "pattern did not match",
        };
        write!(f, "No value for '{}' at {}: {}", self.field, self.address, reason)
    }
}
