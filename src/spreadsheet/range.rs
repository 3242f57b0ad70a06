use crate::spreadsheet::cell::CellAddress;
use crate::spreadsheet::reference::col_to_index;
use crate::spreadsheet::reference::index_to_col;
use crate::spreadsheet::reference::index_to_reference;
use crate::spreadsheet::reference::index_to_row;
use crate::spreadsheet::reference::row_to_index;
use regex::Regex;
use serde::Deserialize;
use serde::Serialize;
use std::fmt::Display;
use std::str::FromStr;
use std::sync::LazyLock;
use thiserror::Error;

static RANGE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Z]*)(\d*)(:([A-Z]*)(\d*))?$").expect("Hardcode regex pattern"));

/// Errors related to spreadsheet-style range parsing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RangeError {
    #[error("Invalid range format '{0}'")]
    FormatError(String),

    #[error("Empty range '{0}': expected at least one cell, column or row token")]
    EmptyRange(String),

    #[error("Invalid row in range '{range}': '{row}' is not a 1-based row number")]
    InvalidRow { range: String, row: String },

    #[error("Invalid column in range '{range}': '{col}' is out of bounds")]
    InvalidColumn { range: String, col: String },
}

/// Shape of a range, derived from its bounds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RangeKind {
    /// Exactly one cell
    SingleCell,
    /// One column, spanning or open along rows
    ColumnOnly,
    /// One row, spanning or open along columns
    RowOnly,
    /// Spans several rows and several columns
    RowAndColumn,
}

/// A parsed spreadsheet-style range with optional upper boundaries.
///
/// Lower bounds are always concrete (an omitted start means the first row or
/// column). An upper bound of None extends to the table's edge on that axis.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RangeReference {
    /// Lower row bound (0-based index)
    pub(crate) row_lower_bound: usize,
    /// Upper row bound (0-based index), None for unbounded
    pub(crate) row_upper_bound: Option<usize>,
    /// Lower column bound (0-based index)
    pub(crate) col_lower_bound: usize,
    /// Upper column bound (0-based index), None for unbounded
    pub(crate) col_upper_bound: Option<usize>,
}

impl RangeReference {
    /// Creates a range from explicit bounds, normalizing reversed bounds.
    pub fn new(start: CellAddress, row_upper_bound: Option<usize>, col_upper_bound: Option<usize>) -> Self {
        let (row_lower_bound, row_upper_bound) = Self::normalize(start.row, row_upper_bound);
        let (col_lower_bound, col_upper_bound) = Self::normalize(start.col, col_upper_bound);
        Self {
            row_lower_bound,
            row_upper_bound,
            col_lower_bound,
            col_upper_bound,
        }
    }

    /// Creates a range covering exactly one cell.
    pub fn cell(row: usize, col: usize) -> Self {
        Self::new(CellAddress::new(row, col), Some(row), Some(col))
    }

    fn normalize(lower: usize, upper: Option<usize>) -> (usize, Option<usize>) {
        match upper {
            Some(upper) if upper < lower => (upper, Some(lower)),
            _ => (lower, upper),
        }
    }

    /// Top-left cell of the range.
    pub fn start(&self) -> CellAddress {
        CellAddress::new(self.row_lower_bound, self.col_lower_bound)
    }

    /// Bottom-right cell of the range, None when either axis is open.
    pub fn end(&self) -> Option<CellAddress> {
        self.row_upper_bound
            .zip(self.col_upper_bound)
            .map(|(row, col)| CellAddress::new(row, col))
    }

    pub fn row_upper_bound(&self) -> Option<usize> {
        self.row_upper_bound
    }

    pub fn col_upper_bound(&self) -> Option<usize> {
        self.col_upper_bound
    }

    fn is_single_row(&self) -> bool {
        self.row_upper_bound == Some(self.row_lower_bound)
    }

    fn is_single_col(&self) -> bool {
        self.col_upper_bound == Some(self.col_lower_bound)
    }

    /// Classifies the range by the axes it spans.
    pub fn kind(&self) -> RangeKind {
        match (self.is_single_row(), self.is_single_col()) {
            (true, true) => RangeKind::SingleCell,
            (false, true) => RangeKind::ColumnOnly,
            (true, false) => RangeKind::RowOnly,
            (false, false) => RangeKind::RowAndColumn,
        }
    }

    /// Lists the cell addresses covered by the range in row-major order.
    ///
    /// A single cell is always listed as is. Otherwise every upper bound is
    /// capped at the given last row and column of a table, so the addresses
    /// never run past the table; an empty table yields none.
    pub fn addresses(&self, last_row: Option<usize>, last_col: Option<usize>) -> Vec<CellAddress> {
        if self.kind() == RangeKind::SingleCell {
            return vec![self.start()];
        }
        let (Some(row_upper), Some(col_upper)) = (
            Self::clamp(self.row_upper_bound, last_row),
            Self::clamp(self.col_upper_bound, last_col),
        ) else {
            return Vec::new();
        };
        (self.row_lower_bound..=row_upper)
            .flat_map(|row| (self.col_lower_bound..=col_upper).map(move |col| CellAddress::new(row, col)))
            .collect()
    }

    fn clamp(upper: Option<usize>, last: Option<usize>) -> Option<usize> {
        last.map(|last| upper.map_or(last, |upper| upper.min(last)))
    }

    fn parse_col(range: &str, letters: &str) -> Result<Option<usize>, RangeError> {
        if letters.is_empty() {
            return Ok(None);
        }
        col_to_index(letters).map(Some).ok_or_else(|| RangeError::InvalidColumn {
            range: range.to_owned(),
            col: letters.to_owned(),
        })
    }

    fn parse_row(range: &str, number: &str) -> Result<Option<usize>, RangeError> {
        if number.is_empty() {
            return Ok(None);
        }
        row_to_index(number).map(Some).ok_or_else(|| RangeError::InvalidRow {
            range: range.to_owned(),
            row: number.to_owned(),
        })
    }
}

impl TryFrom<&str> for RangeReference {
    type Error = RangeError;

    /// Parses a range string (e.g., "A1", "A1:B2", "A2:A", "B1:1", "C2:").
    ///
    /// A lone column token ("C") selects the whole column and a lone row
    /// token ("3") the whole row. In a two-sided range an omitted start
    /// token begins at the first row or column, and an omitted end token
    /// extends to the table's edge.
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let range = value.trim().to_ascii_uppercase();
        let captures = RANGE_PATTERN
            .captures(range.as_str())
            .ok_or_else(|| RangeError::FormatError(value.to_owned()))?;
        let token = |index: usize| captures.get(index).map(|matcher| matcher.as_str()).unwrap_or("");

        let col_lower_bound = Self::parse_col(value, token(1))?;
        let row_lower_bound = Self::parse_row(value, token(2))?;

        if captures.get(3).is_none() {
            return match (row_lower_bound, col_lower_bound) {
                (Some(row), Some(col)) => Ok(Self::cell(row, col)),
                (None, Some(col)) => Ok(Self::new(CellAddress::new(0, col), None, Some(col))),
                (Some(row), None) => Ok(Self::new(CellAddress::new(row, 0), Some(row), None)),
                (None, None) => Err(RangeError::EmptyRange(value.to_owned())),
            };
        }

        let col_upper_bound = Self::parse_col(value, token(4))?;
        let row_upper_bound = Self::parse_row(value, token(5))?;
        let tokens = [col_lower_bound, row_lower_bound, col_upper_bound, row_upper_bound];
        if tokens.iter().all(Option::is_none) {
            return Err(RangeError::EmptyRange(value.to_owned()));
        }

        Ok(Self::new(
            CellAddress::new(row_lower_bound.unwrap_or(0), col_lower_bound.unwrap_or(0)),
            row_upper_bound,
            col_upper_bound,
        ))
    }
}

impl TryFrom<String> for RangeReference {
    type Error = RangeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

impl FromStr for RangeReference {
    type Err = RangeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::try_from(value)
    }
}

impl Display for RangeReference {
    /// Writes the canonical address, which parses back to the same range.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.kind() == RangeKind::SingleCell {
            return write!(f, "{}", index_to_reference(self.row_lower_bound, self.col_lower_bound));
        }
        write!(f, "{}:", index_to_reference(self.row_lower_bound, self.col_lower_bound))?;
        if let Some(col) = self.col_upper_bound {
            write!(f, "{}", index_to_col(col))?;
        }
        if let Some(row) = self.row_upper_bound {
            write!(f, "{}", index_to_row(row))?;
        }
        Ok(())
    }
}

impl From<RangeReference> for String {
    fn from(value: RangeReference) -> Self {
        value.to_string()
    }
}
