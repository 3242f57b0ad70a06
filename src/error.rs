use thiserror::Error;

/// Main error type for the table reader.
/// Aggregates errors from the standard library, dependencies and the crate's modules.
#[derive(Error, Debug)]
pub enum TableReaderError {
    #[error("{0}")]
    WithContextError(String),

    // Standard library errors
    #[error("{0}")]
    IoError(#[from] std::io::Error),

    // Third-party library errors
    #[error("{0}")]
    PatternError(#[from] glob::PatternError),

    #[error("{0}")]
    GlobError(#[from] glob::GlobError),

    // Spreadsheet module errors
    #[error("{0}")]
    SpreadsheetError(#[from] crate::spreadsheet::SpreadsheetError),

    // Description module errors
    #[error("{0}")]
    DescriptionError(#[from] crate::description::DescriptionError),

    // Dataset module errors
    #[error("{0}")]
    DatasetError(#[from] crate::dataset::DatasetError),
}

pub trait ResultMessage {
    fn with_prefix(self, message: &str) -> Self;
}

impl<T> ResultMessage for Result<T, TableReaderError> {
    fn with_prefix(self, message: &str) -> Self {
        self.map_err(|e| TableReaderError::WithContextError(format!("{}: {}", message, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::DatasetError;

    #[test]
    fn with_prefix_keeps_message() {
        let result: Result<(), TableReaderError> = Err(DatasetError::RowAndColumnRange {
            field: "x".to_owned(),
            range: "A1:B2".to_owned(),
        }
        .into());
        let message = result.with_prefix("survey.json").unwrap_err().to_string();
        assert_eq!(
            message,
            "survey.json: Only value can be in both column and row: field 'x' uses range 'A1:B2'"
        );
    }

    #[test]
    fn with_prefix_passes_ok_through() {
        let result: Result<u8, TableReaderError> = Ok(1);
        assert_eq!(result.with_prefix("ignored").unwrap(), 1);
    }
}
