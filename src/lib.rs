//! # Table Reader
//!
//! Extracts flat data points from human-formatted tables, where the meaning of
//! a number is spread over header rows, label columns and constants.
//!
//! ## Features
//!
//! - **Spreadsheet-style ranges**: `A1`, `A1:B2`, open ranges such as `A2:A`, `B1:1` and `C2:`
//! - **JSON table descriptions**: fields bound to ranges, regex extraction, hardcoded values and prefixes
//! - **Positional lookup**: fields written down a column apply to rows, fields along a row apply to columns
//! - **CSV input**: any delimiter and text encoding, loaded into an in-memory [`Sheet`]
//!
//! ## Example
//!
//! ```
//! use table_reader::ExtractOptions;
//! use table_reader::Sheet;
//! use table_reader::TableDescription;
//!
//! let table: Sheet = "district,mmr\nkannur,2\n".parse().unwrap();
//! let description: TableDescription = r#"{"fields": [
//!     {"field": "district", "range": "A2:A"},
//!     {"field": "indicator", "range": "B1:1"},
//!     {"field": "value", "range": "B2:"}
//! ]}"#
//! .parse()
//! .unwrap();
//! let data = table_reader::extract(&table, &description, &ExtractOptions::default()).unwrap();
//! assert_eq!(data[0].get("indicator"), Some("mmr"));
//! assert_eq!(data[0].get("value"), Some("2"));
//! ```
pub mod dataset;
pub mod description;
pub mod error;
pub mod spreadsheet;

pub use crate::dataset::DataPoint;
pub use crate::dataset::DatasetAdapter;
pub use crate::dataset::DatasetError;
pub use crate::dataset::ExtractOptions;
pub use crate::dataset::QueryableFields;
pub use crate::description::FieldDescription;
pub use crate::description::PatternDescription;
pub use crate::description::TableDescription;
pub use crate::error::TableReaderError;
pub use crate::spreadsheet::csv::CsvOptions;
pub use crate::spreadsheet::range::RangeReference;
pub use crate::spreadsheet::Sheet;
pub use crate::spreadsheet::Table;

use crate::error::ResultMessage;
use anyhow::Context;
use anyhow::Result;
use std::path::Path;
use std::path::PathBuf;

/// Extracts the data points of one table.
///
/// # Errors
///
/// Returns an error if a field other than `value` spans several rows and
/// several columns.
pub fn extract<T: Table + ?Sized>(
    table: &T,
    description: &TableDescription,
    options: &ExtractOptions,
) -> Result<Vec<DataPoint>, DatasetError> {
    DatasetAdapter::new(table, description, options).map(DatasetAdapter::into_data)
}

/// Loads and merges every description file matched by the glob patterns.
///
/// Matched paths are merged in sorted order, each file once, so a shared
/// root description can sit next to per-table ones.
///
/// # Errors
///
/// Returns an error for an invalid pattern, an unreadable path or an invalid
/// description; the latter two are prefixed with the offending path.
pub fn read_descriptions(patterns: &[&str]) -> Result<TableDescription, TableReaderError> {
    let mut paths = Vec::<PathBuf>::new();
    for pattern in patterns {
        for path in glob::glob(pattern)? {
            paths.push(path?);
        }
    }
    paths.sort();
    paths.dedup();
    if paths.is_empty() {
        log::warn!("No description files match {:?}", patterns);
    }

    let mut descriptions = Vec::with_capacity(paths.len());
    for path in &paths {
        log::debug!("Reading description {}", path.display());
        let description = TableDescription::from_path(path)
            .map_err(TableReaderError::from)
            .with_prefix(path.display().to_string().as_str())?;
        descriptions.push(description);
    }
    Ok(TableDescription::merge_all(descriptions))
}

/// Reads a CSV file and extracts its data points using the description files
/// matched by `description_patterns`.
///
/// # Errors
///
/// Returns an error if the CSV file or any description cannot be loaded, or
/// if extraction fails.
pub fn read_csv_dataset(
    csv_path: impl AsRef<Path>,
    description_patterns: &[&str],
    csv_options: &CsvOptions,
    options: &ExtractOptions,
) -> Result<Vec<DataPoint>> {
    let csv_path = csv_path.as_ref();
    let description = read_descriptions(description_patterns).context("Failed to read table descriptions")?;
    let table = Sheet::from_csv_path(csv_path, csv_options)
        .with_context(|| format!("Failed to read csv file {}", csv_path.display()))?;
    let data = extract(&table, &description, options)
        .with_context(|| format!("Failed to extract data from {}", csv_path.display()))?;
    log::info!("Extracted {} data points from {}", data.len(), csv_path.display());
    Ok(data)
}
