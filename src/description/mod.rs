//! # Description Module
//!
//! Field descriptions tell the extractor where a field's values live in a
//! table and how to derive them: verbatim cell text, a hardcoded constant, or
//! a regex capture, each optionally prefixed. All descriptions are validated
//! when constructed, whether built in code or deserialized from JSON.
use thiserror::Error;

pub mod field;
pub mod pattern;
pub mod table;

pub use crate::description::field::FieldDescription;
pub use crate::description::field::FieldDescriptionBuilder;
pub use crate::description::pattern::PatternDescription;
pub use crate::description::pattern::PatternDescriptionBuilder;
pub use crate::description::table::TableDescription;

/// Errors raised while constructing or loading descriptions.
#[derive(Error, Debug)]
pub enum DescriptionError {
    /// Two mutually exclusive options were both supplied
    #[error("Both '{first}' and '{second}' specified")]
    ConflictingOptions { first: &'static str, second: &'static str },

    /// A pattern without ranges must carry a hardcoded value
    #[error("Pattern with neither ranges nor value")]
    MissingRangeAndValue,

    #[error("Field name must not be empty")]
    EmptyFieldName,

    #[error("Field '{field}' has an empty 'patterns' list")]
    EmptyPatterns { field: String },

    #[error("Invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Wraps a pattern-level error with the field it belongs to
    #[error("Field '{field}': {source}")]
    InField {
        field: String,
        #[source]
        source: Box<DescriptionError>,
    },

    #[error("Invalid table description: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("{0}")]
    IoError(#[from] std::io::Error),
}

impl DescriptionError {
    pub(crate) fn in_field(self, field: &str) -> Self {
        match self {
            DescriptionError::InField { .. } => self,
            _ => DescriptionError::InField {
                field: field.to_owned(),
                source: Box::new(self),
            },
        }
    }
}
