use crate::description::field::FieldDescription;
use crate::description::DescriptionError;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// A schema: the ordered field descriptions for one kind of table, plus
/// free-form metadata that extraction does not interpret.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableDescription {
    #[serde(rename = "fields", default)]
    fields: Vec<FieldDescription>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    metadata: Option<Value>,
}

impl TableDescription {
    pub fn of_fields(fields: Vec<FieldDescription>) -> Self {
        Self { fields, metadata: None }
    }

    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn fields(&self) -> &[FieldDescription] {
        &self.fields
    }

    pub fn metadata(&self) -> Option<&Value> {
        self.metadata.as_ref()
    }

    /// Loads a description from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DescriptionError> {
        let text = fs::read_to_string(path)?;
        text.parse()
    }

    /// Serializes to JSON in canonical (nested `patterns`) form.
    pub fn to_json(&self) -> Result<String, DescriptionError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Combines two descriptions; the second's metadata replaces the first's
    /// unless it has none.
    pub fn add(first: TableDescription, second: TableDescription) -> TableDescription {
        Self::add_with(first, second, |first, second| second.or(first))
    }

    /// Combines two descriptions with a custom metadata merge.
    ///
    /// Fields are concatenated in order; a field description structurally
    /// equal to an earlier one is dropped.
    pub fn add_with<F>(first: TableDescription, second: TableDescription, merge_metadata: F) -> TableDescription
    where
        F: FnOnce(Option<Value>, Option<Value>) -> Option<Value>,
    {
        let mut seen = HashSet::new();
        let fields = first
            .fields
            .into_iter()
            .chain(second.fields)
            .filter(|field| seen.insert(field.clone()))
            .collect();
        TableDescription {
            fields,
            metadata: merge_metadata(first.metadata, second.metadata),
        }
    }

    /// Folds any number of descriptions with [`TableDescription::add`].
    pub fn merge_all<I>(descriptions: I) -> TableDescription
    where
        I: IntoIterator<Item = TableDescription>,
    {
        descriptions.into_iter().fold(TableDescription::default(), Self::add)
    }
}

impl FromStr for TableDescription {
    type Err = DescriptionError;

    fn from_str(json: &str) -> Result<Self, Self::Err> {
        Ok(serde_json::from_str(json)?)
    }
}
