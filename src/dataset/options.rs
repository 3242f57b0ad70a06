use serde::Deserialize;
use serde::Serialize;

/// Options controlling how data points are assembled.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExtractOptions {
    /// Add `meta.dataFileType` and `meta.addressInDataFile.*` fields to every data point.
    pub include_metadata: bool,
}

impl ExtractOptions {
    pub fn with_metadata(mut self, include_metadata: bool) -> Self {
        self.include_metadata = include_metadata;
        self
    }
}
