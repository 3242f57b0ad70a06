use serde::Deserialize;
use serde::Serialize;
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt::Display;

/// One extracted record: field names mapped to their string values.
///
/// Keys are kept sorted so equal records compare, hash and print the same
/// regardless of the order fields were resolved in.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataPoint(BTreeMap<String, String>);

impl DataPoint {
    /// Builds a data point from name/value pairs; a repeated name keeps the last value.
    pub fn of<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self(pairs.into_iter().map(|(key, value)| (key.into(), value.into())).collect())
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, String> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Field names in ascending order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn into_inner(self) -> BTreeMap<String, String> {
        self.0
    }
}

impl From<BTreeMap<String, String>> for DataPoint {
    fn from(fields: BTreeMap<String, String>) -> Self {
        Self(fields)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for DataPoint {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::of(iter)
    }
}

impl<'a> IntoIterator for &'a DataPoint {
    type Item = (&'a String, &'a String);
    type IntoIter = btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Display for DataPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let fields: Vec<String> = self.0.iter().map(|(key, value)| format!("{key}={value}")).collect();
        write!(f, "{{{}}}", fields.join(", "))
    }
}
