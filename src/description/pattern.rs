use crate::description::DescriptionError;
use crate::spreadsheet::range::RangeReference;
use regex::Regex;
use serde::Deserialize;
use serde::Serialize;
use std::hash::Hash;
use std::hash::Hasher;

/// One way of deriving a field's value: where to look and how to read it.
///
/// The regex is compiled once at construction; its source text is kept for
/// equality and serialization.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "PatternDescriptionBuilder", into = "PatternDescriptionBuilder")]
pub struct PatternDescription {
    ranges: Vec<RangeReference>,
    pattern: Option<Regex>,
    value: Option<String>,
    prefix: Option<String>,
}

impl PatternDescription {
    /// Creates a validated pattern.
    ///
    /// # Errors
    ///
    /// Fails if both `pattern` and `value` are given, if `pattern` is not a
    /// valid regex, or if there are no ranges and no hardcoded `value`.
    pub fn new(
        ranges: Vec<RangeReference>,
        pattern: Option<&str>,
        value: Option<String>,
        prefix: Option<String>,
    ) -> Result<Self, DescriptionError> {
        if pattern.is_some() && value.is_some() {
            return Err(DescriptionError::ConflictingOptions {
                first: "pattern",
                second: "value",
            });
        }
        if ranges.is_empty() && value.is_none() {
            return Err(DescriptionError::MissingRangeAndValue);
        }
        let pattern = pattern
            .map(|pattern| {
                Regex::new(pattern).map_err(|source| DescriptionError::InvalidPattern {
                    pattern: pattern.to_owned(),
                    source,
                })
            })
            .transpose()?;
        Ok(Self {
            ranges,
            pattern,
            value,
            prefix,
        })
    }

    /// A constant that applies everywhere, with no positional binding.
    pub fn hardcoded(value: &str) -> Self {
        Self {
            ranges: Vec::new(),
            pattern: None,
            value: Some(value.to_owned()),
            prefix: None,
        }
    }

    pub fn builder() -> PatternDescriptionBuilder {
        PatternDescriptionBuilder::default()
    }

    pub fn ranges(&self) -> &[RangeReference] {
        &self.ranges
    }

    pub fn pattern(&self) -> Option<&Regex> {
        self.pattern.as_ref()
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Derives this pattern's value for one cell.
    ///
    /// A hardcoded value wins over everything and ignores `text`. Otherwise a
    /// regex yields its first capture group (the whole match when it has no
    /// groups), and without a regex the text is taken verbatim. The prefix is
    /// prepended to a present result only.
    pub fn apply(&self, text: Option<&str>) -> Option<String> {
        let value = if let Some(value) = &self.value {
            Some(value.to_owned())
        } else if let Some(pattern) = &self.pattern {
            text.and_then(|text| first_capture(pattern, text))
        } else {
            text.map(str::to_owned)
        };
        match &self.prefix {
            Some(prefix) => value.map(|value| format!("{prefix}{value}")),
            None => value,
        }
    }
}

fn first_capture(pattern: &Regex, text: &str) -> Option<String> {
    let captures = pattern.captures(text)?;
    let group = if captures.len() > 1 { 1 } else { 0 };
    captures.get(group).map(|matcher| matcher.as_str().to_owned())
}

impl PartialEq for PatternDescription {
    fn eq(&self, other: &Self) -> bool {
        self.ranges == other.ranges
            && self.pattern.as_ref().map(Regex::as_str) == other.pattern.as_ref().map(Regex::as_str)
            && self.value == other.value
            && self.prefix == other.prefix
    }
}

impl Eq for PatternDescription {}

impl Hash for PatternDescription {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.ranges.hash(state);
        self.pattern.as_ref().map(Regex::as_str).hash(state);
        self.value.hash(state);
        self.prefix.hash(state);
    }
}

/// Accepts every input shape of a pattern, including the single `range`
/// shorthand, and validates it into a [`PatternDescription`].
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PatternDescriptionBuilder {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) range: Option<RangeReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) ranges: Option<Vec<RangeReference>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) prefix: Option<String>,
}

impl PatternDescriptionBuilder {
    pub fn range(mut self, range: RangeReference) -> Self {
        self.range = Some(range);
        self
    }

    pub fn ranges(mut self, ranges: Vec<RangeReference>) -> Self {
        self.ranges = Some(ranges);
        self
    }

    pub fn pattern(mut self, pattern: &str) -> Self {
        self.pattern = Some(pattern.to_owned());
        self
    }

    pub fn value(mut self, value: &str) -> Self {
        self.value = Some(value.to_owned());
        self
    }

    pub fn prefix(mut self, prefix: &str) -> Self {
        self.prefix = Some(prefix.to_owned());
        self
    }

    /// Name of the first supplied option, for conflict reporting.
    pub(crate) fn first_option(&self) -> Option<&'static str> {
        [
            ("range", self.range.is_some()),
            ("ranges", self.ranges.is_some()),
            ("pattern", self.pattern.is_some()),
            ("value", self.value.is_some()),
            ("prefix", self.prefix.is_some()),
        ]
        .into_iter()
        .find(|(_, present)| *present)
        .map(|(name, _)| name)
    }

    pub fn build(self) -> Result<PatternDescription, DescriptionError> {
        let ranges = match (self.range, self.ranges) {
            (Some(_), Some(_)) => {
                return Err(DescriptionError::ConflictingOptions {
                    first: "range",
                    second: "ranges",
                })
            }
            (Some(range), None) => vec![range],
            (None, Some(ranges)) => ranges,
            (None, None) => Vec::new(),
        };
        PatternDescription::new(ranges, self.pattern.as_deref(), self.value, self.prefix)
    }
}

impl TryFrom<PatternDescriptionBuilder> for PatternDescription {
    type Error = DescriptionError;

    fn try_from(builder: PatternDescriptionBuilder) -> Result<Self, Self::Error> {
        builder.build()
    }
}

impl From<PatternDescription> for PatternDescriptionBuilder {
    fn from(description: PatternDescription) -> Self {
        Self {
            range: None,
            ranges: Some(description.ranges).filter(|ranges| !ranges.is_empty()),
            pattern: description.pattern.map(|pattern| pattern.as_str().to_owned()),
            value: description.value,
            prefix: description.prefix,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(value: &str) -> RangeReference {
        RangeReference::try_from(value).unwrap()
    }

    fn verbatim(prefix: Option<&str>) -> PatternDescription {
        PatternDescription::new(vec![range("A1")], None, None, prefix.map(str::to_owned)).unwrap()
    }

    #[test]
    fn pattern_and_value_conflict() {
        let result = PatternDescription::new(vec![range("A1")], Some("(.*)"), Some("x".to_owned()), None);
        assert!(matches!(
            result,
            Err(DescriptionError::ConflictingOptions { first: "pattern", second: "value" })
        ));
    }

    #[test]
    fn range_and_ranges_conflict() {
        let result = PatternDescription::builder()
            .range(range("A1"))
            .ranges(vec![range("B1")])
            .build();
        assert!(matches!(
            result,
            Err(DescriptionError::ConflictingOptions { first: "range", second: "ranges" })
        ));
    }

    #[test]
    fn no_ranges_requires_value() {
        assert!(matches!(
            PatternDescription::new(Vec::new(), None, None, None),
            Err(DescriptionError::MissingRangeAndValue)
        ));
        assert!(matches!(
            PatternDescription::builder().ranges(Vec::new()).pattern("(.*)").build(),
            Err(DescriptionError::MissingRangeAndValue)
        ));
        assert!(PatternDescription::builder().value("x").build().is_ok());
    }

    #[test]
    fn invalid_regex() {
        let result = PatternDescription::new(vec![range("A1")], Some("(unclosed"), None, None);
        assert!(matches!(result, Err(DescriptionError::InvalidPattern { .. })));
    }

    #[test]
    fn hardcoded_ignores_text() {
        let pattern = PatternDescription::builder().range(range("A1")).value("MM 1").build().unwrap();
        assert_eq!(pattern.apply(Some("anything")), Some("MM 1".to_owned()));
        assert_eq!(pattern.apply(Some("else")), Some("MM 1".to_owned()));
        assert_eq!(pattern.apply(None), Some("MM 1".to_owned()));
    }

    #[test]
    fn regex_first_capture() {
        let pattern = PatternDescription::builder()
            .range(range("C1:D1"))
            .pattern("(.*) - (.*)")
            .build()
            .unwrap();
        assert_eq!(pattern.apply(Some("Maternal Mortality Rate - Urban")), Some("Maternal Mortality Rate".to_owned()));
        assert_eq!(pattern.apply(Some("Infant Mortality Rate")), None);
        assert_eq!(pattern.apply(None), None);
    }

    #[test]
    fn regex_without_groups_and_optional_group() {
        let whole = PatternDescription::builder().range(range("A1")).pattern(r"\d+").build().unwrap();
        assert_eq!(whole.apply(Some("rate 42 %")), Some("42".to_owned()));

        let optional = PatternDescription::builder().range(range("A1")).pattern("a(b)?").build().unwrap();
        assert_eq!(optional.apply(Some("ab")), Some("b".to_owned()));
        assert_eq!(optional.apply(Some("a")), None);
    }

    #[test]
    fn prefix_is_concatenation() {
        for text in [Some("mmr"), Some(""), None] {
            let plain = verbatim(None).apply(text);
            let prefixed = verbatim(Some("IND - ")).apply(text);
            assert_eq!(prefixed, plain.map(|value| format!("IND - {value}")));
        }
    }

    #[test]
    fn prefix_with_regex_capture() {
        let pattern = PatternDescription::builder()
            .range(range("B1:1"))
            .pattern("(.*) - .*")
            .prefix("IND - ")
            .build()
            .unwrap();
        assert_eq!(pattern.apply(Some("Maternal Mortality Rate - Urban")), Some("IND - Maternal Mortality Rate".to_owned()));
        assert_eq!(pattern.apply(Some("Infant Mortality Rate")), None);
        assert_eq!(pattern.apply(None), None);
    }

    #[test]
    fn prefix_with_hardcoded_value() {
        let pattern = PatternDescription::builder()
            .range(range("B1"))
            .value("MMR")
            .prefix("IND - ")
            .build()
            .unwrap();
        assert_eq!(pattern.apply(Some("anything")), Some("IND - MMR".to_owned()));
        assert_eq!(pattern.apply(None), Some("IND - MMR".to_owned()));
    }

    #[test]
    fn structural_equality() {
        let first = PatternDescription::builder().range(range("A1")).pattern("(.*)").build().unwrap();
        let second = PatternDescription::builder().ranges(vec![range("A1")]).pattern("(.*)").build().unwrap();
        assert_eq!(first, second);
        let third = PatternDescription::builder().range(range("A1")).pattern("(.+)").build().unwrap();
        assert_ne!(first, third);
    }

    #[test]
    fn deserialize_shorthand_and_serialize_canonical() {
        let pattern: PatternDescription =
            serde_json::from_str(r#"{"range": "A2:A", "pattern": "(.*)", "prefix": "p "}"#).unwrap();
        assert_eq!(pattern.ranges(), &[range("A2:A")]);
        assert_eq!(pattern.prefix(), Some("p "));
        assert_eq!(
            serde_json::to_string(&pattern).unwrap(),
            r#"{"ranges":["A2:A"],"pattern":"(.*)","prefix":"p "}"#
        );
    }

    #[test]
    fn deserialize_rejects_conflicts() {
        let result = serde_json::from_str::<PatternDescription>(r#"{"range": "A1", "pattern": "x", "value": "y"}"#);
        assert!(result.is_err());
        let result = serde_json::from_str::<PatternDescription>(r#"{"range": "A1", "colour": "red"}"#);
        assert!(result.is_err());
        let result = serde_json::from_str::<PatternDescription>(r#"{"range": "1A"}"#);
        assert!(result.is_err());
    }
}
