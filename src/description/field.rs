use crate::description::pattern::PatternDescription;
use crate::description::pattern::PatternDescriptionBuilder;
use crate::description::DescriptionError;
use crate::spreadsheet::range::RangeReference;
use serde::Deserialize;
use serde::Serialize;
use std::fmt::Display;

/// A named field and the patterns that produce its values.
///
/// Always holds at least one pattern. The flat shorthand (`range`, `pattern`,
/// `value`, `prefix` next to `field`) is normalized into a single pattern.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "FieldDescriptionBuilder", into = "FieldDescriptionBuilder")]
pub struct FieldDescription {
    field: String,
    patterns: Vec<PatternDescription>,
}

impl FieldDescription {
    /// Creates a field from already validated patterns.
    pub fn new(field: &str, patterns: Vec<PatternDescription>) -> Result<Self, DescriptionError> {
        FieldDescriptionBuilder::new(field).patterns(patterns).build()
    }

    /// Starts a field description accepting either the nested or the flat form.
    pub fn builder(field: &str) -> FieldDescriptionBuilder {
        FieldDescriptionBuilder::new(field)
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn patterns(&self) -> &[PatternDescription] {
        &self.patterns
    }
}

impl Display for FieldDescription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.field)?;
        let ranges: Vec<String> = self
            .patterns
            .iter()
            .flat_map(PatternDescription::ranges)
            .map(RangeReference::to_string)
            .collect();
        if !ranges.is_empty() {
            write!(f, " [{}]", ranges.join(", "))?;
        }
        Ok(())
    }
}

/// Collects every accepted shape of a field description and validates it.
///
/// Either `patterns` or the flat shorthand may be used, never both.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldDescriptionBuilder {
    field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    patterns: Option<Vec<PatternDescription>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    range: Option<RangeReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ranges: Option<Vec<RangeReference>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    prefix: Option<String>,
}

impl FieldDescriptionBuilder {
    pub fn new(field: &str) -> Self {
        Self {
            field: field.to_owned(),
            ..Default::default()
        }
    }

    pub fn patterns(mut self, patterns: Vec<PatternDescription>) -> Self {
        self.patterns = Some(patterns);
        self
    }

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

    /// Validates and normalizes into a [`FieldDescription`].
    ///
    /// # Errors
    ///
    /// Fails for an empty field name, for `patterns` combined with any flat
    /// option, for an empty `patterns` list, and for any invalid pattern.
    pub fn build(self) -> Result<FieldDescription, DescriptionError> {
        if self.field.is_empty() {
            return Err(DescriptionError::EmptyFieldName);
        }
        let field = self.field;
        let shorthand = PatternDescriptionBuilder {
            range: self.range,
            ranges: self.ranges,
            pattern: self.pattern,
            value: self.value,
            prefix: self.prefix,
        };
        let patterns = match self.patterns {
            Some(patterns) => {
                if let Some(option) = shorthand.first_option() {
                    return Err(DescriptionError::ConflictingOptions {
                        first: "patterns",
                        second: option,
                    }
                    .in_field(&field));
                }
                if patterns.is_empty() {
                    return Err(DescriptionError::EmptyPatterns { field });
                }
                patterns
            }
            None => vec![shorthand.build().map_err(|error| error.in_field(&field))?],
        };
        Ok(FieldDescription { field, patterns })
    }
}

impl TryFrom<FieldDescriptionBuilder> for FieldDescription {
    type Error = DescriptionError;

    fn try_from(builder: FieldDescriptionBuilder) -> Result<Self, Self::Error> {
        builder.build()
    }
}

impl From<FieldDescription> for FieldDescriptionBuilder {
    fn from(description: FieldDescription) -> Self {
        Self {
            field: description.field,
            patterns: Some(description.patterns),
            ..Default::default()
        }
    }
}
