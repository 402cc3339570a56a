//! Validation rules built from field descriptions
//!
//! Each field's `validations` block is parsed once, when the document is
//! loaded, into a list of [`Rule`]s with compiled regexes. [`StepRules`] then
//! assembles those rules for whichever step is active.
//!
//! Every field is optional unless it carries `required: true`: an empty or
//! absent value passes without running the length and pattern checks.

use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::schema::document::FieldSpec;

/// Message recorded when a required field is empty
pub const REQUIRED_MESSAGE: &str = "Required";

/// Message recorded when a value does not match the field's pattern
pub const INVALID_FORMAT_MESSAGE: &str = "Invalid format";

/// The `validations` block of a field as written in the document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Validations {
    pub required: Option<bool>,
    pub maxlength: Option<usize>,
    pub pattern: Option<String>,
}

/// A single validation rule
#[derive(Debug, Clone)]
pub enum Rule {
    Required,
    MaxLength(usize),
    Pattern(Regex),
}

impl Rule {
    /// Parse a validations block into rules, in evaluation order
    ///
    /// Fails if `pattern` is not a valid regular expression.
    pub fn parse_all(validations: &Validations) -> Result<Vec<Rule>, regex::Error> {
        let mut rules = Vec::new();
        if validations.required == Some(true) {
            rules.push(Rule::Required);
        }
        if let Some(max) = validations.maxlength {
            rules.push(Rule::MaxLength(max));
        }
        if let Some(ref pattern) = validations.pattern {
            rules.push(Rule::Pattern(Regex::new(pattern)?));
        }
        Ok(rules)
    }

    /// Check a non-empty value against this rule
    fn check(&self, value: &str) -> Result<(), String> {
        match self {
            // Emptiness is decided before individual rules run
            Rule::Required => Ok(()),
            Rule::MaxLength(max) => {
                if value.chars().count() > *max {
                    Err(format!("Must be at most {} characters", max))
                } else {
                    Ok(())
                }
            }
            Rule::Pattern(re) => {
                if re.is_match(value) {
                    Ok(())
                } else {
                    Err(INVALID_FORMAT_MESSAGE.to_string())
                }
            }
        }
    }

    /// Short human description, e.g. for `schema show`
    pub fn describe(&self) -> String {
        match self {
            Rule::Required => "required".to_string(),
            Rule::MaxLength(max) => format!("max {}", max),
            Rule::Pattern(re) => format!("pattern {}", re.as_str()),
        }
    }
}

impl PartialEq for Rule {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Rule::Required, Rule::Required) => true,
            (Rule::MaxLength(a), Rule::MaxLength(b)) => a == b,
            (Rule::Pattern(a), Rule::Pattern(b)) => a.as_str() == b.as_str(),
            _ => false,
        }
    }
}

/// Rules for one field
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRules {
    rules: Vec<Rule>,
}

impl FieldRules {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    pub fn is_required(&self) -> bool {
        self.rules.iter().any(|r| matches!(r, Rule::Required))
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Validate a value, returning the first failure message
    pub fn validate(&self, value: Option<&str>) -> Result<(), String> {
        let value = value.unwrap_or("");
        if value.is_empty() {
            return if self.is_required() {
                Err(REQUIRED_MESSAGE.to_string())
            } else {
                Ok(())
            };
        }
        self.rules.iter().try_for_each(|rule| rule.check(value))
    }
}

/// The ruleset of one step: field name to rules, in field order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepRules {
    fields: IndexMap<String, FieldRules>,
}

impl StepRules {
    /// Build the ruleset for a step's fields
    pub fn build(fields: &[FieldSpec]) -> Self {
        let fields: IndexMap<String, FieldRules> = fields
            .iter()
            .map(|f| (f.name.clone(), FieldRules::new(f.rules.clone())))
            .collect();
        tracing::debug!(fields = fields.len(), "built step ruleset");
        Self { fields }
    }

    pub fn get(&self, name: &str) -> Option<&FieldRules> {
        self.fields.get(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Validate a set of field values
    ///
    /// Values for names outside the ruleset are ignored.
    pub fn validate(&self, values: &IndexMap<String, String>) -> ValidationReport {
        let errors = self
            .fields
            .iter()
            .filter_map(|(name, rules)| {
                rules
                    .validate(values.get(name).map(String::as_str))
                    .err()
                    .map(|message| (name.clone(), message))
            })
            .collect();
        ValidationReport { errors }
    }
}

/// Per-field validation errors for one step
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    errors: IndexMap<String, String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn errors(&self) -> &IndexMap<String, String> {
        &self.errors
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::document::FieldType;

    fn field(name: &str, validations: Validations) -> FieldSpec {
        FieldSpec {
            name: name.to_string(),
            label: name.to_string(),
            placeholder: None,
            field_type: FieldType::Text,
            options: Vec::new(),
            rules: Rule::parse_all(&validations).unwrap(),
        }
    }

    fn values(pairs: &[(&str, &str)]) -> IndexMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn aadhaar() -> FieldSpec {
        field(
            "aadhaar",
            Validations {
                required: Some(true),
                maxlength: Some(12),
                pattern: Some("^[0-9]{12}$".to_string()),
            },
        )
    }

    #[test]
    fn test_parse_order() {
        let rules = Rule::parse_all(&Validations {
            required: Some(true),
            maxlength: Some(3),
            pattern: Some("^a".to_string()),
        })
        .unwrap();
        assert_eq!(
            rules,
            vec![
                Rule::Required,
                Rule::MaxLength(3),
                Rule::Pattern(Regex::new("^a").unwrap())
            ]
        );
    }

    #[test]
    fn test_required_false_adds_no_rule() {
        let rules = Rule::parse_all(&Validations {
            required: Some(false),
            ..Default::default()
        })
        .unwrap();
        assert!(rules.is_empty());
    }

    #[test]
    fn test_invalid_pattern_fails() {
        let result = Rule::parse_all(&Validations {
            pattern: Some("([0-9]".to_string()),
            ..Default::default()
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_required_empty_fails() {
        let rules = StepRules::build(&[aadhaar()]);
        let report = rules.validate(&values(&[("aadhaar", "")]));
        assert_eq!(report.error("aadhaar"), Some(REQUIRED_MESSAGE));

        let report = rules.validate(&IndexMap::new());
        assert_eq!(report.error("aadhaar"), Some(REQUIRED_MESSAGE));
    }

    #[test]
    fn test_optional_empty_passes_even_with_pattern() {
        let f = field(
            "pan",
            Validations {
                maxlength: Some(10),
                pattern: Some("^[A-Z]{5}[0-9]{4}[A-Z]$".to_string()),
                ..Default::default()
            },
        );
        let rules = StepRules::build(&[f]);
        assert!(rules.validate(&values(&[("pan", "")])).is_valid());
        assert!(rules.validate(&IndexMap::new()).is_valid());
    }

    #[test]
    fn test_maxlength_counts_characters() {
        let f = field(
            "name",
            Validations {
                maxlength: Some(3),
                ..Default::default()
            },
        );
        let rules = StepRules::build(&[f]);
        assert!(rules.validate(&values(&[("name", "äöü")])).is_valid());
        let report = rules.validate(&values(&[("name", "abcd")]));
        assert_eq!(report.error("name"), Some("Must be at most 3 characters"));
    }

    #[test]
    fn test_pattern_mismatch() {
        let rules = StepRules::build(&[aadhaar()]);
        let report = rules.validate(&values(&[("aadhaar", "123")]));
        assert_eq!(report.error("aadhaar"), Some(INVALID_FORMAT_MESSAGE));
    }

    #[test]
    fn test_aadhaar_valid() {
        let rules = StepRules::build(&[aadhaar()]);
        assert!(rules.validate(&values(&[("aadhaar", "123456789012")])).is_valid());
    }

    #[test]
    fn test_first_failure_wins() {
        let rules = StepRules::build(&[aadhaar()]);
        let report = rules.validate(&values(&[("aadhaar", "1234567890123")]));
        assert_eq!(report.error("aadhaar"), Some("Must be at most 12 characters"));
    }

    #[test]
    fn test_unknown_values_ignored() {
        let rules = StepRules::build(&[aadhaar()]);
        let report = rules.validate(&values(&[("aadhaar", "123456789012"), ("extra", "")]));
        assert!(report.is_valid());
        assert_eq!(rules.len(), 1);
    }

    #[test]
    fn test_report_keeps_field_order() {
        let rules = StepRules::build(&[
            field("b", Validations { required: Some(true), ..Default::default() }),
            field("a", Validations { required: Some(true), ..Default::default() }),
        ]);
        let report = rules.validate(&IndexMap::new());
        let names: Vec<&str> = report.errors().keys().map(String::as_str).collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn test_build_is_deterministic() {
        let fields = [aadhaar()];
        assert_eq!(StepRules::build(&fields), StepRules::build(&fields));
    }
}
