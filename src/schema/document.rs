//! Form documents: ordered steps, their fields and buttons
//!
//! A document goes through three stages on load: a structure check against
//! the embedded JSON Schema, deserialization into raw structs, and conversion
//! into the typed model below. Anything that would only fail later (a bad
//! regex, a radio without options, a duplicated field name) is rejected here.

use indexmap::IndexMap;
use miette::Diagnostic;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::schema::registry::{SchemaRegistry, DEFAULT_FORM};
use crate::schema::rules::{Rule, Validations};
use crate::schema::validator::{ValidationError, Validator};

/// Title used when a document does not set one
pub const DEFAULT_TITLE: &str = "Udyam Registration Form";

/// Errors raised while loading a form document
#[derive(Debug, Error, Diagnostic)]
pub enum SchemaError {
    #[error("Failed to read form document {path}")]
    #[diagnostic(code(udyam::schema::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Structure(#[from] ValidationError),

    #[error("Form document has an unexpected shape: {0}")]
    #[diagnostic(code(udyam::schema::shape))]
    Shape(#[source] serde_json::Error),

    #[error("Form document defines no steps")]
    #[diagnostic(code(udyam::schema::no_steps))]
    NoSteps,

    #[error("Step '{step}' defines field '{field}' more than once")]
    #[diagnostic(
        code(udyam::schema::duplicate_field),
        help("Field names must be unique within a step")
    )]
    DuplicateField { step: String, field: String },

    #[error("Radio field '{field}' in step '{step}' has no options")]
    #[diagnostic(code(udyam::schema::missing_options))]
    MissingOptions { step: String, field: String },

    #[error("Invalid pattern for field '{field}' in step '{step}'")]
    #[diagnostic(
        code(udyam::schema::invalid_pattern),
        help("Patterns use Rust regex syntax, e.g. ^[0-9]{{12}}$")
    )]
    InvalidPattern {
        step: String,
        field: String,
        #[source]
        source: regex::Error,
    },

    #[error("Embedded form '{0}' is missing from the build")]
    #[diagnostic(code(udyam::schema::missing_asset))]
    MissingAsset(String),
}

/// Kind of input control a field renders as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Radio,
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Text => write!(f, "text"),
            FieldType::Radio => write!(f, "radio"),
        }
    }
}

/// What activating a button does
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ButtonAction {
    /// Validate the step, then advance or submit. Holds the raw action name.
    Validate(String),
    /// Request an OTP; never touches form values or progress
    SendOtp,
    /// Any other action; activating it has no effect
    Other(String),
}

impl ButtonAction {
    /// Classify an action name: anything containing "validate" validates
    pub fn parse(action: &str) -> Self {
        if action == "sendOTP" {
            ButtonAction::SendOtp
        } else if action.contains("validate") {
            ButtonAction::Validate(action.to_string())
        } else {
            ButtonAction::Other(action.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ButtonAction::Validate(name) | ButtonAction::Other(name) => name,
            ButtonAction::SendOtp => "sendOTP",
        }
    }

    pub fn validates(&self) -> bool {
        matches!(self, ButtonAction::Validate(_))
    }
}

impl fmt::Display for ButtonAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A button on a step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonSpec {
    pub text: String,
    pub action: ButtonAction,
}

/// One field's shape and validation rules
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: String,
    pub label: String,
    pub placeholder: Option<String>,
    pub field_type: FieldType,
    /// Choices for radio fields, in display order
    pub options: Vec<String>,
    pub rules: Vec<Rule>,
}

impl FieldSpec {
    pub fn is_required(&self) -> bool {
        self.rules.iter().any(|r| matches!(r, Rule::Required))
    }

    /// Hard input cap, if the field declares `maxlength`
    pub fn max_length(&self) -> Option<usize> {
        self.rules.iter().find_map(|r| match r {
            Rule::MaxLength(max) => Some(*max),
            _ => None,
        })
    }

    pub fn pattern(&self) -> Option<&Regex> {
        self.rules.iter().find_map(|r| match r {
            Rule::Pattern(re) => Some(re),
            _ => None,
        })
    }
}

/// One step of the form
#[derive(Debug, Clone, PartialEq)]
pub struct StepSpec {
    pub key: String,
    /// Progress indicator label
    pub label: String,
    pub description: String,
    pub fields: Vec<FieldSpec>,
    pub buttons: Vec<ButtonSpec>,
}

impl StepSpec {
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn button(&self, text: &str) -> Option<&ButtonSpec> {
        self.buttons.iter().find(|b| b.text == text)
    }

    /// First button whose action validates the step
    pub fn validating_button(&self) -> Option<&ButtonSpec> {
        self.buttons.iter().find(|b| b.action.validates())
    }
}

/// A loaded, typed form document
#[derive(Debug, Clone)]
pub struct SchemaDocument {
    title: String,
    steps: Vec<StepSpec>,
    source: String,
}

#[derive(Debug, Deserialize)]
struct RawDocument {
    title: Option<String>,
    steps: IndexMap<String, RawStep>,
}

#[derive(Debug, Deserialize)]
struct RawStep {
    label: Option<String>,
    description: String,
    #[serde(default)]
    fields: Vec<RawField>,
    #[serde(default)]
    buttons: Vec<RawButton>,
}

#[derive(Debug, Deserialize)]
struct RawField {
    name: String,
    label: String,
    placeholder: Option<String>,
    #[serde(rename = "type")]
    field_type: FieldType,
    #[serde(default)]
    options: Vec<String>,
    #[serde(default)]
    validations: Validations,
}

#[derive(Debug, Deserialize)]
struct RawButton {
    text: String,
    action: String,
}

impl SchemaDocument {
    /// Load the built-in registration form
    pub fn embedded() -> Result<Self, SchemaError> {
        let content = SchemaRegistry
            .default_form()
            .ok_or_else(|| SchemaError::MissingAsset(DEFAULT_FORM.to_string()))?;
        Self::parse(&content, DEFAULT_FORM)
    }

    /// Load a document from disk
    pub fn from_file(path: &Path) -> Result<Self, SchemaError> {
        let content = std::fs::read_to_string(path).map_err(|source| SchemaError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let filename = path.file_name().unwrap_or_default().to_string_lossy();
        Self::parse(&content, &filename)
    }

    /// Load from `path` if given, otherwise the built-in form
    pub fn load(path: Option<&Path>) -> Result<Self, SchemaError> {
        match path {
            Some(p) => Self::from_file(p),
            None => Self::embedded(),
        }
    }

    /// Parse and type a document from JSON text
    pub fn parse(content: &str, filename: &str) -> Result<Self, SchemaError> {
        Validator::default().check(content, filename)?;
        // Typed from the text so step keys keep document order
        let raw: RawDocument = serde_json::from_str(content).map_err(SchemaError::Shape)?;

        if raw.steps.is_empty() {
            return Err(SchemaError::NoSteps);
        }

        let steps = raw
            .steps
            .into_iter()
            .enumerate()
            .map(|(index, (key, step))| type_step(index, key, step))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(file = filename, steps = steps.len(), "loaded form document");

        Ok(Self {
            title: raw.title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            steps,
            source: content.to_string(),
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn steps(&self) -> &[StepSpec] {
        &self.steps
    }

    pub fn step(&self, index: usize) -> Option<&StepSpec> {
        self.steps.get(index)
    }

    pub fn step_by_key(&self, key: &str) -> Option<&StepSpec> {
        self.steps.iter().find(|s| s.key == key)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The JSON text the document was parsed from
    pub fn source(&self) -> &str {
        &self.source
    }
}

fn type_step(index: usize, key: String, raw: RawStep) -> Result<StepSpec, SchemaError> {
    let mut seen = HashSet::new();
    let mut fields = Vec::with_capacity(raw.fields.len());

    for field in raw.fields {
        if !seen.insert(field.name.clone()) {
            return Err(SchemaError::DuplicateField {
                step: key,
                field: field.name,
            });
        }
        if field.field_type == FieldType::Radio && field.options.is_empty() {
            return Err(SchemaError::MissingOptions {
                step: key,
                field: field.name,
            });
        }
        let rules = match Rule::parse_all(&field.validations) {
            Ok(rules) => rules,
            Err(source) => {
                return Err(SchemaError::InvalidPattern {
                    step: key,
                    field: field.name,
                    source,
                })
            }
        };
        fields.push(FieldSpec {
            name: field.name,
            label: field.label,
            placeholder: field.placeholder,
            field_type: field.field_type,
            options: field.options,
            rules,
        });
    }

    let buttons = raw
        .buttons
        .into_iter()
        .map(|b| ButtonSpec {
            text: b.text,
            action: ButtonAction::parse(&b.action),
        })
        .collect();

    Ok(StepSpec {
        label: raw
            .label
            .unwrap_or_else(|| format!("Step {}: {}", index + 1, key)),
        key,
        description: raw.description,
        fields,
        buttons,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_with_field(field: &str) -> String {
        format!(
            r#"{{
  "steps": {{
    "only": {{
      "description": "d",
      "fields": [{}],
      "buttons": [{{ "text": "Go", "action": "validate" }}]
    }}
  }}
}}"#,
            field
        )
    }

    #[test]
    fn test_embedded_document() {
        let doc = SchemaDocument::embedded().unwrap();
        assert_eq!(doc.title(), "Udyam Registration Form");
        assert_eq!(doc.len(), 2);
        assert_eq!(doc.steps()[0].key, "step1");
        assert_eq!(doc.steps()[1].key, "step2");
        assert_eq!(doc.steps()[0].label, "Step 1: Aadhaar Validation");
        assert_eq!(doc.steps()[1].label, "Step 2: PAN Validation");

        let aadhaar = doc.steps()[0].field("aadhaar").unwrap();
        assert!(aadhaar.is_required());
        assert_eq!(aadhaar.max_length(), Some(12));
        assert_eq!(aadhaar.pattern().unwrap().as_str(), "^[0-9]{12}$");
    }

    #[test]
    fn test_step_order_follows_document() {
        let content = r#"{
  "steps": {
    "zeta": { "description": "z", "fields": [], "buttons": [] },
    "alpha": { "description": "a", "fields": [], "buttons": [] }
  }
}"#;
        let doc = SchemaDocument::parse(content, "order.json").unwrap();
        let keys: Vec<&str> = doc.steps().iter().map(|s| s.key.as_str()).collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
        assert_eq!(doc.steps()[1].label, "Step 2: alpha");
        assert_eq!(doc.title(), DEFAULT_TITLE);
    }

    #[test]
    fn test_invalid_pattern_rejected_at_load() {
        let content = doc_with_field(
            r#"{ "name": "a", "label": "A", "type": "text", "validations": { "pattern": "([0-9]" } }"#,
        );
        let err = SchemaDocument::parse(&content, "bad.json").unwrap_err();
        match err {
            SchemaError::InvalidPattern { step, field, .. } => {
                assert_eq!(step, "only");
                assert_eq!(field, "a");
            }
            other => panic!("expected InvalidPattern, got {:?}", other),
        }
    }

    #[test]
    fn test_radio_without_options_rejected() {
        let content = doc_with_field(r#"{ "name": "kind", "label": "Kind", "type": "radio" }"#);
        let err = SchemaDocument::parse(&content, "bad.json").unwrap_err();
        assert!(matches!(err, SchemaError::MissingOptions { .. }));
    }

    #[test]
    fn test_duplicate_field_rejected() {
        let content = doc_with_field(
            r#"{ "name": "a", "label": "A", "type": "text" }, { "name": "a", "label": "B", "type": "text" }"#,
        );
        let err = SchemaDocument::parse(&content, "bad.json").unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateField { .. }));
    }

    #[test]
    fn test_structure_error_surfaces() {
        let err = SchemaDocument::parse(r#"{"steps": []}"#, "bad.json").unwrap_err();
        assert!(matches!(err, SchemaError::Structure(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = SchemaDocument::from_file(Path::new("/nonexistent/form.json")).unwrap_err();
        assert!(matches!(err, SchemaError::Io { .. }));
    }

    #[test]
    fn test_button_action_classification() {
        assert_eq!(ButtonAction::parse("sendOTP"), ButtonAction::SendOtp);
        assert!(ButtonAction::parse("validate").validates());
        assert!(ButtonAction::parse("validatePAN").validates());
        assert!(!ButtonAction::parse("sendOTP").validates());
        assert_eq!(
            ButtonAction::parse("reset"),
            ButtonAction::Other("reset".to_string())
        );
        assert_eq!(ButtonAction::parse("validatePAN").as_str(), "validatePAN");
    }

    #[test]
    fn test_validating_button() {
        let doc = SchemaDocument::embedded().unwrap();
        let step1 = &doc.steps()[0];
        assert_eq!(step1.validating_button().unwrap().text, "Validate & Continue");
        assert_eq!(step1.button("Send OTP").unwrap().action, ButtonAction::SendOtp);
    }
}
