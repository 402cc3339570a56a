//! Answers documents for non-interactive runs
//!
//! An answers document maps step keys to field values:
//!
//! ```yaml
//! step1:
//!   aadhaar: "123456789012"
//!   entrepreneurName: Asha Rao
//! step2:
//!   orgType: Proprietary
//!   pan: ABCDE1234F
//! ```
//!
//! Scalars are taken as text; quote numbers that carry leading zeros. JSON
//! documents are accepted as well, since they parse as YAML.

use indexmap::IndexMap;
use miette::Diagnostic;
use serde_yml::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::yaml::YamlSyntaxError;

#[derive(Debug, Error, Diagnostic)]
pub enum AnswersError {
    #[error("Failed to read answers file {path}")]
    #[diagnostic(code(udyam::answers::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Syntax(#[from] YamlSyntaxError),

    #[error("Answers must map step keys to field values")]
    #[diagnostic(
        code(udyam::answers::shape),
        help("Expected e.g.\nstep1:\n  aadhaar: \"123456789012\"")
    )]
    Shape,

    #[error("Answer for '{step}.{field}' must be a single value")]
    #[diagnostic(code(udyam::answers::not_scalar))]
    NotScalar { step: String, field: String },
}

/// Field values per step key
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Answers {
    steps: IndexMap<String, IndexMap<String, String>>,
}

impl Answers {
    pub fn from_file(path: &Path) -> Result<Self, AnswersError> {
        let content = std::fs::read_to_string(path).map_err(|source| AnswersError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let filename = path.file_name().unwrap_or_default().to_string_lossy();
        Self::parse(&content, &filename)
    }

    pub fn parse(content: &str, filename: &str) -> Result<Self, AnswersError> {
        let value: Value = serde_yml::from_str(content)
            .map_err(|e| YamlSyntaxError::from_serde_error(&e, content, filename))?;

        if value.is_null() {
            return Ok(Self::default());
        }
        let raw: IndexMap<String, Option<IndexMap<String, Value>>> =
            serde_yml::from_value(value).map_err(|_| AnswersError::Shape)?;

        let mut steps = IndexMap::new();
        for (step_key, fields) in raw {
            let mut values = IndexMap::new();
            for (name, value) in fields.unwrap_or_default() {
                if value.is_null() {
                    continue;
                }
                let text = scalar_text(&value).ok_or_else(|| AnswersError::NotScalar {
                    step: step_key.clone(),
                    field: name.clone(),
                })?;
                values.insert(name, text);
            }
            steps.insert(step_key, values);
        }

        Ok(Self { steps })
    }

    pub fn value(&self, step: &str, field: &str) -> Option<&str> {
        self.steps
            .get(step)
            .and_then(|fields| fields.get(field))
            .map(String::as_str)
    }

    pub fn step(&self, step: &str) -> Option<&IndexMap<String, String>> {
        self.steps.get(step)
    }

}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yaml() {
        let answers = Answers::parse(
            "step1:\n  aadhaar: \"012345678901\"\n  count: 12\nstep2:\n  pan: ABCDE1234F\n",
            "answers.yaml",
        )
        .unwrap();
        assert_eq!(answers.value("step1", "aadhaar"), Some("012345678901"));
        assert_eq!(answers.value("step1", "count"), Some("12"));
        assert_eq!(answers.value("step2", "pan"), Some("ABCDE1234F"));
        assert_eq!(answers.value("step2", "missing"), None);
        assert_eq!(answers.step("step1").map(|f| f.len()), Some(2));
    }

    #[test]
    fn test_parse_json() {
        let answers =
            Answers::parse(r#"{"step1": {"aadhaar": "123456789012"}}"#, "a.json").unwrap();
        assert_eq!(answers.value("step1", "aadhaar"), Some("123456789012"));
    }

    #[test]
    fn test_empty_document() {
        let answers = Answers::parse("", "a.yaml").unwrap();
        assert!(answers.step("step1").is_none());
    }

    #[test]
    fn test_null_values_skipped() {
        let answers = Answers::parse("step1:\n  aadhaar:\n", "a.yaml").unwrap();
        assert_eq!(answers.value("step1", "aadhaar"), None);
        assert!(answers.step("step1").unwrap().is_empty());
    }

    #[test]
    fn test_list_value_rejected() {
        let err = Answers::parse("step1:\n  aadhaar: [1, 2]\n", "a.yaml").unwrap_err();
        assert!(matches!(err, AnswersError::NotScalar { .. }));
    }

    #[test]
    fn test_non_mapping_rejected() {
        let err = Answers::parse("- a\n- b\n", "a.yaml").unwrap_err();
        assert!(matches!(err, AnswersError::Shape));
    }

    #[test]
    fn test_null_step_is_empty() {
        let answers = Answers::parse("step1:\nstep2:\n  pan: ABCDE1234F\n", "a.yaml").unwrap();
        assert!(answers.step("step1").unwrap().is_empty());
        assert_eq!(answers.value("step2", "pan"), Some("ABCDE1234F"));
    }

    #[test]
    fn test_scalar_step_rejected() {
        let err = Answers::parse("step1: oops\n", "a.yaml").unwrap_err();
        assert!(matches!(err, AnswersError::Shape));
    }

    #[test]
    fn test_syntax_error() {
        let err = Answers::parse("step1:\n  a: [unclosed\n", "a.yaml").unwrap_err();
        assert!(matches!(err, AnswersError::Syntax(_)));
    }
}
