//! Structural validation of form documents with detailed error reporting
//!
//! Before a document is turned into typed steps and fields it is checked
//! against the embedded `form.schema.json`. Violations are reported as miette
//! diagnostics pointing into the document source.

use jsonschema::{validator_for, ValidationError as JsonSchemaError, Validator as JsonValidator};
use miette::{Diagnostic, NamedSource, SourceSpan};
use serde_json::Value as JsonValue;
use thiserror::Error;

use crate::schema::registry::SchemaRegistry;

/// Validation error with source location information
#[derive(Debug, Error, Diagnostic)]
#[error("Form document is malformed: {summary}")]
#[diagnostic(code(udyam::schema::structure))]
pub struct ValidationError {
    summary: String,

    #[source_code]
    src: NamedSource<String>,

    #[related]
    violations: Vec<SchemaViolation>,
}

/// A single structural violation
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
pub struct SchemaViolation {
    #[label("{}", self.hint)]
    span: SourceSpan,

    message: String,
    hint: String,

    #[help]
    help: Option<String>,
}

impl SchemaViolation {
    pub fn new(message: String, hint: String, span: SourceSpan, help: Option<String>) -> Self {
        Self {
            span,
            message,
            hint,
            help,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl ValidationError {
    pub fn new(filename: &str, source: &str, violations: Vec<SchemaViolation>) -> Self {
        let count = violations.len();
        let summary = if count == 1 {
            "1 error".to_string()
        } else {
            format!("{} errors", count)
        };
        Self {
            summary,
            src: NamedSource::new(filename, source.to_string()),
            violations,
        }
    }

    /// Get the number of violations
    pub fn violation_count(&self) -> usize {
        self.violations.len()
    }

    pub fn violations(&self) -> &[SchemaViolation] {
        &self.violations
    }
}

/// Checks raw form documents against the embedded structure schema
pub struct Validator {
    compiled: Option<JsonValidator>,
}

impl Validator {
    /// Compile the structure schema from the registry
    pub fn new(registry: &SchemaRegistry) -> Self {
        let compiled = registry
            .document_structure()
            .and_then(|text| serde_json::from_str::<JsonValue>(&text).ok())
            .and_then(|schema| match validator_for(&schema) {
                Ok(v) => Some(v),
                Err(e) => {
                    tracing::warn!(error = %e, "structure schema failed to compile");
                    None
                }
            });

        Self { compiled }
    }

    /// Parse `content` as JSON and check its structure, returning the parsed value
    pub fn check(&self, content: &str, filename: &str) -> Result<JsonValue, ValidationError> {
        let value: JsonValue = match serde_json::from_str(content) {
            Ok(v) => v,
            Err(e) => {
                let span = find_error_span(content, e.line(), e.column());
                let violation = SchemaViolation::new(
                    format!("JSON parse error: {}", e),
                    "invalid JSON".to_string(),
                    span,
                    Some("Check JSON syntax - quotes, commas, matching braces".to_string()),
                );
                return Err(ValidationError::new(filename, content, vec![violation]));
            }
        };

        // No structure schema available - structure check passes
        let Some(schema) = &self.compiled else {
            return Ok(value);
        };

        let violations: Vec<SchemaViolation> = schema
            .iter_errors(&value)
            .map(|e| error_to_violation(content, &e))
            .collect();

        if violations.is_empty() {
            Ok(value)
        } else {
            Err(ValidationError::new(filename, content, violations))
        }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(&SchemaRegistry)
    }
}

/// Convert a JSON Schema validation error to our violation format
fn error_to_violation(content: &str, error: &JsonSchemaError) -> SchemaViolation {
    let path = error.instance_path.to_string();
    let message = format_schema_error(error);
    let hint = format_error_hint(error);
    let help = generate_help_message(error);

    let span = find_pointer_span(content, &path);

    SchemaViolation::new(message, hint, span, help)
}

/// Format a JSON Schema error into a user-friendly message
fn format_schema_error(error: &JsonSchemaError) -> String {
    let path = if error.instance_path.as_str().is_empty() {
        "document root".to_string()
    } else {
        format!("'{}'", error.instance_path)
    };

    match &error.kind {
        jsonschema::error::ValidationErrorKind::Required { property } => {
            let prop_str = property
                .as_str()
                .map(|s| s.to_string())
                .unwrap_or_else(|| property.to_string());
            format!("Missing required field: {} at {}", prop_str, path)
        }
        jsonschema::error::ValidationErrorKind::Type { kind } => {
            format!("Wrong type at {}: expected {:?}", path, kind)
        }
        jsonschema::error::ValidationErrorKind::Enum { options } => {
            format!(
                "Invalid value at {}: must be one of: {}",
                path,
                format_enum_options(options)
            )
        }
        jsonschema::error::ValidationErrorKind::MinLength { limit } => {
            format!("Value at {} is too short: minimum {} characters", path, limit)
        }
        jsonschema::error::ValidationErrorKind::MinProperties { limit } => {
            format!("Object at {} needs at least {} entries", path, limit)
        }
        jsonschema::error::ValidationErrorKind::Minimum { limit } => {
            format!("Value at {} is too small: minimum {}", path, limit)
        }
        jsonschema::error::ValidationErrorKind::AdditionalProperties { unexpected } => {
            format!("Unknown field(s) at {}: {}", path, unexpected.join(", "))
        }
        _ => format!("Validation error at {}: {}", path, error),
    }
}

fn format_enum_options(options: &JsonValue) -> String {
    if let Some(arr) = options.as_array() {
        arr.iter()
            .map(|v| v.as_str().map(|s| s.to_string()).unwrap_or_else(|| v.to_string()))
            .collect::<Vec<_>>()
            .join(", ")
    } else {
        options.to_string()
    }
}

/// Generate a short hint for the error label
fn format_error_hint(error: &JsonSchemaError) -> String {
    match &error.kind {
        jsonschema::error::ValidationErrorKind::Required { .. } => "required field missing".to_string(),
        jsonschema::error::ValidationErrorKind::Type { .. } => "wrong type".to_string(),
        jsonschema::error::ValidationErrorKind::Enum { .. } => "invalid value".to_string(),
        jsonschema::error::ValidationErrorKind::MinLength { .. } => "too short".to_string(),
        jsonschema::error::ValidationErrorKind::MinProperties { .. } => "empty".to_string(),
        jsonschema::error::ValidationErrorKind::AdditionalProperties { .. } => "unknown field".to_string(),
        _ => "validation error".to_string(),
    }
}

/// Generate a help message with suggestions for fixing the error
fn generate_help_message(error: &JsonSchemaError) -> Option<String> {
    match &error.kind {
        jsonschema::error::ValidationErrorKind::Required { property } => {
            let prop_str = property
                .as_str()
                .map(|s| s.to_string())
                .unwrap_or_else(|| property.to_string());
            Some(format!("Add the '{}' field", prop_str))
        }
        jsonschema::error::ValidationErrorKind::Enum { options } => {
            Some(format!("Valid values: {}", format_enum_options(options)))
        }
        jsonschema::error::ValidationErrorKind::MinProperties { .. } => {
            Some("Define at least one step under 'steps'".to_string())
        }
        jsonschema::error::ValidationErrorKind::AdditionalProperties { unexpected } => {
            if unexpected.len() == 1 {
                Some(format!("Remove the '{}' field or check spelling", unexpected[0]))
            } else {
                Some("Remove unknown fields or check spelling".to_string())
            }
        }
        _ => None,
    }
}

/// Span for a serde_json error location
///
/// `line` is 1-based; `column` is a 1-based byte column within that line.
/// The offset is clamped to the line and moved back onto a char boundary.
fn find_error_span(content: &str, line: usize, column: usize) -> SourceSpan {
    if line == 0 {
        return first_line_span(content);
    }
    let line_start: usize = content
        .split_inclusive('\n')
        .take(line - 1)
        .map(str::len)
        .sum();
    let line_len = content[line_start..]
        .find('\n')
        .unwrap_or(content.len() - line_start);
    let mut offset = line_start + column.saturating_sub(1).min(line_len);
    while !content.is_char_boundary(offset) {
        offset -= 1;
    }
    let rest = &content[offset..];
    let len = rest.find('\n').unwrap_or(rest.len()).max(1);
    (offset, len).into()
}

/// Find the span for a JSON pointer (e.g. "/steps/step1/fields/0/type")
///
/// Object keys are searched in order, each one after the previous match, so
/// the span lands on the innermost key that can be located. Array indices
/// are skipped.
fn find_pointer_span(content: &str, pointer: &str) -> SourceSpan {
    let mut cursor = 0;
    let mut found: Option<SourceSpan> = None;

    for segment in pointer.split('/').filter(|s| !s.is_empty()) {
        if segment.parse::<usize>().is_ok() {
            continue;
        }
        let needle = format!("\"{}\"", segment.replace("~1", "/").replace("~0", "~"));
        match content[cursor..].find(&needle) {
            Some(pos) => {
                let start = cursor + pos;
                found = Some((start, needle.len()).into());
                cursor = start + needle.len();
            }
            None => break,
        }
    }

    found.unwrap_or_else(|| first_line_span(content))
}

fn first_line_span(content: &str) -> SourceSpan {
    let len = content.find('\n').unwrap_or(content.len()).max(1);
    (0, len).into()
}
