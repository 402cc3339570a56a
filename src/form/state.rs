//! Live values and errors of the active step

use indexmap::IndexMap;

use crate::form::submit::Payload;
use crate::schema::{StepSpec, ValidationReport};

/// Field values and per-field error messages for one step
///
/// A fresh state starts with every field unset. Values are stored exactly
/// as handed in; input caps are applied by the renderer before this point.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    step_key: String,
    values: IndexMap<String, String>,
    errors: IndexMap<String, String>,
}

impl FormState {
    /// Empty state for a step
    pub fn new(step: &StepSpec) -> Self {
        Self {
            step_key: step.key.clone(),
            values: IndexMap::new(),
            errors: IndexMap::new(),
        }
    }

    pub fn step_key(&self) -> &str {
        &self.step_key
    }

    /// Store a value; the field's recorded error no longer applies to it
    pub fn set_value(&mut self, field: &str, value: impl Into<String>) {
        self.errors.shift_remove(field);
        self.values.insert(field.to_string(), value.into());
    }

    pub fn value(&self, field: &str) -> Option<&str> {
        self.values.get(field).map(String::as_str)
    }

    pub fn values(&self) -> &IndexMap<String, String> {
        &self.values
    }

    pub fn error(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn errors(&self) -> &IndexMap<String, String> {
        &self.errors
    }

    /// Replace the recorded errors with those of a validation run
    pub fn apply_report(&mut self, report: &ValidationReport) {
        self.errors = report.errors().clone();
    }

    /// True when no field has a value yet
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Snapshot of the current values for submission
    pub fn payload(&self) -> Payload {
        Payload::from(self.values.clone())
    }
}
