//! Schema system - form documents, structure checks, and validation rules

pub mod document;
pub mod registry;
pub mod rules;
pub mod validator;

pub use document::{
    ButtonAction, ButtonSpec, FieldSpec, FieldType, SchemaDocument, SchemaError, StepSpec,
};
pub use registry::SchemaRegistry;
pub use rules::{FieldRules, Rule, StepRules, ValidationReport, Validations};
pub use validator::{ValidationError, Validator};
