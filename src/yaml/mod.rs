//! YAML handling for answers files

pub mod diagnostics;

pub use diagnostics::YamlSyntaxError;
