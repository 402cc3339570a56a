//! Udyam: a schema-driven multi-step registration form
//!
//! Form documents describe ordered steps of fields and buttons. The library
//! types them on load, builds each step's validation rules, and drives the
//! step-by-step flow up to submission of the final step.

pub mod cli;
pub mod core;
pub mod form;
pub mod schema;
pub mod yaml;
