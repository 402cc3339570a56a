//! Core module - configuration shared by the CLI commands

pub mod config;

pub use config::Config;
