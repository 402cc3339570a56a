//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::cli::commands::{
    check::CheckArgs, completions::CompletionsArgs, config::ConfigCommands, fill::FillArgs,
    schema::SchemaCommands, validate::ValidateArgs,
};

#[derive(Parser)]
#[command(name = "udyam")]
#[command(author, version, about = "Udyam Registration Form")]
#[command(long_about = "A schema-driven multi-step registration form: Aadhaar and PAN validation steps rendered from a JSON form document.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose (debug) logging on stderr
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Form document to use instead of the configured or built-in one
    #[arg(long, global = true)]
    pub schema: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fill in the form step by step and submit it
    Fill(FillArgs),

    /// Check one step's answers without submitting
    Check(CheckArgs),

    /// Validate a form document
    Validate(ValidateArgs),

    /// Inspect the form document's steps and fields
    #[command(subcommand)]
    Schema(SchemaCommands),

    /// Show effective configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    Completions(CompletionsArgs),
}
