//! Shared helper functions for CLI commands
//!
//! This module contains the terminal presentation pieces used by more than
//! one command: document loading, the title banner, the progress indicator,
//! and per-field error listings.

use console::style;
use miette::Result;

use crate::cli::GlobalOpts;
use crate::core::Config;
use crate::form::StepProgress;
use crate::schema::{SchemaDocument, StepSpec, ValidationReport};

/// Effective config with the global `--schema` override applied
pub fn load_config(global: &GlobalOpts) -> Config {
    Config::load().with_overrides(None, global.schema.clone())
}

/// Load the form document named by config, or the built-in one
pub fn load_document(config: &Config) -> Result<SchemaDocument> {
    Ok(SchemaDocument::load(config.schema_path())?)
}

/// Print the document title as a banner
pub fn print_title(document: &SchemaDocument) {
    println!();
    println!("{} {}", style("◆").cyan(), style(document.title()).bold());
    println!("{}", style("─".repeat(50)).dim());
}

/// Render the step indicator, e.g. `● Step 1: Aadhaar ── ○ Step 2: PAN`
pub fn progress_line(document: &SchemaDocument, progress: StepProgress) -> String {
    let separator = format!(" {} ", style("──").dim());
    document
        .steps()
        .iter()
        .enumerate()
        .map(|(i, step)| {
            if i < progress.active() {
                format!("{} {}", style("✓").green(), style(&step.label).dim())
            } else if i == progress.active() {
                format!("{} {}", style("●").cyan(), style(&step.label).bold())
            } else {
                format!("○ {}", style(&step.label).dim())
            }
        })
        .collect::<Vec<_>>()
        .join(separator.as_str())
}

/// Print the indicator and the active step's description
pub fn print_step_header(document: &SchemaDocument, progress: StepProgress, step: &StepSpec) {
    println!();
    println!("{}", progress_line(document, progress));
    println!();
    println!("{}", style(&step.description).bold().underlined());
}

/// Print each failing field with its message beneath it
pub fn print_report(step: &StepSpec, report: &ValidationReport) {
    eprintln!();
    for field in &step.fields {
        if let Some(message) = report.error(&field.name) {
            eprintln!("  {}", field.label);
            eprintln!("    {} {}", style("✗").red(), style(message).red());
        }
    }
}

/// Truncate a string to max_len, adding "..." if truncated
///
/// Counts characters, so multi-byte labels are never split.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
