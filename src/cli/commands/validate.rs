//! `udyam validate` command - Validate a form document

use console::style;
use miette::Result;
use std::path::PathBuf;

use crate::cli::helpers::load_config;
use crate::cli::GlobalOpts;
use crate::schema::SchemaDocument;

#[derive(clap::Args, Debug)]
pub struct ValidateArgs {
    /// Form document to check (default: configured or built-in form)
    #[arg()]
    pub path: Option<PathBuf>,
}

pub fn run(args: ValidateArgs, global: &GlobalOpts) -> Result<()> {
    let config = load_config(global);
    let path = args.path.as_deref().or(config.schema_path());
    let document = SchemaDocument::load(path)?;

    let name = path
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "built-in form".to_string());
    let fields: usize = document.steps().iter().map(|s| s.fields.len()).sum();

    if !global.quiet {
        println!(
            "{} {} is valid: {} step(s), {} field(s)",
            style("✓").green(),
            style(name).cyan(),
            document.len(),
            fields
        );
    }
    Ok(())
}
