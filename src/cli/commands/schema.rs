//! `udyam schema` command - Inspect the form document
//!
//! Lists the steps of the active form document and shows each step's fields,
//! rules, and buttons.

use clap::Subcommand;
use console::style;
use miette::Result;
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::{load_config, load_document, truncate_str};
use crate::cli::GlobalOpts;
use crate::schema::{FieldType, StepSpec};

#[derive(Subcommand, Debug)]
pub enum SchemaCommands {
    /// List the form's steps
    List,

    /// Show fields and buttons of one step, or of every step
    Show(ShowArgs),
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Step key (e.g. step1)
    pub step: Option<String>,

    /// Print the raw JSON form document instead of a summary
    #[arg(long)]
    pub raw: bool,
}

pub fn run(cmd: SchemaCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        SchemaCommands::List => list_steps(global),
        SchemaCommands::Show(args) => show_steps(args, global),
    }
}

fn list_steps(global: &GlobalOpts) -> Result<()> {
    let document = load_document(&load_config(global))?;

    let mut builder = Builder::default();
    builder.push_record(["#", "KEY", "LABEL", "FIELDS", "BUTTONS", "DESCRIPTION"]);
    for (i, step) in document.steps().iter().enumerate() {
        builder.push_record([
            (i + 1).to_string(),
            step.key.clone(),
            step.label.clone(),
            step.fields.len().to_string(),
            step.buttons.len().to_string(),
            truncate_str(&step.description, 40),
        ]);
    }

    println!("{}\n", style(document.title()).bold());
    println!("{}", builder.build().with(Style::sharp()));
    println!("\nUse 'udyam schema show <step>' for field details");
    Ok(())
}

fn show_steps(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let document = load_document(&load_config(global))?;

    if args.raw {
        println!("{}", document.source());
        return Ok(());
    }

    let steps: Vec<&StepSpec> = match args.step {
        Some(ref key) => match document.step_by_key(key) {
            Some(step) => vec![step],
            None => {
                let keys: Vec<&str> = document.steps().iter().map(|s| s.key.as_str()).collect();
                return Err(miette::miette!(
                    help = format!("Available steps: {}", keys.join(", ")),
                    "Unknown step: {}",
                    key
                ));
            }
        },
        None => document.steps().iter().collect(),
    };

    for (i, step) in steps.iter().enumerate() {
        if i > 0 {
            println!();
        }
        print_step(step);
    }
    Ok(())
}

fn print_step(step: &StepSpec) {
    println!("{} ({})", style(&step.label).bold(), step.key);
    println!("{}", "=".repeat(step.label.chars().count()));
    println!("{}\n", step.description);

    let mut builder = Builder::default();
    builder.push_record(["NAME", "TYPE", "LABEL", "RULES"]);
    for field in &step.fields {
        let rules: Vec<String> = field.rules.iter().map(|r| r.describe()).collect();
        builder.push_record([
            field.name.clone(),
            field.field_type.to_string(),
            field.label.clone(),
            if rules.is_empty() {
                "optional".to_string()
            } else {
                rules.join(", ")
            },
        ]);
    }
    println!("{}", builder.build().with(Style::sharp()));

    let radios: Vec<_> = step
        .fields
        .iter()
        .filter(|f| f.field_type == FieldType::Radio)
        .collect();
    if !radios.is_empty() {
        println!("\nOptions:");
        for field in radios {
            println!("  {}: {}", field.name, field.options.join(", "));
        }
    }

    println!("\nButtons:");
    for button in &step.buttons {
        println!("  {:<24} {}", button.text, style(&button.action).dim());
    }
}
