//! `udyam check` command - Validate one step's answers without submitting

use console::style;
use miette::Result;
use std::path::PathBuf;

use crate::cli::helpers::{load_config, load_document, print_report};
use crate::cli::GlobalOpts;
use crate::form::{render_step, Answers, FormState, ScriptedRenderer};
use crate::schema::StepRules;

#[derive(clap::Args, Debug)]
pub struct CheckArgs {
    /// Step key (e.g. step1)
    pub step: String,

    /// Answers file (YAML or JSON)
    #[arg(long, short = 'a')]
    pub answers: PathBuf,
}

pub fn run(args: CheckArgs, global: &GlobalOpts) -> Result<()> {
    let config = load_config(global);
    let document = load_document(&config)?;

    let Some(step) = document.step_by_key(&args.step) else {
        let keys: Vec<&str> = document.steps().iter().map(|s| s.key.as_str()).collect();
        return Err(miette::miette!(
            help = format!("Available steps: {}", keys.join(", ")),
            "Unknown step: {}",
            args.step
        ));
    };

    let mut renderer = ScriptedRenderer::new(Answers::from_file(&args.answers)?);
    let mut state = FormState::new(step);
    render_step(&mut renderer, step, &mut state)?;

    let report = StepRules::build(&step.fields).validate(state.values());
    if !report.is_valid() {
        print_report(step, &report);
        miette::bail!(
            "Step '{}' failed validation ({} field(s))",
            step.key,
            report.len()
        );
    }

    if !global.quiet {
        println!(
            "{} Step {} passes validation ({} field(s) answered)",
            style("✓").green(),
            style(&step.key).cyan(),
            state.values().len()
        );
    }
    Ok(())
}
