//! `udyam fill` command - Fill in the form and submit it

use console::style;
use miette::Result;
use std::path::PathBuf;

use crate::cli::helpers::{load_config, load_document, print_report, print_step_header, print_title};
use crate::cli::GlobalOpts;
use crate::form::{
    render_step, Answers, ConsoleNotifier, DryRunSubmitter, FieldRenderer, HttpSubmitter,
    ScriptedRenderer, StepController, Submitter, TerminalRenderer, Transition,
};
use crate::schema::SchemaDocument;

#[derive(clap::Args, Debug)]
pub struct FillArgs {
    /// Answers file (YAML or JSON) - fill without prompting
    #[arg(long, short = 'a')]
    pub answers: Option<PathBuf>,

    /// Submission endpoint (overrides config)
    #[arg(long)]
    pub submit_url: Option<String>,

    /// Print the final payload instead of submitting it
    #[arg(long)]
    pub dry_run: bool,
}

pub fn run(args: FillArgs, global: &GlobalOpts) -> Result<()> {
    let config = load_config(global).with_overrides(args.submit_url.clone(), None);
    let document = load_document(&config)?;
    let notifier = ConsoleNotifier::new(global.quiet);

    match (&args.answers, args.dry_run) {
        (Some(path), true) => {
            let renderer = ScriptedRenderer::new(Answers::from_file(path)?);
            drive(&document, DryRunSubmitter, notifier, renderer, false)
        }
        (Some(path), false) => {
            let renderer = ScriptedRenderer::new(Answers::from_file(path)?);
            let submitter = HttpSubmitter::new(config.submit_url());
            drive(&document, submitter, notifier, renderer, false)
        }
        (None, true) => drive(&document, DryRunSubmitter, notifier, TerminalRenderer::new(), true),
        (None, false) => {
            let submitter = HttpSubmitter::new(config.submit_url());
            drive(&document, submitter, notifier, TerminalRenderer::new(), true)
        }
    }
}

/// Run the flow until the form is submitted
///
/// In interactive mode a rejected step or failed submission re-renders the
/// step with its current values. Otherwise either one ends the run with an
/// error.
fn drive<S, R>(
    document: &SchemaDocument,
    submitter: S,
    notifier: ConsoleNotifier,
    mut renderer: R,
    interactive: bool,
) -> Result<()>
where
    S: Submitter,
    R: FieldRenderer,
{
    let mut controller = StepController::new(document, submitter, notifier)?;
    print_title(document);

    while !controller.is_submitted() {
        let step = controller.current_step();
        print_step_header(document, controller.progress(), step);
        render_step(&mut renderer, step, controller.state_mut())?;

        loop {
            let Some(button) = renderer.choose_button(step)? else {
                miette::bail!("Step '{}' has no button that validates it", step.key);
            };

            match controller.activate(button)? {
                Transition::OtpRequested | Transition::Ignored => continue,
                Transition::Advanced { .. } | Transition::Submitted => break,
                Transition::Rejected(report) => {
                    print_report(step, &report);
                    if !interactive {
                        miette::bail!(
                            "Step '{}' failed validation ({} field(s))",
                            step.key,
                            report.len()
                        );
                    }
                    break;
                }
                Transition::SubmissionFailed(message) => {
                    if !interactive {
                        miette::bail!("{}", message);
                    }
                    println!("{}", style("Correct the values or activate the button again.").dim());
                    break;
                }
            }
        }
    }

    Ok(())
}
