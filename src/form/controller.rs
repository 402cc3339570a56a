//! Step controller: validation, progression, and final submission
//!
//! The controller owns the [`StepProgress`] and the active step's
//! [`FormState`]. Activating a validating button runs the step's ruleset;
//! on success a non-final step advances with a fresh, empty state, while the
//! final step hands its values to the [`Submitter`]. The OTP button only
//! raises a notice.
//!
//! Submission can also be driven in two halves with
//! [`StepController::begin_submission`] and
//! [`StepController::finish_submission`]. Between those calls the phase is
//! [`Phase::Submitting`] and every activation is refused.

use miette::Diagnostic;
use thiserror::Error;

use crate::form::notify::{Notice, Notifier};
use crate::form::progress::StepProgress;
use crate::form::state::FormState;
use crate::form::submit::{Payload, SubmissionOutcome, Submitter};
use crate::schema::{ButtonAction, ButtonSpec, SchemaDocument, StepRules, StepSpec, ValidationReport};

#[derive(Debug, Error, Diagnostic)]
pub enum FlowError {
    #[error("Form document has no steps")]
    #[diagnostic(code(udyam::flow::no_steps))]
    NoSteps,

    #[error("A submission is already in flight")]
    #[diagnostic(code(udyam::flow::in_flight))]
    SubmissionInFlight,

    #[error("The form has already been submitted")]
    #[diagnostic(code(udyam::flow::submitted))]
    AlreadySubmitted,

    #[error("Step '{step}' is not the final step")]
    #[diagnostic(code(udyam::flow::not_final))]
    NotFinalStep { step: String },

    #[error("Step '{step}' has no button '{button}'")]
    #[diagnostic(code(udyam::flow::unknown_button))]
    UnknownButton { step: String, button: String },
}

/// Where the flow stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Filling in the step at `StepProgress::active`
    Active,
    /// Final payload handed to the submitter, outcome pending
    Submitting,
    /// Terminal
    Submitted,
}

/// What an activation did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Advanced { from: usize, to: usize },
    /// Validation failed; errors are recorded in the form state
    Rejected(ValidationReport),
    Submitted,
    /// The submitter failed; the flow stays on the final step
    SubmissionFailed(String),
    OtpRequested,
    /// The button's action has no effect
    Ignored,
}

pub struct StepController<'a, S, N> {
    document: &'a SchemaDocument,
    progress: StepProgress,
    phase: Phase,
    state: FormState,
    rules: StepRules,
    submitter: S,
    notifier: N,
}

impl<'a, S: Submitter, N: Notifier> StepController<'a, S, N> {
    /// Start on the first step of `document`
    pub fn new(document: &'a SchemaDocument, submitter: S, notifier: N) -> Result<Self, FlowError> {
        let progress = StepProgress::new(document.len()).ok_or(FlowError::NoSteps)?;
        let first = document.step(0).ok_or(FlowError::NoSteps)?;
        Ok(Self {
            document,
            progress,
            phase: Phase::Active,
            state: FormState::new(first),
            rules: StepRules::build(&first.fields),
            submitter,
            notifier,
        })
    }

    pub fn progress(&self) -> StepProgress {
        self.progress
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_submitted(&self) -> bool {
        self.phase == Phase::Submitted
    }

    pub fn current_step(&self) -> &'a StepSpec {
        // progress.active() < document.len() by construction
        &self.document.steps()[self.progress.active()]
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut FormState {
        &mut self.state
    }

    pub fn rules(&self) -> &StepRules {
        &self.rules
    }

    pub fn submitter(&self) -> &S {
        &self.submitter
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Activate the current step's button labelled `text`
    pub fn activate_text(&mut self, text: &str) -> Result<Transition, FlowError> {
        let step = self.current_step();
        let button = step.button(text).ok_or_else(|| FlowError::UnknownButton {
            step: step.key.clone(),
            button: text.to_string(),
        })?;
        self.activate(button)
    }

    /// Activate a button of the current step
    pub fn activate(&mut self, button: &ButtonSpec) -> Result<Transition, FlowError> {
        self.ensure_active()?;

        match &button.action {
            ButtonAction::SendOtp => {
                let step = self.current_step();
                tracing::info!(step = %step.key, "OTP requested");
                self.notifier.notify(Notice::OtpRequested {
                    step: step.key.clone(),
                });
                Ok(Transition::OtpRequested)
            }
            ButtonAction::Other(action) => {
                tracing::debug!(action = %action, "button has no effect");
                Ok(Transition::Ignored)
            }
            ButtonAction::Validate(_) => self.validate_and_continue(),
        }
    }

    fn validate_and_continue(&mut self) -> Result<Transition, FlowError> {
        let report = self.rules.validate(self.state.values());
        self.state.apply_report(&report);

        if !report.is_valid() {
            tracing::debug!(errors = report.len(), step = %self.current_step().key, "step rejected");
            return Ok(Transition::Rejected(report));
        }

        if self.progress.is_final() {
            let payload = self.begin_submission()?;
            let outcome = self.submitter.submit(&payload);
            return self.finish_submission(outcome);
        }

        let from = self.progress.active();
        self.progress.advance();
        let step = self.current_step();
        self.state = FormState::new(step);
        self.rules = StepRules::build(&step.fields);
        tracing::info!(from, to = self.progress.active(), step = %step.key, "advanced");

        Ok(Transition::Advanced {
            from,
            to: self.progress.active(),
        })
    }

    /// Mark the final step's submission as in flight and return its payload
    ///
    /// Does not validate; [`StepController::activate`] validates before
    /// calling this.
    pub fn begin_submission(&mut self) -> Result<Payload, FlowError> {
        self.ensure_active()?;
        if !self.progress.is_final() {
            return Err(FlowError::NotFinalStep {
                step: self.current_step().key.clone(),
            });
        }
        self.phase = Phase::Submitting;
        Ok(self.state.payload())
    }

    /// Record the outcome of an in-flight submission
    pub fn finish_submission(&mut self, outcome: SubmissionOutcome) -> Result<Transition, FlowError> {
        match self.phase {
            Phase::Submitting => {}
            Phase::Submitted => return Err(FlowError::AlreadySubmitted),
            Phase::Active => {
                return Err(FlowError::NotFinalStep {
                    step: self.current_step().key.clone(),
                })
            }
        }

        match outcome.failure_message() {
            None => {
                self.phase = Phase::Submitted;
                self.notifier.notify(Notice::Submitted);
                Ok(Transition::Submitted)
            }
            Some(message) => {
                self.phase = Phase::Active;
                self.notifier.notify(Notice::SubmissionFailed(message.clone()));
                Ok(Transition::SubmissionFailed(message))
            }
        }
    }

    fn ensure_active(&self) -> Result<(), FlowError> {
        match self.phase {
            Phase::Active => Ok(()),
            Phase::Submitting => Err(FlowError::SubmissionInFlight),
            Phase::Submitted => Err(FlowError::AlreadySubmitted),
        }
    }
}
