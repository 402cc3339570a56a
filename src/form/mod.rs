//! Form engine - live state, rendering, progression, and submission

pub mod answers;
pub mod controller;
pub mod notify;
pub mod progress;
pub mod render;
pub mod state;
pub mod submit;

pub use answers::{Answers, AnswersError};
pub use controller::{FlowError, Phase, StepController, Transition};
pub use notify::{ConsoleNotifier, Notice, Notifier, RecordingNotifier};
pub use progress::StepProgress;
pub use render::{render_step, FieldControl, FieldRenderer, RenderError, ScriptedRenderer, TerminalRenderer};
pub use state::FormState;
pub use submit::{DryRunSubmitter, HttpSubmitter, Payload, SubmissionOutcome, Submitter};
