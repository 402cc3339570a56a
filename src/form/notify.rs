//! User-facing notices raised by the step controller

use console::style;
use std::fmt;

/// A notice for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// The OTP side-channel button was pressed on a step
    OtpRequested { step: String },
    /// The final payload was accepted
    Submitted,
    /// The final payload was not accepted
    SubmissionFailed(String),
}

impl Notice {
    pub fn is_failure(&self) -> bool {
        matches!(self, Notice::SubmissionFailed(_))
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::OtpRequested { .. } => write!(f, "OTP requested (mock)"),
            Notice::Submitted => write!(f, "Form submitted successfully!"),
            Notice::SubmissionFailed(reason) => write!(f, "{}", reason),
        }
    }
}

/// Receives notices
pub trait Notifier {
    fn notify(&mut self, notice: Notice);
}

/// Prints notices to the terminal
#[derive(Debug, Clone, Default)]
pub struct ConsoleNotifier {
    quiet: bool,
}

impl ConsoleNotifier {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&mut self, notice: Notice) {
        if notice.is_failure() {
            eprintln!("{} {}", style("✗").red(), style(&notice).red());
        } else if !self.quiet {
            println!("{} {}", style("✓").green(), notice);
        }
    }
}

/// Keeps notices in memory, in the order raised
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    notices: Vec<Notice>,
}

impl RecordingNotifier {
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_text() {
        let otp = Notice::OtpRequested {
            step: "step1".to_string(),
        };
        assert_eq!(otp.to_string(), "OTP requested (mock)");
        assert_eq!(Notice::Submitted.to_string(), "Form submitted successfully!");
        assert!(Notice::SubmissionFailed("x".to_string()).is_failure());
    }

    #[test]
    fn test_recording_keeps_order() {
        let mut notifier = RecordingNotifier::default();
        notifier.notify(Notice::SubmissionFailed("first".to_string()));
        notifier.notify(Notice::Submitted);
        assert_eq!(
            notifier.notices(),
            &[Notice::SubmissionFailed("first".to_string()), Notice::Submitted]
        );
    }
}
