//! Submission of the final step's values
//!
//! The form only needs a binary outcome from the backend. [`HttpSubmitter`]
//! posts JSON to the configured endpoint; [`DryRunSubmitter`] prints the
//! payload instead of sending it.

use indexmap::IndexMap;
use reqwest::blocking::Client;
use serde::Serialize;

/// Field name to value, in field order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Payload(IndexMap<String, String>);

impl Payload {
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl From<IndexMap<String, String>> for Payload {
    fn from(values: IndexMap<String, String>) -> Self {
        Self(values)
    }
}

/// Result of one submission attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// The backend answered with a success status
    Accepted,
    /// The backend answered with a non-success status
    Rejected { status: u16 },
    /// The request never produced a response
    Transport(String),
}

impl SubmissionOutcome {
    /// User-facing failure text, `None` on success
    pub fn failure_message(&self) -> Option<String> {
        match self {
            SubmissionOutcome::Accepted => None,
            SubmissionOutcome::Rejected { status } => Some(format!(
                "Submission failed (HTTP {}). Check backend logs.",
                status
            )),
            SubmissionOutcome::Transport(reason) => {
                Some(format!("Error submitting form: {}", reason))
            }
        }
    }
}

/// Sends a final payload somewhere and reports success or failure
pub trait Submitter {
    fn submit(&mut self, payload: &Payload) -> SubmissionOutcome;
}

/// Posts the payload as JSON to an HTTP endpoint
#[derive(Debug, Clone)]
pub struct HttpSubmitter {
    client: Client,
    url: String,
}

impl HttpSubmitter {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
        }
    }
}

impl Submitter for HttpSubmitter {
    fn submit(&mut self, payload: &Payload) -> SubmissionOutcome {
        tracing::info!(url = %self.url, fields = payload.len(), "submitting form");

        // `json` sets Content-Type: application/json
        match self.client.post(&self.url).json(payload).send() {
            Ok(response) if response.status().is_success() => {
                tracing::info!(status = %response.status(), "submission accepted");
                SubmissionOutcome::Accepted
            }
            Ok(response) => {
                let status = response.status().as_u16();
                tracing::warn!(status, "submission rejected");
                SubmissionOutcome::Rejected { status }
            }
            Err(e) => {
                tracing::warn!(error = %e, "submission transport error");
                SubmissionOutcome::Transport(e.to_string())
            }
        }
    }
}

/// Prints the payload as JSON to stdout and reports success
#[derive(Debug, Clone, Default)]
pub struct DryRunSubmitter;

impl Submitter for DryRunSubmitter {
    fn submit(&mut self, payload: &Payload) -> SubmissionOutcome {
        match serde_json::to_string_pretty(payload) {
            Ok(json) => {
                println!("{}", json);
                SubmissionOutcome::Accepted
            }
            Err(e) => SubmissionOutcome::Transport(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> Payload {
        let mut values = IndexMap::new();
        values.insert("pan".to_string(), "ABCDE1234F".to_string());
        values.insert("orgType".to_string(), "Proprietary".to_string());
        Payload::from(values)
    }

    #[test]
    fn test_payload_serializes_in_field_order() {
        let json = serde_json::to_string(&payload()).unwrap();
        assert_eq!(json, r#"{"pan":"ABCDE1234F","orgType":"Proprietary"}"#);
    }

    #[test]
    fn test_outcome_messages() {
        assert_eq!(SubmissionOutcome::Accepted.failure_message(), None);
        assert!(SubmissionOutcome::Rejected { status: 500 }
            .failure_message()
            .unwrap()
            .contains("HTTP 500"));
        assert_eq!(
            SubmissionOutcome::Transport("refused".to_string()).failure_message(),
            Some("Error submitting form: refused".to_string())
        );
    }

    #[test]
    fn test_http_submitter_accepted() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/api/submit")
            .match_header("content-type", "application/json")
            .match_body(mockito::Matcher::Json(serde_json::json!({
                "pan": "ABCDE1234F",
                "orgType": "Proprietary"
            })))
            .with_status(201)
            .expect(1)
            .create();

        let mut submitter = HttpSubmitter::new(format!("{}/api/submit", server.url()));
        assert_eq!(submitter.submit(&payload()), SubmissionOutcome::Accepted);
        mock.assert();
    }

    #[test]
    fn test_http_submitter_rejected() {
        let mut server = mockito::Server::new();
        let _mock = server.mock("POST", "/api/submit").with_status(500).create();

        let mut submitter = HttpSubmitter::new(format!("{}/api/submit", server.url()));
        assert_eq!(
            submitter.submit(&payload()),
            SubmissionOutcome::Rejected { status: 500 }
        );
    }

    #[test]
    fn test_http_submitter_transport_error() {
        // Port 9 on localhost is not expected to accept connections
        let mut submitter = HttpSubmitter::new("http://127.0.0.1:9/api/submit");
        assert!(matches!(
            submitter.submit(&payload()),
            SubmissionOutcome::Transport(_)
        ));
    }
}
