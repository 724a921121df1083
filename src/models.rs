use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::history::HistoryRing;
use crate::utils::round_ms;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Up,
    Warning,
    Down,
    Unknown,
}

impl Status {
    pub fn icon(&self) -> &'static str {
        match self {
            Status::Up => "\u{1F7E2}",
            Status::Warning => "\u{1F7E1}",
            Status::Down => "\u{1F534}",
            Status::Unknown => "\u{26AA}",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Up => write!(f, "UP"),
            Status::Warning => write!(f, "WARNING"),
            Status::Down => write!(f, "DOWN"),
            Status::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// A monitored endpoint. `id` is its current position in the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub id: usize,
    pub url: String,
    #[serde(rename = "name")]
    pub display_name: String,
}

/// Terminal outcome of one probe attempt, before classification.
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeOutcome {
    /// A response arrived and the transport accepted it.
    Response(u16),
    /// The transport rejected the response because of its status code.
    HttpError { code: u16, reason: String },
    /// No response: DNS, refused connection, timeout, TLS.
    Transport(String),
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeResult {
    pub status: Status,
    #[serde(rename = "response_time")]
    pub response_time_ms: f64,
    pub status_code: Option<u16>,
    #[serde(rename = "error")]
    pub error_message: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl ProbeResult {
    pub fn from_outcome(outcome: ProbeOutcome, elapsed: Duration) -> Self {
        let (status, status_code, error_message) = match outcome {
            ProbeOutcome::Response(code) if (200..400).contains(&code) => {
                (Status::Up, Some(code), None)
            }
            ProbeOutcome::Response(code) => (Status::Warning, Some(code), None),
            ProbeOutcome::HttpError { code, reason } => (
                Status::Down,
                Some(code),
                Some(format!("HTTP Error: {} {}", code, reason).trim_end().to_string()),
            ),
            ProbeOutcome::Transport(reason) => {
                (Status::Down, None, Some(format!("URL Error: {}", reason)))
            }
            ProbeOutcome::Other(reason) => (Status::Down, None, Some(format!("Error: {}", reason))),
        };

        Self {
            status,
            response_time_ms: round_ms(elapsed),
            status_code,
            error_message,
            timestamp: Utc::now(),
        }
    }
}

/// Aggregated view of one url: the latest result flattened, plus its history.
#[derive(Debug, Clone, Serialize)]
pub struct TargetState {
    pub status: Status,
    #[serde(rename = "response_time")]
    pub response_time_ms: f64,
    pub status_code: Option<u16>,
    #[serde(rename = "error")]
    pub error_message: Option<String>,
    pub last_check: Option<DateTime<Utc>>,
    pub history: HistoryRing,
}

impl Default for TargetState {
    fn default() -> Self {
        Self {
            status: Status::Unknown,
            response_time_ms: 0.0,
            status_code: None,
            error_message: None,
            last_check: None,
            history: HistoryRing::default(),
        }
    }
}

impl TargetState {
    /// Folds a fresh result into the state and returns the previous status.
    pub fn apply(&mut self, result: ProbeResult) -> Status {
        let previous = self.status;
        self.status = result.status;
        self.response_time_ms = result.response_time_ms;
        self.status_code = result.status_code;
        self.error_message = result.error_message.clone();
        self.last_check = Some(result.timestamp);
        self.history.append(result);
        previous
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_success_and_redirect_are_up() {
        let ok = ProbeResult::from_outcome(ProbeOutcome::Response(200), ms(12));
        assert_eq!(ok.status, Status::Up);
        assert_eq!(ok.status_code, Some(200));
        assert!(ok.error_message.is_none());

        let redirect = ProbeResult::from_outcome(ProbeOutcome::Response(302), ms(1));
        assert_eq!(redirect.status, Status::Up);
    }

    #[test]
    fn test_unexpected_codes_are_warning() {
        let informational = ProbeResult::from_outcome(ProbeOutcome::Response(101), ms(1));
        assert_eq!(informational.status, Status::Warning);

        let client_error = ProbeResult::from_outcome(ProbeOutcome::Response(404), ms(1));
        assert_eq!(client_error.status, Status::Warning);
        assert_eq!(client_error.status_code, Some(404));
        assert!(client_error.error_message.is_none());
    }

    #[test]
    fn test_http_error_keeps_code() {
        let result = ProbeResult::from_outcome(
            ProbeOutcome::HttpError {
                code: 500,
                reason: "Internal Server Error".into(),
            },
            ms(3),
        );
        assert_eq!(result.status, Status::Down);
        assert_eq!(result.status_code, Some(500));
        assert_eq!(
            result.error_message.as_deref(),
            Some("HTTP Error: 500 Internal Server Error")
        );
    }

    #[test]
    fn test_transport_failures_have_no_code() {
        let refused = ProbeResult::from_outcome(
            ProbeOutcome::Transport("connection refused".into()),
            ms(1),
        );
        assert_eq!(refused.status, Status::Down);
        assert!(refused.status_code.is_none());
        assert_eq!(refused.error_message.as_deref(), Some("URL Error: connection refused"));

        let other = ProbeResult::from_outcome(ProbeOutcome::Other("bad url".into()), ms(1));
        assert_eq!(other.status, Status::Down);
        assert_eq!(other.error_message.as_deref(), Some("Error: bad url"));
    }

    #[test]
    fn test_response_time_rounded() {
        let result = ProbeResult::from_outcome(
            ProbeOutcome::Response(200),
            Duration::from_micros(12_345_678),
        );
        assert_eq!(result.response_time_ms, 12345.68);
    }

    #[test]
    fn test_apply_updates_latest_fields() {
        let mut state = TargetState::default();
        let result = ProbeResult::from_outcome(
            ProbeOutcome::HttpError {
                code: 503,
                reason: "Service Unavailable".into(),
            },
            ms(5),
        );
        let stamp = result.timestamp;

        let previous = state.apply(result);
        assert_eq!(previous, Status::Unknown);
        assert_eq!(state.status, Status::Down);
        assert_eq!(state.status_code, Some(503));
        assert_eq!(state.last_check, Some(stamp));
        assert_eq!(state.history.len(), 1);
    }

    #[test]
    fn test_wire_shape() {
        let target = Target {
            id: 0,
            url: "https://example.com".into(),
            display_name: "Example".into(),
        };
        let json = serde_json::to_value(&target).unwrap();
        assert_eq!(json["name"], "Example");

        let state = TargetState::default();
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["status"], "unknown");
        assert_eq!(json["response_time"], 0.0);
        assert!(json["status_code"].is_null());
        assert!(json["last_check"].is_null());
        assert_eq!(json["history"], serde_json::json!([]));
    }
}
