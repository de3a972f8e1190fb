//! Long-running generation operation: handle, per-poll status, and the
//! poller's state machine.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::error::DomainError;

/// Opaque provider-assigned operation name.
///
/// Vertex names look like
/// `projects/{p}/locations/{l}/publishers/google/models/{model}/operations/{id}`,
/// but any non-blank token without whitespace is accepted here; adapters that
/// need the structure use [`OperationHandle::model_and_operation`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OperationHandle(String);

impl OperationHandle {
    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(DomainError::invalid_handle("operation name is empty"));
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(DomainError::invalid_handle(format!(
                "operation name contains whitespace: {trimmed:?}"
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split `.../models/{model}/operations/{id}` into `(model, id)`.
    pub fn model_and_operation(&self) -> Result<(&str, &str), DomainError> {
        let segments: Vec<&str> = self.0.split('/').collect();
        segments
            .windows(4)
            .find(|w| w[0] == "models" && w[2] == "operations")
            .and_then(|w| {
                if w[1].is_empty() || w[3].is_empty() {
                    None
                } else {
                    Some((w[1], w[3]))
                }
            })
            .ok_or_else(|| {
                DomainError::invalid_handle(format!(
                    "expected .../models/{{model}}/operations/{{id}}, got {}",
                    self.0
                ))
            })
    }
}

impl fmt::Display for OperationHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for OperationHandle {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        OperationHandle::new(value)
    }
}

impl From<OperationHandle> for String {
    fn from(value: OperationHandle) -> Self {
        value.0
    }
}

/// One produced video as reported by the provider, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VideoSample {
    pub inline_base64: Option<String>,
    pub locator: Option<String>,
    pub mime_type: Option<String>,
}

/// Response body of an operation that finished without an error field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SucceededPayload {
    pub samples: Vec<VideoSample>,
}

/// Provider-reported failure, with the raw body kept for diagnosis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureDetail {
    /// HTTP status when the failure came from a non-success response.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_status: Option<u16>,
    /// Provider error code from a finished operation's `error` object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

impl FailureDetail {
    pub fn from_http(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        Self {
            http_status: Some(status),
            code: None,
            message: format!("Provider responded with status {status}"),
            raw: Some(body),
        }
    }

    pub fn from_operation_error(code: Option<i64>, message: impl Into<String>, raw: Option<String>) -> Self {
        Self {
            http_status: None,
            code,
            message: message.into(),
            raw,
        }
    }
}

impl fmt::Display for FailureDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(code) = self.code {
            write!(f, " (code {code})")?;
        }
        if let Some(raw) = &self.raw {
            write!(f, ": {raw}")?;
        }
        Ok(())
    }
}

/// Result of a single status query. Never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationStatus {
    Pending,
    Succeeded(SucceededPayload),
    Failed(FailureDetail),
    /// The provider has not registered the operation yet.
    NotFoundYet { retry_after: Duration },
}

impl OperationStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, OperationStatus::Succeeded(_) | OperationStatus::Failed(_))
    }

    pub fn name(&self) -> &'static str {
        match self {
            OperationStatus::Pending => "pending",
            OperationStatus::Succeeded(_) => "succeeded",
            OperationStatus::Failed(_) => "failed",
            OperationStatus::NotFoundYet { .. } => "not_found_yet",
        }
    }
}

/// Poll loop state. `Succeeded`, `Failed` and `TimedOut` are absorbing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PollState {
    Pending,
    Succeeded,
    Failed,
    TimedOut,
}

impl PollState {
    pub fn is_terminal(self) -> bool {
        !matches!(self, PollState::Pending)
    }

    /// Fold one observed status into the state.
    pub fn observe(self, status: &OperationStatus) -> PollState {
        if self.is_terminal() {
            return self;
        }
        match status {
            OperationStatus::Succeeded(_) => PollState::Succeeded,
            OperationStatus::Failed(_) => PollState::Failed,
            OperationStatus::Pending | OperationStatus::NotFoundYet { .. } => PollState::Pending,
        }
    }

    /// Attempt ceiling reached.
    pub fn time_out(self) -> PollState {
        if self.is_terminal() {
            self
        } else {
            PollState::TimedOut
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VERTEX_NAME: &str = "projects/veo-director-tool/locations/us-central1/publishers/google/models/veo-3.0-generate-001/operations/5f2c1a";

    #[test]
    fn splits_vertex_operation_name() {
        let handle = OperationHandle::new(VERTEX_NAME).unwrap();
        assert_eq!(
            handle.model_and_operation().unwrap(),
            ("veo-3.0-generate-001", "5f2c1a")
        );
    }

    #[test]
    fn opaque_handle_has_no_model() {
        let handle = OperationHandle::new("op-123").unwrap();
        assert!(matches!(
            handle.model_and_operation(),
            Err(DomainError::InvalidHandle(_))
        ));
    }

    #[test]
    fn empty_model_segment_is_rejected() {
        let handle = OperationHandle::new("models//operations/abc").unwrap();
        assert!(handle.model_and_operation().is_err());
    }

    #[test]
    fn blank_or_spaced_handles_are_rejected() {
        assert!(OperationHandle::new("   ").is_err());
        assert!(OperationHandle::new("op 123").is_err());
    }

    #[test]
    fn terminal_states_are_absorbing() {
        let succeeded = OperationStatus::Succeeded(SucceededPayload::default());
        let failed = OperationStatus::Failed(FailureDetail::from_http(500, "boom"));
        let pending = OperationStatus::Pending;

        let state = PollState::Pending.observe(&pending);
        assert_eq!(state, PollState::Pending);

        let state = state.observe(&succeeded);
        assert_eq!(state, PollState::Succeeded);
        assert_eq!(state.observe(&failed), PollState::Succeeded);
        assert_eq!(state.observe(&pending), PollState::Succeeded);
        assert_eq!(state.time_out(), PollState::Succeeded);

        let timed_out = PollState::Pending.time_out();
        assert_eq!(timed_out.observe(&succeeded), PollState::TimedOut);
    }

    #[test]
    fn not_found_keeps_pending() {
        let status = OperationStatus::NotFoundYet {
            retry_after: Duration::from_secs(15),
        };
        assert!(!status.is_terminal());
        assert_eq!(PollState::Pending.observe(&status), PollState::Pending);
    }

    #[test]
    fn failure_detail_display_includes_raw_body() {
        let detail = FailureDetail::from_operation_error(
            Some(3),
            "Prompt rejected",
            Some(r#"{"code":3}"#.to_string()),
        );
        assert_eq!(detail.to_string(), r#"Prompt rejected (code 3): {"code":3}"#);
    }
}
