//! Response types for the orchestration endpoint
//!
//! Success bodies, the tagged operation-status union, and the error envelope
//! returned for every rejected request.

use serde::{Deserialize, Serialize};

// =============================================================================
// Success bodies
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

/// Body returned by `POST /api/generate-video`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateVideoResponse {
    pub success: bool,
    /// Provider operation name; echo it back (URL-encoded) to poll
    pub operation: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComposePromptResponse {
    pub prompt: String,
}

/// Failure reported by the provider, raw detail included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderFailure {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

/// Body returned by `GET /api/operation-status/{operation}`.
///
/// `notFoundYet` is a normal answer, not an error: the provider registers
/// operations asynchronously and the caller should retry after the hint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum OperationStatusResponse {
    #[serde(rename_all = "camelCase")]
    Pending { operation: String, done: bool },
    #[serde(rename_all = "camelCase")]
    Succeeded {
        operation: String,
        done: bool,
        video_count: usize,
    },
    #[serde(rename_all = "camelCase")]
    Failed {
        operation: String,
        done: bool,
        error: ProviderFailure,
    },
    #[serde(rename_all = "camelCase")]
    NotFoundYet {
        operation: String,
        done: bool,
        retry_after_secs: u64,
        message: String,
    },
}

/// How the video is delivered. Wire values match the existing web client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VideoFormat {
    #[serde(rename = "base64")]
    Inline,
    #[serde(rename = "gcs")]
    Reference,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoResponse {
    pub format: VideoFormat,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gcs_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signed_url: Option<String>,
    pub mime_type: String,
    pub duration: String,
    pub resolution: String,
}

/// Body returned by `GET /api/download-video/{operation}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoResultResponse {
    pub success: bool,
    pub video: VideoResponse,
}

// =============================================================================
// Errors
// =============================================================================

/// Error classification codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    // === Client Errors (4xx) ===
    /// Start was called without a prompt
    MissingPrompt,
    /// Selections do not cover every category
    IncompleteSelection,
    /// Request body or field failed validation
    ValidationError,
    /// Operation id could not be decoded or has the wrong shape
    InvalidOperation,
    /// Result was requested before the operation finished
    OperationNotComplete,

    // === Server / upstream Errors (5xx) ===
    /// No credential could be obtained for the provider
    AuthFailed,
    /// Provider answered with a non-success status
    ProviderError,
    /// Provider could not be reached
    ProviderUnreachable,
    /// Provider finished the operation with an error
    GenerationFailed,
    /// Provider reported success with an unusable artifact
    InvalidArtifact,
}

impl ErrorCode {
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ErrorCode::MissingPrompt
                | ErrorCode::IncompleteSelection
                | ErrorCode::ValidationError
                | ErrorCode::InvalidOperation
                | ErrorCode::OperationNotComplete
        )
    }
}

/// Error envelope for every rejected request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// Human-readable error message
    pub error: String,
    pub code: ErrorCode,
    /// Raw provider detail when available
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code,
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}
