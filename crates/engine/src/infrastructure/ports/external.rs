//! External service port traits (generation provider, credentials, storage).

use async_trait::async_trait;
use std::fmt;
use veodirector_domain::{
    GenerationParameters, OperationHandle, Prompt, StorageLocator, VideoSample,
};

use super::error::{AuthError, StorageError, VideoGenError};

// =============================================================================
// Credentials
// =============================================================================

/// Bearer token for provider calls.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn secret(&self) -> &str {
        &self.0
    }
}

// Tokens must never end up in logs.
impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialPort: Send + Sync {
    /// Fetch a token for one provider call.
    async fn access_token(&self) -> Result<AccessToken, AuthError>;
}

// =============================================================================
// Video Generation
// =============================================================================

/// Error object of a finished operation, as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationErrorBody {
    pub code: Option<i64>,
    pub message: String,
    /// The error object serialized back to JSON
    pub raw: String,
}

/// Provider view of an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationReport {
    pub done: bool,
    pub error: Option<OperationErrorBody>,
    pub samples: Vec<VideoSample>,
}

/// Result of a status query before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationSnapshot {
    Reported(OperationReport),
    /// Provider answered 404 for the handle.
    NotFound,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VideoGenPort: Send + Sync {
    /// Start a long-running generation and return its handle.
    async fn submit(
        &self,
        prompt: &Prompt,
        params: &GenerationParameters,
    ) -> Result<OperationHandle, VideoGenError>;

    /// Query the current state of an operation. No retry.
    async fn fetch_operation(
        &self,
        handle: &OperationHandle,
    ) -> Result<OperationSnapshot, VideoGenError>;
}

// =============================================================================
// Storage
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StoragePort: Send + Sync {
    /// Turn a blob-store locator into a URI a client can fetch.
    async fn resolve(&self, locator: &StorageLocator) -> Result<String, StorageError>;
}
