//! Error types for port operations.

/// No usable credential for the provider. Never retried.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AuthError {
    /// Source is not configured (e.g. empty static token).
    #[error("Credential source {provider} is not configured")]
    NotConfigured { provider: &'static str },

    /// A configured source failed to produce a token.
    #[error("Credential source {provider} failed: {message}")]
    SourceFailed {
        provider: &'static str,
        message: String,
    },

    /// Every source in a chain failed.
    #[error("No credential source succeeded: {0}")]
    Exhausted(String),
}

impl AuthError {
    pub fn source_failed(provider: &'static str, message: impl ToString) -> Self {
        Self::SourceFailed {
            provider,
            message: message.to_string(),
        }
    }
}

/// Errors from the generation provider.
#[derive(Debug, Clone, thiserror::Error)]
pub enum VideoGenError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Network failure before a response arrived. Transient.
    #[error("Provider unreachable: {0}")]
    Transport(String),

    /// Provider answered with a non-success status.
    #[error("Provider responded with status {status}: {body}")]
    Provider { status: u16, body: String },

    /// Success status but the body could not be understood.
    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),

    /// Handle does not have the shape this provider needs.
    #[error("Invalid operation handle: {0}")]
    InvalidHandle(String),
}

impl VideoGenError {
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

impl From<reqwest::Error> for VideoGenError {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport(e.to_string())
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum StorageError {
    #[error("Cannot resolve {locator}: {message}")]
    Unresolvable { locator: String, message: String },
}
