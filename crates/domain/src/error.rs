//! Unified error types for the domain layer
//!
//! Artifact extraction has its own error (`MaterializeError`) because callers
//! need to tell a broken provider payload apart from bad caller input.

use thiserror::Error;

use crate::prompt::Category;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Validation failed (e.g., invalid field values)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Not every category has a usable selection and no inspiration was given
    #[error("Incomplete selection, missing: {}", format_categories(.missing))]
    IncompleteSelection { missing: Vec<Category> },

    /// Operation identifier does not have the provider's shape
    #[error("Invalid operation handle: {0}")]
    InvalidHandle(String),

    /// Parse error (for value objects)
    #[error("Parse error: {0}")]
    Parse(String),
}

impl DomainError {
    /// Creates a validation error for business rule violations.
    ///
    /// # Example
    /// ```ignore
    /// if prompt.trim().is_empty() {
    ///     return Err(DomainError::validation("Prompt cannot be empty"));
    /// }
    /// ```
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create an invalid handle error
    pub fn invalid_handle(msg: impl Into<String>) -> Self {
        Self::InvalidHandle(msg.into())
    }

    /// Create a parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}

fn format_categories(categories: &[Category]) -> String {
    categories
        .iter()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
