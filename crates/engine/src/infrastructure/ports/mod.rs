//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - Video generation (Vertex AI today)
//! - Credentials (static token, gcloud CLI, metadata server)
//! - Storage URL resolution (public URLs, later signed URLs)

mod error;
mod external;

pub use error::{AuthError, StorageError, VideoGenError};

// =============================================================================
// External Service Ports
// =============================================================================
pub use external::{
    AccessToken, CredentialPort, OperationErrorBody, OperationReport, OperationSnapshot,
    StoragePort, VideoGenPort,
};

// =============================================================================
// Test-Only Mocks (only available during test builds)
// =============================================================================
#[cfg(test)]
pub use external::{MockCredentialPort, MockStoragePort, MockVideoGenPort};
