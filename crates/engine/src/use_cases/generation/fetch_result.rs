//! Turn a finished operation into an artifact descriptor.

use std::sync::Arc;
use veodirector_domain::{
    Artifact, ArtifactDescriptor, ExtractedArtifact, FailureDetail, GenerationParameters,
    MaterializeError, Materializer, OperationHandle, OperationStatus, SucceededPayload,
};

use super::poll::{PollError, PollOperation};
use crate::infrastructure::ports::{StorageError, StoragePort};

/// Re-polls once and materializes the result. Nothing is retried.
pub struct FetchResult {
    poll: Arc<PollOperation>,
    storage: Arc<dyn StoragePort>,
    params: GenerationParameters,
}

impl FetchResult {
    pub fn new(
        poll: Arc<PollOperation>,
        storage: Arc<dyn StoragePort>,
        params: GenerationParameters,
    ) -> Self {
        Self {
            poll,
            storage,
            params,
        }
    }

    pub async fn execute(&self, handle: &OperationHandle) -> Result<ArtifactDescriptor, FetchError> {
        match self.poll.execute(handle).await? {
            OperationStatus::Succeeded(payload) => self.materialize(&payload).await,
            OperationStatus::Failed(detail) => Err(FetchError::GenerationFailed(detail)),
            status @ (OperationStatus::Pending | OperationStatus::NotFoundYet { .. }) => {
                Err(FetchError::NotComplete {
                    status: status.name(),
                })
            }
        }
    }

    /// Build the descriptor for an already-succeeded payload.
    pub async fn materialize(
        &self,
        payload: &SucceededPayload,
    ) -> Result<ArtifactDescriptor, FetchError> {
        let artifact = match Materializer::extract(payload)? {
            ExtractedArtifact::Inline { bytes, mime_type } => Artifact::Inline { bytes, mime_type },
            ExtractedArtifact::Stored { locator, mime_type } => {
                let uri = self.storage.resolve(&locator).await?;
                Artifact::Reference {
                    locator,
                    uri,
                    mime_type,
                }
            }
        };

        tracing::info!(
            mime_type = artifact.mime_type(),
            inline = matches!(artifact, Artifact::Inline { .. }),
            "Materialized video artifact"
        );

        Ok(ArtifactDescriptor {
            artifact,
            duration_seconds: self.params.duration_seconds,
            resolution: self.params.resolution.clone(),
        })
    }

    pub fn params(&self) -> &GenerationParameters {
        &self.params
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Operation is not complete yet ({status})")]
    NotComplete { status: &'static str },
    #[error("Video generation failed: {0}")]
    GenerationFailed(FailureDetail),
    #[error(transparent)]
    Materialize(#[from] MaterializeError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Poll(#[from] PollError),
}
