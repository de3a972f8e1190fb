//! Veo Director domain.
//!
//! Pure types for the generation-job lifecycle: prompt assembly from
//! cinematic selections, operation handles and statuses, and artifact
//! extraction. No I/O lives here.

pub mod artifact;
pub mod error;
pub mod operation;
pub mod presets;
pub mod prompt;
pub mod value_objects;

pub use artifact::{
    Artifact, ArtifactDescriptor, ExtractedArtifact, MaterializeError, Materializer,
    StorageLocator, DEFAULT_MIME_TYPE,
};
pub use error::DomainError;
pub use operation::{
    FailureDetail, OperationHandle, OperationStatus, PollState, SucceededPayload, VideoSample,
};
pub use presets::DirectorPreset;
pub use prompt::{Category, Fragment, Prompt, PromptAssembler, PromptInput, SelectionSet};
pub use value_objects::{GenerationParameters, PollPolicy};
