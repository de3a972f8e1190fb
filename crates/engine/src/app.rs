//! Application state and composition.

use std::sync::Arc;
use veodirector_domain::{GenerationParameters, PollPolicy};

use crate::infrastructure::{
    config::EngineConfig,
    ports::{StoragePort, VideoGenPort},
    storage::PublicUrlResolver,
    vertex::VertexVideoClient,
};
use crate::use_cases::{
    self,
    generation::{AwaitOperation, FetchResult, PollOperation, SubmitGeneration},
};

/// Main application state.
///
/// Holds all use cases.
/// Passed to HTTP handlers via Axum state and driven directly by the CLI.
pub struct App {
    pub use_cases: UseCases,
}

/// Container for all use cases.
pub struct UseCases {
    pub generation: use_cases::GenerationUseCases,
    pub prompt: use_cases::ComposePrompt,
}

impl App {
    pub fn new(
        video_gen: Arc<dyn VideoGenPort>,
        storage: Arc<dyn StoragePort>,
        generation: GenerationParameters,
        poll_policy: PollPolicy,
    ) -> Self {
        let poll = Arc::new(PollOperation::new(video_gen.clone(), poll_policy.retry_hint));
        let submit = Arc::new(SubmitGeneration::new(video_gen, generation.clone()));
        let await_completion = Arc::new(AwaitOperation::new(poll.clone(), poll_policy));
        let fetch_result = Arc::new(FetchResult::new(poll.clone(), storage, generation));

        Self {
            use_cases: UseCases {
                generation: use_cases::GenerationUseCases::new(
                    submit,
                    poll,
                    await_completion,
                    fetch_result,
                ),
                prompt: use_cases::ComposePrompt::new(),
            },
        }
    }

    /// Wire the Vertex client, credentials and storage resolver from config.
    pub fn from_config(config: &EngineConfig) -> Self {
        let credentials = config.credentials();
        let video_gen = Arc::new(VertexVideoClient::new(config.vertex.clone(), credentials));
        let storage = Arc::new(PublicUrlResolver::new(&config.storage_public_base));

        Self::new(
            video_gen,
            storage,
            config.generation.clone(),
            config.poll_policy.clone(),
        )
    }
}
