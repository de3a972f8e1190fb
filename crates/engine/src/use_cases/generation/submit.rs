//! Start a generation job.

use std::sync::Arc;
use veodirector_domain::{GenerationParameters, OperationHandle, Prompt};

use crate::infrastructure::ports::{VideoGenError, VideoGenPort};

/// Submits a prompt to the provider with the fixed generation parameters.
pub struct SubmitGeneration {
    video_gen: Arc<dyn VideoGenPort>,
    params: GenerationParameters,
}

impl SubmitGeneration {
    pub fn new(video_gen: Arc<dyn VideoGenPort>, params: GenerationParameters) -> Self {
        Self { video_gen, params }
    }

    /// Blank prompts are rejected without contacting the provider.
    pub async fn execute(&self, prompt: &str) -> Result<OperationHandle, SubmitError> {
        let prompt = Prompt::new(prompt).map_err(|_| SubmitError::MissingPrompt)?;
        let handle = self
            .video_gen
            .submit(&prompt, &self.params)
            .await
            .inspect_err(|e| {
                tracing::warn!(error = %e, transient = e.is_transient(), "Submit failed");
            })?;
        tracing::info!(operation = %handle, "Generation started");
        Ok(handle)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("Prompt is required")]
    MissingPrompt,
    #[error(transparent)]
    Provider(#[from] VideoGenError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{AuthError, MockVideoGenPort};

    #[tokio::test]
    async fn blank_prompt_never_reaches_provider() {
        let mut video_gen = MockVideoGenPort::new();
        video_gen.expect_submit().times(0);

        let use_case = SubmitGeneration::new(Arc::new(video_gen), GenerationParameters::default());

        for prompt in ["", "   ", "\n\t"] {
            assert!(matches!(
                use_case.execute(prompt).await,
                Err(SubmitError::MissingPrompt)
            ));
        }
    }

    #[tokio::test]
    async fn returns_provider_handle() {
        let mut video_gen = MockVideoGenPort::new();
        video_gen
            .expect_submit()
            .withf(|prompt, params| {
                prompt.as_str() == "A lion in the savanna, cinematic wide shot"
                    && params.duration_seconds == 8
            })
            .times(1)
            .returning(|_, _| Ok(OperationHandle::new("op-123").unwrap()));

        let use_case = SubmitGeneration::new(Arc::new(video_gen), GenerationParameters::default());
        let handle = use_case
            .execute("  A lion in the savanna, cinematic wide shot ")
            .await
            .unwrap();

        assert_eq!(handle.as_str(), "op-123");
    }

    #[tokio::test]
    async fn auth_failure_is_passed_through() {
        let mut video_gen = MockVideoGenPort::new();
        video_gen.expect_submit().returning(|_, _| {
            Err(VideoGenError::Auth(AuthError::NotConfigured { provider: "static" }))
        });

        let use_case = SubmitGeneration::new(Arc::new(video_gen), GenerationParameters::default());
        assert!(matches!(
            use_case.execute("a prompt").await,
            Err(SubmitError::Provider(VideoGenError::Auth(_)))
        ));
    }
}
