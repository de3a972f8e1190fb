//! Vertex AI video generation client
//!
//! Implements the VideoGenPort trait against the publisher-model
//! `predictLongRunning` / `fetchPredictOperation` endpoints.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use veodirector_domain::{GenerationParameters, OperationHandle, Prompt, VideoSample};

use crate::infrastructure::ports::{
    CredentialPort, OperationErrorBody, OperationReport, OperationSnapshot, VideoGenError,
    VideoGenPort,
};

/// Where and what to call on Vertex AI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexConfig {
    pub project_id: String,
    pub location: String,
    pub model_id: String,
    /// Overrides the regional endpoint; used for tests and proxies.
    pub api_base: Option<String>,
    pub request_timeout: Duration,
}

impl Default for VertexConfig {
    fn default() -> Self {
        Self {
            project_id: "veo-director-tool".to_string(),
            location: "us-central1".to_string(),
            model_id: "veo-3.0-generate-001".to_string(),
            api_base: None,
            request_timeout: Duration::from_secs(60),
        }
    }
}

impl VertexConfig {
    pub fn api_base(&self) -> String {
        match &self.api_base {
            Some(base) => base.trim_end_matches('/').to_string(),
            None => format!("https://{}-aiplatform.googleapis.com", self.location),
        }
    }
}

/// Client for the Vertex AI long-running prediction API
#[derive(Clone)]
pub struct VertexVideoClient {
    client: Client,
    config: VertexConfig,
    base_url: String,
    credentials: Arc<dyn CredentialPort>,
}

impl VertexVideoClient {
    pub fn new(config: VertexConfig, credentials: Arc<dyn CredentialPort>) -> Self {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .unwrap_or_else(|_| Client::new());
        let base_url = config.api_base();

        Self {
            client,
            config,
            base_url,
            credentials,
        }
    }

    fn model_url(&self, model: &str, method: &str) -> String {
        format!(
            "{}/v1/projects/{}/locations/{}/publishers/google/models/{}:{}",
            self.base_url, self.config.project_id, self.config.location, model, method
        )
    }

    /// POST a JSON body with a fresh bearer token; returns status and raw body.
    async fn post_json<T: Serialize + Sync>(
        &self,
        url: &str,
        body: &T,
    ) -> Result<(StatusCode, String), VideoGenError> {
        let token = self.credentials.access_token().await?;

        let response = self
            .client
            .post(url)
            .bearer_auth(token.secret())
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        Ok((status, text))
    }
}

#[async_trait]
impl VideoGenPort for VertexVideoClient {
    async fn submit(
        &self,
        prompt: &Prompt,
        params: &GenerationParameters,
    ) -> Result<OperationHandle, VideoGenError> {
        let url = self.model_url(&self.config.model_id, "predictLongRunning");
        let request = PredictLongRunningRequest {
            instances: vec![PromptInstance {
                prompt: prompt.as_str(),
            }],
            parameters: PredictParameters {
                aspect_ratio: &params.aspect_ratio,
                sample_count: params.sample_count,
                duration_seconds: params.duration_seconds,
            },
        };

        tracing::info!(
            model = %self.config.model_id,
            prompt_len = prompt.as_str().len(),
            "Submitting video generation"
        );

        let (status, body) = self.post_json(&url, &request).await?;
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Vertex rejected generation request");
            return Err(VideoGenError::Provider {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: OperationNameResponse = serde_json::from_str(&body)
            .map_err(|e| VideoGenError::InvalidResponse(format!("{e}: {body}")))?;
        let handle = OperationHandle::new(parsed.name)
            .map_err(|e| VideoGenError::InvalidResponse(e.to_string()))?;

        tracing::info!(operation = %handle, "Generation operation started");
        Ok(handle)
    }

    async fn fetch_operation(
        &self,
        handle: &OperationHandle,
    ) -> Result<OperationSnapshot, VideoGenError> {
        let (model, _) = handle
            .model_and_operation()
            .map_err(|e| VideoGenError::InvalidHandle(e.to_string()))?;
        let url = self.model_url(model, "fetchPredictOperation");
        let request = FetchOperationRequest {
            operation_name: handle.as_str(),
        };

        let (status, body) = self.post_json(&url, &request).await?;
        if status == StatusCode::NOT_FOUND {
            tracing::debug!(operation = %handle, "Operation not registered yet");
            return Ok(OperationSnapshot::NotFound);
        }
        if !status.is_success() {
            return Err(VideoGenError::Provider {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: OperationResponse = serde_json::from_str(&body)
            .map_err(|e| VideoGenError::InvalidResponse(format!("{e}: {body}")))?;

        tracing::debug!(
            operation = %handle,
            done = parsed.done,
            has_error = parsed.error.is_some(),
            "Fetched operation"
        );

        Ok(OperationSnapshot::Reported(parsed.into_report()))
    }
}

// =============================================================================
// Vertex AI API Types
// =============================================================================

#[derive(Debug, Serialize)]
struct PredictLongRunningRequest<'a> {
    instances: Vec<PromptInstance<'a>>,
    parameters: PredictParameters<'a>,
}

#[derive(Debug, Serialize)]
struct PromptInstance<'a> {
    prompt: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PredictParameters<'a> {
    aspect_ratio: &'a str,
    sample_count: u8,
    duration_seconds: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FetchOperationRequest<'a> {
    operation_name: &'a str,
}

#[derive(Debug, Deserialize)]
struct OperationNameResponse {
    name: String,
}

#[derive(Debug, Deserialize)]
struct OperationResponse {
    #[serde(default)]
    done: bool,
    #[serde(default)]
    response: Option<GenerationResponse>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
struct GenerationResponse {
    #[serde(default)]
    videos: Vec<VideoEntry>,
    /// Older responses nest videos under the first prediction
    #[serde(default)]
    predictions: Vec<Prediction>,
}

#[derive(Debug, Deserialize)]
struct Prediction {
    #[serde(default)]
    videos: Vec<VideoEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoEntry {
    #[serde(default)]
    bytes_base64_encoded: Option<String>,
    #[serde(default)]
    gcs_uri: Option<String>,
    #[serde(default)]
    mime_type: Option<String>,
}

impl OperationResponse {
    fn into_report(self) -> OperationReport {
        let error = self.error.filter(|e| !e.is_null()).map(|e| OperationErrorBody {
            code: e.get("code").and_then(serde_json::Value::as_i64),
            message: e
                .get("message")
                .and_then(serde_json::Value::as_str)
                .unwrap_or("Video generation failed")
                .to_string(),
            raw: e.to_string(),
        });

        let samples = self
            .response
            .map(|r| {
                if !r.videos.is_empty() {
                    r.videos
                } else {
                    r.predictions
                        .into_iter()
                        .next()
                        .map(|p| p.videos)
                        .unwrap_or_default()
                }
            })
            .unwrap_or_default()
            .into_iter()
            .map(|v| VideoSample {
                inline_base64: v.bytes_base64_encoded,
                locator: v.gcs_uri,
                mime_type: v.mime_type,
            })
            .collect();

        OperationReport {
            done: self.done,
            error,
            samples,
        }
    }
}
