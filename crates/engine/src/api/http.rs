//! HTTP routes.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use veodirector_domain::{
    Artifact, ArtifactDescriptor, Category, DomainError, FailureDetail, OperationHandle,
    OperationStatus,
};
use veodirector_shared::{
    ComposePromptRequest, ComposePromptResponse, ErrorCode, ErrorResponse, GenerateVideoRequest,
    GenerateVideoResponse, HealthResponse, OperationStatusResponse, ProviderFailure, VideoFormat,
    VideoResponse, VideoResultResponse,
};

use crate::app::App;
use crate::infrastructure::ports::{AuthError, VideoGenError};
use crate::use_cases::generation::{FetchError, PollError, SubmitError};
use crate::use_cases::ComposeRequest;

/// Create all HTTP routes.
pub fn routes() -> Router<Arc<App>> {
    Router::new()
        .route("/", get(health))
        .route("/api/health", get(health))
        .route("/api/generate-video", post(generate_video))
        .route("/api/compose-prompt", post(compose_prompt))
        .route("/api/operation-status/{operation}", get(operation_status))
        .route("/api/download-video/{operation}", get(download_video))
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
        message: "Veo Director Tool API is running".to_string(),
    })
}

// =============================================================================
// Generation
// =============================================================================

async fn generate_video(
    State(app): State<Arc<App>>,
    payload: Result<Json<GenerateVideoRequest>, JsonRejection>,
) -> Result<Json<GenerateVideoResponse>, ApiError> {
    // A missing or unreadable body is the same as a missing prompt.
    let prompt = payload
        .ok()
        .and_then(|Json(request)| request.prompt)
        .unwrap_or_default();

    let handle = app.use_cases.generation.submit.execute(&prompt).await?;

    Ok(Json(GenerateVideoResponse {
        success: true,
        operation: handle.to_string(),
        message: "Video generation started. Use the operation name to check status.".to_string(),
    }))
}

async fn operation_status(
    State(app): State<Arc<App>>,
    Path(operation): Path<String>,
) -> Result<Json<OperationStatusResponse>, ApiError> {
    let handle = parse_handle(&operation)?;
    let status = app.use_cases.generation.poll.execute(&handle).await?;
    Ok(Json(status_response(&handle, status)))
}

async fn download_video(
    State(app): State<Arc<App>>,
    Path(operation): Path<String>,
) -> Result<Json<VideoResultResponse>, ApiError> {
    let handle = parse_handle(&operation)?;
    let fetch_result = &app.use_cases.generation.fetch_result;
    let descriptor = fetch_result.execute(&handle).await?;
    let duration = fetch_result.params().duration_label();

    Ok(Json(VideoResultResponse {
        success: true,
        video: video_response(descriptor, duration),
    }))
}

fn parse_handle(operation: &str) -> Result<OperationHandle, ApiError> {
    OperationHandle::new(operation).map_err(|e| ApiError::InvalidOperation(e.to_string()))
}

fn status_response(handle: &OperationHandle, status: OperationStatus) -> OperationStatusResponse {
    let operation = handle.to_string();
    match status {
        OperationStatus::Pending => OperationStatusResponse::Pending {
            operation,
            done: false,
        },
        OperationStatus::Succeeded(payload) => OperationStatusResponse::Succeeded {
            operation,
            done: true,
            video_count: payload.samples.len(),
        },
        OperationStatus::Failed(detail) => OperationStatusResponse::Failed {
            operation,
            done: true,
            error: provider_failure(detail),
        },
        OperationStatus::NotFoundYet { retry_after } => OperationStatusResponse::NotFoundYet {
            operation,
            done: false,
            retry_after_secs: retry_after.as_secs().max(1),
            message: "Operation not found yet. It may still be initializing.".to_string(),
        },
    }
}

fn provider_failure(detail: FailureDetail) -> ProviderFailure {
    ProviderFailure {
        http_status: detail.http_status,
        code: detail.code,
        message: detail.message,
        raw: detail.raw,
    }
}

fn video_response(descriptor: ArtifactDescriptor, duration: String) -> VideoResponse {
    let resolution = descriptor.resolution;
    let mime_type = descriptor.artifact.mime_type().to_string();

    match descriptor.artifact {
        artifact @ Artifact::Inline { .. } => VideoResponse {
            format: VideoFormat::Inline,
            data_url: artifact.data_uri(),
            gcs_uri: None,
            signed_url: None,
            mime_type,
            duration,
            resolution,
        },
        Artifact::Reference { locator, uri, .. } => VideoResponse {
            format: VideoFormat::Reference,
            data_url: None,
            gcs_uri: Some(locator.to_string()),
            signed_url: Some(uri),
            mime_type,
            duration,
            resolution,
        },
    }
}

// =============================================================================
// Prompt composition
// =============================================================================

async fn compose_prompt(
    State(app): State<Arc<App>>,
    payload: Result<Json<ComposePromptRequest>, JsonRejection>,
) -> Result<Json<ComposePromptResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::Validation(e.body_text()))?;
    let prompt = app.use_cases.prompt.execute(ComposeRequest {
        preset: request.preset,
        selections: request.selections.into_iter().collect(),
        scene_description: request.scene_description,
        inspiration: request.inspiration,
    })?;

    Ok(Json(ComposePromptResponse {
        prompt: prompt.into(),
    }))
}

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug)]
pub enum ApiError {
    MissingPrompt,
    InvalidOperation(String),
    IncompleteSelection(Vec<Category>),
    Validation(String),
    NotComplete(&'static str),
    Auth(AuthError),
    Provider { status: u16, body: String },
    InvalidProviderResponse(String),
    GenerationFailed(FailureDetail),
    InvalidArtifact(String),
    Unreachable(String),
}

impl ApiError {
    fn parts(self) -> (StatusCode, ErrorResponse) {
        match self {
            ApiError::MissingPrompt => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new(ErrorCode::MissingPrompt, "Prompt is required"),
            ),
            ApiError::InvalidOperation(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new(ErrorCode::InvalidOperation, msg),
            ),
            ApiError::IncompleteSelection(missing) => {
                let missing: Vec<&str> = missing.iter().map(|c| c.as_str()).collect();
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse::new(
                        ErrorCode::IncompleteSelection,
                        "Every category needs a selection",
                    )
                    .with_details(json!({ "missing": missing })),
                )
            }
            ApiError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new(ErrorCode::ValidationError, msg),
            ),
            ApiError::NotComplete(status) => (
                StatusCode::CONFLICT,
                ErrorResponse::new(ErrorCode::OperationNotComplete, "Operation not completed yet")
                    .with_details(json!({ "status": status })),
            ),
            ApiError::Auth(e) => {
                tracing::error!(error = %e, "Provider credentials unavailable");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    ErrorResponse::new(ErrorCode::AuthFailed, "Authentication failed"),
                )
            }
            ApiError::Provider { status, body } => (
                StatusCode::BAD_GATEWAY,
                ErrorResponse::new(
                    ErrorCode::ProviderError,
                    format!("Provider responded with status {status}"),
                )
                .with_details(json!({ "status": status, "body": body })),
            ),
            ApiError::InvalidProviderResponse(msg) => (
                StatusCode::BAD_GATEWAY,
                ErrorResponse::new(ErrorCode::ProviderError, msg),
            ),
            ApiError::GenerationFailed(detail) => {
                let details = serde_json::to_value(&detail).ok();
                let mut body = ErrorResponse::new(
                    ErrorCode::GenerationFailed,
                    format!("Video generation failed: {}", detail.message),
                );
                body.details = details;
                (StatusCode::BAD_GATEWAY, body)
            }
            ApiError::InvalidArtifact(msg) => (
                StatusCode::BAD_GATEWAY,
                ErrorResponse::new(ErrorCode::InvalidArtifact, msg),
            ),
            ApiError::Unreachable(msg) => (
                StatusCode::GATEWAY_TIMEOUT,
                ErrorResponse::new(ErrorCode::ProviderUnreachable, msg),
            ),
        }
    }
}

impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, body) = self.parts();
        if !body.code.is_client_error() {
            tracing::warn!(status = status.as_u16(), code = ?body.code, error = %body.error, "Request failed");
        }
        (status, Json(body)).into_response()
    }
}

impl From<VideoGenError> for ApiError {
    fn from(e: VideoGenError) -> Self {
        match e {
            VideoGenError::Auth(e) => ApiError::Auth(e),
            VideoGenError::Transport(msg) => ApiError::Unreachable(msg),
            VideoGenError::Provider { status, body } => ApiError::Provider { status, body },
            VideoGenError::InvalidResponse(msg) => ApiError::InvalidProviderResponse(msg),
            VideoGenError::InvalidHandle(msg) => ApiError::InvalidOperation(msg),
        }
    }
}

impl From<SubmitError> for ApiError {
    fn from(e: SubmitError) -> Self {
        match e {
            SubmitError::MissingPrompt => ApiError::MissingPrompt,
            SubmitError::Provider(e) => e.into(),
        }
    }
}

impl From<PollError> for ApiError {
    fn from(e: PollError) -> Self {
        match e {
            PollError::Auth(e) => ApiError::Auth(e),
            PollError::Transient(msg) => ApiError::Unreachable(msg),
            PollError::InvalidResponse(msg) => ApiError::InvalidProviderResponse(msg),
            PollError::InvalidHandle(msg) => ApiError::InvalidOperation(msg),
        }
    }
}

impl From<FetchError> for ApiError {
    fn from(e: FetchError) -> Self {
        match e {
            FetchError::NotComplete { status } => ApiError::NotComplete(status),
            FetchError::GenerationFailed(detail) => ApiError::GenerationFailed(detail),
            FetchError::Materialize(e) => ApiError::InvalidArtifact(e.to_string()),
            FetchError::Storage(e) => ApiError::InvalidArtifact(e.to_string()),
            FetchError::Poll(e) => e.into(),
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::IncompleteSelection { missing } => ApiError::IncompleteSelection(missing),
            DomainError::InvalidHandle(msg) => ApiError::InvalidOperation(msg),
            other => ApiError::Validation(other.to_string()),
        }
    }
}
