//! Single status query with classification.

use std::sync::Arc;
use std::time::Duration;
use veodirector_domain::{FailureDetail, OperationHandle, OperationStatus, SucceededPayload};

use crate::infrastructure::ports::{
    AuthError, OperationReport, OperationSnapshot, VideoGenError, VideoGenPort,
};

/// Queries the provider once and classifies the answer. No retry, no cache.
pub struct PollOperation {
    video_gen: Arc<dyn VideoGenPort>,
    retry_hint: Duration,
}

impl PollOperation {
    pub fn new(video_gen: Arc<dyn VideoGenPort>, retry_hint: Duration) -> Self {
        Self {
            video_gen,
            retry_hint,
        }
    }

    pub async fn execute(&self, handle: &OperationHandle) -> Result<OperationStatus, PollError> {
        let status = match self.video_gen.fetch_operation(handle).await {
            Ok(snapshot) => classify(snapshot, self.retry_hint),
            Err(VideoGenError::Provider { status, body }) => {
                OperationStatus::Failed(FailureDetail::from_http(status, body))
            }
            Err(VideoGenError::Auth(e)) => return Err(PollError::Auth(e)),
            Err(VideoGenError::Transport(msg)) => return Err(PollError::Transient(msg)),
            Err(VideoGenError::InvalidResponse(msg)) => {
                return Err(PollError::InvalidResponse(msg))
            }
            Err(VideoGenError::InvalidHandle(msg)) => return Err(PollError::InvalidHandle(msg)),
        };

        tracing::debug!(operation = %handle, status = status.name(), "Classified operation status");
        Ok(status)
    }
}

/// Map a provider snapshot to a status. An error field wins over `done`.
pub fn classify(snapshot: OperationSnapshot, retry_hint: Duration) -> OperationStatus {
    match snapshot {
        OperationSnapshot::NotFound => OperationStatus::NotFoundYet {
            retry_after: retry_hint,
        },
        OperationSnapshot::Reported(OperationReport {
            done: true,
            error: Some(error),
            ..
        }) => OperationStatus::Failed(FailureDetail::from_operation_error(
            error.code,
            error.message,
            Some(error.raw),
        )),
        OperationSnapshot::Reported(OperationReport {
            done: true,
            samples,
            ..
        }) => OperationStatus::Succeeded(SucceededPayload { samples }),
        OperationSnapshot::Reported(_) => OperationStatus::Pending,
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum PollError {
    #[error(transparent)]
    Auth(AuthError),
    /// Provider unreachable; safe to ask again.
    #[error("Provider unreachable: {0}")]
    Transient(String),
    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),
    #[error("Invalid operation handle: {0}")]
    InvalidHandle(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{MockVideoGenPort, OperationErrorBody};
    use veodirector_domain::VideoSample;

    const HINT: Duration = Duration::from_secs(15);

    fn report(done: bool, error: Option<OperationErrorBody>, samples: Vec<VideoSample>) -> OperationSnapshot {
        OperationSnapshot::Reported(OperationReport {
            done,
            error,
            samples,
        })
    }

    fn blocked() -> OperationErrorBody {
        OperationErrorBody {
            code: Some(3),
            message: "Prompt blocked".to_string(),
            raw: r#"{"code":3,"message":"Prompt blocked"}"#.to_string(),
        }
    }

    fn use_case(video_gen: MockVideoGenPort) -> PollOperation {
        PollOperation::new(Arc::new(video_gen), HINT)
    }

    #[test]
    fn not_done_is_pending() {
        assert_eq!(classify(report(false, None, vec![]), HINT), OperationStatus::Pending);
    }

    #[test]
    fn error_wins_over_done_and_payload() {
        let sample = VideoSample {
            inline_base64: Some("AAAA".to_string()),
            ..Default::default()
        };
        let status = classify(report(true, Some(blocked()), vec![sample]), HINT);

        let OperationStatus::Failed(detail) = status else {
            panic!("expected failure, got {status:?}");
        };
        assert_eq!(detail.code, Some(3));
        assert_eq!(detail.message, "Prompt blocked");
        assert!(detail.raw.unwrap().contains("Prompt blocked"));
    }

    #[test]
    fn done_without_error_succeeds_even_when_empty() {
        assert_eq!(
            classify(report(true, None, vec![]), HINT),
            OperationStatus::Succeeded(SucceededPayload::default())
        );
    }

    #[test]
    fn not_found_carries_positive_hint() {
        let status = classify(OperationSnapshot::NotFound, HINT);
        assert_eq!(status, OperationStatus::NotFoundYet { retry_after: HINT });
    }

    #[tokio::test]
    async fn provider_status_becomes_failure_with_raw_body() {
        let mut video_gen = MockVideoGenPort::new();
        video_gen.expect_fetch_operation().returning(|_| {
            Err(VideoGenError::Provider {
                status: 500,
                body: "internal".to_string(),
            })
        });

        let status = use_case(video_gen)
            .execute(&OperationHandle::new("op-1").unwrap())
            .await
            .unwrap();

        let OperationStatus::Failed(detail) = status else {
            panic!("expected failure");
        };
        assert_eq!(detail.http_status, Some(500));
        assert_eq!(detail.raw.as_deref(), Some("internal"));
    }

    #[tokio::test]
    async fn transport_failure_is_transient() {
        let mut video_gen = MockVideoGenPort::new();
        video_gen
            .expect_fetch_operation()
            .returning(|_| Err(VideoGenError::Transport("connection reset".to_string())));

        let err = use_case(video_gen)
            .execute(&OperationHandle::new("op-1").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, PollError::Transient(_)));
    }

    #[tokio::test]
    async fn every_call_queries_the_provider() {
        let mut video_gen = MockVideoGenPort::new();
        video_gen
            .expect_fetch_operation()
            .times(3)
            .returning(|_| Ok(OperationSnapshot::NotFound));

        let poll = use_case(video_gen);
        let handle = OperationHandle::new("op-1").unwrap();
        for _ in 0..3 {
            poll.execute(&handle).await.unwrap();
        }
    }
}
