//! Bounded polling loop until an operation reaches a terminal state.

use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use veodirector_domain::{
    FailureDetail, OperationHandle, OperationStatus, PollPolicy, PollState, SucceededPayload,
};

use super::poll::{PollError, PollOperation};
use crate::infrastructure::ports::AuthError;

/// One loop step, reported to the caller after each status query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollProgress {
    pub attempt: u32,
    pub max_attempts: u32,
    /// Status name, or `transient_error` when the provider was unreachable
    pub state: &'static str,
    pub elapsed: Duration,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum AwaitError {
    #[error("Video generation failed: {0}")]
    GenerationFailed(FailureDetail),

    #[error("Operation did not finish after {attempts} attempts ({elapsed:?})")]
    TimedOut { attempts: u32, elapsed: Duration },

    /// The provider kept answering "not found" past the grace window.
    /// `elapsed` counts from the first "not found" of the current run.
    #[error("Operation was never registered by the provider ({elapsed:?})")]
    OperationGone { elapsed: Duration },

    #[error(transparent)]
    Auth(AuthError),

    #[error(transparent)]
    Poll(PollError),
}

/// Waits `interval` before each attempt and stops after `max_attempts`.
///
/// Dropping the returned future cancels the loop at its next await point.
pub struct AwaitOperation {
    poll: Arc<PollOperation>,
    policy: PollPolicy,
}

impl AwaitOperation {
    pub fn new(poll: Arc<PollOperation>, policy: PollPolicy) -> Self {
        Self { poll, policy }
    }

    pub fn policy(&self) -> &PollPolicy {
        &self.policy
    }

    pub async fn execute<F>(
        &self,
        handle: &OperationHandle,
        mut on_progress: F,
    ) -> Result<SucceededPayload, AwaitError>
    where
        F: FnMut(&PollProgress) + Send,
    {
        let started = Instant::now();
        let max_attempts = self.policy.max_attempts;
        let mut state = PollState::Pending;
        // Start of the current run of "not found" answers.
        let mut not_found_since: Option<Instant> = None;

        for attempt in 1..=max_attempts {
            sleep(self.policy.interval).await;

            let outcome = self.poll.execute(handle).await;
            let elapsed = started.elapsed();
            let progress = |name| PollProgress {
                attempt,
                max_attempts,
                state: name,
                elapsed,
            };

            let status = match outcome {
                Ok(status) => status,
                Err(PollError::Transient(message)) => {
                    not_found_since = None;
                    on_progress(&progress("transient_error"));
                    tracing::warn!(
                        operation = %handle,
                        attempt,
                        max_attempts,
                        error = %message,
                        "Status query failed, will retry"
                    );
                    continue;
                }
                Err(PollError::Auth(e)) => return Err(AwaitError::Auth(e)),
                Err(e) => return Err(AwaitError::Poll(e)),
            };

            on_progress(&progress(status.name()));
            state = state.observe(&status);

            if !matches!(status, OperationStatus::NotFoundYet { .. }) {
                not_found_since = None;
            }

            match status {
                OperationStatus::Succeeded(payload) => {
                    tracing::info!(
                        operation = %handle,
                        attempt,
                        elapsed_secs = elapsed.as_secs(),
                        "Operation succeeded"
                    );
                    return Ok(payload);
                }
                OperationStatus::Failed(detail) => {
                    tracing::warn!(operation = %handle, attempt, error = %detail, "Operation failed");
                    return Err(AwaitError::GenerationFailed(detail));
                }
                OperationStatus::NotFoundYet { .. } => {
                    let since = *not_found_since.get_or_insert_with(Instant::now);
                    let unknown_for = since.elapsed();
                    if unknown_for > self.policy.not_found_grace {
                        tracing::warn!(
                            operation = %handle,
                            attempt,
                            unknown_secs = unknown_for.as_secs(),
                            "Operation still unknown after grace window"
                        );
                        return Err(AwaitError::OperationGone {
                            elapsed: unknown_for,
                        });
                    }
                    tracing::debug!(
                        operation = %handle,
                        attempt,
                        unknown_secs = unknown_for.as_secs(),
                        "Operation not visible yet"
                    );
                }
                OperationStatus::Pending => {
                    tracing::debug!(operation = %handle, attempt, max_attempts, "Operation still running");
                }
            }
        }

        let elapsed = started.elapsed();
        tracing::warn!(
            operation = %handle,
            attempts = max_attempts,
            state = ?state.time_out(),
            elapsed_secs = elapsed.as_secs(),
            "Gave up waiting for operation"
        );
        Err(AwaitError::TimedOut {
            attempts: max_attempts,
            elapsed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{
        MockVideoGenPort, OperationReport, OperationSnapshot, VideoGenError,
    };
    use std::sync::atomic::{AtomicU32, Ordering};
    use veodirector_domain::VideoSample;

    fn pending() -> OperationSnapshot {
        OperationSnapshot::Reported(OperationReport {
            done: false,
            error: None,
            samples: vec![],
        })
    }

    fn succeeded() -> OperationSnapshot {
        OperationSnapshot::Reported(OperationReport {
            done: true,
            error: None,
            samples: vec![VideoSample {
                inline_base64: Some("AAAA".to_string()),
                mime_type: Some("video/mp4".to_string()),
                ..Default::default()
            }],
        })
    }

    fn await_with(video_gen: MockVideoGenPort, policy: PollPolicy) -> AwaitOperation {
        let poll = Arc::new(PollOperation::new(Arc::new(video_gen), policy.retry_hint));
        AwaitOperation::new(poll, policy)
    }

    fn handle() -> OperationHandle {
        OperationHandle::new("op-123").unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn never_finishing_job_times_out_at_the_ceiling() {
        let mut video_gen = MockVideoGenPort::new();
        video_gen
            .expect_fetch_operation()
            .times(60)
            .returning(|_| Ok(pending()));

        let policy = PollPolicy::default();
        let started = Instant::now();
        let err = await_with(video_gen, policy.clone())
            .execute(&handle(), |_| {})
            .await
            .unwrap_err();

        assert!(started.elapsed() >= Duration::from_secs(600));
        match err {
            AwaitError::TimedOut { attempts, elapsed } => {
                assert_eq!(attempts, 60);
                assert!(elapsed >= policy.ceiling());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn returns_payload_after_pending_polls() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let mut video_gen = MockVideoGenPort::new();
        video_gen.expect_fetch_operation().returning(move |_| {
            if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                Ok(pending())
            } else {
                Ok(succeeded())
            }
        });

        let mut seen = Vec::new();
        let payload = await_with(video_gen, PollPolicy::default())
            .execute(&handle(), |p| seen.push((p.attempt, p.state)))
            .await
            .unwrap();

        assert_eq!(payload.samples.len(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(
            seen,
            vec![(1, "pending"), (2, "pending"), (3, "succeeded")]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn waits_before_every_attempt() {
        let mut video_gen = MockVideoGenPort::new();
        video_gen
            .expect_fetch_operation()
            .times(1)
            .returning(|_| Ok(succeeded()));

        let started = Instant::now();
        await_with(video_gen, PollPolicy::default())
            .execute(&handle(), |_| {})
            .await
            .unwrap();

        assert!(started.elapsed() >= Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn failure_stops_the_loop() {
        let mut video_gen = MockVideoGenPort::new();
        video_gen.expect_fetch_operation().times(1).returning(|_| {
            Err(VideoGenError::Provider {
                status: 400,
                body: "bad request".to_string(),
            })
        });

        let err = await_with(video_gen, PollPolicy::default())
            .execute(&handle(), |_| {})
            .await
            .unwrap_err();

        assert!(matches!(err, AwaitError::GenerationFailed(ref d) if d.http_status == Some(400)));
    }

    #[tokio::test(start_paused = true)]
    async fn transient_errors_consume_attempts() {
        let mut video_gen = MockVideoGenPort::new();
        video_gen
            .expect_fetch_operation()
            .times(3)
            .returning(|_| Err(VideoGenError::Transport("timeout".to_string())));

        let policy = PollPolicy {
            max_attempts: 3,
            ..Default::default()
        };
        let mut states = Vec::new();
        let err = await_with(video_gen, policy)
            .execute(&handle(), |p| states.push(p.state))
            .await
            .unwrap_err();

        assert!(matches!(err, AwaitError::TimedOut { attempts: 3, .. }));
        assert_eq!(states, vec!["transient_error"; 3]);
    }

    #[tokio::test(start_paused = true)]
    async fn auth_failure_is_fatal() {
        let mut video_gen = MockVideoGenPort::new();
        video_gen.expect_fetch_operation().times(1).returning(|_| {
            Err(VideoGenError::Auth(AuthError::NotConfigured { provider: "static" }))
        });

        let err = await_with(video_gen, PollPolicy::default())
            .execute(&handle(), |_| {})
            .await
            .unwrap_err();
        assert!(matches!(err, AwaitError::Auth(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn not_found_within_grace_keeps_polling() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let mut video_gen = MockVideoGenPort::new();
        video_gen.expect_fetch_operation().returning(move |_| {
            if counter.fetch_add(1, Ordering::SeqCst) < 3 {
                Ok(OperationSnapshot::NotFound)
            } else {
                Ok(succeeded())
            }
        });

        let payload = await_with(video_gen, PollPolicy::default())
            .execute(&handle(), |_| {})
            .await
            .unwrap();
        assert_eq!(payload.samples.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn persistent_not_found_ends_as_gone() {
        let mut video_gen = MockVideoGenPort::new();
        video_gen
            .expect_fetch_operation()
            .times(5)
            .returning(|_| Ok(OperationSnapshot::NotFound));

        let policy = PollPolicy {
            not_found_grace: Duration::from_secs(35),
            ..Default::default()
        };
        let err = await_with(video_gen, policy)
            .execute(&handle(), |_| {})
            .await
            .unwrap_err();

        match err {
            AwaitError::OperationGone { elapsed } => {
                assert!(elapsed > Duration::from_secs(35));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn late_not_found_after_long_pending_keeps_polling() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let mut video_gen = MockVideoGenPort::new();
        video_gen.expect_fetch_operation().returning(move |_| {
            match counter.fetch_add(1, Ordering::SeqCst) {
                0..=14 => Ok(pending()),
                15 => Ok(OperationSnapshot::NotFound),
                _ => Ok(succeeded()),
            }
        });

        let payload = await_with(video_gen, PollPolicy::default())
            .execute(&handle(), |_| {})
            .await
            .unwrap();

        assert_eq!(payload.samples.len(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 17);
    }

    #[tokio::test(start_paused = true)]
    async fn pending_resets_the_not_found_window() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let mut video_gen = MockVideoGenPort::new();
        video_gen.expect_fetch_operation().returning(move |_| {
            match counter.fetch_add(1, Ordering::SeqCst) {
                0..=2 | 4..=6 => Ok(OperationSnapshot::NotFound),
                3 => Ok(pending()),
                _ => Ok(succeeded()),
            }
        });

        // Each run of "not found" lasts 20s, under the 35s grace.
        let policy = PollPolicy {
            not_found_grace: Duration::from_secs(35),
            ..Default::default()
        };
        let payload = await_with(video_gen, policy)
            .execute(&handle(), |_| {})
            .await
            .unwrap();

        assert_eq!(payload.samples.len(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 8);
    }
}
