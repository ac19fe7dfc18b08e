//! Per-call deadline composed with caller cancellation.

use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::error::{CancelPoint, GenJobError, GenJobResult, TimeoutError};

/// Kie.ai per-call deadline.
pub const KIE_DEADLINE: Duration = Duration::from_secs(30);
/// Gemini per-call deadline.
pub const GEMINI_DEADLINE: Duration = Duration::from_secs(90);

/// Bounds one network call by a deadline and an optional cancellation token.
///
/// The call future is dropped as soon as either fires, so the request never
/// outlives them. The deadline timer is dropped when the call returns.
#[derive(Debug, Clone, Copy)]
pub struct TimeoutGate {
    deadline: Duration,
}

impl TimeoutGate {
    /// Creates a gate with the given deadline.
    pub fn new(deadline: Duration) -> Self {
        Self { deadline }
    }

    /// Returns the deadline.
    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    /// Runs `call` under the deadline.
    pub async fn run<T, F, Fut>(&self, cancel: Option<&CancellationToken>, call: F) -> GenJobResult<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = GenJobResult<T>>,
    {
        let deadline = self.deadline;
        let timed_out = move |_| GenJobError::Timeout(TimeoutError::Deadline { duration: deadline });

        match cancel {
            Some(token) => {
                if token.is_cancelled() {
                    return Err(GenJobError::cancelled(CancelPoint::Request));
                }
                tokio::select! {
                    biased;
                    () = token.cancelled() => Err(GenJobError::cancelled(CancelPoint::Request)),
                    result = tokio::time::timeout(deadline, call()) => result.map_err(timed_out)?,
                }
            }
            None => tokio::time::timeout(deadline, call()).await.map_err(timed_out)?,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn test_fast_call_returns_result() {
        let gate = TimeoutGate::new(Duration::from_secs(30));

        let value = gate.run(None, || async { Ok::<_, GenJobError>(7) }).await.unwrap();

        assert_eq!(value, 7);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_call_hits_deadline() {
        let gate = TimeoutGate::new(Duration::from_secs(30));
        let start = Instant::now();

        let result = gate
            .run(None, || async {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok::<_, GenJobError>(())
            })
            .await;

        let error = result.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Timeout);
        assert_eq!(error.status_code(), 408);
        let elapsed = Instant::now() - start;
        assert!(elapsed >= Duration::from_secs(30));
        assert!(elapsed < Duration::from_secs(31));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_wins_over_pending_call() {
        let gate = TimeoutGate::new(Duration::from_secs(30));
        let token = CancellationToken::new();
        let trigger = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(2)).await;
            trigger.cancel();
        });

        let result = gate
            .run(Some(&token), || async {
                tokio::time::sleep(Duration::from_secs(20)).await;
                Ok::<_, GenJobError>(())
            })
            .await;

        assert!(matches!(
            result,
            Err(GenJobError::Cancelled { point: CancelPoint::Request })
        ));
    }

    #[tokio::test]
    async fn test_call_not_started_when_already_cancelled() {
        let gate = TimeoutGate::new(Duration::from_secs(30));
        let token = CancellationToken::new();
        token.cancel();
        let mut started = false;

        let result = gate
            .run(Some(&token), || {
                started = true;
                async { Ok::<_, GenJobError>(()) }
            })
            .await;

        assert!(result.unwrap_err().is_cancelled());
        assert!(!started);
    }
}
