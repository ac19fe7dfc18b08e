//! Time source and cancellable delay used by every suspension point.

use futures::future::BoxFuture;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::{CancelPoint, GenJobError, GenJobResult};

/// Supplies the current instant and a delay future.
///
/// The limiter and the poll loop only ever read time through this trait, so
/// tests can substitute a manual clock and run without real sleeps.
pub trait Clock: Send + Sync {
    /// Current instant.
    fn now(&self) -> Instant;

    /// Future that resolves after `duration`.
    fn sleep(&self, duration: Duration) -> BoxFuture<'static, ()>;
}

/// Clock backed by the tokio timer.
///
/// Honors `tokio::time::pause`, which the timing tests rely on.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) -> BoxFuture<'static, ()> {
        Box::pin(tokio::time::sleep(duration))
    }
}

/// Sleeps for `duration` unless `cancel` fires first.
///
/// A zero duration returns immediately. Cancellation wins over an elapsed
/// timer when both are ready.
pub async fn sleep_or_cancel(
    clock: &dyn Clock,
    duration: Duration,
    cancel: Option<&CancellationToken>,
    point: CancelPoint,
) -> GenJobResult<()> {
    if let Some(token) = cancel {
        if token.is_cancelled() {
            return Err(GenJobError::cancelled(point));
        }
    }
    if duration.is_zero() {
        return Ok(());
    }

    let delay = clock.sleep(duration);
    match cancel {
        Some(token) => {
            tokio::select! {
                biased;
                () = token.cancelled() => Err(GenJobError::cancelled(point)),
                () = delay => Ok(()),
            }
        }
        None => {
            delay.await;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_system_clock_sleep_advances_paused_time() {
        let clock = SystemClock;
        let start = clock.now();

        sleep_or_cancel(&clock, Duration::from_secs(5), None, CancelPoint::PollSleep)
            .await
            .unwrap();

        assert!(clock.now() - start >= Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_interrupts_sleep() {
        let clock = SystemClock;
        let token = CancellationToken::new();
        let trigger = token.clone();
        let start = clock.now();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            trigger.cancel();
        });

        let result =
            sleep_or_cancel(&clock, Duration::from_secs(60), Some(&token), CancelPoint::PollSleep).await;

        assert!(matches!(
            result,
            Err(GenJobError::Cancelled { point: CancelPoint::PollSleep })
        ));
        assert!(clock.now() - start < Duration::from_secs(60));
    }

    #[tokio::test]
    async fn test_already_cancelled_returns_immediately() {
        let token = CancellationToken::new();
        token.cancel();

        let result =
            sleep_or_cancel(&SystemClock, Duration::ZERO, Some(&token), CancelPoint::RateLimit).await;

        assert!(result.unwrap_err().is_cancelled());
    }
}
