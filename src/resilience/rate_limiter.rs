//! Sliding-window rate limiter.
//!
//! Keeps the timestamps of admitted requests inside the trailing window. A
//! caller that would push the count past `max_requests` sleeps until the
//! oldest timestamp leaves the window (plus a safety margin) and then
//! re-measures. The lock is never held across the sleep.

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::clock::{sleep_or_cancel, Clock, SystemClock};
use crate::error::{CancelPoint, GenJobError, GenJobResult};

/// Default Kie.ai budget: requests per window.
pub const KIE_MAX_REQUESTS: u32 = 18;
/// Default Kie.ai window.
pub const KIE_WINDOW: Duration = Duration::from_secs(10);
/// Default Gemini budget: requests per window.
pub const GEMINI_MAX_REQUESTS: u32 = 10;
/// Default Gemini window.
pub const GEMINI_WINDOW: Duration = Duration::from_secs(60);
/// Extra delay added to every computed wait.
pub const DEFAULT_SAFETY_MARGIN: Duration = Duration::from_millis(100);

/// Configuration for the rate limiter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimiterConfig {
    /// Maximum requests admitted per window. Always at least 1.
    pub max_requests: u32,
    /// Length of the sliding window.
    pub window: Duration,
    /// Added to each computed wait so the oldest timestamp has surely expired.
    pub safety_margin: Duration,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self::kie()
    }
}

impl RateLimiterConfig {
    /// Creates a configuration with the default safety margin.
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests: max_requests.max(1),
            window,
            safety_margin: DEFAULT_SAFETY_MARGIN,
        }
    }

    /// Kie.ai budget: 18 requests per 10 seconds.
    pub fn kie() -> Self {
        Self::new(KIE_MAX_REQUESTS, KIE_WINDOW)
    }

    /// Gemini budget: 10 requests per minute.
    pub fn gemini() -> Self {
        Self::new(GEMINI_MAX_REQUESTS, GEMINI_WINDOW)
    }

    /// Creates a configuration with no rate limiting.
    pub fn unlimited() -> Self {
        Self {
            max_requests: u32::MAX,
            window: Duration::ZERO,
            safety_margin: Duration::ZERO,
        }
    }

    /// Overrides the safety margin.
    pub fn with_safety_margin(mut self, margin: Duration) -> Self {
        self.safety_margin = margin;
        self
    }
}

/// Sliding-window rate limiter shared by every call of one provider client.
pub struct RateLimiter {
    config: RateLimiterConfig,
    clock: Arc<dyn Clock>,
    timestamps: Mutex<VecDeque<Instant>>,
}

impl RateLimiter {
    /// Creates a limiter on the tokio clock.
    pub fn new(config: RateLimiterConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Creates a limiter reading time from `clock`.
    pub fn with_clock(config: RateLimiterConfig, clock: Arc<dyn Clock>) -> Self {
        let config = RateLimiterConfig {
            max_requests: config.max_requests.max(1),
            ..config
        };
        Self {
            config,
            clock,
            timestamps: Mutex::new(VecDeque::new()),
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &RateLimiterConfig {
        &self.config
    }

    /// Waits until one more request fits the window, then records it.
    ///
    /// Returns the cancellation outcome without recording anything if
    /// `cancel` has fired or fires while waiting.
    pub async fn acquire(&self, cancel: Option<&CancellationToken>) -> GenJobResult<()> {
        loop {
            if cancel.is_some_and(CancellationToken::is_cancelled) {
                return Err(GenJobError::cancelled(CancelPoint::RateLimit));
            }
            let wait = match self.admit() {
                Ok(()) => return Ok(()),
                Err(wait) => wait,
            };

            tracing::debug!(wait_ms = wait.as_millis() as u64, "Rate limit reached, waiting");
            sleep_or_cancel(self.clock.as_ref(), wait, cancel, CancelPoint::RateLimit).await?;
        }
    }

    /// Records a request if it fits the window right now.
    pub fn try_acquire(&self) -> bool {
        self.admit().is_ok()
    }

    /// Number of timestamps currently inside the window.
    pub fn recorded(&self) -> usize {
        let now = self.clock.now();
        let mut timestamps = self.timestamps.lock();
        self.prune(&mut timestamps, now);
        timestamps.len()
    }

    /// Forgets every recorded timestamp.
    pub fn reset(&self) {
        self.timestamps.lock().clear();
    }

    // Prune, check and append under one lock. Err carries the wait.
    fn admit(&self) -> Result<(), Duration> {
        let now = self.clock.now();
        let mut timestamps = self.timestamps.lock();
        self.prune(&mut timestamps, now);

        if timestamps.len() < self.config.max_requests as usize {
            timestamps.push_back(now);
            return Ok(());
        }

        let age = timestamps
            .front()
            .map_or(Duration::ZERO, |oldest| now.saturating_duration_since(*oldest));
        Err(self.config.window.saturating_sub(age) + self.config.safety_margin)
    }

    fn prune(&self, timestamps: &mut VecDeque<Instant>, now: Instant) {
        while let Some(oldest) = timestamps.front() {
            if now.saturating_duration_since(*oldest) >= self.config.window {
                timestamps.pop_front();
            } else {
                break;
            }
        }
    }
}

impl fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RateLimiter")
            .field("config", &self.config)
            .field("recorded", &self.timestamps.lock().len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::ManualClock;

    #[test]
    fn test_config_presets() {
        assert_eq!(RateLimiterConfig::kie().max_requests, 18);
        assert_eq!(RateLimiterConfig::kie().window, Duration::from_secs(10));
        assert_eq!(RateLimiterConfig::gemini().max_requests, 10);
        assert_eq!(RateLimiterConfig::gemini().window, Duration::from_secs(60));
        assert_eq!(RateLimiterConfig::new(0, Duration::from_secs(1)).max_requests, 1);
    }

    #[tokio::test]
    async fn test_acquire_within_budget_does_not_wait() {
        let clock = Arc::new(ManualClock::new());
        let limiter = RateLimiter::with_clock(
            RateLimiterConfig::new(3, Duration::from_secs(10)),
            clock.clone(),
        );

        for _ in 0..3 {
            limiter.acquire(None).await.unwrap();
        }

        assert_eq!(limiter.recorded(), 3);
        assert!(clock.sleeps().is_empty());
    }

    #[tokio::test]
    async fn test_acquire_over_budget_waits_for_oldest_plus_margin() {
        let clock = Arc::new(ManualClock::new());
        let limiter = RateLimiter::with_clock(
            RateLimiterConfig::new(2, Duration::from_secs(10)),
            clock.clone(),
        );

        limiter.acquire(None).await.unwrap();
        clock.advance(Duration::from_secs(4));
        limiter.acquire(None).await.unwrap();
        limiter.acquire(None).await.unwrap();

        assert_eq!(clock.sleeps(), vec![Duration::from_millis(6_100)]);
        assert_eq!(limiter.recorded(), 2);
    }

    #[test]
    fn test_try_acquire_and_reset() {
        let limiter = RateLimiter::with_clock(
            RateLimiterConfig::new(1, Duration::from_secs(10)),
            Arc::new(ManualClock::new()),
        );

        assert!(limiter.try_acquire());
        assert!(!limiter.try_acquire());
        limiter.reset();
        assert!(limiter.try_acquire());
    }

    #[test]
    fn test_unlimited_never_blocks() {
        let limiter = RateLimiter::with_clock(RateLimiterConfig::unlimited(), Arc::new(ManualClock::new()));
        for _ in 0..1000 {
            assert!(limiter.try_acquire());
        }
        assert!(limiter.recorded() <= 1);
    }

    #[tokio::test]
    async fn test_cancelled_wait_records_nothing() {
        let limiter = RateLimiter::with_clock(
            RateLimiterConfig::new(1, Duration::from_secs(10)),
            Arc::new(ManualClock::new()),
        );
        limiter.acquire(None).await.unwrap();
        let token = CancellationToken::new();
        token.cancel();

        let result = limiter.acquire(Some(&token)).await;

        assert!(result.unwrap_err().is_cancelled());
        assert_eq!(limiter.recorded(), 1);
    }

    #[tokio::test]
    async fn test_cancelled_token_takes_no_free_slot() {
        let limiter = RateLimiter::with_clock(
            RateLimiterConfig::new(2, Duration::from_secs(10)),
            Arc::new(ManualClock::new()),
        );
        let token = CancellationToken::new();
        token.cancel();

        let result = limiter.acquire(Some(&token)).await;

        assert!(matches!(
            result,
            Err(GenJobError::Cancelled { point: CancelPoint::RateLimit })
        ));
        assert_eq!(limiter.recorded(), 0);
    }
}
