//! Resilience layer: clock, sliding-window rate limiter and per-call deadline.
//!
//! Every outbound call goes through [`CallGuard::execute`], which first waits
//! for limiter admission and only then starts the deadline timer. There is no
//! automatic retry.

mod clock;
mod rate_limiter;
mod timeout;

pub use clock::{sleep_or_cancel, Clock, SystemClock};
pub use rate_limiter::{
    RateLimiter, RateLimiterConfig, DEFAULT_SAFETY_MARGIN, GEMINI_MAX_REQUESTS, GEMINI_WINDOW,
    KIE_MAX_REQUESTS, KIE_WINDOW,
};
pub use timeout::{TimeoutGate, GEMINI_DEADLINE, KIE_DEADLINE};

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::error::GenJobResult;

/// Rate limiter plus deadline, applied to each network call.
#[derive(Debug, Clone)]
pub struct CallGuard {
    limiter: Arc<RateLimiter>,
    gate: TimeoutGate,
}

impl CallGuard {
    /// Creates a guard sharing `limiter`.
    pub fn new(limiter: Arc<RateLimiter>, deadline: Duration) -> Self {
        Self {
            limiter,
            gate: TimeoutGate::new(deadline),
        }
    }

    /// Shared limiter.
    pub fn limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    /// Per-call deadline.
    pub fn deadline(&self) -> Duration {
        self.gate.deadline()
    }

    /// Acquires a limiter slot, then runs `call` under the deadline.
    pub async fn execute<T, F, Fut>(&self, cancel: Option<&CancellationToken>, call: F) -> GenJobResult<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = GenJobResult<T>>,
    {
        self.limiter.acquire(cancel).await?;
        self.gate.run(cancel, call).await
    }
}
