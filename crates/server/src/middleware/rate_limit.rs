//! Global rate limiting for credential endpoints.

use std::num::NonZeroU32;
use std::sync::Arc;

use axum::{extract::Request, middleware::Next, response::Response};
use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use tracing::warn;

use studypoint_common::errors::AppError;

/// Process-wide token bucket shared by every caller of the guarded
/// route. Login is the only brute-forceable surface, so one global
/// bucket is enough.
#[derive(Clone)]
pub struct GlobalRateLimiter {
    limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

impl GlobalRateLimiter {
    pub fn new(per_second: u32, burst: u32) -> Self {
        let per_second = NonZeroU32::new(per_second.max(1)).unwrap_or(NonZeroU32::MIN);
        let burst = NonZeroU32::new(burst.max(1)).unwrap_or(NonZeroU32::MIN);
        let quota = Quota::per_second(per_second).allow_burst(burst);
        Self {
            limiter: Arc::new(RateLimiter::direct(quota)),
        }
    }

    pub fn check(&self) -> bool {
        self.limiter.check().is_ok()
    }
}

pub async fn enforce(
    limiter: GlobalRateLimiter,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if !limiter.check() {
        warn!(path = %req.uri().path(), "rate limit exceeded");
        return Err(AppError::RateLimited);
    }
    Ok(next.run(req).await)
}
