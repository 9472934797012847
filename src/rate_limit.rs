/// Write rate limiting
///
/// One process-wide bucket shared by every submission and mutation.
/// Reads are never limited.
use crate::{
    config::RateLimitConfig,
    context::AppContext,
    error::{PetError, PetResult},
};
use axum::{
    extract::{Request, State},
    http::Method,
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter as GovernorLimiter,
};
use std::num::NonZeroU32;

const DEFAULT_WRITES_PER_MINUTE: NonZeroU32 = match NonZeroU32::new(120) {
    Some(n) => n,
    None => unreachable!(),
};

/// Rate limiter for state-changing requests
pub struct RateLimiter {
    enabled: bool,
    writes: GovernorLimiter<NotKeyed, InMemoryState, DefaultClock>,
}

impl RateLimiter {
    pub fn new(config: &RateLimitConfig) -> Self {
        let per_minute =
            NonZeroU32::new(config.writes_per_minute).unwrap_or(DEFAULT_WRITES_PER_MINUTE);

        Self {
            enabled: config.enabled,
            writes: GovernorLimiter::direct(Quota::per_minute(per_minute)),
        }
    }

    /// Take one write permit
    pub fn check_write(&self) -> PetResult<()> {
        if !self.enabled {
            return Ok(());
        }
        self.writes
            .check()
            .map_err(|_| PetError::RateLimitExceeded)
    }
}

fn is_write(method: &Method) -> bool {
    matches!(
        *method,
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    )
}

/// Rate limiting middleware
pub async fn rate_limit_middleware(
    State(ctx): State<AppContext>,
    request: Request,
    next: Next,
) -> Response {
    if is_write(request.method()) {
        if let Err(e) = ctx.rate_limiter.check_write() {
            tracing::warn!(path = %request.uri().path(), "write rate limit exceeded");
            return e.into_response();
        }
    }

    next.run(request).await
}
