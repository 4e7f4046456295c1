use crate::state::AppState;
use axum::extract::{ConnectInfo, Request, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use governor::clock::{Clock, DefaultClock};
use governor::state::keyed::DefaultKeyedStateStore;
use governor::{Quota, RateLimiter};
use pmp_core::config::RateLimitConfig;
use std::net::SocketAddr;
use std::num::NonZeroU32;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

type KeyedLimiter = RateLimiter<String, DefaultKeyedStateStore<String>, DefaultClock>;

/// Checks between sweeps of fully replenished client entries.
const PRUNE_EVERY: u64 = 1024;

/// Per-client request budget: `max_requests` may be spent at once, and the
/// budget refills evenly over `window_seconds`.
///
/// One entry is kept per client key. Entries whose budget has fully
/// refilled are dropped every `PRUNE_EVERY` checks.
pub struct ClientLimiter {
    limiter: KeyedLimiter,
    clock: DefaultClock,
    checks: AtomicU64,
    prune_every: u64,
}

impl ClientLimiter {
    pub fn new(cfg: &RateLimitConfig) -> Self {
        let burst = NonZeroU32::new(cfg.max_requests).unwrap_or(NonZeroU32::MIN);
        let window = Duration::from_secs(cfg.window_seconds.max(1));
        let quota = Quota::with_period(window / burst.get())
            .unwrap_or_else(|| Quota::per_second(burst))
            .allow_burst(burst);
        Self {
            limiter: RateLimiter::keyed(quota),
            clock: DefaultClock::default(),
            checks: AtomicU64::new(0),
            prune_every: PRUNE_EVERY,
        }
    }

    /// `Err` carries how long the client should wait.
    pub fn check(&self, key: &str) -> Result<(), Duration> {
        let n = self.checks.fetch_add(1, Ordering::Relaxed) + 1;
        if n % self.prune_every == 0 {
            self.prune();
        }
        self.limiter
            .check_key(&key.to_string())
            .map_err(|not_until| not_until.wait_time_from(self.clock.now()))
    }

    /// Drop entries for clients whose budget has fully refilled.
    pub fn prune(&self) {
        let before = self.limiter.len();
        self.limiter.retain_recent();
        self.limiter.shrink_to_fit();
        let after = self.limiter.len();
        if after < before {
            tracing::debug!(removed = before - after, remaining = after, "pruned rate-limit entries");
        }
    }

    /// Number of tracked client keys.
    pub fn tracked(&self) -> usize {
        self.limiter.len()
    }
}

/// Client key: socket peer address, else the first `x-forwarded-for` entry,
/// else `"unknown"`.
pub fn client_key(req: &Request) -> String {
    if let Some(ConnectInfo(addr)) = req.extensions().get::<ConnectInfo<SocketAddr>>() {
        return addr.ip().to_string();
    }
    req.headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

pub async fn rate_limit_middleware(
    State(app): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let key = client_key(&req);
    match app.limiter.check(&key) {
        Ok(()) => next.run(req).await,
        Err(wait) => {
            tracing::warn!(client = %key, path = %req.uri().path(), "rate limit exceeded");
            let body = serde_json::json!({
                "success": false,
                "error": "Too many requests, please try again later."
            });
            let mut response = (StatusCode::TOO_MANY_REQUESTS, axum::Json(body)).into_response();
            let secs = wait.as_secs().max(1);
            if let Ok(v) = HeaderValue::from_str(&secs.to_string()) {
                response.headers_mut().insert(header::RETRY_AFTER, v);
            }
            response
        }
    }
}
