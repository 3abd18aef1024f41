//! Distributed fixed-window rate limiting middleware
//!
//! Counts requests per client in an external atomic-counter store so that
//! every service instance enforces the same window. When the store is
//! unreachable the limiter fails open: availability of the protected
//! service outranks strict enforcement.

use std::fmt;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::error::ResponseError;
use actix_web::http::StatusCode;
use actix_web::{Error, HttpResponse};
use futures_util::future::{ready, LocalBoxFuture, Ready};
use tracing::warn;

use crate::error::{rate_limit_header, AppError};
use crate::store::{CounterStore, StoreError};

/// Per-route-group limiter configuration. Immutable once built.
#[derive(Debug, Clone)]
pub struct RateLimitPolicy {
    /// Counting window; counters expire when it elapses.
    pub window: Duration,
    /// Maximum admitted requests per window.
    pub max: u64,
    /// Distinguishes this route group's counters in the shared store.
    pub key_prefix: String,
}

impl RateLimitPolicy {
    pub fn new(window: Duration, max: u64, key_prefix: impl Into<String>) -> Self {
        Self {
            window,
            max,
            key_prefix: key_prefix.into(),
        }
    }
}

struct RateLimiterInner {
    policy: RateLimitPolicy,
    enabled: bool,
    store: Arc<dyn CounterStore>,
}

#[derive(Clone)]
pub struct RateLimiter {
    inner: Arc<RateLimiterInner>,
}

impl RateLimiter {
    pub fn new(policy: RateLimitPolicy, enabled: bool, store: Arc<dyn CounterStore>) -> Self {
        Self {
            inner: Arc::new(RateLimiterInner {
                policy,
                enabled,
                store,
            }),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimiter
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimiterMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimiterMiddleware {
            service: Rc::new(service),
            inner: self.inner.clone(),
        }))
    }
}

pub struct RateLimiterMiddleware<S> {
    service: Rc<S>,
    inner: Arc<RateLimiterInner>,
}

impl<S, B> Service<ServiceRequest> for RateLimiterMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let inner = self.inner.clone();
        let service = Rc::clone(&self.service);

        if !inner.enabled {
            return Box::pin(service.call(req));
        }

        let key = {
            let conn_info = req.connection_info();
            let client = conn_info.realip_remote_addr().unwrap_or("undefined");
            format!("{}:{}", inner.policy.key_prefix, client)
        };

        Box::pin(async move {
            let window = match count_in_window(&*inner.store, &key, inner.policy.window).await {
                Ok(window) => window,
                Err(err) => {
                    // Fail open: admit the request, set no headers.
                    warn!(%err, %key, "counter store failed, admitting request unlimited");
                    return service.call(req).await;
                }
            };

            let remaining = inner.policy.max.saturating_sub(window.count);
            let reset_secs = ttl_to_reset_secs(window.ttl_ms);

            if window.count > inner.policy.max {
                return Err(AppError::RateLimited {
                    limit: inner.policy.max,
                    remaining,
                    reset_secs,
                }
                .into());
            }

            // The counted request keeps its header triple whether the rest
            // of the chain admits it or not.
            match service.call(req).await {
                Ok(mut res) => {
                    let headers = res.headers_mut();
                    let (name, value) = rate_limit_header("x-ratelimit-limit", inner.policy.max);
                    headers.insert(name, value);
                    let (name, value) = rate_limit_header("x-ratelimit-remaining", remaining);
                    headers.insert(name, value);
                    let (name, value) = rate_limit_header("x-ratelimit-reset", reset_secs);
                    headers.insert(name, value);
                    Ok(res)
                }
                Err(err) => Err(CountedError {
                    inner: err,
                    limit: inner.policy.max,
                    remaining,
                    reset_secs,
                }
                .into()),
            }
        })
    }
}

/// Wraps a downstream failure so its rendered response still carries the
/// rate-limit header triple the counted request earned.
struct CountedError {
    inner: Error,
    limit: u64,
    remaining: u64,
    reset_secs: u64,
}

impl fmt::Debug for CountedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.inner, f)
    }
}

impl fmt::Display for CountedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

impl ResponseError for CountedError {
    fn status_code(&self) -> StatusCode {
        self.inner.as_response_error().status_code()
    }

    fn error_response(&self) -> HttpResponse {
        let mut res = self.inner.error_response();
        let headers = res.headers_mut();
        let (name, value) = rate_limit_header("x-ratelimit-limit", self.limit);
        headers.insert(name, value);
        let (name, value) = rate_limit_header("x-ratelimit-remaining", self.remaining);
        headers.insert(name, value);
        let (name, value) = rate_limit_header("x-ratelimit-reset", self.reset_secs);
        headers.insert(name, value);
        res
    }
}

struct WindowState {
    count: u64,
    ttl_ms: i64,
}

/// Increment the window counter and read its remaining TTL.
///
/// The TTL is only set when the increment created the counter. Two
/// concurrent first requests may both observe fresh-enough state to set
/// it; the set is idempotent, so the race is harmless.
async fn count_in_window(
    store: &dyn CounterStore,
    key: &str,
    window: Duration,
) -> Result<WindowState, StoreError> {
    let count = store.incr(key).await?;
    if count == 1 {
        store.expire(key, window).await?;
    }
    let ttl_ms = store.ttl_ms(key).await?;
    Ok(WindowState { count, ttl_ms })
}

/// Seconds until the window resets, rounded up. Negative TTLs (missing
/// key or no expiry) clamp to zero.
fn ttl_to_reset_secs(ttl_ms: i64) -> u64 {
    let ttl_ms = ttl_ms.max(0) as u64;
    ttl_ms.div_ceil(1000)
}

#[cfg(test)]
mod tests {
    use super::ttl_to_reset_secs;

    #[test]
    fn test_reset_rounds_up() {
        assert_eq!(ttl_to_reset_secs(900_000), 900);
        assert_eq!(ttl_to_reset_secs(60_000), 60);
        assert_eq!(ttl_to_reset_secs(59_001), 60);
        assert_eq!(ttl_to_reset_secs(1), 1);
        assert_eq!(ttl_to_reset_secs(0), 0);
        assert_eq!(ttl_to_reset_secs(-1), 0);
        assert_eq!(ttl_to_reset_secs(-2), 0);
    }
}
