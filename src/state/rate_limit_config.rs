use std::time::Duration;

/// Process-wide rate limiting settings supplied by the deployment
/// environment. Individual route groups refine these into a
/// `RateLimitPolicy` with their own key prefix.
#[derive(Debug, Clone)]
pub struct RateLimitSettings {
    /// When false, the limiter middleware passes every request through.
    pub enabled: bool,
    /// Default counting window.
    pub window: Duration,
    /// Default maximum admitted requests per window.
    pub max: u64,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            window: Duration::from_millis(900_000),
            max: 100,
        }
    }
}
