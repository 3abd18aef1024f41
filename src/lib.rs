#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod auth;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod store;

#[cfg(test)]
pub mod test_bootstrap;

// Re-exports for public API
pub use auth::identity::RequestIdentity;
pub use auth::provider::{CredentialError, CredentialVerifier, VerifiedIdentity};
pub use auth::token::{
    decode_unverified, issue_token, issue_token_with_claims, verify_token, Claims, TokenError,
};
pub use error::AppError;
pub use middleware::authenticate::Authenticate;
pub use middleware::authorize::RequireRole;
pub use middleware::rate_limit::{RateLimitPolicy, RateLimiter};
pub use state::app_state::AppState;
pub use state::rate_limit_config::RateLimitSettings;
pub use state::security_config::SecurityConfig;
pub use store::{CounterStore, MemoryCounterStore, RedisCounterStore, StoreError};

// Prelude for test convenience
pub mod prelude {
    pub use super::auth::identity::*;
    pub use super::auth::token::*;
    pub use super::error::*;
    pub use super::middleware::*;
    pub use super::state::*;
    pub use super::store::*;
}

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    test_bootstrap::logging::init();
}
