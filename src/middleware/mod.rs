pub mod authenticate;
pub mod authorize;
pub mod rate_limit;

pub use authenticate::Authenticate;
pub use authorize::RequireRole;
pub use rate_limit::{RateLimitPolicy, RateLimiter};
