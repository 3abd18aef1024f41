pub mod app_state;
pub mod rate_limit_config;
pub mod security_config;

pub use app_state::AppState;
pub use rate_limit_config::RateLimitSettings;
pub use security_config::SecurityConfig;
