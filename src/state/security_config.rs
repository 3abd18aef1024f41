use std::time::Duration;

use jsonwebtoken::Algorithm;

/// Default access-token lifetime when no explicit TTL is configured.
const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(15 * 60);

/// Configuration for token signing and verification.
///
/// The secret is optional so that a misconfigured deployment fails at
/// issue/verify time with a structured error instead of panicking at
/// startup. Values are read at call time, so a rotated config takes
/// effect on the next issue/verify.
#[derive(Debug, Clone)]
pub struct SecurityConfig {
    /// Secret key for signing and verifying tokens, if configured.
    pub jwt_secret: Option<Vec<u8>>,
    /// Signing algorithm (defaults to HS256).
    pub algorithm: Algorithm,
    /// Token lifetime applied when issuance gets no explicit TTL.
    pub default_token_ttl: Duration,
}

impl SecurityConfig {
    pub fn new(jwt_secret: impl Into<Vec<u8>>) -> Self {
        Self {
            jwt_secret: Some(jwt_secret.into()),
            algorithm: Algorithm::HS256,
            default_token_ttl: DEFAULT_TOKEN_TTL,
        }
    }

    /// A config with no signing secret. Issue and verify both fail with a
    /// configuration error against this.
    pub fn without_secret() -> Self {
        Self {
            jwt_secret: None,
            algorithm: Algorithm::HS256,
            default_token_ttl: DEFAULT_TOKEN_TTL,
        }
    }

    pub fn with_token_ttl(mut self, ttl: Duration) -> Self {
        self.default_token_ttl = ttl;
        self
    }
}
