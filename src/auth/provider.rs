use async_trait::async_trait;
use thiserror::Error;

/// Identity returned by a successful credential check.
#[derive(Debug, Clone)]
pub struct VerifiedIdentity {
    pub sub: i64,
    pub email: String,
    pub role: String,
}

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("no account for that email")]
    UnknownEmail,
    #[error("password mismatch")]
    WrongPassword,
    #[error("credential lookup failed: {detail}")]
    Lookup { detail: String },
}

/// Boundary to user storage. The pipeline only ever asks "do these
/// credentials belong to an identity"; where and how users are stored is
/// the implementer's business.
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    async fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<VerifiedIdentity, CredentialError>;
}
