use std::time::{Duration, SystemTime, UNIX_EPOCH};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::state::security_config::SecurityConfig;

/// Claims carried by our access tokens.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Numeric subject identifier.
    pub sub: i64,
    pub email: String,
    pub role: String,
    /// Issued-at (seconds since epoch)
    pub iat: i64,
    /// Expiry (seconds since epoch)
    pub exp: i64,
}

/// Verification failure causes. Callers collapse these before anything
/// reaches a client; the distinction exists for logging and tests.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("no signing secret configured")]
    Config,
    #[error("token expired")]
    Expired,
    #[error("token invalid")]
    Invalid,
}

/// Mint a signed access token for the given subject.
///
/// `ttl` overrides the configured default lifetime when present. Fails
/// with a configuration error when no signing secret is set.
pub fn issue_token(
    sub: i64,
    email: &str,
    role: &str,
    now: SystemTime,
    ttl: Option<Duration>,
    security: &SecurityConfig,
) -> Result<String, AppError> {
    issue_token_with_claims(sub, email, role, now, ttl, security).map(|(token, _)| token)
}

/// Like `issue_token`, but also hands back the claims that were signed,
/// for callers that report issuance metadata such as the expiry.
pub fn issue_token_with_claims(
    sub: i64,
    email: &str,
    role: &str,
    now: SystemTime,
    ttl: Option<Duration>,
    security: &SecurityConfig,
) -> Result<(String, Claims), AppError> {
    let secret = security
        .jwt_secret
        .as_deref()
        .ok_or_else(|| AppError::config("token signing secret is not configured"))?;

    let iat = now
        .duration_since(UNIX_EPOCH)
        .map_err(|_| AppError::internal("failed to read current time".to_string()))?
        .as_secs() as i64;
    let exp = iat + ttl.unwrap_or(security.default_token_ttl).as_secs() as i64;

    let claims = Claims {
        sub,
        email: email.to_string(),
        role: role.to_string(),
        iat,
        exp,
    };

    let token = encode(
        &Header::new(security.algorithm),
        &claims,
        &EncodingKey::from_secret(secret),
    )
    .map_err(|e| AppError::internal(format!("failed to encode token: {e}")))?;

    Ok((token, claims))
}

/// Verify a token's signature and expiry and return its claims.
///
/// Never panics and never returns a raw library error; every failure is
/// one of the three `TokenError` causes.
pub fn verify_token(token: &str, security: &SecurityConfig) -> Result<Claims, TokenError> {
    let secret = security.jwt_secret.as_deref().ok_or(TokenError::Config)?;

    // Pin the algorithm and validate exp with no leeway.
    let mut validation = Validation::new(security.algorithm);
    validation.leeway = 0;

    let claims = decode::<Claims>(token, &DecodingKey::from_secret(secret), &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Invalid,
        })?;

    // The library still admits a token through the second where now == exp;
    // the contract here is strict (valid only while now < exp), so the
    // boundary is checked explicitly.
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0);
    if claims.exp <= now {
        return Err(TokenError::Expired);
    }

    Ok(claims)
}

/// Best-effort read of a token's payload without verifying the signature.
///
/// Diagnostics only. Returns `None` for structurally malformed tokens and
/// must never feed an authorization decision.
pub fn decode_unverified(token: &str) -> Option<Claims> {
    let mut segments = token.split('.');
    let _header = segments.next()?;
    let payload = segments.next()?;
    let _signature = segments.next()?;
    if segments.next().is_some() {
        return None;
    }

    let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
    serde_json::from_slice(&bytes).ok()
}
