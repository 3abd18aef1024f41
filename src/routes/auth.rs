use std::time::SystemTime;

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::auth::provider::{CredentialError, CredentialVerifier};
use crate::auth::token::issue_token_with_claims;
use crate::error::AppError;
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Debug, Serialize)]
struct LoginResponse {
    token: String,
    /// Expiry of the issued token, seconds since epoch.
    #[serde(rename = "expiresAt")]
    expires_at: i64,
}

/// Exchange credentials for an access token. Unknown email and wrong
/// password produce the same response; clients don't get to probe which
/// half was wrong.
async fn login(
    app_state: web::Data<AppState>,
    verifier: web::Data<dyn CredentialVerifier>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let identity = verifier
        .verify_credentials(&body.email, &body.password)
        .await
        .map_err(|err| match err {
            CredentialError::UnknownEmail | CredentialError::WrongPassword => {
                debug!(%err, "login refused");
                AppError::invalid_credentials()
            }
            CredentialError::Lookup { detail } => {
                AppError::internal(format!("credential lookup failed: {detail}"))
            }
        })?;

    let (token, claims) = issue_token_with_claims(
        identity.sub,
        &identity.email,
        &identity.role,
        SystemTime::now(),
        None,
        &app_state.security,
    )?;

    Ok(HttpResponse::Ok().json(LoginResponse {
        token,
        expires_at: claims.exp,
    }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/login", web::post().to(login));
}
