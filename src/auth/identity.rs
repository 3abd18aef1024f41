use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpMessage, HttpRequest};
use futures_util::future::{ready, Ready};
use serde::{Deserialize, Serialize};

use crate::auth::token::Claims;
use crate::error::AppError;

/// Identity attached to a request for its lifetime only, never persisted.
/// Produced by the authentication middleware, read by the authorization
/// middleware and handlers.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RequestIdentity {
    /// Stringified numeric subject id from the token payload.
    pub sub: String,
    pub email: String,
    pub role: String,
}

impl RequestIdentity {
    pub fn from_claims(claims: &Claims) -> Self {
        Self {
            sub: claims.sub.to_string(),
            email: claims.email.clone(),
            role: claims.role.clone(),
        }
    }
}

impl FromRequest for RequestIdentity {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<RequestIdentity>()
                .cloned()
                .ok_or_else(AppError::unauthenticated),
        )
    }
}
