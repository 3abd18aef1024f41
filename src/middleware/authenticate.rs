//! Authentication middleware
//!
//! Extracts a Bearer token from the Authorization header, verifies it and
//! stores a `RequestIdentity` in request extensions for the authorization
//! middleware and handlers. Every failure path collapses to the same 401
//! so clients never learn why a token was refused.

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header;
use actix_web::{web, Error, HttpMessage};
use futures_util::future::{ready, LocalBoxFuture, Ready};
use tracing::{debug, warn};

use crate::auth::identity::RequestIdentity;
use crate::auth::token::verify_token;
use crate::error::AppError;
use crate::state::app_state::AppState;

pub struct Authenticate;

impl<S, B> Transform<S, ServiceRequest> for Authenticate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthenticateMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthenticateMiddleware { service }))
    }
}

pub struct AuthenticateMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for AuthenticateMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // Malformed or missing credentials fail before the token service
        // is ever consulted.
        let token = match extract_bearer(&req) {
            Some(token) => token,
            None => {
                return Box::pin(async { Err(AppError::invalid_token().into()) });
            }
        };

        let security = match req.app_data::<web::Data<AppState>>() {
            Some(state) => state.security.clone(),
            None => {
                // Wiring bug, but still rendered as the generic 401: this
                // step never leaks an internal cause to the client.
                warn!("AppState missing from request, refusing token");
                return Box::pin(async { Err(AppError::invalid_token().into()) });
            }
        };

        match verify_token(&token, &security) {
            Ok(claims) => {
                req.extensions_mut()
                    .insert(RequestIdentity::from_claims(&claims));
                let fut = self.service.call(req);
                Box::pin(fut)
            }
            Err(cause) => {
                debug!(%cause, "token verification failed");
                Box::pin(async { Err(AppError::invalid_token().into()) })
            }
        }
    }
}

/// Accepts exactly `Bearer <token>` with a non-empty token.
fn extract_bearer(req: &ServiceRequest) -> Option<String> {
    let value = req.headers().get(header::AUTHORIZATION)?;
    let value = value.to_str().ok()?;

    let parts: Vec<&str> = value.split_whitespace().collect();
    if parts.len() != 2 || parts[0] != "Bearer" || parts[1].is_empty() {
        return None;
    }

    Some(parts[1].to_string())
}
