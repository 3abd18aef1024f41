//! Role-based authorization middleware
//!
//! Built after the authentication middleware has attached a
//! `RequestIdentity`. Distinguishes "not authenticated" (401) from
//! "authenticated but lacking the role" (403); the two cases mean
//! different things to an operator.

use std::collections::HashSet;
use std::sync::Arc;

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, HttpMessage};
use futures_util::future::{ready, LocalBoxFuture, Ready};

use crate::auth::identity::RequestIdentity;
use crate::error::AppError;

pub struct RequireRole {
    allowed: Arc<HashSet<String>>,
}

impl RequireRole {
    /// Build a reusable check allowing the given role names. Matching is
    /// case-sensitive and exact; an empty role can never match.
    pub fn new<I, R>(roles: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<String>,
    {
        Self {
            allowed: Arc::new(roles.into_iter().map(Into::into).collect()),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireRoleMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireRoleMiddleware {
            service,
            allowed: self.allowed.clone(),
        }))
    }
}

pub struct RequireRoleMiddleware<S> {
    service: S,
    allowed: Arc<HashSet<String>>,
}

impl<S, B> Service<ServiceRequest> for RequireRoleMiddleware<S>
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
        let identity = req.extensions().get::<RequestIdentity>().cloned();

        match identity {
            None => Box::pin(async { Err(AppError::unauthenticated().into()) }),
            Some(identity) if !self.allowed.contains(&identity.role) => {
                Box::pin(async { Err(AppError::forbidden().into()) })
            }
            Some(_) => {
                let fut = self.service.call(req);
                Box::pin(fut)
            }
        }
    }
}
