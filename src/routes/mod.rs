pub mod auth;
pub mod health;
pub mod private;

use actix_web::web;

/// Unprotected surface: health probe only. Login and the protected scope
/// are wired by the embedder so the middleware stack stays explicit at
/// the call site.
pub fn configure(cfg: &mut web::ServiceConfig) {
    health::configure_routes(cfg);
}
