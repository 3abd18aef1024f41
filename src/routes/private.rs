use actix_web::{web, HttpResponse};

use crate::auth::identity::RequestIdentity;
use crate::error::AppError;

/// Echo the authenticated identity. Exists so the admission pipeline has
/// a protected surface to exercise; real deployments hang their own
/// handlers behind the same middleware stack.
async fn me(identity: RequestIdentity) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(identity))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/me", web::get().to(me));
}
