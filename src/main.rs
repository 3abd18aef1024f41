use std::sync::Arc;
use std::time::Duration;

use actix_web::{web, App, HttpServer};
use gatekeeper::middleware::authenticate::Authenticate;
use gatekeeper::middleware::rate_limit::{RateLimitPolicy, RateLimiter};
use gatekeeper::routes;
use gatekeeper::state::app_state::AppState;
use gatekeeper::state::rate_limit_config::RateLimitSettings;
use gatekeeper::state::security_config::SecurityConfig;
use gatekeeper::store::{CounterStore, RedisCounterStore};

mod telemetry;

fn env_u64(name: &str, default: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Environment variables must be set by the runtime environment:
    // - Docker: Set via docker-compose env_file or docker run --env-file
    // - Local dev: Source env files manually (e.g., set -a; . ./.env; set +a)
    let host = std::env::var("GATEKEEPER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("GATEKEEPER_PORT")
        .unwrap_or_else(|_| "3001".to_string())
        .parse::<u16>()
        .unwrap_or_else(|_| {
            eprintln!("GATEKEEPER_PORT must be a valid port number");
            std::process::exit(1);
        });

    let jwt = match std::env::var("GATEKEEPER_JWT_SECRET") {
        Ok(jwt) => jwt,
        Err(_) => {
            eprintln!("GATEKEEPER_JWT_SECRET must be set");
            std::process::exit(1);
        }
    };
    let mut security = SecurityConfig::new(jwt.as_bytes());
    if let Ok(ttl) = std::env::var("GATEKEEPER_TOKEN_TTL_SECS") {
        match ttl.parse::<u64>() {
            Ok(secs) => security = security.with_token_ttl(Duration::from_secs(secs)),
            Err(_) => {
                eprintln!("GATEKEEPER_TOKEN_TTL_SECS must be an integer number of seconds");
                std::process::exit(1);
            }
        }
    }

    let defaults = RateLimitSettings::default();
    let settings = RateLimitSettings {
        enabled: std::env::var("RATE_LIMIT_ENABLED")
            .map(|v| v != "false" && v != "0")
            .unwrap_or(defaults.enabled),
        window: Duration::from_millis(env_u64(
            "RATE_LIMIT_WINDOW_MS",
            defaults.window.as_millis() as u64,
        )),
        max: env_u64("RATE_LIMIT_MAX", defaults.max),
    };

    let redis_url =
        std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string());
    let store: Arc<dyn CounterStore> = match RedisCounterStore::connect(&redis_url).await {
        Ok(store) => Arc::new(store),
        Err(e) => {
            eprintln!("Failed to connect to Redis: {e}");
            std::process::exit(1);
        }
    };

    let limiter = RateLimiter::new(
        RateLimitPolicy::new(settings.window, settings.max, "api"),
        settings.enabled,
        store,
    );

    let data = web::Data::new(AppState::new(security));

    tracing::info!(%host, %port, "starting gatekeeper");

    HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .service(
                web::scope("/api/private")
                    .wrap(Authenticate)
                    .wrap(limiter.clone())
                    .configure(routes::private::configure_routes),
            )
            .configure(routes::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
