#![allow(dead_code)]

// tests/common/mod.rs
use actix_web::body::MessageBody;
use actix_web::dev::ServiceResponse;
use actix_web::test;
use once_cell::sync::OnceCell;
use serde_json::Value;
use tracing_subscriber::{fmt, EnvFilter};

// Logging is auto-installed for each test binary
#[ctor::ctor]
fn init_logging() {
    static INITIALIZED: OnceCell<()> = OnceCell::new();
    INITIALIZED.get_or_init(|| {
        let filter = std::env::var("TEST_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .map(EnvFilter::new)
            .unwrap_or_else(|_| EnvFilter::new("warn"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .without_time()
            .try_init()
            .ok();
    });
}

/// Validate the structured error body `{success, message, statusCode}`.
pub async fn assert_error_body<B>(resp: ServiceResponse<B>, expected_status: u16, expected_message: &str)
where
    B: MessageBody,
    B::Error: std::fmt::Debug,
{
    assert_eq!(resp.status().as_u16(), expected_status);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], expected_message);
    assert_eq!(body["statusCode"], expected_status);
}

/// Read the `X-RateLimit-*` header triple, if present.
pub fn rate_limit_headers<B>(resp: &ServiceResponse<B>) -> Option<(u64, u64, u64)> {
    let read = |name: &str| -> Option<u64> {
        resp.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
    };

    Some((
        read("x-ratelimit-limit")?,
        read("x-ratelimit-remaining")?,
        read("x-ratelimit-reset")?,
    ))
}
