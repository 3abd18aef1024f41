//! Tracing setup for the server binary.
//!
//! Admission decisions (refused tokens, fail-open events) are the signal
//! here, so the pipeline logs at info by default while the redis client
//! stays quiet. `RUST_LOG` overrides the whole filter.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,actix_web=info,redis=warn"));

    // JSON lines with flattened fields, one event per line for log
    // shippers; no ansi, no source locations.
    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_ansi(false)
        .json()
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}
