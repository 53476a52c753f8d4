// src/infra/logger.rs — Structured logging with tracing
//
// Logs go to stderr: stdout carries hook output and must stay clean.

use tracing_subscriber::{fmt, EnvFilter};

/// Crate-specific override, checked before RUST_LOG.
pub const LOG_ENV: &str = "RULECATCH_LOG";

/// Filter directives: RULECATCH_LOG, then RUST_LOG, then `fallback`.
fn build_filter(fallback: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(fallback))
}

pub fn init_logging(level: &str) {
    let subscriber = fmt()
        .with_env_filter(build_filter(level))
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    // A second init (e.g. from tests) keeps the first subscriber.
    let _ = subscriber.try_init();
}
