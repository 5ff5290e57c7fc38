//! Structured logging configuration.
//!
//! The library only emits `tracing` events; binaries decide where they go.
//! This module sets up a subscriber with:
//! - Configurable log level, overridable through `RUST_LOG`
//! - Plain text or JSON output

use tracing_subscriber::{
    filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt, Registry,
};

/// Initialize tracing with the given level and output format.
///
/// Events go to stderr so that listings on stdout stay machine-readable.
///
/// # Panics
///
/// Panics if a global subscriber has already been installed in this process.
pub fn init_tracing(level: &str, json: bool) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if json {
        let json_layer = fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_file(true)
            .with_line_number(true);

        Registry::default().with(env_filter).with(json_layer).init();
    } else {
        let fmt_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false);

        Registry::default().with(env_filter).with(fmt_layer).init();
    }

    tracing::debug!("Tracing initialized: level={}, json={}", level, json);
}

/// Spans for file operations.
pub mod spans {
    use std::path::Path;

    use tracing::{info_span, Span};

    /// Create a span covering one load or save of a config file.
    #[must_use]
    pub fn file_span(operation: &str, path: &Path) -> Span {
        info_span!(
            "config_file",
            operation = %operation,
            path = %path.display(),
        )
    }
}
