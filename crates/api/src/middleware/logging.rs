//! Tracing subscriber setup for the API binary.
//!
//! An explicit `RUST_LOG` wins; otherwise the configured level applies to
//! the service crates and `info` to everything else, keeping dependency
//! noise out of debug runs.

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::config::LoggingConfig;

fn default_directives(level: &str) -> String {
    format!(
        "info,lead_manager_api={level},persistence={level},domain={level},shared={level}",
        level = level
    )
}

/// Installs the global tracing subscriber. `format = "pretty"` is meant for
/// local development; anything else gets structured JSON output.
pub fn init_logging(config: &LoggingConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(&config.level)));

    let registry = tracing_subscriber::registry().with(env_filter);

    if config.format == "pretty" {
        let layer = fmt::layer()
            .pretty()
            .with_span_events(FmtSpan::CLOSE)
            .with_target(true);
        registry.with(layer).init();
    } else {
        let layer = fmt::layer()
            .json()
            .with_span_events(FmtSpan::CLOSE)
            .with_current_span(true)
            .with_target(true);
        registry.with(layer).init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives_scope_service_crates() {
        let directives = default_directives("debug");
        assert!(directives.starts_with("info,"));
        assert!(directives.contains("lead_manager_api=debug"));
        assert!(directives.contains("persistence=debug"));
    }
}
