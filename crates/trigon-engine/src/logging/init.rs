use std::sync::Once;

/// Filter applied when neither the config nor `RUST_LOG` specify one.
///
/// wgpu internals are noisy at `info`; keep them at `warn`.
pub const DEFAULT_FILTER: &str = "info,wgpu_core=warn,wgpu_hal=warn,naga=warn";

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info",
/// "trigon_engine=debug,wgpu_core=warn").
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

impl LoggingConfig {
    /// Picks the filter: explicit config, then `RUST_LOG`, then [`DEFAULT_FILTER`].
    fn resolve_filter(&self, rust_log: Option<String>) -> String {
        self.env_filter
            .clone()
            .or(rust_log.filter(|f| !f.trim().is_empty()))
            .unwrap_or_else(|| DEFAULT_FILTER.to_string())
    }
}

static INIT: Once = Once::new();

/// Initializes the global logger. Later calls are ignored.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = config.resolve_filter(std::env::var("RUST_LOG").ok());

        let mut builder = env_logger::Builder::new();
        builder.parse_filters(&filter);
        builder.write_style(config.write_style);

        // Another logger may already be installed (tests, embedding hosts).
        if builder.try_init().is_err() {
            return;
        }

        log::debug!("logging initialized with filter \"{filter}\"");
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_filter_wins() {
        let config = LoggingConfig {
            env_filter: Some("debug".into()),
            ..Default::default()
        };
        assert_eq!(config.resolve_filter(Some("trace".into())), "debug");
    }

    #[test]
    fn rust_log_used_when_no_explicit_filter() {
        let config = LoggingConfig::default();
        assert_eq!(config.resolve_filter(Some("warn".into())), "warn");
    }

    #[test]
    fn blank_rust_log_falls_back_to_default() {
        let config = LoggingConfig::default();
        assert_eq!(config.resolve_filter(Some("  ".into())), DEFAULT_FILTER);
        assert_eq!(config.resolve_filter(None), DEFAULT_FILTER);
    }

    #[test]
    fn init_is_idempotent() {
        init_logging(LoggingConfig::default());
        init_logging(LoggingConfig::default());
    }
}
