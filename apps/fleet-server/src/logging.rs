//! tracing-subscriber setup for the server binary

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global subscriber. `RUST_LOG` overrides `default_filter`.
pub fn init_logging(default_filter: &str, json: bool) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let registry = tracing_subscriber::registry().with(env_filter);
    // Ignore the error if a subscriber is already installed
    let _ = if json {
        registry
            .with(fmt::layer().json().with_current_span(true))
            .try_init()
    } else {
        registry.with(fmt::layer().with_target(true)).try_init()
    };
}

/// Filter directive for the configured level, raised by `--verbose`
pub fn default_filter(level: &str, verbose: u8) -> String {
    let level = match verbose {
        0 => level,
        1 => "debug",
        _ => "trace",
    };
    format!("{level},tower_http={level},sqlx=warn")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_flag_raises_level() {
        assert_eq!(default_filter("info", 0), "info,tower_http=info,sqlx=warn");
        assert_eq!(default_filter("info", 1), "debug,tower_http=debug,sqlx=warn");
        assert_eq!(default_filter("warn", 3), "trace,tower_http=trace,sqlx=warn");
    }

    #[test]
    fn init_logging_is_idempotent() {
        init_logging("warn", false);
        init_logging("warn", true);
    }
}
