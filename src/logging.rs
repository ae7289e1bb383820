//! Diagnostic logging.
//!
//! Logs go to stderr so rendered templates written to stdout stay clean.

use tracing_subscriber::EnvFilter;

/// Environment variable holding a `tracing` filter directive, e.g.
/// `MALBOXES_LOG=malboxes::config=trace`.
pub const LOG_ENV: &str = "MALBOXES_LOG";

/// Install the global subscriber.
///
/// `MALBOXES_LOG` wins when set; otherwise the level is `debug` with
/// `--debug` and `warn` without. Calling this more than once is harmless.
pub fn init(debug: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| default_filter(debug));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(debug)
        .without_time()
        .try_init();
}

fn default_filter(debug: bool) -> EnvFilter {
    EnvFilter::new(if debug { "debug" } else { "warn" })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::level_filters::LevelFilter;

    #[test]
    fn test_default_filter_levels() {
        assert_eq!(default_filter(true).max_level_hint(), Some(LevelFilter::DEBUG));
        assert_eq!(default_filter(false).max_level_hint(), Some(LevelFilter::WARN));
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init(false);
        init(true);
        tracing::debug!("still running");
    }
}
