use thiserror::Error;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::ParseError;

#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("invalid log level filter '{level}': {source}")]
    InvalidFilter {
        level: String,
        #[source]
        source: ParseError,
    },

    #[error("failed to install tracing subscriber: {reason}")]
    Install { reason: String },
}

/// Installs the global fmt subscriber.
///
/// `RUST_LOG` wins when it is set; otherwise `level` is used as the filter.
pub fn init(level: &str) -> Result<(), LoggingError> {
    let filter = env_filter(std::env::var("RUST_LOG").ok().as_deref(), level)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|e| LoggingError::Install { reason: e.to_string() })
}

fn env_filter(rust_log: Option<&str>, level: &str) -> Result<EnvFilter, LoggingError> {
    let directives = rust_log.unwrap_or(level);
    EnvFilter::try_new(directives).map_err(|source| LoggingError::InvalidFilter { level: directives.to_owned(), source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::filter::LevelFilter;

    #[test]
    fn test_level_is_used_without_rust_log() {
        let filter = env_filter(None, "debug").unwrap();
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn test_rust_log_wins() {
        let filter = env_filter(Some("micro_gateway=trace"), "info").unwrap();
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::TRACE));
    }

    #[test]
    fn test_invalid_level() {
        let err = env_filter(None, "micro_gateway=loud").unwrap_err();
        assert!(matches!(err, LoggingError::InvalidFilter { ref level, .. } if level == "micro_gateway=loud"));
    }
}
