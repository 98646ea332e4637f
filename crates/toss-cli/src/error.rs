//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Holding-area error
    #[error(transparent)]
    Bin(#[from] toss_bin::BinError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Restore found nothing to restore
    #[error("no matching items found")]
    NoMatch,

    /// Some paths in a batch toss failed
    #[error("{failed} of {total} path(s) could not be tossed")]
    BatchFailed {
        /// Paths that failed
        failed: usize,
        /// Paths submitted
        total: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(CliError::NoMatch.to_string(), "no matching items found");
        assert_eq!(
            CliError::BatchFailed { failed: 1, total: 3 }.to_string(),
            "1 of 3 path(s) could not be tossed"
        );
    }

    #[test]
    fn test_bin_error_is_transparent() {
        let inner = toss_bin::BinError::Refused("/home/me/.toss".into());
        let expected = inner.to_string();
        assert_eq!(CliError::from(inner).to_string(), expected);
    }
}
