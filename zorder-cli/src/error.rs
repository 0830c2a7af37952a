//! CLI error type and exit handling.

use thiserror::Error;
use zorder::ZOrderError;

/// Exit code for failed commands.
pub const EXIT_ERROR: i32 = 1;

/// Exit code for malformed arguments.
pub const EXIT_USAGE: i32 = 2;

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Indexing or range search failed.
    #[error(transparent)]
    Index(#[from] ZOrderError),

    /// Configuration could not be resolved.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An argument could not be parsed.
    #[error("Invalid argument: {0}")]
    Usage(String),

    /// Output could not be serialized.
    #[error("Failed to serialize output: {0}")]
    Output(#[from] serde_json::Error),
}

impl CliError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => EXIT_USAGE,
            _ => EXIT_ERROR,
        }
    }

    /// Print the error to stderr and exit.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);
        std::process::exit(self.exit_code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(CliError::Usage("x".into()).exit_code(), EXIT_USAGE);
        assert_eq!(CliError::Config("x".into()).exit_code(), EXIT_ERROR);
        assert_eq!(CliError::from(ZOrderError::EmptyQuery).exit_code(), EXIT_ERROR);
    }

    #[test]
    fn test_library_error_is_transparent() {
        let err = CliError::from(ZOrderError::InsufficientInput(1));
        assert_eq!(err.to_string(), ZOrderError::InsufficientInput(1).to_string());
    }
}
