//! Error types for the moon transit validator
//!
//! Each collaborator has its own error enum so the report can decide how to
//! render a failure. None of them is fatal: the binary always exits cleanly.

use std::process::ExitStatus;
use std::time::Duration;

use thiserror::Error;

/// Application-level error, raised while preparing a run
#[derive(Error, Debug)]
pub enum ValidatorError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl ValidatorError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            ValidatorError::Config { .. } => {
                "Configuration error. Please check moon-transit.toml and MOONTRANSIT_* variables."
                    .to_string()
            }
            ValidatorError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            ValidatorError::Io { .. } => {
                "Could not write the report. Please check the output stream.".to_string()
            }
        }
    }
}

/// Why the astrotimes executable produced no transit time
#[derive(Error, Debug)]
pub enum AstrotimesError {
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("timed out after {} seconds", .0.as_secs_f64())]
    Timeout(Duration),

    #[error("exited with {0}")]
    Exit(ExitStatus),

    #[error("no Moon transit line in output")]
    NoTransit,
}

/// Failure of a USNO one-day request
#[derive(Error, Debug)]
pub enum UsnoError {
    /// Any status other than 200 OK
    #[error("{0}")]
    Status(u16),

    #[error("{0}")]
    Request(#[from] reqwest::Error),

    #[error(transparent)]
    Config(#[from] ValidatorError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let config_err = ValidatorError::config("timeout out of range");
        assert!(matches!(config_err, ValidatorError::Config { .. }));

        let validation_err = ValidatorError::validation("invalid coordinates");
        assert!(matches!(validation_err, ValidatorError::Validation { .. }));
    }

    #[test]
    fn test_user_messages() {
        let config_err = ValidatorError::config("test");
        assert!(config_err.user_message().contains("Configuration error"));

        let validation_err = ValidatorError::validation("latitude 91");
        assert!(validation_err.user_message().contains("latitude 91"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err: ValidatorError = io_err.into();
        assert!(matches!(err, ValidatorError::Io { .. }));
        assert!(err.user_message().contains("Could not write the report"));
    }

    #[test]
    fn test_astrotimes_error_messages() {
        let timeout = AstrotimesError::Timeout(Duration::from_secs(5));
        assert_eq!(timeout.to_string(), "timed out after 5 seconds");

        let missing = AstrotimesError::NoTransit;
        assert_eq!(missing.to_string(), "no Moon transit line in output");

        let spawn = AstrotimesError::Spawn {
            program: "./target/release/astrotimes".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert!(spawn.to_string().starts_with("failed to start ./target/release/astrotimes"));
    }

    #[test]
    fn test_usno_status_renders_code_only() {
        assert_eq!(UsnoError::Status(404).to_string(), "404");
    }
}
