//! Error types for the x-collector application.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the application.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration value for '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    #[error("Missing required configuration: {0}")]
    MissingConfig(String),

    // Session bootstrap errors
    #[error("Session exchange failed after {attempts} attempt(s): {source}")]
    AuthExchange {
        attempts: u32,
        #[source]
        source: Box<Error>,
    },

    #[error("Invalid session: {0}")]
    Session(String),

    // Upstream errors
    #[error("Fetch failed: {0}")]
    Fetch(String),

    #[error("Rate limited by upstream")]
    RateLimited,

    #[error("Unexpected payload: {0}")]
    Validation(String),

    // Storage errors
    #[error("Could not read {}: {message}", path.display())]
    PersistenceRead { path: PathBuf, message: String },

    #[error("Invalid filename (path traversal attempt): {0}")]
    InvalidFilename(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // HTTP errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid header value: {0}")]
    Header(#[from] reqwest::header::InvalidHeaderValue),

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Process exit code for a run aborted by this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Config(_)
            | Error::ConfigValidation { .. }
            | Error::MissingConfig(_)
            | Error::TomlParse(_) => exit_codes::CONFIG_ERROR,
            Error::AuthExchange { .. } | Error::Session(_) => exit_codes::AUTH_ERROR,
            Error::Fetch(_) | Error::RateLimited | Error::Http(_) => exit_codes::API_ERROR,
            _ => exit_codes::UNEXPECTED_ERROR,
        }
    }
}

/// Process exit codes.
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const API_ERROR: i32 = 2;
    pub const CONFIG_ERROR: i32 = 3;
    pub const AUTH_ERROR: i32 = 4;
    pub const UNEXPECTED_ERROR: i32 = 5;
    pub const SOME_ITEMS_FAILED: i32 = 6;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_exchange_carries_last_error() {
        let err = Error::AuthExchange {
            attempts: 3,
            source: Box::new(Error::Fetch("HTTP 503".into())),
        };
        let message = err.to_string();
        assert!(message.contains("3 attempt"));
        assert!(message.contains("HTTP 503"));
        assert_eq!(err.exit_code(), exit_codes::AUTH_ERROR);
    }

    #[test]
    fn test_exit_codes_by_kind() {
        assert_eq!(
            Error::MissingConfig("auth_token".into()).exit_code(),
            exit_codes::CONFIG_ERROR
        );
        assert_eq!(Error::RateLimited.exit_code(), exit_codes::API_ERROR);
        assert_eq!(
            Error::PersistenceRead {
                path: PathBuf::from("tweets/2024-01-01.json"),
                message: "EOF".into(),
            }
            .exit_code(),
            exit_codes::UNEXPECTED_ERROR
        );
    }
}
