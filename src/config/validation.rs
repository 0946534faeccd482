//! Configuration validation logic.

use crate::config::loader::Config;
use crate::error::{Error, Result};
use regex::Regex;
use std::sync::OnceLock;

/// Minimum length for an auth token.
const MIN_TOKEN_LENGTH: usize = 20;

/// Minimum length for user agent.
const MIN_USER_AGENT_LENGTH: usize = 40;

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    if config.options.mode.includes_profiles() {
        validate_token("guest_token", &config.credentials.guest_token)?;
    }
    if config.options.mode.includes_timeline() {
        validate_token("auth_token", &config.credentials.auth_token)?;
    }
    validate_user_agent(&config.client.user_agent)?;

    if config.client.max_attempts == 0 {
        return Err(Error::ConfigValidation {
            field: "max_attempts".to_string(),
            message: "At least one attempt is required".to_string(),
        });
    }

    if config.options.min_delay_ms > config.options.max_delay_ms {
        return Err(Error::ConfigValidation {
            field: "min_delay_ms".to_string(),
            message: format!(
                "Minimum delay ({} ms) exceeds maximum delay ({} ms)",
                config.options.min_delay_ms, config.options.max_delay_ms
            ),
        });
    }

    if config.options.timeline_count == 0 {
        return Err(Error::ConfigValidation {
            field: "timeline_count".to_string(),
            message: "Timeline count must be positive".to_string(),
        });
    }

    Ok(())
}

/// Validate a long-lived token.
pub fn validate_token(field: &str, token: &str) -> Result<()> {
    if token.is_empty() {
        return Err(Error::MissingConfig(field.to_string()));
    }

    if token.len() < MIN_TOKEN_LENGTH {
        return Err(Error::ConfigValidation {
            field: field.to_string(),
            message: format!(
                "Token must be at least {} characters (got {})",
                MIN_TOKEN_LENGTH,
                token.len()
            ),
        });
    }

    // Cookie values cannot carry these
    if token.contains(';') || token.contains('=') || token.chars().any(char::is_whitespace) {
        return Err(Error::ConfigValidation {
            field: field.to_string(),
            message: "Token contains characters not allowed in a cookie value".to_string(),
        });
    }

    let token_lower = token.to_lowercase();
    if token_lower.contains("replaceme") || token_lower.contains("your_token") {
        return Err(Error::ConfigValidation {
            field: field.to_string(),
            message: "Token appears to be a placeholder. Please provide your actual auth_token cookie."
                .to_string(),
        });
    }

    Ok(())
}

/// Validate the user agent string.
pub fn validate_user_agent(user_agent: &str) -> Result<()> {
    if user_agent.is_empty() {
        return Err(Error::MissingConfig("user_agent".to_string()));
    }

    if user_agent.len() < MIN_USER_AGENT_LENGTH {
        return Err(Error::ConfigValidation {
            field: "user_agent".to_string(),
            message: format!(
                "User agent must be at least {} characters (got {})",
                MIN_USER_AGENT_LENGTH,
                user_agent.len()
            ),
        });
    }

    Ok(())
}

/// Check that a handle is a well-formed screen name.
pub fn is_valid_handle(handle: &str) -> bool {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^[A-Za-z0-9_]{1,15}$").expect("static pattern"))
        .is_match(handle)
}
