//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::Config;
use thiserror::Error;

/// Validation errors for configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("server.name is required")]
    MissingServerName,
    #[error("server.name must not contain whitespace, got '{0}'")]
    InvalidServerName(String),
    #[error("server.password must not be empty")]
    EmptyPassword,
    #[error("limits.{0} must be greater than zero")]
    ZeroLimit(&'static str),
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let name = &config.server.name;
    if name.is_empty() {
        errors.push(ValidationError::MissingServerName);
    } else if name.chars().any(char::is_whitespace) {
        errors.push(ValidationError::InvalidServerName(name.clone()));
    }

    if config.server.password.as_deref() == Some("") {
        errors.push(ValidationError::EmptyPassword);
    }

    let limits = &config.limits;
    for (field, value) in [
        ("max_connections", limits.max_connections),
        ("recv_buffer", limits.recv_buffer),
        ("max_input_buffer", limits.max_input_buffer),
        ("sendq", limits.sendq),
        ("nick_len", limits.nick_len),
        ("channel_len", limits.channel_len),
    ] {
        if value == 0 {
            errors.push(ValidationError::ZeroLimit(field));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
