use crate::config::types::{Config, HttpConfig, OutputConfig, RetryConfig};
use crate::ConfigError;
use reqwest::header::HeaderValue;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_http_config(&config.http)?;
    validate_retry_config(&config.retry)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates HTTP configuration
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout-secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    validate_header("user-agent", &config.user_agent)?;
    validate_header("accept", &config.accept)?;
    validate_header("accept-language", &config.accept_language)?;

    Ok(())
}

/// Validates retry configuration
fn validate_retry_config(config: &RetryConfig) -> Result<(), ConfigError> {
    if config.max_attempts < 1 || config.max_attempts > 10 {
        return Err(ConfigError::Validation(format!(
            "max-attempts must be between 1 and 10, got {}",
            config.max_attempts
        )));
    }

    if config.backoff_step_secs > 60 {
        return Err(ConfigError::Validation(format!(
            "backoff-step-secs must be <= 60, got {}",
            config.backoff_step_secs
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// A header must be non-empty and representable as an HTTP header value
fn validate_header(name: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() || HeaderValue::from_str(value).is_err() {
        return Err(ConfigError::InvalidHeader {
            name: name.to_string(),
            value: value.to_string(),
        });
    }
    Ok(())
}
