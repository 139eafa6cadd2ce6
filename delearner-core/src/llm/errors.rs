//! Error types for generation backend operations
//!
//! This module defines strongly-typed errors for backend calls,
//! using thiserror for automatic error trait implementations.

use std::time::Duration;
use thiserror::Error;

/// Main error type for backend operations
#[derive(Debug, Error)]
pub enum LLMError {
    /// API key is missing or invalid
    #[error("Authentication failed: {message}")]
    AuthenticationError { message: String },

    /// Rate limit has been exceeded
    #[error("Rate limit exceeded: {message}")]
    RateLimitExceeded { message: String },

    /// Request timed out
    #[error("Request timed out after {duration:?}")]
    Timeout { duration: Duration },

    /// Network error occurred
    #[error("Network error: {message}")]
    NetworkError { message: String },

    /// API returned an error
    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    /// The response carried no text payload
    #[error("Empty response from provider '{provider}'")]
    EmptyResponse { provider: String },

    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },

    /// Parsing or serialization error
    #[error("Parsing error: {message}")]
    ParseError { message: String },
}

impl LLMError {
    /// Create an authentication error
    pub fn auth(message: impl Into<String>) -> Self {
        Self::AuthenticationError { message: message.into() }
    }

    /// Create a rate limit error
    pub fn rate_limit(message: impl Into<String>) -> Self {
        Self::RateLimitExceeded { message: message.into() }
    }

    /// Create a timeout error
    pub fn timeout(duration: Duration) -> Self {
        Self::Timeout { duration }
    }

    /// Create a network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::NetworkError { message: message.into() }
    }

    /// Create an API error
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::ApiError { status, message: message.into() }
    }

    /// Create an empty response error
    pub fn empty_response(provider: impl Into<String>) -> Self {
        Self::EmptyResponse { provider: provider.into() }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigurationError { message: message.into() }
    }

    /// Create a parse error
    pub fn parse(message: impl Into<String>) -> Self {
        Self::ParseError { message: message.into() }
    }
}

/// Result type for backend operations
pub type LLMResult<T> = Result<T, LLMError>;

/// Convert from standard IO errors
impl From<std::io::Error> for LLMError {
    fn from(err: std::io::Error) -> Self {
        Self::NetworkError { message: err.to_string() }
    }
}

/// Convert from JSON errors
impl From<serde_json::Error> for LLMError {
    fn from(err: serde_json::Error) -> Self {
        Self::ParseError { message: err.to_string() }
    }
}

/// Convert from HTTP client errors
impl From<reqwest::Error> for LLMError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::ParseError { message: err.to_string() }
        } else {
            Self::NetworkError { message: err.to_string() }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LLMError::auth("Invalid API key");
        assert_eq!(err.to_string(), "Authentication failed: Invalid API key");

        let err = LLMError::api(500, "boom");
        assert_eq!(err.to_string(), "API error (status 500): boom");

        let err = LLMError::empty_response("gemini");
        assert!(err.to_string().contains("gemini"));
    }

    #[test]
    fn test_error_conversion() {
        let io_err =
            std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "Connection failed");
        let llm_err: LLMError = io_err.into();
        assert!(matches!(llm_err, LLMError::NetworkError { .. }));

        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let llm_err: LLMError = json_err.into();
        assert!(matches!(llm_err, LLMError::ParseError { .. }));
    }
}
