//! Error types for the openrouteservice client
//!
//! Every failure a call can hit is surfaced through [`Error`]. Nothing is
//! retried or recovered internally: the first failure ends the call.

use thiserror::Error;

/// Main error type for client operations
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid or incomplete client configuration (missing API key etc.)
    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// The request did not complete within the configured timeout
    #[error("Request to {url} timed out after {timeout_ms} ms")]
    Timeout { url: String, timeout_ms: u64 },

    /// The API answered with a non-2xx status
    #[error("HTTP {status}: {status_text}")]
    HttpStatus {
        status: u16,
        status_text: String,
        /// Error code reported by the API body, if any
        api_code: Option<i64>,
        /// Error message reported by the API body, if any
        api_message: Option<String>,
    },

    /// A pre-serialized `options` string could not be parsed
    #[error("Malformed options: {message}")]
    MalformedOptions {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// A geocode parameter has no registered query encoder
    #[error("No query encoder registered for geocode parameter '{field}'")]
    MissingEncoder { field: String },

    /// A known parameter carried a value of the wrong shape
    #[error("Invalid parameter {field}: {message}")]
    InvalidParameter { field: String, message: String },

    /// Call options were not a JSON object
    #[error("Invalid call options: {message}")]
    InvalidOptions { message: String },

    /// Connection-level failure before any status was received
    #[error("Transport error: {message}")]
    Transport {
        message: String,
        #[source]
        source: reqwest::Error,
    },

    /// The response body could not be decoded
    #[error("Failed to decode response: {message}")]
    Decode {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// JSON serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a configuration error without a source
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
            source: None,
        }
    }

    /// Create an invalid-parameter error
    pub fn invalid_parameter(field: impl Into<String>, message: impl Into<String>) -> Self {
        Error::InvalidParameter {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Whether this error came from the deadline firing
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout { .. })
    }

    /// HTTP status code, if the API answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json {
            message: err.to_string(),
            source: err,
        }
    }
}
