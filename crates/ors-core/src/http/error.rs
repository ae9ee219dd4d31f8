//! HTTP failure normalization
//!
//! Turns transport failures and non-2xx responses into [`crate::Error`]
//! values, pulling the API's own error code and message out of the body when
//! it sends one.

use reqwest::StatusCode;
use serde_json::Value;

use crate::error::Error;

/// Normalized view of a non-2xx response
#[derive(Debug, Clone, PartialEq)]
pub struct HttpError {
    pub status_code: u16,
    /// Reason phrase for the status, e.g. `Forbidden`
    pub status_text: String,
    /// openrouteservice error code (e.g. 2003), if present in the body
    pub api_code: Option<i64>,
    /// openrouteservice error message, if present in the body
    pub api_message: Option<String>,
}

impl HttpError {
    /// Create from a reqwest Response, consuming its body
    pub async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Self::from_parts(status, &body)
    }

    /// Create from a status and the raw body
    pub fn from_parts(status: StatusCode, body: &str) -> Self {
        let details = serde_json::from_str::<Value>(body).ok();
        let (api_code, api_message) = Self::extract_api_error(details.as_ref());

        Self {
            status_code: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or("Unknown Status").to_string(),
            api_code,
            api_message,
        }
    }

    /// Extract the error code and message from an openrouteservice error body.
    ///
    /// The routing services send `{"error": {"code": .., "message": ..}}`,
    /// the gateway sends `{"error": "..."}`, and geocoding sends
    /// `{"geocoding": {"errors": [..]}}`.
    fn extract_api_error(details: Option<&Value>) -> (Option<i64>, Option<String>) {
        let Some(json) = details else {
            return (None, None);
        };

        match json.get("error") {
            Some(Value::Object(error)) => {
                let code = error.get("code").and_then(Value::as_i64);
                let message = error.get("message").and_then(Value::as_str).map(str::to_string);
                return (code, message);
            }
            Some(Value::String(message)) => return (None, Some(message.clone())),
            _ => {}
        }

        let geocoding_error = json
            .pointer("/geocoding/errors/0")
            .and_then(Value::as_str)
            .map(str::to_string);
        if geocoding_error.is_some() {
            return (None, geocoding_error);
        }

        (None, json.get("message").and_then(Value::as_str).map(str::to_string))
    }
}

impl From<HttpError> for Error {
    fn from(http_error: HttpError) -> Self {
        Error::HttpStatus {
            status: http_error.status_code,
            status_text: http_error.status_text,
            api_code: http_error.api_code,
            api_message: http_error.api_message,
        }
    }
}

/// Map a reqwest failure that happened before a status arrived
pub fn from_request_error(error: reqwest::Error, url: &str, timeout_ms: u64) -> Error {
    // The reqwest error carries the full URL, api_key included
    let error = error.without_url();

    if error.is_timeout() {
        return Error::Timeout {
            url: url.to_string(),
            timeout_ms,
        };
    }

    let message = if error.is_connect() {
        format!("failed to connect to {}", url)
    } else {
        format!("request to {} failed: {}", url, error)
    };

    Error::Transport { message, source: error }
}
