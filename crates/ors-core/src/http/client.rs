//! Transport layer: sends one prepared request under its deadline

use reqwest::header::HeaderMap;
use reqwest::{Client as ReqwestClient, Method};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::http::error::{from_request_error, HttpError};
use crate::http::response::{decode_body, DecodeMode, OrsResponse};
use crate::http::timeout::{with_timeout, RequestTimeout, TimeoutConfig};
use crate::logging::{redact_url, redacted_headers};

/// A fully built request, ready to send.
///
/// Produced fresh for every call and dropped once the call completes.
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    /// JSON body for POST endpoints
    pub body: Option<Value>,
    pub decode: DecodeMode,
    /// Whether the caller asked for `gpx` output
    pub wants_text: bool,
    pub timeout: RequestTimeout,
}

/// Thin wrapper over reqwest that applies deadlines and status handling
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: ReqwestClient,
    timeouts: TimeoutConfig,
}

impl HttpClient {
    pub fn new(timeouts: TimeoutConfig) -> Result<Self> {
        let mut builder = ReqwestClient::builder();
        if let Some(connect_timeout) = timeouts.connect_timeout {
            builder = builder.connect_timeout(connect_timeout);
        }

        let client = builder.build().map_err(|e| Error::Configuration {
            message: format!("Failed to create HTTP client: {}", e),
            source: Some(anyhow::Error::new(e)),
        })?;

        Ok(Self { client, timeouts })
    }

    pub fn timeouts(&self) -> &TimeoutConfig {
        &self.timeouts
    }

    /// Send the request and decode the body.
    ///
    /// The deadline covers the whole exchange. When it fires the in-flight
    /// request future is dropped, which aborts the connection.
    pub async fn execute(&self, request: PreparedRequest) -> Result<OrsResponse> {
        let request_timeout = request.timeout;
        let deadline = request_timeout.resolve(&self.timeouts);
        let timeout_ms = u64::try_from(deadline.as_millis()).unwrap_or(u64::MAX);
        let url = redact_url(&request.url);

        tracing::debug!(
            method = %request.method,
            url = %url,
            timeout_ms,
            "sending request"
        );
        tracing::trace!(headers = ?redacted_headers(&request.headers), "request headers");

        let exchange = self.exchange(request, timeout_ms);
        match with_timeout(exchange, &self.timeouts, Some(&request_timeout)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(url = %url, timeout_ms, "request timed out");
                Err(Error::Timeout { url, timeout_ms })
            }
        }
    }

    async fn exchange(&self, request: PreparedRequest, timeout_ms: u64) -> Result<OrsResponse> {
        let PreparedRequest {
            method,
            url,
            headers,
            body,
            decode,
            wants_text,
            ..
        } = request;

        let mut builder = self.client.request(method, &url).headers(headers);
        if let Some(body) = body {
            builder = builder.body(serde_json::to_vec(&body)?);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| from_request_error(e, &redact_url(&url), timeout_ms))?;

        let status = response.status();
        if !status.is_success() {
            let error = HttpError::from_response(response).await;
            tracing::warn!(
                status = error.status_code,
                api_code = ?error.api_code,
                api_message = ?error.api_message,
                "request failed"
            );
            return Err(error.into());
        }

        let text = response.text().await.map_err(|e| {
            let e = e.without_url();
            Error::Decode {
                message: format!("failed to read response body: {}", e),
                source: Some(anyhow::Error::new(e)),
            }
        })?;

        tracing::debug!(status = status.as_u16(), bytes = text.len(), "response received");
        decode_body(decode, wants_text, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_client_creation() {
        let client = HttpClient::new(TimeoutConfig::new(
            Some(Duration::from_secs(1)),
            Duration::from_secs(5),
        ));
        assert!(client.is_ok());
        assert_eq!(client.unwrap().timeouts().request_timeout, Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        let client = HttpClient::new(TimeoutConfig::new(None, Duration::from_secs(5))).unwrap();
        let request = PreparedRequest {
            method: Method::GET,
            // nothing listens on the discard port
            url: "http://127.0.0.1:9/geocode/search".to_string(),
            headers: HeaderMap::new(),
            body: None,
            decode: DecodeMode::JsonThenText,
            wants_text: false,
            timeout: RequestTimeout::default(),
        };

        let err = client.execute(request).await.unwrap_err();
        assert!(matches!(err, Error::Transport { .. }), "got {err:?}");
    }
}
