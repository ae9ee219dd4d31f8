//! Request deadlines
//!
//! Each call runs under a single deadline covering send, status check and body
//! read. The deadline belongs to the call: it is dropped with the call's
//! future on every exit path, so nothing is left pending afterwards.

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_TIMEOUT_MS;

/// Timeout configuration for HTTP requests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeoutConfig {
    /// Connection timeout, handed to the underlying transport
    pub connect_timeout: Option<Duration>,
    /// Total time for the entire request, body included
    pub request_timeout: Duration,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_timeout: None,
            request_timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }
}

impl TimeoutConfig {
    pub fn new(connect_timeout: Option<Duration>, request_timeout: Duration) -> Self {
        Self {
            connect_timeout,
            request_timeout,
        }
    }

    /// Validate timeout configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.request_timeout.is_zero() {
            return Err("Request timeout cannot be zero".to_string());
        }

        if let Some(connect_timeout) = self.connect_timeout {
            if connect_timeout.is_zero() {
                return Err("Connect timeout cannot be zero".to_string());
            }
            if connect_timeout > self.request_timeout {
                return Err("Connect timeout should be <= request timeout".to_string());
            }
        }

        Ok(())
    }
}

/// Per-request timeout override
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RequestTimeout {
    pub request_timeout: Option<Duration>,
}

impl RequestTimeout {
    pub fn from_millis(ms: u64) -> Self {
        Self {
            request_timeout: Some(Duration::from_millis(ms)),
        }
    }

    /// The deadline that applies to one call
    pub fn resolve(&self, config: &TimeoutConfig) -> Duration {
        self.request_timeout.unwrap_or(config.request_timeout)
    }
}

/// Run `future` under the resolved deadline
pub async fn with_timeout<F, T>(
    future: F,
    timeout_config: &TimeoutConfig,
    request_override: Option<&RequestTimeout>,
) -> Result<T, tokio::time::error::Elapsed>
where
    F: Future<Output = T>,
{
    let timeout_duration = request_override
        .map(|o| o.resolve(timeout_config))
        .unwrap_or(timeout_config.request_timeout);

    tokio::time::timeout(timeout_duration, future).await
}
