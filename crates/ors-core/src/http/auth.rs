//! Authentication and request headers
//!
//! openrouteservice takes the API key in two places:
//! - the `Authorization` header, for the POST endpoints
//! - the `api_key` query parameter, for the geocode family

use std::collections::BTreeMap;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};

use crate::error::{Error, Result};
use crate::options::keys;

/// Trait for attaching credentials to a request
pub trait AuthHandler: Send + Sync {
    /// Apply authentication to request headers
    fn apply_auth(&self, headers: &mut HeaderMap) -> Result<()>;

    /// Leading query fragment carrying the credentials, if any
    fn query_credentials(&self) -> Option<String> {
        None
    }
}

/// Sends the key verbatim as the `Authorization` header
#[derive(Debug, Clone)]
pub struct HeaderKeyAuth {
    api_key: String,
}

impl HeaderKeyAuth {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self { api_key: api_key.into() }
    }
}

impl AuthHandler for HeaderKeyAuth {
    fn apply_auth(&self, headers: &mut HeaderMap) -> Result<()> {
        let value = HeaderValue::from_str(&self.api_key).map_err(|_| {
            Error::configuration("api_key contains characters not allowed in a header")
        })?;
        headers.insert(AUTHORIZATION, value);
        Ok(())
    }
}

/// Sends the key as the first query parameter
#[derive(Debug, Clone)]
pub struct QueryKeyAuth {
    api_key: String,
}

impl QueryKeyAuth {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self { api_key: api_key.into() }
    }
}

impl AuthHandler for QueryKeyAuth {
    fn apply_auth(&self, _headers: &mut HeaderMap) -> Result<()> {
        Ok(())
    }

    fn query_credentials(&self) -> Option<String> {
        Some(format!("{}={}", keys::API_KEY, self.api_key))
    }
}

/// Build the header set for one call.
///
/// Credentials go in first, then `Content-type: application/json`, then the
/// custom headers. Custom headers may replace any of these values but the
/// content type header is always present.
pub fn build_headers(
    auth: &dyn AuthHandler,
    custom: &BTreeMap<String, String>,
) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    auth.apply_auth(&mut headers)?;
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    for (name, value) in custom {
        let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| {
            Error::invalid_parameter(
                keys::CUSTOM_HEADERS,
                format!("invalid header name '{}'", name),
            )
        })?;
        let header_value = HeaderValue::from_str(value).map_err(|_| {
            Error::invalid_parameter(
                keys::CUSTOM_HEADERS,
                format!("invalid value for header '{}'", name),
            )
        })?;
        headers.insert(header_name, header_value);
    }

    Ok(headers)
}
