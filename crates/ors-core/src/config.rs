//! Client configuration
//!
//! Configuration is resolved once, when the client is built, from:
//! - Default values
//! - A JSON configuration file
//! - Environment variables (`ORS_*`, optionally from a `.env` file)
//!
//! Per-call options are merged over it later; the configuration itself never
//! changes after construction. Service path, API version and output format
//! are set per endpoint, since one client serves every endpoint family.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::http::timeout::TimeoutConfig;
use crate::options::{keys, Options};

/// Public openrouteservice endpoint
pub const DEFAULT_HOST: &str = "https://api.openrouteservice.org";

/// API version used by endpoints that version their paths
pub const DEFAULT_API_VERSION: &str = "v2";

/// Default per-request timeout in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

const MISSING_API_KEY_MSG: &str = "Please add your openrouteservice api_key";

/// Service, version and format settings for one endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointOverrides {
    /// Service path, e.g. `optimization/v2`
    pub service: Option<String>,

    /// API version, e.g. `v2`
    pub api_version: Option<String>,

    /// Output format, e.g. `json`, `geojson` or `gpx`
    pub format: Option<String>,
}

/// Configuration shared by every call made through one client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the API
    pub host: String,

    /// API key sent with every request (required)
    pub api_key: Option<String>,

    /// Overrides keyed by endpoint name (`directions`, `geocode`, ...)
    pub endpoints: BTreeMap<String, EndpointOverrides>,

    /// Request timeout in milliseconds
    #[serde(alias = "timeout")]
    pub timeout_ms: u64,

    /// Connection timeout in milliseconds
    pub connect_timeout_ms: Option<u64>,

    /// Extra headers merged over the defaults on every request
    #[serde(alias = "customHeaders")]
    pub custom_headers: BTreeMap<String, String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            api_key: None,
            endpoints: BTreeMap::new(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            connect_timeout_ms: None,
            custom_headers: BTreeMap::new(),
        }
    }
}

impl ClientConfig {
    /// Create a configuration with the given API key and defaults elsewhere
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Self::default()
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Set the service path used by one endpoint
    pub fn with_service(mut self, endpoint: &str, service: impl Into<String>) -> Self {
        self.endpoint_mut(endpoint).service = Some(service.into());
        self
    }

    pub fn with_api_version(mut self, endpoint: &str, api_version: impl Into<String>) -> Self {
        self.endpoint_mut(endpoint).api_version = Some(api_version.into());
        self
    }

    pub fn with_format(mut self, endpoint: &str, format: impl Into<String>) -> Self {
        self.endpoint_mut(endpoint).format = Some(format.into());
        self
    }

    fn endpoint_mut(&mut self, endpoint: &str) -> &mut EndpointOverrides {
        self.endpoints.entry(endpoint.to_string()).or_default()
    }

    /// Overrides configured for the named endpoint, if any
    pub fn overrides(&self, endpoint: &str) -> Option<&EndpointOverrides> {
        self.endpoints.get(endpoint)
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_headers.insert(name.into(), value.into());
        self
    }

    /// Load configuration from the environment.
    ///
    /// Reads `ORS_API_KEY`, `ORS_HOST` and `ORS_TIMEOUT_MS`, after loading a
    /// `.env` file if one is present.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let mut config = Self::default();

        if let Ok(api_key) = std::env::var("ORS_API_KEY") {
            config.api_key = Some(api_key);
        }
        if let Ok(host) = std::env::var("ORS_HOST") {
            config.host = host;
        }
        if let Ok(timeout) = std::env::var("ORS_TIMEOUT_MS") {
            config.timeout_ms = timeout.trim().parse().map_err(|e| Error::Configuration {
                message: format!(
                    "ORS_TIMEOUT_MS must be a number of milliseconds, got '{}'",
                    timeout
                ),
                source: Some(anyhow::Error::new(e)),
            })?;
        }

        Ok(config)
    }

    /// Load configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| Error::Configuration {
            message: format!("Failed to read config file {}", path.display()),
            source: Some(anyhow::Error::new(e)),
        })?;

        serde_json::from_str(&content).map_err(|e| Error::Configuration {
            message: format!("Failed to parse config file {}", path.display()),
            source: Some(anyhow::Error::new(e)),
        })
    }

    /// Check the configuration is usable. Fails without touching the network.
    pub fn validate(&self) -> Result<()> {
        match self.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => {}
            _ => return Err(Error::configuration(MISSING_API_KEY_MSG)),
        }

        url::Url::parse(&self.host).map_err(|e| Error::Configuration {
            message: format!("Invalid host URL: {}", self.host),
            source: Some(anyhow::Error::new(e)),
        })?;

        self.timeouts().validate().map_err(Error::configuration)
    }

    /// Deadline settings derived from this configuration
    pub fn timeouts(&self) -> TimeoutConfig {
        TimeoutConfig::new(
            self.connect_timeout_ms.map(Duration::from_millis),
            Duration::from_millis(self.timeout_ms),
        )
    }

    /// The defaults a call to `endpoint` has its options merged over.
    ///
    /// Overrides configured for other endpoints never leak in.
    pub fn defaults(&self, endpoint: &str) -> Options {
        let mut defaults = Options::new();
        defaults.insert(keys::HOST.to_string(), Value::String(self.host.clone()));
        if let Some(api_key) = &self.api_key {
            defaults.insert(keys::API_KEY.to_string(), Value::String(api_key.clone()));
        }

        if let Some(overrides) = self.overrides(endpoint) {
            let fields = [
                (keys::SERVICE, &overrides.service),
                (keys::API_VERSION, &overrides.api_version),
                (keys::FORMAT, &overrides.format),
            ];
            for (key, value) in fields {
                if let Some(value) = value.as_ref().filter(|v| !v.is_empty()) {
                    defaults.insert(key.to_string(), Value::String(value.clone()));
                }
            }
        }
        defaults
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.host, DEFAULT_HOST);
        assert_eq!(config.timeout_ms, 5000);
        assert!(config.api_key.is_none());
        assert!(config.custom_headers.is_empty());
    }

    #[test]
    fn test_missing_api_key_is_rejected() {
        let err = ClientConfig::default().validate().unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
        assert!(err.to_string().contains("api_key"));

        let blank = ClientConfig::new("   ");
        assert!(blank.validate().is_err());
    }

    #[test]
    fn test_invalid_host_and_timeout_are_rejected() {
        assert!(ClientConfig::new("key").with_host("not a url").validate().is_err());
        assert!(ClientConfig::new("key").with_timeout_ms(0).validate().is_err());
        assert!(ClientConfig::new("key").validate().is_ok());
    }

    #[test]
    fn test_defaults_map() {
        let config = ClientConfig::new("K").with_host("H").with_format("directions", "geojson");
        assert_eq!(
            Value::Object(config.defaults("directions")),
            json!({"host": "H", "api_key": "K", "format": "geojson"})
        );
    }

    #[test]
    fn test_overrides_stay_with_their_endpoint() {
        let config = ClientConfig::new("K")
            .with_host("H")
            .with_service("matrix", "custom/matrix")
            .with_api_version("matrix", "v3")
            .with_format("directions", "gpx");

        assert_eq!(
            Value::Object(config.defaults("matrix")),
            json!({"host": "H", "api_key": "K", "service": "custom/matrix", "api_version": "v3"})
        );
        assert_eq!(
            Value::Object(config.defaults("geocode")),
            json!({"host": "H", "api_key": "K"})
        );
        assert_eq!(config.overrides("directions").unwrap().format.as_deref(), Some("gpx"));
        assert!(config.overrides("pois").is_none());
    }

    #[test]
    fn test_deserialize_with_aliases() {
        let config: ClientConfig = serde_json::from_value(json!({
            "api_key": "K",
            "timeout": 1500,
            "customHeaders": {"Accept": "application/json"}
        }))
        .unwrap();

        assert_eq!(config.host, DEFAULT_HOST);
        assert_eq!(config.timeout_ms, 1500);
        assert_eq!(config.custom_headers["Accept"], "application/json");
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"api_key": "file-key", "endpoints": {{"optimization": {{"service": "optimization/v2"}}}}}}"#
        )
        .unwrap();

        let config = ClientConfig::from_file(file.path()).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("file-key"));
        assert_eq!(
            config.overrides("optimization").and_then(|o| o.service.as_deref()),
            Some("optimization/v2")
        );

        let missing = ClientConfig::from_file("/nonexistent/ors.json");
        assert!(matches!(missing, Err(Error::Configuration { .. })));
    }

    #[test]
    fn test_timeouts() {
        let config = ClientConfig::new("K").with_timeout_ms(750);
        assert_eq!(config.timeouts().request_timeout, Duration::from_millis(750));
        assert_eq!(config.timeouts().connect_timeout, None);
    }
}
