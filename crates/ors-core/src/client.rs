//! The openrouteservice client
//!
//! [`OrsClient`] owns the immutable configuration and a shared HTTP client.
//! Every endpoint method goes through the same two steps: [`OrsClient::prepare`]
//! turns call options into a [`PreparedRequest`], then the transport sends it
//! under the call's deadline.

use std::sync::Arc;

use serde_json::Value;
use tracing::Instrument;

use crate::config::ClientConfig;
use crate::endpoints::{self, geocode, pois::POIS_SERVICE, EndpointSpec, RequestKind};
use crate::error::{Error, Result};
use crate::http::url::with_query_separator;
use crate::http::{
    build_headers, AuthHandler, HeaderKeyAuth, HttpClient, Method, OrsResponse, PreparedRequest,
    QueryKeyAuth, RequestTimeout,
};
use crate::options::{
    into_options, is_truthy, keys, merge_options, take_custom_headers, type_name, Options,
    RoutingFields,
};

struct ClientInner {
    config: ClientConfig,
    http: HttpClient,
}

/// Client for the openrouteservice API.
///
/// Cheap to clone; clones share configuration and connection pool, and
/// concurrent calls do not affect each other.
#[derive(Clone)]
pub struct OrsClient {
    inner: Arc<ClientInner>,
}

impl std::fmt::Debug for OrsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrsClient")
            .field("host", &self.inner.config.host)
            .field("timeout_ms", &self.inner.config.timeout_ms)
            .finish_non_exhaustive()
    }
}

impl OrsClient {
    /// Create a client. Fails with [`Error::Configuration`] when the API key
    /// is missing; no request is made either way.
    pub fn new(config: ClientConfig) -> Result<Self> {
        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "invalid openrouteservice client configuration");
            return Err(e);
        }

        let http = HttpClient::new(config.timeouts())?;
        Ok(Self {
            inner: Arc::new(ClientInner { config, http }),
        })
    }

    /// Create a client configured from `ORS_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Forward geocoding (`geocode/search`)
    pub async fn geocode(&self, options: Value) -> Result<OrsResponse> {
        self.dispatch(&endpoints::GEOCODE, options).await
    }

    /// Reverse geocoding (`geocode/reverse`)
    pub async fn reverse_geocode(&self, options: Value) -> Result<OrsResponse> {
        self.dispatch(&endpoints::REVERSE_GEOCODE, options).await
    }

    /// Structured geocoding (`geocode/search/structured`)
    pub async fn structured_geocode(&self, options: Value) -> Result<OrsResponse> {
        self.dispatch(&endpoints::STRUCTURED_GEOCODE, options).await
    }

    pub async fn isochrones(&self, options: Value) -> Result<OrsResponse> {
        self.dispatch(&endpoints::ISOCHRONES, options).await
    }

    pub async fn matrix(&self, options: Value) -> Result<OrsResponse> {
        self.dispatch(&endpoints::MATRIX, options).await
    }

    pub async fn directions(&self, options: Value) -> Result<OrsResponse> {
        self.dispatch(&endpoints::DIRECTIONS, options).await
    }

    pub async fn pois(&self, options: Value) -> Result<OrsResponse> {
        self.dispatch(&endpoints::POIS, options).await
    }

    pub async fn line_elevation(&self, options: Value) -> Result<OrsResponse> {
        self.dispatch(&endpoints::LINE_ELEVATION, options).await
    }

    pub async fn point_elevation(&self, options: Value) -> Result<OrsResponse> {
        self.dispatch(&endpoints::POINT_ELEVATION, options).await
    }

    pub async fn optimize(&self, options: Value) -> Result<OrsResponse> {
        self.dispatch(&endpoints::OPTIMIZATION, options).await
    }

    /// Prepare and send a request for any endpoint
    pub async fn dispatch(&self, endpoint: &EndpointSpec, options: Value) -> Result<OrsResponse> {
        let span = tracing::info_span!(
            "ors_request",
            endpoint = endpoint.name,
            method = endpoint.kind.method()
        );

        async {
            let request = self.prepare(endpoint, options)?;
            self.inner.http.execute(request).await
        }
        .instrument(span)
        .await
    }

    /// Build the request a call would send, without sending it
    pub fn prepare(&self, endpoint: &EndpointSpec, options: Value) -> Result<PreparedRequest> {
        let config = &self.inner.config;

        let mut call = into_options(options)?;
        let mut custom_headers = config.custom_headers.clone();
        custom_headers.extend(take_custom_headers(&mut call)?);

        let mut merged = merge_options(&self.defaults_for(endpoint), &call);
        if !merged.get(keys::SERVICE).is_some_and(is_truthy) {
            merged.insert(
                keys::SERVICE.to_string(),
                Value::String(endpoint.default_service.to_string()),
            );
        }

        let routing = RoutingFields::from_options(&merged);
        let timeout = call_timeout(&merged)?;
        let api_key = routing
            .api_key
            .clone()
            .or_else(|| config.api_key.clone())
            .ok_or_else(|| Error::configuration("Please add your openrouteservice api_key"))?;

        let payload = (endpoint.shape)(endpoint.payload.apply(merged))?;

        let (method, url, headers, body) = match endpoint.kind {
            RequestKind::JsonBody => {
                let mut url = routing.url();
                if routing.service.as_deref() == Some(POIS_SERVICE) {
                    url = with_query_separator(url);
                }
                let headers = build_headers(&HeaderKeyAuth::new(api_key), &custom_headers)?;
                (Method::POST, url, headers, Some(Value::Object(payload)))
            }
            RequestKind::GeocodeQuery => {
                let auth = QueryKeyAuth::new(api_key);
                let mut query = auth.query_credentials().unwrap_or_default();
                query.push_str(&geocode::encode_query(&payload)?);
                let url = format!("{}?{}", routing.url(), query);
                let headers = build_headers(&auth, &custom_headers)?;
                (Method::GET, url, headers, None)
            }
        };

        let fields = body.as_ref().and_then(|b| b.as_object()).map_or(0, |b| b.len());
        tracing::debug!(endpoint = endpoint.name, fields, "request prepared");

        Ok(PreparedRequest {
            method,
            url,
            headers,
            body,
            decode: endpoint.decode,
            wants_text: routing.wants_text(),
            timeout,
        })
    }

    /// Configuration defaults for this endpoint plus its default API version
    fn defaults_for(&self, endpoint: &EndpointSpec) -> Options {
        let mut defaults = self.inner.config.defaults(endpoint.name);
        if let Some(version) = endpoint.default_api_version {
            if !defaults.contains_key(keys::API_VERSION) {
                defaults.insert(keys::API_VERSION.to_string(), Value::String(version.to_string()));
            }
        }
        defaults
    }
}

/// Per-call `timeout` option, in milliseconds.
///
/// A falsy value leaves the configured deadline in place. Fractional
/// milliseconds round up.
fn call_timeout(merged: &Options) -> Result<RequestTimeout> {
    let Some(value) = merged.get(keys::TIMEOUT).filter(|v| is_truthy(v)) else {
        return Ok(RequestTimeout::default());
    };

    let millis = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match millis {
        Some(ms) if ms.is_finite() && ms > 0.0 => Ok(RequestTimeout::from_millis(ms.ceil() as u64)),
        _ => Err(Error::invalid_parameter(
            keys::TIMEOUT,
            format!("expected a positive number of milliseconds, got {}", type_name(value)),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
    use serde_json::json;

    fn client() -> OrsClient {
        OrsClient::new(ClientConfig::new("test-key")).unwrap()
    }

    #[test]
    fn test_missing_api_key() {
        let err = OrsClient::new(ClientConfig::default()).unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
    }

    #[test]
    fn test_directions_request() {
        let request = client()
            .prepare(
                &endpoints::DIRECTIONS,
                json!({
                    "profile": "driving-car",
                    "format": "geojson",
                    "coordinates": [[8.681495, 49.41461], [8.687872, 49.420318]],
                    "avoidables": ["ferries"]
                }),
            )
            .unwrap();

        assert_eq!(request.method, Method::POST);
        assert_eq!(
            request.url,
            "https://api.openrouteservice.org/v2/directions/driving-car/geojson"
        );
        assert_eq!(request.headers.get(AUTHORIZATION).unwrap(), "test-key");
        assert_eq!(request.headers.get(CONTENT_TYPE).unwrap(), "application/json");
        assert_eq!(
            request.body,
            Some(json!({
                "coordinates": [[8.681495, 49.41461], [8.687872, 49.420318]],
                "options": {"avoid_features": ["ferries"]}
            }))
        );
        assert!(!request.wants_text);
    }

    #[test]
    fn test_gpx_format_wants_text() {
        let request = client()
            .prepare(&endpoints::DIRECTIONS, json!({"profile": "cycling-regular", "format": "gpx"}))
            .unwrap();
        assert!(request.wants_text);
        assert!(request.url.ends_with("/v2/directions/cycling-regular/gpx"));
    }

    #[test]
    fn test_geocode_request() {
        let request = client()
            .prepare(&endpoints::GEOCODE, json!({"text": "Heidelberg", "size": 1}))
            .unwrap();

        assert_eq!(request.method, Method::GET);
        assert_eq!(
            request.url,
            "https://api.openrouteservice.org/geocode/search?api_key=test-key&text=Heidelberg&size=1"
        );
        assert!(request.headers.get(AUTHORIZATION).is_none());
        assert!(request.body.is_none());
    }

    #[test]
    fn test_geocode_unknown_field() {
        let err = client()
            .prepare(&endpoints::REVERSE_GEOCODE, json!({"point": {"lat_lng": [1, 2]}, "zoom": 3}))
            .unwrap_err();
        assert!(matches!(err, Error::MissingEncoder { .. }));
    }

    #[test]
    fn test_pois_url_has_query_separator() {
        let request = client()
            .prepare(&endpoints::POIS, json!({"geometry": {"buffer": 100}}))
            .unwrap();
        assert_eq!(request.url, "https://api.openrouteservice.org/pois?");
        assert_eq!(request.body.unwrap()["request"], "pois");
    }

    #[test]
    fn test_service_override() {
        let request = client()
            .prepare(&endpoints::OPTIMIZATION, json!({"service": "optimization/v2", "jobs": []}))
            .unwrap();
        assert_eq!(request.url, "https://api.openrouteservice.org/optimization/v2");

        let config = ClientConfig::new("k").with_service("matrix", "custom/matrix");
        let configured = OrsClient::new(config).unwrap();
        let request = configured
            .prepare(&endpoints::MATRIX, json!({"profile": "foot-walking"}))
            .unwrap();
        assert_eq!(request.url, "https://api.openrouteservice.org/v2/custom/matrix/foot-walking");
    }

    #[test]
    fn test_endpoint_overrides_do_not_leak() {
        let config = ClientConfig::new("k")
            .with_service("matrix", "custom/matrix")
            .with_format("matrix", "gpx");
        let client = OrsClient::new(config).unwrap();

        let geocode = client.prepare(&endpoints::GEOCODE, json!({"text": "Berlin"})).unwrap();
        assert_eq!(
            geocode.url,
            "https://api.openrouteservice.org/geocode/search?api_key=k&text=Berlin"
        );

        let elevation = client
            .prepare(&endpoints::POINT_ELEVATION, json!({"geometry": [13.35, 38.11]}))
            .unwrap();
        assert_eq!(elevation.url, "https://api.openrouteservice.org/elevation/point");
        assert!(!elevation.wants_text);

        let matrix = client.prepare(&endpoints::MATRIX, json!({"profile": "driving-car"})).unwrap();
        assert_eq!(matrix.url, "https://api.openrouteservice.org/v2/custom/matrix/driving-car/gpx");
        assert!(matrix.wants_text);
    }

    #[test]
    fn test_configured_api_version_wins() {
        let client = OrsClient::new(ClientConfig::new("k").with_api_version("isochrones", "v3"))
            .unwrap();
        let request = client
            .prepare(&endpoints::ISOCHRONES, json!({"profile": "driving-car"}))
            .unwrap();
        assert_eq!(request.url, "https://api.openrouteservice.org/v3/isochrones/driving-car");
    }

    #[test]
    fn test_call_timeout() {
        let request = client()
            .prepare(&endpoints::MATRIX, json!({"profile": "driving-car", "timeout": 1200}))
            .unwrap();
        assert_eq!(request.timeout, RequestTimeout::from_millis(1200));
        assert!(!request.body.unwrap().as_object().unwrap().contains_key("timeout"));

        let err = client()
            .prepare(&endpoints::MATRIX, json!({"timeout": "soon"}))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidParameter { .. }));
    }

    #[test]
    fn test_call_timeout_lenient_values() {
        let timeout_for = |value: Value| {
            client()
                .prepare(&endpoints::MATRIX, json!({"profile": "driving-car", "timeout": value}))
                .unwrap()
                .timeout
        };

        assert_eq!(timeout_for(json!(0)), RequestTimeout::default());
        assert_eq!(timeout_for(json!("")), RequestTimeout::default());
        assert_eq!(timeout_for(json!(false)), RequestTimeout::default());
        assert_eq!(timeout_for(json!(1500.0)), RequestTimeout::from_millis(1500));
        assert_eq!(timeout_for(json!(99.2)), RequestTimeout::from_millis(100));
        assert_eq!(timeout_for(json!("1000")), RequestTimeout::from_millis(1000));

        let err = client()
            .prepare(&endpoints::MATRIX, json!({"timeout": -5}))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidParameter { .. }));
    }

    #[test]
    fn test_custom_headers() {
        let client =
            OrsClient::new(ClientConfig::new("k").with_header("X-Client", "ors-core")).unwrap();
        let request = client
            .prepare(
                &endpoints::MATRIX,
                json!({"customHeaders": {"Content-type": "application/json; charset=utf-8"}}),
            )
            .unwrap();

        assert_eq!(request.headers.get("x-client").unwrap(), "ors-core");
        assert_eq!(request.headers.get(CONTENT_TYPE).unwrap(), "application/json; charset=utf-8");
        assert!(!request.body.unwrap().as_object().unwrap().contains_key("customHeaders"));
    }

    #[test]
    fn test_non_object_options() {
        let err = client().prepare(&endpoints::MATRIX, json!("driving-car")).unwrap_err();
        assert!(matches!(err, Error::InvalidOptions { .. }));
    }
}
