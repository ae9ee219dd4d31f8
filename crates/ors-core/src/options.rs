//! Call options: merging, stripping and routing-field extraction
//!
//! Call options are an open JSON object. Only a handful of keys steer the
//! request itself (host, version, service, profile, format, key, timeout);
//! everything else is forwarded to the API untouched.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::http::url::build_url;

/// Open mapping of field name to value, in insertion order
pub type Options = Map<String, Value>;

/// Well-known option keys
pub mod keys {
    pub const HOST: &str = "host";
    pub const API_KEY: &str = "api_key";
    pub const SERVICE: &str = "service";
    pub const API_VERSION: &str = "api_version";
    pub const MIME_TYPE: &str = "mime_type";
    pub const PROFILE: &str = "profile";
    pub const FORMAT: &str = "format";
    pub const TIMEOUT: &str = "timeout";
    pub const CUSTOM_HEADERS: &str = "customHeaders";
}

/// Keys consumed by URL building, auth and the deadline; never sent as payload
pub const ROUTING_FIELDS: [&str; 8] = [
    keys::HOST,
    keys::API_VERSION,
    keys::SERVICE,
    keys::API_KEY,
    keys::PROFILE,
    keys::FORMAT,
    keys::TIMEOUT,
    keys::MIME_TYPE,
];

/// Keys that only ever form the base of the URL
pub const URL_PATH_FIELDS: [&str; 4] = [
    keys::HOST,
    keys::SERVICE,
    keys::API_VERSION,
    keys::MIME_TYPE,
];

/// Turn a caller-supplied JSON value into call options.
///
/// `null` is accepted as "no options"; anything other than an object is
/// rejected.
pub fn into_options(value: Value) -> Result<Options> {
    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Options::new()),
        other => Err(Error::InvalidOptions {
            message: format!("expected a JSON object, got {}", type_name(&other)),
        }),
    }
}

/// Merge call options over defaults. Call fields win; keys already present in
/// the defaults keep their position.
pub fn merge_options(defaults: &Options, call: &Options) -> Options {
    let mut merged = defaults.clone();
    for (key, value) in call {
        merged.insert(key.clone(), value.clone());
    }
    merged
}

/// Remove every routing field, forwarding everything else verbatim
pub fn strip_routing_fields(payload: Options) -> Options {
    without_fields(payload, &ROUTING_FIELDS)
}

/// Remove the given keys, keeping the order of the rest
pub fn without_fields(payload: Options, excluded: &[&str]) -> Options {
    payload
        .into_iter()
        .filter(|(key, _)| !excluded.contains(&key.as_str()))
        .collect()
}

/// Pull `customHeaders` out of the call options.
pub fn take_custom_headers(call: &mut Options) -> Result<BTreeMap<String, String>> {
    let Some(raw) = call.shift_remove(keys::CUSTOM_HEADERS) else {
        return Ok(BTreeMap::new());
    };

    match raw {
        Value::Null => Ok(BTreeMap::new()),
        Value::Object(map) => map
            .into_iter()
            .map(|(name, value)| match scalar_to_string(&value) {
                Some(value) => Ok((name, value)),
                None => Err(Error::invalid_parameter(
                    keys::CUSTOM_HEADERS,
                    format!("header '{}' must be a string", name),
                )),
            })
            .collect(),
        other => Err(Error::invalid_parameter(
            keys::CUSTOM_HEADERS,
            format!("expected an object, got {}", type_name(&other)),
        )),
    }
}

/// JavaScript-style truthiness, which decides whether optional fields apply
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Render a string, number or boolean the way it should appear in a URL
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

pub(crate) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// The subset of merged options that steers URL building and auth.
///
/// Built fresh for each call from the merged options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoutingFields {
    pub host: Option<String>,
    pub api_version: Option<String>,
    pub profile: Option<String>,
    pub format: Option<String>,
    pub service: Option<String>,
    pub api_key: Option<String>,
    pub mime_type: Option<String>,
}

impl RoutingFields {
    /// Extract routing fields from merged options
    pub fn from_options(options: &Options) -> Self {
        let field = |key: &str| {
            options
                .get(key)
                .filter(|value| is_truthy(value))
                .and_then(scalar_to_string)
        };

        Self {
            host: field(keys::HOST),
            api_version: field(keys::API_VERSION),
            profile: field(keys::PROFILE),
            format: field(keys::FORMAT),
            service: field(keys::SERVICE),
            api_key: field(keys::API_KEY),
            mime_type: field(keys::MIME_TYPE),
        }
    }

    /// Build the endpoint URL from host, version, service, profile and format
    pub fn url(&self) -> String {
        build_url(
            self.host.as_deref().unwrap_or_default(),
            self.api_version.as_deref().unwrap_or_default(),
            self.service.as_deref().unwrap_or_default(),
            self.profile.as_deref().unwrap_or_default(),
            self.format.as_deref().unwrap_or_default(),
        )
    }

    /// Whether the caller asked for GPX output, which comes back as text
    pub fn wants_text(&self) -> bool {
        self.format.as_deref() == Some("gpx")
    }
}
