//! Per-endpoint request behavior
//!
//! Every endpoint is described by a static [`EndpointSpec`]: where its URL
//! points by default, how the request is sent, which fields make it into the
//! payload, and how that payload is reshaped before sending. One dispatch
//! routine in [`crate::client`] drives all of them.

pub mod directions;
pub mod elevation;
pub mod geocode;
pub mod isochrones;
pub mod matrix;
pub mod optimization;
pub mod pois;

use serde_json::{json, Value};

use crate::error::{Error, Result};
use crate::http::DecodeMode;
use crate::options::{is_truthy, strip_routing_fields, type_name, without_fields, Options};

pub use directions::DIRECTIONS;
pub use elevation::{LINE_ELEVATION, POINT_ELEVATION};
pub use geocode::{GeocodeField, GEOCODE, REVERSE_GEOCODE, STRUCTURED_GEOCODE};
pub use isochrones::ISOCHRONES;
pub use matrix::MATRIX;
pub use optimization::OPTIMIZATION;
pub use pois::POIS;

/// Key of the nested advanced-options object
pub(crate) const OPTIONS_KEY: &str = "options";

/// How the payload travels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    /// POST with a JSON body and the key in the `Authorization` header
    JsonBody,
    /// GET with the payload encoded into the query string
    GeocodeQuery,
}

impl RequestKind {
    pub fn method(self) -> &'static str {
        match self {
            RequestKind::JsonBody => "POST",
            RequestKind::GeocodeQuery => "GET",
        }
    }
}

/// Which merged fields are dropped before the payload is built
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadRule {
    /// Drop every routing field
    StripRouting,
    /// Drop exactly these fields
    Exclude(&'static [&'static str]),
}

impl PayloadRule {
    pub fn apply(&self, merged: Options) -> Options {
        match self {
            PayloadRule::StripRouting => strip_routing_fields(merged),
            PayloadRule::Exclude(fields) => without_fields(merged, fields),
        }
    }
}

/// Static description of one endpoint
#[derive(Debug, Clone, Copy)]
pub struct EndpointSpec {
    /// Name used in logs
    pub name: &'static str,
    /// Service path used when neither config nor call options set one
    pub default_service: &'static str,
    /// API version used when the configuration does not set one
    pub default_api_version: Option<&'static str>,
    pub kind: RequestKind,
    pub payload: PayloadRule,
    /// Endpoint-specific reshaping of the payload
    pub shape: fn(Options) -> Result<Options>,
    pub decode: DecodeMode,
}

/// Shaping for endpoints that forward the payload untouched
pub fn unshaped(payload: Options) -> Result<Options> {
    Ok(payload)
}

/// Remove and return `key` if its value is truthy; falsy values stay put
pub(crate) fn take_truthy(payload: &mut Options, key: &str) -> Option<Value> {
    if payload.get(key).is_some_and(is_truthy) {
        payload.shift_remove(key)
    } else {
        None
    }
}

/// `{ "restrictions": <restrictions> }`, the shape of `options.profile_params`
pub(crate) fn profile_params(restrictions: Value) -> Value {
    json!({ "restrictions": restrictions })
}

/// Copy `avoidables` into the array the API expects under `avoid_features`
pub(crate) fn avoid_features(avoidables: Value) -> Result<Value> {
    match avoidables {
        Value::Array(items) => Ok(Value::Array(items)),
        Value::String(single) => Ok(Value::Array(vec![Value::String(single)])),
        other => Err(Error::invalid_parameter(
            "avoidables",
            format!("expected an array of feature names, got {}", type_name(&other)),
        )),
    }
}
