//! Isochrones: reachability polygons around one or more locations

use serde_json::Value;

use crate::config::DEFAULT_API_VERSION;
use crate::endpoints::{
    avoid_features, profile_params, take_truthy, EndpointSpec, PayloadRule, RequestKind,
    OPTIONS_KEY,
};
use crate::error::Result;
use crate::http::DecodeMode;
use crate::options::Options;

pub const ISOCHRONES: EndpointSpec = EndpointSpec {
    name: "isochrones",
    default_service: "isochrones",
    default_api_version: Some(DEFAULT_API_VERSION),
    kind: RequestKind::JsonBody,
    payload: PayloadRule::StripRouting,
    shape: shape_isochrones,
    decode: DecodeMode::ByFormat,
};

/// Move `restrictions`, `avoidables` and `avoid_polygons` into a fresh
/// `options` object. The object is only attached when something went in.
pub fn shape_isochrones(mut payload: Options) -> Result<Options> {
    let mut options = Options::new();

    if let Some(restrictions) = take_truthy(&mut payload, "restrictions") {
        options.insert("profile_params".to_string(), profile_params(restrictions));
    }
    if let Some(avoidables) = take_truthy(&mut payload, "avoidables") {
        options.insert("avoid_features".to_string(), avoid_features(avoidables)?);
    }
    if let Some(polygons) = take_truthy(&mut payload, "avoid_polygons") {
        options.insert("avoid_polygons".to_string(), polygons);
    }

    if !options.is_empty() {
        payload.insert(OPTIONS_KEY.to_string(), Value::Object(options));
    }

    Ok(payload)
}
