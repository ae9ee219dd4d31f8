//! Directions: routes between two or more coordinates

use serde_json::Value;

use crate::config::DEFAULT_API_VERSION;
use crate::endpoints::{
    avoid_features, profile_params, take_truthy, EndpointSpec, PayloadRule, RequestKind,
    OPTIONS_KEY,
};
use crate::error::{Error, Result};
use crate::http::DecodeMode;
use crate::options::{is_truthy, type_name, Options};

pub const DIRECTIONS: EndpointSpec = EndpointSpec {
    name: "directions",
    default_service: "directions",
    default_api_version: Some(DEFAULT_API_VERSION),
    kind: RequestKind::JsonBody,
    payload: PayloadRule::StripRouting,
    shape: shape_directions,
    decode: DecodeMode::ByFormat,
};

/// Parse a pre-serialized `options` string, then nest `restrictions` and
/// `avoidables` into the (possibly existing) `options` object.
pub fn shape_directions(mut payload: Options) -> Result<Options> {
    parse_serialized_options(&mut payload)?;

    let restrictions = take_truthy(&mut payload, "restrictions");
    let avoidables = take_truthy(&mut payload, "avoidables");
    if restrictions.is_none() && avoidables.is_none() {
        return Ok(payload);
    }

    let mut options = match payload.get(OPTIONS_KEY) {
        Some(Value::Object(existing)) => existing.clone(),
        _ => Options::new(),
    };
    if let Some(restrictions) = restrictions {
        options.insert("profile_params".to_string(), profile_params(restrictions));
    }
    if let Some(avoidables) = avoidables {
        options.insert("avoid_features".to_string(), avoid_features(avoidables)?);
    }
    payload.insert(OPTIONS_KEY.to_string(), Value::Object(options));

    Ok(payload)
}

fn parse_serialized_options(payload: &mut Options) -> Result<()> {
    let Some(raw) = payload.get(OPTIONS_KEY).filter(|v| is_truthy(v) && !v.is_object()) else {
        return Ok(());
    };

    let Value::String(serialized) = raw else {
        return Err(Error::invalid_parameter(
            OPTIONS_KEY,
            format!("expected an object or a JSON string, got {}", type_name(raw)),
        ));
    };

    let parsed: Value = serde_json::from_str(serialized).map_err(|e| Error::MalformedOptions {
        message: format!("options is not valid JSON: {}", e),
        source: e,
    })?;
    if !parsed.is_object() {
        return Err(Error::invalid_parameter(
            OPTIONS_KEY,
            format!("serialized options must be a JSON object, got {}", type_name(&parsed)),
        ));
    }

    payload.insert(OPTIONS_KEY.to_string(), parsed);
    Ok(())
}
