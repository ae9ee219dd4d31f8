//! Points of interest around a geometry

use serde_json::Value;

use crate::endpoints::{EndpointSpec, PayloadRule, RequestKind};
use crate::error::Result;
use crate::http::DecodeMode;
use crate::options::{is_truthy, keys, Options};

/// Service path of the POI endpoint; its URL always ends in a query separator
pub const POIS_SERVICE: &str = "pois";

const POIS_EXCLUDED: [&str; 6] = [
    keys::HOST,
    keys::SERVICE,
    keys::API_VERSION,
    keys::MIME_TYPE,
    keys::API_KEY,
    keys::TIMEOUT,
];

pub const POIS: EndpointSpec = EndpointSpec {
    name: "pois",
    default_service: POIS_SERVICE,
    default_api_version: None,
    kind: RequestKind::JsonBody,
    payload: PayloadRule::Exclude(&POIS_EXCLUDED),
    shape: shape_pois,
    decode: DecodeMode::ByFormat,
};

/// Default the request type to `pois` (the alternatives are `stats` and `list`)
pub fn shape_pois(mut payload: Options) -> Result<Options> {
    if !payload.get("request").is_some_and(is_truthy) {
        payload.insert("request".to_string(), Value::String("pois".to_string()));
    }
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::into_options;
    use serde_json::json;

    #[test]
    fn test_request_defaults_to_pois() {
        let payload =
            shape_pois(into_options(json!({"geometry": {"buffer": 250}})).unwrap()).unwrap();
        assert_eq!(payload["request"], "pois");

        let payload = shape_pois(into_options(json!({"request": "stats"})).unwrap()).unwrap();
        assert_eq!(payload["request"], "stats");
    }

    #[test]
    fn test_payload_excludes_routing_and_auth() {
        let merged = into_options(json!({
            "host": "https://api.openrouteservice.org",
            "service": "pois",
            "api_key": "K",
            "timeout": 2000,
            "geometry": {
                "bbox": [[8.8034, 53.0756], [8.7834, 53.0456]],
                "geojson": {"type": "Point", "coordinates": [8.8034, 53.0756]},
                "buffer": 250
            },
            "limit": 20
        }))
        .unwrap();

        let payload = (POIS.shape)(POIS.payload.apply(merged)).unwrap();
        assert!(!payload.contains_key("api_key"));
        assert!(!payload.contains_key("service"));
        assert!(!payload.contains_key("timeout"));
        assert_eq!(payload["limit"], 20);
        assert_eq!(payload["request"], "pois");
    }
}
