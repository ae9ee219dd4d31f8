//! Matrix: durations and distances between many-to-many locations

use crate::config::DEFAULT_API_VERSION;
use crate::endpoints::{unshaped, EndpointSpec, PayloadRule, RequestKind};
use crate::http::DecodeMode;

pub const MATRIX: EndpointSpec = EndpointSpec {
    name: "matrix",
    default_service: "matrix",
    default_api_version: Some(DEFAULT_API_VERSION),
    kind: RequestKind::JsonBody,
    payload: PayloadRule::StripRouting,
    shape: unshaped,
    decode: DecodeMode::ByFormat,
};
