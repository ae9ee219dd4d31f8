//! Elevation for lines and single points

use crate::endpoints::{unshaped, EndpointSpec, PayloadRule, RequestKind};
use crate::http::DecodeMode;
use crate::options::URL_PATH_FIELDS;

pub const LINE_ELEVATION: EndpointSpec = EndpointSpec {
    name: "elevation_line",
    default_service: "elevation/line",
    default_api_version: None,
    kind: RequestKind::JsonBody,
    payload: PayloadRule::Exclude(&URL_PATH_FIELDS),
    shape: unshaped,
    decode: DecodeMode::ByFormat,
};

pub const POINT_ELEVATION: EndpointSpec = EndpointSpec {
    name: "elevation_point",
    default_service: "elevation/point",
    ..LINE_ELEVATION
};
