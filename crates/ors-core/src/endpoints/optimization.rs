//! Vehicle routing optimization

use crate::endpoints::{unshaped, EndpointSpec, PayloadRule, RequestKind};
use crate::http::DecodeMode;
use crate::options::URL_PATH_FIELDS;

pub const OPTIMIZATION: EndpointSpec = EndpointSpec {
    name: "optimization",
    default_service: "optimization",
    default_api_version: None,
    kind: RequestKind::JsonBody,
    payload: PayloadRule::Exclude(&URL_PATH_FIELDS),
    shape: unshaped,
    decode: DecodeMode::ByFormat,
};
