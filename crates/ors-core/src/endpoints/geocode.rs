//! Geocoding: forward search, reverse lookup and structured search
//!
//! Unlike the other endpoints, geocoding is a GET request. The payload is
//! turned into a query string one field at a time by [`GeocodeField`], and
//! the API key travels as the first query parameter.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::endpoints::{unshaped, EndpointSpec, PayloadRule, RequestKind};
use crate::error::{Error, Result};
use crate::http::DecodeMode;
use crate::options::{scalar_to_string, type_name, Options};

pub const GEOCODE: EndpointSpec = EndpointSpec {
    name: "geocode",
    default_service: "geocode/search",
    default_api_version: None,
    kind: RequestKind::GeocodeQuery,
    payload: PayloadRule::StripRouting,
    shape: unshaped,
    decode: DecodeMode::JsonThenText,
};

pub const REVERSE_GEOCODE: EndpointSpec = EndpointSpec {
    name: "reverse_geocode",
    default_service: "geocode/reverse",
    ..GEOCODE
};

pub const STRUCTURED_GEOCODE: EndpointSpec = EndpointSpec {
    name: "structured_geocode",
    default_service: "geocode/search/structured",
    ..GEOCODE
};

/// Every geocode parameter the query encoder knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeocodeField {
    Text,
    FocusPoint,
    BoundaryBbox,
    Point,
    BoundaryCircle,
    Sources,
    Layers,
    BoundaryCountry,
    Size,
    Address,
    Neighbourhood,
    Borough,
    Locality,
    County,
    Region,
    Postalcode,
    Country,
}

impl GeocodeField {
    pub const ALL: [GeocodeField; 17] = [
        GeocodeField::Text,
        GeocodeField::FocusPoint,
        GeocodeField::BoundaryBbox,
        GeocodeField::Point,
        GeocodeField::BoundaryCircle,
        GeocodeField::Sources,
        GeocodeField::Layers,
        GeocodeField::BoundaryCountry,
        GeocodeField::Size,
        GeocodeField::Address,
        GeocodeField::Neighbourhood,
        GeocodeField::Borough,
        GeocodeField::Locality,
        GeocodeField::County,
        GeocodeField::Region,
        GeocodeField::Postalcode,
        GeocodeField::Country,
    ];

    /// Option key as callers spell it
    pub fn name(self) -> &'static str {
        match self {
            GeocodeField::Text => "text",
            GeocodeField::FocusPoint => "focus_point",
            GeocodeField::BoundaryBbox => "boundary_bbox",
            GeocodeField::Point => "point",
            GeocodeField::BoundaryCircle => "boundary_circle",
            GeocodeField::Sources => "sources",
            GeocodeField::Layers => "layers",
            GeocodeField::BoundaryCountry => "boundary_country",
            GeocodeField::Size => "size",
            GeocodeField::Address => "address",
            GeocodeField::Neighbourhood => "neighbourhood",
            GeocodeField::Borough => "borough",
            GeocodeField::Locality => "locality",
            GeocodeField::County => "county",
            GeocodeField::Region => "region",
            GeocodeField::Postalcode => "postalcode",
            GeocodeField::Country => "country",
        }
    }

    /// Encode one value into `&name=value` query fragments
    pub fn encode(self, value: &Value) -> Result<String> {
        let name = self.name();
        match self {
            GeocodeField::Text => {
                let text = scalar(name, value)?;
                Ok(format!("&text={}", urlencoding::encode(&text)))
            }
            GeocodeField::FocusPoint => {
                let (lat, lon) = lat_lng(name, value)?;
                Ok(format!("&focus.point.lon={}&focus.point.lat={}", lon, lat))
            }
            GeocodeField::BoundaryBbox => {
                let corners = pair(name, value)?;
                let (min_lat, min_lon) = lat_lng(name, &corners[0])?;
                let (max_lat, max_lon) = lat_lng(name, &corners[1])?;
                Ok(format!(
                    "&boundary.rect.min_lon={}&boundary.rect.min_lat={}&boundary.rect.max_lon={}&boundary.rect.max_lat={}",
                    min_lon, min_lat, max_lon, max_lat
                ))
            }
            GeocodeField::Point => match value.get("lat_lng") {
                Some(coords @ Value::Array(_)) => {
                    let (lat, lon) = lat_lng(name, coords)?;
                    Ok(format!("&point.lon={}&point.lat={}", lon, lat))
                }
                _ => Ok(String::new()),
            },
            GeocodeField::BoundaryCircle => {
                let coords = value.get("lat_lng").ok_or_else(|| {
                    Error::invalid_parameter(name, "expected an object with lat_lng and radius")
                })?;
                let (lat, lon) = lat_lng(name, coords)?;
                let radius = value
                    .get("radius")
                    .and_then(scalar_to_string)
                    .ok_or_else(|| Error::invalid_parameter(name, "missing radius"))?;
                Ok(format!(
                    "&boundary.circle.lon={}&boundary.circle.lat={}&boundary.circle.radius={}",
                    lon, lat, radius
                ))
            }
            GeocodeField::Sources | GeocodeField::Layers => match value {
                Value::Null => Ok(String::new()),
                _ => Ok(format!("&{}={}", name, joined(name, value)?)),
            },
            GeocodeField::BoundaryCountry => {
                Ok(format!("&boundary.country={}", scalar(name, value)?))
            }
            GeocodeField::Size
            | GeocodeField::Address
            | GeocodeField::Neighbourhood
            | GeocodeField::Borough
            | GeocodeField::Locality
            | GeocodeField::County
            | GeocodeField::Region
            | GeocodeField::Postalcode
            | GeocodeField::Country => Ok(format!("&{}={}", name, scalar(name, value)?)),
        }
    }
}

impl FromStr for GeocodeField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        GeocodeField::ALL
            .into_iter()
            .find(|field| field.name() == s)
            .ok_or_else(|| Error::MissingEncoder { field: s.to_string() })
    }
}

impl fmt::Display for GeocodeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Encode a stripped geocode payload, in the payload's key order.
///
/// Unknown keys fail with [`Error::MissingEncoder`] instead of being dropped.
pub fn encode_query(payload: &Options) -> Result<String> {
    let mut query = String::new();
    for (key, value) in payload {
        let field: GeocodeField = key.parse()?;
        query.push_str(&field.encode(value)?);
    }
    Ok(query)
}

fn scalar(name: &str, value: &Value) -> Result<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .map(|item| scalar(name, item))
            .collect::<Result<Vec<_>>>()
            .map(|parts| parts.join(",")),
        other => scalar_to_string(other).ok_or_else(|| {
            Error::invalid_parameter(
                name,
                format!("expected a string or number, got {}", type_name(other)),
            )
        }),
    }
}

/// Comma-join a sequence; a lone string is taken as a single entry
fn joined(name: &str, value: &Value) -> Result<String> {
    match value {
        Value::Object(map) => map
            .values()
            .map(|item| scalar(name, item))
            .collect::<Result<Vec<_>>>()
            .map(|parts| parts.join(",")),
        other => scalar(name, other),
    }
}

fn pair<'a>(name: &str, value: &'a Value) -> Result<&'a [Value]> {
    match value.as_array() {
        Some(items) if items.len() >= 2 => Ok(&items[..2]),
        _ => Err(Error::invalid_parameter(name, "expected a [lat, lng] pair")),
    }
}

/// Split a `[lat, lng]` pair into its rendered components
fn lat_lng(name: &str, value: &Value) -> Result<(String, String)> {
    let items = pair(name, value)?;
    let lat = scalar_to_string(&items[0])
        .ok_or_else(|| Error::invalid_parameter(name, "latitude must be a number"))?;
    let lng = scalar_to_string(&items[1])
        .ok_or_else(|| Error::invalid_parameter(name, "longitude must be a number"))?;
    Ok((lat, lng))
}
