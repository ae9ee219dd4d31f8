//! Response body decoding

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::options::is_truthy;

/// Decoded response body
#[derive(Debug, Clone, PartialEq)]
pub enum OrsResponse {
    Json(Value),
    Text(String),
}

impl OrsResponse {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            OrsResponse::Json(value) => Some(value),
            OrsResponse::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            OrsResponse::Text(text) => Some(text),
            OrsResponse::Json(_) => None,
        }
    }

    pub fn into_json(self) -> Option<Value> {
        match self {
            OrsResponse::Json(value) => Some(value),
            OrsResponse::Text(_) => None,
        }
    }

    /// Deserialize a JSON body into a caller-defined type
    pub fn deserialize<T: DeserializeOwned>(self) -> Result<T> {
        match self {
            OrsResponse::Json(value) => Ok(serde_json::from_value(value)?),
            OrsResponse::Text(_) => Err(Error::Decode {
                message: "response body is text, not JSON".to_string(),
                source: None,
            }),
        }
    }
}

/// How a successful body is decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeMode {
    /// JSON, or text when the requested format is `gpx`
    ByFormat,
    /// JSON, falling back to the raw text when the JSON value is falsy
    JsonThenText,
}

/// Decode a successful body
pub fn decode_body(mode: DecodeMode, wants_text: bool, body: String) -> Result<OrsResponse> {
    match mode {
        DecodeMode::ByFormat if wants_text => Ok(OrsResponse::Text(body)),
        DecodeMode::ByFormat => parse_json(&body).map(OrsResponse::Json),
        DecodeMode::JsonThenText => {
            let value = parse_json(&body)?;
            if is_truthy(&value) {
                Ok(OrsResponse::Json(value))
            } else {
                Ok(OrsResponse::Text(body))
            }
        }
    }
}

fn parse_json(body: &str) -> Result<Value> {
    serde_json::from_str(body).map_err(|e| Error::Decode {
        message: format!("response is not valid JSON: {}", e),
        source: Some(anyhow::Error::new(e)),
    })
}
