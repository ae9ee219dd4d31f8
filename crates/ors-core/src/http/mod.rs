//! HTTP plumbing shared by every endpoint
//!
//! This module provides:
//! - URL construction from host and path segments
//! - Authentication and header assembly
//! - Per-request deadlines
//! - Status checking and error normalization
//! - Body decoding (JSON or text)

pub mod auth;
pub mod client;
pub mod error;
pub mod response;
pub mod timeout;
pub mod url;

pub use auth::{build_headers, AuthHandler, HeaderKeyAuth, QueryKeyAuth};
pub use client::{HttpClient, PreparedRequest};
pub use error::HttpError;
pub use response::{DecodeMode, OrsResponse};
pub use timeout::{RequestTimeout, TimeoutConfig};
pub use self::url::build_url;

// Re-export commonly used types
pub use reqwest::{Method, StatusCode};
