//! ors-core - HTTP client for the openrouteservice API
//!
//! This crate builds and sends requests for the openrouteservice routing and
//! geocoding endpoints from loosely-typed JSON options.
//!
//! # Main Components
//!
//! - **Client**: [`OrsClient`], one method per endpoint
//! - **Configuration**: [`ClientConfig`], merged under every call's options
//! - **Endpoints**: static per-endpoint behavior (URL defaults, payload
//!   shaping, geocode query encoding)
//! - **HTTP**: URL building, auth headers, deadlines, status handling
//! - **Error Handling**: a single [`Error`] enum using `thiserror`
//!
//! # Example
//!
//! ```no_run
//! use ors_core::{ClientConfig, OrsClient, Result};
//! use serde_json::json;
//!
//! async fn example() -> Result<()> {
//!     let client = OrsClient::new(ClientConfig::new("your-api-key"))?;
//!     let route = client
//!         .directions(json!({
//!             "profile": "driving-car",
//!             "format": "geojson",
//!             "coordinates": [[8.681495, 49.41461], [8.687872, 49.420318]],
//!             "avoidables": ["ferries"]
//!         }))
//!         .await?;
//!     println!("{:?}", route.as_json());
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod http;
pub mod logging;
pub mod options;

pub use client::OrsClient;
pub use config::{
    ClientConfig, EndpointOverrides, DEFAULT_API_VERSION, DEFAULT_HOST, DEFAULT_TIMEOUT_MS,
};
pub use endpoints::{EndpointSpec, GeocodeField};
pub use error::{Error, Result};
pub use http::{build_url, OrsResponse, PreparedRequest};
pub use options::{merge_options, strip_routing_fields, Options, RoutingFields};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
