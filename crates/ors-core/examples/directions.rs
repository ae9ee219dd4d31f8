// Route between two points in Heidelberg
// Usage: ORS_API_KEY=... cargo run --example directions [profile]
// Set RUST_LOG=ors_core=debug to see the outgoing requests.

use ors_core::{OrsClient, OrsResponse};
use serde_json::json;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let profile = std::env::args().nth(1).unwrap_or_else(|| "driving-car".to_string());

    // Reads ORS_API_KEY and friends, .env included
    let client = OrsClient::from_env()?;

    let route = client
        .directions(json!({
            "profile": profile,
            "format": "geojson",
            "coordinates": [[8.681495, 49.41461], [8.687872, 49.420318]],
            "avoidables": ["ferries"]
        }))
        .await?;

    match route {
        OrsResponse::Json(body) => {
            let summary = &body["features"][0]["properties"]["summary"];
            println!("distance: {} m", summary["distance"]);
            println!("duration: {} s", summary["duration"]);
        }
        OrsResponse::Text(text) => println!("{}", text),
    }

    let places = client
        .geocode(json!({"text": "Heidelberg Bismarckplatz", "size": 1}))
        .await?;
    if let Some(feature) = places.as_json().and_then(|body| body["features"].get(0)) {
        println!("geocoded: {}", feature["properties"]["label"]);
    }

    Ok(())
}
