//! Logging helpers
//!
//! The library only emits `tracing` events; installing a subscriber is left
//! to the application. What lives here keeps credentials out of those events.

use std::sync::OnceLock;

use regex::Regex;
use reqwest::header::HeaderMap;

static API_KEY_PARAM: OnceLock<Regex> = OnceLock::new();

/// Replace the value of any `api_key` query parameter with `***`
pub fn redact_url(url: &str) -> String {
    let regex = API_KEY_PARAM
        .get_or_init(|| Regex::new(r"(?i)([?&]api_key=)[^&#]*").expect("Valid regex pattern"));
    regex.replace_all(url, "${1}***").into_owned()
}

/// Check if a header name carries credentials
pub fn is_sensitive_header(name: &str) -> bool {
    let name = name.to_ascii_lowercase();
    name == "authorization"
        || name.contains("api-key")
        || name.contains("api_key")
        || name.contains("token")
}

/// Header names and values with credentials masked, for trace output
pub fn redacted_headers(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            let shown = if is_sensitive_header(name.as_str()) {
                "***".to_string()
            } else {
                value.to_str().unwrap_or("<binary>").to_string()
            };
            (name.as_str().to_string(), shown)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact_geocode_url() {
        let url = "https://api.openrouteservice.org/geocode/search?api_key=5b3ce3597851110001cf6248&text=Heidelberg";
        assert_eq!(
            redact_url(url),
            "https://api.openrouteservice.org/geocode/search?api_key=***&text=Heidelberg"
        );
    }

    #[test]
    fn test_redact_leaves_other_urls_alone() {
        let url = "https://api.openrouteservice.org/v2/directions/driving-car";
        assert_eq!(redact_url(url), url);
    }

    #[test]
    fn test_sensitive_headers() {
        assert!(is_sensitive_header("Authorization"));
        assert!(is_sensitive_header("X-Api-Key"));
        assert!(!is_sensitive_header("Content-type"));
    }

    #[test]
    fn test_redacted_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", "secret".parse().unwrap());
        headers.insert("content-type", "application/json".parse().unwrap());

        let shown = redacted_headers(&headers);
        assert!(shown.contains(&("authorization".to_string(), "***".to_string())));
        assert!(shown.contains(&("content-type".to_string(), "application/json".to_string())));
    }
}
