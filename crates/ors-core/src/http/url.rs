//! Endpoint URL construction

use std::sync::OnceLock;

use regex::Regex;

static SLASH_RUNS: OnceLock<Regex> = OnceLock::new();

fn slash_runs() -> &'static Regex {
    SLASH_RUNS.get_or_init(|| Regex::new(r"/{2,}").expect("Valid regex pattern"))
}

/// Join host and path segments into an endpoint URL.
///
/// Empty segments are skipped, runs of slashes inside the path collapse to
/// one, and neither the path nor the host end in a slash. The scheme
/// separator of the host is left alone.
pub fn build_url(host: &str, version: &str, service: &str, profile: &str, format: &str) -> String {
    let joined = [version, service, profile, format].join("/");
    let collapsed = slash_runs().replace_all(&joined, "/");
    let path = collapsed.trim_matches('/');
    let host = host.trim_end_matches('/');

    if path.is_empty() {
        host.to_string()
    } else {
        format!("{}/{}", host, path)
    }
}

/// Append a query separator so parameters can follow
pub fn with_query_separator(mut url: String) -> String {
    url.push(if url.contains('?') { '&' } else { '?' });
    url
}
