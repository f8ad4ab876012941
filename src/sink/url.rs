//! Shareable URL composition.

use url::Url;

/// Last non-empty path segment of an upload URL.
///
/// Query strings and fragments are ignored. Returns `None` when the URL has
/// no path to take an identifier from.
pub fn extract_identifier(upload_url: &str) -> Option<String> {
    let upload_url = upload_url.trim();
    match Url::parse(upload_url) {
        Ok(parsed) => parsed
            .path_segments()?
            .filter(|segment| !segment.is_empty())
            .next_back()
            .map(str::to_string),
        Err(_) => {
            let path = upload_url.split(['?', '#']).next().unwrap_or_default();
            path.split('/')
                .filter(|segment| !segment.is_empty())
                .next_back()
                .map(str::to_string)
        }
    }
}

/// Joins the configured domain and the identifier with exactly one slash.
pub fn compose_display_url(domain: &str, identifier: &str) -> String {
    format!(
        "{}/{}",
        domain.trim_end_matches('/'),
        identifier.trim_start_matches('/')
    )
}
