//! URL helpers for talking to the mood service.
//!
//! Server URLs arrive from config or the command line with or without a
//! trailing slash; normalizing once keeps endpoint construction free of
//! doubled slashes.

/// Strip trailing slashes from a configured server URL.
///
/// # Examples
///
/// ```
/// use moodline::utils::url::normalize_server_url;
///
/// assert_eq!(normalize_server_url("http://127.0.0.1:5000"), "http://127.0.0.1:5000");
/// assert_eq!(normalize_server_url("http://127.0.0.1:5000/"), "http://127.0.0.1:5000");
/// ```
pub fn normalize_server_url(server_url: &str) -> String {
    server_url.trim_end_matches('/').to_string()
}

/// Join a server URL and an endpoint path into a full request URL.
///
/// # Examples
///
/// ```
/// use moodline::utils::url::endpoint_url;
///
/// assert_eq!(
///     endpoint_url("http://127.0.0.1:5000", "mood_trend"),
///     "http://127.0.0.1:5000/mood_trend"
/// );
/// assert_eq!(
///     endpoint_url("http://127.0.0.1:5000/", "/chat"),
///     "http://127.0.0.1:5000/chat"
/// );
/// ```
pub fn endpoint_url(server_url: &str, endpoint: &str) -> String {
    let base = normalize_server_url(server_url);
    let endpoint = endpoint.trim_start_matches('/');
    format!("{base}/{endpoint}")
}
