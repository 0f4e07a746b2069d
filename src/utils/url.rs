//! Endpoint URL construction for the chat server.

/// Join the server base URL and an endpoint path with exactly one slash.
///
/// ```
/// use parley::utils::url::construct_api_url;
///
/// assert_eq!(
///     construct_api_url("http://127.0.0.1:5000", "chat"),
///     "http://127.0.0.1:5000/chat"
/// );
/// assert_eq!(
///     construct_api_url("https://chat.example.com/app//", "/upload"),
///     "https://chat.example.com/app/upload"
/// );
/// ```
pub fn construct_api_url(base_url: &str, endpoint: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    let endpoint = endpoint.trim_start_matches('/');
    format!("{base}/{endpoint}")
}
