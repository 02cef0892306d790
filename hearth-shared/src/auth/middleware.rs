/// Authentication context and credential extraction for Axum
///
/// The session token travels in an httpOnly `session_token` cookie (set at
/// login/signup), with an `Authorization: Bearer` fallback for programmatic
/// clients. The API's auth layer extracts the token, validates it, confirms
/// the user row still exists, and inserts an [`AuthContext`] into request
/// extensions — the authenticated caller is always an explicit value passed
/// to handlers, never ambient state.
///
/// # Example
///
/// ```
/// use axum::Extension;
/// use hearth_shared::auth::middleware::AuthContext;
///
/// async fn handler(Extension(auth): Extension<AuthContext>) -> String {
///     format!("User: {}", auth.user_id)
/// }
/// ```

use axum::http::{header, HeaderMap};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "session_token";

/// Session cookie Max-Age in seconds (7 days, matching the token lifetime)
pub const SESSION_COOKIE_MAX_AGE: i64 = 7 * 24 * 60 * 60;

/// Authentication context added to request extensions
///
/// Added by the session auth layer after successful validation. Handlers
/// extract it with Axum's `Extension` extractor.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user ID
    pub user_id: Uuid,
}

impl AuthContext {
    /// Creates an auth context for a validated session
    pub fn new(user_id: Uuid) -> Self {
        Self { user_id }
    }
}

/// Error type for credential extraction and validation
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No session cookie or bearer token on the request
    #[error("Missing credentials")]
    MissingCredentials,

    /// Token failed validation
    #[error("Invalid session: {0}")]
    InvalidToken(String),

    /// Token was valid but the user no longer exists
    #[error("Unknown user")]
    UnknownUser,

    /// Database error during user lookup
    #[error("Database error: {0}")]
    DatabaseError(String),
}

/// Extracts the session token from a request's headers
///
/// Checks the `session_token` cookie first, then falls back to an
/// `Authorization: Bearer` header. Returns None when neither is present.
pub fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    if let Some(token) = cookie_value(headers, SESSION_COOKIE) {
        return Some(token);
    }

    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.to_string())
}

/// Builds the `Set-Cookie` value that establishes a session
pub fn session_cookie(token: &str) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE, token, SESSION_COOKIE_MAX_AGE
    )
}

/// Builds the `Set-Cookie` value that ends a session
pub fn clear_session_cookie() -> String {
    format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", SESSION_COOKIE)
}

/// Finds a cookie's value in the Cookie header(s)
fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    for value in headers.get_all(header::COOKIE) {
        let Ok(raw) = value.to_str() else { continue };

        for pair in raw.split(';') {
            let pair = pair.trim();
            if let Some((key, val)) = pair.split_once('=') {
                if key == name && !val.is_empty() {
                    return Some(val.to_string());
                }
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(name: header::HeaderName, value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(name, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_extract_from_cookie() {
        let headers = headers_with(header::COOKIE, "session_token=abc123");
        assert_eq!(extract_session_token(&headers), Some("abc123".to_string()));
    }

    #[test]
    fn test_extract_from_cookie_among_others() {
        let headers = headers_with(
            header::COOKIE,
            "theme=dark; session_token=abc123; lang=en",
        );
        assert_eq!(extract_session_token(&headers), Some("abc123".to_string()));
    }

    #[test]
    fn test_extract_from_bearer_fallback() {
        let headers = headers_with(header::AUTHORIZATION, "Bearer xyz789");
        assert_eq!(extract_session_token(&headers), Some("xyz789".to_string()));
    }

    #[test]
    fn test_cookie_takes_precedence_over_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("session_token=from-cookie"),
        );
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer from-header"),
        );
        assert_eq!(
            extract_session_token(&headers),
            Some("from-cookie".to_string())
        );
    }

    #[test]
    fn test_extract_missing() {
        assert_eq!(extract_session_token(&HeaderMap::new()), None);

        let headers = headers_with(header::COOKIE, "theme=dark");
        assert_eq!(extract_session_token(&headers), None);

        let headers = headers_with(header::COOKIE, "session_token=");
        assert_eq!(extract_session_token(&headers), None);
    }

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("tok");
        assert!(cookie.starts_with("session_token=tok;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Max-Age=604800"));

        let cleared = clear_session_cookie();
        assert!(cleared.contains("Max-Age=0"));
    }
}
