/// Session token generation and validation
///
/// Hearth keeps a single signed token in an httpOnly cookie for the whole
/// session lifetime (7 days) — there is no access/refresh split. Tokens are
/// signed with HS256 (HMAC-SHA256) and carry the user id as the subject.
///
/// # Security
///
/// - **Algorithm**: HS256 (HMAC with SHA-256)
/// - **Expiration**: 7 days, matching the cookie's Max-Age
/// - **Validation**: signature, expiration, issuer, and not-before checks
/// - **Secret**: at least 32 bytes (enforced at config load)
///
/// # Example
///
/// ```
/// use hearth_shared::auth::session::{create_token, validate_token, SessionClaims};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let user_id = Uuid::new_v4();
/// let secret = "a-secret-key-at-least-32-bytes-long!";
///
/// let claims = SessionClaims::new(user_id);
/// let token = create_token(&claims, secret)?;
///
/// let validated = validate_token(&token, secret)?;
/// assert_eq!(validated.sub, user_id);
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Issuer embedded in every session token
const ISSUER: &str = "hearth";

/// Session lifetime — must match the session cookie's Max-Age
pub const SESSION_LIFETIME_DAYS: i64 = 7;

/// Error type for session token operations
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Failed to validate token
    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Session has expired")]
    Expired,
}

/// Session token claims
///
/// Standard JWT claims only; the subject is the authenticated user id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject — user ID
    pub sub: Uuid,

    /// Issuer — always "hearth"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,
}

impl SessionClaims {
    /// Creates claims for a new 7-day session
    pub fn new(user_id: Uuid) -> Self {
        Self::with_lifetime(user_id, Duration::days(SESSION_LIFETIME_DAYS))
    }

    /// Creates claims with a custom lifetime (used by tests)
    pub fn with_lifetime(user_id: Uuid, lifetime: Duration) -> Self {
        let now = Utc::now();

        Self {
            sub: user_id,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: (now + lifetime).timestamp(),
            nbf: now.timestamp(),
        }
    }

    /// Checks if the session has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Creates a signed session token from claims
///
/// # Errors
///
/// Returns `SessionError::CreateError` if encoding fails
pub fn create_token(claims: &SessionClaims, secret: &str) -> Result<String, SessionError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| SessionError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Validates a session token and extracts its claims
///
/// Verifies the signature, expiration, issuer, and not-before time.
///
/// # Errors
///
/// Returns `SessionError::Expired` for expired sessions, and
/// `SessionError::ValidationError` for any other rejection.
pub fn validate_token(token: &str, secret: &str) -> Result<SessionClaims, SessionError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;
    validation.validate_nbf = true;

    let token_data =
        decode::<SessionClaims>(token, &key, &validation).map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => SessionError::Expired,
            _ => SessionError::ValidationError(format!("Token validation failed: {}", e)),
        })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    #[test]
    fn test_create_and_validate_token() {
        let user_id = Uuid::new_v4();
        let claims = SessionClaims::new(user_id);

        let token = create_token(&claims, SECRET).expect("Token creation should succeed");
        let validated = validate_token(&token, SECRET).expect("Validation should succeed");

        assert_eq!(validated.sub, user_id);
        assert_eq!(validated.iss, "hearth");
        assert!(!validated.is_expired());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let claims = SessionClaims::new(Uuid::new_v4());
        let token = create_token(&claims, SECRET).unwrap();

        let result = validate_token(&token, "a-different-secret-also-32-bytes-ok");
        assert!(matches!(result, Err(SessionError::ValidationError(_))));
    }

    #[test]
    fn test_expired_token_rejected() {
        let claims = SessionClaims::with_lifetime(Uuid::new_v4(), Duration::seconds(-120));
        let token = create_token(&claims, SECRET).unwrap();

        let result = validate_token(&token, SECRET);
        assert!(matches!(result, Err(SessionError::Expired)));
    }

    #[test]
    fn test_garbage_token_rejected() {
        assert!(validate_token("not-a-token", SECRET).is_err());
        assert!(validate_token("", SECRET).is_err());
    }

    #[test]
    fn test_session_lifetime() {
        let claims = SessionClaims::new(Uuid::new_v4());
        let lifetime = claims.exp - claims.iat;
        assert_eq!(lifetime, SESSION_LIFETIME_DAYS * 24 * 60 * 60);
    }
}
