/// Session token issuance and verification
///
/// This module provides the token service for TaskTrack sessions. Tokens are
/// signed using HS256 (HMAC-SHA256) and carry the user's identity and role.
///
/// # Security
///
/// - **Algorithm**: HS256 (HMAC with SHA-256)
/// - **Validity**: Fixed 7-day window from issuance
/// - **Validation**: Signature, expiration, not-before, and issuer checks
/// - **Secret Management**: Process-wide secret, loaded once at startup and
///   read-only thereafter. Rotating it invalidates all outstanding tokens.
///
/// The identity claim is always `sub`; there is exactly one canonical identity
/// field in the claim set.
///
/// # Example
///
/// ```
/// use tasktrack_shared::auth::jwt::{issue_token, verify_token};
/// use tasktrack_shared::models::user::Role;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let user_id = Uuid::new_v4();
/// let secret = "your-secret-key-at-least-32-bytes!!";
///
/// let token = issue_token(user_id, Role::Admin, secret)?;
/// let claims = verify_token(&token, secret)?;
/// assert_eq!(claims.sub, user_id);
/// assert_eq!(claims.role, Role::Admin);
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::user::Role;

/// Token issuer embedded in and required from every token
const ISSUER: &str = "tasktrack";

/// Fixed validity window for session tokens
pub const TOKEN_VALIDITY_DAYS: i64 = 7;

/// Error type for token operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Token failed signature or structural validation
    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Token was issued by someone else
    #[error("Invalid issuer")]
    InvalidIssuer,
}

/// Session token claims
///
/// The signed claim set carried by every session token. Claims are never
/// trusted unless the signature verifies against the server secret and the
/// expiry has not passed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - User ID (the canonical identity field)
    pub sub: Uuid,

    /// User role at issuance time
    pub role: Role,

    /// Issuer - always "tasktrack"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,
}

impl Claims {
    /// Creates claims with the standard 7-day validity window
    pub fn new(user_id: Uuid, role: Role) -> Self {
        Self::with_validity(user_id, role, Duration::days(TOKEN_VALIDITY_DAYS))
    }

    /// Creates claims with a custom validity window
    ///
    /// Used by tests to mint already-expired tokens; production code always
    /// goes through [`Claims::new`].
    pub fn with_validity(user_id: Uuid, role: Role, validity: Duration) -> Self {
        let now = Utc::now();
        let expiration = now + validity;

        Self {
            sub: user_id,
            role,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
            nbf: now.timestamp(),
        }
    }

    /// Checks if the token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Issues a signed session token for a user
///
/// Produces an HS256-signed token embedding `{sub, role}` with a fixed
/// validity window of [`TOKEN_VALIDITY_DAYS`] from issuance. Pure computation,
/// no side effects.
///
/// # Arguments
///
/// * `user_id` - User ID (becomes the `sub` claim)
/// * `role` - User role at issuance time
/// * `secret` - Signing secret (should be at least 32 bytes)
///
/// # Errors
///
/// Returns `JwtError::CreateError` if encoding fails
pub fn issue_token(user_id: Uuid, role: Role, secret: &str) -> Result<String, JwtError> {
    let claims = Claims::new(user_id, role);
    sign_claims(&claims, secret)
}

/// Signs an explicit claim set
///
/// Split out from [`issue_token`] so tests can sign claims with non-standard
/// validity windows.
pub fn sign_claims(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Verifies a session token and extracts its claims
///
/// Verifies the signature, expiration, not-before time, and issuer. Any
/// failure — expired, tampered, or malformed — yields an error; the access
/// control gate maps every error to "unauthenticated" rather than
/// distinguishing them to the client.
///
/// # Arguments
///
/// * `token` - Token string
/// * `secret` - Secret key used for signing
///
/// # Example
///
/// ```
/// use tasktrack_shared::auth::jwt::{issue_token, verify_token};
/// use tasktrack_shared::models::user::Role;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let user_id = Uuid::new_v4();
/// let secret = "your-secret-key-at-least-32-bytes!!";
///
/// let token = issue_token(user_id, Role::User, secret)?;
/// let claims = verify_token(&token, secret)?;
/// assert_eq!(claims.sub, user_id);
/// # Ok(())
/// # }
/// ```
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;
    validation.validate_nbf = true;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidIssuer => JwtError::InvalidIssuer,
        _ => JwtError::ValidationError(format!("Token validation failed: {}", e)),
    })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    #[test]
    fn test_claims_have_seven_day_window() {
        let claims = Claims::new(Uuid::new_v4(), Role::User);

        let window = claims.exp - claims.iat;
        assert_eq!(window, TOKEN_VALIDITY_DAYS * 24 * 60 * 60);
        assert!(!claims.is_expired());
        assert_eq!(claims.iss, "tasktrack");
    }

    #[test]
    fn test_issue_and_verify_token() {
        let user_id = Uuid::new_v4();

        let token = issue_token(user_id, Role::Admin, SECRET).expect("Should issue token");
        let claims = verify_token(&token, SECRET).expect("Should verify token");

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.role, Role::Admin);
    }

    #[test]
    fn test_verify_with_wrong_secret() {
        let token = issue_token(Uuid::new_v4(), Role::User, SECRET).unwrap();

        let result = verify_token(&token, "a-completely-different-secret-value!");
        assert!(result.is_err());
    }

    #[test]
    fn test_verify_expired_token() {
        // Minted one hour in the past
        let claims = Claims::with_validity(Uuid::new_v4(), Role::User, Duration::seconds(-3600));
        assert!(claims.is_expired());

        let token = sign_claims(&claims, SECRET).unwrap();
        let result = verify_token(&token, SECRET);

        assert!(matches!(result, Err(JwtError::Expired)));
    }

    #[test]
    fn test_verify_tampered_payload() {
        let token = issue_token(Uuid::new_v4(), Role::User, SECRET).unwrap();

        // Swap the payload segment for one claiming a different identity.
        // The signature no longer matches, so verification must fail.
        let other = issue_token(Uuid::new_v4(), Role::Admin, SECRET).unwrap();
        let mut parts: Vec<&str> = token.split('.').collect();
        let other_parts: Vec<&str> = other.split('.').collect();
        parts[1] = other_parts[1];
        let tampered = parts.join(".");

        assert!(verify_token(&tampered, SECRET).is_err());
    }

    #[test]
    fn test_verify_malformed_token() {
        assert!(verify_token("not-a-token", SECRET).is_err());
        assert!(verify_token("", SECRET).is_err());
        assert!(verify_token("a.b", SECRET).is_err());
    }

    #[test]
    fn test_verify_wrong_issuer() {
        let mut claims = Claims::new(Uuid::new_v4(), Role::User);
        claims.iss = "someone-else".to_string();

        let token = sign_claims(&claims, SECRET).unwrap();
        let result = verify_token(&token, SECRET);

        assert!(matches!(result, Err(JwtError::InvalidIssuer)));
    }
}
