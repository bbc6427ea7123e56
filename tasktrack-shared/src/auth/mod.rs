/// Authentication and authorization utilities
///
/// This module provides the session and access-control primitives for TaskTrack:
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: Session token issuance and verification (HS256, 7-day validity)
/// - [`session`]: Session transport — HttpOnly cookie with Bearer header fallback
/// - [`middleware`]: Per-request access control gate and role gate for Axum
///
/// # Security Features
///
/// - **Password Hashing**: Argon2id, salted per password
/// - **Session Tokens**: HS256 signing, fixed 7-day validity window
/// - **Cookie Transport**: HttpOnly + SameSite=Lax, never readable by scripts
///
/// # Example
///
/// ```no_run
/// use tasktrack_shared::auth::password::{hash_password, verify_password};
/// use tasktrack_shared::auth::jwt::{issue_token, verify_token};
/// use tasktrack_shared::models::user::Role;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// // Password authentication
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// // Session token round trip
/// let secret = "secret-key-at-least-32-bytes-long!!";
/// let token = issue_token(Uuid::new_v4(), Role::User, secret)?;
/// let claims = verify_token(&token, secret)?;
/// assert_eq!(claims.role, Role::User);
/// # Ok(())
/// # }
/// ```

pub mod jwt;
pub mod middleware;
pub mod password;
pub mod session;
