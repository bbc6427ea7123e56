/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /api/v1/auth/register` - Register a new user
/// - `POST /api/v1/auth/login` - Login
/// - `POST /api/v1/auth/logout` - Logout (clears the session cookie)
///
/// On successful registration and login the session token is written into the
/// HttpOnly session cookie — it is never part of the JSON body. The body
/// carries the public user projection only.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::MessageResponse,
};
use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::cookie::CookieJar;
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};
use tasktrack_shared::{
    auth::{jwt, password, session},
    models::user::{CreateUser, User, UserPublic},
};
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Display name
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,

    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Body returned by register and login
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    /// The authenticated user, credential excluded
    pub user: UserPublic,
}

/// Register a new user
///
/// Creates a user account with the default `user` role, issues a session
/// token, and sets the session cookie.
///
/// # Endpoint
///
/// ```text
/// POST /api/v1/auth/register
/// Content-Type: application/json
///
/// {
///   "name": "John Doe",
///   "email": "user@example.com",
///   "password": "hunter22"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `409 Conflict`: Email already in use (case-insensitive)
/// - `500 Internal Server Error`: Store failure
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    WithRejection(Json(req), _): WithRejection<Json<RegisterRequest>, ApiError>,
) -> ApiResult<(StatusCode, CookieJar, Json<AuthResponse>)> {
    req.validate().map_err(ApiError::from)?;

    // Explicit duplicate check for a friendly conflict; the unique index on
    // LOWER(email) still backstops the race, mapped by From<sqlx::Error>.
    if User::find_by_email(&state.db, &req.email).await?.is_some() {
        return Err(ApiError::Conflict("Email already in use".to_string()));
    }

    let password_hash = password::hash_password(&req.password)?;

    let user = User::create(
        &state.db,
        CreateUser {
            name: req.name,
            email: req.email,
            password_hash,
        },
    )
    .await?;

    let token = jwt::issue_token(user.id, user.role, state.jwt_secret())?;
    let jar = jar.add(session::session_cookie(token, state.cookie_secure()));

    Ok((
        StatusCode::CREATED,
        jar,
        Json(AuthResponse { user: user.into() }),
    ))
}

/// Login
///
/// Verifies credentials, issues a session token, and sets the session cookie.
/// Unknown email and wrong password fail identically — the response never
/// reveals which field was wrong.
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `401 Unauthorized`: Invalid credentials
/// - `500 Internal Server Error`: Store failure
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    WithRejection(Json(req), _): WithRejection<Json<LoginRequest>, ApiError>,
) -> ApiResult<(CookieJar, Json<AuthResponse>)> {
    req.validate().map_err(ApiError::from)?;

    let user = User::find_by_email(&state.db, &req.email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid credentials".to_string()))?;

    let valid = password::verify_password(&req.password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    }

    let token = jwt::issue_token(user.id, user.role, state.jwt_secret())?;
    let jar = jar.add(session::session_cookie(token, state.cookie_secure()));

    Ok((jar, Json(AuthResponse { user: user.into() })))
}

/// Logout
///
/// Clears the session cookie. The clear attributes mirror the set attributes,
/// otherwise the browser would silently keep the cookie. Stateless otherwise:
/// the token itself simply expires.
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<MessageResponse>) {
    let jar = jar.add(session::clear_session_cookie(state.cookie_secure()));

    (jar, Json(MessageResponse::new("Logged out")))
}
