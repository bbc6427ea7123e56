/// Access control gate for Axum
///
/// Per-request middleware resolving identity and enforcing role checks. The
/// pipeline is an explicit ordered chain with no implicit fallthrough:
///
/// 1. Extract token via the session transport. Missing → 401 "Token missing",
///    terminal.
/// 2. Verify via the token service. Invalid/expired/tampered → 401 "Invalid
///    token", terminal.
/// 3. Attach [`AuthContext`] (user id + role) to request extensions; proceed.
/// 4. Optional role gate: authenticated role not in the allow-list → 403
///    "Access forbidden", terminal.
///
/// Authenticated-and-proceeding is the only non-terminal outcome.
///
/// # Example
///
/// ```no_run
/// use axum::{middleware, routing::get, Extension, Router};
/// use tasktrack_shared::auth::middleware::{require_auth, require_role, AuthContext};
/// use tasktrack_shared::models::user::Role;
///
/// async fn handler(Extension(auth): Extension<AuthContext>) -> String {
///     format!("Hello, user {}!", auth.user_id)
/// }
///
/// let app: Router = Router::new()
///     .route("/admin", get(handler))
///     .layer(middleware::from_fn(require_role(&[Role::Admin])))
///     .layer(middleware::from_fn(require_auth("jwt-secret")));
/// ```

use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use super::{jwt, session};
use crate::models::user::Role;

/// Authentication context attached to request extensions
///
/// Added after the token verifies. Handlers extract it with Axum's
/// `Extension` extractor; the claims inside came from a signed token, so they
/// are trusted for the remainder of the request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user ID
    pub user_id: Uuid,

    /// Role carried by the verified token
    pub role: Role,
}

impl AuthContext {
    /// Creates an auth context from verified claims
    pub fn from_claims(claims: &jwt::Claims) -> Self {
        Self {
            user_id: claims.sub,
            role: claims.role,
        }
    }

    /// Whether the authenticated user is an administrator
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Terminal outcomes of the access control gate
#[derive(Debug, PartialEq, Eq)]
pub enum AuthError {
    /// No token in cookie or Authorization header (401)
    MissingToken,

    /// Token present but expired, tampered, or malformed (401)
    InvalidToken,

    /// Authenticated but role not in the route's allow-list (403)
    Forbidden,

    /// Gate ran before the authentication layer attached a context (500)
    ///
    /// This is a wiring bug, not a client error.
    MissingContext,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::MissingToken => (StatusCode::UNAUTHORIZED, "Token missing"),
            AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid token"),
            AuthError::Forbidden => (StatusCode::FORBIDDEN, "Access forbidden"),
            AuthError::MissingContext => {
                tracing::error!("Role gate ran without an authentication layer");
                (StatusCode::INTERNAL_SERVER_ERROR, "Server error")
            }
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}

/// Authentication middleware
///
/// Extracts the session token (cookie preferred, Bearer fallback), verifies
/// it, and injects [`AuthContext`] into request extensions. Any verification
/// failure is reported uniformly as 401 "Invalid token" — the client learns
/// nothing about why.
///
/// Returns a middleware closure for `axum::middleware::from_fn`, capturing
/// the signing secret.
pub fn require_auth(
    secret: impl Into<String>,
) -> impl Fn(
    Request,
    Next,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, AuthError>> + Send>>
       + Clone {
    let secret = secret.into();
    move |req, next| {
        let secret = secret.clone();
        Box::pin(authenticate(secret, req, next))
    }
}

async fn authenticate(secret: String, mut req: Request, next: Next) -> Result<Response, AuthError> {
    let token = session::extract_token(req.headers()).ok_or(AuthError::MissingToken)?;

    let claims = jwt::verify_token(&token, &secret).map_err(|e| {
        tracing::debug!("Token verification failed: {}", e);
        AuthError::InvalidToken
    })?;

    req.extensions_mut().insert(AuthContext::from_claims(&claims));

    Ok(next.run(req).await)
}

/// Role gate middleware
///
/// Given an allow-list of roles, rejects authenticated requests whose role is
/// not listed. Must be layered *inside* [`require_auth`] (i.e. run after it),
/// since it reads the context that layer attaches.
///
/// # Example
///
/// ```no_run
/// use axum::{middleware, routing::get, Router};
/// use tasktrack_shared::auth::middleware::{require_auth, require_role};
/// use tasktrack_shared::models::user::Role;
///
/// let admin_routes: Router = Router::new()
///     .route("/users", get(|| async { "users" }))
///     .layer(middleware::from_fn(require_role(&[Role::Admin])))
///     .layer(middleware::from_fn(require_auth("jwt-secret")));
/// ```
pub fn require_role(
    allowed: &'static [Role],
) -> impl Fn(
    Request,
    Next,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, AuthError>> + Send>>
       + Clone {
    move |req, next| Box::pin(check_role(allowed, req, next))
}

async fn check_role(
    allowed: &'static [Role],
    req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let auth = req
        .extensions()
        .get::<AuthContext>()
        .ok_or(AuthError::MissingContext)?;

    if !allowed.contains(&auth.role) {
        return Err(AuthError::Forbidden);
    }

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{middleware, routing::get, Extension, Router};
    use tower::ServiceExt;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    async fn whoami(Extension(auth): Extension<AuthContext>) -> String {
        auth.user_id.to_string()
    }

    fn protected_app() -> Router {
        Router::new()
            .route("/me", get(whoami))
            .layer(middleware::from_fn(require_auth(SECRET)))
    }

    fn admin_app() -> Router {
        Router::new()
            .route("/admin", get(|| async { "ok" }))
            .layer(middleware::from_fn(require_role(&[Role::Admin])))
            .layer(middleware::from_fn(require_auth(SECRET)))
    }

    fn get_request(uri: &str, headers: &[(&str, String)]) -> Request {
        let mut builder = axum::http::Request::builder().method("GET").uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, value);
        }
        builder.body(axum::body::Body::empty()).unwrap()
    }

    #[test]
    fn test_auth_context_from_claims() {
        let user_id = Uuid::new_v4();
        let claims = jwt::Claims::new(user_id, Role::Admin);

        let context = AuthContext::from_claims(&claims);

        assert_eq!(context.user_id, user_id);
        assert_eq!(context.role, Role::Admin);
        assert!(context.is_admin());
        assert!(!AuthContext::from_claims(&jwt::Claims::new(user_id, Role::User)).is_admin());
    }

    #[test]
    fn test_auth_error_responses() {
        let response = AuthError::MissingToken.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = AuthError::InvalidToken.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = AuthError::Forbidden.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_missing_token_is_unauthorized() {
        let response = protected_app()
            .oneshot(get_request("/me", &[]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_invalid_token_is_unauthorized() {
        let response = protected_app()
            .oneshot(get_request(
                "/me",
                &[("authorization", "Bearer garbage".to_string())],
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_valid_bearer_token_proceeds() {
        let user_id = Uuid::new_v4();
        let token = jwt::issue_token(user_id, Role::User, SECRET).unwrap();

        let response = protected_app()
            .oneshot(get_request(
                "/me",
                &[("authorization", format!("Bearer {}", token))],
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(String::from_utf8_lossy(&body), user_id.to_string());
    }

    #[tokio::test]
    async fn test_valid_cookie_token_proceeds() {
        let token = jwt::issue_token(Uuid::new_v4(), Role::User, SECRET).unwrap();

        let response = protected_app()
            .oneshot(get_request("/me", &[("cookie", format!("token={}", token))]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_role_gate_rejects_non_admin() {
        let token = jwt::issue_token(Uuid::new_v4(), Role::User, SECRET).unwrap();

        let response = admin_app()
            .oneshot(get_request(
                "/admin",
                &[("authorization", format!("Bearer {}", token))],
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_role_gate_admits_admin() {
        let token = jwt::issue_token(Uuid::new_v4(), Role::Admin, SECRET).unwrap();

        let response = admin_app()
            .oneshot(get_request(
                "/admin",
                &[("authorization", format!("Bearer {}", token))],
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
