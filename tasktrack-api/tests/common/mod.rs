/// Common test utilities for integration tests
///
/// Provides two flavors of test app:
///
/// - [`TestApp::stateless`]: router over a lazily-connected pool. Suitable for
///   every path that terminates before touching the store (the access control
///   gate, role gate, and request validation). Runs anywhere.
/// - [`TestApp::with_database`]: router over a real database, migrated and
///   ready. Returns `None` unless `TEST_DATABASE_URL` is set, so store-backed
///   tests skip cleanly on machines without PostgreSQL.

use axum::body::Body;
use axum::http::{Request, Response};
use sqlx::PgPool;
use tasktrack_api::app::{build_router, AppState};
use tasktrack_api::config::{ApiConfig, Config, DatabaseConfig, JwtConfig};
use tasktrack_shared::auth::jwt;
use tasktrack_shared::db::pool;
use tasktrack_shared::models::user::Role;
use tower::ServiceExt;
use uuid::Uuid;

/// Signing secret shared by all tests
pub const TEST_SECRET: &str = "integration-test-secret-at-least-32-bytes";

/// A router plus the bits tests need to talk to it
pub struct TestApp {
    pub app: axum::Router,
    pub db: Option<PgPool>,
}

fn test_config(database_url: &str) -> Config {
    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origin: None,
            cookie_secure: false,
        },
        database: DatabaseConfig {
            url: database_url.to_string(),
            max_connections: 5,
        },
        jwt: JwtConfig {
            secret: TEST_SECRET.to_string(),
        },
    }
}

impl TestApp {
    /// Builds the app over a pool that never connects
    ///
    /// Good for every request that terminates inside the middleware chain or
    /// request validation. The pool points at a closed local port so any
    /// accidental store access fails fast instead of hanging.
    pub fn stateless() -> Self {
        let url = "postgresql://nobody@127.0.0.1:1/unreachable";
        let db = pool::create_lazy_pool(pool::DatabaseConfig {
            url: url.to_string(),
            connect_timeout_seconds: 1,
            ..Default::default()
        })
        .expect("lazy pool should construct");

        let state = AppState::new(db, test_config(url));
        Self {
            app: build_router(state),
            db: None,
        }
    }

    /// Builds the app over a real migrated database, or None to skip
    pub async fn with_database() -> Option<Self> {
        let url = match std::env::var("TEST_DATABASE_URL") {
            Ok(url) => url,
            Err(_) => return None,
        };

        let db = PgPool::connect(&url).await.expect("test db should connect");
        sqlx::migrate!("../migrations")
            .run(&db)
            .await
            .expect("migrations should run");

        let state = AppState::new(db.clone(), test_config(&url));
        Some(Self {
            app: build_router(state),
            db: Some(db),
        })
    }

    /// Sends a request through the router
    pub async fn request(&self, req: Request<Body>) -> Response<Body> {
        self.app.clone().oneshot(req).await.unwrap()
    }

    /// Issues a valid session token for an arbitrary identity
    pub fn token_for(&self, user_id: Uuid, role: Role) -> String {
        jwt::issue_token(user_id, role, TEST_SECRET).unwrap()
    }

    /// Promotes a user to admin directly in the store (no API path exists)
    pub async fn promote_to_admin(&self, user_id: Uuid) {
        let db = self.db.as_ref().expect("requires a database-backed app");
        sqlx::query("UPDATE users SET role = 'admin' WHERE id = $1")
            .bind(user_id)
            .execute(db)
            .await
            .expect("promotion should succeed");
    }
}

/// Builds a GET request with optional bearer token
pub fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

/// Builds a JSON request with optional bearer token
pub fn json_request(
    method: &str,
    uri: &str,
    body: serde_json::Value,
    token: Option<&str>,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// Reads a response body as JSON
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// A unique email per test run, so suites can share a database
pub fn unique_email(prefix: &str) -> String {
    format!("{}-{}@example.com", prefix, Uuid::new_v4())
}
