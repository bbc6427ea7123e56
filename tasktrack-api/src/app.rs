/// Application state and router builder
///
/// Defines the shared application state and builds the Axum router with all
/// routes and middleware.
///
/// # Example
///
/// ```no_run
/// use tasktrack_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = tasktrack_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::config::Config;
use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use tasktrack_shared::auth::middleware::{require_auth, require_role};
use tasktrack_shared::models::user::Role;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned per request via Axum's `State` extractor. The pool is internally
/// reference-counted and the config sits behind an Arc, so cloning is cheap.
/// Nothing in here is mutated after startup.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Gets the signing secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }

    /// Whether session cookies carry the Secure attribute
    pub fn cookie_secure(&self) -> bool {
        self.config.api.cookie_secure
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                       # Health check (public)
/// └── /api/v1/
///     ├── /auth/                    # Public
///     │   ├── POST /register
///     │   ├── POST /login
///     │   └── POST /logout
///     ├── /tasks/                   # Authenticated
///     │   ├── GET    /
///     │   ├── POST   /
///     │   ├── PUT    /:id
///     │   └── DELETE /:id
///     └── /admin/                   # Authenticated + admin role gate
///         ├── GET    /users
///         ├── DELETE /users/:id
///         └── GET    /tasks
/// ```
///
/// # Middleware Stack
///
/// Per route group, outermost first: trace logging, CORS, then the access
/// control gate, then (admin only) the role gate. The gate chain is an
/// explicit ordered pipeline — a request either picks up an `AuthContext`
/// and proceeds, or terminates with 401/403 inside the chain.
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let secret = state.jwt_secret().to_string();

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Auth routes (public; logout only clears the cookie)
    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/logout", post(routes::auth::logout));

    // Task routes (require authentication)
    let task_routes = Router::new()
        .route("/", get(routes::tasks::list_tasks))
        .route("/", post(routes::tasks::create_task))
        .route("/:id", put(routes::tasks::update_task))
        .route("/:id", delete(routes::tasks::delete_task))
        .layer(middleware::from_fn(require_auth(secret.clone())));

    // Admin routes (require authentication + admin role).
    // Layers run bottom-up: require_auth first, then the role gate.
    let admin_routes = Router::new()
        .route("/users", get(routes::admin::list_users))
        .route("/users/:id", delete(routes::admin::delete_user))
        .route("/tasks", get(routes::admin::list_all_tasks))
        .layer(middleware::from_fn(require_role(&[Role::Admin])))
        .layer(middleware::from_fn(require_auth(secret)));

    let v1_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/tasks", task_routes)
        .nest("/admin", admin_routes);

    let cors = build_cors(&state.config);

    Router::new()
        .merge(health_routes)
        .nest("/api/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

/// Configures CORS from the allowed browser origin
///
/// With an origin configured, credentials are enabled so the session cookie
/// flows on cross-origin requests; a credentialed wildcard is invalid per the
/// CORS spec, hence the split.
fn build_cors(config: &Config) -> CorsLayer {
    match &config.api.cors_origin {
        Some(origin) => {
            let origins: Vec<HeaderValue> =
                origin.parse().ok().map(|o| vec![o]).unwrap_or_default();

            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
                .allow_credentials(true)
                .max_age(std::time::Duration::from_secs(3600))
        }
        // Development mode: permissive, no credentials
        None => CorsLayer::permissive(),
    }
}
