/// Application state and router builder
///
/// This module defines the shared application state and provides a function
/// to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use hearth_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = hearth_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, middleware::security::SecurityHeadersLayer, views::ViewNotifier};
use axum::{
    extract::Request,
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{delete, get, patch, post},
    Router,
};
use hearth_shared::auth::{middleware::extract_session_token, middleware::AuthContext, session};
use hearth_shared::models::user::User;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,

    /// Stale-view broadcast for post-mutation invalidation
    pub views: ViewNotifier,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
            views: ViewNotifier::new(),
        }
    }

    /// Gets the session signing secret
    pub fn session_secret(&self) -> &str {
        &self.config.session.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                     # Health check (public)
/// └── /v1/                        # API v1 (versioned)
///     ├── /auth/                  # signup/login/logout public, /me authed
///     ├── /tasks/                 # Task CRUD + completion (authed)
///     ├── /purchases/             # Purchase CRUD (authed)
///     ├── /roommates/             # Roster, profile, account deletion (authed)
///     └── /dashboard              # Aggregated stats (authed)
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Security headers
/// 4. Session authentication (per-route basis)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Public auth routes (no session required)
    let auth_routes = Router::new()
        .route("/signup", post(routes::auth::signup))
        .route("/login", post(routes::auth::login))
        .route("/logout", post(routes::auth::logout));

    // Current-user lookup needs a valid session
    let me_routes = Router::new()
        .route("/me", get(routes::auth::me))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            session_auth_layer,
        ));

    let task_routes = Router::new()
        .route("/", get(routes::tasks::list_tasks))
        .route("/", post(routes::tasks::create_task))
        .route("/:id", patch(routes::tasks::update_task))
        .route("/:id", delete(routes::tasks::delete_task))
        .route("/:id/complete", post(routes::tasks::complete_task));

    let purchase_routes = Router::new()
        .route("/", get(routes::purchases::list_purchases))
        .route("/", post(routes::purchases::create_purchase))
        .route("/:id", patch(routes::purchases::update_purchase))
        .route("/:id", delete(routes::purchases::delete_purchase));

    let roommate_routes = Router::new()
        .route("/", get(routes::roommates::list_roommates))
        .route("/:id", patch(routes::roommates::update_roommate))
        .route("/:id", delete(routes::roommates::delete_roommate));

    let dashboard_routes = Router::new().route("/", get(routes::dashboard::get_dashboard));

    // Everything except auth requires a session
    let authed_routes = Router::new()
        .nest("/tasks", task_routes)
        .nest("/purchases", purchase_routes)
        .nest("/roommates", roommate_routes)
        .nest("/dashboard", dashboard_routes)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            session_auth_layer,
        ));

    let v1_routes = Router::new()
        .nest("/auth", auth_routes.merge(me_routes))
        .merge(authed_routes);

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        // Development mode: permissive CORS
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::COOKIE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(health_routes)
        .nest("/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}

/// Session authentication middleware layer
///
/// Extracts the session token (cookie or bearer fallback), validates it,
/// confirms the user still exists, and injects [`AuthContext`] into request
/// extensions. Tokens for deleted accounts stop working at this check.
async fn session_auth_layer(
    state: axum::extract::State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, crate::error::ApiError> {
    let token = extract_session_token(req.headers()).ok_or_else(|| {
        crate::error::ApiError::Unauthorized("Missing credentials".to_string())
    })?;

    let claims = session::validate_token(&token, state.session_secret())?;

    let user = User::find_by_id(&state.db, claims.sub)
        .await?
        .ok_or_else(|| crate::error::ApiError::Unauthorized("Unknown user".to_string()))?;

    req.extensions_mut().insert(AuthContext::new(user.id));

    Ok(next.run(req).await)
}
