/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use ezztracker_api::{app::{build_router, AppState}, config::Config};
/// use ezztracker_shared::seed::bootstrap;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let boot = bootstrap(&config.pool_config(), &config.company_name).await?;
/// let app = build_router(AppState::new(boot.pool, config));
///
/// let listener = tokio::net::TcpListener::bind("127.0.0.1:5000").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```

use crate::{
    config::Config,
    middleware::{access::require_policy, session::resolve_session},
    routes,
    views::{
        company::CompanyView, crud, os::OsView, priority::PriorityView, product::ProductView,
        role::RoleView, status::StatusView, track::TrackView, track_handler::TrackHandlerView,
        user::UserView,
    },
};
use axum::{middleware::from_fn_with_state, routing::get, Router};
use ezztracker_shared::auth::policy::AccessPolicy;
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,

    /// Application configuration
    pub config: Arc<Config>,

    /// Policy guarding every admin view
    pub policy: AccessPolicy,
}

impl AppState {
    pub fn new(db: SqlitePool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
            policy: AccessPolicy::superuser(),
        }
    }
}

/// Builds the complete router
///
/// ```text
/// /
/// ├── GET  /                     landing page
/// ├── GET  /health               health check
/// ├── GET  /login/, POST /login/ login form
/// ├── GET  /logout/              logout
/// ├── GET  /admin/               admin index
/// └── /admin/{endpoint}/...      entity views, behind the access policy
/// ```
///
/// The session layer wraps everything so every handler can see the current
/// principal; the access policy wraps only the entity views.
pub fn build_router(state: AppState) -> Router {
    let views = Router::new()
        .merge(crud::routes::<TrackView>())
        .merge(crud::routes::<TrackHandlerView>())
        .merge(crud::routes::<UserView>())
        .merge(crud::routes::<RoleView>())
        .merge(crud::routes::<CompanyView>())
        .merge(crud::routes::<ProductView>())
        .merge(crud::routes::<OsView>())
        .merge(crud::routes::<StatusView>())
        .merge(crud::routes::<PriorityView>())
        .route_layer(from_fn_with_state(state.clone(), require_policy));

    Router::new()
        .route("/", get(routes::index::index))
        .route("/health", get(routes::health::health_check))
        .route("/login/", get(routes::auth::login_page).post(routes::auth::login))
        .route("/logout/", get(routes::auth::logout))
        .route("/admin/", get(routes::admin::admin_index))
        .merge(views)
        .layer(from_fn_with_state(state.clone(), resolve_session))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
