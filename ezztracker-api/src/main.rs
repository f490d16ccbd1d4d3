//! # ezzTracker Admin Server
//!
//! Serves the ezzTracker issue-tracking admin. On first start it creates and
//! seeds the SQLite database.
//!
//! ## Usage
//!
//! ```bash
//! SECRET_KEY=$(openssl rand -hex 32) cargo run -p ezztracker-api
//! ```

use anyhow::Context;
use ezztracker_api::{
    app::{build_router, AppState},
    config::Config,
};
use ezztracker_shared::{db::pool::close_pool, seed::bootstrap};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "ezztracker_api=debug,ezztracker_shared=info,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "ezzTracker Admin v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env().context("Failed to load configuration")?;

    let boot = bootstrap(&config.pool_config(), &config.company_name)
        .await
        .context("Failed to open database")?;
    if boot.seeded {
        tracing::info!("Seeded a new database; log in as admin@ebizz.com.br");
    }

    let addr = config.bind_address();
    let pool = boot.pool;
    let app = build_router(AppState::new(pool.clone(), config));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    close_pool(pool).await;
    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received, exiting...");
}
