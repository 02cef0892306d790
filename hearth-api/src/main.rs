/// API server entry point
///
/// Loads configuration, connects to the database, runs pending migrations,
/// and serves the HTTP API.

use hearth_api::{
    app::{build_router, AppState},
    config::Config,
};
use hearth_shared::db::{
    migrations::run_migrations,
    pool::{close_pool, create_pool, DatabaseConfig},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hearth_api=debug,tower_http=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    tracing::info!(
        version = hearth_shared::VERSION,
        address = %config.bind_address(),
        "Starting API server"
    );

    let db_config = DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..DatabaseConfig::default()
    };
    let pool = create_pool(db_config).await?;

    run_migrations(&pool).await?;

    let state = AppState::new(pool.clone(), config.clone());
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    close_pool(pool).await;

    Ok(())
}
