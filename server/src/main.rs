//! Process entry point: configuration, connection pools, migrations and the
//! composed HTTP router.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::routing::get;
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tower_http::trace::TraceLayer;
use tracing::info;

use dispatch_engine::cache::{KeyValue, RedisKv};
use dispatch_engine::DispatchService;
use shared::config::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    shared::logger::init();

    let settings = Settings::load().context("failed to load configuration")?;

    let pool = PgPoolOptions::new()
        .max_connections(settings.max_db_connections)
        .connect(&settings.database_url)
        .await
        .context("failed to connect to postgres")?;
    sqlx::migrate!("../migrations")
        .run(&pool)
        .await
        .context("failed to run migrations")?;

    let redis_pool = deadpool_redis::Config::from_url(&settings.redis_url)
        .create_pool(Some(deadpool_redis::Runtime::Tokio1))
        .context("failed to create redis pool")?;
    let kv: Arc<dyn KeyValue> = Arc::new(RedisKv::new(redis_pool));

    let dispatch = Arc::new(DispatchService::new(pool.clone(), kv));

    let app = Router::new()
        .merge(registry_service::routes::router(pool))
        .merge(dispatch_engine::routes::router(dispatch))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(&settings.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", settings.listen_addr))?;
    info!(addr = %settings.listen_addr, "evacuation dispatch server listening");

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}

async fn health() -> &'static str {
    "OK"
}
