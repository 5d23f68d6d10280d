use std::sync::Arc;

use anyhow::Context;
use tourcraft::{AppState, config::Config, db, relay::Relay};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("tourcraft=debug,tower_http=info")),
        )
        .init();

    let config = Arc::new(Config::load());

    let db_pool = db::connect(&config.database_url)
        .await
        .context("database setup failed")?;

    let addr = format!("0.0.0.0:{}", config.port);
    let app_state = AppState {
        db_pool,
        relay: Arc::new(Relay::new()),
        config,
    };

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "tourcraft api listening");
    axum::serve(listener, tourcraft::app(app_state)).await?;

    Ok(())
}
