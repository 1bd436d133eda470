use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use compass_core::config::Config;
use compass_postgres::PgBackend;
use compass_server::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Structured JSON logging. Level controlled via RUST_LOG.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("compass_server=info".parse()?)
                .add_directive("compass_postgres=info".parse()?),
        )
        .json()
        .init();

    let cfg = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    // Connect the bounded pool and ensure the compass_events schema.
    let store = PgBackend::connect(&cfg).await?;

    let addr = format!("0.0.0.0:{}", cfg.port);
    let state = Arc::new(AppState::new(Arc::new(store), cfg.clone()));
    let app = compass_server::app::build_app(Arc::clone(&state));

    info!(
        port = cfg.port,
        strict = cfg.strict_events,
        "Compass listening on {}",
        addr
    );

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            tokio::signal::ctrl_c().await.ok();
        })
        .await?;

    Ok(())
}
