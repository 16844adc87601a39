use std::{future::Future, net::SocketAddr};

use anyhow::Context;
use axum::Router;
use common::utils::logging::init_logging_from_env;
use configs::AppConfig;
use dotenvy::dotenv;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::routes::{self, AppState};
use service::storage::document_store::DocumentStore;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Load host/port and store settings from configs, falling back to env vars
pub fn load_config() -> anyhow::Result<AppConfig> {
    AppConfig::load_or_env().context("invalid configuration")
}

/// Open the document store described by `cfg` and wrap it as handler state
pub async fn build_state(cfg: &AppConfig) -> anyhow::Result<AppState> {
    let store = DocumentStore::open(&cfg.store.data_file, cfg.store.create_if_missing)
        .await
        .with_context(|| format!("cannot open data file {}", cfg.store.data_file))?;
    info!(path = %store.path().display(), "record store ready");
    Ok(AppState::new(store))
}

/// Serve `state` on an already bound listener until `shutdown` resolves
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app: Router = routes::build_router(state, build_cors());
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

/// Public entry: build the app and run the HTTP server until `shutdown` resolves
pub async fn run<F>(shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    dotenv().ok();
    init_logging_from_env();

    let cfg = load_config()?;
    let state = build_state(&cfg).await?;

    let bind = cfg.server.bind_addr();
    let listener = TcpListener::bind(bind.as_str())
        .await
        .with_context(|| format!("cannot bind {bind}"))?;
    let addr: SocketAddr = listener.local_addr()?;
    info!(%addr, "Server is running on http://{}", addr);
    serve(listener, state, shutdown).await
}
