mod config;
mod gemini;
mod models;
mod routes;
mod store;
mod toast;
mod validation;

use anyhow::Context;
use axum::{
    routing::{delete, get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::Config;
use crate::gemini::GeminiClient;
use crate::routes::AppState;
use crate::store::FileStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Init tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    // A missing API key halts startup here; there is no degraded mode.
    let config = Config::from_env().context("configuration error")?;
    tracing::info!(
        "Using API key: {}...",
        &config.api_key[..std::cmp::min(6, config.api_key.len())]
    );

    let state = AppState::new(
        Arc::new(GeminiClient::new(config.api_key.clone(), config.base_url.clone())),
        Arc::new(FileStore::new(&config.data_dir)),
    );
    routes::restore_saved_strategy(&state).await;

    let app = Router::new()
        .route(
            "/api/strategy",
            post(routes::generate_strategy)
                .get(routes::get_strategy)
                .delete(routes::clear_strategy),
        )
        .route("/api/strategy/save", post(routes::save_strategy))
        .route("/api/strategy/monetization", post(routes::generate_monetization))
        .route("/api/toasts", get(routes::list_toasts))
        .route("/api/toasts/:id", delete(routes::dismiss_toast))
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!(%addr, "Starting server");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
