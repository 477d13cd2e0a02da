use axum::{routing::any, Router};
use tokio::net::TcpListener;

use crate::config::Config;
use crate::errors::WikiError;
use crate::handlers::{handle_edit, handle_not_found, handle_root, handle_save, handle_view};
use crate::types::AppState;

/// Bind every wiki path to its handler
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", any(handle_root))
        .route("/view/*title", any(handle_view))
        .route("/edit/*title", any(handle_edit))
        .route("/save/*title", any(handle_save))
        .fallback(handle_not_found)
        .with_state(state)
}

/// Serve the wiki until the process is stopped
pub async fn run(config: Config) -> Result<(), WikiError> {
    let state = AppState::from_config(&config)?;
    let app = build_router(state);

    let addr = config.socket_addr();
    let listener = TcpListener::bind(addr).await?;
    log::info!("Wiki listening on http://{}, pages in {:?}", addr, config.data_dir);
    axum::serve(listener, app).await.map_err(WikiError::from)
}
