//! orgchart-console - Admin console for the org chart backend
//!
//! Lists, creates and edits teams and employees through the backend REST API
//! and renders reporting hierarchies. Serves the console as HTML.

pub mod api;
pub mod config;
pub mod console;
pub mod error;
pub mod forms;
pub mod io;
pub mod model;
pub mod render;
pub mod store;
pub mod tree;

pub use config::{load_config, Config};
pub use error::{ConsoleError, Result};

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::api::OrgChartApi;
use crate::console::ConsoleState;
use crate::io::ReqwestHttpClient;

/// Build an API client backed by reqwest
pub fn connect(config: &Config) -> Arc<OrgChartApi> {
    let http: Arc<dyn io::HttpClient> = Arc::new(ReqwestHttpClient::new());
    Arc::new(OrgChartApi::new(&config.api.base_url, http))
}

/// Run the console web server until ctrl-c
pub async fn run(config: Config) -> Result<()> {
    let api = connect(&config);
    let state = ConsoleState::new(api);
    let cancel = CancellationToken::new();

    let cancel_for_signal = cancel.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => tracing::info!("Shutdown signal received"),
            Err(e) => tracing::error!("Failed to listen for ctrl-c: {}", e),
        }
        cancel_for_signal.cancel();
    });

    serve(&config, state, cancel).await
}

/// Serve the console router until the token is cancelled
pub async fn serve(config: &Config, state: ConsoleState, cancel: CancellationToken) -> Result<()> {
    let addr = format!("{}:{}", config.console.bind_address, config.console.port);
    let listener = tokio::net::TcpListener::bind(&addr).await.map_err(|e| {
        ConsoleError::Config(format!("Failed to bind console to {}: {}", addr, e))
    })?;
    tracing::info!(
        "Console listening on http://{} (backend {})",
        addr,
        config.api.base_url
    );

    let router = console::build_router(state);
    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            cancel.cancelled().await;
        })
        .await?;

    tracing::info!("Console stopped");
    Ok(())
}
