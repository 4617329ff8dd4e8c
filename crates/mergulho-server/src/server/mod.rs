//! HTTP server.

mod error;
mod html;
mod negotiate;
mod params;
mod sightings;
mod telemetry;

use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::routing::{get, post};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::info;
use url::Url;

use mergulho_core::DocumentStore;

pub use error::ApiError;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    /// Base URL sighting images are served under, if any.
    pub image_base_url: Option<Url>,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            image_base_url: None,
        }
    }

    pub fn with_image_base_url(mut self, base: Url) -> Self {
        self.image_base_url = Some(base);
        self
    }

    /// Public URL of a sighting's photo: `{base}/imagens/{registro}.jpg`.
    pub fn image_url(&self, registro: &str) -> Option<String> {
        let mut url = self.image_base_url.clone()?;
        url.path_segments_mut()
            .ok()?
            .pop_if_empty()
            .extend(["imagens", &format!("{}.jpg", registro)]);
        Some(url.into())
    }
}

async fn root() -> Json<Value> {
    Json(json!({ "message": "Virtual Diving API" }))
}

async fn healthy() -> &'static str {
    "OK"
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/-/healthy", get(healthy))
        .route("/avistamentos", get(sightings::list))
        .route(
            "/avistamentos/:registro",
            get(sightings::view)
                .put(sightings::update)
                .post(sightings::submit)
                .delete(sightings::delete),
        )
        .route("/avistamentos/:registro/edit", get(sightings::edit_form))
        .route("/avistamentos/:registro/delete", post(sightings::delete_form))
        .route("/telemetria", get(telemetry::list))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the API until SIGINT or SIGTERM.
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    info!(addr = %listener.local_addr()?, "Starting HTTP server");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down gracefully");
    Ok(())
}

/// Wait for SIGINT (Ctrl+C) or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT, starting graceful shutdown"),
        _ = terminate => info!("Received SIGTERM, starting graceful shutdown"),
    }
}
