use std::sync::Arc;

use axum::{routing::get, Router};
use log::*;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

use crate::services::geocoding::GeocodingService;

mod error;
pub mod geocode;

#[derive(Clone)]
pub struct AppState {
    geocoder: Arc<dyn GeocodingService>,
}

pub fn router(geocoder: Arc<dyn GeocodingService>) -> Router {
    Router::new()
        .route("/geocode", get(geocode::geocode))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(AppState { geocoder })
}

pub async fn serve(port: u16, router: Router) -> std::io::Result<()> {
    let listener = TcpListener::bind(("0.0.0.0", port)).await?;
    info!("Server running on port {}", port);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(why) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", why);
        return;
    }
    info!("Shutting down.");
}
