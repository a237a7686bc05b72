//! DroneDesk Server - back office for flight planning and fleet records

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dronedesk_server::api;
use dronedesk_server::config::Config;
use dronedesk_server::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env();

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive("dronedesk_server=debug".parse()?);
    let json_layer = config
        .log_json
        .then(|| tracing_subscriber::fmt::layer().json());
    let text_layer = (!config.log_json).then(tracing_subscriber::fmt::layer);
    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .init();

    tracing::info!("Starting DroneDesk Server...");

    let port = config.server_port;
    let state = Arc::new(AppState::new(config));

    // Build the app
    let app = api::routes()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Run server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
