//! API routes for the DroneDesk server.

pub mod error;
pub mod flights;
pub mod pilots;
pub mod request_id;
mod routes;
pub mod session;

use crate::state::AppState;
use axum::Router;

pub fn routes() -> Router<std::sync::Arc<AppState>> {
    routes::create_router()
}
