//! REST API routes.

use axum::{
    extract::{Query, State},
    middleware,
    routing::{delete, get, post},
    Extension, Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::api::{flights, pilots, request_id, session};
use crate::state::AppState;
use dronedesk_core::nav::{teams, Team};
use dronedesk_core::views::{InventoryRow, NewsEntry};
use dronedesk_core::{
    drone_choices, nav_items, DashboardSummary, DroneChoice, InventoryQuery, NavItem,
    OperationType, Session, UpdateType,
};

/// Create the API router.
pub fn create_router() -> Router<Arc<AppState>> {
    let catalog_routes = Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/v1/session/nav", get(get_nav))
        .route("/v1/dashboard", get(get_dashboard))
        .route("/v1/drones", get(list_drones))
        .route("/v1/inventory", get(list_inventory))
        .route("/v1/news", get(list_news));

    let flight_routes = Router::new()
        .route(
            "/v1/flight-plans",
            get(flights::list_flight_plans).post(flights::create_flight_plan),
        )
        .route(
            "/v1/flight-plans/:id",
            get(flights::get_flight_plan).put(flights::update_flight_plan),
        )
        .route("/v1/flight-plans/:id/view", get(flights::get_stage_view))
        .route("/v1/flight-plans/:id/points", post(flights::add_map_point))
        .route("/v1/flight-plans/:id/wizard/next", post(flights::wizard_next))
        .route(
            "/v1/flight-plans/:id/wizard/previous",
            post(flights::wizard_previous),
        )
        .route("/v1/flight-plans/:id/commands", post(flights::apply_command))
        .route(
            "/v1/flight-plans/:id/checklist",
            post(flights::set_checklist_item),
        )
        .route("/v1/flight-plans/:id/completion", post(flights::complete_flight));

    let pilot_routes = Router::new()
        .route("/v1/pilots", get(pilots::list_pilots).post(pilots::add_pilot))
        .route("/v1/pilots/:id", delete(pilots::remove_pilot));

    catalog_routes
        .merge(flight_routes)
        .merge(pilot_routes)
        .layer(middleware::from_fn(session::resolve_session))
        .layer(middleware::from_fn(request_id::ensure_request_id))
}

// === Request/Response types ===

#[derive(Debug, Default, Deserialize)]
pub struct DroneQuery {
    /// Mark drones compatible with this operation category
    pub operation_type: Option<OperationType>,
}

#[derive(Debug, Default, Deserialize)]
pub struct NewsQuery {
    #[serde(rename = "type")]
    pub update_type: Option<UpdateType>,
}

#[derive(Debug, serde::Serialize)]
pub struct NavResponse {
    pub session: Session,
    pub teams: Vec<Team>,
    pub items: Vec<NavItem>,
}

// === Handlers ===

async fn get_nav(Extension(session): Extension<Session>) -> Json<NavResponse> {
    Json(NavResponse {
        items: nav_items(&session),
        teams: teams(),
        session,
    })
}

async fn get_dashboard(State(state): State<Arc<AppState>>) -> Json<DashboardSummary> {
    Json(state.dashboard())
}

async fn list_drones(Query(query): Query<DroneQuery>) -> Json<Vec<DroneChoice>> {
    Json(drone_choices(query.operation_type))
}

async fn list_inventory(
    State(state): State<Arc<AppState>>,
    Query(query): Query<InventoryQuery>,
) -> Json<Vec<InventoryRow>> {
    Json(state.inventory(&query))
}

async fn list_news(
    State(state): State<Arc<AppState>>,
    Query(query): Query<NewsQuery>,
) -> Json<Vec<NewsEntry>> {
    Json(state.news(query.update_type))
}
