//! Flight-plan API endpoints.
//!
//! Every mutation goes through [`AppState::mutate_plan`], so the planner and
//! the review queue operate on the same record.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::error::ApiError;
use crate::state::{AppState, PlannerSnapshot};
use dronedesk_core::{
    filter_plans, FlightStage, MapPoint, PlanCommand, PlanPatch, ReviewRow, Session, StageView,
};

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// Form edit with an optional optimistic-concurrency guard.
#[derive(Debug, Deserialize)]
pub struct UpdateRequest {
    #[serde(default)]
    pub expected_version: Option<u64>,
    #[serde(flatten)]
    pub patch: PlanPatch,
}

#[derive(Debug, Deserialize)]
pub struct PointRequest {
    #[serde(default)]
    pub expected_version: Option<u64>,
    #[serde(flatten)]
    pub point: MapPoint,
}

#[derive(Debug, Deserialize)]
pub struct CommandRequest {
    #[serde(default)]
    pub expected_version: Option<u64>,
    #[serde(flatten)]
    pub command: PlanCommand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChecklistKind {
    PreFlight,
    PostFlight,
}

#[derive(Debug, Deserialize)]
pub struct ChecklistRequest {
    #[serde(default)]
    pub expected_version: Option<u64>,
    pub list: ChecklistKind,
    pub item: String,
    pub checked: bool,
}

#[derive(Debug, Serialize)]
pub struct PointResponse {
    pub point_count: usize,
    #[serde(flatten)]
    pub planner: PlannerSnapshot,
}

#[derive(Debug, Serialize)]
pub struct CommandResponse {
    pub stage: FlightStage,
    #[serde(flatten)]
    pub planner: PlannerSnapshot,
}

/// Review queue, optionally filtered by pilot name or plan id.
pub async fn list_flight_plans(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Json<Vec<ReviewRow>> {
    let plans = state.list_plans();
    let rows = filter_plans(&plans, &query.q)
        .into_iter()
        .map(ReviewRow::from)
        .collect();
    Json(rows)
}

/// Start a new draft from the initial form values.
pub async fn create_flight_plan(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Json(draft): Json<PlanPatch>,
) -> Result<(StatusCode, Json<PlannerSnapshot>), ApiError> {
    let snapshot = state.create_plan(session.role, draft)?;
    Ok((StatusCode::CREATED, Json(snapshot)))
}

pub async fn get_flight_plan(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<PlannerSnapshot>, ApiError> {
    state
        .get_plan(&id)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("flight plan '{}' not found", id)))
}

pub async fn update_flight_plan(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Path(id): Path<String>,
    Json(req): Json<UpdateRequest>,
) -> Result<Json<PlannerSnapshot>, ApiError> {
    let ((), snapshot) = state.mutate_plan(&id, req.expected_version, |planner| {
        planner.update(session.role, req.patch)
    })?;
    Ok(Json(snapshot))
}

/// Stage-specific content as the session sees it.
pub async fn get_stage_view(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Path(id): Path<String>,
) -> Result<Json<StageView>, ApiError> {
    state
        .read_plan(&id, |planner| planner.view(session.role))
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("flight plan '{}' not found", id)))
}

pub async fn add_map_point(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<PointRequest>,
) -> Result<(StatusCode, Json<PointResponse>), ApiError> {
    let (point_count, planner) = state.mutate_plan(&id, req.expected_version, |planner| {
        planner.add_map_point(req.point)
    })?;
    Ok((StatusCode::CREATED, Json(PointResponse { point_count, planner })))
}

/// Next wizard page; on Review & Submit this submits the plan.
pub async fn wizard_next(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<CommandResponse>, ApiError> {
    let (stage, planner) = state.mutate_plan(&id, None, |planner| planner.next_step())?;
    if stage == FlightStage::Submitted {
        tracing::info!("Flight plan {} submitted for review", id);
    }
    Ok(Json(CommandResponse { stage, planner }))
}

pub async fn wizard_previous(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<PlannerSnapshot>, ApiError> {
    let (_, snapshot) = state.mutate_plan(&id, None, |planner| planner.previous_step())?;
    Ok(Json(snapshot))
}

pub async fn apply_command(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Path(id): Path<String>,
    Json(req): Json<CommandRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command_name = req.command.name();
    let (stage, planner) = state.mutate_plan(&id, req.expected_version, |planner| {
        planner.apply(session.role, req.command)
    })?;
    tracing::info!(
        role = %session.role,
        "Flight plan {} {} -> {}",
        id,
        command_name,
        stage
    );
    Ok(Json(CommandResponse { stage, planner }))
}

pub async fn set_checklist_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<ChecklistRequest>,
) -> Result<Json<PlannerSnapshot>, ApiError> {
    let ChecklistRequest {
        expected_version,
        list,
        item,
        checked,
    } = req;
    let ((), snapshot) = state.mutate_plan(&id, expected_version, |planner| match list {
        ChecklistKind::PreFlight => planner.set_pre_flight_item(&item, checked),
        ChecklistKind::PostFlight => planner.set_post_flight_item(&item, checked),
    })?;
    Ok(Json(snapshot))
}

/// Record the post-flight actuals and sign the flight off. A rejected
/// sign-off leaves the record and its version untouched.
pub async fn complete_flight(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Path(id): Path<String>,
    Json(req): Json<UpdateRequest>,
) -> Result<Json<PlannerSnapshot>, ApiError> {
    let ((), snapshot) = state.mutate_plan(&id, req.expected_version, |planner| {
        planner.sign_off_with(session.role, req.patch)
    })?;
    tracing::info!("Flight plan {} signed off", id);
    Ok(Json(snapshot))
}
