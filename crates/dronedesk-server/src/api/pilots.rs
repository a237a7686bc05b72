//! Pilot roster endpoints. Changes to the roster need the admin role.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use std::sync::Arc;

use crate::api::error::ApiError;
use crate::api::flights::SearchQuery;
use crate::state::AppState;
use dronedesk_core::{LifecycleError, NewPilot, Pilot, PilotRow, Session};

fn require_admin(session: &Session, action: &'static str) -> Result<(), ApiError> {
    if session.role.is_admin() {
        Ok(())
    } else {
        Err(LifecycleError::Forbidden {
            action,
            role: session.role,
        }
        .into())
    }
}

/// Roster rows with certification badges, filtered by name or email.
pub async fn list_pilots(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Json<Vec<PilotRow>> {
    Json(state.list_pilots(&query.q))
}

pub async fn add_pilot(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Json(new_pilot): Json<NewPilot>,
) -> Result<(StatusCode, Json<Pilot>), ApiError> {
    require_admin(&session, "adding pilots")?;
    let pilot = state.add_pilot(new_pilot).map_err(ApiError::Invalid)?;
    Ok((StatusCode::CREATED, Json(pilot)))
}

pub async fn remove_pilot(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    require_admin(&session, "removing pilots")?;
    if state.remove_pilot(&id) {
        tracing::info!("Removed pilot {}", id);
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("pilot '{}' not found", id)))
    }
}
