//! Error responses for the REST API.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::state::StoreError;
use dronedesk_core::{LifecycleError, Violation};

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    Store(StoreError),
    Invalid(Vec<Violation>),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Store(err)
    }
}

impl From<LifecycleError> for ApiError {
    fn from(err: LifecycleError) -> Self {
        ApiError::Store(StoreError::Lifecycle(err))
    }
}

fn lifecycle_status(err: &LifecycleError) -> StatusCode {
    match err {
        LifecycleError::Forbidden { .. } => StatusCode::FORBIDDEN,
        LifecycleError::Invalid(_)
        | LifecycleError::FeedbackRequired
        | LifecycleError::Locked { .. }
        | LifecycleError::UnknownChecklistItem(_) => StatusCode::UNPROCESSABLE_ENTITY,
        LifecycleError::InvalidTransition { .. }
        | LifecycleError::ReviewRequired
        | LifecycleError::ChangesRequested
        | LifecycleError::Terminal => StatusCode::CONFLICT,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, violations) = match self {
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message, None),
            ApiError::Invalid(violations) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                format!("{} field(s) failed validation", violations.len()),
                Some(violations),
            ),
            ApiError::Store(err) => {
                let status = match &err {
                    StoreError::NotFound(_) => StatusCode::NOT_FOUND,
                    StoreError::VersionConflict { .. } => StatusCode::CONFLICT,
                    StoreError::Lifecycle(inner) => lifecycle_status(inner),
                };
                let violations = match &err {
                    StoreError::Lifecycle(LifecycleError::Invalid(violations)) => {
                        Some(violations.clone())
                    }
                    _ => None,
                };
                (status, err.to_string(), violations)
            }
        };

        if status.is_client_error() {
            tracing::debug!(status = status.as_u16(), "Request rejected: {}", message);
        }

        let body = match violations {
            Some(violations) => json!({ "error": message, "violations": violations }),
            None => json!({ "error": message }),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dronedesk_core::{FlightStage, Role};

    #[test]
    fn lifecycle_errors_map_to_statuses() {
        let forbidden = LifecycleError::Forbidden {
            action: "approve",
            role: Role::Pilot,
        };
        assert_eq!(lifecycle_status(&forbidden), StatusCode::FORBIDDEN);
        assert_eq!(
            lifecycle_status(&LifecycleError::ReviewRequired),
            StatusCode::CONFLICT
        );
        assert_eq!(
            lifecycle_status(&LifecycleError::InvalidTransition {
                from: FlightStage::Planning,
                command: "approve",
            }),
            StatusCode::CONFLICT
        );
        assert_eq!(
            lifecycle_status(&LifecycleError::Locked { field: "date" }),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn version_conflict_is_409() {
        let response =
            ApiError::from(StoreError::VersionConflict { expected: 1, actual: 2 }).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
