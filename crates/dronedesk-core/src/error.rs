//! Error types for lifecycle transitions and classifiers.

use serde::Serialize;
use thiserror::Error;

use crate::models::FlightStage;
use crate::nav::Role;

/// A single failed field check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub field: &'static str,
    pub message: String,
}

impl Violation {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Rejections raised by the flight-plan lifecycle. A rejected operation never
/// mutates the plan.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LifecycleError {
    #[error("{action} is not available to the {role} role")]
    Forbidden { action: &'static str, role: Role },

    #[error("cannot {command} while the plan is {from}")]
    InvalidTransition {
        from: FlightStage,
        command: &'static str,
    },

    #[error("submitted plans advance only through an admin review")]
    ReviewRequired,

    #[error("changes were requested; resubmit before advancing")]
    ChangesRequested,

    #[error("resubmission needs admin feedback to respond to")]
    FeedbackRequired,

    #[error("the flight is completed")]
    Terminal,

    #[error("field '{field}' is not editable in the current stage")]
    Locked { field: &'static str },

    #[error("unknown checklist item '{0}'")]
    UnknownChecklistItem(String),

    #[error("flight plan failed validation ({} violation(s))", .0.len())]
    Invalid(Vec<Violation>),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassifyError {
    #[error("invalid date '{0}'")]
    InvalidDate(String),
}
