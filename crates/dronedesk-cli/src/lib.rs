//! DroneDesk CLI - client library and the `dronedesk` binary.

pub mod client;

pub use client::{CommandOutcome, DeskClient, PlanRow, PlanState};
