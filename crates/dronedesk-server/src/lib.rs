//! DroneDesk server library: REST surface over the shared plan store.

pub mod api;
pub mod config;
pub mod state;
