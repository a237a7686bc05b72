pub mod store;

pub use store::{AppState, PlannerSnapshot, StoreError};
