pub mod classify;
pub mod drones;
pub mod error;
pub mod lifecycle;
pub mod models;
pub mod nav;
pub mod rules;
pub mod seed;
pub mod validation;
pub mod views;

pub use classify::{
    certification_status, classify_certification_days, classify_inspection_days, days_until,
    BadgeVariant, CertificationStatus, InspectionUrgency,
};
pub use drones::{drone_choices, is_compatible, is_drone_compatible, DroneChoice};
pub use error::{ClassifyError, LifecycleError, Violation};
pub use lifecycle::{FlightPlanner, PlanCommand, PlanPatch, StageView, StepContent, WizardStep};
pub use models::{
    Certification, CertificationType, Drone, FlightPlan, FlightStage, InventoryCategory,
    InventoryItem, MapMode, MapPoint, NewsUpdate, OperationType, Pilot, Priority, ReviewOutcome,
    UpdateType,
};
pub use nav::{nav_items, NavItem, Role, Session};
pub use rules::ClassifierRules;
pub use views::{
    dashboard_summary, filter_plans, list_inventory, news_feed, DashboardSummary, InventoryQuery,
    NewPilot, PilotRoster, PilotRow, ReviewRow, ReviewStatus,
};
