//! In-memory record store using DashMap.
//!
//! Every view reads and writes flight plans through this store, so the review
//! queue and the planner always see the same record.

use chrono::{NaiveDate, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::Serialize;
use std::sync::{PoisonError, RwLock};
use thiserror::Error;

use dronedesk_core::lifecycle::new_plan_id;
use dronedesk_core::models::{FlightPlan, InventoryItem, NewsUpdate, Pilot, UpdateType};
use dronedesk_core::views::{InventoryRow, NewsEntry};
use dronedesk_core::{
    dashboard_summary, list_inventory, news_feed, seed, ClassifierRules, DashboardSummary,
    FlightPlanner, InventoryQuery, LifecycleError, NewPilot, PilotRoster, PilotRow, PlanPatch,
    Role, Violation, WizardStep,
};

use crate::config::Config;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("flight plan '{0}' not found")]
    NotFound(String),

    #[error("version conflict: expected {expected}, record is at {actual}")]
    VersionConflict { expected: u64, actual: u64 },

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
}

/// Planner state as returned to clients.
#[derive(Debug, Clone, Serialize)]
pub struct PlannerSnapshot {
    pub plan: FlightPlan,
    pub step: WizardStep,
    pub step_index: usize,
    pub step_title: &'static str,
    pub progress_percent: f64,
}

impl From<&FlightPlanner> for PlannerSnapshot {
    fn from(planner: &FlightPlanner) -> Self {
        Self {
            plan: planner.plan().clone(),
            step: planner.step(),
            step_index: planner.step().index(),
            step_title: planner.step().title(),
            progress_percent: planner.stage().progress_percent(),
        }
    }
}

/// Application state - the single writer for every record.
pub struct AppState {
    config: Config,
    plans: DashMap<String, FlightPlanner>,
    pilots: RwLock<PilotRoster>,
    inventory: Vec<InventoryItem>,
    news: Vec<NewsUpdate>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let state = Self {
            plans: DashMap::new(),
            pilots: RwLock::new(PilotRoster::default()),
            inventory: if config.seed_data { seed::inventory() } else { Vec::new() },
            news: if config.seed_data { seed::news() } else { Vec::new() },
            config,
        };

        if state.config.seed_data {
            for plan in seed::flight_plans() {
                state.insert_plan(plan);
            }
            *state.pilots.write().unwrap_or_else(PoisonError::into_inner) =
                PilotRoster::new(seed::pilots());
            tracing::info!(
                "Seeded {} flight plans, {} inventory items, {} news updates",
                state.plans.len(),
                state.inventory.len(),
                state.news.len()
            );
        }

        state
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn rules(&self) -> &ClassifierRules {
        &self.config.classifier_rules
    }

    pub fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }

    /// Store a plan under its own id, or a fresh one if it has none. A
    /// generated id that is already taken is drawn again.
    fn insert_plan(&self, plan: FlightPlan) -> String {
        self.insert_plan_with(plan, new_plan_id)
    }

    fn insert_plan_with(&self, plan: FlightPlan, mut next_id: impl FnMut() -> String) -> String {
        let (mut id, generated) = match plan.id.clone() {
            Some(id) => (id, false),
            None => (next_id(), true),
        };
        loop {
            match self.plans.entry(id.clone()) {
                Entry::Occupied(_) if generated => {
                    tracing::warn!("Flight plan id {} already taken, drawing another", id);
                    id = next_id();
                }
                Entry::Occupied(mut slot) => {
                    slot.insert(planner_for(plan, &id));
                    return id;
                }
                Entry::Vacant(slot) => {
                    slot.insert(planner_for(plan, &id));
                    return id;
                }
            }
        }
    }

    // ========== FLIGHT PLANS ==========

    /// Create a draft plan from the initial form values.
    pub fn create_plan(&self, role: Role, draft: PlanPatch) -> Result<PlannerSnapshot, StoreError> {
        let mut planner = FlightPlanner::new();
        planner.update(role, draft)?;
        let id = self.insert_plan(planner.into_plan());
        tracing::info!("Created flight plan {}", id);
        self.get_plan(&id).ok_or(StoreError::NotFound(id))
    }

    pub fn get_plan(&self, id: &str) -> Option<PlannerSnapshot> {
        self.plans.get(id).map(|planner| PlannerSnapshot::from(planner.value()))
    }

    pub fn read_plan<T>(&self, id: &str, f: impl FnOnce(&FlightPlanner) -> T) -> Option<T> {
        self.plans.get(id).map(|planner| f(planner.value()))
    }

    /// All plans ordered by id.
    pub fn list_plans(&self) -> Vec<FlightPlan> {
        let mut plans: Vec<FlightPlan> = self
            .plans
            .iter()
            .map(|entry| entry.value().plan().clone())
            .collect();
        plans.sort_by(|a, b| a.id.cmp(&b.id));
        plans
    }

    /// Run a mutation against one plan under its entry lock. A stale
    /// `expected_version` is rejected before the mutation runs.
    pub fn mutate_plan<T>(
        &self,
        id: &str,
        expected_version: Option<u64>,
        f: impl FnOnce(&mut FlightPlanner) -> Result<T, LifecycleError>,
    ) -> Result<(T, PlannerSnapshot), StoreError> {
        let mut entry = self
            .plans
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        let planner = entry.value_mut();

        if let Some(expected) = expected_version {
            let actual = planner.plan().version;
            if expected != actual {
                return Err(StoreError::VersionConflict { expected, actual });
            }
        }

        let output = f(planner)?;
        Ok((output, PlannerSnapshot::from(&*planner)))
    }

    // ========== PILOTS ==========

    pub fn list_pilots(&self, term: &str) -> Vec<PilotRow> {
        let today = self.today();
        let roster = self.pilots.read().unwrap_or_else(PoisonError::into_inner);
        roster
            .search(term)
            .into_iter()
            .map(|pilot| PilotRow::new(pilot, today, self.rules()))
            .collect()
    }

    pub fn add_pilot(&self, new_pilot: NewPilot) -> Result<Pilot, Vec<Violation>> {
        let mut roster = self.pilots.write().unwrap_or_else(PoisonError::into_inner);
        let pilot = roster.add(new_pilot, Utc::now())?;
        tracing::info!("Added pilot '{}' ({})", pilot.name, pilot.id);
        Ok(pilot)
    }

    pub fn remove_pilot(&self, id: &str) -> bool {
        let mut roster = self.pilots.write().unwrap_or_else(PoisonError::into_inner);
        roster.remove(id)
    }

    // ========== CATALOG ==========

    pub fn inventory(&self, query: &InventoryQuery) -> Vec<InventoryRow> {
        list_inventory(&self.inventory, query, self.rules())
    }

    pub fn news(&self, filter: Option<UpdateType>) -> Vec<NewsEntry> {
        news_feed(&self.news, filter)
    }

    pub fn dashboard(&self) -> DashboardSummary {
        let plans = self.list_plans();
        let roster = self.pilots.read().unwrap_or_else(PoisonError::into_inner);
        dashboard_summary(&plans, roster.pilots(), &self.inventory, self.today(), self.rules())
    }
}

fn planner_for(plan: FlightPlan, id: &str) -> FlightPlanner {
    let plan = FlightPlan {
        id: Some(id.to_string()),
        ..plan
    };
    FlightPlanner::from_plan(plan).with_on_save(|plan| {
        tracing::debug!(
            flight_id = plan.id.as_deref().unwrap_or("-"),
            stage = %plan.status,
            version = plan.version,
            "Committed flight plan"
        );
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use dronedesk_core::{FlightStage, PlanCommand};

    fn state() -> AppState {
        AppState::new(Config::default())
    }

    #[test]
    fn seeds_load_on_startup() {
        let state = state();
        assert_eq!(state.list_plans().len(), 5);
        assert_eq!(state.list_pilots("").len(), 2);
        assert_eq!(state.news(None).len(), 5);
    }

    #[test]
    fn unseeded_store_is_empty() {
        let state = AppState::new(Config {
            seed_data: false,
            ..Config::default()
        });
        assert!(state.list_plans().is_empty());
        assert!(state.list_pilots("").is_empty());
        assert!(state.inventory(&InventoryQuery::default()).is_empty());
    }

    #[test]
    fn approval_is_visible_to_every_reader() {
        let state = state();
        state
            .mutate_plan("FP001", None, |planner| {
                planner.apply(
                    Role::Admin,
                    PlanCommand::Approve {
                        feedback: Some("Cleared".to_string()),
                    },
                )
            })
            .unwrap();

        let plan = state
            .list_plans()
            .into_iter()
            .find(|plan| plan.id.as_deref() == Some("FP001"))
            .unwrap();
        assert_eq!(plan.status, FlightStage::Reviewed);
        assert_eq!(plan.admin_feedback, "Cleared");
        assert_eq!(state.get_plan("FP001").unwrap().plan.version, 1);
    }

    #[test]
    fn stale_version_is_rejected() {
        let state = state();
        let err = state
            .mutate_plan("FP005", Some(7), |planner| planner.next_step())
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::VersionConflict {
                expected: 7,
                actual: 0
            }
        ));
        assert_eq!(state.get_plan("FP005").unwrap().step, WizardStep::FlightDetails);
    }

    #[test]
    fn created_plans_get_ids() {
        let state = state();
        let snapshot = state
            .create_plan(
                Role::Pilot,
                PlanPatch {
                    pilot_name: Some("Ava Chen".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        let id = snapshot.plan.id.unwrap();
        assert!(id.starts_with("FP-"));
        assert!(state.get_plan(&id).is_some());
        assert_eq!(state.list_plans().len(), 6);
    }

    #[test]
    fn generated_id_collision_draws_again() {
        let state = state();
        let mut ids = vec!["FP-0000BEEF".to_string(), "FP001".to_string()];
        let id = state.insert_plan_with(FlightPlan::default(), || ids.pop().unwrap());

        assert_eq!(id, "FP-0000BEEF");
        assert_eq!(state.list_plans().len(), 6);
        let seeded = state.get_plan("FP001").unwrap();
        assert_eq!(seeded.plan.pilot_name.as_deref(), Some("John Doe"));
    }

    #[test]
    fn missing_plan_is_not_found() {
        let state = state();
        let err = state
            .mutate_plan("FP999", None, |planner| planner.next_step())
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(id) if id == "FP999"));
    }
}
