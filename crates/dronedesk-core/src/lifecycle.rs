//! Flight-plan lifecycle state machine.
//!
//! A plan moves Planning → Submitted → Reviewed → Pre-Flight → Completed.
//! While in Planning, a four-step wizard tracks which page of the form is
//! active. `FlightPlanner` owns one plan, applies commands to it and invokes
//! the commit hook after every accepted change so the owner of the record
//! always sees the latest state.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::drones::{self, DroneChoice};
use crate::error::LifecycleError;
use crate::models::{FlightPlan, FlightStage, MapMode, MapPoint, OperationType, ReviewOutcome};
use crate::nav::Role;
use crate::validation;

pub const PRE_FLIGHT_ITEMS: [&str; 5] = [
    "Drone inspection",
    "Battery check",
    "Weather conditions",
    "Area clearance",
    "Communication check",
];

pub const INCIDENT_ITEM: &str = "Incident occurred";

pub const POST_FLIGHT_ITEMS: [&str; 6] = [
    "Drone landed safely",
    "No damage to equipment",
    "Flight data recorded",
    "Battery level checked",
    "Area cleared",
    INCIDENT_ITEM,
];

pub const AREA_ADVICE: [&str; 3] = [
    "Avoid flying near airports or restricted zones",
    "Check for temporary flight restrictions",
    "Be aware of local privacy laws and regulations",
];

/// Generate an identifier for a new flight plan.
pub fn new_plan_id() -> String {
    format!("FP-{}", uuid::Uuid::new_v4().simple().to_string()[..8].to_uppercase())
}

/// Page of the planning wizard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    #[default]
    FlightDetails,
    AreaPlanning,
    PreFlightChecks,
    ReviewAndSubmit,
}

impl WizardStep {
    pub const ALL: [WizardStep; 4] = [
        WizardStep::FlightDetails,
        WizardStep::AreaPlanning,
        WizardStep::PreFlightChecks,
        WizardStep::ReviewAndSubmit,
    ];

    pub const LAST: WizardStep = WizardStep::ReviewAndSubmit;

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn title(self) -> &'static str {
        match self {
            WizardStep::FlightDetails => "Flight Details",
            WizardStep::AreaPlanning => "Area Planning",
            WizardStep::PreFlightChecks => "Pre-Flight Checks",
            WizardStep::ReviewAndSubmit => "Review & Submit",
        }
    }

    fn forward(self) -> Option<WizardStep> {
        WizardStep::ALL.get(self.index() + 1).copied()
    }

    fn back(self) -> WizardStep {
        self.index()
            .checked_sub(1)
            .map(|index| WizardStep::ALL[index])
            .unwrap_or(WizardStep::FlightDetails)
    }
}

/// Lifecycle command applied to a plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum PlanCommand {
    Submit,
    Approve {
        #[serde(default)]
        feedback: Option<String>,
    },
    RequestChanges {
        #[serde(default)]
        feedback: Option<String>,
    },
    /// Review-queue spelling of `RequestChanges`
    Reject {
        #[serde(default)]
        feedback: Option<String>,
    },
    Resubmit,
    AdvanceStage,
}

impl PlanCommand {
    pub fn name(&self) -> &'static str {
        match self {
            PlanCommand::Submit => "submit",
            PlanCommand::Approve { .. } => "approve",
            PlanCommand::RequestChanges { .. } => "request changes",
            PlanCommand::Reject { .. } => "reject",
            PlanCommand::Resubmit => "resubmit",
            PlanCommand::AdvanceStage => "advance stage",
        }
    }
}

/// Partial edit of a plan's form fields. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlanPatch {
    pub pilot_name: Option<String>,
    pub location: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub duration: Option<String>,
    pub operation_type: Option<OperationType>,
    pub drone_type: Option<String>,
    pub operation_description: Option<String>,
    pub map_mode: Option<MapMode>,
    pub is_populated_area: Option<bool>,
    #[serde(rename = "hasNonRGBSensors")]
    pub has_non_rgb_sensors: Option<bool>,
    pub is_over_property: Option<bool>,
    pub admin_feedback: Option<String>,
    pub actual_time: Option<String>,
    pub actual_duration: Option<String>,
    pub incident_report: Option<String>,
}

impl PlanPatch {
    fn planning_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        let mut touch = |set: bool, name: &'static str| {
            if set {
                fields.push(name);
            }
        };
        touch(self.pilot_name.is_some(), "pilotName");
        touch(self.location.is_some(), "location");
        touch(self.date.is_some(), "date");
        touch(self.time.is_some(), "time");
        touch(self.duration.is_some(), "duration");
        touch(self.operation_type.is_some(), "operationType");
        touch(self.drone_type.is_some(), "droneType");
        touch(self.operation_description.is_some(), "operationDescription");
        touch(self.map_mode.is_some(), "mapMode");
        touch(self.is_populated_area.is_some(), "isPopulatedArea");
        touch(self.has_non_rgb_sensors.is_some(), "hasNonRGBSensors");
        touch(self.is_over_property.is_some(), "isOverProperty");
        fields
    }

    fn completion_fields(&self) -> Vec<&'static str> {
        [
            (self.actual_time.is_some(), "actualTime"),
            (self.actual_duration.is_some(), "actualDuration"),
            (self.incident_report.is_some(), "incidentReport"),
        ]
        .into_iter()
        .filter_map(|(set, name)| set.then_some(name))
        .collect()
    }
}

pub type SaveHook = Box<dyn Fn(&FlightPlan) + Send + Sync>;

/// Owns one flight plan and the planning wizard position.
pub struct FlightPlanner {
    plan: FlightPlan,
    step: WizardStep,
    on_save: Option<SaveHook>,
}

impl fmt::Debug for FlightPlanner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlightPlanner")
            .field("plan", &self.plan)
            .field("step", &self.step)
            .field("on_save", &self.on_save.is_some())
            .finish()
    }
}

impl Default for FlightPlanner {
    fn default() -> Self {
        Self::new()
    }
}

impl FlightPlanner {
    /// Start a blank plan on the first wizard page.
    pub fn new() -> Self {
        Self::from_plan(FlightPlan::default())
    }

    /// Open an existing plan. Plans past Planning open on the last page.
    pub fn from_plan(plan: FlightPlan) -> Self {
        let step = if plan.status == FlightStage::Planning {
            WizardStep::FlightDetails
        } else {
            WizardStep::LAST
        };
        Self {
            plan,
            step,
            on_save: None,
        }
    }

    /// Register the commit hook invoked after every accepted change.
    pub fn with_on_save(mut self, hook: impl Fn(&FlightPlan) + Send + Sync + 'static) -> Self {
        self.on_save = Some(Box::new(hook));
        self
    }

    pub fn plan(&self) -> &FlightPlan {
        &self.plan
    }

    pub fn into_plan(self) -> FlightPlan {
        self.plan
    }

    pub fn stage(&self) -> FlightStage {
        self.plan.status
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    /// Explicit save: bump the version and hand the plan to the hook.
    pub fn save(&mut self) {
        self.plan.version += 1;
        if let Some(hook) = &self.on_save {
            hook(&self.plan);
        }
    }

    /// Advance the wizard; on the last page this submits the plan.
    pub fn next_step(&mut self) -> Result<FlightStage, LifecycleError> {
        self.require_stage(FlightStage::Planning, "go to the next step")?;
        match self.step.forward() {
            Some(step) => {
                self.step = step;
                Ok(FlightStage::Planning)
            }
            None => self.submit(),
        }
    }

    /// Go back one wizard page, stopping at the first.
    pub fn previous_step(&mut self) -> Result<WizardStep, LifecycleError> {
        self.require_stage(FlightStage::Planning, "go to the previous step")?;
        self.step = self.step.back();
        Ok(self.step)
    }

    /// Apply a lifecycle command on behalf of `role`.
    pub fn apply(&mut self, role: Role, command: PlanCommand) -> Result<FlightStage, LifecycleError> {
        let from = self.plan.status;
        if from == FlightStage::Completed {
            return Err(LifecycleError::Terminal);
        }

        match (from, command) {
            (FlightStage::Planning, PlanCommand::Submit) => {
                if self.step != WizardStep::LAST {
                    return Err(LifecycleError::InvalidTransition {
                        from,
                        command: "submit before reaching Review & Submit",
                    });
                }
                self.submit()
            }
            (FlightStage::Submitted, PlanCommand::Approve { feedback }) => {
                self.review(role, "approve", ReviewOutcome::Approved, feedback)
            }
            (
                FlightStage::Submitted,
                PlanCommand::RequestChanges { feedback } | PlanCommand::Reject { feedback },
            ) => self.review(role, "request changes", ReviewOutcome::ChangesRequested, feedback),
            (FlightStage::Submitted, PlanCommand::AdvanceStage) => Err(LifecycleError::ReviewRequired),
            (FlightStage::Reviewed, PlanCommand::Resubmit) => self.resubmit(role),
            (FlightStage::Reviewed, PlanCommand::AdvanceStage) => {
                if self.plan.review_outcome != Some(ReviewOutcome::Approved) {
                    return Err(LifecycleError::ChangesRequested);
                }
                self.advance()
            }
            (FlightStage::PreFlight, PlanCommand::AdvanceStage) => self.advance(),
            (from, command) => Err(LifecycleError::InvalidTransition {
                from,
                command: command.name(),
            }),
        }
    }

    /// Apply a partial edit. Either every field in the patch is accepted or
    /// none is. A patch that touches no field leaves the version alone.
    pub fn update(&mut self, role: Role, patch: PlanPatch) -> Result<(), LifecycleError> {
        self.check_patch(role, &patch)?;
        if patch == PlanPatch::default() {
            return Ok(());
        }
        apply_patch(&mut self.plan, patch);
        self.save();
        Ok(())
    }

    fn check_patch(&self, role: Role, patch: &PlanPatch) -> Result<(), LifecycleError> {
        if let Some(field) = patch.planning_fields().into_iter().next() {
            self.require_editable(field)?;
        }
        if let Some(field) = patch.completion_fields().into_iter().next() {
            if self.plan.status != FlightStage::Completed {
                return Err(LifecycleError::Locked { field });
            }
        }
        if patch.admin_feedback.is_some() {
            if !role.is_admin() {
                return Err(LifecycleError::Forbidden {
                    action: "edit admin feedback",
                    role,
                });
            }
            if !matches!(self.plan.status, FlightStage::Submitted | FlightStage::Reviewed) {
                return Err(LifecycleError::Locked {
                    field: "adminFeedback",
                });
            }
        }
        Ok(())
    }

    /// Append a point to the route/area outline.
    pub fn add_map_point(&mut self, point: MapPoint) -> Result<usize, LifecycleError> {
        self.require_editable("mapData")?;
        self.plan.map_data.push(point);
        self.save();
        Ok(self.plan.map_data.len())
    }

    pub fn set_pre_flight_item(&mut self, item: &str, checked: bool) -> Result<(), LifecycleError> {
        self.require_stage(FlightStage::PreFlight, "update the pre-flight checklist")?;
        if !PRE_FLIGHT_ITEMS.contains(&item) {
            return Err(LifecycleError::UnknownChecklistItem(item.to_string()));
        }
        toggle(&mut self.plan.pre_flight_checklist, item, checked);
        self.save();
        Ok(())
    }

    /// Tick a post-flight item. "Incident occurred" sets the incident flag
    /// instead of joining the checklist.
    pub fn set_post_flight_item(&mut self, item: &str, checked: bool) -> Result<(), LifecycleError> {
        self.require_stage(FlightStage::Completed, "update the post-flight checklist")?;
        if !POST_FLIGHT_ITEMS.contains(&item) {
            return Err(LifecycleError::UnknownChecklistItem(item.to_string()));
        }
        if item == INCIDENT_ITEM {
            self.plan.incident_occurred = checked;
        } else {
            toggle(&mut self.plan.post_flight_checklist, item, checked);
        }
        self.save();
        Ok(())
    }

    /// Validate the post-flight record and commit it.
    pub fn sign_off(&mut self) -> Result<(), LifecycleError> {
        self.sign_off_with(Role::Pilot, PlanPatch::default())
    }

    /// Record post-flight actuals and sign off in one step. The patched
    /// record is validated before anything is committed.
    pub fn sign_off_with(&mut self, role: Role, patch: PlanPatch) -> Result<(), LifecycleError> {
        self.require_stage(FlightStage::Completed, "sign off")?;
        self.check_patch(role, &patch)?;
        let mut candidate = self.plan.clone();
        apply_patch(&mut candidate, patch);
        let violations = validation::validate_completion(&candidate);
        if !violations.is_empty() {
            return Err(LifecycleError::Invalid(violations));
        }
        self.plan = candidate;
        self.save();
        Ok(())
    }

    /// Content to present for the current stage.
    pub fn view(&self, role: Role) -> StageView {
        let plan = &self.plan;
        match plan.status {
            FlightStage::Planning => StageView::Planning {
                steps: WizardStep::ALL
                    .into_iter()
                    .map(|step| StepMarker {
                        index: step.index(),
                        title: step.title(),
                        active: step == self.step,
                    })
                    .collect(),
                content: self.step_content(role),
            },
            FlightStage::Submitted => StageView::Submitted {
                message: "Your flight plan has been submitted for approval. Please wait for admin review.",
                content: self.step_content(role),
            },
            FlightStage::Reviewed => {
                let has_feedback = !plan.admin_feedback.is_empty();
                StageView::Reviewed {
                    message: if has_feedback {
                        "Your flight plan has been reviewed. Please check the admin feedback."
                    } else {
                        "Your flight plan has been reviewed. You may proceed with the pre-flight checklist."
                    },
                    outcome: plan.review_outcome,
                    admin_feedback: has_feedback.then(|| plan.admin_feedback.clone()),
                    can_resubmit: has_feedback && !role.is_admin(),
                    content: self.step_content(role),
                }
            }
            FlightStage::PreFlight => StageView::PreFlight {
                checklist: PRE_FLIGHT_ITEMS
                    .into_iter()
                    .map(|item| ChecklistEntry {
                        item,
                        done: plan.pre_flight_checklist.iter().any(|done| done == item),
                    })
                    .collect(),
            },
            FlightStage::Completed => StageView::Completed {
                actual_time: plan.effective_actual_time().to_string(),
                actual_duration: plan.effective_actual_duration().to_string(),
                checklist: POST_FLIGHT_ITEMS
                    .into_iter()
                    .map(|item| ChecklistEntry {
                        item,
                        done: if item == INCIDENT_ITEM {
                            plan.incident_occurred
                        } else {
                            plan.post_flight_checklist.iter().any(|done| done == item)
                        },
                    })
                    .collect(),
                incident_report: plan
                    .incident_occurred
                    .then(|| plan.incident_report.clone()),
            },
        }
    }

    /// Form content of the active wizard page.
    pub fn step_content(&self, role: Role) -> StepContent {
        let plan = &self.plan;
        match self.step {
            WizardStep::FlightDetails => StepContent::FlightDetails {
                date: plan.date.clone(),
                time: plan.time.clone(),
                duration: plan.duration.clone(),
                operation_type: plan.operation_type,
                drone_type: plan.drone_type.clone(),
                incompatible_drone: !plan.drone_type.is_empty()
                    && !drones::is_drone_compatible(plan.operation_type, &plan.drone_type),
                choices: drones::drone_choices(plan.operation_type),
            },
            WizardStep::AreaPlanning => StepContent::AreaPlanning {
                operation_description: plan.operation_description.clone(),
                map_mode: plan.map_mode,
                point_count: plan.map_data.len(),
                advice: AREA_ADVICE.to_vec(),
            },
            WizardStep::PreFlightChecks => StepContent::PreFlightChecks {
                advisories: advisories(plan),
            },
            WizardStep::ReviewAndSubmit => StepContent::ReviewAndSubmit {
                summary: summary(plan),
                feedback_editable: role.is_admin()
                    && matches!(plan.status, FlightStage::Submitted | FlightStage::Reviewed),
            },
        }
    }

    fn submit(&mut self) -> Result<FlightStage, LifecycleError> {
        let violations = validation::validate_submission(&self.plan);
        if !violations.is_empty() {
            return Err(LifecycleError::Invalid(violations));
        }
        if self.plan.id.is_none() {
            self.plan.id = Some(new_plan_id());
        }
        self.transition(FlightStage::Submitted)
    }

    fn review(
        &mut self,
        role: Role,
        action: &'static str,
        outcome: ReviewOutcome,
        feedback: Option<String>,
    ) -> Result<FlightStage, LifecycleError> {
        if !role.is_admin() {
            return Err(LifecycleError::Forbidden { action, role });
        }
        if let Some(feedback) = feedback {
            self.plan.admin_feedback = feedback;
        }
        self.plan.review_outcome = Some(outcome);
        self.transition(FlightStage::Reviewed)
    }

    fn resubmit(&mut self, role: Role) -> Result<FlightStage, LifecycleError> {
        if role.is_admin() {
            return Err(LifecycleError::Forbidden {
                action: "resubmit",
                role,
            });
        }
        if self.plan.admin_feedback.trim().is_empty() {
            return Err(LifecycleError::FeedbackRequired);
        }
        let violations = validation::validate_submission(&self.plan);
        if !violations.is_empty() {
            return Err(LifecycleError::Invalid(violations));
        }
        self.plan.review_outcome = None;
        self.transition(FlightStage::Submitted)
    }

    fn advance(&mut self) -> Result<FlightStage, LifecycleError> {
        match self.plan.status.next() {
            Some(to) => self.transition(to),
            None => Err(LifecycleError::Terminal),
        }
    }

    fn transition(&mut self, to: FlightStage) -> Result<FlightStage, LifecycleError> {
        self.plan.status = to;
        if to != FlightStage::Planning {
            self.step = WizardStep::LAST;
        }
        self.save();
        Ok(to)
    }

    fn require_stage(&self, stage: FlightStage, command: &'static str) -> Result<(), LifecycleError> {
        if self.plan.status == stage {
            Ok(())
        } else if self.plan.status == FlightStage::Completed {
            Err(LifecycleError::Terminal)
        } else {
            Err(LifecycleError::InvalidTransition {
                from: self.plan.status,
                command,
            })
        }
    }

    /// Form fields are editable while planning, and again while a review
    /// asks for changes.
    fn require_editable(&self, field: &'static str) -> Result<(), LifecycleError> {
        let editable = match self.plan.status {
            FlightStage::Planning => true,
            FlightStage::Reviewed => {
                self.plan.review_outcome == Some(ReviewOutcome::ChangesRequested)
            }
            _ => false,
        };
        if editable {
            Ok(())
        } else {
            Err(LifecycleError::Locked { field })
        }
    }
}

fn apply_patch(plan: &mut FlightPlan, patch: PlanPatch) {
    let PlanPatch {
        pilot_name,
        location,
        date,
        time,
        duration,
        operation_type,
        drone_type,
        operation_description,
        map_mode,
        is_populated_area,
        has_non_rgb_sensors,
        is_over_property,
        admin_feedback,
        actual_time,
        actual_duration,
        incident_report,
    } = patch;

    if let Some(value) = pilot_name {
        plan.pilot_name = Some(value).filter(|name| !name.trim().is_empty());
    }
    assign(&mut plan.location, location);
    assign(&mut plan.date, date);
    assign(&mut plan.time, time);
    assign(&mut plan.duration, duration);
    if operation_type.is_some() {
        plan.operation_type = operation_type;
    }
    assign(&mut plan.drone_type, drone_type);
    assign(&mut plan.operation_description, operation_description);
    assign(&mut plan.map_mode, map_mode);
    assign(&mut plan.is_populated_area, is_populated_area);
    assign(&mut plan.has_non_rgb_sensors, has_non_rgb_sensors);
    assign(&mut plan.is_over_property, is_over_property);
    assign(&mut plan.admin_feedback, admin_feedback);
    assign(&mut plan.actual_time, actual_time);
    assign(&mut plan.actual_duration, actual_duration);
    assign(&mut plan.incident_report, incident_report);
}

fn assign<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

fn toggle(list: &mut Vec<String>, item: &str, checked: bool) {
    let present = list.iter().any(|existing| existing == item);
    if checked && !present {
        list.push(item.to_string());
    } else if !checked {
        list.retain(|existing| existing != item);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepMarker {
    pub index: usize,
    pub title: &'static str,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChecklistEntry {
    pub item: &'static str,
    pub done: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Advisory {
    pub flag: &'static str,
    pub title: &'static str,
    pub message: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryLine {
    pub label: &'static str,
    pub value: String,
}

/// Per-stage content of the planner.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum StageView {
    Planning {
        steps: Vec<StepMarker>,
        content: StepContent,
    },
    Submitted {
        message: &'static str,
        content: StepContent,
    },
    Reviewed {
        message: &'static str,
        outcome: Option<ReviewOutcome>,
        admin_feedback: Option<String>,
        can_resubmit: bool,
        content: StepContent,
    },
    PreFlight {
        checklist: Vec<ChecklistEntry>,
    },
    Completed {
        actual_time: String,
        actual_duration: String,
        checklist: Vec<ChecklistEntry>,
        /// Present only when an incident occurred
        incident_report: Option<String>,
    },
}

/// Content of one wizard page.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum StepContent {
    FlightDetails {
        date: String,
        time: String,
        duration: String,
        operation_type: Option<OperationType>,
        drone_type: String,
        incompatible_drone: bool,
        choices: Vec<DroneChoice>,
    },
    AreaPlanning {
        operation_description: String,
        map_mode: MapMode,
        point_count: usize,
        advice: Vec<&'static str>,
    },
    PreFlightChecks {
        advisories: Vec<Advisory>,
    },
    ReviewAndSubmit {
        summary: Vec<SummaryLine>,
        feedback_editable: bool,
    },
}

fn advisories(plan: &FlightPlan) -> Vec<Advisory> {
    let mut advisories = Vec::new();
    if plan.is_populated_area {
        advisories.push(Advisory {
            flag: "isPopulatedArea",
            title: "Caution",
            message: "Flying over populated areas may require additional precautions and permissions.",
        });
    }
    if plan.has_non_rgb_sensors {
        advisories.push(Advisory {
            flag: "hasNonRGBSensors",
            title: "Note",
            message: "Ensure compliance with regulations regarding the use of non-RGB sensors.",
        });
    }
    if plan.is_over_property {
        advisories.push(Advisory {
            flag: "isOverProperty",
            title: "Warning",
            message: "Ensure you have necessary permissions to fly over private property.",
        });
    }
    advisories
}

fn yes_no(value: bool) -> String {
    let answer = if value { "Yes" } else { "No" };
    answer.to_string()
}

fn summary(plan: &FlightPlan) -> Vec<SummaryLine> {
    let line = |label: &'static str, value: String| SummaryLine { label, value };
    vec![
        line("Date", plan.date.clone()),
        line("Time", plan.time.clone()),
        line("Duration", format!("{} hours", plan.duration)),
        line(
            "Operation Type",
            plan.operation_type.map(|kind| kind.to_string()).unwrap_or_default(),
        ),
        line("Drone Type", plan.drone_type.clone()),
        line("Operation Description", plan.operation_description.clone()),
        line("Constraints", plan.constraints.join(", ")),
        line(
            "Map Mode",
            match plan.map_mode {
                MapMode::Route => "route",
                MapMode::Area => "area",
            }
            .to_string(),
        ),
        line("Map Data Points", plan.map_data.len().to_string()),
        line("Flying over populated area", yes_no(plan.is_populated_area)),
        line("Using non-RGB sensors", yes_no(plan.has_non_rgb_sensors)),
        line("Flying over private property", yes_no(plan.is_over_property)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn ready_plan() -> FlightPlan {
        FlightPlan {
            date: "2024-07-01".to_string(),
            time: "10:30".to_string(),
            duration: "1.5".to_string(),
            operation_type: Some(OperationType::A2),
            drone_type: "DJI Air 2S".to_string(),
            operation_description: "Roof survey".to_string(),
            map_data: vec![MapPoint::new(1.0, 2.0)],
            ..Default::default()
        }
    }

    fn submitted() -> FlightPlanner {
        let mut planner = FlightPlanner::from_plan(ready_plan());
        for _ in 0..4 {
            planner.next_step().unwrap();
        }
        planner
    }

    fn reviewed(outcome: PlanCommand) -> FlightPlanner {
        let mut planner = submitted();
        planner.apply(Role::Admin, outcome).unwrap();
        planner
    }

    fn completed() -> FlightPlanner {
        let mut planner = reviewed(PlanCommand::Approve { feedback: None });
        planner.apply(Role::Pilot, PlanCommand::AdvanceStage).unwrap();
        planner.apply(Role::Pilot, PlanCommand::AdvanceStage).unwrap();
        planner
    }

    #[test]
    fn four_nexts_submit_the_plan() {
        let mut planner = FlightPlanner::from_plan(ready_plan());
        assert_eq!(planner.next_step(), Ok(FlightStage::Planning));
        assert_eq!(planner.next_step(), Ok(FlightStage::Planning));
        assert_eq!(planner.next_step(), Ok(FlightStage::Planning));
        assert_eq!(planner.step(), WizardStep::ReviewAndSubmit);
        assert_eq!(planner.next_step(), Ok(FlightStage::Submitted));
        assert_eq!(planner.stage(), FlightStage::Submitted);
        assert_eq!(planner.step().index(), 3);
        assert!(planner.plan().id.as_deref().unwrap().starts_with("FP-"));
    }

    #[test]
    fn wizard_step_stays_in_bounds() {
        let mut planner = FlightPlanner::new();
        for _ in 0..5 {
            assert_eq!(planner.previous_step(), Ok(WizardStep::FlightDetails));
        }
        for _ in 0..3 {
            planner.next_step().unwrap();
        }
        // Blank plan: the fourth "next" is a submission and fails validation.
        for _ in 0..3 {
            assert!(matches!(planner.next_step(), Err(LifecycleError::Invalid(_))));
            assert_eq!(planner.step(), WizardStep::ReviewAndSubmit);
        }
        assert_eq!(planner.stage(), FlightStage::Planning);
        assert_eq!(planner.previous_step(), Ok(WizardStep::PreFlightChecks));
    }

    #[test]
    fn submit_command_needs_last_page() {
        let mut planner = FlightPlanner::from_plan(ready_plan());
        let err = planner.apply(Role::Pilot, PlanCommand::Submit).unwrap_err();
        assert!(matches!(err, LifecycleError::InvalidTransition { .. }));
        assert_eq!(planner.stage(), FlightStage::Planning);
    }

    #[test]
    fn only_admins_review() {
        let mut planner = submitted();
        let err = planner
            .apply(Role::Pilot, PlanCommand::Approve { feedback: None })
            .unwrap_err();
        assert_eq!(
            err,
            LifecycleError::Forbidden {
                action: "approve",
                role: Role::Pilot
            }
        );
        assert_eq!(planner.stage(), FlightStage::Submitted);

        planner
            .apply(
                Role::Admin,
                PlanCommand::Approve {
                    feedback: Some("Looks good".to_string()),
                },
            )
            .unwrap();
        assert_eq!(planner.stage(), FlightStage::Reviewed);
        assert_eq!(planner.plan().admin_feedback, "Looks good");
        assert_eq!(planner.plan().review_outcome, Some(ReviewOutcome::Approved));
    }

    #[test]
    fn advance_stage_cannot_skip_review() {
        let mut planner = submitted();
        assert_eq!(
            planner.apply(Role::Pilot, PlanCommand::AdvanceStage),
            Err(LifecycleError::ReviewRequired)
        );
        assert_eq!(
            planner.apply(Role::Admin, PlanCommand::AdvanceStage),
            Err(LifecycleError::ReviewRequired)
        );
        assert_eq!(planner.stage(), FlightStage::Submitted);
    }

    #[test]
    fn resubmit_requires_feedback() {
        let mut planner = reviewed(PlanCommand::RequestChanges { feedback: None });
        let before = planner.plan().clone();
        assert_eq!(
            planner.apply(Role::Pilot, PlanCommand::Resubmit),
            Err(LifecycleError::FeedbackRequired)
        );
        assert_eq!(planner.plan(), &before);
    }

    #[test]
    fn resubmit_after_requested_changes() {
        let mut planner = reviewed(PlanCommand::Reject {
            feedback: Some("Add a second waypoint".to_string()),
        });
        assert_eq!(
            planner.apply(Role::Pilot, PlanCommand::AdvanceStage),
            Err(LifecycleError::ChangesRequested)
        );
        assert!(matches!(
            planner.apply(Role::Admin, PlanCommand::Resubmit),
            Err(LifecycleError::Forbidden { .. })
        ));

        assert_eq!(planner.add_map_point(MapPoint::new(3.0, 4.0)), Ok(2));
        assert_eq!(
            planner.apply(Role::Pilot, PlanCommand::Resubmit),
            Ok(FlightStage::Submitted)
        );
        assert_eq!(planner.plan().review_outcome, None);
    }

    #[test]
    fn full_lifecycle_to_terminal() {
        let mut planner = completed();
        assert_eq!(planner.stage(), FlightStage::Completed);
        assert_eq!(
            planner.apply(Role::Pilot, PlanCommand::AdvanceStage),
            Err(LifecycleError::Terminal)
        );
        assert_eq!(planner.next_step(), Err(LifecycleError::Terminal));
    }

    #[test]
    fn fields_lock_after_submission() {
        let mut planner = submitted();
        let patch = PlanPatch {
            date: Some("2024-08-01".to_string()),
            ..Default::default()
        };
        assert_eq!(
            planner.update(Role::Pilot, patch),
            Err(LifecycleError::Locked { field: "date" })
        );
        assert_eq!(
            planner.add_map_point(MapPoint::new(0.0, 0.0)),
            Err(LifecycleError::Locked { field: "mapData" })
        );
        assert_eq!(planner.plan().date, "2024-07-01");
    }

    #[test]
    fn admin_feedback_is_admin_only() {
        let mut planner = submitted();
        let patch = PlanPatch {
            admin_feedback: Some("Check NOTAMs".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            planner.update(Role::Pilot, patch.clone()),
            Err(LifecycleError::Forbidden { .. })
        ));
        planner.update(Role::Admin, patch).unwrap();
        assert_eq!(planner.plan().admin_feedback, "Check NOTAMs");
    }

    #[test]
    fn checklists_follow_stage() {
        let mut planner = reviewed(PlanCommand::Approve { feedback: None });
        assert!(planner.set_pre_flight_item("Battery check", true).is_err());
        planner.apply(Role::Pilot, PlanCommand::AdvanceStage).unwrap();

        planner.set_pre_flight_item("Battery check", true).unwrap();
        planner.set_pre_flight_item("Battery check", true).unwrap();
        assert_eq!(planner.plan().pre_flight_checklist, vec!["Battery check"]);
        assert_eq!(
            planner.set_pre_flight_item("Snacks", true),
            Err(LifecycleError::UnknownChecklistItem("Snacks".to_string()))
        );
        planner.set_pre_flight_item("Battery check", false).unwrap();
        assert!(planner.plan().pre_flight_checklist.is_empty());
    }

    #[test]
    fn incident_item_sets_flag_and_needs_report() {
        let mut planner = completed();
        planner.set_post_flight_item("Area cleared", true).unwrap();
        planner.set_post_flight_item(INCIDENT_ITEM, true).unwrap();
        assert!(planner.plan().incident_occurred);
        assert_eq!(planner.plan().post_flight_checklist, vec!["Area cleared"]);

        match planner.view(Role::Pilot) {
            StageView::Completed { incident_report, .. } => {
                assert_eq!(incident_report, Some(String::new()))
            }
            other => panic!("unexpected view {:?}", other),
        }
        assert!(matches!(planner.sign_off(), Err(LifecycleError::Invalid(_))));

        planner
            .update(
                Role::Pilot,
                PlanPatch {
                    incident_report: Some("Bird strike on landing".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(planner.sign_off(), Ok(()));
    }

    #[test]
    fn empty_patch_keeps_version() {
        let mut planner = FlightPlanner::from_plan(ready_plan());
        let before = planner.plan().version;
        planner.update(Role::Pilot, PlanPatch::default()).unwrap();
        assert_eq!(planner.plan().version, before);
    }

    #[test]
    fn rejected_sign_off_commits_nothing() {
        let mut planner = completed();
        planner.set_post_flight_item(INCIDENT_ITEM, true).unwrap();
        let before = planner.plan().clone();

        let actuals = PlanPatch {
            actual_time: Some("11:05".to_string()),
            ..Default::default()
        };
        let err = planner.sign_off_with(Role::Pilot, actuals).unwrap_err();
        assert!(matches!(err, LifecycleError::Invalid(ref v) if v[0].field == "incidentReport"));
        assert_eq!(planner.plan(), &before);

        let report = PlanPatch {
            actual_time: Some("11:05".to_string()),
            incident_report: Some("Prop clipped a branch".to_string()),
            ..Default::default()
        };
        planner.sign_off_with(Role::Pilot, report).unwrap();
        assert_eq!(planner.plan().actual_time, "11:05");
        assert_eq!(planner.plan().version, before.version + 1);
    }

    #[test]
    fn completed_view_falls_back_to_planned_values() {
        let planner = completed();
        match planner.view(Role::Pilot) {
            StageView::Completed {
                actual_time,
                actual_duration,
                checklist,
                incident_report,
            } => {
                assert_eq!(actual_time, "10:30");
                assert_eq!(actual_duration, "1.5");
                assert_eq!(checklist.len(), 6);
                assert!(incident_report.is_none());
            }
            other => panic!("unexpected view {:?}", other),
        }
    }

    #[test]
    fn planning_view_marks_active_step() {
        let mut planner = FlightPlanner::from_plan(ready_plan());
        planner.next_step().unwrap();
        match planner.view(Role::Pilot) {
            StageView::Planning { steps, content } => {
                assert!(steps[1].active);
                assert_eq!(steps.iter().filter(|s| s.active).count(), 1);
                assert!(matches!(content, StepContent::AreaPlanning { point_count: 1, .. }));
            }
            other => panic!("unexpected view {:?}", other),
        }
    }

    #[test]
    fn flight_details_flags_incompatible_drone() {
        let mut plan = ready_plan();
        plan.drone_type = "DJI Inspire 2".to_string();
        let planner = FlightPlanner::from_plan(plan);
        match planner.step_content(Role::Pilot) {
            StepContent::FlightDetails {
                incompatible_drone, ..
            } => assert!(incompatible_drone),
            other => panic!("unexpected content {:?}", other),
        }
    }

    #[test]
    fn reviewed_view_offers_resubmit_to_pilots() {
        let planner = reviewed(PlanCommand::RequestChanges {
            feedback: Some("Lower altitude".to_string()),
        });
        match planner.view(Role::Pilot) {
            StageView::Reviewed {
                can_resubmit,
                admin_feedback,
                ..
            } => {
                assert!(can_resubmit);
                assert_eq!(admin_feedback.as_deref(), Some("Lower altitude"));
            }
            other => panic!("unexpected view {:?}", other),
        }
    }

    #[test]
    fn save_hook_sees_every_commit() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let mut planner = FlightPlanner::from_plan(ready_plan())
            .with_on_save(move |plan| sink.lock().unwrap().push((plan.status, plan.version)));

        for _ in 0..4 {
            planner.next_step().unwrap();
        }
        planner
            .apply(Role::Admin, PlanCommand::Approve { feedback: None })
            .unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![(FlightStage::Submitted, 1), (FlightStage::Reviewed, 2)]
        );
    }

    #[test]
    fn commands_deserialize_from_tagged_json() {
        let command: PlanCommand =
            serde_json::from_str(r#"{"command":"approve","feedback":"ok"}"#).unwrap();
        assert_eq!(
            command,
            PlanCommand::Approve {
                feedback: Some("ok".to_string())
            }
        );
        let command: PlanCommand = serde_json::from_str(r#"{"command":"advance_stage"}"#).unwrap();
        assert_eq!(command, PlanCommand::AdvanceStage);
    }
}
