//! Field checks gating submission and post-flight sign-off.

use chrono::{NaiveDate, NaiveTime};

use crate::drones;
use crate::error::Violation;
use crate::models::{FlightPlan, MapMode};
use crate::rules::{MIN_AREA_POINTS, MIN_DURATION_HOURS};

/// Checks a plan must pass before it leaves Planning.
/// Returns list of violations (empty = valid).
pub fn validate_submission(plan: &FlightPlan) -> Vec<Violation> {
    let mut violations = Vec::new();

    if NaiveDate::parse_from_str(plan.date.trim(), "%Y-%m-%d").is_err() {
        violations.push(Violation::new("date", "Date must be YYYY-MM-DD"));
    }
    if NaiveTime::parse_from_str(plan.time.trim(), "%H:%M").is_err() {
        violations.push(Violation::new("time", "Time must be HH:MM"));
    }
    match plan.duration.trim().parse::<f64>() {
        Ok(hours) if hours.is_finite() && hours >= MIN_DURATION_HOURS => {}
        _ => violations.push(Violation::new(
            "duration",
            format!("Duration must be at least {} hours", MIN_DURATION_HOURS),
        )),
    }

    match plan.operation_type {
        None => violations.push(Violation::new("operationType", "Operation type is required")),
        Some(operation) => {
            if plan.drone_type.is_empty() {
                violations.push(Violation::new("droneType", "Drone type is required"));
            } else if drones::find_drone(&plan.drone_type).is_none() {
                violations.push(Violation::new(
                    "droneType",
                    format!("Unknown drone '{}'", plan.drone_type),
                ));
            } else if !drones::is_drone_compatible(Some(operation), &plan.drone_type) {
                violations.push(Violation::new(
                    "droneType",
                    format!(
                        "{} is not compatible with {} operations",
                        plan.drone_type, operation
                    ),
                ));
            }
        }
    }

    if plan.operation_description.trim().is_empty() {
        violations.push(Violation::new(
            "operationDescription",
            "Operation description is required",
        ));
    }

    let needed = match plan.map_mode {
        MapMode::Route => 1,
        MapMode::Area => MIN_AREA_POINTS,
    };
    if plan.map_data.len() < needed {
        violations.push(Violation::new(
            "mapData",
            format!("Map needs at least {} point(s)", needed),
        ));
    }

    violations
}

/// Checks run when the post-flight record is signed off.
pub fn validate_completion(plan: &FlightPlan) -> Vec<Violation> {
    let mut violations = Vec::new();
    if plan.incident_occurred && plan.incident_report.trim().is_empty() {
        violations.push(Violation::new(
            "incidentReport",
            "An incident report is required when an incident occurred",
        ));
    }
    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MapPoint, OperationType};

    fn complete_plan() -> FlightPlan {
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

    fn fields(violations: &[Violation]) -> Vec<&'static str> {
        violations.iter().map(|v| v.field).collect()
    }

    #[test]
    fn complete_plan_passes() {
        assert!(validate_submission(&complete_plan()).is_empty());
    }

    #[test]
    fn empty_plan_reports_every_field() {
        let violations = validate_submission(&FlightPlan::default());
        assert_eq!(
            fields(&violations),
            vec!["date", "time", "duration", "operationType", "operationDescription", "mapData"]
        );
    }

    #[test]
    fn incompatible_drone_is_rejected() {
        let mut plan = complete_plan();
        plan.drone_type = "DJI Inspire 2".to_string();
        assert_eq!(fields(&validate_submission(&plan)), vec!["droneType"]);
    }

    #[test]
    fn area_needs_a_polygon() {
        let mut plan = complete_plan();
        plan.map_mode = MapMode::Area;
        assert_eq!(fields(&validate_submission(&plan)), vec!["mapData"]);
        plan.map_data.push(MapPoint::new(3.0, 4.0));
        plan.map_data.push(MapPoint::new(5.0, 6.0));
        assert!(validate_submission(&plan).is_empty());
    }

    #[test]
    fn short_duration_is_rejected() {
        let mut plan = complete_plan();
        plan.duration = "0.25".to_string();
        assert_eq!(fields(&validate_submission(&plan)), vec!["duration"]);
    }

    #[test]
    fn incident_needs_report() {
        let mut plan = complete_plan();
        plan.incident_occurred = true;
        assert_eq!(fields(&validate_completion(&plan)), vec!["incidentReport"]);
        plan.incident_report = "   ".to_string();
        assert_eq!(validate_completion(&plan).len(), 1);
        plan.incident_report = "Hard landing, prop damaged".to_string();
        assert!(validate_completion(&plan).is_empty());
    }
}
