//! Core data models for the DroneDesk back office.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Regulatory operation category. Also used as the drone weight class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationType {
    A1,
    A2,
    A3,
    Specific,
}

impl OperationType {
    pub const ALL: [OperationType; 4] = [
        OperationType::A1,
        OperationType::A2,
        OperationType::A3,
        OperationType::Specific,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OperationType::A1 => "A1",
            OperationType::A2 => "A2",
            OperationType::A3 => "A3",
            OperationType::Specific => "Specific",
        }
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperationType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        OperationType::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| format!("unknown operation type '{}'", value))
    }
}

/// Top-level lifecycle state of a flight plan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FlightStage {
    /// Being drafted through the wizard
    #[default]
    Planning,
    /// Waiting for an admin decision
    Submitted,
    /// Admin approved or requested changes
    Reviewed,
    /// Cleared, working through the pre-flight checklist
    #[serde(rename = "Pre-Flight")]
    PreFlight,
    /// Flown; post-flight capture
    Completed,
}

impl FlightStage {
    pub const SEQUENCE: [FlightStage; 5] = [
        FlightStage::Planning,
        FlightStage::Submitted,
        FlightStage::Reviewed,
        FlightStage::PreFlight,
        FlightStage::Completed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FlightStage::Planning => "Planning",
            FlightStage::Submitted => "Submitted",
            FlightStage::Reviewed => "Reviewed",
            FlightStage::PreFlight => "Pre-Flight",
            FlightStage::Completed => "Completed",
        }
    }

    /// Zero-based position in the fixed sequence.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Following stage in the fixed sequence, `None` once completed.
    pub fn next(self) -> Option<FlightStage> {
        FlightStage::SEQUENCE.get(self.index() + 1).copied()
    }

    /// Progress through the lifecycle as a percentage.
    pub fn progress_percent(self) -> f64 {
        (self.index() + 1) as f64 / FlightStage::SEQUENCE.len() as f64 * 100.0
    }
}

impl fmt::Display for FlightStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapMode {
    /// Polyline
    #[default]
    Route,
    /// Polygon
    Area,
}

/// Admin decision recorded when a plan moves to Reviewed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewOutcome {
    Approved,
    ChangesRequested,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapPoint {
    pub lat: f64,
    pub lng: f64,
}

impl MapPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// A flight plan as drafted by a pilot and reviewed by an admin.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FlightPlan {
    pub id: Option<String>,
    /// Bumped on every committed change
    pub version: u64,
    pub pilot_name: Option<String>,
    pub location: String,
    pub date: String,
    pub time: String,
    /// Planned duration in hours
    pub duration: String,
    pub actual_time: String,
    pub actual_duration: String,
    pub operation_type: Option<OperationType>,
    pub drone_type: String,
    pub operation_description: String,
    pub map_mode: MapMode,
    pub map_data: Vec<MapPoint>,
    /// Declared for no-fly/regulatory constraint strings; nothing fills it yet
    pub constraints: Vec<String>,
    pub pre_flight_checklist: Vec<String>,
    pub post_flight_checklist: Vec<String>,
    pub admin_feedback: String,
    pub review_outcome: Option<ReviewOutcome>,
    pub incident_occurred: bool,
    pub incident_report: String,
    pub is_populated_area: bool,
    #[serde(rename = "hasNonRGBSensors")]
    pub has_non_rgb_sensors: bool,
    pub is_over_property: bool,
    pub status: FlightStage,
}

impl FlightPlan {
    /// Actual start time, falling back to the planned one.
    pub fn effective_actual_time(&self) -> &str {
        if self.actual_time.is_empty() {
            &self.time
        } else {
            &self.actual_time
        }
    }

    /// Actual duration, falling back to the planned one.
    pub fn effective_actual_duration(&self) -> &str {
        if self.actual_duration.is_empty() {
            &self.duration
        } else {
            &self.actual_duration
        }
    }
}

/// Entry in the static drone registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drone {
    pub name: String,
    pub category: OperationType,
    /// Takeoff mass in grams
    pub weight: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CertificationType {
    #[serde(rename = "A1/A3")]
    A1A3,
    A2,
    Specific,
}

impl CertificationType {
    pub const ALL: [CertificationType; 3] = [
        CertificationType::A1A3,
        CertificationType::A2,
        CertificationType::Specific,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CertificationType::A1A3 => "A1/A3",
            CertificationType::A2 => "A2",
            CertificationType::Specific => "Specific",
        }
    }
}

impl fmt::Display for CertificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certification {
    #[serde(rename = "type")]
    pub cert_type: CertificationType,
    /// `YYYY-MM-DD`
    pub expiration_date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pilot {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub certifications: Vec<Certification>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InventoryCategory {
    Drone,
    Battery,
    Accessory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: String,
    pub name: String,
    pub category: InventoryCategory,
    pub quantity: u32,
    pub last_inspection: String,
    pub next_inspection: String,
    pub days_until_inspection: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateType {
    System,
    Flight,
    Maintenance,
    Regulatory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

/// A news feed entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsUpdate {
    pub id: String,
    pub title: String,
    pub content: String,
    /// RFC 3339 timestamp
    pub date: String,
    #[serde(rename = "type")]
    pub update_type: UpdateType,
    pub priority: Priority,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_labels_round_trip() {
        let json = serde_json::to_string(&FlightStage::PreFlight).unwrap();
        assert_eq!(json, "\"Pre-Flight\"");
        let stage: FlightStage = serde_json::from_str("\"Pre-Flight\"").unwrap();
        assert_eq!(stage, FlightStage::PreFlight);
    }

    #[test]
    fn stage_sequence_ends_at_completed() {
        assert_eq!(FlightStage::Planning.next(), Some(FlightStage::Submitted));
        assert_eq!(FlightStage::PreFlight.next(), Some(FlightStage::Completed));
        assert_eq!(FlightStage::Completed.next(), None);
        assert_eq!(FlightStage::Completed.progress_percent(), 100.0);
    }

    #[test]
    fn route_points_keep_order_through_json() {
        let plan = FlightPlan {
            map_mode: MapMode::Route,
            map_data: vec![
                MapPoint::new(1.0, 2.0),
                MapPoint::new(3.0, 4.0),
                MapPoint::new(5.0, 6.0),
            ],
            ..Default::default()
        };

        let json = serde_json::to_value(&plan).unwrap();
        assert_eq!(json["mapMode"], "route");
        let decoded: FlightPlan = serde_json::from_value(json).unwrap();
        assert_eq!(decoded.map_data.len(), 3);
        assert_eq!(decoded.map_data, plan.map_data);
    }

    #[test]
    fn sparse_document_fills_defaults() {
        let plan: FlightPlan =
            serde_json::from_str(r#"{"id":"FP001","pilotName":"John Doe","hasNonRGBSensors":true}"#)
                .unwrap();
        assert_eq!(plan.id.as_deref(), Some("FP001"));
        assert_eq!(plan.status, FlightStage::Planning);
        assert!(plan.has_non_rgb_sensors);
        assert!(plan.operation_type.is_none());
    }

    #[test]
    fn operation_type_parses_case_insensitively() {
        assert_eq!("specific".parse::<OperationType>(), Ok(OperationType::Specific));
        assert_eq!(" a2 ".parse::<OperationType>(), Ok(OperationType::A2));
        assert!("B1".parse::<OperationType>().is_err());
    }
}
