//! Seed data loaded at startup. The single source of mock records.

use crate::models::{
    Certification, CertificationType, Drone, FlightPlan, FlightStage, InventoryCategory,
    InventoryItem, MapMode, MapPoint, NewsUpdate, OperationType, Pilot, Priority, ReviewOutcome,
    UpdateType,
};

pub fn drone_registry() -> Vec<Drone> {
    [
        ("DJI Mini 2", OperationType::A1, 249),
        ("DJI Air 2S", OperationType::A2, 595),
        ("DJI Mavic 3", OperationType::A2, 895),
        ("DJI Inspire 2", OperationType::A3, 4250),
        ("DJI Matrice 300 RTK", OperationType::Specific, 9000),
    ]
    .into_iter()
    .map(|(name, category, weight)| Drone {
        name: name.to_string(),
        category,
        weight,
    })
    .collect()
}

struct PlanSeed {
    id: &'static str,
    pilot: &'static str,
    date: &'static str,
    time: &'static str,
    duration: &'static str,
    location: &'static str,
    purpose: &'static str,
    operation: OperationType,
    drone: &'static str,
    stage: FlightStage,
    outcome: Option<ReviewOutcome>,
    feedback: &'static str,
}

pub fn flight_plans() -> Vec<FlightPlan> {
    let seeds = [
        PlanSeed {
            id: "FP001",
            pilot: "John Doe",
            date: "2023-07-30",
            time: "10:00",
            duration: "2",
            location: "City Park",
            purpose: "Aerial photography for event",
            operation: OperationType::A1,
            drone: "DJI Mini 2",
            stage: FlightStage::Submitted,
            outcome: None,
            feedback: "",
        },
        PlanSeed {
            id: "FP002",
            pilot: "Jane Smith",
            date: "2023-07-31",
            time: "14:00",
            duration: "1.5",
            location: "Industrial Zone",
            purpose: "Infrastructure inspection",
            operation: OperationType::Specific,
            drone: "DJI Matrice 300 RTK",
            stage: FlightStage::Submitted,
            outcome: None,
            feedback: "",
        },
        PlanSeed {
            id: "FP003",
            pilot: "Mike Johnson",
            date: "2023-08-01",
            time: "09:30",
            duration: "3",
            location: "Coastal Area",
            purpose: "Environmental survey",
            operation: OperationType::A3,
            drone: "DJI Inspire 2",
            stage: FlightStage::Reviewed,
            outcome: Some(ReviewOutcome::Approved),
            feedback: "",
        },
        PlanSeed {
            id: "FP004",
            pilot: "Sarah Williams",
            date: "2023-08-02",
            time: "11:00",
            duration: "1",
            location: "Downtown",
            purpose: "Real estate photography",
            operation: OperationType::A2,
            drone: "DJI Air 2S",
            stage: FlightStage::Reviewed,
            outcome: Some(ReviewOutcome::ChangesRequested),
            feedback: "Downtown is a populated area; add the crowd-distance plan.",
        },
        PlanSeed {
            id: "FP005",
            pilot: "Chris Brown",
            date: "2023-07-20",
            time: "16:00",
            duration: "2",
            location: "Harbor",
            purpose: "Preliminary inspection",
            operation: OperationType::A2,
            drone: "DJI Mavic 3",
            stage: FlightStage::Planning,
            outcome: None,
            feedback: "",
        },
    ];

    seeds
        .into_iter()
        .map(|seed| FlightPlan {
            id: Some(seed.id.to_string()),
            pilot_name: Some(seed.pilot.to_string()),
            location: seed.location.to_string(),
            date: seed.date.to_string(),
            time: seed.time.to_string(),
            duration: seed.duration.to_string(),
            operation_type: Some(seed.operation),
            drone_type: seed.drone.to_string(),
            operation_description: seed.purpose.to_string(),
            map_mode: MapMode::Route,
            map_data: vec![MapPoint::new(51.5072, -0.1276), MapPoint::new(51.5090, -0.1200)],
            admin_feedback: seed.feedback.to_string(),
            review_outcome: seed.outcome,
            is_populated_area: seed.location == "Downtown",
            status: seed.stage,
            ..Default::default()
        })
        .collect()
}

pub fn pilots() -> Vec<Pilot> {
    vec![
        Pilot {
            id: "1".to_string(),
            name: "John Doe".to_string(),
            email: "john.doe@example.com".to_string(),
            phone: "+1 (555) 123-4567".to_string(),
            certifications: vec![
                Certification {
                    cert_type: CertificationType::A1A3,
                    expiration_date: "2023-12-31".to_string(),
                },
                Certification {
                    cert_type: CertificationType::A2,
                    expiration_date: "2024-06-30".to_string(),
                },
            ],
        },
        Pilot {
            id: "2".to_string(),
            name: "Jane Smith".to_string(),
            email: "jane.smith@example.com".to_string(),
            phone: "+1 (555) 987-6543".to_string(),
            certifications: vec![
                Certification {
                    cert_type: CertificationType::A1A3,
                    expiration_date: "2023-09-15".to_string(),
                },
                Certification {
                    cert_type: CertificationType::Specific,
                    expiration_date: "2025-03-31".to_string(),
                },
            ],
        },
    ]
}

pub fn inventory() -> Vec<InventoryItem> {
    [
        ("1", "DJI Mini 2", InventoryCategory::Drone, 5, "2023-05-15", "2023-08-15", 45),
        ("2", "DJI Air 2S", InventoryCategory::Drone, 3, "2023-06-01", "2023-07-15", 14),
        ("3", "DJI Mavic 3", InventoryCategory::Drone, 2, "2023-06-10", "2023-07-01", 0),
        ("4", "Extra Battery Pack", InventoryCategory::Battery, 10, "2023-06-05", "2023-09-05", 66),
        ("5", "Propeller Set", InventoryCategory::Accessory, 20, "2023-05-20", "2023-08-20", 50),
    ]
    .into_iter()
    .map(|(id, name, category, quantity, last, next, days)| InventoryItem {
        id: id.to_string(),
        name: name.to_string(),
        category,
        quantity,
        last_inspection: last.to_string(),
        next_inspection: next.to_string(),
        days_until_inspection: days,
    })
    .collect()
}

pub fn news() -> Vec<NewsUpdate> {
    [
        (
            "1",
            "System Maintenance Completed",
            "The scheduled system maintenance has been successfully completed. All services are now fully operational.",
            "2023-07-28T09:00:00Z",
            UpdateType::System,
            Priority::Low,
        ),
        (
            "2",
            "Flight Plan Approved",
            "Your flight plan for Mission ID: DRN-2023-07-28-001 has been approved. You are cleared for takeoff.",
            "2023-07-28T10:15:00Z",
            UpdateType::Flight,
            Priority::Medium,
        ),
        (
            "3",
            "Drone Maintenance Required",
            "Drone ID: DJI-M300-RTK-003 is due for its scheduled maintenance. Please schedule a maintenance check as soon as possible.",
            "2023-07-27T14:30:00Z",
            UpdateType::Maintenance,
            Priority::High,
        ),
        (
            "4",
            "New Regulatory Update",
            "The FAA has issued new guidelines for night operations. Please review the updated regulations in the app.",
            "2023-07-26T11:00:00Z",
            UpdateType::Regulatory,
            Priority::High,
        ),
        (
            "5",
            "Weather Alert",
            "Severe weather conditions are expected in your area. All flights are temporarily suspended until further notice.",
            "2023-07-28T08:45:00Z",
            UpdateType::Flight,
            Priority::High,
        ),
    ]
    .into_iter()
    .map(|(id, title, content, date, update_type, priority)| NewsUpdate {
        id: id.to_string(),
        title: title.to_string(),
        content: content.to_string(),
        date: date.to_string(),
        update_type,
        priority,
    })
    .collect()
}
