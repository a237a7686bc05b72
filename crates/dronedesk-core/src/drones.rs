//! Drone registry lookups and operation-type compatibility.

use serde::Serialize;

use crate::models::{Drone, OperationType};
use crate::seed;

/// Rank of a category in the weight-class ordering.
pub fn rank(kind: OperationType) -> u8 {
    match kind {
        OperationType::A1 => 1,
        OperationType::A2 => 2,
        OperationType::A3 => 3,
        OperationType::Specific => 4,
    }
}

/// Whether a drone of `category` may fly an operation of `operation`.
///
/// An unset operation admits everything. `Specific` is its own tier: it admits
/// only `Specific` drones and `Specific` drones fit nothing else. Otherwise the
/// drone's rank must not exceed the operation's.
pub fn is_compatible(operation: Option<OperationType>, category: OperationType) -> bool {
    match (operation, category) {
        (None, _) => true,
        (Some(OperationType::Specific), category) => category == OperationType::Specific,
        (Some(_), OperationType::Specific) => false,
        (Some(operation), category) => rank(category) <= rank(operation),
    }
}

/// Look up a drone by exact name in the registry.
pub fn find_drone(name: &str) -> Option<Drone> {
    seed::drone_registry().into_iter().find(|drone| drone.name == name)
}

/// Compatibility of a named drone; unknown names are never compatible.
pub fn is_drone_compatible(operation: Option<OperationType>, drone_name: &str) -> bool {
    find_drone(drone_name)
        .map(|drone| is_compatible(operation, drone.category))
        .unwrap_or(false)
}

/// A registry entry annotated for the drone picker.
#[derive(Debug, Clone, Serialize)]
pub struct DroneChoice {
    #[serde(flatten)]
    pub drone: Drone,
    pub compatible: bool,
    /// Picker label, e.g. `DJI Mini 2 (249g)`
    pub label: String,
}

pub fn drone_choices(operation: Option<OperationType>) -> Vec<DroneChoice> {
    seed::drone_registry()
        .into_iter()
        .map(|drone| DroneChoice {
            compatible: is_compatible(operation, drone.category),
            label: format!("{} ({}g)", drone.name, drone.weight),
            drone,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use OperationType::*;

    #[test]
    fn a2_admits_lighter_classes_only() {
        assert!(is_compatible(Some(A2), A1));
        assert!(is_compatible(Some(A2), A2));
        assert!(!is_compatible(Some(A2), A3));
        assert!(!is_compatible(Some(A2), Specific));
    }

    #[test]
    fn specific_is_an_exact_tier() {
        assert!(is_compatible(Some(Specific), Specific));
        for category in [A1, A2, A3] {
            assert!(!is_compatible(Some(Specific), category));
        }
        assert!(!is_compatible(Some(A3), Specific));
    }

    #[test]
    fn unset_operation_admits_all() {
        for category in OperationType::ALL {
            assert!(is_compatible(None, category));
        }
    }

    #[test]
    fn unknown_drone_is_incompatible() {
        assert!(!is_drone_compatible(None, "Homebuilt Quad"));
        assert!(is_drone_compatible(Some(A1), "DJI Mini 2"));
        assert!(!is_drone_compatible(Some(A1), "DJI Mavic 3"));
    }

    #[test]
    fn choices_cover_registry() {
        let choices = drone_choices(Some(A2));
        assert_eq!(choices.len(), 5);
        let compatible: Vec<&str> = choices
            .iter()
            .filter(|choice| choice.compatible)
            .map(|choice| choice.drone.name.as_str())
            .collect();
        assert_eq!(compatible, vec!["DJI Mini 2", "DJI Air 2S", "DJI Mavic 3"]);
        assert_eq!(choices[0].label, "DJI Mini 2 (249g)");
    }
}
