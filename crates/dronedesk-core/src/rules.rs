//! Thresholds for the certification and inspection classifiers.

use serde::{Deserialize, Serialize};

/// Configuration for the expiry/inspection classifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifierRules {
    /// Certifications expiring within this many days are flagged
    pub certification_warning_days: i64,
    /// Inspections due within this many days are flagged as upcoming
    pub inspection_warning_days: i64,
    /// Inspections due within this many days are urgent
    pub inspection_urgent_days: i64,
}

impl Default for ClassifierRules {
    fn default() -> Self {
        Self {
            certification_warning_days: 30,
            inspection_warning_days: 30,
            inspection_urgent_days: 7,
        }
    }
}

/// Minimum plannable duration in hours (the wizard steps by half hours).
pub const MIN_DURATION_HOURS: f64 = 0.5;

/// Points needed before an `area` polygon is meaningful.
pub const MIN_AREA_POINTS: usize = 3;
