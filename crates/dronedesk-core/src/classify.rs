//! Certification expiry and inventory inspection classifiers.
//!
//! Both work on whole days between "today" and a due date. Certifications use
//! `days <= 0` / `0 < days <= warning` / `days > warning`; inspections use
//! `days <= urgent` / `urgent < days <= warning` / `days > warning`.

use chrono::{DateTime, NaiveDate};
use serde::Serialize;

use crate::error::ClassifyError;
use crate::rules::ClassifierRules;

/// Badge variant used by the dashboard for each severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeVariant {
    Default,
    Secondary,
    Outline,
    Success,
    Warning,
    Destructive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CertificationStatus {
    Expired,
    ExpiringSoon,
    Valid,
}

impl CertificationStatus {
    pub fn label(self) -> &'static str {
        match self {
            CertificationStatus::Expired => "expired",
            CertificationStatus::ExpiringSoon => "expiring soon",
            CertificationStatus::Valid => "valid",
        }
    }

    pub fn badge(self) -> BadgeVariant {
        match self {
            CertificationStatus::Expired => BadgeVariant::Destructive,
            CertificationStatus::ExpiringSoon => BadgeVariant::Warning,
            CertificationStatus::Valid => BadgeVariant::Success,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InspectionUrgency {
    /// Red
    Urgent,
    /// Yellow
    Upcoming,
    /// Green
    Ok,
}

impl InspectionUrgency {
    pub fn color(self) -> &'static str {
        match self {
            InspectionUrgency::Urgent => "red",
            InspectionUrgency::Upcoming => "yellow",
            InspectionUrgency::Ok => "green",
        }
    }

    pub fn badge(self) -> BadgeVariant {
        match self {
            InspectionUrgency::Urgent => BadgeVariant::Destructive,
            InspectionUrgency::Upcoming => BadgeVariant::Outline,
            InspectionUrgency::Ok => BadgeVariant::Default,
        }
    }
}

/// Parse a calendar date. Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp.
pub fn parse_date(value: &str) -> Result<NaiveDate, ClassifyError> {
    let trimmed = value.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(trimmed).map(|ts| ts.date_naive()))
        .map_err(|_| ClassifyError::InvalidDate(value.to_string()))
}

/// Whole days from `today` until `date`; negative once past.
pub fn days_until(date: &str, today: NaiveDate) -> Result<i64, ClassifyError> {
    let due = parse_date(date)?;
    Ok((due - today).num_days())
}

pub fn classify_certification_days(days: i64, rules: &ClassifierRules) -> CertificationStatus {
    if days <= 0 {
        CertificationStatus::Expired
    } else if days <= rules.certification_warning_days {
        CertificationStatus::ExpiringSoon
    } else {
        CertificationStatus::Valid
    }
}

/// Classify a certification expiry date. Unparseable dates count as expired.
pub fn certification_status(
    expiration_date: &str,
    today: NaiveDate,
    rules: &ClassifierRules,
) -> CertificationStatus {
    match days_until(expiration_date, today) {
        Ok(days) => classify_certification_days(days, rules),
        Err(_) => CertificationStatus::Expired,
    }
}

pub fn classify_inspection_days(days: i64, rules: &ClassifierRules) -> InspectionUrgency {
    if days <= rules.inspection_urgent_days {
        InspectionUrgency::Urgent
    } else if days <= rules.inspection_warning_days {
        InspectionUrgency::Upcoming
    } else {
        InspectionUrgency::Ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    #[test]
    fn certification_boundaries() {
        let rules = ClassifierRules::default();
        for days in [-400, -1, 0] {
            assert_eq!(classify_certification_days(days, &rules), CertificationStatus::Expired);
        }
        for days in [1, 15, 30] {
            assert_eq!(
                classify_certification_days(days, &rules),
                CertificationStatus::ExpiringSoon
            );
        }
        for days in [31, 365] {
            assert_eq!(classify_certification_days(days, &rules), CertificationStatus::Valid);
        }
    }

    #[test]
    fn inspection_boundaries() {
        let rules = ClassifierRules::default();
        for days in [-3, 0, 7] {
            assert_eq!(classify_inspection_days(days, &rules), InspectionUrgency::Urgent);
        }
        for days in [8, 14, 30] {
            assert_eq!(classify_inspection_days(days, &rules), InspectionUrgency::Upcoming);
        }
        for days in [31, 66] {
            assert_eq!(classify_inspection_days(days, &rules), InspectionUrgency::Ok);
        }
        assert_eq!(InspectionUrgency::Urgent.badge(), BadgeVariant::Destructive);
        assert_eq!(InspectionUrgency::Upcoming.color(), "yellow");
    }

    #[test]
    fn days_until_counts_calendar_days() {
        assert_eq!(days_until("2024-06-01", today()), Ok(0));
        assert_eq!(days_until("2024-07-01", today()), Ok(30));
        assert_eq!(days_until("2024-05-31", today()), Ok(-1));
        assert_eq!(days_until("2024-06-02T09:00:00Z", today()), Ok(1));
    }

    #[test]
    fn invalid_dates_are_expired() {
        let rules = ClassifierRules::default();
        assert_eq!(
            days_until("not-a-date", today()),
            Err(ClassifyError::InvalidDate("not-a-date".to_string()))
        );
        assert_eq!(
            certification_status("2024-13-45", today(), &rules),
            CertificationStatus::Expired
        );
        assert_eq!(certification_status("", today(), &rules), CertificationStatus::Expired);
    }

    #[test]
    fn certification_status_from_dates() {
        let rules = ClassifierRules::default();
        assert_eq!(
            certification_status("2024-06-15", today(), &rules),
            CertificationStatus::ExpiringSoon
        );
        assert_eq!(
            certification_status("2025-03-31", today(), &rules),
            CertificationStatus::Valid
        );
        assert_eq!(CertificationStatus::ExpiringSoon.badge(), BadgeVariant::Warning);
    }
}
