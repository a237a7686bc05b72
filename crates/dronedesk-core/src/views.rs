//! Collection views: pilot roster, review queue, inventory, news and the
//! dashboard summary.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::classify::{self, BadgeVariant, CertificationStatus, InspectionUrgency};
use crate::error::Violation;
use crate::models::{
    Certification, CertificationType, FlightPlan, FlightStage, InventoryCategory, InventoryItem,
    NewsUpdate, Pilot, Priority, ReviewOutcome, UpdateType,
};
use crate::rules::ClassifierRules;

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

// ========== PILOT ROSTER ==========

/// Form state for a pilot being added.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewPilot {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub certifications: Vec<Certification>,
}

impl NewPilot {
    /// Tick or untick a certification. New ones expire "today" until edited.
    pub fn set_certification(&mut self, cert_type: CertificationType, checked: bool, today: NaiveDate) {
        self.certifications.retain(|cert| cert.cert_type != cert_type);
        if checked {
            self.certifications.push(Certification {
                cert_type,
                expiration_date: today.format("%Y-%m-%d").to_string(),
            });
        }
    }

    pub fn validate(&self) -> Vec<Violation> {
        let mut violations = Vec::new();
        if self.name.trim().is_empty() {
            violations.push(Violation::new("name", "Name is required"));
        }
        if !self.email.is_empty() && !self.email.contains('@') {
            violations.push(Violation::new("email", "Email must contain '@'"));
        }
        for cert in &self.certifications {
            if classify::parse_date(&cert.expiration_date).is_err() {
                violations.push(Violation::new(
                    "certifications",
                    format!("{} has an invalid expiration date", cert.cert_type),
                ));
            }
        }
        violations
    }
}

/// Ordered pilot collection.
#[derive(Debug, Clone, Default)]
pub struct PilotRoster {
    pilots: Vec<Pilot>,
}

impl PilotRoster {
    pub fn new(pilots: Vec<Pilot>) -> Self {
        Self { pilots }
    }

    pub fn pilots(&self) -> &[Pilot] {
        &self.pilots
    }

    pub fn get(&self, id: &str) -> Option<&Pilot> {
        self.pilots.iter().find(|pilot| pilot.id == id)
    }

    /// Case-insensitive match on name or email; an empty term matches all.
    pub fn search(&self, term: &str) -> Vec<&Pilot> {
        let term = term.trim();
        self.pilots
            .iter()
            .filter(|pilot| {
                term.is_empty()
                    || contains_ignore_case(&pilot.name, term)
                    || contains_ignore_case(&pilot.email, term)
            })
            .collect()
    }

    /// Add a pilot with an id taken from the millisecond timestamp, bumped
    /// until unique.
    pub fn add(&mut self, new_pilot: NewPilot, now: DateTime<Utc>) -> Result<Pilot, Vec<Violation>> {
        let violations = new_pilot.validate();
        if !violations.is_empty() {
            return Err(violations);
        }

        let mut stamp = now.timestamp_millis();
        while self.get(&stamp.to_string()).is_some() {
            stamp += 1;
        }

        let pilot = Pilot {
            id: stamp.to_string(),
            name: new_pilot.name.trim().to_string(),
            email: new_pilot.email,
            phone: new_pilot.phone,
            certifications: new_pilot.certifications,
        };
        self.pilots.push(pilot.clone());
        Ok(pilot)
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.pilots.len();
        self.pilots.retain(|pilot| pilot.id != id);
        self.pilots.len() != before
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CertificationBadge {
    #[serde(rename = "type")]
    pub cert_type: CertificationType,
    pub expiration_date: String,
    pub status: CertificationStatus,
    pub label: &'static str,
    pub badge: BadgeVariant,
    /// `None` when the stored date does not parse
    pub days_remaining: Option<i64>,
}

pub fn certification_badges(
    pilot: &Pilot,
    today: NaiveDate,
    rules: &ClassifierRules,
) -> Vec<CertificationBadge> {
    pilot
        .certifications
        .iter()
        .map(|cert| {
            let status = classify::certification_status(&cert.expiration_date, today, rules);
            CertificationBadge {
                cert_type: cert.cert_type,
                expiration_date: cert.expiration_date.clone(),
                status,
                label: status.label(),
                badge: status.badge(),
                days_remaining: classify::days_until(&cert.expiration_date, today).ok(),
            }
        })
        .collect()
}

/// A roster row with classified certifications.
#[derive(Debug, Clone, Serialize)]
pub struct PilotRow {
    #[serde(flatten)]
    pub pilot: Pilot,
    pub certification_status: Vec<CertificationBadge>,
}

impl PilotRow {
    pub fn new(pilot: &Pilot, today: NaiveDate, rules: &ClassifierRules) -> Self {
        Self {
            certification_status: certification_badges(pilot, today, rules),
            pilot: pilot.clone(),
        }
    }
}

// ========== REVIEW QUEUE ==========

/// Review-queue status shown for a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    Draft,
    Pending,
    Approved,
    Rejected,
}

impl ReviewStatus {
    pub fn of(plan: &FlightPlan) -> Self {
        match (plan.status, plan.review_outcome) {
            (FlightStage::Planning, _) => ReviewStatus::Draft,
            (FlightStage::Submitted, _) => ReviewStatus::Pending,
            (_, Some(ReviewOutcome::ChangesRequested)) => ReviewStatus::Rejected,
            (_, _) => ReviewStatus::Approved,
        }
    }

    pub fn badge(self) -> BadgeVariant {
        match self {
            ReviewStatus::Draft => BadgeVariant::Secondary,
            ReviewStatus::Pending => BadgeVariant::Outline,
            ReviewStatus::Approved => BadgeVariant::Default,
            ReviewStatus::Rejected => BadgeVariant::Destructive,
        }
    }
}

/// Case-insensitive match on pilot name or plan id; an empty term matches all.
pub fn filter_plans<'a>(plans: &'a [FlightPlan], term: &str) -> Vec<&'a FlightPlan> {
    let term = term.trim();
    plans
        .iter()
        .filter(|plan| {
            term.is_empty()
                || plan
                    .pilot_name
                    .as_deref()
                    .is_some_and(|name| contains_ignore_case(name, term))
                || plan
                    .id
                    .as_deref()
                    .is_some_and(|id| contains_ignore_case(id, term))
        })
        .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewRow {
    pub id: Option<String>,
    pub pilot_name: Option<String>,
    pub date: String,
    pub time: String,
    pub duration: String,
    pub location: String,
    pub stage: FlightStage,
    pub status: ReviewStatus,
    pub badge: BadgeVariant,
    pub version: u64,
}

impl From<&FlightPlan> for ReviewRow {
    fn from(plan: &FlightPlan) -> Self {
        let status = ReviewStatus::of(plan);
        Self {
            id: plan.id.clone(),
            pilot_name: plan.pilot_name.clone(),
            date: plan.date.clone(),
            time: plan.time.clone(),
            duration: plan.duration.clone(),
            location: plan.location.clone(),
            stage: plan.status,
            status,
            badge: status.badge(),
            version: plan.version,
        }
    }
}

// ========== INVENTORY ==========

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InventorySort {
    #[default]
    Name,
    Days,
    Quantity,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct InventoryQuery {
    pub category: Option<InventoryCategory>,
    pub sort: InventorySort,
    pub order: SortOrder,
}

#[derive(Debug, Clone, Serialize)]
pub struct InventoryRow {
    #[serde(flatten)]
    pub item: InventoryItem,
    pub urgency: InspectionUrgency,
    pub color: &'static str,
    pub badge: BadgeVariant,
}

pub fn list_inventory(
    items: &[InventoryItem],
    query: &InventoryQuery,
    rules: &ClassifierRules,
) -> Vec<InventoryRow> {
    let mut selected: Vec<&InventoryItem> = items
        .iter()
        .filter(|item| query.category.map_or(true, |category| item.category == category))
        .collect();

    selected.sort_by(|a, b| {
        let ordering = match query.sort {
            InventorySort::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            InventorySort::Days => a.days_until_inspection.cmp(&b.days_until_inspection),
            InventorySort::Quantity => a.quantity.cmp(&b.quantity),
        };
        match query.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });

    selected
        .into_iter()
        .map(|item| {
            let urgency = classify::classify_inspection_days(item.days_until_inspection, rules);
            InventoryRow {
                item: item.clone(),
                urgency,
                color: urgency.color(),
                badge: urgency.badge(),
            }
        })
        .collect()
}

// ========== NEWS ==========

pub fn priority_badge(priority: Priority) -> BadgeVariant {
    match priority {
        Priority::Low => BadgeVariant::Default,
        Priority::Medium => BadgeVariant::Secondary,
        Priority::High => BadgeVariant::Destructive,
    }
}

pub fn update_icon(update_type: UpdateType) -> &'static str {
    match update_type {
        UpdateType::System => "zap",
        UpdateType::Flight => "info",
        UpdateType::Maintenance => "alert-triangle",
        UpdateType::Regulatory => "bell",
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NewsEntry {
    #[serde(flatten)]
    pub update: NewsUpdate,
    pub badge: BadgeVariant,
    pub icon: &'static str,
}

/// Updates of the given type (all when `None`), newest first. Entries with
/// unparseable dates sink to the end.
pub fn news_feed(updates: &[NewsUpdate], filter: Option<UpdateType>) -> Vec<NewsEntry> {
    let mut selected: Vec<(Option<DateTime<Utc>>, &NewsUpdate)> = updates
        .iter()
        .filter(|update| filter.map_or(true, |kind| update.update_type == kind))
        .map(|update| {
            let posted = DateTime::parse_from_rfc3339(&update.date)
                .ok()
                .map(|ts| ts.with_timezone(&Utc));
            (posted, update)
        })
        .collect();

    selected.sort_by(|(a, _), (b, _)| match (a, b) {
        (Some(a), Some(b)) => b.cmp(a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    selected
        .into_iter()
        .map(|(_, update)| NewsEntry {
            update: update.clone(),
            badge: priority_badge(update.priority),
            icon: update_icon(update.update_type),
        })
        .collect()
}

// ========== DASHBOARD ==========

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageCount {
    pub stage: FlightStage,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub total_flights: usize,
    pub by_stage: Vec<StageCount>,
    pub pending_review: usize,
    pub certified_pilots: usize,
    /// Certifications expired or inside the warning window
    pub certification_alerts: usize,
    pub urgent_inspections: usize,
}

pub fn dashboard_summary(
    plans: &[FlightPlan],
    pilots: &[Pilot],
    inventory: &[InventoryItem],
    today: NaiveDate,
    rules: &ClassifierRules,
) -> DashboardSummary {
    let by_stage = FlightStage::SEQUENCE
        .into_iter()
        .map(|stage| StageCount {
            stage,
            count: plans.iter().filter(|plan| plan.status == stage).count(),
        })
        .collect();

    let statuses: Vec<Vec<CertificationStatus>> = pilots
        .iter()
        .map(|pilot| {
            pilot
                .certifications
                .iter()
                .map(|cert| classify::certification_status(&cert.expiration_date, today, rules))
                .collect()
        })
        .collect();

    DashboardSummary {
        total_flights: plans.len(),
        by_stage,
        pending_review: plans
            .iter()
            .filter(|plan| plan.status == FlightStage::Submitted)
            .count(),
        certified_pilots: statuses
            .iter()
            .filter(|certs| certs.contains(&CertificationStatus::Valid))
            .count(),
        certification_alerts: statuses
            .iter()
            .flatten()
            .filter(|status| **status != CertificationStatus::Valid)
            .count(),
        urgent_inspections: inventory
            .iter()
            .filter(|item| {
                classify::classify_inspection_days(item.days_until_inspection, rules)
                    == InspectionUrgency::Urgent
            })
            .count(),
    }
}
