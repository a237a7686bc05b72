//! Session context and navigation items.
//!
//! The admin flag is a capability carried with each request, never a
//! credential check.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Pilot,
    Admin,
}

impl Role {
    pub fn is_admin(self) -> bool {
        self == Role::Admin
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Pilot => "pilot",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "pilot" => Ok(Role::Pilot),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Team {
    pub name: &'static str,
    pub plan: &'static str,
}

pub fn teams() -> Vec<Team> {
    vec![
        Team {
            name: "Acme Inc",
            plan: "Pro Plan",
        },
        Team {
            name: "Acme Corp",
            plan: "Free Plan",
        },
    ]
}

/// Explicit session passed to every view instead of shell-local toggles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub role: Role,
    pub active_team: String,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            role: Role::Pilot,
            active_team: teams()[0].name.to_string(),
        }
    }
}

impl Session {
    pub fn new(role: Role, active_team: Option<&str>) -> Self {
        let mut session = Self {
            role,
            ..Self::default()
        };
        if let Some(team) = active_team.filter(|team| teams().iter().any(|t| t.name == *team)) {
            session.active_team = team.to_string();
        }
        session
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub title: &'static str,
    pub url: &'static str,
    pub admin: bool,
}

const REGULAR_ITEMS: [(&str, &str); 4] = [
    ("Dashboard", "/"),
    ("Flight Plan", "/flight-plan"),
    ("Inventory", "/inventory"),
    ("News and Updates", "/news"),
];

const ADMIN_ITEMS: [(&str, &str); 3] = [
    ("Review Flight Plans", "/admin/review-flight-plans"),
    ("Pilot Management", "/admin/pilots"),
    ("Reports", "/admin/reports"),
];

/// Links visible to the session; admin links only in admin mode.
pub fn nav_items(session: &Session) -> Vec<NavItem> {
    let regular = REGULAR_ITEMS.into_iter().map(|(title, url)| NavItem {
        title,
        url,
        admin: false,
    });
    let admin = ADMIN_ITEMS
        .into_iter()
        .filter(|_| session.role.is_admin())
        .map(|(title, url)| NavItem {
            title,
            url,
            admin: true,
        });
    regular.chain(admin).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pilots_see_regular_links_only() {
        let items = nav_items(&Session::default());
        assert_eq!(items.len(), 4);
        assert!(items.iter().all(|item| !item.admin));
    }

    #[test]
    fn admins_see_review_and_roster() {
        let items = nav_items(&Session::new(Role::Admin, None));
        assert_eq!(items.len(), 7);
        assert!(items.iter().any(|item| item.url == "/admin/review-flight-plans"));
    }

    #[test]
    fn unknown_team_keeps_default() {
        assert_eq!(Session::new(Role::Pilot, Some("Globex")).active_team, "Acme Inc");
        assert_eq!(Session::new(Role::Pilot, Some("Acme Corp")).active_team, "Acme Corp");
    }

    #[test]
    fn role_parses() {
        assert_eq!("Admin".parse::<Role>(), Ok(Role::Admin));
        assert!("owner".parse::<Role>().is_err());
    }
}
