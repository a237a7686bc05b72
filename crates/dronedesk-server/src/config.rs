//! Server configuration from environment.

use dronedesk_core::ClassifierRules;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    /// Load the seed roster, plans, inventory and news at startup
    pub seed_data: bool,
    /// Emit logs as JSON lines instead of the human format
    pub log_json: bool,
    pub classifier_rules: ClassifierRules,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            seed_data: true,
            log_json: false,
            classifier_rules: ClassifierRules::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let rules = defaults.classifier_rules;
        Self {
            server_port: env_parse("DRONEDESK_PORT").unwrap_or(defaults.server_port),
            seed_data: env_flag("DRONEDESK_SEED").unwrap_or(defaults.seed_data),
            log_json: env_flag("DRONEDESK_LOG_JSON").unwrap_or(defaults.log_json),
            classifier_rules: ClassifierRules {
                certification_warning_days: env_parse("DRONEDESK_CERT_WARNING_DAYS")
                    .unwrap_or(rules.certification_warning_days),
                inspection_warning_days: env_parse("DRONEDESK_INSPECTION_WARNING_DAYS")
                    .unwrap_or(rules.inspection_warning_days),
                inspection_urgent_days: env_parse("DRONEDESK_INSPECTION_URGENT_DAYS")
                    .unwrap_or(rules.inspection_urgent_days),
            },
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|value| value.trim().parse().ok())
}

fn env_flag(key: &str) -> Option<bool> {
    env::var(key)
        .ok()
        .and_then(|value| match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        })
}
