//! HTTP client for the DroneDesk REST API.

use anyhow::{bail, Result};
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use dronedesk_core::{
    FlightPlan, FlightStage, InventoryItem, MapPoint, NewsUpdate, Pilot, PlanCommand, PlanPatch,
    Role,
};

/// Client for one DroneDesk server, acting with a fixed role.
#[derive(Clone)]
pub struct DeskClient {
    base_url: String,
    role: Role,
    client: reqwest::Client,
}

/// Planner state returned by the flight-plan endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct PlanState {
    pub plan: FlightPlan,
    pub step: String,
    pub step_title: String,
    pub progress_percent: f64,
}

/// Result of a lifecycle command or wizard advance.
#[derive(Debug, Clone, Deserialize)]
pub struct CommandOutcome {
    pub stage: FlightStage,
    #[serde(flatten)]
    pub state: PlanState,
}

/// One review-queue row.
#[derive(Debug, Clone, Deserialize)]
pub struct PlanRow {
    pub id: Option<String>,
    pub pilot_name: Option<String>,
    pub date: String,
    pub location: String,
    pub stage: FlightStage,
    pub status: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
    #[serde(default)]
    violations: Vec<ViolationBody>,
}

#[derive(Debug, Deserialize)]
struct ViolationBody {
    field: String,
    message: String,
}

impl DeskClient {
    pub fn new(base_url: impl Into<String>, role: Role) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            role,
            client: reqwest::Client::new(),
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// Same server, different role.
    pub fn as_role(&self, role: Role) -> Self {
        Self {
            role,
            ..self.clone()
        }
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.client
            .get(format!("{}{}", self.base_url, path))
            .header("x-dronedesk-role", self.role.as_str())
    }

    fn post(&self, path: &str) -> RequestBuilder {
        self.client
            .post(format!("{}{}", self.base_url, path))
            .header("x-dronedesk-role", self.role.as_str())
    }

    pub async fn list_plans(&self, search: &str) -> Result<Vec<PlanRow>> {
        read(self.get("/v1/flight-plans").query(&[("q", search)]).send().await?).await
    }

    pub async fn get_plan(&self, id: &str) -> Result<PlanState> {
        read(self.get(&format!("/v1/flight-plans/{}", id)).send().await?).await
    }

    /// Derived stage view as raw JSON.
    pub async fn stage_view(&self, id: &str) -> Result<Value> {
        read(self.get(&format!("/v1/flight-plans/{}/view", id)).send().await?).await
    }

    pub async fn create_plan(&self, draft: &PlanPatch) -> Result<PlanState> {
        read(self.post("/v1/flight-plans").json(draft).send().await?).await
    }

    pub async fn add_point(&self, id: &str, point: MapPoint) -> Result<PlanState> {
        read(
            self.post(&format!("/v1/flight-plans/{}/points", id))
                .json(&point)
                .send()
                .await?,
        )
        .await
    }

    pub async fn next_step(&self, id: &str) -> Result<CommandOutcome> {
        read(
            self.post(&format!("/v1/flight-plans/{}/wizard/next", id))
                .json(&serde_json::json!({}))
                .send()
                .await?,
        )
        .await
    }

    pub async fn command(&self, id: &str, command: &PlanCommand) -> Result<CommandOutcome> {
        read(
            self.post(&format!("/v1/flight-plans/{}/commands", id))
                .json(command)
                .send()
                .await?,
        )
        .await
    }

    /// Record actuals and sign the flight off.
    pub async fn complete(&self, id: &str, actuals: &PlanPatch) -> Result<PlanState> {
        read(
            self.post(&format!("/v1/flight-plans/{}/completion", id))
                .json(actuals)
                .send()
                .await?,
        )
        .await
    }

    pub async fn list_pilots(&self, search: &str) -> Result<Vec<Pilot>> {
        read(self.get("/v1/pilots").query(&[("q", search)]).send().await?).await
    }

    pub async fn inventory(&self) -> Result<Vec<InventoryItem>> {
        read(self.get("/v1/inventory").send().await?).await
    }

    pub async fn news(&self, update_type: Option<&str>) -> Result<Vec<NewsUpdate>> {
        let mut request = self.get("/v1/news");
        if let Some(update_type) = update_type {
            request = request.query(&[("type", update_type)]);
        }
        read(request.send().await?).await
    }
}

async fn read<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let text = response.text().await.unwrap_or_default();
    match serde_json::from_str::<ErrorBody>(&text) {
        Ok(body) if body.violations.is_empty() => bail!("{}: {}", status, body.error),
        Ok(body) => {
            let details: Vec<String> = body
                .violations
                .iter()
                .map(|violation| format!("{}: {}", violation.field, violation.message))
                .collect();
            bail!("{}: {} ({})", status, body.error, details.join("; "))
        }
        Err(_) => bail!("{}: {}", status, text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_body_is_tagged() {
        let command = PlanCommand::Approve {
            feedback: Some("ok".to_string()),
        };
        let body = serde_json::to_value(&command).unwrap();
        assert_eq!(body["command"], "approve");
        assert_eq!(body["feedback"], "ok");
    }

    #[test]
    fn outcome_reads_flattened_state() {
        let body = serde_json::json!({
            "stage": "Pre-Flight",
            "plan": { "id": "FP003", "status": "Pre-Flight" },
            "step": "review_and_submit",
            "step_index": 3,
            "step_title": "Review & Submit",
            "progress_percent": 80.0
        });
        let outcome: CommandOutcome = serde_json::from_value(body).unwrap();
        assert_eq!(outcome.stage, FlightStage::PreFlight);
        assert_eq!(outcome.state.plan.id.as_deref(), Some("FP003"));
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = DeskClient::new("http://localhost:3000/", Role::Admin);
        assert_eq!(client.base_url, "http://localhost:3000");
        assert!(client.as_role(Role::Pilot).role() == Role::Pilot);
    }
}
