// Alert endpoints

use crate::api::{segment, Alert, AlertAnalysis, AlertFilter, Ticket};
use crate::error::ClientError;
use crate::http::{with_query, ClientContext, HttpClient};
use serde_json::json;

#[derive(Debug, Clone)]
pub struct AlertService {
    http: HttpClient,
}

impl AlertService {
    pub fn new(api_root: &str, ctx: &ClientContext) -> Self {
        Self {
            http: HttpClient::new(format!("{}/alerts", api_root), "AlertService", ctx),
        }
    }

    pub async fn list(&self, filter: &AlertFilter) -> Result<Vec<Alert>, ClientError> {
        self.http.get(&with_query("", &filter.params())).await
    }

    pub async fn get(&self, id: &str) -> Result<Alert, ClientError> {
        self.http.get(&segment(id)?).await
    }

    pub async fn acknowledge(&self, id: &str) -> Result<Alert, ClientError> {
        self.http
            .post(&format!("{}/acknowledge", segment(id)?), &json!({}))
            .await
    }

    pub async fn resolve(&self, id: &str) -> Result<Alert, ClientError> {
        self.http.post(&format!("{}/resolve", segment(id)?), &json!({})).await
    }

    /// AI-generated analysis for an alert
    pub async fn analysis(&self, id: &str) -> Result<AlertAnalysis, ClientError> {
        self.http.get(&format!("{}/analysis", segment(id)?)).await
    }

    /// Open a ticket pre-filled from the alert
    pub async fn create_ticket(&self, id: &str) -> Result<Ticket, ClientError> {
        self.http.post(&format!("{}/ticket", segment(id)?), &json!({})).await
    }
}
