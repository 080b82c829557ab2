// Ticket endpoints

use crate::api::{segment, NewTicket, Ticket, TicketFilter, TicketUpdate};
use crate::error::ClientError;
use crate::http::{with_query, ClientContext, HttpClient};
use serde::de::IgnoredAny;
use serde_json::json;

#[derive(Debug, Clone)]
pub struct TicketService {
    http: HttpClient,
}

impl TicketService {
    pub fn new(api_root: &str, ctx: &ClientContext) -> Self {
        Self {
            http: HttpClient::new(format!("{}/tickets", api_root), "TicketService", ctx),
        }
    }

    pub async fn list(&self, filter: &TicketFilter) -> Result<Vec<Ticket>, ClientError> {
        self.http.get(&with_query("", &filter.params())).await
    }

    pub async fn get(&self, id: &str) -> Result<Ticket, ClientError> {
        self.http.get(&segment(id)?).await
    }

    pub async fn create(&self, ticket: &NewTicket) -> Result<Ticket, ClientError> {
        self.http.post("", ticket).await
    }

    pub async fn update(&self, id: &str, update: &TicketUpdate) -> Result<Ticket, ClientError> {
        self.http.put(&segment(id)?, update).await
    }

    pub async fn update_status(&self, id: &str, status: &str) -> Result<Ticket, ClientError> {
        self.http
            .patch(&format!("{}/status", segment(id)?), &json!({ "status": status }))
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<(), ClientError> {
        let _: IgnoredAny = self.http.delete(&segment(id)?).await?;
        Ok(())
    }
}
