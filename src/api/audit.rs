// Audit log endpoints

use crate::api::{segment, AuditLogEntry, AuditLogFilter};
use crate::error::ClientError;
use crate::http::{with_query, ClientContext, HttpClient};

#[derive(Debug, Clone)]
pub struct AuditLogService {
    http: HttpClient,
}

impl AuditLogService {
    pub fn new(api_root: &str, ctx: &ClientContext) -> Self {
        Self {
            http: HttpClient::new(format!("{}/audit-logs", api_root), "AuditLogService", ctx),
        }
    }

    pub async fn list(&self, filter: &AuditLogFilter) -> Result<Vec<AuditLogEntry>, ClientError> {
        self.http.get(&with_query("", &filter.params())).await
    }

    pub async fn get(&self, id: &str) -> Result<AuditLogEntry, ClientError> {
        self.http.get(&segment(id)?).await
    }
}
