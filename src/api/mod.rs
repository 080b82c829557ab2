// Feature-area services: one method per backend endpoint

pub mod alerts;
pub mod audit;
pub mod auth;
pub mod devices;
pub mod filters;
pub mod models;
pub mod tickets;
pub mod topology;


pub use alerts::AlertService;
pub use audit::AuditLogService;
pub use auth::AuthService;
pub use devices::DeviceService;
pub use filters::{AlertFilter, AuditLogFilter, DeviceFilter, TicketFilter};
pub use models::*;
pub use tickets::TicketService;
pub use topology::TopologyService;

use crate::error::ClientError;
use crate::http::ClientContext;

/// Every service, built against one API root and context
#[derive(Debug, Clone)]
pub struct Services {
    pub auth: AuthService,
    pub alerts: AlertService,
    pub tickets: TicketService,
    pub devices: DeviceService,
    pub topology: TopologyService,
    pub audit: AuditLogService,
}

impl Services {
    pub fn new(api_root: &str, ctx: &ClientContext) -> Self {
        Self {
            auth: AuthService::new(api_root, ctx),
            alerts: AlertService::new(api_root, ctx),
            tickets: TicketService::new(api_root, ctx),
            devices: DeviceService::new(api_root, ctx),
            topology: TopologyService::new(api_root, ctx),
            audit: AuditLogService::new(api_root, ctx),
        }
    }
}

/// Validate an identifier before it becomes a path segment
pub(crate) fn segment(id: &str) -> Result<String, ClientError> {
    if id.is_empty() {
        return Err(ClientError::InvalidRequest("identifier cannot be empty".to_string()));
    }

    if id.chars().any(|c| matches!(c, '/' | '?' | '#' | '%') || c.is_whitespace() || c.is_control()) {
        return Err(ClientError::InvalidRequest(format!(
            "identifier '{}' contains characters not allowed in a path",
            id.escape_debug()
        )));
    }

    Ok(format!("/{}", id))
}
