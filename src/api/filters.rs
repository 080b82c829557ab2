// List filters rendered as query strings

use chrono::{DateTime, SecondsFormat, Utc};

type Params = Vec<(&'static str, Option<String>)>;

fn paging(page: Option<u32>, page_size: Option<u32>) -> Params {
    vec![
        ("page", page.map(|p| p.to_string())),
        ("page_size", page_size.map(|s| s.to_string())),
    ]
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlertFilter {
    pub severity: Option<String>,
    pub status: Option<String>,
    pub search: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl AlertFilter {
    pub fn params(&self) -> Params {
        let mut params = vec![
            ("severity", self.severity.clone()),
            ("status", self.status.clone()),
            ("search", self.search.clone()),
        ];
        params.extend(paging(self.page, self.page_size));
        params
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TicketFilter {
    pub status: Option<String>,
    pub priority: Option<String>,
    pub assignee: Option<String>,
    pub search: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl TicketFilter {
    pub fn params(&self) -> Params {
        let mut params = vec![
            ("status", self.status.clone()),
            ("priority", self.priority.clone()),
            ("assignee", self.assignee.clone()),
            ("search", self.search.clone()),
        ];
        params.extend(paging(self.page, self.page_size));
        params
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeviceFilter {
    pub device_type: Option<String>,
    pub status: Option<String>,
    pub search: Option<String>,
}

impl DeviceFilter {
    pub fn params(&self) -> Params {
        vec![
            ("device_type", self.device_type.clone()),
            ("status", self.status.clone()),
            ("search", self.search.clone()),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuditLogFilter {
    pub user: Option<String>,
    pub action: Option<String>,
    pub resource: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl AuditLogFilter {
    pub fn params(&self) -> Params {
        let timestamp = |t: &DateTime<Utc>| t.to_rfc3339_opts(SecondsFormat::Secs, true);
        let mut params = vec![
            ("user", self.user.clone()),
            ("action", self.action.clone()),
            ("resource", self.resource.clone()),
            ("from", self.from.as_ref().map(timestamp)),
            ("to", self.to.as_ref().map(timestamp)),
        ];
        params.extend(paging(self.page, self.page_size));
        params
    }
}
