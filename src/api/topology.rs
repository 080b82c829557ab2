// Network topology endpoints

use crate::api::{segment, Device, TopologyGraph};
use crate::error::ClientError;
use crate::http::{ClientContext, HttpClient};

#[derive(Debug, Clone)]
pub struct TopologyService {
    http: HttpClient,
}

impl TopologyService {
    pub fn new(api_root: &str, ctx: &ClientContext) -> Self {
        Self {
            http: HttpClient::new(format!("{}/topology", api_root), "TopologyService", ctx),
        }
    }

    pub async fn graph(&self) -> Result<TopologyGraph, ClientError> {
        self.http.get("").await
    }

    pub async fn neighbors(&self, device_id: &str) -> Result<Vec<Device>, ClientError> {
        self.http
            .get(&format!("/devices{}/neighbors", segment(device_id)?))
            .await
    }
}
