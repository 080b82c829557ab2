// Device inventory endpoints

use crate::api::{segment, Device, DeviceFilter, DeviceInput};
use crate::error::ClientError;
use crate::http::{with_query, ClientContext, HttpClient};
use serde::de::IgnoredAny;

#[derive(Debug, Clone)]
pub struct DeviceService {
    http: HttpClient,
}

impl DeviceService {
    pub fn new(api_root: &str, ctx: &ClientContext) -> Self {
        Self {
            http: HttpClient::new(format!("{}/devices", api_root), "DeviceService", ctx),
        }
    }

    pub async fn list(&self, filter: &DeviceFilter) -> Result<Vec<Device>, ClientError> {
        self.http.get(&with_query("", &filter.params())).await
    }

    pub async fn get(&self, id: &str) -> Result<Device, ClientError> {
        self.http.get(&segment(id)?).await
    }

    pub async fn create(&self, device: &DeviceInput) -> Result<Device, ClientError> {
        self.http.post("", device).await
    }

    pub async fn update(&self, id: &str, device: &DeviceInput) -> Result<Device, ClientError> {
        self.http.put(&segment(id)?, device).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), ClientError> {
        let _: IgnoredAny = self.http.delete(&segment(id)?).await?;
        Ok(())
    }
}
