//! HTTP incident service backed by the incident API

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use crate::config::{ApiConfig, CONNECT_TIMEOUT};

use super::service::IncidentService;
use super::types::{
    BoundaryPoint, IncidentError, IncidentId, Mask, RegionTelemetry, RosterEntry, lenient_roster,
};

/// Incident service that reads from the `/map/*` endpoints of the incident API
#[derive(Clone)]
pub struct HttpIncidentService {
    client: reqwest::Client,
    base_url: String,
    request_timeout: Option<Duration>,
}

impl HttpIncidentService {
    /// Create a new HttpIncidentService
    pub fn new(config: &ApiConfig) -> Result<Self, IncidentError> {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .user_agent(concat!("emberalert-map/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self::with_client(client, config))
    }

    /// Create a service that shares an existing client
    pub fn with_client(client: reqwest::Client, config: &ApiConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            request_timeout: config.request_timeout,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, IncidentError> {
        let url = self.url(path);
        debug!("GET {}", url);

        let mut request = self.client.get(&url);
        if let Some(timeout) = self.request_timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(IncidentError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.bytes().await.map_err(|e| self.map_send_error(e))?;
        serde_json::from_slice(&body).map_err(|e| IncidentError::Decode {
            url,
            message: e.to_string(),
        })
    }

    fn map_send_error(&self, error: reqwest::Error) -> IncidentError {
        match (error.is_timeout(), self.request_timeout) {
            (true, Some(timeout)) => IncidentError::Timeout(timeout),
            _ => IncidentError::Transport(error),
        }
    }
}

#[async_trait]
impl IncidentService for HttpIncidentService {
    async fn list_incidents(&self) -> Result<Vec<RosterEntry>, IncidentError> {
        let raw: Vec<serde_json::Value> = self.get_json("/map/get-fires").await?;
        Ok(lenient_roster(raw))
    }

    async fn get_masks(&self, id: IncidentId) -> Result<Vec<Mask>, IncidentError> {
        self.get_json(&format!("/map/get-fire-mask/{}", id)).await
    }

    async fn get_boundary_points(
        &self,
        id: IncidentId,
    ) -> Result<Vec<BoundaryPoint>, IncidentError> {
        self.get_json(&format!("/map/get-min-max/{}", id)).await
    }

    async fn get_region_telemetry(
        &self,
        id: IncidentId,
    ) -> Result<Vec<RegionTelemetry>, IncidentError> {
        self.get_json(&format!("/map/get-region-data/{}", id)).await
    }
}
