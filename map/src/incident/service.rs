//! IncidentService trait definition

use async_trait::async_trait;

use super::types::{BoundaryPoint, IncidentError, IncidentId, Mask, RegionTelemetry, RosterEntry};

/// Trait for incident data providers (HTTP API or scripted test doubles)
#[async_trait]
pub trait IncidentService: Send + Sync {
    /// List the currently active incidents
    async fn list_incidents(&self) -> Result<Vec<RosterEntry>, IncidentError>;

    /// Get the fire-extent masks recorded for an incident
    async fn get_masks(&self, id: IncidentId) -> Result<Vec<Mask>, IncidentError>;

    /// Get the boundary samples used to fit the viewport (empty when unknown)
    async fn get_boundary_points(&self, id: IncidentId)
    -> Result<Vec<BoundaryPoint>, IncidentError>;

    /// Get the weather snapshot for the incident's region
    async fn get_region_telemetry(
        &self,
        id: IncidentId,
    ) -> Result<Vec<RegionTelemetry>, IncidentError>;
}
