//! Test Utilities Module
//!
//! Scripted incident service and fixture builders shared by the unit tests.
//! This module is only compiled when running tests.

#![cfg(test)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{Notify, watch};

use crate::incident::{
    BoundaryPoint, FireStatus, IncidentError, IncidentId, IncidentService, Mask, MaskPoint,
    RegionTelemetry, RosterEntry,
};

// ============================================================================
// Gates
// ============================================================================

/// Holds a scripted response until the test releases it
#[derive(Clone)]
pub struct Gate {
    requested: Arc<Notify>,
    released: Arc<watch::Sender<bool>>,
}

impl Gate {
    fn new() -> Self {
        let (released, _) = watch::channel(false);
        Self {
            requested: Arc::new(Notify::new()),
            released: Arc::new(released),
        }
    }

    /// Wait until the gated fetch has been issued
    pub async fn wait_until_requested(&self) {
        self.requested.notified().await;
    }

    /// Let the gated fetch (and any later one) complete
    pub fn release(&self) {
        self.released.send_replace(true);
    }

    async fn pass(&self) {
        self.requested.notify_one();
        let mut released = self.released.subscribe();
        // The sender lives in `self`, so the channel cannot close here
        let _ = released.wait_for(|open| *open).await;
    }
}

// ============================================================================
// Scripted incident service
// ============================================================================

type Scripted<T> = Result<T, String>;

/// Incident service returning canned responses.
///
/// Facets with nothing scripted for an incident answer with an empty list.
#[derive(Default)]
pub struct ScriptedIncidentService {
    roster: Option<Scripted<Vec<RosterEntry>>>,
    masks: HashMap<IncidentId, Scripted<Vec<Mask>>>,
    bounds: HashMap<IncidentId, Scripted<Vec<BoundaryPoint>>>,
    telemetry: HashMap<IncidentId, Scripted<Vec<RegionTelemetry>>>,
    mask_gates: Mutex<HashMap<IncidentId, Gate>>,
}

impl ScriptedIncidentService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_roster(mut self, roster: Vec<RosterEntry>) -> Self {
        self.roster = Some(Ok(roster));
        self
    }

    pub fn with_roster_failure(mut self, message: &str) -> Self {
        self.roster = Some(Err(message.to_string()));
        self
    }

    pub fn with_masks(mut self, id: IncidentId, masks: Vec<Mask>) -> Self {
        self.masks.insert(id, Ok(masks));
        self
    }

    pub fn with_mask_failure(mut self, id: IncidentId, message: &str) -> Self {
        self.masks.insert(id, Err(message.to_string()));
        self
    }

    pub fn with_bounds(mut self, id: IncidentId, points: Vec<BoundaryPoint>) -> Self {
        self.bounds.insert(id, Ok(points));
        self
    }

    pub fn with_bounds_failure(mut self, id: IncidentId, message: &str) -> Self {
        self.bounds.insert(id, Err(message.to_string()));
        self
    }

    pub fn with_telemetry(mut self, id: IncidentId, records: Vec<RegionTelemetry>) -> Self {
        self.telemetry.insert(id, Ok(records));
        self
    }

    pub fn with_telemetry_failure(mut self, id: IncidentId, message: &str) -> Self {
        self.telemetry.insert(id, Err(message.to_string()));
        self
    }

    /// Hold the mask response for `id` until the returned gate is released
    pub fn gate_masks(&self, id: IncidentId) -> Gate {
        let gate = Gate::new();
        self.mask_gates.lock().unwrap().insert(id, gate.clone());
        gate
    }

    fn answer<T: Clone>(
        scripted: Option<&Scripted<Vec<T>>>,
    ) -> Result<Vec<T>, IncidentError> {
        match scripted {
            Some(Ok(values)) => Ok(values.clone()),
            Some(Err(message)) => Err(IncidentError::Unavailable(message.clone())),
            None => Ok(Vec::new()),
        }
    }
}

#[async_trait]
impl IncidentService for ScriptedIncidentService {
    async fn list_incidents(&self) -> Result<Vec<RosterEntry>, IncidentError> {
        Self::answer(self.roster.as_ref())
    }

    async fn get_masks(&self, id: IncidentId) -> Result<Vec<Mask>, IncidentError> {
        let gate = self.mask_gates.lock().unwrap().get(&id).cloned();
        if let Some(gate) = gate {
            gate.pass().await;
        }
        Self::answer(self.masks.get(&id))
    }

    async fn get_boundary_points(
        &self,
        id: IncidentId,
    ) -> Result<Vec<BoundaryPoint>, IncidentError> {
        Self::answer(self.bounds.get(&id))
    }

    async fn get_region_telemetry(
        &self,
        id: IncidentId,
    ) -> Result<Vec<RegionTelemetry>, IncidentError> {
        Self::answer(self.telemetry.get(&id))
    }
}

// ============================================================================
// Fixtures
// ============================================================================

pub fn boundary(lat: f64, lng: f64) -> BoundaryPoint {
    BoundaryPoint { lat, lng }
}

/// Mask from explicit `(lat, lng, status)` vertices
pub fn mask_with(mask_id: i64, vertices: &[(f64, f64, FireStatus)]) -> Mask {
    Mask {
        mask_id,
        points: vertices
            .iter()
            .enumerate()
            .map(|(i, &(latitude, longitude, status))| MaskPoint {
                point_id: Some(i as i64),
                latitude,
                longitude,
                status,
            })
            .collect(),
    }
}

/// Mask with a small active triangle and a larger predicted one around `(lat, lng)`
pub fn triangle_mask(mask_id: i64, lat: f64, lng: f64) -> Mask {
    mask_with(
        mask_id,
        &[
            (lat, lng, FireStatus::Active),
            (lat + 0.05, lng, FireStatus::Active),
            (lat + 0.05, lng - 0.05, FireStatus::Active),
            (lat, lng, FireStatus::Prediction),
            (lat + 0.1, lng, FireStatus::Prediction),
            (lat + 0.1, lng - 0.1, FireStatus::Prediction),
        ],
    )
}

pub fn sample_telemetry() -> RegionTelemetry {
    RegionTelemetry {
        generation_date: "2024-05-14T06:00:00Z".to_string(),
        wind_speed: 3.85,
        wind_direction_degrees: 225.0,
        min_temperature_kelvin: 281.15,
        max_temperature_kelvin: 295.65,
        humidity_percent: 41.0,
        precipitation_mm: 0.2,
    }
}
