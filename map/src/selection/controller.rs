use metrics::{counter, histogram};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::MapConfig;
use crate::geo::{LatLng, compute_bounding_envelope};
use crate::host::MapHost;
use crate::incident::{
    BoundaryPoint, IncidentError, IncidentId, IncidentService, Mask, RegionTelemetry,
};
use crate::overlay::{MaskPolygons, OverlayLifecycleManager, RenderedOverlay};

use super::state::{Selection, SelectionPhase, SelectionToken};

/// Selection slot plus the generation counter used for tokens
struct SelectionSlot {
    generation: u64,
    selection: Selection,
}

impl SelectionSlot {
    fn is_current(&self, token: SelectionToken) -> bool {
        self.generation == token.generation && self.selection.incident_id == Some(token.incident_id)
    }
}

/// Selection state machine: turns marker clicks into detail fetches, overlays and
/// viewport changes.
///
/// Lock order is always slot, then overlays.
pub struct SelectionController {
    service: Arc<dyn IncidentService>,
    host: Arc<dyn MapHost>,
    fit_padding_px: u32,
    slot: Mutex<SelectionSlot>,
    overlays: Mutex<OverlayLifecycleManager>,
}

impl SelectionController {
    pub fn new(
        service: Arc<dyn IncidentService>,
        host: Arc<dyn MapHost>,
        config: &MapConfig,
    ) -> Self {
        Self {
            overlays: Mutex::new(OverlayLifecycleManager::new(host.clone())),
            service,
            host,
            fit_padding_px: config.fit_padding_px,
            slot: Mutex::new(SelectionSlot {
                generation: 0,
                selection: Selection::idle(),
            }),
        }
    }

    /// Select an incident and load its detail.
    ///
    /// Resolves once all three detail fetches have completed (or been discarded because
    /// a newer selection took over).
    pub async fn select(&self, incident_id: IncidentId, click_position: LatLng) -> SelectionToken {
        let token = self.begin_selection(incident_id, click_position).await;
        self.load_detail(token).await;
        token
    }

    /// Overwrite the selection slot and tear down the previous overlays.
    ///
    /// Any fetch still in flight for an earlier token will be discarded on arrival.
    pub async fn begin_selection(
        &self,
        incident_id: IncidentId,
        click_position: LatLng,
    ) -> SelectionToken {
        let mut slot = self.slot.lock().await;
        slot.generation += 1;
        slot.selection = Selection::loading(incident_id, click_position);
        self.overlays.lock().await.clear();

        counter!("emberalert_selections_total").increment(1);
        info!(
            "Selected incident {} (generation {})",
            incident_id, slot.generation
        );

        SelectionToken {
            generation: slot.generation,
            incident_id,
        }
    }

    /// Run the mask, boundary and telemetry fetches for `token` concurrently
    pub async fn load_detail(&self, token: SelectionToken) {
        let start = Instant::now();
        let id = token.incident_id;

        let masks = async {
            let result = self.service.get_masks(id).await;
            self.apply_masks(token, result).await;
        };
        let bounds = async {
            let result = self.service.get_boundary_points(id).await;
            self.apply_bounds(token, result).await;
        };
        let telemetry = async {
            let result = self.service.get_region_telemetry(id).await;
            self.apply_telemetry(token, result).await;
        };

        tokio::join!(masks, bounds, telemetry);

        histogram!("emberalert_detail_load_duration_seconds").record(start.elapsed());
    }

    /// Clear the selection and every overlay
    pub async fn deselect(&self) {
        let mut slot = self.slot.lock().await;
        slot.generation += 1;
        let previous = slot.selection.incident_id;
        slot.selection = Selection::idle();
        self.overlays.lock().await.clear();

        if let Some(id) = previous {
            info!("Deselected incident {}", id);
        }
    }

    /// Snapshot of the current selection
    pub async fn selection(&self) -> Selection {
        self.slot.lock().await.selection.clone()
    }

    pub async fn phase(&self) -> SelectionPhase {
        self.slot.lock().await.selection.phase
    }

    pub async fn is_current(&self, token: SelectionToken) -> bool {
        self.slot.lock().await.is_current(token)
    }

    pub async fn overlay_count(&self) -> usize {
        self.overlays.lock().await.len()
    }

    pub async fn rendered_overlays(&self) -> Vec<RenderedOverlay> {
        self.overlays.lock().await.overlays().to_vec()
    }

    async fn apply_masks(&self, token: SelectionToken, result: Result<Vec<Mask>, IncidentError>) {
        let mut slot = self.slot.lock().await;
        if !slot.is_current(token) {
            discard_stale("mask", token);
            return;
        }

        let masks = match result {
            Ok(masks) => masks,
            Err(e) => {
                counter!("emberalert_detail_fetch_failures_total", "facet" => "mask").increment(1);
                warn!(
                    "Error fetching fire mask for incident {}: {}",
                    token.incident_id, e
                );
                return;
            }
        };

        let polygons: Vec<MaskPolygons> = masks.iter().map(MaskPolygons::from_mask).collect();
        let attached = self.overlays.lock().await.replace_overlays(&polygons);
        debug!(
            "Incident {}: {} mask(s), {} overlay(s)",
            token.incident_id,
            masks.len(),
            attached
        );
        slot.selection.masks = masks;
    }

    async fn apply_bounds(
        &self,
        token: SelectionToken,
        result: Result<Vec<BoundaryPoint>, IncidentError>,
    ) {
        let slot = self.slot.lock().await;
        if !slot.is_current(token) {
            discard_stale("bounds", token);
            return;
        }

        let points = match result {
            Ok(points) => points,
            Err(e) => {
                counter!("emberalert_detail_fetch_failures_total", "facet" => "bounds")
                    .increment(1);
                warn!(
                    "Error fetching fire bounds for incident {}: {}",
                    token.incident_id, e
                );
                return;
            }
        };

        let envelope = match compute_bounding_envelope(points) {
            Ok(envelope) => envelope,
            Err(_) => {
                debug!(
                    "No bounds available for incident {}, keeping viewport",
                    token.incident_id
                );
                return;
            }
        };

        self.host.fit_bounds(envelope, self.fit_padding_px);
        if let Some(click) = slot.selection.click_position {
            self.host.set_center(click);
        }
    }

    async fn apply_telemetry(
        &self,
        token: SelectionToken,
        result: Result<Vec<RegionTelemetry>, IncidentError>,
    ) {
        let mut slot = self.slot.lock().await;
        if !slot.is_current(token) {
            discard_stale("telemetry", token);
            return;
        }

        match result {
            Ok(records) => {
                let telemetry = records.into_iter().next();
                if telemetry.is_none() {
                    debug!("No region data for incident {}", token.incident_id);
                }
                slot.selection.telemetry = telemetry;
                slot.selection.failure = None;
                slot.selection.phase = SelectionPhase::DetailReady;
            }
            Err(e) => {
                counter!("emberalert_detail_fetch_failures_total", "facet" => "telemetry")
                    .increment(1);
                warn!(
                    "Failed to fetch region data for incident {}: {}",
                    token.incident_id, e
                );
                slot.selection.telemetry = None;
                slot.selection.failure = Some(e.to_string());
                slot.selection.phase = SelectionPhase::DetailFailed;
            }
        }
    }
}

fn discard_stale(facet: &'static str, token: SelectionToken) {
    counter!("emberalert_stale_results_discarded_total", "facet" => facet).increment(1);
    debug!(
        "Discarding stale {} result for incident {} (generation {})",
        facet, token.incident_id, token.generation
    );
}
