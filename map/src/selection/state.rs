use serde::Serialize;
use std::fmt;

use crate::geo::LatLng;
use crate::incident::{IncidentId, Mask, RegionTelemetry};

/// Lifecycle phase of the selection slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SelectionPhase {
    /// Nothing selected
    Idle,
    /// Detail fetches in flight
    DetailLoading,
    /// Region telemetry arrived (possibly empty)
    DetailReady,
    /// Region telemetry could not be fetched
    DetailFailed,
}

impl fmt::Display for SelectionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SelectionPhase::Idle => "idle",
            SelectionPhase::DetailLoading => "detail_loading",
            SelectionPhase::DetailReady => "detail_ready",
            SelectionPhase::DetailFailed => "detail_failed",
        };
        f.write_str(name)
    }
}

/// Captured at fetch start; a result is applied only while its token is still current.
///
/// The generation increases on every select and deselect, so re-selecting the same
/// incident also invalidates the earlier fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SelectionToken {
    pub generation: u64,
    pub incident_id: IncidentId,
}

/// The single currently-inspected incident and its loaded detail
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub incident_id: Option<IncidentId>,
    /// Where the user clicked; the viewport recenters here after fitting bounds
    pub click_position: Option<LatLng>,
    pub masks: Vec<Mask>,
    pub telemetry: Option<RegionTelemetry>,
    pub phase: SelectionPhase,
    /// Why telemetry is missing when the phase is `DetailFailed`
    pub failure: Option<String>,
}

impl Selection {
    pub fn idle() -> Self {
        Self {
            incident_id: None,
            click_position: None,
            masks: Vec::new(),
            telemetry: None,
            phase: SelectionPhase::Idle,
            failure: None,
        }
    }

    pub fn loading(incident_id: IncidentId, click_position: LatLng) -> Self {
        Self {
            incident_id: Some(incident_id),
            click_position: Some(click_position),
            phase: SelectionPhase::DetailLoading,
            ..Self::idle()
        }
    }

    pub fn is_idle(&self) -> bool {
        self.phase == SelectionPhase::Idle
    }
}

impl Default for Selection {
    fn default() -> Self {
        Self::idle()
    }
}
