//! Headless map host that records every call
//!
//! Used by the command-line driver (which has no rendering surface) and by tests to
//! observe what the controller asked the map to do.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

use crate::geo::{Envelope, LatLng};
use crate::incident::{Incident, IncidentId};
use crate::overlay::{OverlayKind, OverlayStyle};

use super::{
    ClickCallback, InfoWindowClosedCallback, MapHost, MarkerClickCallback, OverlayHandle,
    ReadyCallback,
};

/// A call made against the host, in order
#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    SetCenter(LatLng),
    SetZoom(f64),
    FitBounds { envelope: Envelope, padding_px: u32 },
    Attach { handle: OverlayHandle, kind: OverlayKind },
    Detach(OverlayHandle),
    PlaceMarker(IncidentId),
}

/// Overlay currently drawn on the headless surface
#[derive(Debug, Clone, PartialEq)]
pub struct HostOverlay {
    pub handle: OverlayHandle,
    pub polygon: Vec<LatLng>,
    pub style: OverlayStyle,
}

#[derive(Default)]
struct HeadlessState {
    ready: bool,
    next_handle: u64,
    center: Option<LatLng>,
    zoom: Option<f64>,
    last_fit: Option<(Envelope, u32)>,
    overlays: BTreeMap<OverlayHandle, HostOverlay>,
    markers: Vec<Incident>,
    calls: Vec<HostCall>,
    ready_callbacks: Vec<ReadyCallback>,
    click_handlers: Vec<Arc<dyn Fn(LatLng) + Send + Sync>>,
    marker_handlers: Vec<Arc<dyn Fn(IncidentId, LatLng) + Send + Sync>>,
    closed_handlers: Vec<Arc<dyn Fn() + Send + Sync>>,
}

/// In-memory map surface
#[derive(Default)]
pub struct HeadlessMapHost {
    state: Mutex<HeadlessState>,
}

impl HeadlessMapHost {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, HeadlessState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Mark the surface ready and run pending ready callbacks
    pub fn mark_ready(&self) {
        let callbacks = {
            let mut state = self.state();
            state.ready = true;
            std::mem::take(&mut state.ready_callbacks)
        };
        for callback in callbacks {
            callback();
        }
    }

    /// Simulate a click on the map background
    pub fn click(&self, position: LatLng) {
        let handlers = self.state().click_handlers.clone();
        for handler in handlers {
            handler(position);
        }
    }

    /// Simulate a click on an incident marker. Returns false if no such marker exists.
    pub fn click_marker(&self, id: IncidentId) -> bool {
        let (position, handlers) = {
            let state = self.state();
            let Some(incident) = state.markers.iter().find(|m| m.id == id) else {
                return false;
            };
            (incident.position(), state.marker_handlers.clone())
        };
        for handler in handlers {
            handler(id, position);
        }
        true
    }

    /// Simulate the user dismissing the info window
    pub fn close_info_window(&self) {
        let handlers = self.state().closed_handlers.clone();
        for handler in handlers {
            handler();
        }
    }

    pub fn overlay_count(&self) -> usize {
        self.state().overlays.len()
    }

    /// Overlays currently drawn, in attach order
    pub fn overlays(&self) -> Vec<HostOverlay> {
        self.state().overlays.values().cloned().collect()
    }

    pub fn center(&self) -> Option<LatLng> {
        self.state().center
    }

    pub fn zoom(&self) -> Option<f64> {
        self.state().zoom
    }

    pub fn last_fit(&self) -> Option<(Envelope, u32)> {
        self.state().last_fit
    }

    pub fn markers(&self) -> Vec<Incident> {
        self.state().markers.clone()
    }

    pub fn calls(&self) -> Vec<HostCall> {
        self.state().calls.clone()
    }

    /// Drain the call log
    pub fn take_calls(&self) -> Vec<HostCall> {
        std::mem::take(&mut self.state().calls)
    }
}

impl MapHost for HeadlessMapHost {
    fn set_center(&self, point: LatLng) {
        let mut state = self.state();
        state.center = Some(point);
        state.calls.push(HostCall::SetCenter(point));
    }

    fn set_zoom(&self, level: f64) {
        let mut state = self.state();
        state.zoom = Some(level);
        state.calls.push(HostCall::SetZoom(level));
    }

    fn fit_bounds(&self, envelope: Envelope, padding_px: u32) {
        let mut state = self.state();
        state.last_fit = Some((envelope, padding_px));
        state.center = Some(envelope.center());
        state.calls.push(HostCall::FitBounds {
            envelope,
            padding_px,
        });
    }

    fn attach_overlay(&self, polygon: &[LatLng], style: &OverlayStyle) -> OverlayHandle {
        let mut state = self.state();
        state.next_handle += 1;
        let handle = OverlayHandle(state.next_handle);

        state.overlays.insert(
            handle,
            HostOverlay {
                handle,
                polygon: polygon.to_vec(),
                style: *style,
            },
        );
        state.calls.push(HostCall::Attach {
            handle,
            kind: style.kind,
        });
        handle
    }

    fn detach_overlay(&self, handle: OverlayHandle) {
        let mut state = self.state();
        if state.overlays.remove(&handle).is_none() {
            debug!("Ignoring detach of unknown {}", handle);
        }
        state.calls.push(HostCall::Detach(handle));
    }

    fn place_marker(&self, incident: &Incident) {
        let mut state = self.state();
        state.markers.retain(|m| m.id != incident.id);
        state.markers.push(*incident);
        state.calls.push(HostCall::PlaceMarker(incident.id));
    }

    fn on_ready(&self, callback: ReadyCallback) {
        let mut state = self.state();
        if state.ready {
            drop(state);
            callback();
        } else {
            state.ready_callbacks.push(callback);
        }
    }

    fn on_click(&self, callback: ClickCallback) {
        self.state().click_handlers.push(Arc::from(callback));
    }

    fn on_marker_click(&self, callback: MarkerClickCallback) {
        self.state().marker_handlers.push(Arc::from(callback));
    }

    fn on_info_window_closed(&self, callback: InfoWindowClosedCallback) {
        self.state().closed_handlers.push(Arc::from(callback));
    }
}
