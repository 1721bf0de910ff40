//! Map host adapter
//!
//! The controller drives an external map surface through `MapHost`. Implementations
//! must tolerate `attach_overlay`/`detach_overlay` in any order: detaching a handle
//! that is unknown or already detached is a no-op. `fit_bounds` is fire-and-forget;
//! the controller never waits for the viewport animation to finish.

mod headless;

pub use headless::{HeadlessMapHost, HostCall, HostOverlay};

use serde::Serialize;
use std::fmt;

use crate::geo::{Envelope, LatLng};
use crate::incident::{Incident, IncidentId};
use crate::overlay::OverlayStyle;

/// Opaque handle into the host's overlay registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct OverlayHandle(pub u64);

impl fmt::Display for OverlayHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "overlay#{}", self.0)
    }
}

pub type ReadyCallback = Box<dyn FnOnce() + Send>;
pub type ClickCallback = Box<dyn Fn(LatLng) + Send + Sync>;
pub type MarkerClickCallback = Box<dyn Fn(IncidentId, LatLng) + Send + Sync>;
pub type InfoWindowClosedCallback = Box<dyn Fn() + Send + Sync>;

/// Binding to the map rendering surface
pub trait MapHost: Send + Sync {
    /// Recenter the viewport
    fn set_center(&self, point: LatLng);

    /// Set the zoom level
    fn set_zoom(&self, level: f64);

    /// Fit the viewport to an envelope with a pixel margin
    fn fit_bounds(&self, envelope: Envelope, padding_px: u32);

    /// Draw a polygon and return its handle
    fn attach_overlay(&self, polygon: &[LatLng], style: &OverlayStyle) -> OverlayHandle;

    /// Remove a polygon from the surface
    fn detach_overlay(&self, handle: OverlayHandle);

    /// Show an incident marker
    fn place_marker(&self, incident: &Incident);

    /// Run `callback` once the surface is ready (immediately if it already is)
    fn on_ready(&self, callback: ReadyCallback);

    /// Register a handler for clicks on the map background
    fn on_click(&self, callback: ClickCallback);

    /// Register a handler for clicks on incident markers
    fn on_marker_click(&self, callback: MarkerClickCallback);

    /// Register a handler for the info window being dismissed
    fn on_info_window_closed(&self, callback: InfoWindowClosedCallback);
}
