//! Overlay module
//!
//! Turns incident masks into classified polygons and owns the lifecycle of the
//! polygons drawn on the map host.

pub mod manager;
pub mod types;

pub use manager::OverlayLifecycleManager;
pub use types::{MaskPolygons, OverlayKind, OverlayStyle, RenderedOverlay};
