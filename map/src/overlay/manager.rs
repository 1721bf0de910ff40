//! Overlay lifecycle manager
//!
//! The host surface does not garbage-collect polygons, so every overlay the controller
//! draws is tracked here and explicitly detached before the next set goes up.

use metrics::counter;
use std::sync::Arc;
use tracing::debug;

use crate::host::MapHost;

use super::types::{MaskPolygons, OverlayKind, RenderedOverlay};

/// Owns the overlays currently drawn for the active selection
pub struct OverlayLifecycleManager {
    host: Arc<dyn MapHost>,
    live: Vec<RenderedOverlay>,
}

impl OverlayLifecycleManager {
    pub fn new(host: Arc<dyn MapHost>) -> Self {
        Self {
            host,
            live: Vec::new(),
        }
    }

    /// Replace every tracked overlay with the given polygon sets.
    ///
    /// All previous overlays are detached before the first new one is attached.
    /// Predicted footprints are attached before active ones. Returns the number of
    /// overlays attached.
    pub fn replace_overlays(&mut self, sets: &[MaskPolygons]) -> usize {
        self.clear();

        for kind in OverlayKind::DRAW_ORDER {
            let style = kind.style();
            for set in sets {
                let polygon = set.polygon(kind);
                if polygon.is_empty() {
                    continue;
                }
                let handle = self.host.attach_overlay(polygon, style);
                self.live.push(RenderedOverlay {
                    mask_id: set.mask_id,
                    kind,
                    handle,
                });
            }
        }

        let attached = self.live.len();
        if attached > 0 {
            counter!("emberalert_overlays_attached_total").increment(attached as u64);
        }
        debug!(
            "Attached {} overlay(s) for {} mask(s)",
            attached,
            sets.len()
        );
        attached
    }

    /// Detach every tracked overlay. Returns the number detached.
    pub fn clear(&mut self) -> usize {
        let detached = self.live.len();
        for overlay in self.live.drain(..) {
            self.host.detach_overlay(overlay.handle);
        }
        if detached > 0 {
            counter!("emberalert_overlays_detached_total").increment(detached as u64);
            debug!("Detached {} overlay(s)", detached);
        }
        detached
    }

    pub fn overlays(&self) -> &[RenderedOverlay] {
        &self.live
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }
}

impl Drop for OverlayLifecycleManager {
    fn drop(&mut self) {
        self.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::LatLng;
    use crate::host::{HeadlessMapHost, HostCall};

    fn square(mask_id: i64) -> MaskPolygons {
        MaskPolygons {
            mask_id,
            active: vec![
                LatLng::new(38.0, -121.0),
                LatLng::new(38.1, -121.0),
                LatLng::new(38.1, -121.1),
            ],
            predicted: vec![
                LatLng::new(38.0, -121.0),
                LatLng::new(38.2, -121.0),
                LatLng::new(38.2, -121.2),
            ],
        }
    }

    fn setup() -> (Arc<HeadlessMapHost>, OverlayLifecycleManager) {
        let host = Arc::new(HeadlessMapHost::new());
        let manager = OverlayLifecycleManager::new(host.clone());
        (host, manager)
    }

    #[test]
    fn test_replace_attaches_predicted_beneath_active() {
        let (host, mut manager) = setup();

        let attached = manager.replace_overlays(&[square(1)]);

        assert_eq!(attached, 2);
        let kinds: Vec<OverlayKind> = host
            .calls()
            .into_iter()
            .filter_map(|call| match call {
                HostCall::Attach { kind, .. } => Some(kind),
                _ => None,
            })
            .collect();
        assert_eq!(kinds, vec![OverlayKind::Predicted, OverlayKind::Active]);
    }

    #[test]
    fn test_replace_detaches_old_before_attaching_new() {
        let (host, mut manager) = setup();
        manager.replace_overlays(&[square(1)]);
        host.take_calls();

        manager.replace_overlays(&[square(2)]);

        let calls = host.calls();
        let first_attach = calls
            .iter()
            .position(|c| matches!(c, HostCall::Attach { .. }))
            .unwrap();
        let last_detach = calls
            .iter()
            .rposition(|c| matches!(c, HostCall::Detach(_)))
            .unwrap();
        assert!(last_detach < first_attach);
        assert_eq!(host.overlay_count(), 2);
        assert!(manager.overlays().iter().all(|o| o.mask_id == 2));
    }

    #[test]
    fn test_replace_is_idempotent() {
        let (host, mut manager) = setup();

        manager.replace_overlays(&[square(1), square(2)]);
        let first: Vec<_> = host.overlays().into_iter().map(|o| o.polygon).collect();
        manager.replace_overlays(&[square(1), square(2)]);
        let second: Vec<_> = host.overlays().into_iter().map(|o| o.polygon).collect();

        assert_eq!(host.overlay_count(), 4);
        assert_eq!(manager.len(), 4);
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_replacement_leaves_nothing_attached() {
        let (host, mut manager) = setup();

        manager.replace_overlays(&[square(1)]);
        manager.replace_overlays(&[]);
        manager.replace_overlays(&[]);

        assert_eq!(host.overlay_count(), 0);
        assert!(manager.is_empty());
    }

    #[test]
    fn test_empty_footprints_are_not_drawn() {
        let (host, mut manager) = setup();
        let mut only_active = square(5);
        only_active.predicted.clear();

        manager.replace_overlays(&[only_active, MaskPolygons::default()]);

        assert_eq!(host.overlay_count(), 1);
        assert_eq!(manager.overlays()[0].kind, OverlayKind::Active);
    }

    #[test]
    fn test_drop_detaches_everything() {
        let (host, mut manager) = setup();
        manager.replace_overlays(&[square(1)]);
        drop(manager);
        assert_eq!(host.overlay_count(), 0);
    }
}
