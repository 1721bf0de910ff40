//! Overlay classification, styling and polygon sets

use serde::Serialize;

use crate::geo::LatLng;
use crate::host::OverlayHandle;
use crate::incident::{FireStatus, Mask};

/// Classification of a rendered footprint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum OverlayKind {
    /// Observed fire footprint
    Active,
    /// Model-predicted spread
    Predicted,
}

/// Visual style of a footprint polygon
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OverlayStyle {
    pub kind: OverlayKind,
    pub stroke_color: &'static str,
    pub stroke_opacity: f32,
    pub stroke_weight: u32,
    pub fill_color: &'static str,
    pub fill_opacity: f32,
    pub z_index: i32,
}

const ACTIVE_STYLE: OverlayStyle = OverlayStyle {
    kind: OverlayKind::Active,
    stroke_color: "#FF0000",
    stroke_opacity: 0.6,
    stroke_weight: 2,
    fill_color: "#FF0000",
    fill_opacity: 0.35,
    z_index: 1000,
};

const PREDICTED_STYLE: OverlayStyle = OverlayStyle {
    kind: OverlayKind::Predicted,
    stroke_color: "#FFFF00",
    stroke_opacity: 0.6,
    stroke_weight: 2,
    fill_color: "#FFFF00",
    fill_opacity: 0.35,
    z_index: 1,
};

impl OverlayKind {
    /// Draw order: predicted footprints go down first so active ones sit on top
    pub const DRAW_ORDER: [OverlayKind; 2] = [OverlayKind::Predicted, OverlayKind::Active];

    pub fn style(&self) -> &'static OverlayStyle {
        match self {
            OverlayKind::Active => &ACTIVE_STYLE,
            OverlayKind::Predicted => &PREDICTED_STYLE,
        }
    }
}

/// The two footprints of one mask, split by vertex status
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MaskPolygons {
    pub mask_id: i64,
    pub active: Vec<LatLng>,
    pub predicted: Vec<LatLng>,
}

impl MaskPolygons {
    /// Partition a mask's vertices by status, preserving their order.
    ///
    /// Vertices with an unknown status or non-finite coordinates belong to neither
    /// footprint.
    pub fn from_mask(mask: &Mask) -> Self {
        let mut polygons = MaskPolygons {
            mask_id: mask.mask_id,
            ..Default::default()
        };

        for point in &mask.points {
            let position = point.position();
            if !position.is_finite() {
                continue;
            }
            match point.status {
                FireStatus::Active => polygons.active.push(position),
                FireStatus::Prediction => polygons.predicted.push(position),
                FireStatus::Unknown => {}
            }
        }

        polygons
    }

    pub fn polygon(&self, kind: OverlayKind) -> &[LatLng] {
        match kind {
            OverlayKind::Active => &self.active,
            OverlayKind::Predicted => &self.predicted,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty() && self.predicted.is_empty()
    }
}

/// Polygon drawn on the host and tracked by the lifecycle manager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RenderedOverlay {
    pub mask_id: i64,
    pub kind: OverlayKind,
    pub handle: OverlayHandle,
}
