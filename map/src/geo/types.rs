//! Geographic value types and error definitions

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced by the geo helpers
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GeoError {
    #[error("Cannot compute a bounding envelope from an empty point set")]
    EmptyInput,
}

/// A WGS84 position in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Both components are finite numbers
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

/// Axis-aligned lat/lng rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub min_lat: f64,
    pub min_lng: f64,
    pub max_lat: f64,
    pub max_lng: f64,
}

impl Envelope {
    /// Degenerate envelope covering a single point
    pub fn from_point(point: LatLng) -> Self {
        Self {
            min_lat: point.lat,
            min_lng: point.lng,
            max_lat: point.lat,
            max_lng: point.lng,
        }
    }

    /// Grow the envelope so it contains `point`
    pub fn extend(&mut self, point: LatLng) {
        self.min_lat = self.min_lat.min(point.lat);
        self.min_lng = self.min_lng.min(point.lng);
        self.max_lat = self.max_lat.max(point.lat);
        self.max_lng = self.max_lng.max(point.lng);
    }

    /// Smallest envelope containing both `self` and `other`
    pub fn union(&self, other: &Envelope) -> Envelope {
        Envelope {
            min_lat: self.min_lat.min(other.min_lat),
            min_lng: self.min_lng.min(other.min_lng),
            max_lat: self.max_lat.max(other.max_lat),
            max_lng: self.max_lng.max(other.max_lng),
        }
    }

    pub fn south_west(&self) -> LatLng {
        LatLng::new(self.min_lat, self.min_lng)
    }

    pub fn north_east(&self) -> LatLng {
        LatLng::new(self.max_lat, self.max_lng)
    }

    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lng + self.max_lng) / 2.0,
        )
    }

    pub fn contains(&self, point: LatLng) -> bool {
        point.lat >= self.min_lat
            && point.lat <= self.max_lat
            && point.lng >= self.min_lng
            && point.lng <= self.max_lng
    }
}

/// Restriction rectangle the map viewport is kept inside of
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapBounds {
    pub north: f64,
    pub south: f64,
    pub west: f64,
    pub east: f64,
}

impl MapBounds {
    /// North America, the area covered by the incident feed
    pub const NORTH_AMERICA: MapBounds = MapBounds {
        north: 74.3475,
        south: 12.5606,
        west: -170.0927,
        east: -51.4404,
    };

    pub fn contains(&self, point: LatLng) -> bool {
        point.lat <= self.north
            && point.lat >= self.south
            && point.lng >= self.west
            && point.lng <= self.east
    }

    /// Nearest point inside the restriction
    pub fn clamp(&self, point: LatLng) -> LatLng {
        LatLng::new(
            point.lat.clamp(self.south, self.north),
            point.lng.clamp(self.west, self.east),
        )
    }
}

impl Default for MapBounds {
    fn default() -> Self {
        Self::NORTH_AMERICA
    }
}
