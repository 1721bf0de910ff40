//! Unit and label conversions for the info panel

use serde::Serialize;
use std::fmt;

const KELVIN_OFFSET: f64 = 273.15;
const COMPASS_BUCKET_DEGREES: f64 = 45.0;

/// Convert Kelvin to Celsius, rounded to two decimal places
pub fn kelvin_to_celsius(kelvin: f64) -> f64 {
    ((kelvin - KELVIN_OFFSET) * 100.0).round() / 100.0
}

/// Eight-point compass direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CompassDirection {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl CompassDirection {
    const ALL: [CompassDirection; 8] = [
        CompassDirection::North,
        CompassDirection::NorthEast,
        CompassDirection::East,
        CompassDirection::SouthEast,
        CompassDirection::South,
        CompassDirection::SouthWest,
        CompassDirection::West,
        CompassDirection::NorthWest,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            CompassDirection::North => "North",
            CompassDirection::NorthEast => "North-East",
            CompassDirection::East => "East",
            CompassDirection::SouthEast => "South-East",
            CompassDirection::South => "South",
            CompassDirection::SouthWest => "South-West",
            CompassDirection::West => "West",
            CompassDirection::NorthWest => "North-West",
        }
    }
}

impl fmt::Display for CompassDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Map a bearing in degrees (clockwise from north) to its 45° compass bucket.
///
/// Any finite input is normalized into [0, 360) first, so 360 and -360 are North.
/// Non-finite input falls back to North.
pub fn degrees_to_compass_label(degrees: f64) -> CompassDirection {
    if !degrees.is_finite() {
        return CompassDirection::North;
    }
    let normalized = degrees.rem_euclid(360.0);
    let bucket = (normalized / COMPASS_BUCKET_DEGREES).round() as usize % 8;
    CompassDirection::ALL[bucket]
}
