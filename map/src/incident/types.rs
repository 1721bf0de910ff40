//! Incident data model, wire shapes and error definitions

use serde::{Deserialize, Deserializer, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::geo::LatLng;

/// Incident identifier as issued by the incident API
pub type IncidentId = i64;

/// Errors that can occur when talking to the incident API
#[derive(Debug, Error)]
pub enum IncidentError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Request to {url} failed with status {status}")]
    Status { status: u16, url: String },

    #[error("Failed to decode response from {url}: {message}")]
    Decode { url: String, message: String },

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Incident service unavailable: {0}")]
    Unavailable(String),
}

/// Roster entry as returned by the roster provider.
///
/// Coordinates are optional on the wire; entries without a usable position are
/// dropped by the roster loader instead of failing the whole roster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterEntry {
    pub id: IncidentId,
    #[serde(default, deserialize_with = "loose_opt_f64")]
    pub lat: Option<f64>,
    #[serde(default, deserialize_with = "loose_opt_f64")]
    pub lng: Option<f64>,
}

/// One active wildfire
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Incident {
    pub id: IncidentId,
    pub latitude: f64,
    pub longitude: f64,
}

impl Incident {
    pub fn position(&self) -> LatLng {
        LatLng::new(self.latitude, self.longitude)
    }
}

impl TryFrom<RosterEntry> for Incident {
    type Error = RosterEntry;

    fn try_from(entry: RosterEntry) -> Result<Self, Self::Error> {
        match (entry.lat, entry.lng) {
            (Some(lat), Some(lng)) if lat.is_finite() && lng.is_finite() => Ok(Incident {
                id: entry.id,
                latitude: lat,
                longitude: lng,
            }),
            _ => Err(entry),
        }
    }
}

/// Classification of a mask vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FireStatus {
    #[serde(rename = "ACTIVE")]
    Active,
    #[serde(rename = "PREDICTION")]
    Prediction,
    #[serde(other)]
    Unknown,
}

/// Vertex of a fire-extent polygon
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaskPoint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub point_id: Option<i64>,
    #[serde(deserialize_with = "loose_f64")]
    pub latitude: f64,
    #[serde(deserialize_with = "loose_f64")]
    pub longitude: f64,
    #[serde(rename = "fire_status")]
    pub status: FireStatus,
}

impl MaskPoint {
    pub fn position(&self) -> LatLng {
        LatLng::new(self.latitude, self.longitude)
    }
}

/// One fire-extent snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mask {
    pub mask_id: i64,
    #[serde(default, deserialize_with = "lenient_points")]
    pub points: Vec<MaskPoint>,
}

/// Raw sample used to fit the viewport
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundaryPoint {
    #[serde(deserialize_with = "loose_f64")]
    pub lat: f64,
    #[serde(deserialize_with = "loose_f64")]
    pub lng: f64,
}

impl From<BoundaryPoint> for LatLng {
    fn from(point: BoundaryPoint) -> Self {
        LatLng::new(point.lat, point.lng)
    }
}

/// Weather snapshot for the region around an incident
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionTelemetry {
    pub generation_date: String,
    #[serde(deserialize_with = "loose_f64")]
    pub wind_speed: f64,
    #[serde(rename = "wind_direction", deserialize_with = "loose_f64")]
    pub wind_direction_degrees: f64,
    #[serde(rename = "min_temp", deserialize_with = "loose_f64")]
    pub min_temperature_kelvin: f64,
    #[serde(rename = "max_temp", deserialize_with = "loose_f64")]
    pub max_temperature_kelvin: f64,
    #[serde(rename = "humidity", deserialize_with = "loose_f64")]
    pub humidity_percent: f64,
    #[serde(rename = "precipitation", deserialize_with = "loose_f64")]
    pub precipitation_mm: f64,
}

/// Numeric field that the backend may serialize as a JSON number or a decimal string
#[derive(Deserialize)]
#[serde(untagged)]
enum LooseNumber {
    Number(f64),
    Text(String),
}

fn loose_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    parse_loose(LooseNumber::deserialize(deserializer)?)
}

fn loose_opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<LooseNumber>::deserialize(deserializer)?
        .map(parse_loose)
        .transpose()
}

fn parse_loose<E: serde::de::Error>(number: LooseNumber) -> Result<f64, E> {
    match number {
        LooseNumber::Number(value) => Ok(value),
        LooseNumber::Text(text) => text
            .trim()
            .parse::<f64>()
            .map_err(|e| E::custom(format!("invalid number {:?}: {}", text, e))),
    }
}

/// Decode roster entries one by one, dropping entries that do not parse
pub(crate) fn lenient_roster(raw: Vec<serde_json::Value>) -> Vec<RosterEntry> {
    raw.into_iter()
        .filter_map(|value| match serde_json::from_value(value) {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!("Dropping malformed roster entry: {}", e);
                None
            }
        })
        .collect()
}

/// Decode mask points one by one, dropping vertices that do not parse
fn lenient_points<'de, D>(deserializer: D) -> Result<Vec<MaskPoint>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<serde_json::Value>> = Option::deserialize(deserializer)?;
    let raw = raw.unwrap_or_default();
    let total = raw.len();

    let points: Vec<MaskPoint> = raw
        .into_iter()
        .filter_map(|value| serde_json::from_value(value).ok())
        .collect();

    if points.len() < total {
        tracing::warn!(
            "Dropped {} malformed mask point(s) out of {}",
            total - points.len(),
            total
        );
    }

    Ok(points)
}
