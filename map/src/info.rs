//! Info panel formatting
//!
//! Read-only view of the selection for the incident info window.

use chrono::{DateTime, NaiveDateTime};
use serde::Serialize;
use std::fmt;

use crate::geo::{CompassDirection, degrees_to_compass_label, kelvin_to_celsius};
use crate::incident::{IncidentId, RegionTelemetry};
use crate::selection::{Selection, SelectionPhase};

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"];
const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Display-ready region weather
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionSummary {
    pub generated: String,
    pub wind_speed: f64,
    pub wind_direction: CompassDirection,
    pub min_temp_celsius: f64,
    pub max_temp_celsius: f64,
    pub humidity_percent: f64,
    pub precipitation_mm: f64,
}

impl RegionSummary {
    pub fn from_telemetry(telemetry: &RegionTelemetry) -> Self {
        Self {
            generated: format_generation_date(&telemetry.generation_date),
            wind_speed: telemetry.wind_speed,
            wind_direction: degrees_to_compass_label(telemetry.wind_direction_degrees),
            min_temp_celsius: kelvin_to_celsius(telemetry.min_temperature_kelvin),
            max_temp_celsius: kelvin_to_celsius(telemetry.max_temperature_kelvin),
            humidity_percent: telemetry.humidity_percent,
            precipitation_mm: telemetry.precipitation_mm,
        }
    }
}

/// Content of the info window for the current selection
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum InfoPanel {
    /// No incident selected
    Hidden,
    /// Telemetry still loading
    Loading { incident_id: IncidentId },
    /// Telemetry available
    Region {
        incident_id: IncidentId,
        summary: RegionSummary,
    },
    /// Telemetry failed or was empty
    NoData { incident_id: IncidentId },
}

impl InfoPanel {
    pub fn from_selection(selection: &Selection) -> Self {
        let Some(incident_id) = selection.incident_id else {
            return InfoPanel::Hidden;
        };

        match (selection.phase, &selection.telemetry) {
            (SelectionPhase::Idle, _) => InfoPanel::Hidden,
            (SelectionPhase::DetailLoading, _) => InfoPanel::Loading { incident_id },
            (SelectionPhase::DetailReady, Some(telemetry)) => InfoPanel::Region {
                incident_id,
                summary: RegionSummary::from_telemetry(telemetry),
            },
            (SelectionPhase::DetailReady, None) | (SelectionPhase::DetailFailed, _) => {
                InfoPanel::NoData { incident_id }
            }
        }
    }
}

impl fmt::Display for InfoPanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InfoPanel::Hidden => Ok(()),
            InfoPanel::Loading { .. } => writeln!(f, "Loading..."),
            InfoPanel::NoData { .. } => {
                writeln!(f, "Region Data")?;
                writeln!(f, "No region data available for this fire.")
            }
            InfoPanel::Region { summary, .. } => {
                writeln!(f, "Region Data")?;
                writeln!(f, "Generation Date: {}", summary.generated)?;
                writeln!(
                    f,
                    "Wind: {} meter/sec {}",
                    summary.wind_speed, summary.wind_direction
                )?;
                writeln!(f, "Min Temp: {:.2} °C", summary.min_temp_celsius)?;
                writeln!(f, "Max Temp: {:.2} °C", summary.max_temp_celsius)?;
                writeln!(f, "Humidity: {} %", summary.humidity_percent)?;
                writeln!(f, "Precipitation: {} mm", summary.precipitation_mm)
            }
        }
    }
}

/// Normalize the backend's generation date for display.
///
/// Accepts RFC 3339, RFC 2822 / HTTP-date and naive timestamps; anything else is
/// shown as received.
pub fn format_generation_date(raw: &str) -> String {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.naive_utc().format(DISPLAY_FORMAT).to_string() + " UTC";
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return dt.naive_utc().format(DISPLAY_FORMAT).to_string() + " UTC";
    }
    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return dt.format(DISPLAY_FORMAT).to_string();
        }
    }

    raw.to_string()
}
