//! Incident data module
//!
//! This module provides:
//! - the incident data model and its wire shapes
//! - `IncidentService` trait for abstracting incident data sources
//! - `HttpIncidentService` for reading from the incident API
//! - `RosterLoader` for the once-per-session incident roster

mod http;
mod roster;
mod service;
mod types;

pub use http::HttpIncidentService;
pub use roster::{Roster, RosterLoader};
pub use service::IncidentService;
pub use types::{
    BoundaryPoint, FireStatus, Incident, IncidentError, IncidentId, Mask, MaskPoint,
    RegionTelemetry, RosterEntry,
};
