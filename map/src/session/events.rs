//! Host interaction events and place search results

use serde::Deserialize;

use crate::geo::{Envelope, LatLng};
use crate::incident::IncidentId;

/// User interaction forwarded from the map host
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MapEvent {
    /// The map surface finished loading
    Ready,
    /// Click on the map background
    Click(LatLng),
    /// Click on an incident marker
    MarkerClick { id: IncidentId, position: LatLng },
    /// The info window was dismissed
    InfoWindowClosed,
}

/// Geometry of a place search result
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceGeometry {
    /// Geocoded area; preferred over the location when present
    Viewport(Envelope),
    /// Single point
    Location(LatLng),
}

/// A place returned by the search box
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Place {
    pub name: String,
    #[serde(default)]
    pub geometry: Option<PlaceGeometry>,
}

impl Place {
    pub fn at(name: &str, location: LatLng) -> Self {
        Self {
            name: name.to_string(),
            geometry: Some(PlaceGeometry::Location(location)),
        }
    }

    pub fn area(name: &str, viewport: Envelope) -> Self {
        Self {
            name: name.to_string(),
            geometry: Some(PlaceGeometry::Viewport(viewport)),
        }
    }
}

/// Envelope covering every place that has geometry
pub(crate) fn places_envelope(places: &[Place]) -> Option<Envelope> {
    places
        .iter()
        .filter_map(|place| place.geometry)
        .fold(None, |acc: Option<Envelope>, geometry| {
            let next = match geometry {
                PlaceGeometry::Viewport(viewport) => viewport,
                PlaceGeometry::Location(location) => Envelope::from_point(location),
            };
            Some(match acc {
                Some(envelope) => envelope.union(&next),
                None => next,
            })
        })
}
