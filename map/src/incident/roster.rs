//! Incident roster loading

use metrics::counter;
use std::sync::Arc;
use tracing::{info, warn};

use super::service::IncidentService;
use super::types::{Incident, IncidentId};

/// Result of a roster load
#[derive(Debug, Clone, Default)]
pub struct Roster {
    /// Incidents with a usable position
    pub incidents: Vec<Incident>,
    /// Number of entries dropped for missing or invalid coordinates
    pub skipped: usize,
    /// Failure recorded when the provider could not be reached or decoded
    pub failure: Option<String>,
}

impl Roster {
    pub fn is_empty(&self) -> bool {
        self.incidents.is_empty()
    }

    pub fn len(&self) -> usize {
        self.incidents.len()
    }

    pub fn get(&self, id: IncidentId) -> Option<&Incident> {
        self.incidents.iter().find(|incident| incident.id == id)
    }
}

/// Loads the incident roster once per map session
pub struct RosterLoader {
    service: Arc<dyn IncidentService>,
}

impl RosterLoader {
    pub fn new(service: Arc<dyn IncidentService>) -> Self {
        Self { service }
    }

    /// Fetch the roster.
    ///
    /// Never fails: a transport or decode error yields an empty roster with the failure
    /// recorded, so the map still renders (with zero markers).
    pub async fn load(&self) -> Roster {
        counter!("emberalert_roster_loads_total").increment(1);

        let entries = match self.service.list_incidents().await {
            Ok(entries) => entries,
            Err(e) => {
                counter!("emberalert_roster_failures_total").increment(1);
                warn!("Error fetching incident roster: {}", e);
                return Roster {
                    failure: Some(e.to_string()),
                    ..Roster::default()
                };
            }
        };

        let mut roster = Roster::default();
        for entry in entries {
            match Incident::try_from(entry) {
                Ok(incident) => roster.incidents.push(incident),
                Err(entry) => {
                    warn!(
                        "Skipping incident {} with invalid position (lat={:?}, lng={:?})",
                        entry.id, entry.lat, entry.lng
                    );
                    roster.skipped += 1;
                }
            }
        }

        if roster.skipped > 0 {
            counter!("emberalert_roster_incidents_skipped_total").increment(roster.skipped as u64);
        }
        info!(
            "Loaded incident roster: {} incidents ({} skipped)",
            roster.len(),
            roster.skipped
        );

        roster
    }
}
