//! Map session driver: roster markers, host event handling and place search

use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::MapConfig;
use crate::host::MapHost;
use crate::incident::{IncidentService, Roster, RosterLoader};
use crate::selection::{SelectionController, SelectionToken};

use super::events::{MapEvent, Place, places_envelope};

/// One map page: roster markers, host event wiring and the selection controller
pub struct MapSession {
    host: Arc<dyn MapHost>,
    controller: Arc<SelectionController>,
    roster_loader: RosterLoader,
    config: MapConfig,
}

impl MapSession {
    pub fn new(
        service: Arc<dyn IncidentService>,
        host: Arc<dyn MapHost>,
        config: MapConfig,
    ) -> Self {
        let controller = Arc::new(SelectionController::new(
            service.clone(),
            host.clone(),
            &config,
        ));
        Self {
            host,
            controller,
            roster_loader: RosterLoader::new(service),
            config,
        }
    }

    pub fn controller(&self) -> &Arc<SelectionController> {
        &self.controller
    }

    /// Register host callbacks that forward interactions into a channel.
    ///
    /// Feed the returned receiver to [`MapSession::run`].
    pub fn bind(&self) -> mpsc::UnboundedReceiver<MapEvent> {
        let (tx, rx) = mpsc::unbounded_channel();

        let ready_tx = tx.clone();
        self.host.on_ready(Box::new(move || {
            let _ = ready_tx.send(MapEvent::Ready);
        }));

        let click_tx = tx.clone();
        self.host.on_click(Box::new(move |position| {
            let _ = click_tx.send(MapEvent::Click(position));
        }));

        let marker_tx = tx.clone();
        self.host.on_marker_click(Box::new(move |id, position| {
            let _ = marker_tx.send(MapEvent::MarkerClick { id, position });
        }));

        self.host.on_info_window_closed(Box::new(move || {
            let _ = tx.send(MapEvent::InfoWindowClosed);
        }));

        rx
    }

    /// Load the roster once and place one marker per incident
    pub async fn start(&self) -> Roster {
        let roster = self.roster_loader.load().await;
        for incident in &roster.incidents {
            self.host.place_marker(incident);
        }
        info!("Placed {} incident markers", roster.len());
        roster
    }

    /// Process host events until every sender is gone
    pub async fn run(&self, mut events: mpsc::UnboundedReceiver<MapEvent>) {
        while let Some(event) = events.recv().await {
            self.handle_event(event).await;
        }
        debug!("Map event stream closed");
    }

    /// Apply one host event.
    ///
    /// A marker click claims the selection slot before the next event is handled, then
    /// spawns the detail load so a later click can supersede it; the handle is returned
    /// for callers that want to wait on it.
    pub async fn handle_event(&self, event: MapEvent) -> Option<JoinHandle<SelectionToken>> {
        match event {
            MapEvent::Ready => {
                let center = self.config.restriction.clamp(self.config.default_center);
                self.host.set_center(center);
                self.host.set_zoom(self.config.default_zoom);
                None
            }
            MapEvent::Click(position) => {
                debug!(
                    "Map clicked at ({}, {}){}",
                    position.lat,
                    position.lng,
                    if self.config.restriction.contains(position) {
                        ""
                    } else {
                        " outside the map restriction"
                    }
                );
                None
            }
            MapEvent::MarkerClick { id, position } => {
                let token = self.controller.begin_selection(id, position).await;
                let controller = self.controller.clone();
                Some(tokio::spawn(async move {
                    controller.load_detail(token).await;
                    token
                }))
            }
            MapEvent::InfoWindowClosed => {
                self.controller.deselect().await;
                None
            }
        }
    }

    /// Fit the viewport to place search results, then apply the search zoom.
    ///
    /// Returns false when no result carries geometry.
    pub fn focus_place(&self, places: &[Place]) -> bool {
        for place in places.iter().filter(|place| place.geometry.is_none()) {
            warn!("Place {:?} has no geometry", place.name);
        }

        let Some(envelope) = places_envelope(places) else {
            return false;
        };

        self.host.fit_bounds(envelope, 0);
        self.host.set_zoom(self.config.search_zoom);
        true
    }
}
