//! EmberAlert Map Library
//!
//! Client-side controller for the wildfire incident map: loads the incident roster,
//! tracks the selected incident, fetches its detail and keeps the fire-footprint
//! overlays on the map host in sync with the selection.

pub mod config;
pub mod geo;
pub mod host;
pub mod incident;
pub mod info;
pub mod optin;
pub mod overlay;
pub mod selection;
pub mod session;

#[cfg(test)]
mod test_utils;

// Re-export commonly used types
pub use config::Config;
pub use host::{HeadlessMapHost, MapHost};
pub use incident::{HttpIncidentService, IncidentService};
pub use info::InfoPanel;
pub use optin::OptInClient;
pub use selection::SelectionController;
pub use session::MapSession;
