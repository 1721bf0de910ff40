//! Map session
//!
//! This module provides:
//! - Roster loading and marker placement when the page starts
//! - Forwarding of host interactions into the selection controller
//! - Place search fitting

mod driver;
mod events;

pub use driver::MapSession;
pub use events::{MapEvent, Place, PlaceGeometry};
