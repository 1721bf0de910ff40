//! Selection state machine
//!
//! Owns the single selection slot. A marker click moves the slot to `DetailLoading`
//! and starts three independent fetches (mask, boundary points, region telemetry);
//! each result is applied only if its `SelectionToken` is still current when it
//! arrives.

mod controller;
mod state;

pub use controller::SelectionController;
pub use state::{Selection, SelectionPhase, SelectionToken};
