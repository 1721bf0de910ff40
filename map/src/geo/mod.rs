//! Geographic helpers
//!
//! Pure functions and value types shared by the controller: bounding envelopes,
//! temperature conversion, compass labels and the map restriction rectangle.

pub mod envelope;
pub mod types;
pub mod units;

pub use envelope::compute_bounding_envelope;
pub use types::{Envelope, GeoError, LatLng, MapBounds};
pub use units::{CompassDirection, degrees_to_compass_label, kelvin_to_celsius};
