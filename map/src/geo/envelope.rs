//! Bounding envelope computation

use super::types::{Envelope, GeoError, LatLng};

/// Compute the minimal axis-aligned envelope containing every point.
///
/// The points are consumed; callers hand over their boundary samples and nothing
/// keeps them once the envelope exists. Non-finite samples are ignored, so a set made
/// only of NaN/infinite coordinates is treated the same as an empty one.
pub fn compute_bounding_envelope<I, P>(points: I) -> Result<Envelope, GeoError>
where
    I: IntoIterator<Item = P>,
    P: Into<LatLng>,
{
    let mut envelope: Option<Envelope> = None;

    for point in points.into_iter().map(Into::into) {
        if !point.is_finite() {
            continue;
        }
        match envelope.as_mut() {
            Some(env) => env.extend(point),
            None => envelope = Some(Envelope::from_point(point)),
        }
    }

    envelope.ok_or(GeoError::EmptyInput)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_matches_true_extremes() {
        let points = vec![
            LatLng::new(38.12, -121.40),
            LatLng::new(38.90, -122.05),
            LatLng::new(37.75, -121.88),
            LatLng::new(38.33, -120.99),
        ];

        let env = compute_bounding_envelope(points.clone()).unwrap();

        let min_lat = points.iter().map(|p| p.lat).fold(f64::INFINITY, f64::min);
        let max_lat = points.iter().map(|p| p.lat).fold(f64::NEG_INFINITY, f64::max);
        let min_lng = points.iter().map(|p| p.lng).fold(f64::INFINITY, f64::min);
        let max_lng = points.iter().map(|p| p.lng).fold(f64::NEG_INFINITY, f64::max);

        assert_eq!(env.min_lat, min_lat);
        assert_eq!(env.max_lat, max_lat);
        assert_eq!(env.min_lng, min_lng);
        assert_eq!(env.max_lng, max_lng);
    }

    #[test]
    fn test_single_point_is_degenerate_envelope() {
        let env = compute_bounding_envelope([LatLng::new(45.0, -110.0)]).unwrap();
        assert_eq!(env.south_west(), env.north_east());
    }

    #[test]
    fn test_empty_input_fails() {
        let result = compute_bounding_envelope(Vec::<LatLng>::new());
        assert_eq!(result, Err(GeoError::EmptyInput));
    }

    #[test]
    fn test_non_finite_points_are_ignored() {
        let env = compute_bounding_envelope([
            LatLng::new(f64::NAN, -110.0),
            LatLng::new(40.0, -111.0),
            LatLng::new(41.0, f64::INFINITY),
        ])
        .unwrap();
        assert_eq!(env, Envelope::from_point(LatLng::new(40.0, -111.0)));

        let result = compute_bounding_envelope([LatLng::new(f64::NAN, f64::NAN)]);
        assert_eq!(result, Err(GeoError::EmptyInput));
    }
}
