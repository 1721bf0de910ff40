//! Controller configuration
//!
//! Configuration is loaded from environment variables prefixed with `EMBERALERT_`.

use std::env;
use std::time::Duration;

use crate::geo::{LatLng, MapBounds};

/// Connect timeout shared by every client of the incident API
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Main configuration
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Incident API configuration
    pub api: ApiConfig,

    /// Map viewport configuration
    pub map: MapConfig,
}

/// Incident API configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL of the incident API (serves `/map/*` and `/notification/*`)
    pub base_url: String,
    /// Per-request timeout (`None` waits indefinitely)
    pub request_timeout: Option<Duration>,
}

/// Map viewport configuration
#[derive(Debug, Clone)]
pub struct MapConfig {
    /// Center applied when the map becomes ready
    pub default_center: LatLng,
    /// Zoom applied when the map becomes ready
    pub default_zoom: f64,
    /// Zoom applied after fitting to a searched place
    pub search_zoom: f64,
    /// Padding in pixels used when fitting to an incident's bounds
    pub fit_padding_px: u32,
    /// Restriction rectangle for the viewport
    pub restriction: MapBounds,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            request_timeout: Some(Duration::from_secs(10)),
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            default_center: LatLng::new(39.8283, -98.5795), // geographic center of the contiguous US
            default_zoom: 5.0,
            search_zoom: 9.0,
            fit_padding_px: 5,
            restriction: MapBounds::NORTH_AMERICA,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup (environment, test fixtures)
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        // API config
        if let Some(url) = lookup("EMBERALERT_API_URL")
            && !url.is_empty()
        {
            config.api.base_url = url;
        }
        if let Some(val) = lookup("EMBERALERT_REQUEST_TIMEOUT_SECS")
            && let Ok(secs) = val.parse::<u64>()
        {
            config.api.request_timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }

        // Map config
        if let Some(val) = lookup("EMBERALERT_DEFAULT_LAT")
            && let Ok(lat) = val.parse()
        {
            config.map.default_center.lat = lat;
        }
        if let Some(val) = lookup("EMBERALERT_DEFAULT_LNG")
            && let Ok(lng) = val.parse()
        {
            config.map.default_center.lng = lng;
        }
        if let Some(val) = lookup("EMBERALERT_DEFAULT_ZOOM")
            && let Ok(zoom) = val.parse()
        {
            config.map.default_zoom = zoom;
        }
        if let Some(val) = lookup("EMBERALERT_SEARCH_ZOOM")
            && let Ok(zoom) = val.parse()
        {
            config.map.search_zoom = zoom;
        }
        if let Some(val) = lookup("EMBERALERT_FIT_PADDING_PX")
            && let Ok(px) = val.parse()
        {
            config.map.fit_padding_px = px;
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "http://localhost:5000");
        assert_eq!(config.api.request_timeout, Some(Duration::from_secs(10)));
        assert_eq!(config.map.fit_padding_px, 5);
        assert_eq!(config.map.default_zoom, 5.0);
        assert!(config.map.restriction.contains(config.map.default_center));
    }

    #[test]
    fn test_config_from_lookup_overrides() {
        let vars: HashMap<&str, &str> = [
            ("EMBERALERT_API_URL", "http://incidents.internal:8000"),
            ("EMBERALERT_REQUEST_TIMEOUT_SECS", "0"),
            ("EMBERALERT_FIT_PADDING_PX", "24"),
            ("EMBERALERT_DEFAULT_ZOOM", "6.5"),
            ("EMBERALERT_SEARCH_ZOOM", "not-a-number"),
        ]
        .into_iter()
        .collect();

        let config = Config::from_lookup(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.api.base_url, "http://incidents.internal:8000");
        assert_eq!(config.api.request_timeout, None);
        assert_eq!(config.map.fit_padding_px, 24);
        assert_eq!(config.map.default_zoom, 6.5);
        assert_eq!(config.map.search_zoom, 9.0);
    }

    #[test]
    fn test_config_from_env() {
        // No EMBERALERT_* vars are set in the test environment
        let config = Config::from_env();
        assert_eq!(config.map.search_zoom, 9.0);
    }
}
