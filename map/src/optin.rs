//! Notification opt-in relay client
//!
//! Validates a phone number the way the sign-up form does and forwards it, with the
//! chosen coordinates, to the notification relay. Message delivery happens on the
//! relay side.

use metrics::counter;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::{ApiConfig, CONNECT_TIMEOUT};
use crate::geo::LatLng;

const OPT_IN_PATH: &str = "/notification/process-opt-in";

/// Opt-in errors
#[derive(Debug, Error)]
pub enum OptInError {
    #[error("Invalid phone number: {0:?}")]
    InvalidPhone(String),

    #[error("Invalid coordinates: ({}, {})", .0.lat, .0.lng)]
    InvalidCoordinates(LatLng),

    #[error("Opt-in request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Opt-in relay returned HTTP {status}")]
    Status { status: u16 },
}

#[derive(Debug, Serialize)]
struct OptInRequest<'a> {
    phone: &'a str,
    lat: f64,
    lng: f64,
}

#[derive(Debug, Deserialize)]
struct OptInResponse {
    #[serde(default)]
    success: bool,
}

/// Client for the opt-in relay
#[derive(Clone)]
pub struct OptInClient {
    client: reqwest::Client,
    base_url: String,
    request_timeout: Option<Duration>,
}

impl OptInClient {
    pub fn new(config: &ApiConfig) -> Result<Self, OptInError> {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .user_agent(concat!("emberalert-map/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(client, config))
    }

    pub fn with_client(client: reqwest::Client, config: &ApiConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            request_timeout: config.request_timeout,
        }
    }

    /// Register `phone` for alerts around `coordinates`.
    ///
    /// Returns the relay's `success` flag. Validation failures never reach the network.
    pub async fn register(&self, phone: &str, coordinates: LatLng) -> Result<bool, OptInError> {
        let phone = phone.trim();
        if !is_valid_phone(phone) {
            return Err(OptInError::InvalidPhone(phone.to_string()));
        }
        if !coordinates.is_finite() {
            return Err(OptInError::InvalidCoordinates(coordinates));
        }

        let body = OptInRequest {
            phone,
            lat: coordinates.lat,
            lng: coordinates.lng,
        };
        let mut request = self
            .client
            .post(format!("{}{}", self.base_url, OPT_IN_PATH))
            .json(&body);
        if let Some(timeout) = self.request_timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            counter!("emberalert_opt_in_requests_total", "outcome" => "error").increment(1);
            warn!("Opt-in relay returned {}", status);
            return Err(OptInError::Status {
                status: status.as_u16(),
            });
        }

        let reply: OptInResponse = response.json().await?;
        let outcome = if reply.success { "accepted" } else { "rejected" };
        counter!("emberalert_opt_in_requests_total", "outcome" => outcome).increment(1);
        info!("Opt-in relay {} the registration", outcome);

        Ok(reply.success)
    }
}

static PHONE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\+\d{1,2}\s?)?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}$")
        .expect("phone pattern is a valid regex")
});

/// North American style phone number with an optional 1-2 digit country code.
///
/// Accepts `5551234567`, `555-123-4567`, `(555) 123-4567`, `555.123.4567` and
/// `+1 555 123 4567`.
pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_PATTERN.is_match(phone)
}
