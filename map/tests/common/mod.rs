//! Common Test Utilities for Integration Tests
//!
//! A stub incident API served by axum on an ephemeral port, plus fixture bodies in
//! the shapes the real API returns.

#![allow(dead_code)]

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use emberalert_map::config::ApiConfig;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

#[derive(Clone)]
struct StubRoute {
    status: StatusCode,
    body: Value,
    delay: Option<Duration>,
}

/// A request the stub received
#[derive(Debug, Clone)]
pub struct ReceivedRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

struct StubState {
    routes: HashMap<String, StubRoute>,
    received: Mutex<Vec<ReceivedRequest>>,
}

/// Builder for the stub incident API. Unknown paths answer 404.
#[derive(Default)]
pub struct StubApi {
    routes: HashMap<String, StubRoute>,
}

impl StubApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `path` with 200 and `body`
    pub fn json(self, path: &str, body: Value) -> Self {
        self.route(path, StatusCode::OK, body, None)
    }

    /// Answer `path` with an error status
    pub fn status(self, path: &str, status: u16) -> Self {
        let status = StatusCode::from_u16(status).unwrap();
        self.route(path, status, json!({ "error": status.to_string() }), None)
    }

    /// Answer `path` with 200 and `body` after `delay`
    pub fn delayed(self, path: &str, body: Value, delay: Duration) -> Self {
        self.route(path, StatusCode::OK, body, Some(delay))
    }

    fn route(mut self, path: &str, status: StatusCode, body: Value, delay: Option<Duration>) -> Self {
        self.routes
            .insert(path.to_string(), StubRoute { status, body, delay });
        self
    }

    /// Serve the stub on 127.0.0.1 with an OS-assigned port
    pub async fn spawn(self) -> RunningStub {
        let state = Arc::new(StubState {
            routes: self.routes,
            received: Mutex::new(Vec::new()),
        });
        let app = Router::new().fallback(respond).with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        RunningStub { addr, state }
    }
}

async fn respond(
    State(state): State<Arc<StubState>>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> Response {
    let path = uri.path().to_string();
    state.received.lock().unwrap().push(ReceivedRequest {
        method,
        path: path.clone(),
        body: serde_json::from_slice(&body).ok(),
    });

    let Some(route) = state.routes.get(&path).cloned() else {
        return (StatusCode::NOT_FOUND, Json(json!({ "error": "not found" }))).into_response();
    };
    if let Some(delay) = route.delay {
        tokio::time::sleep(delay).await;
    }
    (route.status, Json(route.body)).into_response()
}

/// Handle to a served stub
pub struct RunningStub {
    addr: SocketAddr,
    state: Arc<StubState>,
}

impl RunningStub {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// API config pointing at this stub
    pub fn api_config(&self, request_timeout: Option<Duration>) -> ApiConfig {
        ApiConfig {
            base_url: self.base_url(),
            request_timeout,
        }
    }

    pub fn received(&self) -> Vec<ReceivedRequest> {
        self.state.received.lock().unwrap().clone()
    }

    pub fn received_on(&self, path: &str) -> Vec<ReceivedRequest> {
        self.received()
            .into_iter()
            .filter(|request| request.path == path)
            .collect()
    }
}

// ============================================================================
// Fixture bodies
// ============================================================================

pub fn roster_body() -> Value {
    json!([
        { "id": 101, "lat": 38.52, "lng": -121.49 },
        { "id": 102, "lat": null, "lng": -120.1 },
        { "id": 103, "lat": 34.05, "lng": -118.24 },
    ])
}

/// Mask with decimal-as-string coordinates and one unknown status
pub fn mask_body(mask_id: i64) -> Value {
    json!([{
        "mask_id": mask_id,
        "points": [
            { "point_id": 1, "latitude": "38.50", "longitude": "-121.50", "fire_status": "ACTIVE" },
            { "point_id": 2, "latitude": "38.55", "longitude": "-121.50", "fire_status": "ACTIVE" },
            { "point_id": 3, "latitude": "38.55", "longitude": "-121.45", "fire_status": "ACTIVE" },
            { "point_id": 4, "latitude": 38.45, "longitude": -121.55, "fire_status": "PREDICTION" },
            { "point_id": 5, "latitude": 38.60, "longitude": -121.55, "fire_status": "PREDICTION" },
            { "point_id": 6, "latitude": 38.60, "longitude": -121.40, "fire_status": "PREDICTION" },
            { "point_id": 7, "latitude": 38.70, "longitude": -121.30, "fire_status": "CONTAINED" },
        ]
    }])
}

pub fn bounds_body() -> Value {
    json!([
        { "lat": 38.45, "lng": -121.55 },
        { "lat": 38.60, "lng": -121.40 },
    ])
}

pub fn telemetry_body() -> Value {
    json!([{
        "generation_date": "Tue, 14 May 2024 06:00:00 GMT",
        "wind_speed": 4.2,
        "wind_direction": 90,
        "min_temp": 285.15,
        "max_temp": 300.15,
        "humidity": 33,
        "precipitation": 0
    }])
}

/// Stub serving a complete incident 101
pub fn incident_api() -> StubApi {
    StubApi::new()
        .json("/map/get-fires", roster_body())
        .json("/map/get-fire-mask/101", mask_body(9001))
        .json("/map/get-min-max/101", bounds_body())
        .json("/map/get-region-data/101", telemetry_body())
}
