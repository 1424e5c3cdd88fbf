//! Current location lookup through the Google Maps Geolocation API.
//!
//! The API is called with an empty request body, in which case Google
//! estimates the position from the caller's IP address. The response looks like:
//!
//! ```json
//! { "location": { "lat": 40.7128, "lng": -74.006 }, "accuracy": 1200.0 }
//! ```
//!
//! Every way this can go wrong (no network, rejected key, unexpected body) is
//! mapped to a [`LocationError`] so the scheduler can treat them uniformly.

use serde::Deserialize;
use std::time::Duration;

use super::Coordinates;
use crate::common::constants::GEOLOCATION_API_URL;

/// Source of the current coordinates.
#[cfg_attr(test, mockall::automock)]
pub trait LocationProvider {
    /// Look up the current location using the given API credential.
    fn locate(&self, api_key: &str) -> Result<Coordinates, LocationError>;
}

/// Why a location lookup failed.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationError {
    /// The request never produced an HTTP response (DNS, TLS, timeout, ...)
    Transport(String),
    /// The API answered with a non-success status
    Status { code: u16, message: String },
    /// The response body was not the expected JSON
    Malformed(String),
    /// The API returned coordinates outside the valid ranges
    InvalidCoordinates { latitude: f64, longitude: f64 },
}

impl std::fmt::Display for LocationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LocationError::Transport(reason) => write!(f, "request failed: {reason}"),
            LocationError::Status { code, message } => {
                write!(f, "geolocation API returned HTTP {code}: {message}")
            }
            LocationError::Malformed(reason) => {
                write!(f, "unexpected geolocation response: {reason}")
            }
            LocationError::InvalidCoordinates {
                latitude,
                longitude,
            } => write!(
                f,
                "geolocation API returned invalid coordinates ({latitude}, {longitude})"
            ),
        }
    }
}

impl std::error::Error for LocationError {}

#[derive(Debug, Deserialize)]
struct GeolocationResponse {
    location: GeolocationPoint,
}

#[derive(Debug, Deserialize)]
struct GeolocationPoint {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Parse a successful geolocation response body.
pub fn parse_geolocation_response(body: &str) -> Result<Coordinates, LocationError> {
    let response: GeolocationResponse =
        serde_json::from_str(body).map_err(|e| LocationError::Malformed(e.to_string()))?;

    let GeolocationPoint { lat, lng } = response.location;
    Coordinates::new(lat, lng).ok_or(LocationError::InvalidCoordinates {
        latitude: lat,
        longitude: lng,
    })
}

/// Pull the human readable message out of a Google API error body, if present.
fn parse_api_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ApiErrorResponse>(body)
        .ok()
        .map(|response| response.error.message)
        .filter(|message| !message.trim().is_empty())
}

/// Keep the credential out of error messages that end up in logs and notifications.
fn redact(text: &str, api_key: &str) -> String {
    if api_key.is_empty() {
        text.to_string()
    } else {
        text.replace(api_key, "<redacted>")
    }
}

/// HTTP client for the Google Maps Geolocation API.
pub struct GeolocationClient {
    agent: ureq::Agent,
    endpoint: String,
}

impl GeolocationClient {
    /// Create a client whose requests fail after `timeout`.
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self {
            agent,
            endpoint: GEOLOCATION_API_URL.to_string(),
        }
    }

    /// Point the client at a different endpoint (used for local test servers).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

impl LocationProvider for GeolocationClient {
    fn locate(&self, api_key: &str) -> Result<Coordinates, LocationError> {
        let result = self
            .agent
            .post(&self.endpoint)
            .query("key", api_key)
            .set("Content-Type", "application/json")
            .send_string("{}");

        match result {
            Ok(response) => {
                let body = response
                    .into_string()
                    .map_err(|e| LocationError::Malformed(e.to_string()))?;
                parse_geolocation_response(&body)
            }
            Err(ureq::Error::Status(code, response)) => {
                let message = response
                    .into_string()
                    .ok()
                    .and_then(|body| parse_api_error_message(&body))
                    .unwrap_or_else(|| format!("HTTP status {code}"));
                Err(LocationError::Status {
                    code,
                    message: redact(&message, api_key),
                })
            }
            Err(ureq::Error::Transport(transport)) => Err(LocationError::Transport(redact(
                &transport.to_string(),
                api_key,
            ))),
        }
    }
}
