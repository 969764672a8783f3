//! Geo Enrichment Types

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// GEO RECORD
// ============================================================================

/// Geolocation of a source IP
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoRecord {
    pub ip: String,
    pub country: String,
    pub region: String,
    pub city: String,
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: String,
    pub asn: String,
    pub isp: String,
}

/// Uniform lookup failure. Every non-success outcome (network error,
/// non-OK status, malformed payload) maps to one of these; a partially
/// populated record is never returned.
#[derive(Debug, Clone, Error)]
pub enum GeoError {
    /// API key missing or empty
    #[error("geolocation API key not configured")]
    NotConfigured,
    /// Non-OK HTTP status from the lookup service
    #[error("geolocation request failed with status {0}")]
    BadStatus(u16),
    /// Transport-level failure
    #[error("network error: {0}")]
    NetworkError(String),
    /// Response body was not the expected payload
    #[error("malformed geolocation payload: {0}")]
    ParseError(String),
}

/// Lookup seam consumed by the pipeline.
///
/// Implementations may keep caches or rate-limit state, hence `&mut self`.
/// Retry/backoff policy belongs to the implementation, not the core.
pub trait GeoLookup {
    fn lookup(&mut self, ip: &str) -> Result<GeoRecord, GeoError>;
}

// ============================================================================
// API RESPONSE TYPES (for parsing ip2location.io)
// ============================================================================

/// ip2location.io wire payload (for parsing)
#[derive(Debug, Deserialize)]
pub struct GeoApiResponse {
    pub ip: Option<String>,
    pub country_name: Option<String>,
    pub region_name: Option<String>,
    pub city_name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub time_zone: Option<String>,
    pub asn: Option<String>,
    #[serde(rename = "as")]
    pub as_name: Option<String>,
}

impl GeoApiResponse {
    /// Map the wire payload onto a `GeoRecord`. Absent text fields stay
    /// empty and absent coordinates default to 0.0, matching what the
    /// upstream service returns for unresolvable locations.
    pub fn into_record(self, requested_ip: &str) -> GeoRecord {
        GeoRecord {
            ip: self.ip.unwrap_or_else(|| requested_ip.to_string()),
            country: self.country_name.unwrap_or_default(),
            region: self.region_name.unwrap_or_default(),
            city: self.city_name.unwrap_or_default(),
            latitude: self.latitude.unwrap_or(0.0),
            longitude: self.longitude.unwrap_or(0.0),
            timezone: self.time_zone.unwrap_or_default(),
            asn: self.asn.unwrap_or_default(),
            isp: self.as_name.unwrap_or_default(),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
