//! Batch Record Types
//!
//! Every record crossing a pipeline boundary is statically shaped: a login
//! and its geolocation compose into `GeoLogin`, travel features extend it
//! into `EnrichedLogin`, and scoring produces the terminal `ScoredLogin`.
//! Enrichment failure means the login never becomes a `GeoLogin` at all;
//! there is no partially populated record anywhere in the flow.

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::geo::GeoRecord;
use crate::model::Verdict;

/// Raw login event from the ingestion layer. Immutable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginEvent {
    pub user_id: String,
    pub timestamp: NaiveDateTime,
    pub ip: String,
}

/// A login whose source IP resolved to a location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoLogin {
    pub login: LoginEvent,
    pub geo: GeoRecord,
}

/// Travel-plausibility features for one login.
///
/// Distance and velocity are relative to the immediately preceding login
/// in the user's chronological order; the first login of a batch is 0/0
/// by definition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TravelFeatures {
    /// Hour of day the login occurred, 0-23
    pub hour: u8,
    /// Day of week, Monday = 0
    pub weekday: u8,
    /// Great-circle distance from the previous login, km
    pub distance_km: f64,
    /// Implied travel speed since the previous login, km/h
    pub velocity_kmh: f64,
}

/// Login + geolocation + derived travel features. Immutable once built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichedLogin {
    pub login: LoginEvent,
    pub geo: GeoRecord,
    pub travel: TravelFeatures,
}

/// Terminal artifact of the core: one enriched login with its continuous
/// anomaly score and the thresholded verdict.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredLogin {
    pub record: EnrichedLogin,
    /// Normalized score in (0, 1]; higher = more anomalous
    pub anomaly_score: f32,
    pub verdict: Verdict,
}

impl ScoredLogin {
    pub fn is_suspicious(&self) -> bool {
        self.verdict.is_suspicious()
    }
}

/// Row handed to the reporting collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportRow {
    pub ip: String,
    pub city: String,
    pub country: String,
    pub hour: u8,
    pub distance_km: f64,
    pub velocity_kmh: f64,
    pub anomaly_score: f32,
    pub is_suspicious: bool,
}

impl From<&ScoredLogin> for ReportRow {
    fn from(scored: &ScoredLogin) -> Self {
        Self {
            ip: scored.record.login.ip.clone(),
            city: scored.record.geo.city.clone(),
            country: scored.record.geo.country.clone(),
            hour: scored.record.travel.hour,
            distance_km: scored.record.travel.distance_km,
            velocity_kmh: scored.record.travel.velocity_kmh,
            anomaly_score: scored.anomaly_score,
            is_suspicious: scored.is_suspicious(),
        }
    }
}

/// Parse an ISO-8601 login timestamp, naive or zoned.
///
/// Zoned inputs keep their own local calendar fields; nothing is converted
/// to another timezone.
pub fn parse_login_timestamp(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(zoned) = DateTime::parse_from_rfc3339(raw) {
        return Some(zoned.naive_local());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_parse_naive_timestamp() {
        let ts = parse_login_timestamp("2025-09-10T08:30:00").unwrap();
        assert_eq!(ts.hour(), 8);
        assert_eq!(ts.minute(), 30);
    }

    #[test]
    fn test_parse_zoned_timestamp_keeps_local_fields() {
        let ts = parse_login_timestamp("2025-09-10T08:30:00+08:00").unwrap();
        // local wall-clock hour, not UTC
        assert_eq!(ts.hour(), 8);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_login_timestamp("not a timestamp").is_none());
        assert!(parse_login_timestamp("2025-13-40T99:00:00").is_none());
    }

    #[test]
    fn test_report_row_from_scored() {
        let scored = ScoredLogin {
            record: EnrichedLogin {
                login: LoginEvent {
                    user_id: "1234".to_string(),
                    timestamp: parse_login_timestamp("2025-09-11T11:00:00").unwrap(),
                    ip: "91.198.174.192".to_string(),
                },
                geo: GeoRecord {
                    ip: "91.198.174.192".to_string(),
                    country: "Netherlands".to_string(),
                    region: "North Holland".to_string(),
                    city: "Amsterdam".to_string(),
                    latitude: 52.37,
                    longitude: 4.90,
                    timezone: "+02:00".to_string(),
                    asn: "14907".to_string(),
                    isp: "Wikimedia Foundation".to_string(),
                },
                travel: TravelFeatures {
                    hour: 11,
                    weekday: 3,
                    distance_km: 9957.0,
                    velocity_kmh: 4978.5,
                },
            },
            anomaly_score: 0.81,
            verdict: Verdict::Suspicious,
        };

        let row = ReportRow::from(&scored);
        assert_eq!(row.ip, "91.198.174.192");
        assert_eq!(row.city, "Amsterdam");
        assert_eq!(row.hour, 11);
        assert!(row.is_suspicious);
        assert!((row.velocity_kmh - 4978.5).abs() < 1e-9);
    }
}
