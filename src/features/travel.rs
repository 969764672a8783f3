//! Travel Feature Builder
//!
//! Single sequential pass over one user's geolocated logins in ascending
//! timestamp order. Distance and velocity for each record are relative to
//! the immediately preceding record, so the derivation threads running
//! state through the batch rather than comparing arbitrary pairs.

use chrono::{Datelike, NaiveDateTime, Timelike};

use crate::geo::distance::haversine_km;
use crate::records::{EnrichedLogin, GeoLogin, TravelFeatures};

/// Location and time of the previous login in the pass.
#[derive(Debug, Clone, Copy)]
struct LastSeen {
    latitude: f64,
    longitude: f64,
    timestamp: NaiveDateTime,
}

/// Derive travel features for an ordered batch.
///
/// The input must be sorted by non-decreasing timestamp. The first record
/// has distance 0 and velocity 0 by definition; a non-positive elapsed
/// time between consecutive records clamps velocity to 0 rather than
/// producing an infinity. Pure: no side effects, same-length output.
pub fn build_features(logins: &[GeoLogin]) -> Vec<EnrichedLogin> {
    let mut last: Option<LastSeen> = None;
    let mut enriched = Vec::with_capacity(logins.len());

    for entry in logins {
        let ts = entry.login.timestamp;

        let (distance_km, velocity_kmh) = match last {
            Some(prev) => {
                let distance = haversine_km(
                    entry.geo.latitude,
                    entry.geo.longitude,
                    prev.latitude,
                    prev.longitude,
                );
                let hours = elapsed_hours(prev.timestamp, ts);
                let velocity = if hours > 0.0 { distance / hours } else { 0.0 };
                (distance, velocity)
            }
            None => (0.0, 0.0),
        };

        let travel = TravelFeatures {
            hour: ts.hour() as u8,
            weekday: ts.weekday().num_days_from_monday() as u8,
            distance_km,
            velocity_kmh,
        };

        last = Some(LastSeen {
            latitude: entry.geo.latitude,
            longitude: entry.geo.longitude,
            timestamp: ts,
        });

        enriched.push(EnrichedLogin {
            login: entry.login.clone(),
            geo: entry.geo.clone(),
            travel,
        });
    }

    enriched
}

/// Elapsed time in fractional hours; negative when out of order.
fn elapsed_hours(from: NaiveDateTime, to: NaiveDateTime) -> f64 {
    (to - from).num_milliseconds() as f64 / 3_600_000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::GeoRecord;
    use crate::records::LoginEvent;

    fn login_at(ts: &str, lat: f64, lon: f64) -> GeoLogin {
        GeoLogin {
            login: LoginEvent {
                user_id: "1234".to_string(),
                timestamp: crate::records::parse_login_timestamp(ts).unwrap(),
                ip: "198.51.100.1".to_string(),
            },
            geo: GeoRecord {
                ip: "198.51.100.1".to_string(),
                country: String::new(),
                region: String::new(),
                city: String::new(),
                latitude: lat,
                longitude: lon,
                timezone: String::new(),
                asn: String::new(),
                isp: String::new(),
            },
        }
    }

    #[test]
    fn test_empty_batch() {
        assert!(build_features(&[]).is_empty());
    }

    #[test]
    fn test_first_record_is_zero() {
        // coordinates do not matter for the first record
        let batch = [login_at("2025-09-10T08:30:00", 37.4, -122.1)];
        let enriched = build_features(&batch);

        assert_eq!(enriched.len(), 1);
        assert_eq!(enriched[0].travel.distance_km, 0.0);
        assert_eq!(enriched[0].travel.velocity_kmh, 0.0);
        assert_eq!(enriched[0].travel.hour, 8);
        assert_eq!(enriched[0].travel.weekday, 2); // Wednesday
    }

    #[test]
    fn test_velocity_clamp_identical_timestamps() {
        let batch = [
            login_at("2025-09-10T08:30:00", 37.4, -122.1),
            login_at("2025-09-10T08:30:00", 3.1, 101.7),
        ];
        let enriched = build_features(&batch);

        assert!(enriched[1].travel.distance_km > 10_000.0);
        assert_eq!(enriched[1].travel.velocity_kmh, 0.0);
    }

    #[test]
    fn test_velocity_clamp_out_of_order() {
        let batch = [
            login_at("2025-09-10T09:00:00", 37.4, -122.1),
            login_at("2025-09-10T08:00:00", 3.1, 101.7),
        ];
        let enriched = build_features(&batch);

        let v = enriched[1].travel.velocity_kmh;
        assert_eq!(v, 0.0);
        assert!(!v.is_nan());
    }

    #[test]
    fn test_distance_is_relative_to_previous_record() {
        let batch = [
            login_at("2025-09-10T08:00:00", 51.5074, -0.1278), // London
            login_at("2025-09-10T12:00:00", 48.8566, 2.3522),  // Paris
            login_at("2025-09-10T16:00:00", 48.8566, 2.3522),  // still Paris
        ];
        let enriched = build_features(&batch);

        // leg 2 measures from Paris, not from London
        assert!((enriched[1].travel.distance_km - 343.5).abs() < 5.0);
        assert_eq!(enriched[2].travel.distance_km, 0.0);
        assert_eq!(enriched[2].travel.velocity_kmh, 0.0);
    }

    #[test]
    fn test_velocity_is_distance_over_elapsed_hours() {
        let batch = [
            login_at("2025-09-10T08:00:00", 51.5074, -0.1278),
            login_at("2025-09-10T10:00:00", 48.8566, 2.3522),
        ];
        let enriched = build_features(&batch);

        let t = &enriched[1].travel;
        assert!((t.velocity_kmh - t.distance_km / 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_output_length_matches_input() {
        let batch = [
            login_at("2025-09-10T08:00:00", 51.5, -0.1),
            login_at("2025-09-10T09:00:00", 51.5, -0.1),
            login_at("2025-09-10T10:00:00", 51.5, -0.1),
        ];
        assert_eq!(build_features(&batch).len(), 3);
    }
}
