//! Login Sentinel - Demo Entry Point
//!
//! Scores a sample login batch end to end: geo enrichment (live API when
//! GEO_API_KEY is set, otherwise a built-in fixture table), travel
//! feature building, Isolation Forest scoring, report printout.

use std::collections::HashMap;

use login_sentinel::constants;
use login_sentinel::geo::{GeoError, GeoLookup, GeoRecord, Ip2LocationClient};
use login_sentinel::pipeline::{run_batch, BatchReport, PipelineConfig};
use login_sentinel::records::{parse_login_timestamp, LoginEvent};

/// Offline geolocation fixture for the sample IPs.
struct StaticGeoTable {
    records: HashMap<&'static str, GeoRecord>,
}

impl StaticGeoTable {
    fn new() -> Self {
        let mut records = HashMap::new();
        for (ip, country, region, city, lat, lon, tz, asn, isp) in [
            ("8.8.8.8", "United States of America", "California", "Mountain View", 37.40, -122.10, "-07:00", "15169", "Google LLC"),
            ("202.188.0.133", "Malaysia", "Kuala Lumpur", "Kuala Lumpur", 3.10, 101.70, "+08:00", "4788", "TM Net"),
            ("91.198.174.192", "Netherlands", "North Holland", "Amsterdam", 52.37, 4.90, "+02:00", "14907", "Wikimedia Foundation"),
            ("1.1.1.1", "Australia", "Queensland", "Brisbane", -27.47, 153.02, "+10:00", "13335", "Cloudflare"),
            ("23.236.62.147", "United States of America", "Iowa", "Council Bluffs", 41.26, -95.86, "-05:00", "15169", "Google LLC"),
            ("175.139.142.25", "Malaysia", "Kuala Lumpur", "Kuala Lumpur", 3.14, 101.69, "+08:00", "4788", "TM Net"),
            ("81.2.69.142", "United Kingdom", "England", "London", 51.51, -0.09, "+01:00", "20712", "Andrews & Arnold"),
            ("104.244.42.1", "United States of America", "California", "San Francisco", 37.77, -122.39, "-07:00", "13414", "Twitter"),
            ("139.130.4.5", "Australia", "Victoria", "Melbourne", -37.81, 144.96, "+10:00", "1221", "Telstra"),
            ("118.189.187.43", "Singapore", "Singapore", "Singapore", 1.29, 103.85, "+08:00", "9506", "Singtel"),
        ] {
            records.insert(
                ip,
                GeoRecord {
                    ip: ip.to_string(),
                    country: country.to_string(),
                    region: region.to_string(),
                    city: city.to_string(),
                    latitude: lat,
                    longitude: lon,
                    timezone: tz.to_string(),
                    asn: asn.to_string(),
                    isp: isp.to_string(),
                },
            );
        }
        Self { records }
    }
}

impl GeoLookup for StaticGeoTable {
    fn lookup(&mut self, ip: &str) -> Result<GeoRecord, GeoError> {
        self.records.get(ip).cloned().ok_or(GeoError::BadStatus(404))
    }
}

/// One user's login history: a workweek pattern, a sudden Europe login,
/// then a day of hourly logins scattered across continents.
fn sample_batch() -> Vec<LoginEvent> {
    let mut logins = vec![
        login("2025-09-10T08:30:00", "8.8.8.8"),
        login("2025-09-11T09:00:00", "202.188.0.133"),
        login("2025-09-11T11:00:00", "91.198.174.192"), // sudden Europe login
    ];

    let extra_ips = [
        "1.1.1.1",
        "23.236.62.147",
        "175.139.142.25",
        "81.2.69.142",
        "104.244.42.1",
        "139.130.4.5",
        "118.189.187.43",
    ];
    for (i, ip) in extra_ips.iter().enumerate() {
        let ts = format!("2025-09-12T{:02}:00:00", 8 + (i % 8));
        logins.push(login(&ts, ip));
    }

    logins
}

fn login(ts: &str, ip: &str) -> LoginEvent {
    LoginEvent {
        user_id: "1234".to_string(),
        timestamp: parse_login_timestamp(ts).expect("sample timestamp is valid"),
        ip: ip.to_string(),
    }
}

fn print_report(report: &BatchReport) {
    println!(
        "{:<16} {:<14} {:<26} {:>4} {:>12} {:>13} {:>7}  verdict",
        "ip", "city", "country", "hour", "distance_km", "velocity_kmh", "score"
    );
    for row in report.rows() {
        println!(
            "{:<16} {:<14} {:<26} {:>4} {:>12.1} {:>13.1} {:>7.4}  {}",
            row.ip,
            row.city,
            row.country,
            row.hour,
            row.distance_km,
            row.velocity_kmh,
            row.anomaly_score,
            if row.is_suspicious { "SUSPICIOUS" } else { "normal" }
        );
    }
    println!(
        "\nbatch {}: user {}, {} scored, {} flagged, {} dropped",
        report.batch_id,
        report.user_id,
        report.scored.len(),
        report.flagged,
        report.dropped
    );
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting {} v{}", constants::APP_NAME, constants::APP_VERSION);

    let config = PipelineConfig {
        contamination: constants::get_contamination(),
        random_seed: constants::get_random_seed(),
        ..PipelineConfig::default()
    };
    let logins = sample_batch();

    let report = if constants::get_geo_api_key().is_some() {
        log::info!("GEO_API_KEY set - using live ip2location.io lookups");
        let mut client = Ip2LocationClient::from_env();
        run_batch(&config, &mut client, logins)
    } else {
        log::info!("GEO_API_KEY not set - using the built-in geo table");
        let mut table = StaticGeoTable::new();
        run_batch(&config, &mut table, logins)
    };

    match report {
        Ok(report) => print_report(&report),
        Err(e) => {
            log::error!("batch failed: {}", e);
            std::process::exit(1);
        }
    }
}
