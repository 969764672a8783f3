//! Central Configuration Constants
//!
//! Single source of truth for pipeline defaults.
//! To change a default hyperparameter, only edit this file.

/// Default expected fraction of anomalous logins per batch
pub const DEFAULT_CONTAMINATION: f32 = 0.2;

/// Default number of trees in the ensemble
pub const DEFAULT_N_ESTIMATORS: usize = 100;

/// Default cap on the per-tree subsample size (actual size is
/// min of this and the batch size)
pub const DEFAULT_MAX_SAMPLES: usize = 256;

/// Default master seed for reproducible batches
pub const DEFAULT_RANDOM_SEED: u64 = 42;

/// Geolocation API endpoint
pub const GEO_API_BASE: &str = "https://api.ip2location.io/";

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "Login Sentinel";

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Get geolocation API key from environment, if configured
pub fn get_geo_api_key() -> Option<String> {
    std::env::var("GEO_API_KEY").ok().filter(|k| !k.is_empty())
}

/// Get contamination from environment or use default
pub fn get_contamination() -> f32 {
    std::env::var("SENTINEL_CONTAMINATION")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_CONTAMINATION)
}

/// Get random seed from environment or use default
pub fn get_random_seed() -> u64 {
    std::env::var("SENTINEL_RANDOM_SEED")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_RANDOM_SEED)
}
