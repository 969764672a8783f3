//! Feature Layout - Centralized Feature Definition
//!
//! The single source of truth for the model's input schema.
//!
//! ## Rules (NEVER break these):
//! 1. Add feature -> increment FEATURE_VERSION
//! 2. Change order -> increment FEATURE_VERSION
//! 3. Remove feature -> increment FEATURE_VERSION
//!
//! A trained model only makes sense against the layout its vectors were
//! built with; the hash lets fit detect drift instead of silently scoring
//! garbage.

use crc32fast::Hasher;
use once_cell::sync::Lazy;
use thiserror::Error;

/// Current feature layout version
pub const FEATURE_VERSION: u8 = 1;

/// Feature names in the exact order they appear in the vector
pub const FEATURE_LAYOUT: &[&str] = &[
    "hour",         // 0: hour of day the login occurred (0-23)
    "weekday",      // 1: day of week, Monday = 0
    "distance_km",  // 2: great-circle distance from the previous login
    "velocity_kmh", // 3: implied travel speed since the previous login
];

/// Total number of features
/// IMPORTANT: Must match FEATURE_LAYOUT.len()!
pub const FEATURE_COUNT: usize = 4;

static LAYOUT_HASH: Lazy<u32> = Lazy::new(|| {
    let mut hasher = Hasher::new();
    hasher.update(&[FEATURE_VERSION]);
    for name in FEATURE_LAYOUT {
        hasher.update(name.as_bytes());
        hasher.update(&[0]); // separator
    }
    hasher.finalize()
});

/// CRC32 hash of the layout, used to detect schema drift at fit time
pub fn layout_hash() -> u32 {
    *LAYOUT_HASH
}

/// Error when incoming data was built against a different layout
#[derive(Debug, Clone, Error)]
#[error(
    "feature layout mismatch: expected v{expected_version} (hash {expected_hash:08x}), \
     got v{actual_version} (hash {actual_hash:08x})"
)]
pub struct LayoutMismatchError {
    pub expected_version: u8,
    pub expected_hash: u32,
    pub actual_version: u8,
    pub actual_hash: u32,
}

/// Validate that incoming data matches the current layout
pub fn validate_layout(version: u8, hash: u32) -> Result<(), LayoutMismatchError> {
    if version != FEATURE_VERSION || hash != layout_hash() {
        return Err(LayoutMismatchError {
            expected_version: FEATURE_VERSION,
            expected_hash: layout_hash(),
            actual_version: version,
            actual_hash: hash,
        });
    }
    Ok(())
}

/// Get feature index by name
pub fn feature_index(name: &str) -> Option<usize> {
    FEATURE_LAYOUT.iter().position(|&n| n == name)
}

/// Get feature name by index
pub fn feature_name(index: usize) -> Option<&'static str> {
    FEATURE_LAYOUT.get(index).copied()
}
