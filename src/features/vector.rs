//! Feature Vector - model input projection of one enriched login

use serde::{Deserialize, Serialize};

use crate::records::TravelFeatures;

use super::layout::{
    layout_hash, validate_layout, LayoutMismatchError, FEATURE_COUNT, FEATURE_LAYOUT,
    FEATURE_VERSION,
};

/// Versioned feature vector.
///
/// Carries the layout version and hash alongside the values so the
/// detector can refuse vectors built against a different schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Feature layout version
    pub version: u8,
    /// CRC32 hash of the feature layout
    pub layout_hash: u32,
    /// Feature values in the order defined by FEATURE_LAYOUT
    pub values: [f32; FEATURE_COUNT],
}

impl FeatureVector {
    /// Create from raw values with the current layout
    pub fn from_values(values: [f32; FEATURE_COUNT]) -> Self {
        Self {
            version: FEATURE_VERSION,
            layout_hash: layout_hash(),
            values,
        }
    }

    /// Values as an array reference
    pub fn as_array(&self) -> &[f32; FEATURE_COUNT] {
        &self.values
    }

    /// Get feature by name
    pub fn get_by_name(&self, name: &str) -> Option<f32> {
        super::layout::feature_index(name).map(|i| self.values[i])
    }

    /// Validate that this vector matches the current layout
    pub fn validate(&self) -> Result<(), LayoutMismatchError> {
        validate_layout(self.version, self.layout_hash)
    }

    /// JSON dump with named values, for structured logging
    pub fn to_log_entry(&self) -> serde_json::Value {
        serde_json::json!({
            "feature_version": self.version,
            "layout_hash": self.layout_hash,
            "named_values": FEATURE_LAYOUT
                .iter()
                .zip(self.values.iter())
                .map(|(name, value)| ((*name).to_string(), *value))
                .collect::<std::collections::HashMap<_, _>>(),
        })
    }
}

impl From<&TravelFeatures> for FeatureVector {
    fn from(travel: &TravelFeatures) -> Self {
        Self::from_values([
            f32::from(travel.hour),
            f32::from(travel.weekday),
            travel.distance_km as f32,
            travel.velocity_kmh as f32,
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_values() {
        let vector = FeatureVector::from_values([8.0, 2.0, 0.0, 0.0]);
        assert_eq!(vector.version, FEATURE_VERSION);
        assert_eq!(vector.layout_hash, layout_hash());
        assert!(vector.validate().is_ok());
    }

    #[test]
    fn test_projection_order_matches_layout() {
        let travel = TravelFeatures {
            hour: 11,
            weekday: 3,
            distance_km: 9957.0,
            velocity_kmh: 4978.5,
        };
        let vector = FeatureVector::from(&travel);

        assert_eq!(vector.get_by_name("hour"), Some(11.0));
        assert_eq!(vector.get_by_name("weekday"), Some(3.0));
        assert_eq!(vector.get_by_name("distance_km"), Some(9957.0));
        assert_eq!(vector.get_by_name("velocity_kmh"), Some(4978.5));
        assert_eq!(vector.get_by_name("nonexistent"), None);
    }

    #[test]
    fn test_stale_vector_fails_validation() {
        let mut vector = FeatureVector::from_values([1.0, 1.0, 1.0, 1.0]);
        vector.version = FEATURE_VERSION + 1;
        assert!(vector.validate().is_err());
    }

    #[test]
    fn test_to_log_entry() {
        let vector = FeatureVector::from_values([8.0, 2.0, 12.5, 3.1]);
        let entry = vector.to_log_entry();
        assert_eq!(entry["feature_version"], FEATURE_VERSION);
        assert_eq!(entry["named_values"]["hour"], 8.0);
    }
}
