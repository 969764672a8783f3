//! Feature Builder - turns geolocated logins into model input
//!
//! `layout` is the single source of truth for the feature schema,
//! `vector` wraps one login's values with the layout contract, and
//! `travel` is the sequential derivation pass.

pub mod layout;
pub mod travel;
pub mod vector;


pub use layout::{FEATURE_COUNT, FEATURE_LAYOUT, FEATURE_VERSION};
pub use travel::build_features;
pub use vector::FeatureVector;
