//! Anomaly Detector - Isolation Forest ensemble and verdict policy
//!
//! `forest` owns tree construction and scoring; `threshold` turns the
//! continuous scores into the thresholded policy decision.

pub mod forest;
pub mod threshold;

pub use forest::{ForestModel, IsolationForest};
pub use threshold::{flag_top_fraction, Verdict};
