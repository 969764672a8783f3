//! Login Sentinel - impossible travel detection core.
//!
//! Geolocates the source IP of each login, derives travel-plausibility
//! features (hour, weekday, distance and implied velocity since the user's
//! previous login) and scores each event with an unsupervised Isolation
//! Forest ensemble. One user's login history is processed as a closed,
//! time-ordered batch.
//!
//! Data flows Geo Enrichment -> Feature Builder -> Anomaly Detector ->
//! Reporting. This crate owns the middle two stages plus the collaborator
//! seams on either side:
//!
//! - `geo` - IP-to-location lookup seam and great-circle distance
//! - `features` - versioned feature layout and the sequential travel pass
//! - `model` - Isolation Forest ensemble and the verdict policy
//! - `records` - statically-shaped batch record types
//! - `pipeline` - batch orchestration and the report artifact

pub mod constants;
pub mod error;
pub mod features;
pub mod geo;
pub mod model;
pub mod pipeline;
pub mod records;

pub use error::DetectorError;
pub use features::FeatureVector;
pub use geo::{GeoError, GeoLookup, GeoRecord};
pub use model::{ForestModel, IsolationForest, Verdict};
pub use pipeline::{run_batch, score_batch, BatchReport, PipelineConfig};
pub use records::{EnrichedLogin, GeoLogin, LoginEvent, ReportRow, ScoredLogin};
