//! Batch Pipeline - enrichment filtering, feature building, scoring
//!
//! One invocation processes one user's closed batch in ascending
//! timestamp order: either every surviving login comes back scored and
//! labeled, or the batch fails as a whole with a `DetectorError`.
//! Enrichment failures are not errors here; those logins are dropped at
//! the boundary and counted in the report.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{DEFAULT_CONTAMINATION, DEFAULT_N_ESTIMATORS, DEFAULT_RANDOM_SEED};
use crate::error::DetectorError;
use crate::features::{build_features, FeatureVector};
use crate::geo::GeoLookup;
use crate::model::{flag_top_fraction, IsolationForest};
use crate::records::{GeoLogin, LoginEvent, ReportRow, ScoredLogin};

/// Pipeline knobs. All explicit and injectable; nothing is read from
/// hidden globals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Expected fraction of anomalous logins, in (0, 1)
    pub contamination: f32,
    /// Number of isolation trees
    pub n_estimators: usize,
    /// Per-tree subsample cap; None means min(256, batch size)
    pub max_samples: Option<usize>,
    /// Master seed for reproducible batches
    pub random_seed: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            contamination: DEFAULT_CONTAMINATION,
            n_estimators: DEFAULT_N_ESTIMATORS,
            max_samples: None,
            random_seed: DEFAULT_RANDOM_SEED,
        }
    }
}

/// Labeled output for one batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub batch_id: Uuid,
    pub user_id: String,
    pub scored: Vec<ScoredLogin>,
    /// Logins dropped because geolocation failed
    pub dropped: usize,
    /// Logins flagged suspicious
    pub flagged: usize,
}

impl BatchReport {
    /// Rows in the reporting collaborator's contract shape.
    pub fn rows(&self) -> Vec<ReportRow> {
        self.scored.iter().map(ReportRow::from).collect()
    }
}

/// Resolve each login's source IP, dropping the ones whose lookup fails.
///
/// Returns the surviving geolocated logins and the drop count. Failures
/// are logged, never fatal for the batch.
pub fn enrich_logins<L: GeoLookup>(
    lookup: &mut L,
    logins: Vec<LoginEvent>,
) -> (Vec<GeoLogin>, usize) {
    let total = logins.len();
    let mut enriched = Vec::with_capacity(total);

    for login in logins {
        match lookup.lookup(&login.ip) {
            Ok(geo) => enriched.push(GeoLogin { login, geo }),
            Err(e) => log::warn!("dropping login from {}: {}", login.ip, e),
        }
    }

    let dropped = total - enriched.len();
    if dropped > 0 {
        log::info!("geo enrichment dropped {}/{} logins", dropped, total);
    }
    (enriched, dropped)
}

/// Enrich and score one user's raw logins.
pub fn run_batch<L: GeoLookup>(
    config: &PipelineConfig,
    lookup: &mut L,
    logins: Vec<LoginEvent>,
) -> Result<BatchReport, DetectorError> {
    let (enriched, dropped) = enrich_logins(lookup, logins);
    let mut report = score_batch(config, enriched)?;
    report.dropped = dropped;
    Ok(report)
}

/// Score an already-enriched batch (ascending timestamp order).
pub fn score_batch(
    config: &PipelineConfig,
    logins: Vec<GeoLogin>,
) -> Result<BatchReport, DetectorError> {
    let enriched = build_features(&logins);
    let vectors: Vec<FeatureVector> = enriched
        .iter()
        .map(|e| FeatureVector::from(&e.travel))
        .collect();

    let mut estimator = IsolationForest::new()
        .with_n_estimators(config.n_estimators)
        .with_contamination(config.contamination)
        .with_random_state(config.random_seed);
    if let Some(cap) = config.max_samples {
        estimator = estimator.with_max_samples(cap);
    }

    let model = estimator.fit(&vectors)?;
    let scores = model.score_samples(&vectors);
    let verdicts = flag_top_fraction(&scores, model.contamination());

    let user_id = enriched
        .first()
        .map(|e| e.login.user_id.clone())
        .unwrap_or_default();

    let scored: Vec<ScoredLogin> = enriched
        .into_iter()
        .zip(scores)
        .zip(verdicts)
        .map(|((record, anomaly_score), verdict)| ScoredLogin {
            record,
            anomaly_score,
            verdict,
        })
        .collect();

    let flagged = scored.iter().filter(|s| s.is_suspicious()).count();
    log::info!(
        "scored batch of {} logins for user {}: {} flagged",
        scored.len(),
        user_id,
        flagged
    );

    Ok(BatchReport {
        batch_id: Uuid::new_v4(),
        user_id,
        scored,
        dropped: 0,
        flagged,
    })
}

// ============================================================================
// TESTS
// ============================================================================
