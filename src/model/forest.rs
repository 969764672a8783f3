//! Isolation Forest Ensemble
//!
//! Scores feature vectors by ease of isolation: a vector that random
//! axis-aligned splits separate from the rest of the batch in a few steps
//! gets a score near 1, typical vectors land near 0.5 or below.
//!
//! `IsolationForest` holds the hyperparameters; `fit` returns an immutable
//! `ForestModel` that owns the trees, so scoring carries no hidden state
//! and a model can be shared freely across threads.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_CONTAMINATION, DEFAULT_MAX_SAMPLES, DEFAULT_N_ESTIMATORS, DEFAULT_RANDOM_SEED,
};
use crate::error::DetectorError;
use crate::features::layout::FEATURE_COUNT;
use crate::features::FeatureVector;

use super::threshold::{flag_top_fraction, Verdict};

/// Euler-Mascheroni constant, used in the expected path length estimate
const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

/// Odd multiplier for deriving independent per-tree seeds from the master
/// seed, so parallel and sequential construction stay bit-identical
const SEED_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

// ============================================================================
// TREES
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
enum TreeNode {
    Split {
        feature: usize,
        threshold: f32,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
    Leaf {
        size: usize,
    },
}

/// One ensemble member. Owned exclusively by its `ForestModel` and never
/// mutated after construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct IsolationTree {
    root: TreeNode,
}

impl IsolationTree {
    fn grow(points: &[[f32; FEATURE_COUNT]], depth_cap: usize, rng: &mut StdRng) -> Self {
        Self {
            root: grow_node(points, 0, depth_cap, rng),
        }
    }

    /// Edges from the root to the external node reached by `x`, plus the
    /// expected extra depth for the points that leaf still holds.
    fn path_length(&self, x: &[f32; FEATURE_COUNT]) -> f64 {
        let mut node = &self.root;
        let mut edges = 0usize;
        loop {
            match node {
                TreeNode::Leaf { size } => {
                    return edges as f64 + expected_path_length(*size);
                }
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if x[*feature] < *threshold { left } else { right };
                    edges += 1;
                }
            }
        }
    }
}

fn grow_node(
    points: &[[f32; FEATURE_COUNT]],
    depth: usize,
    depth_cap: usize,
    rng: &mut StdRng,
) -> TreeNode {
    if points.len() <= 1 || depth >= depth_cap {
        return TreeNode::Leaf {
            size: points.len(),
        };
    }

    let feature = rng.gen_range(0..FEATURE_COUNT);
    let (min, max) = feature_bounds(points, feature);
    if max <= min {
        // every point is identical on the drawn dimension
        return TreeNode::Leaf {
            size: points.len(),
        };
    }

    let threshold = rng.gen_range(min..max);
    let (left, right): (Vec<[f32; FEATURE_COUNT]>, Vec<[f32; FEATURE_COUNT]>) = points
        .iter()
        .copied()
        .partition(|p| p[feature] < threshold);

    if left.is_empty() || right.is_empty() {
        return TreeNode::Leaf {
            size: points.len(),
        };
    }

    TreeNode::Split {
        feature,
        threshold,
        left: Box::new(grow_node(&left, depth + 1, depth_cap, rng)),
        right: Box::new(grow_node(&right, depth + 1, depth_cap, rng)),
    }
}

fn feature_bounds(points: &[[f32; FEATURE_COUNT]], feature: usize) -> (f32, f32) {
    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;
    for p in points {
        let v = p[feature];
        if v < min {
            min = v;
        }
        if v > max {
            max = v;
        }
    }
    (min, max)
}

/// c(n): average path length of an unsuccessful search in a binary search
/// tree of n points. Lets multi-point leaves contribute a realistic depth
/// and normalizes ensemble scores across subsample sizes.
fn expected_path_length(n: usize) -> f64 {
    if n <= 1 {
        return 0.0;
    }
    let nf = n as f64;
    2.0 * ((nf - 1.0).ln() + EULER_GAMMA) - 2.0 * (nf - 1.0) / nf
}

/// Independent deterministic stream per tree, derived from the master seed.
fn tree_rng(master: u64, tree_index: usize) -> StdRng {
    StdRng::seed_from_u64(master ^ (tree_index as u64).wrapping_mul(SEED_STRIDE))
}

// ============================================================================
// ESTIMATOR
// ============================================================================

/// Isolation Forest estimator configuration.
///
/// `fit` is non-consuming, so one configuration can train models for many
/// batches. All knobs are explicit; nothing is read from globals.
#[derive(Debug, Clone)]
pub struct IsolationForest {
    n_estimators: usize,
    contamination: f32,
    max_samples: Option<usize>,
    random_state: u64,
}

impl Default for IsolationForest {
    fn default() -> Self {
        Self::new()
    }
}

impl IsolationForest {
    #[must_use]
    pub fn new() -> Self {
        Self {
            n_estimators: DEFAULT_N_ESTIMATORS,
            contamination: DEFAULT_CONTAMINATION,
            max_samples: None,
            random_state: DEFAULT_RANDOM_SEED,
        }
    }

    /// Sets the number of trees in the ensemble.
    #[must_use]
    pub fn with_n_estimators(mut self, n_estimators: usize) -> Self {
        self.n_estimators = n_estimators;
        self
    }

    /// Sets the expected fraction of anomalies, in (0, 1).
    #[must_use]
    pub fn with_contamination(mut self, contamination: f32) -> Self {
        self.contamination = contamination;
        self
    }

    /// Sets the per-tree subsample cap (actual size is min of this and
    /// the batch size).
    #[must_use]
    pub fn with_max_samples(mut self, max_samples: usize) -> Self {
        self.max_samples = Some(max_samples);
        self
    }

    /// Sets the master seed for reproducible fits.
    #[must_use]
    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = seed;
        self
    }

    /// Trains an ensemble on the batch.
    ///
    /// # Errors
    ///
    /// Returns an error if the batch is empty, contamination is outside
    /// (0, 1), or any vector was built against a stale feature layout.
    pub fn fit(&self, samples: &[FeatureVector]) -> Result<ForestModel, DetectorError> {
        if samples.is_empty() {
            return Err(DetectorError::InsufficientData);
        }
        if !(self.contamination > 0.0 && self.contamination < 1.0) {
            return Err(DetectorError::InvalidContamination(self.contamination));
        }
        for vector in samples {
            vector.validate()?;
        }

        let points: Vec<[f32; FEATURE_COUNT]> =
            samples.iter().map(|v| *v.as_array()).collect();
        let n = points.len();

        let subsample = self.max_samples.unwrap_or(DEFAULT_MAX_SAMPLES).clamp(1, n);
        let depth_cap = (subsample as f64).log2().ceil() as usize;
        let n_trees = self.n_estimators.max(1);

        let mut trees = Vec::with_capacity(n_trees);
        for index in 0..n_trees {
            let mut rng = tree_rng(self.random_state, index);
            let chosen = rand::seq::index::sample(&mut rng, n, subsample);
            let subset: Vec<[f32; FEATURE_COUNT]> =
                chosen.iter().map(|i| points[i]).collect();
            trees.push(IsolationTree::grow(&subset, depth_cap, &mut rng));
        }

        log::debug!(
            "fitted isolation forest: {} trees, subsample {}, batch {}",
            trees.len(),
            subsample,
            n
        );

        Ok(ForestModel {
            trees,
            subsample_size: subsample,
            contamination: self.contamination,
        })
    }
}

// ============================================================================
// TRAINED MODEL
// ============================================================================

/// Trained ensemble returned by `fit`. Immutable; scoring never mutates,
/// so a model is safe to share across concurrent queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestModel {
    trees: Vec<IsolationTree>,
    subsample_size: usize,
    contamination: f32,
}

impl ForestModel {
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn subsample_size(&self) -> usize {
        self.subsample_size
    }

    pub fn contamination(&self) -> f32 {
        self.contamination
    }

    /// Normalized anomaly score in (0, 1] per sample: `2^(-h/c(psi))`
    /// where h is the mean corrected path length across trees. Higher
    /// means easier to isolate, hence more anomalous.
    pub fn score_samples(&self, samples: &[FeatureVector]) -> Vec<f32> {
        let normalizer = expected_path_length(self.subsample_size);

        samples
            .iter()
            .map(|vector| {
                let x = vector.as_array();
                let total: f64 = self.trees.iter().map(|t| t.path_length(x)).sum();
                let mean = total / self.trees.len() as f64;
                if normalizer > 0.0 {
                    2.0_f64.powf(-mean / normalizer) as f32
                } else {
                    // single-point subsample: every path is trivial
                    1.0
                }
            })
            .collect()
    }

    /// Scores and flags in one call: the top `contamination * N` by score
    /// are `Suspicious`.
    pub fn predict(&self, samples: &[FeatureVector]) -> Vec<Verdict> {
        flag_top_fraction(&self.score_samples(samples), self.contamination)
    }
}

// ============================================================================
// TESTS
// ============================================================================
