//! Verdict Policy - contamination-based flagging
//!
//! The continuous anomaly score says how unusual a login is; the verdict
//! is the thresholded policy decision. Keeping them separate lets a
//! reporting layer re-rank or re-cut without re-scoring.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Two-valued outcome tag carried alongside the continuous score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Normal,
    Suspicious,
}

impl Verdict {
    pub fn is_suspicious(self) -> bool {
        matches!(self, Verdict::Suspicious)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Verdict::Normal => "NORMAL",
            Verdict::Suspicious => "SUSPICIOUS",
        }
    }
}

/// Flag the top `round(contamination * N)` scores as suspicious.
///
/// Scores are ranked descending; ties at the boundary keep input order,
/// so the earlier login wins the remaining slot.
pub fn flag_top_fraction(scores: &[f32], contamination: f32) -> Vec<Verdict> {
    let n = scores.len();
    let quota = (f64::from(contamination) * n as f64).round() as usize;
    let quota = quota.min(n);

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        scores[b]
            .partial_cmp(&scores[a])
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.cmp(&b))
    });

    let mut verdicts = vec![Verdict::Normal; n];
    for &idx in order.iter().take(quota) {
        verdicts[idx] = Verdict::Suspicious;
    }
    verdicts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count_flagged(verdicts: &[Verdict]) -> usize {
        verdicts.iter().filter(|v| v.is_suspicious()).count()
    }

    #[test]
    fn test_quota_is_rounded_fraction() {
        let scores = vec![0.9, 0.1, 0.8, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.55];
        let verdicts = flag_top_fraction(&scores, 0.2);

        assert_eq!(count_flagged(&verdicts), 2);
        assert!(verdicts[0].is_suspicious()); // 0.9
        assert!(verdicts[2].is_suspicious()); // 0.8
    }

    #[test]
    fn test_quota_rounds_to_zero_for_tiny_batch() {
        let verdicts = flag_top_fraction(&[0.99], 0.2);
        assert_eq!(count_flagged(&verdicts), 0);
    }

    #[test]
    fn test_half_of_four() {
        let verdicts = flag_top_fraction(&[0.1, 0.9, 0.2, 0.8], 0.5);
        assert_eq!(count_flagged(&verdicts), 2);
        assert!(verdicts[1].is_suspicious());
        assert!(verdicts[3].is_suspicious());
    }

    #[test]
    fn test_ties_keep_input_order() {
        // one slot, three identical scores: the earliest login gets it
        let verdicts = flag_top_fraction(&[0.5, 0.5, 0.5], 0.34);
        assert_eq!(verdicts[0], Verdict::Suspicious);
        assert_eq!(verdicts[1], Verdict::Normal);
        assert_eq!(verdicts[2], Verdict::Normal);
    }

    #[test]
    fn test_verdict_as_str() {
        assert_eq!(Verdict::Normal.as_str(), "NORMAL");
        assert_eq!(Verdict::Suspicious.as_str(), "SUSPICIOUS");
    }
}
