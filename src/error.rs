//! Error handling

use thiserror::Error;

use crate::features::layout::LayoutMismatchError;

/// Errors raised at the anomaly-detector boundary.
///
/// A batch either yields a complete, fully labeled report or fails as a
/// whole with one of these; there is no partially scored output.
#[derive(Debug, Error)]
pub enum DetectorError {
    /// Fit was called on an empty batch
    #[error("cannot fit on an empty batch; at least one login is required")]
    InsufficientData,

    /// Contamination outside the open interval (0, 1)
    #[error("contamination must be in (0, 1), got {0}")]
    InvalidContamination(f32),

    /// Feature vectors were built against a different layout version
    #[error(transparent)]
    LayoutMismatch(#[from] LayoutMismatchError),
}
