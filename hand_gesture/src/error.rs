//! Errors for landmark input.

use crate::landmarks::LANDMARK_COUNT;

/// Why a raw landmark list was rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GestureError {
    #[error("expected {expected} landmarks, got {got}")]
    LandmarkCount { expected: usize, got: usize },

    #[error("landmark {index} has a non-finite coordinate")]
    NonFiniteCoordinate { index: usize },
}

impl GestureError {
    pub(crate) fn count(got: usize) -> Self {
        GestureError::LandmarkCount { expected: LANDMARK_COUNT, got }
    }
}

pub type GestureResult<T> = std::result::Result<T, GestureError>;
