//! Accept/reject decision policy
//!
//! Pure function of `(top_class, top_score)`. Class 0 is "not a
//! sunset", class 1 is "sunset"; a sunset prediction below the
//! confidence threshold is rejected just like a non-sunset.

use crate::classifier::ClassificationResult;

/// Class index the model assigns to sunsets.
pub const SUNSET_CLASS: usize = 1;
/// Minimum top score required to accept a sunset prediction.
pub const CONFIDENCE_THRESHOLD: f32 = 0.90;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    NotSunset,
    LowConfidence,
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectReason::NotSunset => write!(f, "not a sunset"),
            RejectReason::LowConfidence => write!(f, "low confidence"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Accepted,
    Rejected(RejectReason),
}

pub fn decide(result: &ClassificationResult) -> Decision {
    if result.top_class != SUNSET_CLASS {
        return Decision::Rejected(RejectReason::NotSunset);
    }
    if result.top_score < CONFIDENCE_THRESHOLD {
        return Decision::Rejected(RejectReason::LowConfidence);
    }
    Decision::Accepted
}
