//! Classifier capability
//!
//! The model is an opaque pure function from a normalized tensor to
//! per-class probability scores. Implementations must be swappable so
//! tests can inject fixed scores.

use crate::tensor::ImageTensor;

#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    #[error("failed to load model: {0}")]
    ModelLoad(String),

    #[error("inference failed: {0}")]
    Inference(String),

    #[error("classifier produced invalid output: {0}")]
    InvalidOutput(String),
}

/// Per-class scores plus the argmax, treated as a probability
/// distribution over `[not-sunset, sunset]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationResult {
    pub scores: Vec<f32>,
    pub top_class: usize,
    pub top_score: f32,
}

impl ClassificationResult {
    pub fn from_scores(scores: Vec<f32>) -> Result<Self, ClassifierError> {
        if scores.is_empty() {
            return Err(ClassifierError::InvalidOutput(
                "empty score vector".to_string(),
            ));
        }
        if scores.iter().any(|s| !s.is_finite()) {
            return Err(ClassifierError::InvalidOutput(
                "non-finite score".to_string(),
            ));
        }
        let (top_class, top_score) = scores
            .iter()
            .copied()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .expect("non-empty scores");
        Ok(Self {
            scores,
            top_class,
            top_score,
        })
    }
}

pub trait Classifier: Send + Sync {
    fn classify(&self, input: &ImageTensor) -> Result<ClassificationResult, ClassifierError>;
}
