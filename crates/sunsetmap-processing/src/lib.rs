//! Image preprocessing and sunset classification
//!
//! Turns uploaded image bytes into the fixed-size tensor the classifier
//! was trained on, runs the (opaque) classifier, and applies the
//! accept/reject decision policy.

pub mod classifier;
pub mod gate;
pub mod onnx;
pub mod preprocess;
pub mod tensor;

pub use classifier::{ClassificationResult, Classifier, ClassifierError};
pub use gate::{decide, Decision, RejectReason, CONFIDENCE_THRESHOLD, SUNSET_CLASS};
pub use onnx::OnnxClassifier;
pub use preprocess::{normalize, DecodeError};
pub use tensor::ImageTensor;
