//! ONNX-backed classifier
//!
//! Loads the exported sunsets model once at startup and runs it with
//! tract. The plan is immutable after optimization, so `classify` takes
//! `&self` and is safe to call from concurrent blocking tasks.

use std::path::Path;

use tract_onnx::prelude::*;

use crate::classifier::{ClassificationResult, Classifier, ClassifierError};
use crate::tensor::ImageTensor;

type OnnxPlan = RunnableModel<TypedFact, Box<dyn TypedOp>, TypedModel>;

pub struct OnnxClassifier {
    plan: OnnxPlan,
}

impl OnnxClassifier {
    pub fn load(model_path: impl AsRef<Path>) -> Result<Self, ClassifierError> {
        let model_path = model_path.as_ref();
        let plan = tract_onnx::onnx()
            .model_for_path(model_path)
            .and_then(|model| {
                let shape = ImageTensor::shape();
                model.with_input_fact(
                    0,
                    InferenceFact::dt_shape(f32::datum_type(), tvec!(shape[0], shape[1], shape[2], shape[3])),
                )
            })
            .and_then(|model| model.into_optimized())
            .and_then(|model| model.into_runnable())
            .map_err(|e| ClassifierError::ModelLoad(format!("{}: {e}", model_path.display())))?;

        tracing::info!(model = %model_path.display(), "Classifier model loaded");
        Ok(Self { plan })
    }
}

impl Classifier for OnnxClassifier {
    fn classify(&self, input: &ImageTensor) -> Result<ClassificationResult, ClassifierError> {
        let tensor = Tensor::from_shape(&ImageTensor::shape(), input.as_slice())
            .map_err(|e| ClassifierError::Inference(e.to_string()))?;

        let outputs = self
            .plan
            .run(tvec!(tensor.into()))
            .map_err(|e| ClassifierError::Inference(e.to_string()))?;

        let scores = outputs
            .first()
            .ok_or_else(|| ClassifierError::InvalidOutput("no output tensor".to_string()))?
            .to_array_view::<f32>()
            .map_err(|e| ClassifierError::InvalidOutput(e.to_string()))?
            .iter()
            .copied()
            .collect();

        ClassificationResult::from_scores(scores)
    }
}
