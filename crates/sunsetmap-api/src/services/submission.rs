//! Submission orchestrator
//!
//! Drives one submission through decode → classify → decide → grant →
//! persist. The ordering contract: nothing touches the grant issuer or
//! the record store unless classification accepted the image, and the
//! record insert happens only after the grant was issued, so a
//! credential failure can never leave behind a record that points at an
//! un-uploadable object. The inverse risk (a grant issued but the
//! insert fails) is accepted: the unreferenced object is inert.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use sunsetmap_core::{AppError, Coordinate, SunsetRecord, UploadGrant};
use sunsetmap_processing::{
    decide, normalize, Classifier, ClassifierError, DecodeError, Decision, RejectReason,
};
use sunsetmap_storage::{GrantIssuer, StorageError};
use sunsetmap_db::RecordStore;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("invalid submission: {0}")]
    Invalid(String),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("image rejected: {0}")]
    Rejected(RejectReason),

    #[error(transparent)]
    Classifier(#[from] ClassifierError),

    #[error("credential issuance failed: {0}")]
    Credential(#[from] StorageError),

    #[error("record persistence failed: {0}")]
    Persistence(#[from] AppError),
}

#[derive(Clone)]
pub struct SubmissionPipeline {
    classifier: Arc<dyn Classifier>,
    grants: Arc<dyn GrantIssuer>,
    records: Arc<dyn RecordStore>,
    upload_max_bytes: u64,
    grant_ttl: Duration,
}

impl SubmissionPipeline {
    pub fn new(
        classifier: Arc<dyn Classifier>,
        grants: Arc<dyn GrantIssuer>,
        records: Arc<dyn RecordStore>,
        upload_max_bytes: u64,
        grant_ttl: Duration,
    ) -> Self {
        Self {
            classifier,
            grants,
            records,
            upload_max_bytes,
            grant_ttl,
        }
    }

    /// Run one submission end to end. Returns the upload grant on
    /// accept; every failure is terminal, there are no retries.
    pub async fn submit(
        &self,
        image: Bytes,
        coordinate: Coordinate,
    ) -> Result<UploadGrant, SubmissionError> {
        coordinate
            .validate()
            .map_err(|e| SubmissionError::Invalid(e.to_string()))?;

        // Decode + inference are CPU-bound; run them off the request
        // executor so a slow classification does not starve concurrent
        // submissions.
        let classifier = self.classifier.clone();
        let result = tokio::task::spawn_blocking(move || {
            let tensor = normalize(&image)?;
            classifier
                .classify(&tensor)
                .map_err(SubmissionError::Classifier)
        })
        .await
        .map_err(|e| {
            SubmissionError::Classifier(ClassifierError::Inference(format!(
                "classification task failed: {e}"
            )))
        })??;

        match decide(&result) {
            Decision::Rejected(reason) => {
                tracing::info!(
                    top_class = result.top_class,
                    top_score = result.top_score,
                    reason = %reason,
                    "Submission rejected"
                );
                return Err(SubmissionError::Rejected(reason));
            }
            Decision::Accepted => {
                tracing::debug!(top_score = result.top_score, "Submission accepted");
            }
        }

        // One fresh key per accepted submission: it is both the object
        // key and the record id.
        let object_key = Uuid::new_v4();

        let grant = self
            .grants
            .issue_upload_grant(object_key, self.upload_max_bytes, self.grant_ttl)
            .await?;

        let record = SunsetRecord::new(object_key, coordinate);
        self.records.insert(&record).await?;

        tracing::info!(
            id = %object_key,
            longitude = coordinate.longitude,
            latitude = coordinate.latitude,
            "Sunset persisted"
        );

        Ok(grant)
    }
}
