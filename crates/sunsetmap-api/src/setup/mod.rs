//! Startup wiring
//!
//! Builds every external capability once and hands the router a fully
//! constructed `AppState`.

pub mod database;
pub mod routes;
pub mod server;

use std::sync::Arc;
use std::time::Duration;

use sunsetmap_core::Config;
use sunsetmap_db::{RecordStore, SunsetRepository};
use sunsetmap_processing::{Classifier, OnnxClassifier};
use sunsetmap_storage::{GrantIssuer, S3GrantIssuer};

use crate::services::submission::SubmissionPipeline;
use crate::state::AppState;

pub async fn initialize_app(config: Config) -> anyhow::Result<Arc<AppState>> {
    config.validate()?;

    let pool = database::connect(&config).await?;
    let records: Arc<dyn RecordStore> = Arc::new(SunsetRepository::new(pool));

    let grants: Arc<dyn GrantIssuer> = Arc::new(
        S3GrantIssuer::new(
            config.s3_bucket.clone(),
            config.aws_region.clone(),
            config.s3_endpoint.clone(),
        )
        .await?,
    );

    let classifier: Arc<dyn Classifier> = Arc::new(OnnxClassifier::load(&config.model_path)?);

    let pipeline = SubmissionPipeline::new(
        classifier,
        grants.clone(),
        records.clone(),
        config.upload_max_bytes,
        Duration::from_secs(config.grant_ttl_seconds),
    );

    Ok(Arc::new(AppState {
        pipeline,
        records,
        grants,
        config,
    }))
}
