//! Application state
//!
//! Every external capability (classifier, grant issuer, record store)
//! is constructed once at startup and injected here. No ambient
//! singletons.

use std::sync::Arc;
use std::time::Duration;

use sunsetmap_core::Config;
use sunsetmap_db::RecordStore;
use sunsetmap_storage::GrantIssuer;

use crate::services::submission::SubmissionPipeline;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: SubmissionPipeline,
    pub records: Arc<dyn RecordStore>,
    pub grants: Arc<dyn GrantIssuer>,
    pub config: Config,
}

impl AppState {
    /// TTL applied to download grants issued per read.
    pub fn download_grant_ttl(&self) -> Duration {
        Duration::from_secs(self.config.grant_ttl_seconds)
    }
}

fn _assert_app_state_send_sync() {
    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}
    assert_send::<AppState>();
    assert_sync::<AppState>();
}
