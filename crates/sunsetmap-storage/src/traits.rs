//! Grant issuer abstraction

use std::time::Duration;

use async_trait::async_trait;
use sunsetmap_core::UploadGrant;
use thiserror::Error;
use uuid::Uuid;

/// Credential issuance errors. All of these are fatal for the
/// submission that triggered them; no partial grant is ever returned.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage configuration error: {0}")]
    Config(String),

    #[error("Credential signing failed: {0}")]
    Signing(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Issues scoped, time-limited credentials for the object store.
///
/// Implementations delegate to the store's signing capability and must
/// not transfer any object bytes themselves.
#[async_trait]
pub trait GrantIssuer: Send + Sync {
    /// Produce a one-shot write credential for `object_key`, capped at
    /// `max_bytes` and expiring after `ttl`.
    async fn issue_upload_grant(
        &self,
        object_key: Uuid,
        max_bytes: u64,
        ttl: Duration,
    ) -> StorageResult<UploadGrant>;

    /// Produce a time-limited read URL for `object_key`.
    async fn issue_download_grant(&self, object_key: Uuid, ttl: Duration)
        -> StorageResult<String>;
}
