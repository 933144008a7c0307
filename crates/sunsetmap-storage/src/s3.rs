//! S3 grant issuer
//!
//! Download grants use the SDK's presigner; upload grants use a signed
//! POST policy so the 5 MiB ceiling travels inside the credential.
//! Credentials come from the default AWS provider chain (env vars,
//! profile, instance role).

use std::time::Duration;

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_credential_types::provider::{ProvideCredentials, SharedCredentialsProvider};
use aws_sdk_s3::presigning::PresigningConfig;
use chrono::Utc;
use sunsetmap_core::UploadGrant;
use uuid::Uuid;

use crate::post_policy::{self, PostPolicyRequest};
use crate::traits::{GrantIssuer, StorageError, StorageResult};

#[derive(Clone)]
pub struct S3GrantIssuer {
    client: aws_sdk_s3::Client,
    credentials: SharedCredentialsProvider,
    bucket: String,
    region: String,
    endpoint_url: Option<String>,
}

impl S3GrantIssuer {
    /// Build an issuer for `bucket` in `region`. `endpoint_url` switches
    /// to path-style addressing for S3-compatible providers (MinIO,
    /// Spaces).
    pub async fn new(
        bucket: String,
        region: String,
        endpoint_url: Option<String>,
    ) -> StorageResult<Self> {
        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(aws_config::Region::new(region.clone()))
            .load()
            .await;

        let credentials = config
            .credentials_provider()
            .ok_or_else(|| StorageError::Config("no AWS credentials configured".to_string()))?;

        let mut builder = aws_sdk_s3::config::Builder::from(&config);
        if let Some(ref endpoint) = endpoint_url {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }
        let client = aws_sdk_s3::Client::from_conf(builder.build());

        tracing::info!(bucket = %bucket, region = %region, "S3 grant issuer initialized");

        Ok(Self {
            client,
            credentials,
            bucket,
            region,
            endpoint_url,
        })
    }

    /// POST target for browser uploads.
    fn upload_url(&self) -> String {
        match self.endpoint_url {
            Some(ref endpoint) => {
                format!("{}/{}", endpoint.trim_end_matches('/'), self.bucket)
            }
            None => format!("https://{}.s3.{}.amazonaws.com", self.bucket, self.region),
        }
    }
}

#[async_trait]
impl GrantIssuer for S3GrantIssuer {
    async fn issue_upload_grant(
        &self,
        object_key: Uuid,
        max_bytes: u64,
        ttl: Duration,
    ) -> StorageResult<UploadGrant> {
        let creds = self
            .credentials
            .provide_credentials()
            .await
            .map_err(|e| StorageError::Config(format!("credential resolution failed: {e}")))?;

        let key = object_key.to_string();
        let signed = post_policy::sign(&PostPolicyRequest {
            bucket: &self.bucket,
            region: &self.region,
            key: &key,
            max_bytes,
            ttl,
            access_key_id: creds.access_key_id(),
            secret_access_key: creds.secret_access_key(),
            session_token: creds.session_token(),
            signed_at: Utc::now(),
        })?;

        tracing::debug!(
            object_key = %object_key,
            expires_at = %signed.expires_at,
            max_bytes,
            "Issued upload grant"
        );

        Ok(UploadGrant {
            object_key,
            url: self.upload_url(),
            fields: signed.fields,
            expires_at: signed.expires_at,
        })
    }

    async fn issue_download_grant(
        &self,
        object_key: Uuid,
        ttl: Duration,
    ) -> StorageResult<String> {
        let presigning = PresigningConfig::expires_in(ttl)
            .map_err(|e| StorageError::Config(format!("invalid presigning config: {e}")))?;

        let presigned = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(object_key.to_string())
            .presigned(presigning)
            .await
            .map_err(|e| StorageError::Signing(e.to_string()))?;

        Ok(presigned.uri().to_string())
    }
}
