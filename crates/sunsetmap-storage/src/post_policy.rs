//! SigV4 POST policy signing
//!
//! Builds and signs the browser-upload POST policy for S3. This is what
//! lets the grant carry a hard `content-length-range` ceiling, which a
//! plain presigned PUT cannot express. The policy document and the
//! signing-key derivation follow the AWS Signature Version 4 spec.

use std::collections::BTreeMap;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::traits::{StorageError, StorageResult};

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "AWS4-HMAC-SHA256";

pub struct PostPolicyRequest<'a> {
    pub bucket: &'a str,
    pub region: &'a str,
    pub key: &'a str,
    pub max_bytes: u64,
    pub ttl: Duration,
    pub access_key_id: &'a str,
    pub secret_access_key: &'a str,
    pub session_token: Option<&'a str>,
    pub signed_at: DateTime<Utc>,
}

pub struct SignedPostPolicy {
    /// Form fields the client must POST alongside the file.
    pub fields: BTreeMap<String, String>,
    pub expires_at: DateTime<Utc>,
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> StorageResult<Vec<u8>> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| StorageError::Signing(format!("invalid HMAC key: {e}")))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Derive the SigV4 signing key for a given day, region, and service.
pub(crate) fn derive_signing_key(
    secret_access_key: &str,
    date_stamp: &str,
    region: &str,
    service: &str,
) -> StorageResult<Vec<u8>> {
    let k_date = hmac_sha256(
        format!("AWS4{secret_access_key}").as_bytes(),
        date_stamp.as_bytes(),
    )?;
    let k_region = hmac_sha256(&k_date, region.as_bytes())?;
    let k_service = hmac_sha256(&k_region, service.as_bytes())?;
    hmac_sha256(&k_service, b"aws4_request")
}

pub fn sign(request: &PostPolicyRequest<'_>) -> StorageResult<SignedPostPolicy> {
    let ttl = chrono::Duration::from_std(request.ttl)
        .map_err(|e| StorageError::Config(format!("grant TTL out of range: {e}")))?;
    let expires_at = request.signed_at + ttl;

    let amz_date = request.signed_at.format("%Y%m%dT%H%M%SZ").to_string();
    let date_stamp = request.signed_at.format("%Y%m%d").to_string();
    let credential = format!(
        "{}/{}/{}/s3/aws4_request",
        request.access_key_id, date_stamp, request.region
    );

    let mut conditions = vec![
        serde_json::json!({ "bucket": request.bucket }),
        serde_json::json!({ "key": request.key }),
        serde_json::json!(["content-length-range", 0, request.max_bytes]),
        serde_json::json!({ "x-amz-algorithm": ALGORITHM }),
        serde_json::json!({ "x-amz-credential": credential }),
        serde_json::json!({ "x-amz-date": amz_date }),
    ];
    if let Some(token) = request.session_token {
        conditions.push(serde_json::json!({ "x-amz-security-token": token }));
    }

    let policy = serde_json::json!({
        "expiration": expires_at.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
        "conditions": conditions,
    });
    let policy_b64 = BASE64.encode(policy.to_string());

    let signing_key =
        derive_signing_key(request.secret_access_key, &date_stamp, request.region, "s3")?;
    let signature = hex::encode(hmac_sha256(&signing_key, policy_b64.as_bytes())?);

    let mut fields = BTreeMap::new();
    fields.insert("key".to_string(), request.key.to_string());
    fields.insert("policy".to_string(), policy_b64);
    fields.insert("x-amz-algorithm".to_string(), ALGORITHM.to_string());
    fields.insert("x-amz-credential".to_string(), credential);
    fields.insert("x-amz-date".to_string(), amz_date);
    fields.insert("x-amz-signature".to_string(), signature);
    if let Some(token) = request.session_token {
        fields.insert("x-amz-security-token".to_string(), token.to_string());
    }

    Ok(SignedPostPolicy { fields, expires_at })
}
