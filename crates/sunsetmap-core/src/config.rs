//! Configuration module
//!
//! Environment-driven configuration, loaded once at startup and passed
//! down explicitly. Call `Config::from_env()` after `dotenvy::dotenv()`.

use std::env;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 20;
const DEFAULT_DB_TIMEOUT_SECS: u64 = 30;
/// Upload grants cap the object size at 5 MiB.
const DEFAULT_UPLOAD_MAX_BYTES: u64 = 5 * 1024 * 1024;
/// Upload and download grants expire after one hour.
const DEFAULT_GRANT_TTL_SECS: u64 = 3600;

#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    // Database
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    // Object store
    pub aws_region: String,
    pub s3_bucket: String,
    /// Custom endpoint for S3-compatible providers (MinIO etc.)
    pub s3_endpoint: Option<String>,
    pub upload_max_bytes: u64,
    pub grant_ttl_seconds: u64,
    // Classifier
    pub model_path: String,
}

fn env_parsed<T: std::str::FromStr>(key: &str, default: T) -> Result<T, anyhow::Error> {
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| anyhow::anyhow!("{} is not a valid value for {}", raw, key)),
        Err(_) => Ok(default),
    }
}

fn env_required(key: &str) -> Result<String, anyhow::Error> {
    env::var(key).map_err(|_| anyhow::anyhow!("{} environment variable not set", key))
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        let cors_origins = env::var("CORS_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Config {
            server_port: env_parsed("PORT", DEFAULT_PORT)?,
            cors_origins,
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            database_url: env_required("DATABASE_URL")?,
            db_max_connections: env_parsed("DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS)?,
            db_timeout_seconds: env_parsed("DB_TIMEOUT_SECONDS", DEFAULT_DB_TIMEOUT_SECS)?,
            aws_region: env_required("AWS_REGION")?,
            s3_bucket: env_required("AWS_BUCKET_NAME")?,
            s3_endpoint: env::var("S3_ENDPOINT").ok(),
            upload_max_bytes: env_parsed("UPLOAD_MAX_BYTES", DEFAULT_UPLOAD_MAX_BYTES)?,
            grant_ttl_seconds: env_parsed("GRANT_TTL_SECONDS", DEFAULT_GRANT_TTL_SECS)?,
            model_path: env::var("MODEL_PATH")
                .unwrap_or_else(|_| "public/sunsets-model/model.onnx".to_string()),
        })
    }

    /// Fail fast on configuration that can only blow up later.
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.s3_bucket.is_empty() {
            anyhow::bail!("AWS_BUCKET_NAME must not be empty");
        }
        if self.aws_region.is_empty() {
            anyhow::bail!("AWS_REGION must not be empty");
        }
        if self.upload_max_bytes == 0 {
            anyhow::bail!("UPLOAD_MAX_BYTES must be positive");
        }
        if self.grant_ttl_seconds == 0 {
            anyhow::bail!("GRANT_TTL_SECONDS must be positive");
        }
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }
}
