//! End-to-end HTTP tests against stubbed capabilities.
//!
//! The classifier returns scripted scores, the grant issuer counts and
//! fabricates credentials, and records live in memory. Everything else
//! is the real router, handlers, and pipeline.

use std::collections::BTreeMap;
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use chrono::Utc;
use sunsetmap_api::services::submission::SubmissionPipeline;
use sunsetmap_api::setup::routes::build_router;
use sunsetmap_api::state::AppState;
use sunsetmap_core::{Config, Coordinate, SunsetRecord, UploadGrant};
use sunsetmap_db::{InMemoryRecordStore, RecordStore};
use sunsetmap_processing::{ClassificationResult, Classifier, ClassifierError, ImageTensor};
use sunsetmap_storage::{GrantIssuer, StorageError, StorageResult};
use uuid::Uuid;

struct ScriptedClassifier {
    scores: Vec<f32>,
    calls: AtomicUsize,
}

impl ScriptedClassifier {
    fn new(scores: Vec<f32>) -> Self {
        Self {
            scores,
            calls: AtomicUsize::new(0),
        }
    }
}

impl Classifier for ScriptedClassifier {
    fn classify(&self, _input: &ImageTensor) -> Result<ClassificationResult, ClassifierError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        ClassificationResult::from_scores(self.scores.clone())
    }
}

struct CountingGrantIssuer {
    upload_calls: AtomicUsize,
    download_calls: AtomicUsize,
    fail_uploads: bool,
}

impl CountingGrantIssuer {
    fn new(fail_uploads: bool) -> Self {
        Self {
            upload_calls: AtomicUsize::new(0),
            download_calls: AtomicUsize::new(0),
            fail_uploads,
        }
    }
}

#[async_trait]
impl GrantIssuer for CountingGrantIssuer {
    async fn issue_upload_grant(
        &self,
        object_key: Uuid,
        max_bytes: u64,
        ttl: Duration,
    ) -> StorageResult<UploadGrant> {
        self.upload_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_uploads {
            return Err(StorageError::Signing("simulated outage".to_string()));
        }
        let mut fields = BTreeMap::new();
        fields.insert("key".to_string(), object_key.to_string());
        fields.insert("policy".to_string(), "c3R1Yg==".to_string());
        fields.insert(
            "x-amz-signature".to_string(),
            format!("sig-for-{max_bytes}"),
        );
        Ok(UploadGrant {
            object_key,
            url: "https://sunsets.s3.test/upload".to_string(),
            fields,
            expires_at: Utc::now() + chrono::Duration::from_std(ttl).unwrap(),
        })
    }

    async fn issue_download_grant(&self, object_key: Uuid, _ttl: Duration) -> StorageResult<String> {
        self.download_calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!("https://sunsets.s3.test/{object_key}?signed=1"))
    }
}

fn test_config() -> Config {
    Config {
        server_port: 0,
        cors_origins: vec![],
        environment: "test".to_string(),
        database_url: "postgres://unused/test".to_string(),
        db_max_connections: 1,
        db_timeout_seconds: 5,
        aws_region: "ap-southeast-2".to_string(),
        s3_bucket: "sunsets-test".to_string(),
        s3_endpoint: None,
        upload_max_bytes: 5 * 1024 * 1024,
        grant_ttl_seconds: 3600,
        model_path: "unused.onnx".to_string(),
    }
}

struct TestApp {
    server: TestServer,
    records: Arc<InMemoryRecordStore>,
    grants: Arc<CountingGrantIssuer>,
}

fn build_app(scores: Vec<f32>, fail_uploads: bool) -> TestApp {
    let records = Arc::new(InMemoryRecordStore::new());
    let grants = Arc::new(CountingGrantIssuer::new(fail_uploads));
    let classifier: Arc<dyn Classifier> = Arc::new(ScriptedClassifier::new(scores));
    let config = test_config();

    let pipeline = SubmissionPipeline::new(
        classifier,
        grants.clone() as Arc<dyn GrantIssuer>,
        records.clone() as Arc<dyn RecordStore>,
        config.upload_max_bytes,
        Duration::from_secs(config.grant_ttl_seconds),
    );

    let state = Arc::new(AppState {
        pipeline,
        records: records.clone() as Arc<dyn RecordStore>,
        grants: grants.clone() as Arc<dyn GrantIssuer>,
        config,
    });

    TestApp {
        server: TestServer::new(build_router(state)).unwrap(),
        records,
        grants,
    }
}

fn png_bytes() -> Vec<u8> {
    let img = image::RgbImage::from_pixel(32, 32, image::Rgb([220, 120, 40]));
    let mut buf = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut buf, image::ImageFormat::Png)
        .unwrap();
    buf.into_inner()
}

fn submission_form(image: Vec<u8>, longitude: &str, latitude: &str) -> MultipartForm {
    MultipartForm::new()
        .add_text("longitude", longitude)
        .add_text("latitude", latitude)
        .add_part(
            "file",
            Part::bytes(image).file_name("sunset.png").mime_type("image/png"),
        )
}

#[tokio::test]
async fn accepted_submission_returns_grant_and_persists_record() {
    let app = build_app(vec![0.02, 0.97], false);

    let response = app
        .server
        .post("/api/sunsets")
        .multipart(submission_form(png_bytes(), "151.2057", "-33.8727"))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    let body: serde_json::Value = response.json();
    assert!(body["url"].as_str().unwrap().starts_with("https://"));
    let key = body["fields"]["key"].as_str().unwrap();
    let id: Uuid = key.parse().unwrap();

    assert_eq!(app.grants.upload_calls.load(Ordering::SeqCst), 1);
    assert_eq!(app.records.len(), 1);

    // The grant's object key is the record id on the map.
    let map = app.server.get("/api/sunsets").await;
    assert_eq!(map.status_code(), StatusCode::OK);
    let collection: serde_json::Value = map.json();
    assert_eq!(collection["type"], "FeatureCollection");
    let features = collection["features"].as_array().unwrap();
    assert_eq!(features.len(), 1);
    assert_eq!(features[0]["properties"]["id"].as_str().unwrap(), key);
    let coords = features[0]["geometry"]["coordinates"].as_array().unwrap();
    assert!((coords[0].as_f64().unwrap() - 151.2057).abs() < 1e-9);
    assert!((coords[1].as_f64().unwrap() - (-33.8727)).abs() < 1e-9);

    // Download URLs are minted per request, never stored.
    let download = app.server.get(&format!("/api/sunsets/{id}")).await;
    assert_eq!(download.status_code(), StatusCode::OK);
    assert!(download.text().contains(&id.to_string()));
    assert_eq!(app.grants.download_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn not_sunset_rejection_touches_nothing() {
    let app = build_app(vec![0.93, 0.07], false);

    let response = app
        .server
        .post("/api/sunsets")
        .multipart(submission_form(png_bytes(), "151.2", "-33.8"))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.text(), "ImageNotSunset");
    assert_eq!(app.grants.upload_calls.load(Ordering::SeqCst), 0);
    assert!(app.records.is_empty());
}

#[tokio::test]
async fn low_confidence_uses_the_same_external_code() {
    let app = build_app(vec![0.11, 0.89], false);

    let response = app
        .server
        .post("/api/sunsets")
        .multipart(submission_form(png_bytes(), "151.2", "-33.8"))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.text(), "ImageNotSunset");
    assert!(app.records.is_empty());
}

#[tokio::test]
async fn threshold_is_inclusive() {
    let app = build_app(vec![0.10, 0.90], false);

    let response = app
        .server
        .post("/api/sunsets")
        .multipart(submission_form(png_bytes(), "151.2", "-33.8"))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    assert_eq!(app.records.len(), 1);
}

#[tokio::test]
async fn credential_failure_leaves_no_orphan_record() {
    let app = build_app(vec![0.02, 0.98], true);

    let response = app
        .server
        .post("/api/sunsets")
        .multipart(submission_form(png_bytes(), "151.2", "-33.8"))
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.text(), "Internal Server Error");
    assert_eq!(app.grants.upload_calls.load(Ordering::SeqCst), 1);
    assert!(app.records.is_empty());
}

#[tokio::test]
async fn undecodable_upload_is_a_client_error() {
    let app = build_app(vec![0.02, 0.98], false);

    let response = app
        .server
        .post("/api/sunsets")
        .multipart(submission_form(b"not an image".to_vec(), "151.2", "-33.8"))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(app.grants.upload_calls.load(Ordering::SeqCst), 0);
    assert!(app.records.is_empty());
}

#[tokio::test]
async fn missing_coordinate_field_is_rejected() {
    let app = build_app(vec![0.02, 0.98], false);

    let form = MultipartForm::new().add_text("longitude", "151.2").add_part(
        "file",
        Part::bytes(png_bytes())
            .file_name("sunset.png")
            .mime_type("image/png"),
    );
    let response = app.server.post("/api/sunsets").multipart(form).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert!(app.records.is_empty());
}

#[tokio::test]
async fn out_of_range_coordinate_is_rejected() {
    let app = build_app(vec![0.02, 0.98], false);

    let response = app
        .server
        .post("/api/sunsets")
        .multipart(submission_form(png_bytes(), "200.0", "-33.8"))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert!(app.records.is_empty());
}

#[tokio::test]
async fn empty_map_is_an_empty_feature_collection() {
    let app = build_app(vec![0.5, 0.5], false);

    let response = app.server.get("/api/sunsets").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["type"], "FeatureCollection");
    assert_eq!(body["features"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn viewport_filters_to_the_queried_radius() {
    let app = build_app(vec![0.5, 0.5], false);
    app.records
        .insert(&SunsetRecord::new(
            Uuid::new_v4(),
            Coordinate::new(151.2093, -33.8688),
        ))
        .await
        .unwrap();
    app.records
        .insert(&SunsetRecord::new(
            Uuid::new_v4(),
            Coordinate::new(144.9631, -37.8136),
        ))
        .await
        .unwrap();

    // Zoom 8 covers a 288 km radius, far short of Sydney-Melbourne.
    let response = app
        .server
        .get("/api/sunsets")
        .add_query_param("centre", "151.2093,-33.8688")
        .add_query_param("zoom", "8")
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["features"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn half_a_viewport_is_invalid() {
    let app = build_app(vec![0.5, 0.5], false);

    let response = app
        .server
        .get("/api/sunsets")
        .add_query_param("centre", "151.2,-33.8")
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Invalid or missing query parameters.");
}

#[tokio::test]
async fn malformed_centre_is_invalid() {
    let app = build_app(vec![0.5, 0.5], false);

    let response = app
        .server
        .get("/api/sunsets")
        .add_query_param("centre", "somewhere")
        .add_query_param("zoom", "9")
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Invalid or missing query parameters.");
}

#[tokio::test]
async fn zoomed_out_viewport_is_refused() {
    let app = build_app(vec![0.5, 0.5], false);

    let response = app
        .server
        .get("/api/sunsets")
        .add_query_param("centre", "151.2,-33.8")
        .add_query_param("zoom", "4")
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Zoom too low.");
}

#[tokio::test]
async fn download_grant_does_not_check_existence() {
    let app = build_app(vec![0.5, 0.5], false);

    let id = Uuid::new_v4();
    let response = app.server.get(&format!("/api/sunsets/{id}")).await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(response.text().contains(&id.to_string()));
}

#[tokio::test]
async fn health_endpoint_responds() {
    let app = build_app(vec![0.5, 0.5], false);
    let response = app.server.get("/health").await;
    assert_eq!(response.status_code(), StatusCode::OK);
}
