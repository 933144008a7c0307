//! Sunset endpoints
//!
//! `GET /api/sunsets` returns the map as a GeoJSON FeatureCollection,
//! either globally or filtered to a viewport. `GET /api/sunsets/{id}`
//! mints a fresh download URL per call; nothing is cached and the
//! object's existence is not checked. `POST /api/sunsets` runs the
//! submission pipeline and returns an upload grant.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use sunsetmap_core::models::geojson::to_feature_collection;
use sunsetmap_core::Coordinate;
use uuid::Uuid;

use crate::error::HttpError;
use crate::services::submission::SubmissionError;
use crate::state::AppState;

/// Base of the zoom-to-radius curve, in kilometres. Doubling per zoom
/// step out from zoom 1.
const RADIUS_BASE_KM: f64 = 36_864.0;
const MIN_ZOOM: f64 = 5.0;

const INVALID_QUERY: &str = "Invalid or missing query parameters.";
const ZOOM_TOO_LOW: &str = "Zoom too low.";

#[derive(Debug, Deserialize)]
pub struct ViewportQuery {
    centre: Option<String>,
    zoom: Option<String>,
}

#[derive(Debug, Serialize)]
struct QueryError {
    error: String,
}

fn query_error(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(QueryError {
            error: message.to_string(),
        }),
    )
        .into_response()
}

/// Parses a `"lng,lat"` pair. Whitespace around either component is
/// tolerated; anything else is not.
fn parse_centre(raw: &str) -> Option<Coordinate> {
    let (lng, lat) = raw.split_once(',')?;
    let coordinate = Coordinate {
        longitude: lng.trim().parse().ok()?,
        latitude: lat.trim().parse().ok()?,
    };
    coordinate.validate().ok()?;
    Some(coordinate)
}

fn viewport_radius_meters(zoom: f64) -> f64 {
    RADIUS_BASE_KM * 2f64.powf(1.0 - zoom) * 1000.0
}

pub async fn list_sunsets(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ViewportQuery>,
) -> Result<Response, HttpError> {
    let records = match (query.centre, query.zoom) {
        (None, None) => state.records.list_all().await?,
        (Some(centre), Some(zoom)) => {
            let Some(centre) = parse_centre(&centre) else {
                return Ok(query_error(INVALID_QUERY));
            };
            let Ok(zoom) = zoom.trim().parse::<f64>() else {
                return Ok(query_error(INVALID_QUERY));
            };
            if !zoom.is_finite() {
                return Ok(query_error(INVALID_QUERY));
            }
            if zoom < MIN_ZOOM {
                return Ok(query_error(ZOOM_TOO_LOW));
            }
            let radius = viewport_radius_meters(zoom);
            tracing::debug!(
                longitude = centre.longitude,
                latitude = centre.latitude,
                zoom,
                radius_meters = radius,
                "Viewport query"
            );
            state.records.list_within_radius(centre, radius).await?
        }
        // One half of the pair on its own is a malformed viewport.
        _ => return Ok(query_error(INVALID_QUERY)),
    };

    Ok(Json(to_feature_collection(&records)).into_response())
}

pub async fn get_sunset_image(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<String, HttpError> {
    let url = state
        .grants
        .issue_download_grant(id, state.download_grant_ttl())
        .await?;
    Ok(url)
}

#[derive(Debug, Serialize)]
pub struct GrantResponse {
    pub url: String,
    pub fields: BTreeMap<String, String>,
}

struct SubmissionForm {
    longitude: f64,
    latitude: f64,
    image: Bytes,
}

async fn read_form(mut multipart: Multipart) -> Result<SubmissionForm, SubmissionError> {
    let mut longitude = None;
    let mut latitude = None;
    let mut image = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| SubmissionError::Invalid(e.to_string()))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("longitude") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| SubmissionError::Invalid(e.to_string()))?;
                longitude = Some(text.trim().parse::<f64>().map_err(|_| {
                    SubmissionError::Invalid("longitude must be a number".to_string())
                })?);
            }
            Some("latitude") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| SubmissionError::Invalid(e.to_string()))?;
                latitude = Some(text.trim().parse::<f64>().map_err(|_| {
                    SubmissionError::Invalid("latitude must be a number".to_string())
                })?);
            }
            Some("file") => {
                image = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| SubmissionError::Invalid(e.to_string()))?,
                );
            }
            _ => {}
        }
    }

    let longitude =
        longitude.ok_or_else(|| SubmissionError::Invalid("missing longitude".to_string()))?;
    let latitude =
        latitude.ok_or_else(|| SubmissionError::Invalid("missing latitude".to_string()))?;
    let image = image.ok_or_else(|| SubmissionError::Invalid("missing file".to_string()))?;

    Ok(SubmissionForm {
        longitude,
        latitude,
        image,
    })
}

pub async fn submit_sunset(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Response, SubmissionError> {
    let form = read_form(multipart).await?;
    let coordinate = Coordinate {
        longitude: form.longitude,
        latitude: form.latitude,
    };

    let grant = state.pipeline.submit(form.image, coordinate).await?;

    let body = GrantResponse {
        url: grant.url,
        fields: grant.fields,
    };
    Ok((StatusCode::CREATED, Json(body)).into_response())
}

pub async fn health() -> &'static str {
    "ok"
}
