//! Domain models

pub mod geojson;

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::AppError;

/// A geographic point in (longitude, latitude) order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub longitude: f64,
    pub latitude: f64,
}

impl Coordinate {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    /// Reject coordinates outside WGS84 bounds.
    pub fn validate(&self) -> Result<(), AppError> {
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(AppError::InvalidInput(format!(
                "longitude {} out of range [-180, 180]",
                self.longitude
            )));
        }
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(AppError::InvalidInput(format!(
                "latitude {} out of range [-90, 90]",
                self.latitude
            )));
        }
        Ok(())
    }
}

/// Persisted sunset sighting. `id` doubles as the object-store key of
/// the uploaded photograph; it is generated exactly once per accepted
/// submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SunsetRecord {
    pub id: Uuid,
    pub coordinate: Coordinate,
    pub submitted_at: DateTime<Utc>,
}

impl SunsetRecord {
    pub fn new(id: Uuid, coordinate: Coordinate) -> Self {
        Self {
            id,
            coordinate,
            submitted_at: Utc::now(),
        }
    }
}

/// Time-boxed write credential for the object store. Never persisted;
/// handed to the uploading client and forgotten server-side.
#[derive(Debug, Clone, Serialize)]
pub struct UploadGrant {
    pub object_key: Uuid,
    pub url: String,
    pub fields: BTreeMap<String, String>,
    pub expires_at: DateTime<Utc>,
}
