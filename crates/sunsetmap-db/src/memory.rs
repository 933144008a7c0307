//! In-memory record store
//!
//! Same contract as the PostgreSQL repository without the database:
//! used by the integration tests and for local runs where no Postgres
//! is available. Radius filtering uses haversine distance, which agrees
//! with PostGIS geography distance to well under a percent at the
//! scales a map viewport cares about.

use std::sync::RwLock;

use async_trait::async_trait;
use sunsetmap_core::{AppError, Coordinate, SunsetRecord};

use crate::records::RecordStore;

const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

#[derive(Default)]
pub struct InMemoryRecordStore {
    records: RwLock<Vec<SunsetRecord>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.read().expect("record store lock").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Great-circle distance between two points in meters.
fn haversine_meters(a: Coordinate, b: Coordinate) -> f64 {
    let lat_a = a.latitude.to_radians();
    let lat_b = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lng = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_METERS * h.sqrt().asin()
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn insert(&self, record: &SunsetRecord) -> Result<(), AppError> {
        let mut records = self
            .records
            .write()
            .map_err(|_| AppError::Internal("record store lock poisoned".to_string()))?;
        if records.iter().any(|r| r.id == record.id) {
            return Err(AppError::InvalidInput(format!(
                "duplicate record id {}",
                record.id
            )));
        }
        records.push(record.clone());
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<SunsetRecord>, AppError> {
        let records = self
            .records
            .read()
            .map_err(|_| AppError::Internal("record store lock poisoned".to_string()))?;
        Ok(records.clone())
    }

    async fn list_within_radius(
        &self,
        center: Coordinate,
        radius_meters: f64,
    ) -> Result<Vec<SunsetRecord>, AppError> {
        let records = self
            .records
            .read()
            .map_err(|_| AppError::Internal("record store lock poisoned".to_string()))?;
        Ok(records
            .iter()
            .filter(|r| haversine_meters(center, r.coordinate) <= radius_meters)
            .cloned()
            .collect())
    }
}
