//! Sunset record persistence

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use sunsetmap_core::{AppError, Coordinate, SunsetRecord};

/// Durable store of accepted submissions.
///
/// Each accepted submission inserts one row keyed by a fresh UUID, so
/// concurrent submissions never contend; single-insert atomicity is all
/// the pipeline needs.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn insert(&self, record: &SunsetRecord) -> Result<(), AppError>;

    async fn list_all(&self) -> Result<Vec<SunsetRecord>, AppError>;

    /// Viewport-scoped read: records within `radius_meters` of `center`
    /// by great-circle distance.
    async fn list_within_radius(
        &self,
        center: Coordinate,
        radius_meters: f64,
    ) -> Result<Vec<SunsetRecord>, AppError>;
}

/// PostgreSQL repository. Radius queries go through the generated
/// `geo` geography column (see migrations) so PostGIS does the distance
/// math with a GiST index behind it.
#[derive(Clone)]
pub struct SunsetRepository {
    pool: PgPool,
}

impl SunsetRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn row_to_record(row: &sqlx::postgres::PgRow) -> SunsetRecord {
    SunsetRecord {
        id: row.get("id"),
        coordinate: Coordinate {
            longitude: row.get("longitude"),
            latitude: row.get("latitude"),
        },
        submitted_at: row.get("submitted_at"),
    }
}

#[async_trait]
impl RecordStore for SunsetRepository {
    async fn insert(&self, record: &SunsetRecord) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO sunsets (id, longitude, latitude, submitted_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(record.id)
        .bind(record.coordinate.longitude)
        .bind(record.coordinate.latitude)
        .bind(record.submitted_at)
        .execute(&self.pool)
        .await?;

        tracing::debug!(id = %record.id, "Sunset record inserted");
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<SunsetRecord>, AppError> {
        let rows = sqlx::query(
            r#"
            SELECT id, longitude, latitude, submitted_at
            FROM sunsets
            ORDER BY submitted_at
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(row_to_record).collect())
    }

    async fn list_within_radius(
        &self,
        center: Coordinate,
        radius_meters: f64,
    ) -> Result<Vec<SunsetRecord>, AppError> {
        let rows = sqlx::query(
            r#"
            SELECT id, longitude, latitude, submitted_at
            FROM sunsets
            WHERE ST_DWithin(
                geo,
                ST_SetSRID(ST_MakePoint($1, $2), 4326)::geography,
                $3
            )
            ORDER BY submitted_at
            "#,
        )
        .bind(center.longitude)
        .bind(center.latitude)
        .bind(radius_meters)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(row_to_record).collect())
    }
}
