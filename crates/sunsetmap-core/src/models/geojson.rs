//! GeoJSON projection of sunset records
//!
//! The read-side contract exposed to the map UI: each record becomes a
//! Point feature whose properties carry only the record id. Coordinates
//! stay in (longitude, latitude) order at stored precision.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::SunsetRecord;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: String,
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: String,
    pub properties: FeatureProperties,
    pub geometry: PointGeometry,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureProperties {
    pub id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointGeometry {
    #[serde(rename = "type")]
    pub kind: String,
    /// `[longitude, latitude]`
    pub coordinates: [f64; 2],
}

pub fn to_feature_collection(records: &[SunsetRecord]) -> FeatureCollection {
    FeatureCollection {
        kind: "FeatureCollection".to_string(),
        features: records
            .iter()
            .map(|record| Feature {
                kind: "Feature".to_string(),
                properties: FeatureProperties { id: record.id },
                geometry: PointGeometry {
                    kind: "Point".to_string(),
                    coordinates: [record.coordinate.longitude, record.coordinate.latitude],
                },
            })
            .collect(),
    }
}
