//! Geospatial record store
//!
//! Owns the durable `sunsets` table. The `RecordStore` trait is the
//! seam the orchestrator depends on; `SunsetRepository` is the
//! PostgreSQL/PostGIS implementation and `InMemoryRecordStore` backs
//! tests and credential-free local runs.

pub mod memory;
pub mod records;

pub use memory::InMemoryRecordStore;
pub use records::{RecordStore, SunsetRepository};
