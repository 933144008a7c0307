//! Sunsetmap core library
//!
//! Domain models, error types, and configuration shared across all
//! sunsetmap components.

pub mod config;
pub mod error;
pub mod models;

pub use config::Config;
pub use error::AppError;
pub use models::{Coordinate, SunsetRecord, UploadGrant};
