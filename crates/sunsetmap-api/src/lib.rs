//! Sunsetmap HTTP API
//!
//! Exposes the submission pipeline and the map read queries. The
//! binary in `main.rs` wires this library to the real database, object
//! store, and classifier; integration tests wire it to stubs.

pub mod error;
pub mod handlers;
pub mod services;
pub mod setup;
pub mod state;
pub mod telemetry;
