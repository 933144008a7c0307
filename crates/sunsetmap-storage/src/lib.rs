//! Object-store credential issuance
//!
//! The service never moves image bytes itself: accepted submissions get
//! a scoped, time-boxed presigned POST grant for the upload, and reads
//! get a presigned GET URL. Issuance is pure credential computation,
//! with no object bytes moving through this crate.

pub mod post_policy;
pub mod s3;
pub mod traits;

pub use s3::S3GrantIssuer;
pub use traits::{GrantIssuer, StorageError, StorageResult};
