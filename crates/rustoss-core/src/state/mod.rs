//! In-memory state for the OSS service.
//!
//! - [`OssServiceState`] -- the bucket namespace
//! - [`OssBucket`] -- per-bucket objects, uploads and configuration
//! - [`StoredObject`] / [`ObjectMetadata`] -- object records
//! - [`MultipartUpload`] / [`UploadPart`] -- multipart upload tracking
//!
//! The namespace is a `DashMap`; everything inside a bucket sits behind
//! `parking_lot::RwLock`. No lock is held across an `.await`.

pub(crate) mod bucket;
pub(crate) mod multipart;
pub(crate) mod object;
pub(crate) mod service;

pub use bucket::{ObjectPage, OssBucket, UploadPage};
pub use multipart::{MultipartUpload, UploadPart};
pub use object::{DEFAULT_CONTENT_TYPE, ObjectMetadata, StoredObject};
pub use service::{CreateOutcome, OssServiceState, RESERVED_BUCKET, RESERVED_OWNER_ID};
