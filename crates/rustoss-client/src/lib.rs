//! Async client for OSS-compatible object storage.
//!
//! [`OssClient`] signs every request with the OSS V1 header signature and
//! talks to the service using path-style URLs. Service errors come back as
//! [`ClientError::Service`] carrying the OSS error code; argument checks
//! that can be done locally fail with [`ClientError::InvalidArgument`]
//! before anything is sent.
//!
//! # Example
//!
//! ```no_run
//! use rustoss_client::{ClientConfig, GetObjectRequest, ObjectMetadata, OssClient};
//!
//! # async fn example() -> rustoss_client::Result<()> {
//! let client = OssClient::new(
//!     ClientConfig::builder()
//!         .endpoint("http://127.0.0.1:9090")
//!         .access_key_id("rustoss")
//!         .access_key_secret("rustoss")
//!         .build(),
//! )?;
//!
//! client.create_bucket("photos").await?;
//! client
//!     .put_object("photos", "cat.txt", "meow", &ObjectMetadata::default())
//!     .await?;
//!
//! let object = client
//!     .get_object(&GetObjectRequest::new("photos", "cat.txt").with_range(0, 1))
//!     .await?;
//! assert_eq!(object.bytes().await?.as_ref(), b"me");
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod error;
mod request;
mod types;

pub use client::{MAX_DELETE_KEYS, OssClient, TRACING_TARGET};
pub use config::{ClientConfig, DEFAULT_TIMEOUT};
pub use error::{ClientError, Result};
pub use request::{
    CompleteMultipartUploadRequest, DeleteObjectsRequest, GetObjectRequest,
    ListBucketsRequest, ListMultipartUploadsRequest, ListObjectsRequest, PresignedUrlRequest,
    RANGE_UNSPECIFIED, SetBucketLoggingRequest, SetBucketWebsiteRequest,
};
pub use types::*;

pub use rustoss_model::types::{CompletedPart, EncodingType};
pub use rustoss_model::OssErrorCode;
