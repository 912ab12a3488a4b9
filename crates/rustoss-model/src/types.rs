//! Value types shared by the service, the wire codec and the client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The owner of a bucket or object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Owner {
    /// Owner id.
    pub id: String,
    /// Display name.
    pub display_name: String,
}

impl Owner {
    /// Build the owner that corresponds to an access key id.
    #[must_use]
    pub fn from_access_key(access_key_id: &str) -> Self {
        Self {
            id: access_key_id.to_owned(),
            display_name: access_key_id.to_owned(),
        }
    }
}

/// A bucket entry as returned by ListBuckets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    /// Bucket name.
    pub name: String,
    /// Region the bucket lives in, e.g. `oss-cn-hangzhou`.
    pub location: String,
    /// When the bucket was created.
    pub creation_date: DateTime<Utc>,
    /// Bucket owner.
    pub owner: Option<Owner>,
}

/// `CreateBucketConfiguration` request body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateBucketConfiguration {
    /// Requested region.
    pub location_constraint: Option<String>,
    /// Requested storage class.
    pub storage_class: Option<String>,
}

/// The `LoggingEnabled` element of a logging status.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoggingEnabled {
    /// Bucket that receives the access logs.
    pub target_bucket: String,
    /// Key prefix for log objects; `None` on the wire means empty.
    pub target_prefix: Option<String>,
}

/// `BucketLoggingStatus`; an empty status means logging is disabled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BucketLoggingStatus {
    /// Present when logging is enabled.
    pub logging_enabled: Option<LoggingEnabled>,
}

/// `IndexDocument` of a website configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexDocument {
    /// Index page suffix, e.g. `index.html`.
    pub suffix: String,
}

/// `ErrorDocument` of a website configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorDocument {
    /// Key returned on 4xx errors.
    pub key: String,
}

/// `WebsiteConfiguration` body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WebsiteConfiguration {
    /// Index document; required by the service.
    pub index_document: Option<IndexDocument>,
    /// Optional error document.
    pub error_document: Option<ErrorDocument>,
}

/// Encoding applied to keys in listing responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EncodingType {
    /// Keys are returned verbatim.
    #[default]
    None,
    /// Keys are percent-encoded.
    Url,
}

impl EncodingType {
    /// Wire value, `None` when no encoding applies.
    #[must_use]
    pub fn as_param(self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Url => Some("url"),
        }
    }
}

impl From<&str> for EncodingType {
    fn from(s: &str) -> Self {
        if s.eq_ignore_ascii_case("url") {
            Self::Url
        } else {
            Self::None
        }
    }
}

/// A single object entry of a ListObjects response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectSummary {
    /// Object key.
    pub key: String,
    /// Quoted ETag.
    pub etag: String,
    /// Size in bytes.
    pub size: u64,
    /// Last modification time.
    pub last_modified: DateTime<Utc>,
    /// Storage class.
    pub storage_class: String,
    /// Object owner.
    pub owner: Option<Owner>,
}

/// An in-progress multipart upload entry of a ListMultipartUploads response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartUpload {
    /// Object key.
    pub key: String,
    /// Upload id.
    pub upload_id: String,
    /// When the upload was initiated.
    pub initiated: DateTime<Utc>,
    /// Storage class.
    pub storage_class: String,
}

/// A part listed in a CompleteMultipartUpload body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedPart {
    /// Part number, 1..=10000.
    pub part_number: u32,
    /// ETag returned by UploadPart.
    pub etag: String,
}

/// `CompleteMultipartUpload` request body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletedMultipartUpload {
    /// Parts in ascending order.
    pub parts: Vec<CompletedPart>,
}

/// `Delete` request body of DeleteMultipleObjects.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Delete {
    /// Only report failures when set.
    pub quiet: bool,
    /// Keys to delete.
    pub keys: Vec<String>,
}
