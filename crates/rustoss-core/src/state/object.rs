//! Stored object records and their metadata.
//!
//! A [`StoredObject`] holds its body next to the size and ETag describing it,
//! so a reader always sees one consistent version.

use std::collections::HashMap;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use rustoss_model::output::ObjectHeaders;
use rustoss_model::types::{ObjectSummary, Owner};

/// Default content type for objects stored without one.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Storage class reported for every object.
pub const STANDARD_STORAGE_CLASS: &str = "Standard";

/// HTTP metadata captured on upload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectMetadata {
    /// `Content-Type`.
    pub content_type: Option<String>,
    /// `Cache-Control`.
    pub cache_control: Option<String>,
    /// `Content-Disposition`.
    pub content_disposition: Option<String>,
    /// `Content-Encoding`.
    pub content_encoding: Option<String>,
    /// `Expires`, kept exactly as sent.
    pub expires: Option<String>,
    /// `x-oss-meta-*` headers, keyed without the prefix.
    pub user_metadata: HashMap<String, String>,
}

/// An object stored in a bucket.
#[derive(Debug, Clone)]
pub struct StoredObject {
    /// Object key.
    pub key: String,
    /// Quoted ETag.
    pub etag: String,
    /// Body size in bytes.
    pub size: u64,
    /// Last write time.
    pub last_modified: DateTime<Utc>,
    /// Writer of the object.
    pub owner: Owner,
    /// Upload metadata.
    pub metadata: ObjectMetadata,
    /// Object body.
    pub body: Bytes,
}

impl StoredObject {
    /// Create a record stamped with the current time; the size is taken from
    /// `body`.
    #[must_use]
    pub fn new(key: String, body: Bytes, etag: String, owner: Owner, metadata: ObjectMetadata) -> Self {
        Self {
            key,
            etag,
            size: body.len() as u64,
            last_modified: Utc::now(),
            owner,
            metadata,
            body,
        }
    }

    /// Headers returned by GetObject and HeadObject.
    #[must_use]
    pub fn headers(&self) -> ObjectHeaders {
        ObjectHeaders {
            content_length: self.size,
            content_type: self
                .metadata
                .content_type
                .clone()
                .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_owned()),
            etag: self.etag.clone(),
            last_modified: self.last_modified,
            cache_control: self.metadata.cache_control.clone(),
            content_disposition: self.metadata.content_disposition.clone(),
            content_encoding: self.metadata.content_encoding.clone(),
            expires: self.metadata.expires.clone(),
            metadata: self.metadata.user_metadata.clone(),
        }
    }

    /// Listing entry for ListObjects.
    #[must_use]
    pub fn summary(&self) -> ObjectSummary {
        ObjectSummary {
            key: self.key.clone(),
            etag: self.etag.clone(),
            size: self.size,
            last_modified: self.last_modified,
            storage_class: STANDARD_STORAGE_CLASS.to_owned(),
            owner: Some(self.owner.clone()),
        }
    }
}
