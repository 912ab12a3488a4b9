use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::request::StreamingBlob;
use crate::types::EncodingType;

/// PutObject output.
#[derive(Debug, Clone, Default)]
pub struct PutObjectOutput {
    /// HTTP header: `ETag`.
    pub etag: String,
}

/// Object headers returned by GetObject and HeadObject.
#[derive(Debug, Clone, Default)]
pub struct ObjectHeaders {
    /// HTTP header: `Content-Length`.
    pub content_length: u64,
    /// HTTP header: `Content-Type`.
    pub content_type: String,
    /// HTTP header: `ETag`.
    pub etag: String,
    /// HTTP header: `Last-Modified`.
    pub last_modified: DateTime<Utc>,
    /// HTTP header: `Cache-Control`.
    pub cache_control: Option<String>,
    /// HTTP header: `Content-Disposition`.
    pub content_disposition: Option<String>,
    /// HTTP header: `Content-Encoding`.
    pub content_encoding: Option<String>,
    /// HTTP header: `Expires`, verbatim as stored.
    pub expires: Option<String>,
    /// HTTP prefix headers: `x-oss-meta-`.
    pub metadata: HashMap<String, String>,
}

/// GetObject output.
#[derive(Debug, Clone, Default)]
pub struct GetObjectOutput {
    pub headers: ObjectHeaders,
    /// HTTP header: `Content-Range`, set for partial content.
    pub content_range: Option<String>,
    /// HTTP payload body.
    pub body: StreamingBlob,
}

/// HeadObject output.
#[derive(Debug, Clone, Default)]
pub struct HeadObjectOutput {
    pub headers: ObjectHeaders,
}

/// DeleteMultipleObjects output.
#[derive(Debug, Clone, Default)]
pub struct DeleteObjectsOutput {
    /// Deleted keys; empty in quiet mode.
    pub deleted: Vec<String>,
    pub encoding_type: EncodingType,
}
