use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::request::StreamingBlob;
use crate::types::{Delete, EncodingType};

/// PutObject input.
#[derive(Debug, Clone, Default)]
pub struct PutObjectInput {
    /// HTTP label (URI path).
    pub bucket: String,
    /// HTTP label (URI path).
    pub key: String,
    /// HTTP payload body.
    pub body: StreamingBlob,
    /// HTTP header: `Content-Type`.
    pub content_type: Option<String>,
    /// HTTP header: `Content-MD5`.
    pub content_md5: Option<String>,
    /// HTTP header: `Cache-Control`.
    pub cache_control: Option<String>,
    /// HTTP header: `Content-Disposition`.
    pub content_disposition: Option<String>,
    /// HTTP header: `Content-Encoding`.
    pub content_encoding: Option<String>,
    /// HTTP header: `Expires`, kept verbatim.
    pub expires: Option<String>,
    /// HTTP prefix headers: `x-oss-meta-`.
    pub metadata: HashMap<String, String>,
}

/// Conditional headers shared by GetObject and HeadObject.
#[derive(Debug, Clone, Default)]
pub struct Conditions {
    /// HTTP header: `If-Match`.
    pub if_match: Option<String>,
    /// HTTP header: `If-None-Match`.
    pub if_none_match: Option<String>,
    /// HTTP header: `If-Modified-Since`.
    pub if_modified_since: Option<DateTime<Utc>>,
    /// HTTP header: `If-Unmodified-Since`.
    pub if_unmodified_since: Option<DateTime<Utc>>,
}

/// GetObject input.
#[derive(Debug, Clone, Default)]
pub struct GetObjectInput {
    /// HTTP label (URI path).
    pub bucket: String,
    /// HTTP label (URI path).
    pub key: String,
    /// HTTP header: `Range`.
    pub range: Option<String>,
    /// HTTP headers: `If-*`.
    pub conditions: Conditions,
}

/// HeadObject input.
#[derive(Debug, Clone, Default)]
pub struct HeadObjectInput {
    /// HTTP label (URI path).
    pub bucket: String,
    /// HTTP label (URI path).
    pub key: String,
    /// HTTP headers: `If-*`.
    pub conditions: Conditions,
}

/// DeleteObject input.
#[derive(Debug, Clone, Default)]
pub struct DeleteObjectInput {
    /// HTTP label (URI path).
    pub bucket: String,
    /// HTTP label (URI path).
    pub key: String,
}

/// DeleteMultipleObjects input.
#[derive(Debug, Clone, Default)]
pub struct DeleteObjectsInput {
    /// HTTP label (URI path).
    pub bucket: String,
    /// HTTP payload body.
    pub delete: Delete,
    /// HTTP query: `encoding-type`.
    pub encoding_type: EncodingType,
}
