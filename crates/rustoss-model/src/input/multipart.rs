use std::collections::HashMap;

use crate::request::StreamingBlob;
use crate::types::CompletedMultipartUpload;

/// InitiateMultipartUpload input.
#[derive(Debug, Clone, Default)]
pub struct InitiateMultipartUploadInput {
    /// HTTP label (URI path).
    pub bucket: String,
    /// HTTP label (URI path).
    pub key: String,
    /// HTTP header: `Content-Type`.
    pub content_type: Option<String>,
    /// HTTP prefix headers: `x-oss-meta-`.
    pub metadata: HashMap<String, String>,
}

/// UploadPart input.
#[derive(Debug, Clone, Default)]
pub struct UploadPartInput {
    /// HTTP label (URI path).
    pub bucket: String,
    /// HTTP label (URI path).
    pub key: String,
    /// HTTP query: `uploadId`.
    pub upload_id: String,
    /// HTTP query: `partNumber`.
    pub part_number: i64,
    /// HTTP payload body.
    pub body: StreamingBlob,
}

/// CompleteMultipartUpload input.
#[derive(Debug, Clone, Default)]
pub struct CompleteMultipartUploadInput {
    /// HTTP label (URI path).
    pub bucket: String,
    /// HTTP label (URI path).
    pub key: String,
    /// HTTP query: `uploadId`.
    pub upload_id: String,
    /// HTTP payload body.
    pub multipart_upload: CompletedMultipartUpload,
}

/// AbortMultipartUpload input.
#[derive(Debug, Clone, Default)]
pub struct AbortMultipartUploadInput {
    /// HTTP label (URI path).
    pub bucket: String,
    /// HTTP label (URI path).
    pub key: String,
    /// HTTP query: `uploadId`.
    pub upload_id: String,
}
