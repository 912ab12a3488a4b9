use crate::types::EncodingType;

/// ListObjects input.
#[derive(Debug, Clone, Default)]
pub struct ListObjectsInput {
    /// HTTP label (URI path).
    pub bucket: String,
    /// HTTP query: `prefix`.
    pub prefix: Option<String>,
    /// HTTP query: `marker`.
    pub marker: Option<String>,
    /// HTTP query: `delimiter`.
    pub delimiter: Option<String>,
    /// HTTP query: `max-keys`.
    pub max_keys: Option<i64>,
    /// HTTP query: `encoding-type`.
    pub encoding_type: EncodingType,
}

/// ListMultipartUploads input.
#[derive(Debug, Clone, Default)]
pub struct ListMultipartUploadsInput {
    /// HTTP label (URI path).
    pub bucket: String,
    /// HTTP query: `prefix`.
    pub prefix: Option<String>,
    /// HTTP query: `key-marker`.
    pub key_marker: Option<String>,
    /// HTTP query: `upload-id-marker`.
    pub upload_id_marker: Option<String>,
    /// HTTP query: `max-uploads`.
    pub max_uploads: Option<i64>,
    /// HTTP query: `encoding-type`.
    pub encoding_type: EncodingType,
}
