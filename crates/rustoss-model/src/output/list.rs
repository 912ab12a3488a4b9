use crate::types::{EncodingType, MultipartUpload, ObjectSummary};

/// ListObjects output.
#[derive(Debug, Clone, Default)]
pub struct ListObjectsOutput {
    pub bucket: String,
    pub prefix: Option<String>,
    pub marker: Option<String>,
    pub delimiter: Option<String>,
    pub max_keys: i64,
    pub is_truncated: bool,
    pub next_marker: Option<String>,
    pub encoding_type: EncodingType,
    pub contents: Vec<ObjectSummary>,
    pub common_prefixes: Vec<String>,
}

/// ListMultipartUploads output.
#[derive(Debug, Clone, Default)]
pub struct ListMultipartUploadsOutput {
    pub bucket: String,
    pub prefix: Option<String>,
    pub key_marker: Option<String>,
    pub upload_id_marker: Option<String>,
    pub next_key_marker: Option<String>,
    pub next_upload_id_marker: Option<String>,
    pub max_uploads: i64,
    pub is_truncated: bool,
    pub encoding_type: EncodingType,
    pub uploads: Vec<MultipartUpload>,
}
