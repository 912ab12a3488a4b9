/// InitiateMultipartUpload output.
#[derive(Debug, Clone, Default)]
pub struct InitiateMultipartUploadOutput {
    pub bucket: String,
    pub key: String,
    pub upload_id: String,
}

/// UploadPart output.
#[derive(Debug, Clone, Default)]
pub struct UploadPartOutput {
    /// HTTP header: `ETag`.
    pub etag: String,
}

/// CompleteMultipartUpload output.
#[derive(Debug, Clone, Default)]
pub struct CompleteMultipartUploadOutput {
    pub location: String,
    pub bucket: String,
    pub key: String,
    pub etag: String,
}
