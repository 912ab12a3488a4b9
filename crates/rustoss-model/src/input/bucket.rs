use crate::types::CreateBucketConfiguration;

/// PutBucket input.
#[derive(Debug, Clone, Default)]
pub struct CreateBucketInput {
    /// HTTP label (URI path).
    pub bucket: String,
    /// HTTP header: `x-oss-acl`.
    pub acl: Option<String>,
    /// HTTP payload body.
    pub configuration: Option<CreateBucketConfiguration>,
}

/// DeleteBucket input.
#[derive(Debug, Clone, Default)]
pub struct DeleteBucketInput {
    /// HTTP label (URI path).
    pub bucket: String,
}

/// GetBucketLocation input.
#[derive(Debug, Clone, Default)]
pub struct GetBucketLocationInput {
    /// HTTP label (URI path).
    pub bucket: String,
}

/// ListBuckets input.
#[derive(Debug, Clone, Default)]
pub struct ListBucketsInput {
    /// HTTP query: `prefix`.
    pub prefix: Option<String>,
    /// HTTP query: `marker`.
    pub marker: Option<String>,
    /// HTTP query: `max-keys`.
    pub max_keys: Option<i64>,
}
