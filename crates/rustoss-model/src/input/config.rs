use crate::types::{BucketLoggingStatus, WebsiteConfiguration};

/// PutBucketLogging input.
#[derive(Debug, Clone, Default)]
pub struct PutBucketLoggingInput {
    /// HTTP label (URI path).
    pub bucket: String,
    /// HTTP payload body.
    pub status: BucketLoggingStatus,
}

/// GetBucketLogging input.
#[derive(Debug, Clone, Default)]
pub struct GetBucketLoggingInput {
    /// HTTP label (URI path).
    pub bucket: String,
}

/// DeleteBucketLogging input.
#[derive(Debug, Clone, Default)]
pub struct DeleteBucketLoggingInput {
    /// HTTP label (URI path).
    pub bucket: String,
}

/// PutBucketWebsite input.
#[derive(Debug, Clone, Default)]
pub struct PutBucketWebsiteInput {
    /// HTTP label (URI path).
    pub bucket: String,
    /// HTTP payload body.
    pub configuration: WebsiteConfiguration,
}

/// GetBucketWebsite input.
#[derive(Debug, Clone, Default)]
pub struct GetBucketWebsiteInput {
    /// HTTP label (URI path).
    pub bucket: String,
}

/// DeleteBucketWebsite input.
#[derive(Debug, Clone, Default)]
pub struct DeleteBucketWebsiteInput {
    /// HTTP label (URI path).
    pub bucket: String,
}
