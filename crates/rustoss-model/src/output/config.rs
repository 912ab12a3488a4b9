use crate::types::{BucketLoggingStatus, WebsiteConfiguration};

/// GetBucketLogging output.
#[derive(Debug, Clone, Default)]
pub struct GetBucketLoggingOutput {
    pub status: BucketLoggingStatus,
}

/// GetBucketWebsite output.
#[derive(Debug, Clone, Default)]
pub struct GetBucketWebsiteOutput {
    pub configuration: WebsiteConfiguration,
}
