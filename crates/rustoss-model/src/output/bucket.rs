use crate::types::{Bucket, Owner};

/// PutBucket output.
#[derive(Debug, Clone, Default)]
pub struct CreateBucketOutput {
    /// HTTP header: `Location`, the bucket path.
    pub location: String,
}

/// GetBucketLocation output.
#[derive(Debug, Clone, Default)]
pub struct GetBucketLocationOutput {
    /// The bucket's region.
    pub location_constraint: String,
}

/// ListBuckets output.
#[derive(Debug, Clone, Default)]
pub struct ListBucketsOutput {
    pub owner: Owner,
    pub buckets: Vec<Bucket>,
    pub prefix: Option<String>,
    pub marker: Option<String>,
    pub max_keys: Option<i64>,
    pub is_truncated: bool,
    /// Name of the last returned bucket when truncated.
    pub next_marker: Option<String>,
}
