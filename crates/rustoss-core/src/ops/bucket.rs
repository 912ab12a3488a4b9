//! Bucket operation handlers.
//!
//! Implements `create_bucket`, `delete_bucket`, `list_buckets` and
//! `get_bucket_location`.

use rustoss_model::OssRequest;
use rustoss_model::error::OssError;
use rustoss_model::input::{
    CreateBucketInput, DeleteBucketInput, GetBucketLocationInput, ListBucketsInput,
};
use rustoss_model::output::{CreateBucketOutput, GetBucketLocationOutput, ListBucketsOutput};
use tracing::debug;

use crate::error::OssServiceError;
use crate::provider::RustOss;
use crate::validation::{DEFAULT_MAX_KEYS, MAX_MAX_KEYS, resolve_page_size, validate_bucket_name};

// Handlers stay async so the HTTP bridge can treat every operation alike.
#[allow(clippy::unused_async)]
impl RustOss {
    /// Create a bucket in this endpoint's region.
    pub async fn handle_create_bucket(
        &self,
        req: OssRequest<CreateBucketInput>,
    ) -> Result<CreateBucketOutput, OssError> {
        let owner = self.requester(req.requester.as_deref());
        let bucket_name = req.input.bucket;
        validate_bucket_name(&bucket_name)?;

        let location = req
            .input
            .configuration
            .and_then(|c| c.location_constraint)
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| self.config.region.clone());

        if !self.config.is_supported_region(&location) || location != self.config.region {
            return Err(OssServiceError::InvalidLocationConstraint { location }.into());
        }

        let outcome =
            self.state
                .create_bucket(&bucket_name, &location, &owner, self.config.max_buckets)?;

        debug!(bucket = %bucket_name, location = %location, ?outcome, "create_bucket completed");
        Ok(CreateBucketOutput {
            location: format!("/{bucket_name}"),
        })
    }

    /// Delete an empty bucket.
    pub async fn handle_delete_bucket(
        &self,
        req: OssRequest<DeleteBucketInput>,
    ) -> Result<(), OssError> {
        let owner = self.requester(req.requester.as_deref());
        let bucket_name = req.input.bucket;

        self.state.delete_bucket(&bucket_name, &owner.id)?;

        debug!(bucket = %bucket_name, "delete_bucket completed");
        Ok(())
    }

    /// List the caller's buckets.
    pub async fn handle_list_buckets(
        &self,
        req: OssRequest<ListBucketsInput>,
    ) -> Result<ListBucketsOutput, OssError> {
        let owner = self.requester(req.requester.as_deref());
        let input = req.input;
        let max_keys = resolve_page_size("max-keys", input.max_keys, DEFAULT_MAX_KEYS, MAX_MAX_KEYS)?;

        let prefix = input.prefix.as_deref().unwrap_or_default();
        let marker = input.marker.as_deref().unwrap_or_default();
        let mut matching = self
            .state
            .list_buckets(&owner.id)
            .into_iter()
            .filter(|b| b.name.starts_with(prefix) && b.name.as_str() > marker);

        let buckets: Vec<_> = matching.by_ref().take(max_keys).collect();
        let is_truncated = matching.next().is_some();
        let next_marker = if is_truncated {
            buckets.last().map(|b| b.name.clone())
        } else {
            None
        };

        debug!(owner = %owner.id, count = buckets.len(), is_truncated, "list_buckets completed");
        Ok(ListBucketsOutput {
            owner,
            buckets,
            prefix: input.prefix,
            marker: input.marker,
            max_keys: input.max_keys,
            is_truncated,
            next_marker,
        })
    }

    /// Get the region of a bucket.
    pub async fn handle_get_bucket_location(
        &self,
        req: OssRequest<GetBucketLocationInput>,
    ) -> Result<GetBucketLocationOutput, OssError> {
        let owner = self.requester(req.requester.as_deref());
        let bucket = self.state.owned_bucket(&req.input.bucket, &owner.id)?;
        Ok(GetBucketLocationOutput {
            location_constraint: bucket.region.clone(),
        })
    }
}
