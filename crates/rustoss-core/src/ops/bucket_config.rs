//! Bucket configuration handlers: access logging and static website.

use rustoss_model::OssRequest;
use rustoss_model::error::OssError;
use rustoss_model::input::{
    DeleteBucketLoggingInput, DeleteBucketWebsiteInput, GetBucketLoggingInput,
    GetBucketWebsiteInput, PutBucketLoggingInput, PutBucketWebsiteInput,
};
use rustoss_model::output::{GetBucketLoggingOutput, GetBucketWebsiteOutput};
use rustoss_model::types::{BucketLoggingStatus, LoggingEnabled};
use tracing::debug;

use crate::error::OssServiceError;
use crate::provider::RustOss;
use crate::state::OssBucket;

impl RustOss {
    /// Check that `target` can receive the access logs of `source`.
    fn check_logging_target(
        &self,
        source: &OssBucket,
        target: &str,
    ) -> Result<(), OssServiceError> {
        let invalid = |reason: &'static str| OssServiceError::InvalidTargetBucketForLogging {
            target: target.to_owned(),
            reason,
        };

        let target_bucket = self
            .state
            .get_bucket(target)
            .map_err(|_| invalid("target bucket does not exist"))?;
        if target_bucket.owner != source.owner {
            return Err(invalid("target bucket is owned by someone else"));
        }
        if target_bucket.region != source.region {
            return Err(invalid("target bucket is in another region"));
        }
        Ok(())
    }
}

#[allow(clippy::unused_async)]
impl RustOss {
    /// Enable, change or disable access logging.
    pub async fn handle_put_bucket_logging(
        &self,
        req: OssRequest<PutBucketLoggingInput>,
    ) -> Result<(), OssError> {
        let owner = self.requester(req.requester.as_deref());
        let bucket = self.state.owned_bucket(&req.input.bucket, &owner.id)?;

        let logging = match req.input.status.logging_enabled {
            Some(enabled) if !enabled.target_bucket.is_empty() => {
                self.check_logging_target(&bucket, &enabled.target_bucket)?;
                Some(LoggingEnabled {
                    target_bucket: enabled.target_bucket,
                    target_prefix: Some(enabled.target_prefix.unwrap_or_default()),
                })
            }
            _ => None,
        };

        debug!(bucket = %bucket.name, enabled = logging.is_some(), "put_bucket_logging completed");
        *bucket.logging.write() = logging;
        Ok(())
    }

    /// Read the logging status; empty when logging is disabled.
    pub async fn handle_get_bucket_logging(
        &self,
        req: OssRequest<GetBucketLoggingInput>,
    ) -> Result<GetBucketLoggingOutput, OssError> {
        let owner = self.requester(req.requester.as_deref());
        let bucket = self.state.owned_bucket(&req.input.bucket, &owner.id)?;
        let logging_enabled = bucket.logging.read().clone();
        Ok(GetBucketLoggingOutput {
            status: BucketLoggingStatus { logging_enabled },
        })
    }

    /// Disable access logging.
    pub async fn handle_delete_bucket_logging(
        &self,
        req: OssRequest<DeleteBucketLoggingInput>,
    ) -> Result<(), OssError> {
        let owner = self.requester(req.requester.as_deref());
        let bucket = self.state.owned_bucket(&req.input.bucket, &owner.id)?;
        *bucket.logging.write() = None;
        debug!(bucket = %bucket.name, "delete_bucket_logging completed");
        Ok(())
    }

    /// Store a website configuration; the index document is required.
    pub async fn handle_put_bucket_website(
        &self,
        req: OssRequest<PutBucketWebsiteInput>,
    ) -> Result<(), OssError> {
        let owner = self.requester(req.requester.as_deref());
        let bucket = self.state.owned_bucket(&req.input.bucket, &owner.id)?;
        let configuration = req.input.configuration;

        if configuration
            .index_document
            .as_ref()
            .is_none_or(|doc| doc.suffix.is_empty())
        {
            return Err(OssServiceError::MalformedXml {
                detail: "IndexDocument/Suffix is required".to_owned(),
            }
            .into());
        }

        debug!(bucket = %bucket.name, "put_bucket_website completed");
        *bucket.website.write() = Some(configuration);
        Ok(())
    }

    /// Read the website configuration.
    pub async fn handle_get_bucket_website(
        &self,
        req: OssRequest<GetBucketWebsiteInput>,
    ) -> Result<GetBucketWebsiteOutput, OssError> {
        let owner = self.requester(req.requester.as_deref());
        let bucket = self.state.owned_bucket(&req.input.bucket, &owner.id)?;
        let configuration = bucket.website.read().clone().ok_or_else(|| {
            OssServiceError::NoSuchWebsiteConfiguration {
                bucket: bucket.name.clone(),
            }
        })?;
        Ok(GetBucketWebsiteOutput { configuration })
    }

    /// Remove the website configuration. Idempotent.
    pub async fn handle_delete_bucket_website(
        &self,
        req: OssRequest<DeleteBucketWebsiteInput>,
    ) -> Result<(), OssError> {
        let owner = self.requester(req.requester.as_deref());
        let bucket = self.state.owned_bucket(&req.input.bucket, &owner.id)?;
        *bucket.website.write() = None;
        debug!(bucket = %bucket.name, "delete_bucket_website completed");
        Ok(())
    }
}
