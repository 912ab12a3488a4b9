//! Bucket operations.

use reqwest::Method;
use rustoss_model::error::OssErrorCode;
use rustoss_model::output::{
    GetBucketLocationOutput, GetBucketLoggingOutput, GetBucketWebsiteOutput, ListBucketsOutput,
};
use rustoss_model::types::{
    BucketLoggingStatus, CreateBucketConfiguration, ErrorDocument, IndexDocument, LoggingEnabled,
    WebsiteConfiguration,
};
use rustoss_xml::to_xml;

use super::{OssCall, OssClient, TRACING_TARGET, check_bucket};
use crate::error::{ClientError, Result};
use crate::request::{ListBucketsRequest, SetBucketLoggingRequest, SetBucketWebsiteRequest};
use crate::types::{BucketLoggingResult, BucketWebsiteResult};

impl OssClient {
    /// Create a bucket in the endpoint's region.
    ///
    /// Creating a bucket the caller already owns in the same region succeeds
    /// without changes.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for a malformed name, or the service error
    /// (`BucketAlreadyExists`, `TooManyBuckets`, ...).
    pub async fn create_bucket(&self, bucket: &str) -> Result<()> {
        check_bucket(bucket)?;
        self.send(OssCall::bucket(Method::PUT, bucket)).await?;
        tracing::info!(target: TRACING_TARGET, bucket = %bucket, "created bucket");
        Ok(())
    }

    /// Create a bucket with an explicit location constraint.
    ///
    /// # Errors
    ///
    /// As [`Self::create_bucket`]; an unsupported or foreign location yields
    /// `InvalidLocationConstraint`.
    pub async fn create_bucket_with_location(&self, bucket: &str, location: &str) -> Result<()> {
        check_bucket(bucket)?;
        let configuration = CreateBucketConfiguration {
            location_constraint: Some(location.to_owned()),
            storage_class: None,
        };
        let body = to_xml("CreateBucketConfiguration", &configuration)?;
        self.send(OssCall::bucket(Method::PUT, bucket).body(body)).await?;
        tracing::info!(
            target: TRACING_TARGET,
            bucket = %bucket,
            location = %location,
            "created bucket"
        );
        Ok(())
    }

    /// Delete an empty bucket.
    ///
    /// # Errors
    ///
    /// Returns `NoSuchBucket`, `AccessDenied` or `BucketNotEmpty` from the service.
    pub async fn delete_bucket(&self, bucket: &str) -> Result<()> {
        check_bucket(bucket)?;
        self.send(OssCall::bucket(Method::DELETE, bucket)).await?;
        tracing::info!(target: TRACING_TARGET, bucket = %bucket, "deleted bucket");
        Ok(())
    }

    /// Whether a bucket exists, owned by the caller or not.
    ///
    /// # Errors
    ///
    /// Returns errors other than `NoSuchBucket` and `AccessDenied`.
    pub async fn does_bucket_exist(&self, bucket: &str) -> Result<bool> {
        match self.get_bucket_location(bucket).await {
            Ok(_) => Ok(true),
            Err(err) => match err.code() {
                Some(OssErrorCode::NoSuchBucket) => Ok(false),
                Some(OssErrorCode::AccessDenied) => Ok(true),
                _ => Err(err),
            },
        }
    }

    /// The region of a bucket.
    ///
    /// # Errors
    ///
    /// Returns `NoSuchBucket` or `AccessDenied` from the service.
    pub async fn get_bucket_location(&self, bucket: &str) -> Result<String> {
        check_bucket(bucket)?;
        let output: GetBucketLocationOutput = self
            .send_xml(OssCall::bucket(Method::GET, bucket).query("location", ""))
            .await?;
        Ok(output.location_constraint)
    }

    /// List the caller's buckets.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` from the service for `max_keys` outside 1..=1000.
    pub async fn list_buckets(&self, request: &ListBucketsRequest) -> Result<ListBucketsOutput> {
        let call = OssCall::service(Method::GET)
            .query_opt("prefix", request.prefix.as_deref())
            .query_opt("marker", request.marker.as_deref())
            .query_opt("max-keys", request.max_keys);
        let output: ListBucketsOutput = self.send_xml(call).await?;
        tracing::debug!(
            target: TRACING_TARGET,
            count = output.buckets.len(),
            truncated = output.is_truncated,
            "listed buckets"
        );
        Ok(output)
    }

    /// Enable or disable access logging.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTargetBucketForLogging` when the target does not
    /// exist, is not owned by the caller or lives in another region.
    pub async fn set_bucket_logging(&self, request: &SetBucketLoggingRequest) -> Result<()> {
        check_bucket(&request.bucket)?;
        let status = BucketLoggingStatus {
            logging_enabled: request.target_bucket.as_ref().map(|target| LoggingEnabled {
                target_bucket: target.clone(),
                target_prefix: request.target_prefix.clone(),
            }),
        };
        let body = to_xml("BucketLoggingStatus", &status)?;
        self.send(
            OssCall::bucket(Method::PUT, &request.bucket)
                .query("logging", "")
                .body(body),
        )
        .await?;
        tracing::debug!(
            target: TRACING_TARGET,
            bucket = %request.bucket,
            target_bucket = ?request.target_bucket,
            "set bucket logging"
        );
        Ok(())
    }

    /// The logging configuration; both fields are `None` when disabled.
    ///
    /// # Errors
    ///
    /// Returns `NoSuchBucket` or `AccessDenied` from the service.
    pub async fn get_bucket_logging(&self, bucket: &str) -> Result<BucketLoggingResult> {
        check_bucket(bucket)?;
        let output: GetBucketLoggingOutput = self
            .send_xml(OssCall::bucket(Method::GET, bucket).query("logging", ""))
            .await?;
        Ok(output
            .status
            .logging_enabled
            .map(|enabled| BucketLoggingResult {
                target_bucket: Some(enabled.target_bucket),
                target_prefix: Some(enabled.target_prefix.unwrap_or_default()),
            })
            .unwrap_or_default())
    }

    /// Disable access logging.
    ///
    /// # Errors
    ///
    /// Returns `NoSuchBucket` or `AccessDenied` from the service.
    pub async fn delete_bucket_logging(&self, bucket: &str) -> Result<()> {
        check_bucket(bucket)?;
        self.send(OssCall::bucket(Method::DELETE, bucket).query("logging", ""))
            .await?;
        Ok(())
    }

    /// Configure static website hosting.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` without calling the service when no index
    /// document is set.
    pub async fn set_bucket_website(&self, request: &SetBucketWebsiteRequest) -> Result<()> {
        check_bucket(&request.bucket)?;
        let Some(suffix) = request.index_document.as_ref() else {
            return Err(ClientError::invalid_argument("index document must be set"));
        };
        let configuration = WebsiteConfiguration {
            index_document: Some(IndexDocument {
                suffix: suffix.clone(),
            }),
            error_document: request
                .error_document
                .as_ref()
                .map(|key| ErrorDocument { key: key.clone() }),
        };
        let body = to_xml("WebsiteConfiguration", &configuration)?;
        self.send(
            OssCall::bucket(Method::PUT, &request.bucket)
                .query("website", "")
                .body(body),
        )
        .await?;
        Ok(())
    }

    /// The website configuration.
    ///
    /// # Errors
    ///
    /// Returns `NoSuchWebsiteConfiguration` when none is set.
    pub async fn get_bucket_website(&self, bucket: &str) -> Result<BucketWebsiteResult> {
        check_bucket(bucket)?;
        let output: GetBucketWebsiteOutput = self
            .send_xml(OssCall::bucket(Method::GET, bucket).query("website", ""))
            .await?;
        let configuration = output.configuration;
        Ok(BucketWebsiteResult {
            index_document: configuration.index_document.map(|d| d.suffix),
            error_document: configuration.error_document.map(|d| d.key),
        })
    }

    /// Remove the website configuration; succeeds when none is set.
    ///
    /// # Errors
    ///
    /// Returns `NoSuchBucket` or `AccessDenied` from the service.
    pub async fn delete_bucket_website(&self, bucket: &str) -> Result<()> {
        check_bucket(bucket)?;
        self.send(OssCall::bucket(Method::DELETE, bucket).query("website", ""))
            .await?;
        Ok(())
    }
}
