//! Typed requests for the operations that take more than a bucket and a key.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use reqwest::Method;
use rustoss_model::types::{CompletedPart, EncodingType};

use crate::error::{ClientError, Result};

/// The "unspecified" side of a byte range.
pub const RANGE_UNSPECIFIED: i64 = -1;

/// A `GetObject` request with an optional range and conditions.
///
/// # Examples
///
/// ```
/// use rustoss_client::GetObjectRequest;
///
/// let request = GetObjectRequest::new("photos", "2024/cat.jpg").with_range(-1, 100);
/// assert_eq!(request.range_header().unwrap().as_deref(), Some("bytes=-100"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetObjectRequest {
    /// Bucket name.
    pub bucket: String,
    /// Object key.
    pub key: String,
    range: Option<(i64, i64)>,
    /// Succeed only if the ETag is one of these.
    pub matching_etags: Vec<String>,
    /// Answer `NotModified` if the ETag is one of these.
    pub non_matching_etags: Vec<String>,
    /// Answer `NotModified` unless modified after this instant.
    pub modified_since: Option<DateTime<Utc>>,
    /// Fail unless unmodified since this instant.
    pub unmodified_since: Option<DateTime<Utc>>,
}

impl GetObjectRequest {
    /// Request the whole object.
    #[must_use]
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
            ..Default::default()
        }
    }

    /// Request an inclusive byte range; [`RANGE_UNSPECIFIED`] leaves a side open.
    ///
    /// `(-1, n)` asks for the last `n` bytes. `(-1, -1)` clears the range.
    #[must_use]
    pub fn with_range(mut self, start: i64, end: i64) -> Self {
        self.range = (start != RANGE_UNSPECIFIED || end != RANGE_UNSPECIFIED).then_some((start, end));
        self
    }

    /// The requested range, if any.
    #[must_use]
    pub fn range(&self) -> Option<(i64, i64)> {
        self.range
    }

    /// Add an ETag to the `If-Match` list.
    #[must_use]
    pub fn with_matching_etag(mut self, etag: impl Into<String>) -> Self {
        self.matching_etags.push(etag.into());
        self
    }

    /// Add an ETag to the `If-None-Match` list.
    #[must_use]
    pub fn with_non_matching_etag(mut self, etag: impl Into<String>) -> Self {
        self.non_matching_etags.push(etag.into());
        self
    }

    /// Set `If-Modified-Since`.
    #[must_use]
    pub fn with_modified_since(mut self, since: DateTime<Utc>) -> Self {
        self.modified_since = Some(since);
        self
    }

    /// Set `If-Unmodified-Since`.
    #[must_use]
    pub fn with_unmodified_since(mut self, since: DateTime<Utc>) -> Self {
        self.unmodified_since = Some(since);
        self
    }

    /// The `Range` header for the requested range.
    ///
    /// Bounds the service cannot satisfy (start after end, end past the
    /// object) are still sent; the service then returns the whole object.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for negative bounds other than the sentinel.
    pub fn range_header(&self) -> Result<Option<String>> {
        let Some((start, end)) = self.range else {
            return Ok(None);
        };
        if start < RANGE_UNSPECIFIED || end < RANGE_UNSPECIFIED {
            return Err(ClientError::invalid_argument(format!(
                "invalid range ({start}, {end}): bounds must be >= 0 or -1"
            )));
        }
        let header = match (start, end) {
            (RANGE_UNSPECIFIED, suffix) => format!("bytes=-{suffix}"),
            (start, RANGE_UNSPECIFIED) => format!("bytes={start}-"),
            (start, end) => format!("bytes={start}-{end}"),
        };
        Ok(Some(header))
    }
}

/// A `ListBuckets` request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListBucketsRequest {
    /// Only names starting with this prefix.
    pub prefix: Option<String>,
    /// Only names after this one.
    pub marker: Option<String>,
    /// Page size, 1..=1000 on the service.
    pub max_keys: Option<i64>,
}

impl ListBucketsRequest {
    /// Set the name prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Set the exclusive start marker.
    #[must_use]
    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = Some(marker.into());
        self
    }

    /// Set the page size.
    #[must_use]
    pub fn with_max_keys(mut self, max_keys: i64) -> Self {
        self.max_keys = Some(max_keys);
        self
    }
}

/// A `PutBucketLogging` request. A `None` target disables logging.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetBucketLoggingRequest {
    /// Source bucket.
    pub bucket: String,
    /// Bucket that receives the logs.
    pub target_bucket: Option<String>,
    /// Prefix of the log objects; stored as empty when `None`.
    pub target_prefix: Option<String>,
}

impl SetBucketLoggingRequest {
    /// A request that disables logging until a target is set.
    #[must_use]
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            ..Default::default()
        }
    }

    /// Set the target bucket.
    #[must_use]
    pub fn with_target_bucket(mut self, target: impl Into<String>) -> Self {
        self.target_bucket = Some(target.into());
        self
    }

    /// Set the log object prefix.
    #[must_use]
    pub fn with_target_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.target_prefix = Some(prefix.into());
        self
    }
}

/// A `PutBucketWebsite` request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetBucketWebsiteRequest {
    /// Bucket name.
    pub bucket: String,
    /// Index page suffix; required.
    pub index_document: Option<String>,
    /// Key served on 4xx errors.
    pub error_document: Option<String>,
}

impl SetBucketWebsiteRequest {
    /// A request with no documents set yet.
    #[must_use]
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            ..Default::default()
        }
    }

    /// Set the index document.
    #[must_use]
    pub fn with_index_document(mut self, suffix: impl Into<String>) -> Self {
        self.index_document = Some(suffix.into());
        self
    }

    /// Set the error document.
    #[must_use]
    pub fn with_error_document(mut self, key: impl Into<String>) -> Self {
        self.error_document = Some(key.into());
        self
    }
}

/// A request for a presigned URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresignedUrlRequest {
    /// Bucket name.
    pub bucket: String,
    /// Object key.
    pub key: String,
    /// HTTP method the URL is valid for.
    pub method: Method,
    /// When the URL stops working.
    pub expiration: DateTime<Utc>,
    /// `Content-Type` the caller will send.
    pub content_type: Option<String>,
    /// `Content-MD5` the caller will send.
    pub content_md5: Option<String>,
    /// `x-oss-meta-*` headers the caller will send.
    pub user_metadata: HashMap<String, String>,
    /// Extra query parameters, e.g. `response-content-type`.
    pub query_parameters: BTreeMap<String, String>,
}

impl PresignedUrlRequest {
    /// A GET URL that expires at `expiration`.
    #[must_use]
    pub fn new(bucket: impl Into<String>, key: impl Into<String>, expiration: DateTime<Utc>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
            method: Method::GET,
            expiration,
            content_type: None,
            content_md5: None,
            user_metadata: HashMap::new(),
            query_parameters: BTreeMap::new(),
        }
    }

    /// Change the method.
    #[must_use]
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Set the content type.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Add a query parameter.
    #[must_use]
    pub fn with_query_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_parameters.insert(key.into(), value.into());
        self
    }
}

/// A `DeleteMultipleObjects` request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteObjectsRequest {
    /// Bucket name.
    pub bucket: String,
    /// Keys to delete, 1..=1000.
    pub keys: Vec<String>,
    /// Report only failures.
    pub quiet: bool,
    /// Ask the service to percent-encode the returned keys.
    pub encoding_type: EncodingType,
}

impl DeleteObjectsRequest {
    /// Delete `keys` from `bucket`.
    #[must_use]
    pub fn new(bucket: impl Into<String>, keys: Vec<String>) -> Self {
        Self {
            bucket: bucket.into(),
            keys,
            ..Default::default()
        }
    }

    /// Toggle quiet mode.
    #[must_use]
    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Set the key encoding of the response.
    #[must_use]
    pub fn with_encoding_type(mut self, encoding_type: EncodingType) -> Self {
        self.encoding_type = encoding_type;
        self
    }
}

/// A `ListObjects` request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListObjectsRequest {
    /// Bucket name.
    pub bucket: String,
    /// Only keys starting with this prefix.
    pub prefix: Option<String>,
    /// Only keys after this one.
    pub marker: Option<String>,
    /// Group keys up to this character into common prefixes.
    pub delimiter: Option<String>,
    /// Page size.
    pub max_keys: Option<i64>,
    /// Ask the service to percent-encode keys; the client decodes them.
    pub encoding_type: EncodingType,
}

impl ListObjectsRequest {
    /// List `bucket` from the start.
    #[must_use]
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            ..Default::default()
        }
    }

    /// Set the key prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Set the exclusive start marker.
    #[must_use]
    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = Some(marker.into());
        self
    }

    /// Set the delimiter.
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = Some(delimiter.into());
        self
    }

    /// Set the page size.
    #[must_use]
    pub fn with_max_keys(mut self, max_keys: i64) -> Self {
        self.max_keys = Some(max_keys);
        self
    }

    /// Set the key encoding.
    #[must_use]
    pub fn with_encoding_type(mut self, encoding_type: EncodingType) -> Self {
        self.encoding_type = encoding_type;
        self
    }
}

/// A `ListMultipartUploads` request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListMultipartUploadsRequest {
    /// Bucket name.
    pub bucket: String,
    /// Only keys starting with this prefix.
    pub prefix: Option<String>,
    /// Resume after this key.
    pub key_marker: Option<String>,
    /// Resume after this upload id of `key_marker`.
    pub upload_id_marker: Option<String>,
    /// Page size.
    pub max_uploads: Option<i64>,
    /// Ask the service to percent-encode keys; the client decodes them.
    pub encoding_type: EncodingType,
}

impl ListMultipartUploadsRequest {
    /// List the uploads of `bucket` from the start.
    #[must_use]
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            ..Default::default()
        }
    }

    /// Set the key prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Set the key encoding.
    #[must_use]
    pub fn with_encoding_type(mut self, encoding_type: EncodingType) -> Self {
        self.encoding_type = encoding_type;
        self
    }

    /// Set both resume markers.
    #[must_use]
    pub fn with_markers(mut self, key_marker: Option<String>, upload_id_marker: Option<String>) -> Self {
        self.key_marker = key_marker;
        self.upload_id_marker = upload_id_marker;
        self
    }

    /// Set the page size.
    #[must_use]
    pub fn with_max_uploads(mut self, max_uploads: i64) -> Self {
        self.max_uploads = Some(max_uploads);
        self
    }
}

/// A `CompleteMultipartUpload` request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompleteMultipartUploadRequest {
    /// Bucket name.
    pub bucket: String,
    /// Object key.
    pub key: String,
    /// Upload id from `initiate_multipart_upload`.
    pub upload_id: String,
    /// Parts in ascending order with the ETags `upload_part` returned.
    pub parts: Vec<CompletedPart>,
}
