//! Results returned by the client.

use std::collections::HashMap;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures::{Stream, TryStreamExt};
use reqwest::header::{self, HeaderMap, HeaderValue};

use crate::error::{ClientError, Result};

pub use rustoss_model::output::{ListBucketsOutput, ListMultipartUploadsOutput, ListObjectsOutput};
pub use rustoss_model::types::{Bucket, MultipartUpload, ObjectSummary, Owner};

/// Prefix of user metadata headers.
pub const META_PREFIX: &str = "x-oss-meta-";

/// Object metadata, as sent on upload and returned by GET and HEAD.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectMetadata {
    /// Body length in bytes; ignored on upload.
    pub content_length: u64,
    /// `Content-Type`.
    pub content_type: Option<String>,
    /// Quoted entity tag; ignored on upload.
    pub etag: Option<String>,
    /// `Last-Modified`; ignored on upload.
    pub last_modified: Option<DateTime<Utc>>,
    /// `Cache-Control`.
    pub cache_control: Option<String>,
    /// `Content-Disposition`.
    pub content_disposition: Option<String>,
    /// `Content-Encoding`.
    pub content_encoding: Option<String>,
    /// `Content-MD5` of the upload; never returned.
    pub content_md5: Option<String>,
    /// `Expires` exactly as stored; see [`Self::expiration_time`].
    pub raw_expires: Option<String>,
    /// `Content-Range` of a partial GET.
    pub content_range: Option<String>,
    /// `x-oss-meta-*` entries, keys lowercased and without the prefix.
    pub user_metadata: HashMap<String, String>,
}

impl ObjectMetadata {
    /// Set the content type.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Set the raw `Expires` value.
    #[must_use]
    pub fn with_expires(mut self, expires: impl Into<String>) -> Self {
        self.raw_expires = Some(expires.into());
        self
    }

    /// Add a user metadata entry.
    ///
    /// Header names are case-insensitive, so the key is sent lowercased and
    /// comes back lowercased: `"Author"` is read back as `"author"`.
    #[must_use]
    pub fn with_user_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.user_metadata.insert(key.into(), value.into());
        self
    }

    /// Parse the `Expires` value as an HTTP date.
    ///
    /// Returns `Ok(None)` when no `Expires` was stored.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidDate`] carrying the raw value when it is
    /// not a valid HTTP date.
    pub fn expiration_time(&self) -> Result<Option<DateTime<Utc>>> {
        self.raw_expires
            .as_deref()
            .map(|raw| parse_http_date(raw).ok_or_else(|| ClientError::InvalidDate(raw.to_owned())))
            .transpose()
    }

    /// Read the metadata from response headers.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let text = |name: header::HeaderName| {
            headers
                .get(name)
                .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
        };
        let user_metadata = headers
            .iter()
            .filter_map(|(name, value)| {
                let suffix = name.as_str().strip_prefix(META_PREFIX)?;
                Some((
                    suffix.to_owned(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                ))
            })
            .collect();

        Self {
            content_length: text(header::CONTENT_LENGTH)
                .and_then(|v| v.parse().ok())
                .unwrap_or_default(),
            content_type: text(header::CONTENT_TYPE),
            etag: text(header::ETAG),
            last_modified: text(header::LAST_MODIFIED).and_then(|v| parse_http_date(&v)),
            cache_control: text(header::CACHE_CONTROL),
            content_disposition: text(header::CONTENT_DISPOSITION),
            content_encoding: text(header::CONTENT_ENCODING),
            content_md5: None,
            raw_expires: text(header::EXPIRES),
            content_range: text(header::CONTENT_RANGE),
            user_metadata,
        }
    }

    /// Write the upload headers.
    ///
    /// Metadata keys are lowercased; values are sent as raw UTF-8 bytes.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` when a name or value is not a valid header.
    pub fn write_headers(&self, headers: &mut HeaderMap) -> Result<()> {
        let optional = [
            (header::CONTENT_TYPE, &self.content_type),
            (header::CACHE_CONTROL, &self.cache_control),
            (header::CONTENT_DISPOSITION, &self.content_disposition),
            (header::CONTENT_ENCODING, &self.content_encoding),
            (header::EXPIRES, &self.raw_expires),
        ];
        for (name, value) in optional {
            if let Some(value) = value {
                headers.insert(name, header_value(value)?);
            }
        }
        if let Some(md5) = &self.content_md5 {
            headers.insert(header::HeaderName::from_static("content-md5"), header_value(md5)?);
        }
        for (key, value) in &self.user_metadata {
            let name = header::HeaderName::from_bytes(
                format!("{META_PREFIX}{}", key.to_ascii_lowercase()).as_bytes(),
            )
            .map_err(|_| ClientError::invalid_argument(format!("invalid metadata key {key:?}")))?;
            headers.insert(name, header_value(value)?);
        }
        Ok(())
    }
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_bytes(value.as_bytes())
        .map_err(|_| ClientError::invalid_argument(format!("invalid header value {value:?}")))
}

/// Parse an RFC 1123 date such as `Tue, 15 Nov 1994 08:12:31 GMT`.
pub(crate) fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// A downloaded object.
#[derive(Debug)]
pub struct OssObject {
    /// Bucket name.
    pub bucket: String,
    /// Object key.
    pub key: String,
    /// Headers of the response.
    pub metadata: ObjectMetadata,
    response: reqwest::Response,
}

impl OssObject {
    pub(crate) fn new(bucket: String, key: String, response: reqwest::Response) -> Self {
        Self {
            bucket,
            key,
            metadata: ObjectMetadata::from_headers(response.headers()),
            response,
        }
    }

    /// Read the whole body.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the body cannot be read.
    pub async fn bytes(self) -> Result<Bytes> {
        Ok(self.response.bytes().await?)
    }

    /// Stream the body in chunks.
    pub fn into_stream(self) -> impl Stream<Item = Result<Bytes>> {
        self.response.bytes_stream().map_err(ClientError::from)
    }

    /// Read the next chunk, `None` at the end.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the body cannot be read.
    pub async fn chunk(&mut self) -> Result<Option<Bytes>> {
        Ok(self.response.chunk().await?)
    }
}

/// Logging configuration of a bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BucketLoggingResult {
    /// Bucket that receives the logs, `None` when logging is off.
    pub target_bucket: Option<String>,
    /// Prefix of the log objects.
    pub target_prefix: Option<String>,
}

/// Static website configuration of a bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BucketWebsiteResult {
    /// Index page suffix.
    pub index_document: Option<String>,
    /// Key served on 4xx errors.
    pub error_document: Option<String>,
}

/// Outcome of a multiple-object delete.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteObjectsResult {
    /// Keys the service reported as deleted; empty in quiet mode.
    pub deleted_objects: Vec<String>,
}

/// A freshly started multipart upload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InitiateMultipartUploadResult {
    /// Bucket name.
    pub bucket: String,
    /// Object key.
    pub key: String,
    /// Id to pass to the part and completion calls.
    pub upload_id: String,
}

/// An assembled multipart object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompleteMultipartUploadResult {
    /// Bucket name.
    pub bucket: String,
    /// Object key.
    pub key: String,
    /// Object URL path.
    pub location: String,
    /// Entity tag of the assembled object.
    pub etag: String,
}
