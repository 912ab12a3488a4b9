//! OSS service domain errors.
//!
//! [`OssServiceError`] covers every failure the in-memory service can produce.
//! Each variant maps to an [`OssErrorCode`]; [`OssServiceError::into_oss_error`]
//! produces the wire error with the code's default status and message.
//!
//! # Usage
//!
//! ```
//! use rustoss_core::error::OssServiceError;
//! use rustoss_model::error::OssErrorCode;
//!
//! let err = OssServiceError::NoSuchBucket {
//!     bucket: "my-bucket".to_owned(),
//! };
//! assert_eq!(err.into_oss_error().code, OssErrorCode::NoSuchBucket);
//! ```

use rustoss_model::error::{OssError, OssErrorCode};

/// OSS service error type.
#[derive(Debug, thiserror::Error)]
pub enum OssServiceError {
    // -----------------------------------------------------------------------
    // Bucket errors
    // -----------------------------------------------------------------------
    /// The specified bucket does not exist.
    #[error("The specified bucket does not exist: {bucket}")]
    NoSuchBucket {
        /// The bucket name that was not found.
        bucket: String,
    },

    /// The bucket name is taken by another owner.
    #[error("The requested bucket name is not available: {bucket}")]
    BucketAlreadyExists {
        /// The bucket name that already exists.
        bucket: String,
    },

    /// The bucket still holds objects or uploads.
    #[error("The bucket you tried to delete is not empty: {bucket}")]
    BucketNotEmpty {
        /// The bucket name that is not empty.
        bucket: String,
    },

    /// The owner already holds the maximum number of buckets.
    #[error("Too many buckets, limit is {limit}")]
    TooManyBuckets {
        /// The configured per-owner limit.
        limit: usize,
    },

    /// The location is unknown, not this endpoint's, or conflicts with the
    /// existing bucket.
    #[error("Invalid location constraint: {location}")]
    InvalidLocationConstraint {
        /// The rejected location.
        location: String,
    },

    /// The bucket has no website configuration.
    #[error("The specified bucket does not have a website configuration: {bucket}")]
    NoSuchWebsiteConfiguration {
        /// The bucket name.
        bucket: String,
    },

    /// The logging target is missing, foreign, or in another region.
    #[error("Invalid target bucket for logging: {target}: {reason}")]
    InvalidTargetBucketForLogging {
        /// The target bucket.
        target: String,
        /// What was wrong with it.
        reason: &'static str,
    },

    // -----------------------------------------------------------------------
    // Object / upload errors
    // -----------------------------------------------------------------------
    /// The specified key does not exist.
    #[error("The specified key does not exist: {key}")]
    NoSuchKey {
        /// The key that was not found.
        key: String,
    },

    /// The specified multipart upload does not exist.
    #[error("The specified upload does not exist: {upload_id}")]
    NoSuchUpload {
        /// The upload id that was not found.
        upload_id: String,
    },

    /// One or more of the listed parts could not be found or its ETag differs.
    #[error("One or more of the specified parts could not be found")]
    InvalidPart,

    /// The listed parts are not in ascending order.
    #[error("The list of parts was not in ascending order")]
    InvalidPartOrder,

    /// The `Content-MD5` header is not a base64 MD5 digest.
    #[error("The Content-MD5 you specified is not valid")]
    InvalidDigest,

    /// The body does not match `Content-MD5`.
    #[error("The Content-MD5 you specified did not match what we received")]
    BadDigest,

    // -----------------------------------------------------------------------
    // Request errors
    // -----------------------------------------------------------------------
    /// The specified bucket name is not valid.
    #[error("Invalid bucket name: {name}: {reason}")]
    InvalidBucketName {
        /// The invalid bucket name.
        name: String,
        /// The rule that was violated.
        reason: &'static str,
    },

    /// The specified object name is not valid.
    #[error("Invalid object name: {reason}")]
    InvalidObjectName {
        /// The rule that was violated.
        reason: &'static str,
    },

    /// A request argument is out of range or malformed.
    #[error("{message}")]
    InvalidArgument {
        /// Description of the bad argument.
        message: String,
    },

    /// The requested range cannot be satisfied.
    #[error("The requested range cannot be satisfied")]
    InvalidRange,

    /// The request body is not the expected document.
    #[error("The XML you provided was not well-formed: {detail}")]
    MalformedXml {
        /// Parser or validation detail.
        detail: String,
    },

    /// The caller does not own the resource.
    #[error("Access denied: {resource}")]
    AccessDenied {
        /// The resource that was denied.
        resource: String,
    },

    // -----------------------------------------------------------------------
    // Conditional request outcomes
    // -----------------------------------------------------------------------
    /// `If-Match` or `If-Unmodified-Since` did not hold.
    #[error("At least one of the pre-conditions you specified did not hold")]
    PreconditionFailed,

    /// `If-None-Match` or `If-Modified-Since` says the object is unchanged.
    #[error("Not Modified")]
    NotModified,

    /// Unexpected internal failure.
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl OssServiceError {
    /// The OSS error code for this failure.
    #[must_use]
    pub fn code(&self) -> OssErrorCode {
        match self {
            Self::NoSuchBucket { .. } => OssErrorCode::NoSuchBucket,
            Self::BucketAlreadyExists { .. } => OssErrorCode::BucketAlreadyExists,
            Self::BucketNotEmpty { .. } => OssErrorCode::BucketNotEmpty,
            Self::TooManyBuckets { .. } => OssErrorCode::TooManyBuckets,
            Self::InvalidLocationConstraint { .. } => OssErrorCode::InvalidLocationConstraint,
            Self::NoSuchWebsiteConfiguration { .. } => OssErrorCode::NoSuchWebsiteConfiguration,
            Self::InvalidTargetBucketForLogging { .. } => {
                OssErrorCode::InvalidTargetBucketForLogging
            }
            Self::NoSuchKey { .. } => OssErrorCode::NoSuchKey,
            Self::NoSuchUpload { .. } => OssErrorCode::NoSuchUpload,
            Self::InvalidPart => OssErrorCode::InvalidPart,
            Self::InvalidPartOrder => OssErrorCode::InvalidPartOrder,
            Self::InvalidDigest => OssErrorCode::InvalidDigest,
            Self::BadDigest => OssErrorCode::BadDigest,
            Self::InvalidBucketName { .. } => OssErrorCode::InvalidBucketName,
            Self::InvalidObjectName { .. } => OssErrorCode::InvalidObjectName,
            Self::InvalidArgument { .. } => OssErrorCode::InvalidArgument,
            Self::InvalidRange => OssErrorCode::InvalidRange,
            Self::MalformedXml { .. } => OssErrorCode::MalformedXML,
            Self::AccessDenied { .. } => OssErrorCode::AccessDenied,
            Self::PreconditionFailed => OssErrorCode::PreconditionFailed,
            Self::NotModified => OssErrorCode::NotModified,
            Self::Internal(_) => OssErrorCode::InternalError,
        }
    }

    /// Convert into the wire-level [`OssError`].
    ///
    /// Messages start with the code's default message; argument errors carry
    /// their own description.
    #[must_use]
    pub fn into_oss_error(self) -> OssError {
        let code = self.code();
        let resource = match &self {
            Self::NoSuchBucket { bucket }
            | Self::BucketAlreadyExists { bucket }
            | Self::BucketNotEmpty { bucket }
            | Self::NoSuchWebsiteConfiguration { bucket } => Some(bucket.clone()),
            Self::NoSuchKey { key } => Some(key.clone()),
            Self::NoSuchUpload { upload_id } => Some(upload_id.clone()),
            Self::InvalidTargetBucketForLogging { target, .. } => Some(target.clone()),
            Self::InvalidBucketName { name, .. } => Some(name.clone()),
            Self::AccessDenied { resource } => Some(resource.clone()),
            _ => None,
        };

        let mut err = match &self {
            Self::InvalidArgument { message } => OssError::with_message(code, message.clone()),
            Self::InvalidTargetBucketForLogging { reason, .. } => {
                OssError::with_message(code, format!("{}: {reason}", code.default_message()))
            }
            _ => OssError::new(code),
        };
        if let Some(resource) = resource {
            err = err.with_resource(resource);
        }
        if matches!(self, Self::Internal(_)) {
            err = err.with_source(self);
        }
        err
    }
}

impl From<OssServiceError> for OssError {
    fn from(err: OssServiceError) -> Self {
        err.into_oss_error()
    }
}

#[cfg(test)]
mod tests {
    use http::StatusCode;

    use super::*;

    #[test]
    fn test_should_convert_no_such_bucket() {
        let err = OssServiceError::NoSuchBucket {
            bucket: "b".to_owned(),
        }
        .into_oss_error();
        assert_eq!(err.code, OssErrorCode::NoSuchBucket);
        assert_eq!(err.status_code, StatusCode::NOT_FOUND);
        assert_eq!(err.resource.as_deref(), Some("b"));
        assert_eq!(err.message, "The specified bucket does not exist.");
    }

    #[test]
    fn test_should_keep_argument_message() {
        let err = OssServiceError::InvalidArgument {
            message: "max-keys must be between 1 and 1000".to_owned(),
        }
        .into_oss_error();
        assert_eq!(err.code, OssErrorCode::InvalidArgument);
        assert_eq!(err.message, "max-keys must be between 1 and 1000");
    }

    #[test]
    fn test_should_prefix_logging_target_message() {
        let err = OssServiceError::InvalidTargetBucketForLogging {
            target: "t".to_owned(),
            reason: "target bucket is in another region",
        }
        .into_oss_error();
        assert!(err.message.starts_with("Invalid target bucket for logging"));
        assert_eq!(err.status_code, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_should_map_conditional_outcomes_to_distinct_codes() {
        let failed = OssServiceError::PreconditionFailed.into_oss_error();
        let unchanged = OssServiceError::NotModified.into_oss_error();
        assert_eq!(failed.status_code, StatusCode::PRECONDITION_FAILED);
        assert_eq!(unchanged.status_code, StatusCode::NOT_MODIFIED);
    }

    #[test]
    fn test_should_keep_internal_source() {
        let err = OssServiceError::Internal(anyhow::anyhow!("boom")).into_oss_error();
        assert_eq!(err.code, OssErrorCode::InternalError);
        assert!(std::error::Error::source(&err).is_some());
    }
}
