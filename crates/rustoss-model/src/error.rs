//! OSS error codes and the service error type.

use std::fmt;
use std::str::FromStr;

/// Well-known OSS error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[non_exhaustive]
pub enum OssErrorCode {
    /// AccessDenied error.
    #[default]
    AccessDenied,
    /// BadDigest error.
    BadDigest,
    /// BucketAlreadyExists error.
    BucketAlreadyExists,
    /// BucketNotEmpty error.
    BucketNotEmpty,
    /// EntityTooLarge error.
    EntityTooLarge,
    /// InternalError error.
    InternalError,
    /// InvalidAccessKeyId error.
    InvalidAccessKeyId,
    /// InvalidArgument error.
    InvalidArgument,
    /// InvalidBucketName error.
    InvalidBucketName,
    /// InvalidDigest error.
    InvalidDigest,
    /// InvalidLocationConstraint error.
    InvalidLocationConstraint,
    /// InvalidObjectName error.
    InvalidObjectName,
    /// InvalidPart error.
    InvalidPart,
    /// InvalidPartOrder error.
    InvalidPartOrder,
    /// InvalidRange error.
    InvalidRange,
    /// InvalidRequest error.
    InvalidRequest,
    /// InvalidTargetBucketForLogging error.
    InvalidTargetBucketForLogging,
    /// MalformedXML error.
    MalformedXML,
    /// MethodNotAllowed error.
    MethodNotAllowed,
    /// MissingArgument error.
    MissingArgument,
    /// NoSuchBucket error.
    NoSuchBucket,
    /// NoSuchKey error.
    NoSuchKey,
    /// NoSuchUpload error.
    NoSuchUpload,
    /// NoSuchWebsiteConfiguration error.
    NoSuchWebsiteConfiguration,
    /// NotImplemented error.
    NotImplemented,
    /// NotModified error (HTTP 304).
    NotModified,
    /// PreconditionFailed error.
    PreconditionFailed,
    /// RequestTimeTooSkewed error.
    RequestTimeTooSkewed,
    /// SignatureDoesNotMatch error.
    SignatureDoesNotMatch,
    /// TooManyBuckets error.
    TooManyBuckets,
    /// A custom error code not in the standard set.
    Custom(&'static str),
}

/// Every named code, used for string lookups.
const KNOWN_CODES: &[OssErrorCode] = &[
    OssErrorCode::AccessDenied,
    OssErrorCode::BadDigest,
    OssErrorCode::BucketAlreadyExists,
    OssErrorCode::BucketNotEmpty,
    OssErrorCode::EntityTooLarge,
    OssErrorCode::InternalError,
    OssErrorCode::InvalidAccessKeyId,
    OssErrorCode::InvalidArgument,
    OssErrorCode::InvalidBucketName,
    OssErrorCode::InvalidDigest,
    OssErrorCode::InvalidLocationConstraint,
    OssErrorCode::InvalidObjectName,
    OssErrorCode::InvalidPart,
    OssErrorCode::InvalidPartOrder,
    OssErrorCode::InvalidRange,
    OssErrorCode::InvalidRequest,
    OssErrorCode::InvalidTargetBucketForLogging,
    OssErrorCode::MalformedXML,
    OssErrorCode::MethodNotAllowed,
    OssErrorCode::MissingArgument,
    OssErrorCode::NoSuchBucket,
    OssErrorCode::NoSuchKey,
    OssErrorCode::NoSuchUpload,
    OssErrorCode::NoSuchWebsiteConfiguration,
    OssErrorCode::NotImplemented,
    OssErrorCode::NotModified,
    OssErrorCode::PreconditionFailed,
    OssErrorCode::RequestTimeTooSkewed,
    OssErrorCode::SignatureDoesNotMatch,
    OssErrorCode::TooManyBuckets,
];

impl OssErrorCode {
    /// Returns the error code as a string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AccessDenied => "AccessDenied",
            Self::BadDigest => "BadDigest",
            Self::BucketAlreadyExists => "BucketAlreadyExists",
            Self::BucketNotEmpty => "BucketNotEmpty",
            Self::EntityTooLarge => "EntityTooLarge",
            Self::InternalError => "InternalError",
            Self::InvalidAccessKeyId => "InvalidAccessKeyId",
            Self::InvalidArgument => "InvalidArgument",
            Self::InvalidBucketName => "InvalidBucketName",
            Self::InvalidDigest => "InvalidDigest",
            Self::InvalidLocationConstraint => "InvalidLocationConstraint",
            Self::InvalidObjectName => "InvalidObjectName",
            Self::InvalidPart => "InvalidPart",
            Self::InvalidPartOrder => "InvalidPartOrder",
            Self::InvalidRange => "InvalidRange",
            Self::InvalidRequest => "InvalidRequest",
            Self::InvalidTargetBucketForLogging => "InvalidTargetBucketForLogging",
            Self::MalformedXML => "MalformedXML",
            Self::MethodNotAllowed => "MethodNotAllowed",
            Self::MissingArgument => "MissingArgument",
            Self::NoSuchBucket => "NoSuchBucket",
            Self::NoSuchKey => "NoSuchKey",
            Self::NoSuchUpload => "NoSuchUpload",
            Self::NoSuchWebsiteConfiguration => "NoSuchWebsiteConfiguration",
            Self::NotImplemented => "NotImplemented",
            Self::NotModified => "NotModified",
            Self::PreconditionFailed => "PreconditionFailed",
            Self::RequestTimeTooSkewed => "RequestTimeTooSkewed",
            Self::SignatureDoesNotMatch => "SignatureDoesNotMatch",
            Self::TooManyBuckets => "TooManyBuckets",
            Self::Custom(s) => s,
        }
    }

    /// Returns the default HTTP status code for this error.
    #[must_use]
    #[allow(clippy::match_same_arms)]
    pub fn default_status_code(&self) -> http::StatusCode {
        match self {
            Self::NotModified => http::StatusCode::NOT_MODIFIED,
            Self::BadDigest
            | Self::EntityTooLarge
            | Self::InvalidArgument
            | Self::InvalidBucketName
            | Self::InvalidDigest
            | Self::InvalidLocationConstraint
            | Self::InvalidObjectName
            | Self::InvalidPart
            | Self::InvalidPartOrder
            | Self::InvalidRequest
            | Self::InvalidTargetBucketForLogging
            | Self::MalformedXML
            | Self::MissingArgument
            | Self::TooManyBuckets => http::StatusCode::BAD_REQUEST,
            Self::AccessDenied
            | Self::InvalidAccessKeyId
            | Self::RequestTimeTooSkewed
            | Self::SignatureDoesNotMatch => http::StatusCode::FORBIDDEN,
            Self::NoSuchBucket
            | Self::NoSuchKey
            | Self::NoSuchUpload
            | Self::NoSuchWebsiteConfiguration => http::StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => http::StatusCode::METHOD_NOT_ALLOWED,
            Self::BucketAlreadyExists | Self::BucketNotEmpty => http::StatusCode::CONFLICT,
            Self::PreconditionFailed => http::StatusCode::PRECONDITION_FAILED,
            Self::InvalidRange => http::StatusCode::RANGE_NOT_SATISFIABLE,
            Self::InternalError => http::StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotImplemented => http::StatusCode::NOT_IMPLEMENTED,
            Self::Custom(_) => http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the default message for this error.
    #[must_use]
    pub fn default_message(&self) -> &'static str {
        match self {
            Self::AccessDenied => "You have no right to access this bucket.",
            Self::BadDigest => "The Content-MD5 you specified did not match what we received.",
            Self::BucketAlreadyExists => {
                "The requested bucket name is not available. The bucket namespace is shared by \
                 all users of the system. Please select a different name and try again."
            }
            Self::BucketNotEmpty => "The bucket you tried to delete is not empty.",
            Self::EntityTooLarge => "Your proposed upload exceeds the maximum allowed size.",
            Self::InternalError => "We encountered an internal error. Please try again.",
            Self::InvalidAccessKeyId => {
                "The OSS Access Key Id you provided does not exist in our records."
            }
            Self::InvalidArgument => "Invalid Argument",
            Self::InvalidBucketName => "The specified bucket is not valid.",
            Self::InvalidDigest => "The Content-MD5 you specified is not valid.",
            Self::InvalidLocationConstraint => "The specified location-constraint is not valid",
            Self::InvalidObjectName => "The specified object name is not valid.",
            Self::InvalidPart => "One or more of the specified parts could not be found.",
            Self::InvalidPartOrder => "The list of parts was not in ascending order.",
            Self::InvalidRange => "The requested range cannot be satisfied.",
            Self::InvalidRequest => "Invalid Request",
            Self::InvalidTargetBucketForLogging => "Invalid target bucket for logging",
            Self::MalformedXML => "The XML you provided was not well-formed.",
            Self::MethodNotAllowed => "The specified method is not allowed against this resource.",
            Self::MissingArgument => "Missing Some Required Arguments.",
            Self::NoSuchBucket => "The specified bucket does not exist.",
            Self::NoSuchKey => "The specified key does not exist.",
            Self::NoSuchUpload => "The specified upload does not exist.",
            Self::NoSuchWebsiteConfiguration => {
                "The specified bucket does not have a website configuration."
            }
            Self::NotImplemented => "A header you provided implies functionality that is not implemented.",
            Self::NotModified => "Not Modified",
            Self::PreconditionFailed => {
                "At least one of the pre-conditions you specified did not hold."
            }
            Self::RequestTimeTooSkewed => {
                "The difference between the request time and the current time is too large."
            }
            Self::SignatureDoesNotMatch => {
                "The request signature we calculated does not match the signature you provided."
            }
            Self::TooManyBuckets => "You have attempted to create more buckets than allowed.",
            Self::Custom(s) => s,
        }
    }
}

impl fmt::Display for OssErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a code string names no known [`OssErrorCode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownErrorCode(pub String);

impl fmt::Display for UnknownErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown OSS error code: {}", self.0)
    }
}

impl std::error::Error for UnknownErrorCode {}

impl FromStr for OssErrorCode {
    type Err = UnknownErrorCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        KNOWN_CODES
            .iter()
            .find(|code| code.as_str() == s)
            .copied()
            .ok_or_else(|| UnknownErrorCode(s.to_owned()))
    }
}

/// An OSS error response.
#[derive(Debug)]
pub struct OssError {
    /// The error code.
    pub code: OssErrorCode,
    /// A human-readable error message.
    pub message: String,
    /// The resource that caused the error.
    pub resource: Option<String>,
    /// The request ID.
    pub request_id: Option<String>,
    /// The HTTP status code.
    pub status_code: http::StatusCode,
    /// The underlying source error, if any.
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for OssError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OssError({}): {}", self.code, self.message)
    }
}

impl std::error::Error for OssError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

impl OssError {
    /// Create a new OssError from an error code.
    #[must_use]
    pub fn new(code: OssErrorCode) -> Self {
        Self {
            status_code: code.default_status_code(),
            message: code.default_message().to_owned(),
            code,
            resource: None,
            request_id: None,
            source: None,
        }
    }

    /// Create a new OssError with a custom message.
    #[must_use]
    pub fn with_message(code: OssErrorCode, message: impl Into<String>) -> Self {
        Self {
            status_code: code.default_status_code(),
            message: message.into(),
            code,
            resource: None,
            request_id: None,
            source: None,
        }
    }

    /// Set the resource that caused this error.
    #[must_use]
    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    /// Set the request ID.
    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    /// Set the source error.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Create a NoSuchBucket error.
    #[must_use]
    pub fn no_such_bucket(bucket_name: impl Into<String>) -> Self {
        Self::new(OssErrorCode::NoSuchBucket).with_resource(bucket_name)
    }

    /// Create a NoSuchKey error.
    #[must_use]
    pub fn no_such_key(key: impl Into<String>) -> Self {
        Self::new(OssErrorCode::NoSuchKey).with_resource(key)
    }

    /// Create a NoSuchUpload error.
    #[must_use]
    pub fn no_such_upload(upload_id: impl Into<String>) -> Self {
        Self::new(OssErrorCode::NoSuchUpload).with_resource(upload_id)
    }

    /// Create an AccessDenied error.
    #[must_use]
    pub fn access_denied(resource: impl Into<String>) -> Self {
        Self::new(OssErrorCode::AccessDenied).with_resource(resource)
    }

    /// Create an InternalError error.
    #[must_use]
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::with_message(OssErrorCode::InternalError, message)
    }

    /// Create an InvalidArgument error.
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::with_message(OssErrorCode::InvalidArgument, message)
    }

    /// Create an InvalidRequest error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::with_message(OssErrorCode::InvalidRequest, message)
    }

    /// Create a MalformedXML error.
    #[must_use]
    pub fn malformed_xml(detail: impl Into<String>) -> Self {
        Self::new(OssErrorCode::MalformedXML).with_resource(detail)
    }

    /// Create a MethodNotAllowed error.
    #[must_use]
    pub fn method_not_allowed(method: impl Into<String>) -> Self {
        Self::new(OssErrorCode::MethodNotAllowed).with_resource(method)
    }

    /// Create a SignatureDoesNotMatch error.
    #[must_use]
    pub fn signature_does_not_match(detail: impl Into<String>) -> Self {
        Self::new(OssErrorCode::SignatureDoesNotMatch).with_resource(detail)
    }
}

/// Create an OssError from an error code.
///
/// # Examples
///
/// ```
/// use rustoss_model::oss_error;
/// use rustoss_model::error::OssErrorCode;
///
/// let err = oss_error!(NoSuchBucket);
/// assert_eq!(err.code, OssErrorCode::NoSuchBucket);
///
/// let err = oss_error!(NoSuchKey, "The key does not exist");
/// assert_eq!(err.message, "The key does not exist");
/// ```
#[macro_export]
macro_rules! oss_error {
    ($code:ident) => {
        $crate::error::OssError::new($crate::error::OssErrorCode::$code)
    };
    ($code:ident, $msg:expr) => {
        $crate::error::OssError::with_message($crate::error::OssErrorCode::$code, $msg)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_parse_known_codes_from_str() {
        for code in KNOWN_CODES {
            let parsed: OssErrorCode = code.as_str().parse().expect("known code");
            assert_eq!(&parsed, code);
        }
    }

    #[test]
    fn test_should_reject_unknown_code() {
        let err = "NoSuchThing".parse::<OssErrorCode>().unwrap_err();
        assert_eq!(err.0, "NoSuchThing");
    }

    #[test]
    fn test_should_map_error_codes_to_status() {
        assert_eq!(
            OssErrorCode::NotModified.default_status_code(),
            http::StatusCode::NOT_MODIFIED
        );
        assert_eq!(
            OssErrorCode::InvalidRange.default_status_code(),
            http::StatusCode::RANGE_NOT_SATISFIABLE
        );
        assert_eq!(
            OssErrorCode::InvalidTargetBucketForLogging.default_status_code(),
            http::StatusCode::BAD_REQUEST
        );
        assert_eq!(
            OssErrorCode::NoSuchWebsiteConfiguration.default_status_code(),
            http::StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_should_build_error_with_resource_and_request_id() {
        let err = OssError::no_such_bucket("photos").with_request_id("abc");
        assert_eq!(err.code, OssErrorCode::NoSuchBucket);
        assert_eq!(err.resource.as_deref(), Some("photos"));
        assert_eq!(err.request_id.as_deref(), Some("abc"));
        assert!(err.message.starts_with("The specified bucket does not exist"));
        assert_eq!(err.to_string(), format!("OssError(NoSuchBucket): {}", err.message));
    }
}
