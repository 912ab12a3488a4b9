//! Error types of the OSS client.

use reqwest::StatusCode;
use rustoss_model::error::OssErrorCode;
use thiserror::Error;

/// Result type alias for client operations.
pub type Result<T, E = ClientError> = std::result::Result<T, E>;

/// Errors returned by [`OssClient`](crate::OssClient).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ClientError {
    /// A local argument check failed; nothing was sent.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The service answered with an error document.
    #[error("{code}: {message}")]
    Service {
        /// Error code, e.g. `NoSuchBucket`.
        code: String,
        /// Message as sent by the service.
        message: String,
        /// `x-oss-request-id` of the failed request.
        request_id: Option<String>,
        /// Host that answered.
        host_id: Option<String>,
        /// HTTP status.
        status: StatusCode,
    },

    /// The request could not be sent or the response could not be read.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// A response body was not the expected XML document.
    #[error("malformed response: {0}")]
    Xml(#[from] rustoss_xml::XmlError),

    /// Local file I/O failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// An endpoint or presigned URL could not be parsed.
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// A date header could not be parsed.
    #[error("invalid date {0:?}")]
    InvalidDate(String),
}

impl ClientError {
    /// The service error code, when the service reported a known one.
    #[must_use]
    pub fn code(&self) -> Option<OssErrorCode> {
        match self {
            Self::Service { code, .. } => code.parse().ok(),
            _ => None,
        }
    }

    /// The raw service error code, including codes this crate does not know.
    #[must_use]
    pub fn raw_code(&self) -> Option<&str> {
        match self {
            Self::Service { code, .. } => Some(code),
            _ => None,
        }
    }

    /// The HTTP status of a service error.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Service { status, .. } => Some(*status),
            Self::Http(err) => err.status(),
            _ => None,
        }
    }

    /// The service error message.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Service { message, .. } => Some(message),
            _ => None,
        }
    }

    /// The `x-oss-request-id` of a failed request.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        match self {
            Self::Service { request_id, .. } => request_id.as_deref(),
            _ => None,
        }
    }

    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_expose_known_service_codes() {
        let err = ClientError::Service {
            code: "NoSuchWebsiteConfiguration".to_owned(),
            message: "The specified bucket does not have a website configuration.".to_owned(),
            request_id: None,
            host_id: None,
            status: StatusCode::NOT_FOUND,
        };
        assert_eq!(err.code(), Some(OssErrorCode::NoSuchWebsiteConfiguration));
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
        assert!(err.to_string().starts_with("NoSuchWebsiteConfiguration: "));
    }

    #[test]
    fn test_should_keep_unknown_codes_raw() {
        let err = ClientError::Service {
            code: "SomethingNew".to_owned(),
            message: String::new(),
            request_id: None,
            host_id: None,
            status: StatusCode::BAD_REQUEST,
        };
        assert_eq!(err.code(), None);
        assert_eq!(err.raw_code(), Some("SomethingNew"));
        assert_eq!(ClientError::invalid_argument("x").code(), None);
    }
}
