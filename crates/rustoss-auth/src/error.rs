//! Error types for OSS request authentication.

/// Errors that can occur while verifying an OSS signature.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Neither an `Authorization` header nor presigned query parameters were sent.
    #[error("Missing Authorization header")]
    MissingAuthHeader,

    /// The `Authorization` header is not `OSS <AccessKeyId>:<Signature>`.
    #[error("Invalid Authorization header format")]
    InvalidAuthHeader,

    /// The access key ID was not found in the credential store.
    #[error("Access key not found: {0}")]
    AccessKeyNotFound(String),

    /// The computed signature does not match the provided signature.
    #[error("Signature does not match")]
    SignatureDoesNotMatch,

    /// The presigned URL is past its `Expires` timestamp.
    #[error("Request has expired")]
    RequestExpired,

    /// A required presigned URL query parameter is missing or malformed.
    #[error("Missing required query parameter: {0}")]
    MissingQueryParam(String),
}
