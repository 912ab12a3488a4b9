//! Request validation for the OSS service.

use rustoss_model::validation::{check_bucket_name, check_object_key};

use crate::error::OssServiceError;

/// Default page size for bucket and object listings.
pub const DEFAULT_MAX_KEYS: i64 = 100;
/// Largest accepted `max-keys`.
pub const MAX_MAX_KEYS: i64 = 1000;
/// Default page size for ListMultipartUploads.
pub const DEFAULT_MAX_UPLOADS: i64 = 1000;
/// Largest number of keys in one DeleteMultipleObjects call.
pub const MAX_DELETE_KEYS: usize = 1000;
/// Largest accepted part number.
pub const MAX_PART_NUMBER: i64 = 10_000;

/// Validate an OSS bucket name.
///
/// # Errors
///
/// Returns [`OssServiceError::InvalidBucketName`] if any rule is violated.
///
/// # Examples
///
/// ```
/// use rustoss_core::validation::validate_bucket_name;
///
/// assert!(validate_bucket_name("my-valid-bucket").is_ok());
/// assert!(validate_bucket_name("AB").is_err());
/// ```
pub fn validate_bucket_name(name: &str) -> Result<(), OssServiceError> {
    check_bucket_name(name).map_err(|reason| OssServiceError::InvalidBucketName {
        name: name.to_owned(),
        reason,
    })
}

/// Validate an OSS object key.
///
/// # Errors
///
/// Returns [`OssServiceError::InvalidObjectName`] if the key is empty, too long
/// or starts with a slash.
pub fn validate_object_key(key: &str) -> Result<(), OssServiceError> {
    check_object_key(key).map_err(|reason| OssServiceError::InvalidObjectName { reason })
}

/// Resolve an optional page size, rejecting values outside `1..=limit`.
///
/// # Errors
///
/// Returns [`OssServiceError::InvalidArgument`] naming `param`.
pub fn resolve_page_size(
    param: &str,
    value: Option<i64>,
    default: i64,
    limit: i64,
) -> Result<usize, OssServiceError> {
    let value = value.unwrap_or(default);
    if !(1..=limit).contains(&value) {
        return Err(OssServiceError::InvalidArgument {
            message: format!("Argument {param} must be an integer between 1 and {limit}."),
        });
    }
    usize::try_from(value).map_err(|e| OssServiceError::Internal(e.into()))
}

/// Validate a part number.
///
/// # Errors
///
/// Returns [`OssServiceError::InvalidArgument`] outside `1..=10000`.
pub fn validate_part_number(part_number: i64) -> Result<u32, OssServiceError> {
    if !(1..=MAX_PART_NUMBER).contains(&part_number) {
        return Err(OssServiceError::InvalidArgument {
            message: format!("Part number must be an integer between 1 and {MAX_PART_NUMBER}."),
        });
    }
    u32::try_from(part_number).map_err(|e| OssServiceError::Internal(e.into()))
}
