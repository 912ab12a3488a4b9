//! Naming rules shared by the service and the client.
//!
//! Each check returns the violated rule as a static string so callers can wrap
//! it in their own error type.

/// Minimum bucket name length.
pub const MIN_BUCKET_NAME_LEN: usize = 3;
/// Maximum bucket name length.
pub const MAX_BUCKET_NAME_LEN: usize = 63;
/// Maximum object key length in bytes.
pub const MAX_KEY_BYTES: usize = 1023;

/// Check an OSS bucket name.
///
/// - 3-63 characters long
/// - only lowercase letters, digits and hyphens
/// - must not start or end with a hyphen
///
/// # Errors
///
/// Returns the violated rule.
///
/// # Examples
///
/// ```
/// use rustoss_model::validation::check_bucket_name;
///
/// assert!(check_bucket_name("my-bucket-01").is_ok());
/// assert!(check_bucket_name("My-Bucket").is_err());
/// ```
pub fn check_bucket_name(name: &str) -> Result<(), &'static str> {
    let len = name.len();
    if !(MIN_BUCKET_NAME_LEN..=MAX_BUCKET_NAME_LEN).contains(&len) {
        return Err("bucket name must be between 3 and 63 characters long");
    }

    if !name
        .bytes()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
    {
        return Err("bucket name must only contain lowercase letters, digits and hyphens");
    }

    if name.starts_with('-') || name.ends_with('-') {
        return Err("bucket name must not start or end with a hyphen");
    }

    Ok(())
}

/// Check an OSS object key.
///
/// Keys are 1-1023 bytes of UTF-8 and must not start with `/` or `\`.
///
/// # Errors
///
/// Returns the violated rule.
pub fn check_object_key(key: &str) -> Result<(), &'static str> {
    if key.is_empty() {
        return Err("object key must not be empty");
    }
    if key.len() > MAX_KEY_BYTES {
        return Err("object key must be at most 1023 bytes");
    }
    if key.starts_with('/') || key.starts_with('\\') {
        return Err("object key must not start with '/' or '\\'");
    }
    Ok(())
}
