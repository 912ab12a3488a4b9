//! Shared utilities for the OSS service.
//!
//! ID generation, `Range` resolution, conditional request evaluation and key
//! encoding for listings.

use chrono::{DateTime, Utc};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use rustoss_model::input::Conditions;
use rustoss_model::types::EncodingType;
use tracing::warn;
use uuid::Uuid;

use crate::error::OssServiceError;

/// Characters escaped when `encoding-type=url` is requested.
const KEY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

// ---------------------------------------------------------------------------
// ID generation
// ---------------------------------------------------------------------------

/// Generate an upload id for multipart uploads (32 uppercase hex digits).
///
/// # Examples
///
/// ```
/// use rustoss_core::utils::generate_upload_id;
///
/// let id = generate_upload_id();
/// assert_eq!(id.len(), 32);
/// assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
/// ```
#[must_use]
pub fn generate_upload_id() -> String {
    Uuid::new_v4().simple().to_string().to_uppercase()
}

/// Generate a request id in the 24 hex digit form OSS uses.
#[must_use]
pub fn generate_request_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string().to_uppercase();
    id.truncate(24);
    id
}

// ---------------------------------------------------------------------------
// Range
// ---------------------------------------------------------------------------

/// How a `Range` header applies to an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeResolution {
    /// Return the whole object with `200 OK`.
    Full,
    /// Return bytes `start..=end` with `206 Partial Content`.
    Partial {
        /// First byte, inclusive.
        start: u64,
        /// Last byte, inclusive.
        end: u64,
    },
}

impl RangeResolution {
    /// The `Content-Range` header for a partial response.
    #[must_use]
    pub fn content_range(&self, size: u64) -> Option<String> {
        match self {
            Self::Full => None,
            Self::Partial { start, end } => Some(format!("bytes {start}-{end}/{size}")),
        }
    }
}

/// Resolve a `Range` header against an object of `size` bytes.
///
/// - `bytes=a-b` returns `a..=b` when `a <= b < size`
/// - `bytes=a-` returns `a..` when `a < size`
/// - `bytes=-n` returns the last `n` bytes
/// - anything else, including `a > b` or bounds past the end, returns the
///   whole object
///
/// # Errors
///
/// Returns [`OssServiceError::InvalidRange`] for `bytes=-0`.
///
/// # Examples
///
/// ```
/// use rustoss_core::utils::{RangeResolution, resolve_range};
///
/// let r = resolve_range(Some("bytes=0-9"), 100).unwrap();
/// assert_eq!(r, RangeResolution::Partial { start: 0, end: 9 });
///
/// let r = resolve_range(Some("bytes=50-10"), 100).unwrap();
/// assert_eq!(r, RangeResolution::Full);
/// ```
pub fn resolve_range(range: Option<&str>, size: u64) -> Result<RangeResolution, OssServiceError> {
    let Some(range) = range else {
        return Ok(RangeResolution::Full);
    };

    let Some(spec) = range.trim().strip_prefix("bytes=") else {
        warn!(range, "ignoring range with unknown unit");
        return Ok(RangeResolution::Full);
    };
    let Some((start, end)) = spec.split_once('-') else {
        warn!(range, "ignoring malformed range");
        return Ok(RangeResolution::Full);
    };
    let (start, end) = (start.trim(), end.trim());

    // Suffix range: the last `n` bytes.
    if start.is_empty() {
        let Ok(n) = end.parse::<u64>() else {
            warn!(range, "ignoring malformed suffix range");
            return Ok(RangeResolution::Full);
        };
        if n == 0 {
            return Err(OssServiceError::InvalidRange);
        }
        if size == 0 {
            return Ok(RangeResolution::Full);
        }
        return Ok(RangeResolution::Partial {
            start: size - n.min(size),
            end: size - 1,
        });
    }

    let Ok(start) = start.parse::<u64>() else {
        warn!(range, "ignoring malformed range start");
        return Ok(RangeResolution::Full);
    };

    let end = if end.is_empty() {
        size.checked_sub(1)
    } else {
        end.parse::<u64>().ok()
    };

    match end {
        Some(end) if start <= end && end < size => Ok(RangeResolution::Partial { start, end }),
        _ => {
            warn!(range, size, "range out of bounds, returning whole object");
            Ok(RangeResolution::Full)
        }
    }
}

// ---------------------------------------------------------------------------
// Conditional requests
// ---------------------------------------------------------------------------

/// Strip surrounding double quotes (and a weak validator prefix) from an ETag.
///
/// # Examples
///
/// ```
/// use rustoss_core::utils::normalize_etag;
///
/// assert_eq!(normalize_etag("\"ABC\""), "ABC");
/// assert_eq!(normalize_etag("W/\"ABC\""), "ABC");
/// assert_eq!(normalize_etag("ABC"), "ABC");
/// ```
#[must_use]
pub fn normalize_etag(etag: &str) -> &str {
    let etag = etag.trim();
    let etag = etag.strip_prefix("W/").unwrap_or(etag);
    etag.strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(etag)
}

/// Whether a comma separated ETag list contains `etag` or `*`.
fn etag_list_contains(list: &str, etag: &str) -> bool {
    let etag = normalize_etag(etag);
    list.split(',')
        .map(str::trim)
        .any(|candidate| candidate == "*" || normalize_etag(candidate).eq_ignore_ascii_case(etag))
}

/// Evaluate conditional headers against an object.
///
/// Checked in order `If-Match`, `If-Unmodified-Since`, `If-None-Match`,
/// `If-Modified-Since`. Dates compare at second granularity.
///
/// # Errors
///
/// - [`OssServiceError::PreconditionFailed`] when `If-Match` lists no matching
///   ETag or the object changed after `If-Unmodified-Since`.
/// - [`OssServiceError::NotModified`] when `If-None-Match` lists the ETag or the
///   object has not changed since `If-Modified-Since`.
pub fn evaluate_conditions(
    conditions: &Conditions,
    etag: &str,
    last_modified: DateTime<Utc>,
) -> Result<(), OssServiceError> {
    let modified = last_modified.timestamp();

    if let Some(if_match) = &conditions.if_match {
        if !etag_list_contains(if_match, etag) {
            return Err(OssServiceError::PreconditionFailed);
        }
    }
    if let Some(since) = conditions.if_unmodified_since {
        if modified > since.timestamp() {
            return Err(OssServiceError::PreconditionFailed);
        }
    }
    if let Some(if_none_match) = &conditions.if_none_match {
        if etag_list_contains(if_none_match, etag) {
            return Err(OssServiceError::NotModified);
        }
    }
    if let Some(since) = conditions.if_modified_since {
        if modified <= since.timestamp() {
            return Err(OssServiceError::NotModified);
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Listings
// ---------------------------------------------------------------------------

/// Apply the requested `encoding-type` to a key or prefix.
#[must_use]
pub fn encode_key(value: &str, encoding: EncodingType) -> String {
    match encoding {
        EncodingType::Url => utf8_percent_encode(value, KEY_ENCODE_SET).to_string(),
        EncodingType::None => value.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    const SIZE: u64 = 128 * 1024;

    #[test]
    fn test_should_resolve_bounded_range() {
        let r = resolve_range(Some("bytes=0-65535"), SIZE).expect("valid");
        assert_eq!(r, RangeResolution::Partial { start: 0, end: 65535 });
        assert_eq!(r.content_range(SIZE).as_deref(), Some("bytes 0-65535/131072"));
    }

    #[test]
    fn test_should_resolve_open_ended_range() {
        let r = resolve_range(Some("bytes=65536-"), SIZE).expect("valid");
        assert_eq!(r, RangeResolution::Partial { start: 65536, end: SIZE - 1 });
    }

    #[test]
    fn test_should_resolve_suffix_range() {
        let r = resolve_range(Some("bytes=-32768"), SIZE).expect("valid");
        assert_eq!(r, RangeResolution::Partial { start: SIZE - 32768, end: SIZE - 1 });
    }

    #[test]
    fn test_should_reject_empty_suffix_range() {
        assert!(matches!(
            resolve_range(Some("bytes=-0"), SIZE),
            Err(OssServiceError::InvalidRange)
        ));
    }

    #[test]
    fn test_should_return_whole_object_for_ignored_ranges() {
        for range in ["bytes=65536-32768", "bytes=0-262143", "bytes=131072-", "items=0-1", "bytes=x-1"] {
            assert_eq!(
                resolve_range(Some(range), SIZE).expect("ignored"),
                RangeResolution::Full,
                "{range}"
            );
        }
        assert_eq!(resolve_range(None, SIZE).expect("none"), RangeResolution::Full);
    }

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).single().expect("valid timestamp")
    }

    #[test]
    fn test_should_fail_precondition_on_etag_mismatch() {
        let conditions = Conditions {
            if_match: Some("\"OTHER\"".to_owned()),
            ..Default::default()
        };
        assert!(matches!(
            evaluate_conditions(&conditions, "\"ETAG\"", at(100)),
            Err(OssServiceError::PreconditionFailed)
        ));
    }

    #[test]
    fn test_should_report_not_modified_on_etag_match() {
        let conditions = Conditions {
            if_none_match: Some("\"A\", \"ETAG\"".to_owned()),
            ..Default::default()
        };
        assert!(matches!(
            evaluate_conditions(&conditions, "\"ETAG\"", at(100)),
            Err(OssServiceError::NotModified)
        ));
    }

    #[test]
    fn test_should_evaluate_dates_at_second_granularity() {
        let modified = at(100) + Duration::milliseconds(900);

        let unmodified_since = Conditions {
            if_unmodified_since: Some(at(100)),
            ..Default::default()
        };
        assert!(evaluate_conditions(&unmodified_since, "\"E\"", modified).is_ok());

        let modified_since = Conditions {
            if_modified_since: Some(at(100)),
            ..Default::default()
        };
        assert!(matches!(
            evaluate_conditions(&modified_since, "\"E\"", modified),
            Err(OssServiceError::NotModified)
        ));
        assert!(evaluate_conditions(&modified_since, "\"E\"", at(101)).is_ok());
    }

    #[test]
    fn test_should_prefer_precondition_failure_over_not_modified() {
        let conditions = Conditions {
            if_match: Some("\"OTHER\"".to_owned()),
            if_none_match: Some("\"ETAG\"".to_owned()),
            ..Default::default()
        };
        assert!(matches!(
            evaluate_conditions(&conditions, "\"ETAG\"", at(100)),
            Err(OssServiceError::PreconditionFailed)
        ));
    }

    #[test]
    fn test_should_url_encode_keys_on_request() {
        assert_eq!(encode_key("a b/c", EncodingType::Url), "a%20b%2Fc");
        assert_eq!(encode_key("a b/c", EncodingType::None), "a b/c");
    }

    #[test]
    fn test_should_generate_request_ids() {
        let id = generate_request_id();
        assert_eq!(id.len(), 24);
        assert_ne!(id, generate_request_id());
    }
}
