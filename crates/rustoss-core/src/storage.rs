//! Object and part bodies.
//!
//! Bodies are [`Bytes`] kept inline with their records: an object body in its
//! [`StoredObject`](crate::state::StoredObject), a part body in its
//! [`UploadPart`](crate::state::UploadPart). A body and the size and ETag
//! describing it are always replaced together under the bucket's lock.
//! Ranged reads slice the stored buffer without copying.

use bytes::{Bytes, BytesMut};

use crate::checksums;
use crate::error::OssServiceError;

/// Size and digests of a body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyDigest {
    /// Quoted ETag.
    pub etag: String,
    /// Size in bytes.
    pub size: u64,
    /// Unquoted uppercase hex MD5.
    pub md5_hex: String,
}

/// Digest a single-part body.
///
/// # Examples
///
/// ```
/// use rustoss_core::storage::digest;
///
/// let digest = digest(b"hello");
/// assert_eq!(digest.size, 5);
/// assert_eq!(digest.etag, "\"5D41402ABC4B2A76B9719D911017C592\"");
/// ```
#[must_use]
pub fn digest(data: &[u8]) -> BodyDigest {
    let md5_hex = checksums::compute_md5(data);
    BodyDigest {
        etag: format!("\"{md5_hex}\""),
        size: data.len() as u64,
        md5_hex,
    }
}

/// Slice `data` to the inclusive range `(start, end)`, or return it whole.
///
/// # Errors
///
/// Returns [`OssServiceError::InvalidRange`] if the range falls outside the
/// body.
///
/// # Examples
///
/// ```
/// use bytes::Bytes;
/// use rustoss_core::storage::read_range;
///
/// let body = Bytes::from_static(b"hello");
/// assert_eq!(read_range(&body, Some((1, 3))).unwrap().as_ref(), b"ell");
/// ```
pub fn read_range(data: &Bytes, range: Option<(u64, u64)>) -> Result<Bytes, OssServiceError> {
    let Some((start, end)) = range else {
        return Ok(data.clone());
    };
    let start = usize::try_from(start).map_err(|_| OssServiceError::InvalidRange)?;
    let end = usize::try_from(end).map_err(|_| OssServiceError::InvalidRange)?;
    if start > end || end >= data.len() {
        return Err(OssServiceError::InvalidRange);
    }
    Ok(data.slice(start..=end))
}

/// Concatenate part bodies, in order, into one object body.
///
/// `part_md5_hexes` holds the digest of each part; the ETag is derived from
/// them.
pub fn assemble_parts<'a>(
    parts: impl IntoIterator<Item = &'a Bytes>,
    part_md5_hexes: &[String],
) -> (Bytes, BodyDigest) {
    let mut combined = BytesMut::new();
    for part in parts {
        combined.extend_from_slice(part);
    }
    let data = combined.freeze();

    let etag = checksums::compute_multipart_etag(part_md5_hexes);
    let md5_hex = etag
        .trim_matches('"')
        .split('-')
        .next()
        .unwrap_or_default()
        .to_owned();
    let digest = BodyDigest {
        etag,
        size: data.len() as u64,
        md5_hex,
    };
    (data, digest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_digest_body() {
        let result = digest(b"hello");
        assert_eq!(result.etag, "\"5D41402ABC4B2A76B9719D911017C592\"");
        assert_eq!(result.md5_hex, "5D41402ABC4B2A76B9719D911017C592");
        assert_eq!(result.size, 5);
    }

    #[test]
    fn test_should_read_inclusive_range() {
        let body = Bytes::from_static(b"0123456789");
        assert_eq!(read_range(&body, Some((2, 5))).expect("range").as_ref(), b"2345");
        assert_eq!(read_range(&body, None).expect("full").len(), 10);
        assert!(matches!(
            read_range(&body, Some((5, 10))),
            Err(OssServiceError::InvalidRange)
        ));
        assert!(matches!(
            read_range(&body, Some((6, 5))),
            Err(OssServiceError::InvalidRange)
        ));
    }

    #[test]
    fn test_should_assemble_parts_in_listed_order() {
        let first = Bytes::from_static(b"hello ");
        let second = Bytes::from_static(b"world");
        let hexes = [digest(&first).md5_hex, digest(&second).md5_hex];

        let (data, result) = assemble_parts([&first, &second], &hexes);
        assert_eq!(data.as_ref(), b"hello world");
        assert_eq!(result.size, 11);
        assert!(result.etag.ends_with("-2\""));
        assert!(!result.md5_hex.contains('-'));
    }
}
