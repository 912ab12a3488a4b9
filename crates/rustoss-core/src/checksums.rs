//! MD5 digests, ETags and `Content-MD5` verification.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use digest::Digest;
use md5::Md5;

use crate::error::OssServiceError;

/// Compute the uppercase hex MD5 digest of `data`.
///
/// # Examples
///
/// ```
/// use rustoss_core::checksums::compute_md5;
///
/// assert_eq!(compute_md5(b""), "D41D8CD98F00B204E9800998ECF8427E");
/// ```
#[must_use]
pub fn compute_md5(data: &[u8]) -> String {
    hex::encode_upper(Md5::digest(data))
}

/// Compute the quoted ETag of a single-part object.
#[must_use]
pub fn compute_etag(data: &[u8]) -> String {
    format!("\"{}\"", compute_md5(data))
}

/// Compute the ETag of an object assembled from parts.
///
/// The digest is the MD5 of the concatenated binary part digests, suffixed
/// with `-<part count>`.
#[must_use]
pub fn compute_multipart_etag(part_md5_hexes: &[impl AsRef<str>]) -> String {
    let mut hasher = Md5::new();
    for hex_md5 in part_md5_hexes {
        if let Ok(raw) = hex::decode(hex_md5.as_ref()) {
            hasher.update(&raw);
        }
    }
    format!(
        "\"{}-{}\"",
        hex::encode_upper(hasher.finalize()),
        part_md5_hexes.len()
    )
}

/// Verify a base64 `Content-MD5` header against the body.
///
/// # Errors
///
/// Returns [`OssServiceError::InvalidDigest`] when the header is not a base64
/// encoded 16 byte digest and [`OssServiceError::BadDigest`] when it does not
/// match the body.
pub fn verify_content_md5(content_md5: Option<&str>, body: &[u8]) -> Result<(), OssServiceError> {
    let Some(expected) = content_md5 else {
        return Ok(());
    };

    let decoded = BASE64
        .decode(expected.trim())
        .map_err(|_| OssServiceError::InvalidDigest)?;
    if decoded.len() != 16 {
        return Err(OssServiceError::InvalidDigest);
    }

    if decoded.as_slice() == Md5::digest(body).as_slice() {
        Ok(())
    } else {
        Err(OssServiceError::BadDigest)
    }
}
