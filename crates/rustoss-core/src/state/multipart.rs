//! Multipart upload state.
//!
//! Each [`MultipartUpload`] records the metadata given at initiation and the
//! parts received so far, bodies included.

use std::collections::BTreeMap;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use rustoss_model::types::{MultipartUpload as UploadEntry, Owner};

use super::object::{ObjectMetadata, STANDARD_STORAGE_CLASS};

/// An in-progress multipart upload.
#[derive(Debug, Clone)]
pub struct MultipartUpload {
    /// Upload id.
    pub upload_id: String,
    /// Key of the object being assembled.
    pub key: String,
    /// When the upload was initiated.
    pub initiated: DateTime<Utc>,
    /// Initiator.
    pub owner: Owner,
    /// Metadata applied to the completed object.
    pub metadata: ObjectMetadata,
    /// Parts received so far, by part number.
    pub parts: BTreeMap<u32, UploadPart>,
}

impl MultipartUpload {
    /// Start a new upload.
    #[must_use]
    pub fn new(upload_id: String, key: String, owner: Owner, metadata: ObjectMetadata) -> Self {
        Self {
            upload_id,
            key,
            initiated: Utc::now(),
            owner,
            metadata,
            parts: BTreeMap::new(),
        }
    }

    /// Insert or replace a part.
    pub fn put_part(&mut self, part: UploadPart) {
        self.parts.insert(part.part_number, part);
    }

    /// Listing entry for ListMultipartUploads.
    #[must_use]
    pub fn entry(&self) -> UploadEntry {
        UploadEntry {
            key: self.key.clone(),
            upload_id: self.upload_id.clone(),
            initiated: self.initiated,
            storage_class: STANDARD_STORAGE_CLASS.to_owned(),
        }
    }
}

/// A part received by UploadPart.
#[derive(Debug, Clone)]
pub struct UploadPart {
    /// 1-based part number.
    pub part_number: u32,
    /// Quoted ETag.
    pub etag: String,
    /// Unquoted hex MD5, used for the completed ETag.
    pub md5_hex: String,
    /// Size in bytes.
    pub size: u64,
    /// Upload time.
    pub last_modified: DateTime<Utc>,
    /// Part body.
    pub data: Bytes,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn part(part_number: u32, etag: &str) -> UploadPart {
        UploadPart {
            part_number,
            etag: etag.to_owned(),
            md5_hex: etag.trim_matches('"').to_owned(),
            size: 5,
            last_modified: Utc::now(),
            data: Bytes::from_static(b"hello"),
        }
    }

    #[test]
    fn test_should_replace_part_with_same_number() {
        let mut upload = MultipartUpload::new(
            "U1".to_owned(),
            "k".to_owned(),
            Owner::from_access_key("ak"),
            ObjectMetadata::default(),
        );
        upload.put_part(part(2, "\"B\""));
        upload.put_part(part(1, "\"A\""));
        upload.put_part(part(2, "\"C\""));

        let etags: Vec<&str> = upload.parts.values().map(|p| p.etag.as_str()).collect();
        assert_eq!(etags, ["\"A\"", "\"C\""]);
    }

    #[test]
    fn test_should_build_listing_entry() {
        let upload = MultipartUpload::new(
            "U1".to_owned(),
            "dir/k".to_owned(),
            Owner::from_access_key("ak"),
            ObjectMetadata::default(),
        );
        let entry = upload.entry();
        assert_eq!(entry.key, "dir/k");
        assert_eq!(entry.upload_id, "U1");
        assert_eq!(entry.initiated, upload.initiated);
    }
}
