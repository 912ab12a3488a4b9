//! Per-bucket state.
//!
//! An [`OssBucket`] holds its objects, in-progress multipart uploads and the
//! logging and website configurations. Each field sits behind its own
//! `parking_lot::RwLock`. When both are needed, `uploads` is locked before
//! `objects`.

use std::collections::{BTreeMap, HashMap};
use std::ops::Bound;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use rustoss_model::types::{
    Bucket, LoggingEnabled, MultipartUpload as UploadEntry, ObjectSummary, Owner,
    WebsiteConfiguration,
};
use tracing::debug;

use super::multipart::MultipartUpload;
use super::object::StoredObject;
use crate::error::OssServiceError;

/// One page of a ListObjects call.
#[derive(Debug, Clone, Default)]
pub struct ObjectPage {
    /// Objects on this page.
    pub objects: Vec<ObjectSummary>,
    /// Prefixes rolled up by the delimiter.
    pub common_prefixes: Vec<String>,
    /// Whether more entries follow.
    pub is_truncated: bool,
    /// Last key or prefix returned, set when truncated.
    pub next_marker: Option<String>,
}

/// One page of a ListMultipartUploads call.
#[derive(Debug, Clone, Default)]
pub struct UploadPage {
    /// Uploads on this page, ordered by key then upload id.
    pub uploads: Vec<UploadEntry>,
    /// Whether more uploads follow.
    pub is_truncated: bool,
    /// Key of the last returned upload, set when truncated.
    pub next_key_marker: Option<String>,
    /// Upload id of the last returned upload, set when truncated.
    pub next_upload_id_marker: Option<String>,
}

/// A bucket and everything stored in it.
pub struct OssBucket {
    /// Bucket name.
    pub name: String,
    /// Region the bucket was created in.
    pub region: String,
    /// Creation time.
    pub creation_date: DateTime<Utc>,
    /// Bucket owner.
    pub owner: Owner,
    /// Objects by key.
    pub objects: RwLock<BTreeMap<String, StoredObject>>,
    /// In-progress uploads by upload id.
    pub uploads: RwLock<HashMap<String, MultipartUpload>>,
    /// Access logging target, `None` when disabled.
    pub logging: RwLock<Option<LoggingEnabled>>,
    /// Static website configuration.
    pub website: RwLock<Option<WebsiteConfiguration>>,
    /// Set once the bucket has left the namespace; writes are refused after.
    removed: AtomicBool,
}

impl std::fmt::Debug for OssBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OssBucket")
            .field("name", &self.name)
            .field("region", &self.region)
            .field("owner", &self.owner)
            .field("objects", &self.objects.read().len())
            .finish_non_exhaustive()
    }
}

impl OssBucket {
    /// Create an empty bucket.
    #[must_use]
    pub fn new(name: String, region: String, owner: Owner) -> Self {
        Self {
            name,
            region,
            creation_date: Utc::now(),
            owner,
            objects: RwLock::new(BTreeMap::new()),
            uploads: RwLock::new(HashMap::new()),
            logging: RwLock::new(None),
            website: RwLock::new(None),
            removed: AtomicBool::new(false),
        }
    }

    /// Whether the bucket holds no objects and no uploads.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        let uploads = self.uploads.read();
        let objects = self.objects.read();
        objects.is_empty() && uploads.is_empty()
    }

    /// Mark the bucket removed if it holds no objects and no uploads.
    ///
    /// The check and the mark happen under both write locks, so no object or
    /// upload can be added in between. Returns whether the bucket was marked.
    pub fn mark_removed_if_empty(&self) -> bool {
        let uploads = self.uploads.write();
        let objects = self.objects.write();
        if !objects.is_empty() || !uploads.is_empty() {
            return false;
        }
        self.removed.store(true, Ordering::Release);
        true
    }

    fn ensure_live(&self) -> Result<(), OssServiceError> {
        if self.removed.load(Ordering::Acquire) {
            return Err(OssServiceError::NoSuchBucket {
                bucket: self.name.clone(),
            });
        }
        Ok(())
    }

    /// Whether `owner_id` owns this bucket.
    #[must_use]
    pub fn is_owned_by(&self, owner_id: &str) -> bool {
        self.owner.id == owner_id
    }

    /// Listing entry for ListBuckets.
    #[must_use]
    pub fn summary(&self) -> Bucket {
        Bucket {
            name: self.name.clone(),
            location: self.region.clone(),
            creation_date: self.creation_date,
            owner: Some(self.owner.clone()),
        }
    }

    /// Insert or replace an object.
    ///
    /// # Errors
    ///
    /// Returns [`OssServiceError::NoSuchBucket`] if the bucket was deleted.
    pub fn put_object(&self, object: StoredObject) -> Result<(), OssServiceError> {
        let mut objects = self.objects.write();
        self.ensure_live()?;
        debug!(bucket = %self.name, key = %object.key, size = object.size, "storing object");
        objects.insert(object.key.clone(), object);
        Ok(())
    }

    /// Register a new multipart upload.
    ///
    /// # Errors
    ///
    /// Returns [`OssServiceError::NoSuchBucket`] if the bucket was deleted.
    pub fn insert_upload(&self, upload: MultipartUpload) -> Result<(), OssServiceError> {
        let mut uploads = self.uploads.write();
        self.ensure_live()?;
        uploads.insert(upload.upload_id.clone(), upload);
        Ok(())
    }

    /// Look up an object.
    #[must_use]
    pub fn get_object(&self, key: &str) -> Option<StoredObject> {
        self.objects.read().get(key).cloned()
    }

    /// Remove an object, returning whether it existed.
    pub fn delete_object(&self, key: &str) -> bool {
        self.objects.write().remove(key).is_some()
    }

    /// List objects after `marker`, optionally rolling keys up at `delimiter`.
    ///
    /// Objects and common prefixes both count towards `max_keys`.
    #[must_use]
    pub fn list_objects(
        &self,
        prefix: &str,
        delimiter: &str,
        marker: &str,
        max_keys: usize,
    ) -> ObjectPage {
        let objects = self.objects.read();
        let lower = if marker.is_empty() {
            Bound::Unbounded
        } else {
            Bound::Excluded(marker)
        };

        let mut page = ObjectPage::default();
        let mut last: Option<String> = None;

        for (key, object) in objects.range::<str, _>((lower, Bound::Unbounded)) {
            if !key.starts_with(prefix) {
                if key.as_str() > prefix {
                    break;
                }
                continue;
            }

            let rolled_up = (!delimiter.is_empty())
                .then(|| {
                    key[prefix.len()..]
                        .find(delimiter)
                        .map(|pos| &key[..prefix.len() + pos + delimiter.len()])
                })
                .flatten();

            if let Some(common_prefix) = rolled_up {
                if common_prefix == marker || last.as_deref() == Some(common_prefix) {
                    continue;
                }
                if page.objects.len() + page.common_prefixes.len() >= max_keys {
                    page.is_truncated = true;
                    break;
                }
                page.common_prefixes.push(common_prefix.to_owned());
                last = Some(common_prefix.to_owned());
                continue;
            }

            if page.objects.len() + page.common_prefixes.len() >= max_keys {
                page.is_truncated = true;
                break;
            }
            page.objects.push(object.summary());
            last = Some(key.clone());
        }

        if page.is_truncated {
            page.next_marker = last;
        }
        page
    }

    /// List uploads ordered by key then upload id, after the given markers.
    ///
    /// With only `key_marker`, uploads of that key are skipped entirely.
    #[must_use]
    pub fn list_uploads(
        &self,
        prefix: &str,
        key_marker: &str,
        upload_id_marker: &str,
        max_uploads: usize,
    ) -> UploadPage {
        let mut entries: Vec<UploadEntry> = self
            .uploads
            .read()
            .values()
            .filter(|u| u.key.starts_with(prefix))
            .map(MultipartUpload::entry)
            .collect();
        entries.sort_by(|a, b| (&a.key, &a.upload_id).cmp(&(&b.key, &b.upload_id)));

        let after_marker = |entry: &UploadEntry| {
            if key_marker.is_empty() {
                return true;
            }
            match entry.key.as_str().cmp(key_marker) {
                std::cmp::Ordering::Greater => true,
                std::cmp::Ordering::Equal => {
                    !upload_id_marker.is_empty() && entry.upload_id.as_str() > upload_id_marker
                }
                std::cmp::Ordering::Less => false,
            }
        };

        let mut remaining = entries.into_iter().filter(after_marker);
        let mut page = UploadPage {
            uploads: remaining.by_ref().take(max_uploads).collect(),
            ..UploadPage::default()
        };
        page.is_truncated = remaining.next().is_some();
        if page.is_truncated {
            if let Some(last) = page.uploads.last() {
                page.next_key_marker = Some(last.key.clone());
                page.next_upload_id_marker = Some(last.upload_id.clone());
            }
        }
        page
    }
}
