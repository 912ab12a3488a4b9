//! Top-level OSS namespace.
//!
//! [`OssServiceState`] maps bucket names to buckets. Names are unique across
//! all owners. Several providers may share one state to model endpoints in
//! different regions.

use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use rustoss_model::types::{Bucket, Owner};
use tracing::{debug, info};

use crate::error::OssServiceError;

use super::bucket::OssBucket;

/// Name of the bucket seeded under a foreign owner.
pub const RESERVED_BUCKET: &str = "oss";

/// Owner id of [`RESERVED_BUCKET`].
pub const RESERVED_OWNER_ID: &str = "oss-reserved";

/// Outcome of a CreateBucket call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    /// A new bucket was created.
    Created,
    /// The caller already owned the bucket in the requested region.
    AlreadyOwned,
}

/// Bucket namespace shared by every endpoint.
pub struct OssServiceState {
    buckets: DashMap<String, Arc<OssBucket>>,
}

impl std::fmt::Debug for OssServiceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OssServiceState")
            .field("bucket_count", &self.buckets.len())
            .finish_non_exhaustive()
    }
}

impl OssServiceState {
    /// Create a namespace holding only the reserved bucket, placed in `region`.
    #[must_use]
    pub fn new(region: &str) -> Self {
        let state = Self {
            buckets: DashMap::new(),
        };
        state.seed_reserved(region);
        state
    }

    fn seed_reserved(&self, region: &str) {
        self.buckets.insert(
            RESERVED_BUCKET.to_owned(),
            Arc::new(OssBucket::new(
                RESERVED_BUCKET.to_owned(),
                region.to_owned(),
                Owner::from_access_key(RESERVED_OWNER_ID),
            )),
        );
    }

    /// Create a bucket, or confirm an existing one owned by the caller.
    ///
    /// # Errors
    ///
    /// - [`OssServiceError::BucketAlreadyExists`] if someone else owns `name`.
    /// - [`OssServiceError::InvalidLocationConstraint`] if the caller owns
    ///   `name` in another region.
    /// - [`OssServiceError::TooManyBuckets`] if the caller already owns
    ///   `max_buckets` buckets.
    pub fn create_bucket(
        &self,
        name: &str,
        region: &str,
        owner: &Owner,
        max_buckets: usize,
    ) -> Result<CreateOutcome, OssServiceError> {
        if let Some(existing) = self.buckets.get(name) {
            return Self::check_existing(&existing, region, owner);
        }

        // Counting iterates every shard, so it must happen before `entry`
        // takes a shard write lock.
        if self.count_owned(&owner.id) >= max_buckets {
            return Err(OssServiceError::TooManyBuckets { limit: max_buckets });
        }

        match self.buckets.entry(name.to_owned()) {
            Entry::Occupied(existing) => Self::check_existing(existing.get(), region, owner),
            Entry::Vacant(slot) => {
                slot.insert(Arc::new(OssBucket::new(
                    name.to_owned(),
                    region.to_owned(),
                    owner.clone(),
                )));
                info!(bucket = %name, region = %region, owner = %owner.id, "bucket created");
                Ok(CreateOutcome::Created)
            }
        }
    }

    fn check_existing(
        existing: &OssBucket,
        region: &str,
        owner: &Owner,
    ) -> Result<CreateOutcome, OssServiceError> {
        if !existing.is_owned_by(&owner.id) {
            return Err(OssServiceError::BucketAlreadyExists {
                bucket: existing.name.clone(),
            });
        }
        if existing.region != region {
            return Err(OssServiceError::InvalidLocationConstraint {
                location: region.to_owned(),
            });
        }
        Ok(CreateOutcome::AlreadyOwned)
    }

    /// Delete an empty bucket owned by `owner_id`.
    ///
    /// # Errors
    ///
    /// - [`OssServiceError::NoSuchBucket`] if the bucket does not exist.
    /// - [`OssServiceError::AccessDenied`] if someone else owns it.
    /// - [`OssServiceError::BucketNotEmpty`] if objects or uploads remain.
    pub fn delete_bucket(&self, name: &str, owner_id: &str) -> Result<(), OssServiceError> {
        let Entry::Occupied(entry) = self.buckets.entry(name.to_owned()) else {
            return Err(OssServiceError::NoSuchBucket {
                bucket: name.to_owned(),
            });
        };
        if !entry.get().is_owned_by(owner_id) {
            return Err(OssServiceError::AccessDenied {
                resource: name.to_owned(),
            });
        }
        // Writers holding an `Arc` to the bucket see the mark and fail with
        // NoSuchBucket instead of writing into a detached bucket.
        if !entry.get().mark_removed_if_empty() {
            return Err(OssServiceError::BucketNotEmpty {
                bucket: name.to_owned(),
            });
        }

        entry.remove();
        info!(bucket = %name, "bucket deleted");
        Ok(())
    }

    /// Look up a bucket regardless of owner.
    ///
    /// # Errors
    ///
    /// Returns [`OssServiceError::NoSuchBucket`] if the bucket does not exist.
    pub fn get_bucket(&self, name: &str) -> Result<Arc<OssBucket>, OssServiceError> {
        self.buckets
            .get(name)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| OssServiceError::NoSuchBucket {
                bucket: name.to_owned(),
            })
    }

    /// Look up a bucket the caller owns.
    ///
    /// # Errors
    ///
    /// - [`OssServiceError::NoSuchBucket`] if the bucket does not exist.
    /// - [`OssServiceError::AccessDenied`] if someone else owns it.
    pub fn owned_bucket(&self, name: &str, owner_id: &str) -> Result<Arc<OssBucket>, OssServiceError> {
        let bucket = self.get_bucket(name)?;
        if !bucket.is_owned_by(owner_id) {
            return Err(OssServiceError::AccessDenied {
                resource: name.to_owned(),
            });
        }
        Ok(bucket)
    }

    /// Buckets owned by `owner_id`, sorted by name.
    #[must_use]
    pub fn list_buckets(&self, owner_id: &str) -> Vec<Bucket> {
        let mut buckets: Vec<Bucket> = self
            .buckets
            .iter()
            .filter(|entry| entry.value().is_owned_by(owner_id))
            .map(|entry| entry.value().summary())
            .collect();
        buckets.sort_by(|a, b| a.name.cmp(&b.name));
        buckets
    }

    /// Whether a bucket exists.
    #[must_use]
    pub fn bucket_exists(&self, name: &str) -> bool {
        self.buckets.contains_key(name)
    }

    fn count_owned(&self, owner_id: &str) -> usize {
        self.buckets
            .iter()
            .filter(|entry| entry.value().is_owned_by(owner_id))
            .count()
    }

    /// Remove every bucket and re-seed the reserved one in `region`.
    pub fn reset(&self, region: &str) {
        debug!("resetting all OSS service state");
        self.buckets.clear();
        self.seed_reserved(region);
    }
}
