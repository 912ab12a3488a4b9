//! Object handlers: put, get, head, delete and batch delete.

use rustoss_model::OssRequest;
use rustoss_model::error::OssError;
use rustoss_model::input::{
    DeleteObjectInput, DeleteObjectsInput, GetObjectInput, HeadObjectInput, PutObjectInput,
};
use rustoss_model::output::{
    DeleteObjectsOutput, GetObjectOutput, HeadObjectOutput, PutObjectOutput,
};
use rustoss_model::request::StreamingBlob;
use tracing::debug;

use crate::checksums::verify_content_md5;
use crate::error::OssServiceError;
use crate::provider::RustOss;
use crate::state::{ObjectMetadata, StoredObject};
use crate::storage::{digest, read_range};
use crate::utils::{RangeResolution, encode_key, evaluate_conditions, resolve_range};
use crate::validation::{MAX_DELETE_KEYS, validate_object_key};

#[allow(clippy::unused_async)]
impl RustOss {
    /// Store an object, replacing any previous one with the same key.
    pub async fn handle_put_object(
        &self,
        req: OssRequest<PutObjectInput>,
    ) -> Result<PutObjectOutput, OssError> {
        let owner = self.requester(req.requester.as_deref());
        let input = req.input;
        validate_object_key(&input.key)?;
        let bucket = self.state.owned_bucket(&input.bucket, &owner.id)?;

        verify_content_md5(input.content_md5.as_deref(), &input.body.data)?;

        let body = input.body.data;
        let written = digest(&body);
        let metadata = ObjectMetadata {
            content_type: input.content_type,
            cache_control: input.cache_control,
            content_disposition: input.content_disposition,
            content_encoding: input.content_encoding,
            expires: input.expires,
            user_metadata: input.metadata,
        };
        bucket.put_object(StoredObject::new(
            input.key.clone(),
            body,
            written.etag.clone(),
            owner,
            metadata,
        ))?;

        debug!(bucket = %bucket.name, key = %input.key, size = written.size, "put_object completed");
        Ok(PutObjectOutput {
            etag: written.etag,
        })
    }

    /// Fetch an object, honoring conditional headers and `Range`.
    pub async fn handle_get_object(
        &self,
        req: OssRequest<GetObjectInput>,
    ) -> Result<GetObjectOutput, OssError> {
        let owner = self.requester(req.requester.as_deref());
        let input = req.input;
        let bucket = self.state.owned_bucket(&input.bucket, &owner.id)?;
        let object = bucket
            .get_object(&input.key)
            .ok_or_else(|| OssServiceError::NoSuchKey {
                key: input.key.clone(),
            })?;

        evaluate_conditions(&input.conditions, &object.etag, object.last_modified)?;

        let resolution = resolve_range(input.range.as_deref(), object.size)?;
        let range = match resolution {
            RangeResolution::Full => None,
            RangeResolution::Partial { start, end } => Some((start, end)),
        };
        let data = read_range(&object.body, range)?;

        let mut headers = object.headers();
        headers.content_length = data.len() as u64;

        debug!(
            bucket = %bucket.name,
            key = %input.key,
            partial = range.is_some(),
            size = headers.content_length,
            "get_object completed"
        );
        Ok(GetObjectOutput {
            headers,
            content_range: resolution.content_range(object.size),
            body: StreamingBlob::new(data),
        })
    }

    /// Fetch object headers only.
    pub async fn handle_head_object(
        &self,
        req: OssRequest<HeadObjectInput>,
    ) -> Result<HeadObjectOutput, OssError> {
        let owner = self.requester(req.requester.as_deref());
        let input = req.input;
        let bucket = self.state.owned_bucket(&input.bucket, &owner.id)?;
        let object = bucket
            .get_object(&input.key)
            .ok_or_else(|| OssServiceError::NoSuchKey {
                key: input.key.clone(),
            })?;

        evaluate_conditions(&input.conditions, &object.etag, object.last_modified)?;

        Ok(HeadObjectOutput {
            headers: object.headers(),
        })
    }

    /// Delete an object. Deleting a missing key succeeds.
    pub async fn handle_delete_object(
        &self,
        req: OssRequest<DeleteObjectInput>,
    ) -> Result<(), OssError> {
        let owner = self.requester(req.requester.as_deref());
        let input = req.input;
        let bucket = self.state.owned_bucket(&input.bucket, &owner.id)?;

        let existed = bucket.delete_object(&input.key);

        debug!(bucket = %bucket.name, key = %input.key, existed, "delete_object completed");
        Ok(())
    }

    /// Delete up to 1000 objects in one call.
    ///
    /// Missing keys count as deleted. Quiet mode reports nothing.
    pub async fn handle_delete_objects(
        &self,
        req: OssRequest<DeleteObjectsInput>,
    ) -> Result<DeleteObjectsOutput, OssError> {
        let owner = self.requester(req.requester.as_deref());
        let input = req.input;
        let bucket = self.state.owned_bucket(&input.bucket, &owner.id)?;

        let keys = input.delete.keys;
        if keys.is_empty() || keys.len() > MAX_DELETE_KEYS {
            return Err(OssServiceError::MalformedXml {
                detail: format!("the request must list between 1 and {MAX_DELETE_KEYS} keys"),
            }
            .into());
        }

        for key in &keys {
            bucket.delete_object(key);
        }

        debug!(bucket = %bucket.name, count = keys.len(), quiet = input.delete.quiet, "delete_objects completed");
        let deleted = if input.delete.quiet {
            Vec::new()
        } else {
            keys.iter()
                .map(|key| encode_key(key, input.encoding_type))
                .collect()
        };
        Ok(DeleteObjectsOutput {
            deleted,
            encoding_type: input.encoding_type,
        })
    }
}
