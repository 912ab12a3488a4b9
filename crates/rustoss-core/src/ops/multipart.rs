//! Multipart upload handlers.
//!
//! Implements `initiate_multipart_upload`, `upload_part`,
//! `complete_multipart_upload` and `abort_multipart_upload`.

use rustoss_model::OssRequest;
use rustoss_model::error::OssError;
use rustoss_model::input::{
    AbortMultipartUploadInput, CompleteMultipartUploadInput, InitiateMultipartUploadInput,
    UploadPartInput,
};
use rustoss_model::output::{
    CompleteMultipartUploadOutput, InitiateMultipartUploadOutput, UploadPartOutput,
};
use tracing::debug;

use crate::error::OssServiceError;
use crate::provider::RustOss;
use crate::state::{MultipartUpload, ObjectMetadata, StoredObject, UploadPart};
use crate::storage::{assemble_parts, digest};
use crate::utils::{generate_upload_id, normalize_etag};
use crate::validation::{validate_object_key, validate_part_number};

#[allow(clippy::unused_async)]
impl RustOss {
    /// Start a multipart upload.
    pub async fn handle_initiate_multipart_upload(
        &self,
        req: OssRequest<InitiateMultipartUploadInput>,
    ) -> Result<InitiateMultipartUploadOutput, OssError> {
        let owner = self.requester(req.requester.as_deref());
        let input = req.input;
        validate_object_key(&input.key)?;
        let bucket = self.state.owned_bucket(&input.bucket, &owner.id)?;

        let upload_id = generate_upload_id();
        let metadata = ObjectMetadata {
            content_type: input.content_type,
            user_metadata: input.metadata,
            ..Default::default()
        };
        bucket.insert_upload(MultipartUpload::new(
            upload_id.clone(),
            input.key.clone(),
            owner,
            metadata,
        ))?;

        debug!(bucket = %bucket.name, key = %input.key, upload_id = %upload_id, "initiate_multipart_upload completed");
        Ok(InitiateMultipartUploadOutput {
            bucket: bucket.name.clone(),
            key: input.key,
            upload_id,
        })
    }

    /// Store one part of an upload.
    pub async fn handle_upload_part(
        &self,
        req: OssRequest<UploadPartInput>,
    ) -> Result<UploadPartOutput, OssError> {
        let owner = self.requester(req.requester.as_deref());
        let input = req.input;
        let part_number = validate_part_number(input.part_number)?;
        let bucket = self.state.owned_bucket(&input.bucket, &owner.id)?;

        let mut uploads = bucket.uploads.write();
        let upload = uploads
            .get_mut(&input.upload_id)
            .filter(|u| u.key == input.key)
            .ok_or_else(|| OssServiceError::NoSuchUpload {
                upload_id: input.upload_id.clone(),
            })?;

        let data = input.body.data;
        let written = digest(&data);
        upload.put_part(UploadPart {
            part_number,
            etag: written.etag.clone(),
            md5_hex: written.md5_hex,
            size: written.size,
            last_modified: chrono::Utc::now(),
            data,
        });
        drop(uploads);

        debug!(bucket = %bucket.name, upload_id = %input.upload_id, part_number, "upload_part completed");
        Ok(UploadPartOutput {
            etag: written.etag,
        })
    }

    /// Assemble the listed parts into the final object.
    pub async fn handle_complete_multipart_upload(
        &self,
        req: OssRequest<CompleteMultipartUploadInput>,
    ) -> Result<CompleteMultipartUploadOutput, OssError> {
        let owner = self.requester(req.requester.as_deref());
        let input = req.input;
        let bucket = self.state.owned_bucket(&input.bucket, &owner.id)?;
        let listed = input.multipart_upload.parts;
        if listed.is_empty() {
            return Err(OssServiceError::MalformedXml {
                detail: "the request must list at least one part".to_owned(),
            }
            .into());
        }
        if listed.windows(2).any(|w| w[0].part_number >= w[1].part_number) {
            return Err(OssServiceError::InvalidPartOrder.into());
        }

        // The upload is removed and the object stored under one hold of the
        // upload table, so a concurrent abort or complete cannot interleave.
        let mut uploads = bucket.uploads.write();
        let upload = uploads
            .get(&input.upload_id)
            .filter(|u| u.key == input.key)
            .ok_or_else(|| OssServiceError::NoSuchUpload {
                upload_id: input.upload_id.clone(),
            })?;

        let mut parts = Vec::with_capacity(listed.len());
        let mut part_md5_hexes = Vec::with_capacity(listed.len());
        for completed in &listed {
            let part = upload
                .parts
                .get(&completed.part_number)
                .filter(|p| normalize_etag(&p.etag) == normalize_etag(&completed.etag))
                .ok_or(OssServiceError::InvalidPart)?;
            parts.push(&part.data);
            part_md5_hexes.push(part.md5_hex.clone());
        }
        let part_count = parts.len();
        let (body, written) = assemble_parts(parts, &part_md5_hexes);

        bucket.put_object(StoredObject::new(
            input.key.clone(),
            body,
            written.etag.clone(),
            owner,
            upload.metadata.clone(),
        ))?;
        uploads.remove(&input.upload_id);
        drop(uploads);

        debug!(
            bucket = %bucket.name,
            key = %input.key,
            parts = part_count,
            size = written.size,
            "complete_multipart_upload completed"
        );
        Ok(CompleteMultipartUploadOutput {
            location: format!("/{}/{}", bucket.name, input.key),
            bucket: bucket.name.clone(),
            key: input.key,
            etag: written.etag,
        })
    }

    /// Discard an upload and its parts.
    pub async fn handle_abort_multipart_upload(
        &self,
        req: OssRequest<AbortMultipartUploadInput>,
    ) -> Result<(), OssError> {
        let owner = self.requester(req.requester.as_deref());
        let input = req.input;
        let bucket = self.state.owned_bucket(&input.bucket, &owner.id)?;

        let removed = {
            let mut uploads = bucket.uploads.write();
            match uploads.get(&input.upload_id) {
                Some(upload) if upload.key == input.key => uploads.remove(&input.upload_id),
                _ => None,
            }
        };
        if removed.is_none() {
            return Err(OssServiceError::NoSuchUpload {
                upload_id: input.upload_id,
            }
            .into());
        }

        debug!(bucket = %bucket.name, upload_id = %input.upload_id, "abort_multipart_upload completed");
        Ok(())
    }
}
