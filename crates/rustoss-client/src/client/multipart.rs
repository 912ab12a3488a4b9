//! Multipart upload operations.

use bytes::Bytes;
use reqwest::Method;
use reqwest::header;
use rustoss_model::output::{
    CompleteMultipartUploadOutput, InitiateMultipartUploadOutput, ListMultipartUploadsOutput,
};
use rustoss_model::types::{CompletedMultipartUpload, CompletedPart, EncodingType};
use rustoss_xml::to_xml;

use super::{OssCall, OssClient, TRACING_TARGET, check_bucket, check_key, check_upload_id, url_decode};
use crate::error::Result;
use crate::request::{CompleteMultipartUploadRequest, ListMultipartUploadsRequest};
use crate::types::{CompleteMultipartUploadResult, InitiateMultipartUploadResult};

impl OssClient {
    /// Start a multipart upload.
    ///
    /// # Errors
    ///
    /// Returns `NoSuchBucket` from the service.
    pub async fn initiate_multipart_upload(
        &self,
        bucket: &str,
        key: &str,
    ) -> Result<InitiateMultipartUploadResult> {
        check_bucket(bucket)?;
        check_key(key)?;
        let output: InitiateMultipartUploadOutput = self
            .send_xml(OssCall::object(Method::POST, bucket, key).query("uploads", ""))
            .await?;
        tracing::debug!(
            target: TRACING_TARGET,
            bucket = %bucket,
            key = %key,
            upload_id = %output.upload_id,
            "initiated multipart upload"
        );
        Ok(InitiateMultipartUploadResult {
            bucket: output.bucket,
            key: output.key,
            upload_id: output.upload_id,
        })
    }

    /// Upload one part; re-uploading a part number replaces it.
    ///
    /// Returns the part number with its ETag, ready for completion.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for an empty upload id, or `NoSuchUpload`.
    pub async fn upload_part(
        &self,
        bucket: &str,
        key: &str,
        upload_id: &str,
        part_number: u32,
        body: impl Into<Bytes>,
    ) -> Result<CompletedPart> {
        check_bucket(bucket)?;
        check_key(key)?;
        check_upload_id(upload_id)?;
        let response = self
            .send(
                OssCall::object(Method::PUT, bucket, key)
                    .query("partNumber", part_number)
                    .query("uploadId", upload_id)
                    .body(body),
            )
            .await?;
        let etag = response
            .headers()
            .get(header::ETAG)
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
            .unwrap_or_default();
        Ok(CompletedPart { part_number, etag })
    }

    /// Assemble the listed parts into the final object.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for an empty upload id, or `NoSuchUpload`,
    /// `InvalidPart` and `InvalidPartOrder` from the service.
    pub async fn complete_multipart_upload(
        &self,
        request: &CompleteMultipartUploadRequest,
    ) -> Result<CompleteMultipartUploadResult> {
        check_bucket(&request.bucket)?;
        check_key(&request.key)?;
        check_upload_id(&request.upload_id)?;
        let body = to_xml(
            "CompleteMultipartUpload",
            &CompletedMultipartUpload {
                parts: request.parts.clone(),
            },
        )?;
        let output: CompleteMultipartUploadOutput = self
            .send_xml(
                OssCall::object(Method::POST, &request.bucket, &request.key)
                    .query("uploadId", &request.upload_id)
                    .body(body),
            )
            .await?;
        tracing::debug!(
            target: TRACING_TARGET,
            bucket = %request.bucket,
            key = %request.key,
            parts = request.parts.len(),
            etag = %output.etag,
            "completed multipart upload"
        );
        Ok(CompleteMultipartUploadResult {
            bucket: output.bucket,
            key: output.key,
            location: output.location,
            etag: output.etag,
        })
    }

    /// Discard an upload and its parts.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for an empty upload id, or `NoSuchUpload`.
    pub async fn abort_multipart_upload(&self, bucket: &str, key: &str, upload_id: &str) -> Result<()> {
        check_bucket(bucket)?;
        check_key(key)?;
        check_upload_id(upload_id)?;
        self.send(OssCall::object(Method::DELETE, bucket, key).query("uploadId", upload_id))
            .await?;
        tracing::debug!(target: TRACING_TARGET, key = %key, upload_id = %upload_id, "aborted multipart upload");
        Ok(())
    }

    /// List in-progress uploads ordered by key and upload id.
    ///
    /// # Errors
    ///
    /// Returns `NoSuchBucket` from the service.
    pub async fn list_multipart_uploads(
        &self,
        request: &ListMultipartUploadsRequest,
    ) -> Result<ListMultipartUploadsOutput> {
        check_bucket(&request.bucket)?;
        let call = OssCall::bucket(Method::GET, &request.bucket)
            .query("uploads", "")
            .query_opt("prefix", request.prefix.as_deref())
            .query_opt("key-marker", request.key_marker.as_deref())
            .query_opt("upload-id-marker", request.upload_id_marker.as_deref())
            .query_opt("max-uploads", request.max_uploads)
            .query_opt("encoding-type", request.encoding_type.as_param());
        let mut output: ListMultipartUploadsOutput = self.send_xml(call).await?;

        if output.encoding_type == EncodingType::Url {
            for value in [
                &mut output.prefix,
                &mut output.key_marker,
                &mut output.next_key_marker,
            ]
            .into_iter()
            .flatten()
            {
                *value = url_decode(value);
            }
            for upload in &mut output.uploads {
                upload.key = url_decode(&upload.key);
            }
        }
        tracing::debug!(
            target: TRACING_TARGET,
            bucket = %request.bucket,
            count = output.uploads.len(),
            truncated = output.is_truncated,
            "listed multipart uploads"
        );
        Ok(output)
    }
}
