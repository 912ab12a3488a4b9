//! Listing handlers: ListObjects and ListMultipartUploads.

use rustoss_model::OssRequest;
use rustoss_model::error::OssError;
use rustoss_model::input::{ListMultipartUploadsInput, ListObjectsInput};
use rustoss_model::output::{ListMultipartUploadsOutput, ListObjectsOutput};
use tracing::debug;

use crate::provider::RustOss;
use crate::utils::encode_key;
use crate::validation::{
    DEFAULT_MAX_KEYS, DEFAULT_MAX_UPLOADS, MAX_MAX_KEYS, resolve_page_size,
};

#[allow(clippy::unused_async)]
impl RustOss {
    /// List objects, one page at a time.
    pub async fn handle_list_objects(
        &self,
        req: OssRequest<ListObjectsInput>,
    ) -> Result<ListObjectsOutput, OssError> {
        let owner = self.requester(req.requester.as_deref());
        let input = req.input;
        let bucket = self.state.owned_bucket(&input.bucket, &owner.id)?;
        let max_keys = resolve_page_size("max-keys", input.max_keys, DEFAULT_MAX_KEYS, MAX_MAX_KEYS)?;

        let page = bucket.list_objects(
            input.prefix.as_deref().unwrap_or_default(),
            input.delimiter.as_deref().unwrap_or_default(),
            input.marker.as_deref().unwrap_or_default(),
            max_keys,
        );

        debug!(
            bucket = %bucket.name,
            objects = page.objects.len(),
            prefixes = page.common_prefixes.len(),
            is_truncated = page.is_truncated,
            "list_objects completed"
        );

        let encoding = input.encoding_type;
        let encode = |value: Option<String>| value.map(|v| encode_key(&v, encoding));
        Ok(ListObjectsOutput {
            bucket: bucket.name.clone(),
            prefix: encode(input.prefix),
            marker: encode(input.marker),
            delimiter: encode(input.delimiter),
            max_keys: i64::try_from(max_keys).unwrap_or(MAX_MAX_KEYS),
            is_truncated: page.is_truncated,
            next_marker: encode(page.next_marker),
            encoding_type: encoding,
            contents: page
                .objects
                .into_iter()
                .map(|mut summary| {
                    summary.key = encode_key(&summary.key, encoding);
                    summary
                })
                .collect(),
            common_prefixes: page
                .common_prefixes
                .iter()
                .map(|p| encode_key(p, encoding))
                .collect(),
        })
    }

    /// List in-progress multipart uploads.
    pub async fn handle_list_multipart_uploads(
        &self,
        req: OssRequest<ListMultipartUploadsInput>,
    ) -> Result<ListMultipartUploadsOutput, OssError> {
        let owner = self.requester(req.requester.as_deref());
        let input = req.input;
        let bucket = self.state.owned_bucket(&input.bucket, &owner.id)?;
        let max_uploads = resolve_page_size(
            "max-uploads",
            input.max_uploads,
            DEFAULT_MAX_UPLOADS,
            DEFAULT_MAX_UPLOADS,
        )?;

        let page = bucket.list_uploads(
            input.prefix.as_deref().unwrap_or_default(),
            input.key_marker.as_deref().unwrap_or_default(),
            input.upload_id_marker.as_deref().unwrap_or_default(),
            max_uploads,
        );

        debug!(
            bucket = %bucket.name,
            uploads = page.uploads.len(),
            is_truncated = page.is_truncated,
            "list_multipart_uploads completed"
        );

        let encoding = input.encoding_type;
        let encode = |value: Option<String>| value.map(|v| encode_key(&v, encoding));
        Ok(ListMultipartUploadsOutput {
            bucket: bucket.name.clone(),
            prefix: encode(input.prefix),
            key_marker: encode(input.key_marker),
            upload_id_marker: input.upload_id_marker,
            next_key_marker: encode(page.next_key_marker),
            next_upload_id_marker: page.next_upload_id_marker,
            max_uploads: i64::try_from(max_uploads).unwrap_or(DEFAULT_MAX_UPLOADS),
            is_truncated: page.is_truncated,
            encoding_type: encoding,
            uploads: page
                .uploads
                .into_iter()
                .map(|mut upload| {
                    upload.key = encode_key(&upload.key, encoding);
                    upload
                })
                .collect(),
        })
    }
}
