//! Object operations.

use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use bytes::Bytes;
use md5::{Digest, Md5};
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Method, Url};
use rustoss_auth::canonical::canonicalized_resource;
use rustoss_auth::presign;
use rustoss_model::output::{DeleteObjectsOutput, ListObjectsOutput};
use rustoss_model::types::{Delete, EncodingType};
use rustoss_xml::to_xml;
use tokio::io::AsyncWriteExt;

use super::{OssCall, OssClient, TRACING_TARGET, check_bucket, check_key, check_response, http_date, url_decode};
use crate::error::{ClientError, Result};
use crate::request::{DeleteObjectsRequest, GetObjectRequest, ListObjectsRequest, PresignedUrlRequest};
use crate::types::{DeleteObjectsResult, ObjectMetadata, OssObject};

/// Most keys a single delete-objects call accepts.
pub const MAX_DELETE_KEYS: usize = 1000;

impl OssClient {
    /// Upload an object and return its quoted ETag.
    ///
    /// Only the upload fields of `metadata` are sent.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for a bad name, key or header, or the
    /// service error (`NoSuchBucket`, `InvalidDigest`, ...).
    pub async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: impl Into<Bytes>,
        metadata: &ObjectMetadata,
    ) -> Result<String> {
        check_bucket(bucket)?;
        check_key(key)?;
        let mut headers = HeaderMap::new();
        metadata.write_headers(&mut headers)?;

        let response = self
            .send(
                OssCall::object(Method::PUT, bucket, key)
                    .headers(headers)
                    .body(body),
            )
            .await?;
        let etag = response
            .headers()
            .get(header::ETAG)
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
            .unwrap_or_default();
        tracing::debug!(target: TRACING_TARGET, bucket = %bucket, key = %key, etag = %etag, "put object");
        Ok(etag)
    }

    /// Download an object, honoring the range and conditions of `request`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for a bad range, `PreconditionFailed` or
    /// `NotModified` for unmet conditions, `InvalidRange` for `bytes=-0`, or
    /// `NoSuchKey`.
    pub async fn get_object(&self, request: &GetObjectRequest) -> Result<OssObject> {
        check_bucket(&request.bucket)?;
        check_key(&request.key)?;
        let headers = get_headers(request)?;
        let response = self
            .send(OssCall::object(Method::GET, &request.bucket, &request.key).headers(headers))
            .await?;
        let object = OssObject::new(request.bucket.clone(), request.key.clone(), response);
        tracing::debug!(
            target: TRACING_TARGET,
            bucket = %request.bucket,
            key = %request.key,
            content_length = object.metadata.content_length,
            partial = object.metadata.content_range.is_some(),
            "got object"
        );
        Ok(object)
    }

    /// Download an object into a file, replacing it, and return its metadata.
    ///
    /// # Errors
    ///
    /// As [`Self::get_object`], plus `Io` if the file cannot be written.
    pub async fn get_object_to_file(
        &self,
        request: &GetObjectRequest,
        path: impl AsRef<Path>,
    ) -> Result<ObjectMetadata> {
        let mut object = self.get_object(request).await?;
        let mut file = tokio::fs::File::create(path.as_ref()).await?;
        let mut written = 0u64;
        while let Some(chunk) = object.chunk().await? {
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;
        tracing::debug!(
            target: TRACING_TARGET,
            key = %request.key,
            path = %path.as_ref().display(),
            written,
            "saved object to file"
        );
        Ok(object.metadata)
    }

    /// Object headers without the body.
    ///
    /// # Errors
    ///
    /// Returns `NoSuchKey` (inferred from the status, HEAD has no body).
    pub async fn get_object_metadata(&self, bucket: &str, key: &str) -> Result<ObjectMetadata> {
        check_bucket(bucket)?;
        check_key(key)?;
        let response = self.send(OssCall::object(Method::HEAD, bucket, key)).await?;
        Ok(ObjectMetadata::from_headers(response.headers()))
    }

    /// Fetch an object through a presigned URL.
    ///
    /// `headers` may carry `Range` and conditional headers; they are not part
    /// of the signature.
    ///
    /// # Errors
    ///
    /// Returns `InvalidUrl` for an unparsable URL, `AccessDenied` once it has
    /// expired, or `SignatureDoesNotMatch` if it was altered.
    pub async fn get_object_by_url(&self, url: &str, headers: HeaderMap) -> Result<OssObject> {
        let url = Url::parse(url).map_err(|e| ClientError::InvalidUrl(format!("{url}: {e}")))?;
        let (bucket, key) = split_object_path(&url)?;

        tracing::debug!(target: TRACING_TARGET, bucket = %bucket, key = %key, "GET via presigned url");
        let response = self.inner.http.get(url).headers(headers).send().await?;
        let response = check_response(response).await?;
        Ok(OssObject::new(bucket, key, response))
    }

    /// Sign a URL that grants `request.method` on an object until
    /// `request.expiration`. Nothing is sent.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for a bad name, key or header.
    pub fn generate_presigned_url(&self, request: &PresignedUrlRequest) -> Result<Url> {
        check_bucket(&request.bucket)?;
        check_key(&request.key)?;

        let mut headers = HeaderMap::new();
        let metadata = ObjectMetadata {
            content_type: request.content_type.clone(),
            content_md5: request.content_md5.clone(),
            user_metadata: request.user_metadata.clone(),
            ..Default::default()
        };
        metadata.write_headers(&mut headers)?;

        let query: Vec<(String, String)> = request
            .query_parameters
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        let resource = canonicalized_resource(
            Some(&request.bucket),
            Some(&request.key),
            query.iter().map(|(k, v)| (k.as_str(), v.as_str())),
        );
        let config = self.config();
        let params = presign(
            &config.access_key_id,
            &config.access_key_secret,
            request.method.as_str(),
            &headers,
            request.expiration.timestamp(),
            &resource,
        );

        let mut url = self.url(Some(&request.bucket), Some(&request.key), &query);
        let signed = match url.query() {
            Some(existing) => format!("{existing}&{}", params.to_query()),
            None => params.to_query(),
        };
        url.set_query(Some(&signed));
        Ok(url)
    }

    /// Delete an object; deleting a missing key succeeds.
    ///
    /// # Errors
    ///
    /// Returns `NoSuchBucket` from the service.
    pub async fn delete_object(&self, bucket: &str, key: &str) -> Result<()> {
        check_bucket(bucket)?;
        check_key(key)?;
        self.send(OssCall::object(Method::DELETE, bucket, key)).await?;
        tracing::debug!(target: TRACING_TARGET, bucket = %bucket, key = %key, "deleted object");
        Ok(())
    }

    /// Delete up to 1000 objects in one call.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` without calling the service for zero or more
    /// than 1000 keys.
    pub async fn delete_objects(&self, request: &DeleteObjectsRequest) -> Result<DeleteObjectsResult> {
        check_bucket(&request.bucket)?;
        if request.keys.is_empty() || request.keys.len() > MAX_DELETE_KEYS {
            return Err(ClientError::invalid_argument(format!(
                "delete objects takes 1 to {MAX_DELETE_KEYS} keys, got {}",
                request.keys.len()
            )));
        }
        for key in &request.keys {
            check_key(key)?;
        }

        let body = to_xml(
            "Delete",
            &Delete {
                quiet: request.quiet,
                keys: request.keys.clone(),
            },
        )?;
        let mut headers = HeaderMap::new();
        headers.insert(
            header::HeaderName::from_static("content-md5"),
            HeaderValue::from_str(&BASE64.encode(Md5::digest(&body)))
                .map_err(|e| ClientError::invalid_argument(e.to_string()))?,
        );

        let call = OssCall::bucket(Method::POST, &request.bucket)
            .query("delete", "")
            .query_opt("encoding-type", request.encoding_type.as_param())
            .headers(headers)
            .body(body);
        let output: DeleteObjectsOutput = self.send_xml(call).await?;

        let deleted_objects = match output.encoding_type {
            EncodingType::Url => output.deleted.iter().map(|k| url_decode(k)).collect(),
            EncodingType::None => output.deleted,
        };
        tracing::debug!(
            target: TRACING_TARGET,
            bucket = %request.bucket,
            requested = request.keys.len(),
            deleted = deleted_objects.len(),
            "deleted objects"
        );
        Ok(DeleteObjectsResult { deleted_objects })
    }

    /// List objects; url-encoded keys in the response are decoded.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` from the service for `max_keys` outside
    /// 1..=1000, or `NoSuchBucket`.
    pub async fn list_objects(&self, request: &ListObjectsRequest) -> Result<ListObjectsOutput> {
        check_bucket(&request.bucket)?;
        let call = OssCall::bucket(Method::GET, &request.bucket)
            .query_opt("prefix", request.prefix.as_deref())
            .query_opt("marker", request.marker.as_deref())
            .query_opt("delimiter", request.delimiter.as_deref())
            .query_opt("max-keys", request.max_keys)
            .query_opt("encoding-type", request.encoding_type.as_param());
        let mut output: ListObjectsOutput = self.send_xml(call).await?;

        if output.encoding_type == EncodingType::Url {
            let decode = |value: &mut Option<String>| {
                if let Some(v) = value.as_mut() {
                    *v = url_decode(v);
                }
            };
            decode(&mut output.prefix);
            decode(&mut output.marker);
            decode(&mut output.delimiter);
            decode(&mut output.next_marker);
            for summary in &mut output.contents {
                summary.key = url_decode(&summary.key);
            }
            for prefix in &mut output.common_prefixes {
                *prefix = url_decode(prefix);
            }
        }
        tracing::debug!(
            target: TRACING_TARGET,
            bucket = %request.bucket,
            count = output.contents.len(),
            prefixes = output.common_prefixes.len(),
            truncated = output.is_truncated,
            "listed objects"
        );
        Ok(output)
    }
}

/// Range and conditional headers of a GET.
fn get_headers(request: &GetObjectRequest) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    let mut insert = |name: header::HeaderName, value: String| -> Result<()> {
        let value = HeaderValue::from_str(&value)
            .map_err(|_| ClientError::invalid_argument(format!("invalid {name} value {value:?}")))?;
        headers.insert(name, value);
        Ok(())
    };

    if let Some(range) = request.range_header()? {
        insert(header::RANGE, range)?;
    }
    if !request.matching_etags.is_empty() {
        insert(header::IF_MATCH, request.matching_etags.join(", "))?;
    }
    if !request.non_matching_etags.is_empty() {
        insert(header::IF_NONE_MATCH, request.non_matching_etags.join(", "))?;
    }
    if let Some(since) = &request.modified_since {
        insert(header::IF_MODIFIED_SINCE, http_date(since))?;
    }
    if let Some(since) = &request.unmodified_since {
        insert(header::IF_UNMODIFIED_SINCE, http_date(since))?;
    }
    Ok(headers)
}

/// Split a path-style object URL into its bucket and decoded key.
fn split_object_path(url: &Url) -> Result<(String, String)> {
    let path = url.path().trim_start_matches('/');
    match path.split_once('/') {
        Some((bucket, key)) if !bucket.is_empty() && !key.is_empty() => {
            Ok((bucket.to_owned(), url_decode(key)))
        }
        _ => Err(ClientError::InvalidUrl(format!("{url}: not an object url"))),
    }
}
