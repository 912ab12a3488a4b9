//! Operation output to HTTP response encoding.
//!
//! Response shapes:
//! - **Header-only**: `PutObject` and `UploadPart` return the ETag header.
//! - **XML body**: listings, configuration getters and multipart results.
//! - **Object body**: `GetObject` returns the content with its stored headers;
//!   `HeadObject` returns the same headers without a body.
//! - **Empty**: the void operations, see [`empty_response`].

use std::collections::HashMap;

use http::StatusCode;
use http::header::HeaderValue;
use rustoss_model::error::{OssError, OssErrorCode};
use rustoss_model::output::{
    CompleteMultipartUploadOutput, CreateBucketOutput, DeleteObjectsOutput,
    GetBucketLocationOutput, GetBucketLoggingOutput, GetBucketWebsiteOutput, GetObjectOutput,
    HeadObjectOutput, InitiateMultipartUploadOutput, ListBucketsOutput,
    ListMultipartUploadsOutput, ListObjectsOutput, ObjectHeaders, PutObjectOutput,
    UploadPartOutput,
};
use rustoss_xml::{OssSerialize, error_to_xml, to_xml};

use crate::body::OssResponseBody;
use crate::request::META_PREFIX;

/// Converts an operation output into an HTTP response.
pub trait IntoOssResponse {
    /// Build the response.
    ///
    /// # Errors
    ///
    /// Returns `InternalError` if the body cannot be serialized or the
    /// response cannot be assembled.
    fn into_oss_response(self) -> Result<http::Response<OssResponseBody>, OssError>;
}

fn set_optional_header(
    builder: http::response::Builder,
    name: &str,
    value: Option<&str>,
) -> http::response::Builder {
    match value.and_then(|v| HeaderValue::from_str(v).ok()) {
        Some(hv) => builder.header(name, hv),
        None => builder,
    }
}

/// Metadata values may be non-ASCII, so they are written as raw UTF-8 bytes.
fn set_metadata_headers(
    mut builder: http::response::Builder,
    metadata: &HashMap<String, String>,
) -> http::response::Builder {
    for (key, value) in metadata {
        if let Ok(hv) = HeaderValue::from_bytes(value.as_bytes()) {
            builder = builder.header(format!("{META_PREFIX}{key}"), hv);
        }
    }
    builder
}

/// Format a timestamp as an RFC 1123 HTTP date.
#[must_use]
pub fn http_date(dt: &chrono::DateTime<chrono::Utc>) -> String {
    dt.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

fn build_response(
    builder: http::response::Builder,
    body: OssResponseBody,
) -> Result<http::Response<OssResponseBody>, OssError> {
    builder
        .body(body)
        .map_err(|e| OssError::internal_error(format!("failed to build HTTP response: {e}")))
}

fn xml_response<T: OssSerialize>(
    root: &str,
    value: &T,
) -> Result<http::Response<OssResponseBody>, OssError> {
    let document = to_xml(root, value)
        .map_err(|e| OssError::internal_error(format!("failed to serialize {root}: {e}")))?;
    let builder = http::Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", "application/xml");
    build_response(builder, OssResponseBody::xml(document))
}

/// An empty response for operations without output.
///
/// # Errors
///
/// Never fails for valid status codes; the `Result` keeps the dispatch
/// signature uniform.
pub fn empty_response(status: StatusCode) -> Result<http::Response<OssResponseBody>, OssError> {
    build_response(
        http::Response::builder().status(status),
        OssResponseBody::empty(),
    )
}

/// Outputs serialized as an XML document under a fixed root element.
macro_rules! impl_xml_body_response {
    ($($ty:ty => $root:literal),+ $(,)?) => {
        $(
            impl IntoOssResponse for $ty {
                fn into_oss_response(self) -> Result<http::Response<OssResponseBody>, OssError> {
                    xml_response($root, &self)
                }
            }
        )+
    };
}

impl_xml_body_response!(
    ListBucketsOutput => "ListAllMyBucketsResult",
    GetBucketLocationOutput => "LocationConstraint",
    GetBucketLoggingOutput => "BucketLoggingStatus",
    GetBucketWebsiteOutput => "WebsiteConfiguration",
    ListObjectsOutput => "ListBucketResult",
    ListMultipartUploadsOutput => "ListMultipartUploadsResult",
    InitiateMultipartUploadOutput => "InitiateMultipartUploadResult",
    DeleteObjectsOutput => "DeleteResult",
);

impl IntoOssResponse for CreateBucketOutput {
    fn into_oss_response(self) -> Result<http::Response<OssResponseBody>, OssError> {
        let builder = set_optional_header(
            http::Response::builder().status(StatusCode::OK),
            "Location",
            Some(&self.location),
        );
        build_response(builder, OssResponseBody::empty())
    }
}

impl IntoOssResponse for PutObjectOutput {
    fn into_oss_response(self) -> Result<http::Response<OssResponseBody>, OssError> {
        let builder = set_optional_header(
            http::Response::builder().status(StatusCode::OK),
            "ETag",
            Some(&self.etag),
        );
        build_response(builder, OssResponseBody::empty())
    }
}

impl IntoOssResponse for UploadPartOutput {
    fn into_oss_response(self) -> Result<http::Response<OssResponseBody>, OssError> {
        PutObjectOutput { etag: self.etag }.into_oss_response()
    }
}

impl IntoOssResponse for CompleteMultipartUploadOutput {
    fn into_oss_response(self) -> Result<http::Response<OssResponseBody>, OssError> {
        let mut response = xml_response("CompleteMultipartUploadResult", &self)?;
        if let Ok(hv) = HeaderValue::from_str(&self.etag) {
            response.headers_mut().insert(http::header::ETAG, hv);
        }
        Ok(response)
    }
}

fn object_headers(
    builder: http::response::Builder,
    headers: &ObjectHeaders,
) -> http::response::Builder {
    let builder = builder
        .header("Content-Length", headers.content_length)
        .header("Accept-Ranges", "bytes")
        .header("Last-Modified", http_date(&headers.last_modified));
    let builder = set_optional_header(builder, "Content-Type", Some(&headers.content_type));
    let builder = set_optional_header(builder, "ETag", Some(&headers.etag));
    let builder = set_optional_header(builder, "Cache-Control", headers.cache_control.as_deref());
    let builder = set_optional_header(
        builder,
        "Content-Disposition",
        headers.content_disposition.as_deref(),
    );
    let builder = set_optional_header(
        builder,
        "Content-Encoding",
        headers.content_encoding.as_deref(),
    );
    let builder = set_optional_header(builder, "Expires", headers.expires.as_deref());
    set_metadata_headers(builder, &headers.metadata)
}

impl IntoOssResponse for GetObjectOutput {
    fn into_oss_response(self) -> Result<http::Response<OssResponseBody>, OssError> {
        let status = if self.content_range.is_some() {
            StatusCode::PARTIAL_CONTENT
        } else {
            StatusCode::OK
        };
        let builder = object_headers(http::Response::builder().status(status), &self.headers);
        let builder = set_optional_header(builder, "Content-Range", self.content_range.as_deref());
        build_response(builder, OssResponseBody::from_bytes(self.body.data))
    }
}

impl IntoOssResponse for HeadObjectOutput {
    fn into_oss_response(self) -> Result<http::Response<OssResponseBody>, OssError> {
        let builder = object_headers(
            http::Response::builder().status(StatusCode::OK),
            &self.headers,
        );
        build_response(builder, OssResponseBody::empty())
    }
}

/// Convert an [`OssError`] into its HTTP response.
///
/// `NotModified` carries no body; every other error is an XML `Error`
/// document.
#[must_use]
pub fn error_to_response(
    err: &OssError,
    request_id: &str,
    host_id: &str,
) -> http::Response<OssResponseBody> {
    let builder = http::Response::builder().status(err.status_code);
    let result = if err.code == OssErrorCode::NotModified {
        builder.body(OssResponseBody::empty())
    } else {
        let xml = error_to_xml(
            err.code.as_str(),
            &err.message,
            err.resource.as_deref(),
            request_id,
            host_id,
        );
        builder
            .header("Content-Type", "application/xml")
            .body(OssResponseBody::xml(xml))
    };

    result.unwrap_or_else(|_| {
        let mut fallback = http::Response::new(OssResponseBody::empty());
        *fallback.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
        fallback
    })
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use http_body_util::BodyExt;
    use rustoss_model::request::StreamingBlob;
    use rustoss_model::types::{BucketLoggingStatus, LoggingEnabled};

    use super::*;

    fn header<'a>(resp: &'a http::Response<OssResponseBody>, name: &str) -> Option<&'a str> {
        resp.headers().get(name).and_then(|v| v.to_str().ok())
    }

    async fn body_string(resp: http::Response<OssResponseBody>) -> String {
        let bytes = resp.into_body().collect().await.expect("collect").to_bytes();
        String::from_utf8(bytes.to_vec()).expect("utf-8")
    }

    fn sample_headers() -> ObjectHeaders {
        ObjectHeaders {
            content_length: 3,
            content_type: "text/plain".to_owned(),
            etag: "\"900150983CD24FB0D6963F7D28E17F72\"".to_owned(),
            last_modified: chrono::Utc.with_ymd_and_hms(2015, 1, 1, 8, 0, 0).unwrap(),
            expires: Some("Thu, 01 Jan 2099 00:00:00 GMT".to_owned()),
            metadata: HashMap::from([("author".to_owned(), "张三".to_owned())]),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_should_build_partial_get_response() {
        let output = GetObjectOutput {
            headers: sample_headers(),
            content_range: Some("bytes 0-2/10".to_owned()),
            body: StreamingBlob::new("abc"),
        };
        let resp = output.into_oss_response().expect("response");
        assert_eq!(resp.status(), StatusCode::PARTIAL_CONTENT);
        assert_eq!(header(&resp, "Content-Range"), Some("bytes 0-2/10"));
        assert_eq!(header(&resp, "Content-Length"), Some("3"));
        assert_eq!(header(&resp, "Last-Modified"), Some("Thu, 01 Jan 2015 08:00:00 GMT"));
        assert_eq!(header(&resp, "Expires"), Some("Thu, 01 Jan 2099 00:00:00 GMT"));
        assert_eq!(
            resp.headers().get("x-oss-meta-author").map(HeaderValue::as_bytes),
            Some("张三".as_bytes())
        );
        assert_eq!(body_string(resp).await, "abc");
    }

    #[test]
    fn test_should_build_head_response_without_body() {
        let resp = HeadObjectOutput {
            headers: sample_headers(),
        }
        .into_oss_response()
        .expect("response");
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(header(&resp, "Content-Type"), Some("text/plain"));
        assert!(matches!(resp.body(), OssResponseBody::Empty));
    }

    #[tokio::test]
    async fn test_should_serialize_xml_outputs_under_root() {
        let output = GetBucketLoggingOutput {
            status: BucketLoggingStatus {
                logging_enabled: Some(LoggingEnabled {
                    target_bucket: "logs".to_owned(),
                    target_prefix: Some("access/".to_owned()),
                }),
            },
        };
        let resp = output.into_oss_response().expect("response");
        assert_eq!(header(&resp, "Content-Type"), Some("application/xml"));
        let body = body_string(resp).await;
        assert!(body.contains("<BucketLoggingStatus>"));
        assert!(body.contains("<TargetBucket>logs</TargetBucket>"));
    }

    #[test]
    fn test_should_set_etag_on_complete_multipart() {
        let resp = CompleteMultipartUploadOutput {
            location: "/b/k".to_owned(),
            bucket: "b".to_owned(),
            key: "k".to_owned(),
            etag: "\"ABC-2\"".to_owned(),
        }
        .into_oss_response()
        .expect("response");
        assert_eq!(header(&resp, "ETag"), Some("\"ABC-2\""));
    }

    #[tokio::test]
    async fn test_should_render_error_document() {
        let err = OssError::no_such_bucket("missing");
        let resp = error_to_response(&err, "REQ1", "oss.localhost");
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body = body_string(resp).await;
        assert!(body.contains("<Code>NoSuchBucket</Code>"));
        assert!(body.contains("<RequestId>REQ1</RequestId>"));
    }

    #[test]
    fn test_should_render_not_modified_without_body() {
        let resp = error_to_response(
            &OssError::new(OssErrorCode::NotModified),
            "REQ1",
            "oss.localhost",
        );
        assert_eq!(resp.status(), StatusCode::NOT_MODIFIED);
        assert!(matches!(resp.body(), OssResponseBody::Empty));
    }
}
