//! HTTP request to operation input decoding.
//!
//! [`FromOssRequest`] builds a `rustoss-model` input from the request head,
//! the routed bucket and key, the decoded query and the body. XML bodies go
//! through `rustoss-xml`; anything unparseable surfaces as `MalformedXML`.

use std::collections::HashMap;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use rustoss_model::error::{OssError, OssErrorCode};
use rustoss_model::input::{
    AbortMultipartUploadInput, CompleteMultipartUploadInput, Conditions, CreateBucketInput,
    DeleteBucketInput, DeleteBucketLoggingInput, DeleteBucketWebsiteInput, DeleteObjectInput,
    DeleteObjectsInput, GetBucketLocationInput, GetBucketLoggingInput, GetBucketWebsiteInput,
    GetObjectInput, HeadObjectInput, InitiateMultipartUploadInput, ListBucketsInput,
    ListMultipartUploadsInput, ListObjectsInput, PutBucketLoggingInput, PutBucketWebsiteInput,
    PutObjectInput, UploadPartInput,
};
use rustoss_model::request::StreamingBlob;
use rustoss_model::types::EncodingType;
use rustoss_xml::{OssDeserialize, from_xml};

/// Prefix of user metadata headers.
pub const META_PREFIX: &str = "x-oss-meta-";

/// Builds an operation input from a routed HTTP request.
pub trait FromOssRequest: Sized {
    /// Decode the input.
    ///
    /// # Errors
    ///
    /// Returns an `OssError` when a required element is missing or a value
    /// cannot be parsed.
    fn from_oss_request(
        parts: &http::request::Parts,
        bucket: Option<&str>,
        key: Option<&str>,
        query_params: &[(String, String)],
        body: Bytes,
    ) -> Result<Self, OssError>;
}

// ---------------------------------------------------------------------------
// Extraction helpers
// ---------------------------------------------------------------------------

/// A header as a string; non-ASCII bytes are decoded as UTF-8.
#[must_use]
pub fn header_str(parts: &http::request::Parts, name: &str) -> Option<String> {
    parts
        .headers
        .get(name)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
}

/// A header parsed as an HTTP date. Unparseable dates are ignored.
#[must_use]
pub fn header_timestamp(parts: &http::request::Parts, name: &str) -> Option<DateTime<Utc>> {
    parse_http_date(parts.headers.get(name)?.to_str().ok()?)
}

fn parse_http_date(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(s, "%a, %d %b %Y %H:%M:%S GMT") {
        return Some(dt.and_utc());
    }
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// A query parameter by name.
#[must_use]
pub fn query_param(params: &[(String, String)], name: &str) -> Option<String> {
    params
        .iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.clone())
}

/// An integer query parameter; present but not an integer is `InvalidArgument`.
pub fn query_i64(params: &[(String, String)], name: &str) -> Result<Option<i64>, OssError> {
    query_param(params, name)
        .map(|v| {
            v.parse::<i64>().map_err(|_| {
                OssError::invalid_argument(format!("Argument {name} must be an integer."))
            })
        })
        .transpose()
}

/// Collect `x-oss-meta-*` headers, keyed by the lowercase suffix.
///
/// Values are decoded as UTF-8 so non-ASCII metadata survives.
#[must_use]
pub fn collect_metadata(parts: &http::request::Parts) -> HashMap<String, String> {
    parts
        .headers
        .iter()
        .filter_map(|(name, value)| {
            let meta_key = name.as_str().strip_prefix(META_PREFIX)?;
            let meta_value = String::from_utf8(value.as_bytes().to_vec()).ok()?;
            Some((meta_key.to_owned(), meta_value))
        })
        .collect()
}

fn encoding_type(params: &[(String, String)]) -> EncodingType {
    query_param(params, "encoding-type")
        .as_deref()
        .map(EncodingType::from)
        .unwrap_or_default()
}

fn conditions(parts: &http::request::Parts) -> Conditions {
    Conditions {
        if_match: header_str(parts, "if-match"),
        if_none_match: header_str(parts, "if-none-match"),
        if_modified_since: header_timestamp(parts, "if-modified-since"),
        if_unmodified_since: header_timestamp(parts, "if-unmodified-since"),
    }
}

fn require_bucket(bucket: Option<&str>) -> Result<String, OssError> {
    bucket
        .map(ToOwned::to_owned)
        .ok_or_else(|| OssError::invalid_request("Bucket name is required"))
}

fn require_key(key: Option<&str>) -> Result<String, OssError> {
    key.map(ToOwned::to_owned)
        .ok_or_else(|| OssError::invalid_request("Object key is required"))
}

fn require_upload_id(params: &[(String, String)]) -> Result<String, OssError> {
    query_param(params, "uploadId").ok_or_else(|| {
        OssError::with_message(OssErrorCode::MissingArgument, "uploadId is required")
    })
}

fn parse_xml_body<T: OssDeserialize>(body: &Bytes) -> Result<T, OssError> {
    from_xml(body).map_err(|e| OssError::malformed_xml(e.to_string()))
}

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// Inputs made of the bucket name alone.
macro_rules! impl_bucket_only_input {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl FromOssRequest for $ty {
                fn from_oss_request(
                    _parts: &http::request::Parts,
                    bucket: Option<&str>,
                    _key: Option<&str>,
                    _query_params: &[(String, String)],
                    _body: Bytes,
                ) -> Result<Self, OssError> {
                    Ok(Self {
                        bucket: require_bucket(bucket)?,
                    })
                }
            }
        )+
    };
}

impl_bucket_only_input!(
    DeleteBucketInput,
    GetBucketLocationInput,
    GetBucketLoggingInput,
    DeleteBucketLoggingInput,
    GetBucketWebsiteInput,
    DeleteBucketWebsiteInput,
);

impl FromOssRequest for ListBucketsInput {
    fn from_oss_request(
        _parts: &http::request::Parts,
        _bucket: Option<&str>,
        _key: Option<&str>,
        query_params: &[(String, String)],
        _body: Bytes,
    ) -> Result<Self, OssError> {
        Ok(Self {
            prefix: query_param(query_params, "prefix"),
            marker: query_param(query_params, "marker"),
            max_keys: query_i64(query_params, "max-keys")?,
        })
    }
}

impl FromOssRequest for CreateBucketInput {
    fn from_oss_request(
        parts: &http::request::Parts,
        bucket: Option<&str>,
        _key: Option<&str>,
        _query_params: &[(String, String)],
        body: Bytes,
    ) -> Result<Self, OssError> {
        let configuration = if body.is_empty() {
            None
        } else {
            Some(parse_xml_body(&body)?)
        };
        Ok(Self {
            bucket: require_bucket(bucket)?,
            acl: header_str(parts, "x-oss-acl"),
            configuration,
        })
    }
}

impl FromOssRequest for PutBucketLoggingInput {
    fn from_oss_request(
        _parts: &http::request::Parts,
        bucket: Option<&str>,
        _key: Option<&str>,
        _query_params: &[(String, String)],
        body: Bytes,
    ) -> Result<Self, OssError> {
        Ok(Self {
            bucket: require_bucket(bucket)?,
            status: parse_xml_body(&body)?,
        })
    }
}

impl FromOssRequest for PutBucketWebsiteInput {
    fn from_oss_request(
        _parts: &http::request::Parts,
        bucket: Option<&str>,
        _key: Option<&str>,
        _query_params: &[(String, String)],
        body: Bytes,
    ) -> Result<Self, OssError> {
        Ok(Self {
            bucket: require_bucket(bucket)?,
            configuration: parse_xml_body(&body)?,
        })
    }
}

impl FromOssRequest for PutObjectInput {
    fn from_oss_request(
        parts: &http::request::Parts,
        bucket: Option<&str>,
        key: Option<&str>,
        _query_params: &[(String, String)],
        body: Bytes,
    ) -> Result<Self, OssError> {
        Ok(Self {
            bucket: require_bucket(bucket)?,
            key: require_key(key)?,
            body: StreamingBlob::new(body),
            content_type: header_str(parts, "content-type"),
            content_md5: header_str(parts, "content-md5"),
            cache_control: header_str(parts, "cache-control"),
            content_disposition: header_str(parts, "content-disposition"),
            content_encoding: header_str(parts, "content-encoding"),
            expires: header_str(parts, "expires"),
            metadata: collect_metadata(parts),
        })
    }
}

impl FromOssRequest for GetObjectInput {
    fn from_oss_request(
        parts: &http::request::Parts,
        bucket: Option<&str>,
        key: Option<&str>,
        _query_params: &[(String, String)],
        _body: Bytes,
    ) -> Result<Self, OssError> {
        Ok(Self {
            bucket: require_bucket(bucket)?,
            key: require_key(key)?,
            range: header_str(parts, "range"),
            conditions: conditions(parts),
        })
    }
}

impl FromOssRequest for HeadObjectInput {
    fn from_oss_request(
        parts: &http::request::Parts,
        bucket: Option<&str>,
        key: Option<&str>,
        _query_params: &[(String, String)],
        _body: Bytes,
    ) -> Result<Self, OssError> {
        Ok(Self {
            bucket: require_bucket(bucket)?,
            key: require_key(key)?,
            conditions: conditions(parts),
        })
    }
}

impl FromOssRequest for DeleteObjectInput {
    fn from_oss_request(
        _parts: &http::request::Parts,
        bucket: Option<&str>,
        key: Option<&str>,
        _query_params: &[(String, String)],
        _body: Bytes,
    ) -> Result<Self, OssError> {
        Ok(Self {
            bucket: require_bucket(bucket)?,
            key: require_key(key)?,
        })
    }
}

impl FromOssRequest for DeleteObjectsInput {
    fn from_oss_request(
        _parts: &http::request::Parts,
        bucket: Option<&str>,
        _key: Option<&str>,
        query_params: &[(String, String)],
        body: Bytes,
    ) -> Result<Self, OssError> {
        Ok(Self {
            bucket: require_bucket(bucket)?,
            delete: parse_xml_body(&body)?,
            encoding_type: encoding_type(query_params),
        })
    }
}

impl FromOssRequest for ListObjectsInput {
    fn from_oss_request(
        _parts: &http::request::Parts,
        bucket: Option<&str>,
        _key: Option<&str>,
        query_params: &[(String, String)],
        _body: Bytes,
    ) -> Result<Self, OssError> {
        Ok(Self {
            bucket: require_bucket(bucket)?,
            prefix: query_param(query_params, "prefix"),
            marker: query_param(query_params, "marker"),
            delimiter: query_param(query_params, "delimiter"),
            max_keys: query_i64(query_params, "max-keys")?,
            encoding_type: encoding_type(query_params),
        })
    }
}

impl FromOssRequest for ListMultipartUploadsInput {
    fn from_oss_request(
        _parts: &http::request::Parts,
        bucket: Option<&str>,
        _key: Option<&str>,
        query_params: &[(String, String)],
        _body: Bytes,
    ) -> Result<Self, OssError> {
        Ok(Self {
            bucket: require_bucket(bucket)?,
            prefix: query_param(query_params, "prefix"),
            key_marker: query_param(query_params, "key-marker"),
            upload_id_marker: query_param(query_params, "upload-id-marker"),
            max_uploads: query_i64(query_params, "max-uploads")?,
            encoding_type: encoding_type(query_params),
        })
    }
}

impl FromOssRequest for InitiateMultipartUploadInput {
    fn from_oss_request(
        parts: &http::request::Parts,
        bucket: Option<&str>,
        key: Option<&str>,
        _query_params: &[(String, String)],
        _body: Bytes,
    ) -> Result<Self, OssError> {
        Ok(Self {
            bucket: require_bucket(bucket)?,
            key: require_key(key)?,
            content_type: header_str(parts, "content-type"),
            metadata: collect_metadata(parts),
        })
    }
}

impl FromOssRequest for UploadPartInput {
    fn from_oss_request(
        _parts: &http::request::Parts,
        bucket: Option<&str>,
        key: Option<&str>,
        query_params: &[(String, String)],
        body: Bytes,
    ) -> Result<Self, OssError> {
        let part_number = query_i64(query_params, "partNumber")?.ok_or_else(|| {
            OssError::with_message(OssErrorCode::MissingArgument, "partNumber is required")
        })?;
        Ok(Self {
            bucket: require_bucket(bucket)?,
            key: require_key(key)?,
            upload_id: require_upload_id(query_params)?,
            part_number,
            body: StreamingBlob::new(body),
        })
    }
}

impl FromOssRequest for CompleteMultipartUploadInput {
    fn from_oss_request(
        _parts: &http::request::Parts,
        bucket: Option<&str>,
        key: Option<&str>,
        query_params: &[(String, String)],
        body: Bytes,
    ) -> Result<Self, OssError> {
        Ok(Self {
            bucket: require_bucket(bucket)?,
            key: require_key(key)?,
            upload_id: require_upload_id(query_params)?,
            multipart_upload: parse_xml_body(&body)?,
        })
    }
}

impl FromOssRequest for AbortMultipartUploadInput {
    fn from_oss_request(
        _parts: &http::request::Parts,
        bucket: Option<&str>,
        key: Option<&str>,
        query_params: &[(String, String)],
        _body: Bytes,
    ) -> Result<Self, OssError> {
        Ok(Self {
            bucket: require_bucket(bucket)?,
            key: require_key(key)?,
            upload_id: require_upload_id(query_params)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use http::HeaderValue;

    use super::*;

    fn parts(headers: &[(&str, &[u8])]) -> http::request::Parts {
        let mut builder = http::Request::builder().method(http::Method::PUT).uri("/b/k");
        for (name, value) in headers {
            builder = builder.header(*name, HeaderValue::from_bytes(value).expect("header value"));
        }
        builder.body(()).expect("valid request").into_parts().0
    }

    fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn test_should_decode_put_object_headers() {
        let parts = parts(&[
            ("content-type", b"text/plain"),
            ("expires", b"not a date"),
            ("x-oss-meta-author", "张三".as_bytes()),
            ("x-oss-meta-Tag", b"v1"),
        ]);
        let input = PutObjectInput::from_oss_request(&parts, Some("b"), Some("k"), &[], Bytes::from_static(b"hi"))
            .expect("decode");
        assert_eq!(input.content_type.as_deref(), Some("text/plain"));
        assert_eq!(input.expires.as_deref(), Some("not a date"));
        assert_eq!(input.metadata.get("author").map(String::as_str), Some("张三"));
        assert_eq!(input.metadata.get("tag").map(String::as_str), Some("v1"));
        assert_eq!(input.body.len(), 2);
    }

    #[test]
    fn test_should_decode_conditional_headers() {
        let parts = parts(&[
            ("if-none-match", b"\"A\", \"B\""),
            ("if-modified-since", b"Thu, 01 Jan 2015 00:00:00 GMT"),
            ("if-unmodified-since", b"garbage"),
            ("range", b"bytes=0-9"),
        ]);
        let input = GetObjectInput::from_oss_request(&parts, Some("b"), Some("k"), &[], Bytes::new())
            .expect("decode");
        assert_eq!(input.range.as_deref(), Some("bytes=0-9"));
        assert_eq!(input.conditions.if_none_match.as_deref(), Some("\"A\", \"B\""));
        assert_eq!(
            input.conditions.if_modified_since.map(|t| t.timestamp()),
            Some(1_420_070_400)
        );
        assert!(input.conditions.if_unmodified_since.is_none());
    }

    #[test]
    fn test_should_reject_non_integer_max_keys() {
        let err = ListObjectsInput::from_oss_request(
            &parts(&[]),
            Some("b"),
            None,
            &params(&[("max-keys", "ten")]),
            Bytes::new(),
        )
        .expect_err("invalid");
        assert_eq!(err.code, OssErrorCode::InvalidArgument);
    }

    #[test]
    fn test_should_decode_list_uploads_query() {
        let input = ListMultipartUploadsInput::from_oss_request(
            &parts(&[]),
            Some("b"),
            None,
            &params(&[
                ("uploads", ""),
                ("key-marker", "k1"),
                ("upload-id-marker", "U1"),
                ("max-uploads", "2"),
                ("encoding-type", "url"),
            ]),
            Bytes::new(),
        )
        .expect("decode");
        assert_eq!(input.key_marker.as_deref(), Some("k1"));
        assert_eq!(input.upload_id_marker.as_deref(), Some("U1"));
        assert_eq!(input.max_uploads, Some(2));
        assert_eq!(input.encoding_type, EncodingType::Url);
    }

    #[test]
    fn test_should_treat_empty_create_body_as_no_configuration() {
        let input = CreateBucketInput::from_oss_request(&parts(&[]), Some("b"), None, &[], Bytes::new())
            .expect("decode");
        assert!(input.configuration.is_none());

        let body = Bytes::from_static(
            b"<CreateBucketConfiguration><LocationConstraint>oss-cn-hangzhou</LocationConstraint></CreateBucketConfiguration>",
        );
        let input = CreateBucketInput::from_oss_request(&parts(&[]), Some("b"), None, &[], body)
            .expect("decode");
        assert_eq!(
            input.configuration.and_then(|c| c.location_constraint).as_deref(),
            Some("oss-cn-hangzhou")
        );
    }

    #[test]
    fn test_should_reject_malformed_xml_body() {
        let err = PutBucketWebsiteInput::from_oss_request(
            &parts(&[]),
            Some("b"),
            None,
            &[],
            Bytes::from_static(b"<WebsiteConfiguration><IndexDocument>"),
        )
        .expect_err("malformed");
        assert_eq!(err.code, OssErrorCode::MalformedXML);
    }

    #[test]
    fn test_should_require_part_number_and_upload_id() {
        let err = UploadPartInput::from_oss_request(
            &parts(&[]),
            Some("b"),
            Some("k"),
            &params(&[("uploadId", "U")]),
            Bytes::new(),
        )
        .expect_err("missing part number");
        assert_eq!(err.code, OssErrorCode::MissingArgument);
    }
}
