//! OSS request routing: virtual hosting resolution and operation identification.
//!
//! The [`OssRouter`] maps an HTTP request to an [`OssOperation`] from:
//!
//! - the HTTP method,
//! - whether a bucket and a key are present (from the `Host` header or the path),
//! - the sub-resource query keys `location`, `logging`, `website`, `delete`,
//!   `uploads`, `uploadId` and `partNumber`.
//!
//! The bucket comes either from `{bucket}.{domain}` in the `Host` header or
//! from the first path segment.

use http::Method;
use percent_encoding::percent_decode_str;
use rustoss_model::error::{OssError, OssErrorCode};
use rustoss_model::operations::OssOperation;

/// Resolves requests to OSS operations.
#[derive(Debug, Clone)]
pub struct OssRouter {
    /// The base domain for virtual-hosted-style requests (e.g. `oss.localhost`).
    pub domain: String,
    /// Whether `{bucket}.{domain}` hosts select the bucket.
    pub virtual_hosting: bool,
}

/// The result of routing one request.
#[derive(Debug, Clone)]
pub struct RoutingContext {
    /// The decoded bucket name, if any.
    pub bucket: Option<String>,
    /// The decoded object key, if any.
    pub key: Option<String>,
    /// The identified operation.
    pub operation: OssOperation,
    /// Decoded query parameters in request order.
    pub query_params: Vec<(String, String)>,
}

impl RoutingContext {
    /// Query parameters as borrowed pairs.
    pub fn query_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.query_params
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl OssRouter {
    /// Create a router for the given domain.
    #[must_use]
    pub fn new(domain: impl Into<String>, virtual_hosting: bool) -> Self {
        Self {
            domain: domain.into(),
            virtual_hosting,
        }
    }

    /// Resolve a request to a [`RoutingContext`].
    ///
    /// # Errors
    ///
    /// Returns `MethodNotAllowed` when the method makes no sense for the
    /// addressed resource.
    pub fn resolve<B>(&self, req: &http::Request<B>) -> Result<RoutingContext, OssError> {
        let uri = req.uri();
        let query_params = parse_query_params(uri.query().unwrap_or(""));

        let host_bucket = if self.virtual_hosting {
            bucket_from_host(req.headers(), &self.domain)
        } else {
            None
        };

        let path = uri.path();
        let (bucket, key) = match host_bucket {
            Some(bucket) => {
                let raw_key = path.strip_prefix('/').unwrap_or(path);
                let key = (!raw_key.is_empty()).then(|| decode_component(raw_key));
                (Some(bucket), key)
            }
            None => split_path(path),
        };

        let operation = identify_operation(req.method(), bucket.is_some(), key.is_some(), &query_params)?;

        Ok(RoutingContext {
            bucket,
            key,
            operation,
            query_params,
        })
    }
}

/// Bucket from a `{bucket}.{domain}[:port]` host.
fn bucket_from_host(headers: &http::HeaderMap, domain: &str) -> Option<String> {
    let host = headers.get(http::header::HOST)?.to_str().ok()?;
    let host = host.split(':').next().unwrap_or(host);
    let bucket = host.strip_suffix(domain)?.strip_suffix('.')?;
    (!bucket.is_empty()).then(|| bucket.to_owned())
}

/// Split `/{bucket}/{key...}`.
fn split_path(path: &str) -> (Option<String>, Option<String>) {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    if trimmed.is_empty() {
        return (None, None);
    }

    match trimmed.split_once('/') {
        Some((bucket, "")) => (Some(decode_component(bucket)), None),
        Some((bucket, key)) => (Some(decode_component(bucket)), Some(decode_component(key))),
        None => (Some(decode_component(trimmed)), None),
    }
}

fn decode_component(s: &str) -> String {
    percent_decode_str(s).decode_utf8_lossy().into_owned()
}

fn parse_query_params(query: &str) -> Vec<(String, String)> {
    query
        .split('&')
        .filter(|s| !s.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((k, v)) => (decode_component(k), decode_component(v)),
            None => (decode_component(pair), String::new()),
        })
        .collect()
}

fn has_param(params: &[(String, String)], key: &str) -> bool {
    params.iter().any(|(k, _)| k == key)
}

fn not_allowed(method: &Method) -> OssError {
    OssError::method_not_allowed(method.as_str())
}

fn identify_operation(
    method: &Method,
    has_bucket: bool,
    has_key: bool,
    params: &[(String, String)],
) -> Result<OssOperation, OssError> {
    match (has_bucket, has_key) {
        (false, false) if *method == Method::GET => Ok(OssOperation::ListBuckets),
        (false, _) => Err(OssError::with_message(
            OssErrorCode::MethodNotAllowed,
            "Only GET is allowed at the service level",
        )),
        (true, false) => identify_bucket_operation(method, params),
        (true, true) => identify_object_operation(method, params),
    }
}

fn identify_bucket_operation(
    method: &Method,
    params: &[(String, String)],
) -> Result<OssOperation, OssError> {
    let has = |key: &str| has_param(params, key);
    let op = match *method {
        Method::GET if has("location") => OssOperation::GetBucketLocation,
        Method::GET if has("logging") => OssOperation::GetBucketLogging,
        Method::GET if has("website") => OssOperation::GetBucketWebsite,
        Method::GET if has("uploads") => OssOperation::ListMultipartUploads,
        Method::GET => OssOperation::ListObjects,
        Method::PUT if has("logging") => OssOperation::PutBucketLogging,
        Method::PUT if has("website") => OssOperation::PutBucketWebsite,
        Method::PUT => OssOperation::CreateBucket,
        Method::DELETE if has("logging") => OssOperation::DeleteBucketLogging,
        Method::DELETE if has("website") => OssOperation::DeleteBucketWebsite,
        Method::DELETE => OssOperation::DeleteBucket,
        Method::POST if has("delete") => OssOperation::DeleteObjects,
        _ => return Err(not_allowed(method)),
    };
    Ok(op)
}

fn identify_object_operation(
    method: &Method,
    params: &[(String, String)],
) -> Result<OssOperation, OssError> {
    let has = |key: &str| has_param(params, key);
    let op = match *method {
        Method::GET => OssOperation::GetObject,
        Method::HEAD => OssOperation::HeadObject,
        Method::PUT if has("partNumber") && has("uploadId") => OssOperation::UploadPart,
        Method::PUT => OssOperation::PutObject,
        Method::DELETE if has("uploadId") => OssOperation::AbortMultipartUpload,
        Method::DELETE => OssOperation::DeleteObject,
        Method::POST if has("uploads") => OssOperation::InitiateMultipartUpload,
        Method::POST if has("uploadId") => OssOperation::CompleteMultipartUpload,
        _ => return Err(not_allowed(method)),
    };
    Ok(op)
}
