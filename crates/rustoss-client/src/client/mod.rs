//! The OSS client: request signing, sending and error mapping.

mod bucket;
mod multipart;
mod object;

pub use object::MAX_DELETE_KEYS;

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use percent_encoding::utf8_percent_encode;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Method, StatusCode, Url};
use rustoss_auth::canonical::{KEY_ENCODE_SET, QUERY_ENCODE_SET, canonicalized_resource};
use rustoss_auth::sign_request;
use rustoss_model::error::OssErrorCode;
use rustoss_model::validation::{check_bucket_name, check_object_key};
use rustoss_xml::{ErrorResponse, OssDeserialize, from_xml};

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};

/// Tracing target for client operations.
pub const TRACING_TARGET: &str = "rustoss_client";

const REQUEST_ID_HEADER: &str = "x-oss-request-id";

/// Inner client that holds the HTTP client and configuration.
struct OssClientInner {
    http: reqwest::Client,
    config: ClientConfig,
    endpoint: Url,
}

impl fmt::Debug for OssClientInner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OssClientInner")
            .field("config", &self.config)
            .field("endpoint", &self.endpoint.as_str())
            .finish_non_exhaustive()
    }
}

/// Client for an OSS-compatible object storage endpoint.
///
/// Requests use path-style addressing (`{endpoint}/{bucket}/{key}`) and are
/// signed with the configured access key. The client is cheap to clone and
/// safe to share across tasks.
///
/// # Examples
///
/// ```no_run
/// use rustoss_client::{ClientConfig, OssClient};
///
/// # async fn example() -> rustoss_client::Result<()> {
/// let config = ClientConfig::builder()
///     .endpoint("http://127.0.0.1:9090")
///     .access_key_id("rustoss")
///     .access_key_secret("rustoss")
///     .build();
/// let client = OssClient::new(config)?;
/// client.create_bucket("photos").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct OssClient {
    inner: Arc<OssClientInner>,
}

impl OssClient {
    /// Create a client.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for an invalid configuration, `InvalidUrl`
    /// for an unparsable endpoint, or `Http` if the HTTP client cannot be
    /// built.
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let endpoint = Url::parse(&config.endpoint)
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {e}", config.endpoint)))?;
        if endpoint.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(config.endpoint.clone()));
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        tracing::debug!(
            target: TRACING_TARGET,
            endpoint = %endpoint,
            timeout_ms = config.timeout.as_millis(),
            "created OSS client"
        );

        Ok(Self {
            inner: Arc::new(OssClientInner {
                http,
                config,
                endpoint,
            }),
        })
    }

    /// The configuration the client was built with.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Build the path-style URL of a bucket or object with an encoded query.
    fn url(&self, bucket: Option<&str>, key: Option<&str>, query: &[(String, String)]) -> Url {
        let mut url = self.inner.endpoint.clone();
        let path = match (bucket, key) {
            (Some(bucket), Some(key)) => {
                format!("/{bucket}/{}", utf8_percent_encode(key, KEY_ENCODE_SET))
            }
            (Some(bucket), None) => format!("/{bucket}"),
            _ => "/".to_owned(),
        };
        url.set_path(&path);
        url.set_query(encode_query(query).as_deref());
        url
    }

    /// Sign and send one call, mapping error responses to [`ClientError`].
    async fn send(&self, call: OssCall<'_>) -> Result<reqwest::Response> {
        let OssCall {
            method,
            bucket,
            key,
            query,
            mut headers,
            body,
        } = call;
        let url = self.url(bucket, key, &query);

        let date = http_date(&Utc::now());
        headers.insert(
            header::DATE,
            HeaderValue::from_str(&date).map_err(|_| ClientError::InvalidDate(date.clone()))?,
        );
        let resource = canonicalized_resource(
            bucket,
            key,
            query.iter().map(|(k, v)| (k.as_str(), v.as_str())),
        );
        let authorization = sign_request(
            &self.inner.config.access_key_id,
            &self.inner.config.access_key_secret,
            method.as_str(),
            &headers,
            &resource,
        );
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&authorization)
                .map_err(|_| ClientError::invalid_argument("access key id is not a valid header"))?,
        );

        tracing::debug!(
            target: TRACING_TARGET,
            method = %method,
            url = %url,
            body_len = body.len(),
            "sending OSS request"
        );

        let response = self
            .inner
            .http
            .request(method, url)
            .headers(headers)
            .body(body)
            .send()
            .await?;
        check_response(response).await
    }

    /// Send a call and decode its XML response body.
    async fn send_xml<T: OssDeserialize>(&self, call: OssCall<'_>) -> Result<T> {
        let response = self.send(call).await?;
        let body = response.bytes().await?;
        Ok(from_xml(&body)?)
    }
}

/// One signed request.
struct OssCall<'a> {
    method: Method,
    bucket: Option<&'a str>,
    key: Option<&'a str>,
    query: Vec<(String, String)>,
    headers: HeaderMap,
    body: Bytes,
}

impl<'a> OssCall<'a> {
    fn service(method: Method) -> Self {
        Self {
            method,
            bucket: None,
            key: None,
            query: Vec::new(),
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    fn bucket(method: Method, bucket: &'a str) -> Self {
        Self {
            bucket: Some(bucket),
            ..Self::service(method)
        }
    }

    fn object(method: Method, bucket: &'a str, key: &'a str) -> Self {
        Self {
            bucket: Some(bucket),
            key: Some(key),
            ..Self::service(method)
        }
    }

    /// Add a query parameter; an empty value is sent as a bare name.
    fn query(mut self, name: &str, value: impl ToString) -> Self {
        self.query.push((name.to_owned(), value.to_string()));
        self
    }

    fn query_opt<T: ToString>(self, name: &str, value: Option<T>) -> Self {
        match value {
            Some(value) => self.query(name, value),
            None => self,
        }
    }

    fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers.extend(headers);
        self
    }

    fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }
}

/// Encode query pairs, `None` when there are none.
fn encode_query(query: &[(String, String)]) -> Option<String> {
    if query.is_empty() {
        return None;
    }
    let encoded = query
        .iter()
        .map(|(k, v)| {
            let name = utf8_percent_encode(k, QUERY_ENCODE_SET);
            if v.is_empty() {
                name.to_string()
            } else {
                format!("{name}={}", utf8_percent_encode(v, QUERY_ENCODE_SET))
            }
        })
        .collect::<Vec<_>>()
        .join("&");
    Some(encoded)
}

/// Format a timestamp as an RFC 1123 HTTP date.
pub(crate) fn http_date(dt: &DateTime<Utc>) -> String {
    dt.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Turn a non-success response into a [`ClientError::Service`].
async fn check_response(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let request_id = response
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(ToOwned::to_owned);

    if status == StatusCode::NOT_MODIFIED {
        return Err(ClientError::Service {
            code: OssErrorCode::NotModified.as_str().to_owned(),
            message: "Not Modified".to_owned(),
            request_id,
            host_id: None,
            status,
        });
    }

    let body = response.bytes().await?;
    let err = match ErrorResponse::from_xml(&body) {
        Ok(doc) if !doc.code.is_empty() => ClientError::Service {
            code: doc.code,
            message: doc.message,
            request_id: non_empty(doc.request_id).or(request_id),
            host_id: non_empty(doc.host_id),
            status,
        },
        _ => status_error(status, request_id),
    };
    tracing::debug!(target: TRACING_TARGET, status = %status, error = %err, "OSS request failed");
    Err(err)
}

/// Error for a response without an error document, such as a failed HEAD.
fn status_error(status: StatusCode, request_id: Option<String>) -> ClientError {
    let code = match status {
        StatusCode::NOT_FOUND => Some(OssErrorCode::NoSuchKey),
        StatusCode::FORBIDDEN => Some(OssErrorCode::AccessDenied),
        StatusCode::PRECONDITION_FAILED => Some(OssErrorCode::PreconditionFailed),
        StatusCode::RANGE_NOT_SATISFIABLE => Some(OssErrorCode::InvalidRange),
        s if s.is_server_error() => Some(OssErrorCode::InternalError),
        _ => None,
    };
    let (code, message) = match code {
        Some(code) => (code.as_str().to_owned(), code.default_message().to_owned()),
        None => (
            "UnknownError".to_owned(),
            status.canonical_reason().unwrap_or("Unknown").to_owned(),
        ),
    };
    ClientError::Service {
        code,
        message,
        request_id,
        host_id: None,
        status,
    }
}

fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

fn check_bucket(bucket: &str) -> Result<()> {
    check_bucket_name(bucket)
        .map_err(|reason| ClientError::invalid_argument(format!("invalid bucket name {bucket:?}: {reason}")))
}

fn check_key(key: &str) -> Result<()> {
    check_object_key(key)
        .map_err(|reason| ClientError::invalid_argument(format!("invalid object key {key:?}: {reason}")))
}

fn check_upload_id(upload_id: &str) -> Result<()> {
    if upload_id.is_empty() {
        return Err(ClientError::invalid_argument("upload id must not be empty"));
    }
    Ok(())
}

/// Percent-decode a value returned with `encoding-type=url`.
fn url_decode(value: &str) -> String {
    percent_encoding::percent_decode_str(value)
        .decode_utf8_lossy()
        .into_owned()
}
