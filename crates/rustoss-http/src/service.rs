//! The OSS HTTP service implementing hyper's `Service` trait.
//!
//! [`OssHttpService`] ties together routing, authentication, dispatch and
//! error rendering:
//!
//! 1. Health check interception (`GET /_health`)
//! 2. Routing via [`OssRouter`]
//! 3. OSS V1 signature verification, unless disabled
//! 4. Request body collection, capped at `max_body_size`
//! 5. Dispatch to the [`OssHandler`]
//! 6. Common response headers (`x-oss-request-id`, `Server`)

use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use bytes::Bytes;
use http::header::HeaderValue;
use http_body_util::{BodyExt, LengthLimitError, Limited};
use hyper::body::Incoming;
use hyper::service::Service;
use rustoss_auth::canonical::canonicalized_resource;
use rustoss_auth::{AuthError, CredentialProvider};
use rustoss_model::error::{OssError, OssErrorCode};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::body::OssResponseBody;
use crate::dispatch::{OssHandler, dispatch_operation};
use crate::response::error_to_response;
use crate::router::{OssRouter, RoutingContext};

/// Default cap on request bodies: 5 GiB, the single PutObject limit.
pub const DEFAULT_MAX_BODY_SIZE: u64 = 5 * 1024 * 1024 * 1024;

/// Configuration for the OSS HTTP service.
#[derive(Clone)]
pub struct OssHttpConfig {
    /// The base domain for virtual-hosted-style requests (e.g. `oss.localhost`).
    pub domain: String,
    /// Whether `{bucket}.{domain}` hosts select the bucket.
    pub virtual_hosting: bool,
    /// Accept unsigned and wrongly signed requests.
    pub skip_signature_validation: bool,
    /// The region this endpoint serves.
    pub region: String,
    /// Largest request body in bytes.
    pub max_body_size: u64,
    /// Secrets used to verify signatures. Without a provider no request is
    /// verified.
    pub credential_provider: Option<Arc<dyn CredentialProvider>>,
}

impl std::fmt::Debug for OssHttpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OssHttpConfig")
            .field("domain", &self.domain)
            .field("virtual_hosting", &self.virtual_hosting)
            .field("skip_signature_validation", &self.skip_signature_validation)
            .field("region", &self.region)
            .field("max_body_size", &self.max_body_size)
            .field(
                "credential_provider",
                &self.credential_provider.as_ref().map(|_| "..."),
            )
            .finish()
    }
}

impl Default for OssHttpConfig {
    fn default() -> Self {
        Self {
            domain: "oss.localhost".to_owned(),
            virtual_hosting: true,
            skip_signature_validation: false,
            region: "oss-cn-hangzhou".to_owned(),
            max_body_size: DEFAULT_MAX_BODY_SIZE,
            credential_provider: None,
        }
    }
}

/// The OSS HTTP service.
///
/// `H` is the business logic behind the [`OssHandler`] seam.
#[derive(Debug)]
pub struct OssHttpService<H: OssHandler> {
    handler: Arc<H>,
    router: OssRouter,
    config: Arc<OssHttpConfig>,
}

impl<H: OssHandler> OssHttpService<H> {
    /// Create a service owning its handler.
    #[must_use]
    pub fn new(handler: H, config: OssHttpConfig) -> Self {
        Self::from_shared(Arc::new(handler), config)
    }

    /// Create a service around a shared handler.
    #[must_use]
    pub fn from_shared(handler: Arc<H>, config: OssHttpConfig) -> Self {
        let router = OssRouter::new(&config.domain, config.virtual_hosting);
        Self {
            handler,
            router,
            config: Arc::new(config),
        }
    }

    /// Run one request through the full pipeline.
    ///
    /// Any body type works, which lets tests drive the service without a
    /// socket.
    pub async fn handle<B>(&self, req: http::Request<B>) -> http::Response<OssResponseBody>
    where
        B: http_body::Body<Data = Bytes>,
        B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        let request_id = new_request_id();
        let response = process_request(
            req,
            self.handler.as_ref(),
            &self.router,
            &self.config,
            &request_id,
        )
        .await;
        add_common_headers(response, &request_id)
    }
}

impl<H: OssHandler> Clone for OssHttpService<H> {
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
            router: self.router.clone(),
            config: Arc::clone(&self.config),
        }
    }
}

impl<H: OssHandler> Service<http::Request<Incoming>> for OssHttpService<H> {
    type Response = http::Response<OssResponseBody>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, req: http::Request<Incoming>) -> Self::Future {
        let service = self.clone();
        Box::pin(async move { Ok(service.handle(req).await) })
    }
}

/// 24 uppercase hex characters, the shape of OSS request ids.
fn new_request_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(24);
    id.make_ascii_uppercase();
    id
}

async fn process_request<B, H>(
    req: http::Request<B>,
    handler: &H,
    router: &OssRouter,
    config: &OssHttpConfig,
    request_id: &str,
) -> http::Response<OssResponseBody>
where
    B: http_body::Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    H: OssHandler,
{
    let method = req.method().clone();
    let uri = req.uri().clone();
    let host_id = config.domain.as_str();
    debug!(%method, %uri, request_id, "processing OSS request");

    if is_health_check(&method, uri.path()) {
        return health_check_response();
    }

    let ctx = match router.resolve(&req) {
        Ok(ctx) => ctx,
        Err(err) => {
            warn!(%method, %uri, error = %err, request_id, "failed to route OSS request");
            return error_to_response(&err, request_id, host_id);
        }
    };

    info!(
        operation = %ctx.operation,
        bucket = ?ctx.bucket,
        key = ?ctx.key,
        request_id,
        "routed OSS request"
    );

    let (mut parts, incoming) = req.into_parts();

    if !config.skip_signature_validation {
        if let Some(provider) = config.credential_provider.as_deref() {
            match authenticate(&parts, &ctx, provider) {
                Ok(auth) => {
                    parts.extensions.insert(auth);
                }
                Err(err) => {
                    warn!(error = %err, request_id, "authentication failed");
                    return error_to_response(&err, request_id, host_id);
                }
            }
        }
    }

    if declared_length(&parts).is_some_and(|len| len > config.max_body_size) {
        warn!(request_id, limit = config.max_body_size, "declared request body too large");
        return error_to_response(&OssError::new(OssErrorCode::EntityTooLarge), request_id, host_id);
    }
    let limit = usize::try_from(config.max_body_size).unwrap_or(usize::MAX);
    let body = match Limited::new(incoming, limit).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(err) if err.downcast_ref::<LengthLimitError>().is_some() => {
            warn!(request_id, limit = config.max_body_size, "request body too large");
            let err = OssError::new(OssErrorCode::EntityTooLarge);
            return error_to_response(&err, request_id, host_id);
        }
        Err(err) => {
            error!(error = %err, request_id, "failed to collect request body");
            let err = OssError::internal_error("Failed to read request body");
            return error_to_response(&err, request_id, host_id);
        }
    };

    match dispatch_operation(handler, parts, body, ctx).await {
        Ok(response) => response,
        Err(err) => {
            debug!(error = %err, request_id, "OSS operation returned error");
            error_to_response(&err, request_id, host_id)
        }
    }
}

fn declared_length(parts: &http::request::Parts) -> Option<u64> {
    parts
        .headers
        .get(http::header::CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .parse()
        .ok()
}

fn authenticate(
    parts: &http::request::Parts,
    ctx: &RoutingContext,
    provider: &dyn CredentialProvider,
) -> Result<rustoss_auth::AuthResult, OssError> {
    let resource =
        canonicalized_resource(ctx.bucket.as_deref(), ctx.key.as_deref(), ctx.query_pairs());
    rustoss_auth::verify_request(parts, &resource, provider).map_err(auth_error_to_oss)
}

fn auth_error_to_oss(err: AuthError) -> OssError {
    match err {
        AuthError::AccessKeyNotFound(_) => OssError::new(OssErrorCode::InvalidAccessKeyId),
        AuthError::SignatureDoesNotMatch => OssError::new(OssErrorCode::SignatureDoesNotMatch),
        AuthError::RequestExpired => {
            OssError::with_message(OssErrorCode::AccessDenied, "Request has expired.")
        }
        AuthError::InvalidAuthHeader => OssError::invalid_argument("Authorization header is invalid."),
        AuthError::MissingAuthHeader => OssError::with_message(
            OssErrorCode::AccessDenied,
            "You have no right to access this object because of bucket acl.",
        ),
        AuthError::MissingQueryParam(param) => OssError::with_message(
            OssErrorCode::AccessDenied,
            format!("Missing query parameter {param}."),
        ),
    }
}

fn is_health_check(method: &http::Method, path: &str) -> bool {
    *method == http::Method::GET && (path == "/_health" || path == "/health")
}

fn health_check_response() -> http::Response<OssResponseBody> {
    let mut response = http::Response::new(OssResponseBody::from_bytes(Bytes::from_static(
        br#"{"status":"running","service":"oss"}"#,
    )));
    response.headers_mut().insert(
        http::header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    response
}

fn add_common_headers(
    mut response: http::Response<OssResponseBody>,
    request_id: &str,
) -> http::Response<OssResponseBody> {
    let headers = response.headers_mut();
    if let Ok(hv) = HeaderValue::from_str(request_id) {
        headers.insert("x-oss-request-id", hv);
    }
    headers.insert(http::header::SERVER, HeaderValue::from_static("RustOSS"));
    response
}
