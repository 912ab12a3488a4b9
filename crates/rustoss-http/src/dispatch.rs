//! Operation dispatch: hands a routed request to the business logic.
//!
//! The server binary implements [`OssHandler`] on its provider wrapper; the
//! HTTP service only knows this trait.

use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;
use rustoss_model::OssOperation;
use rustoss_model::error::OssError;
use rustoss_model::oss_error;

use crate::body::OssResponseBody;
use crate::router::RoutingContext;

/// Boxed future returned by [`OssHandler::handle_operation`].
pub type HandlerFuture =
    Pin<Box<dyn Future<Output = Result<http::Response<OssResponseBody>, OssError>> + Send>>;

/// The boundary between the HTTP layer and the OSS provider.
///
/// The future is boxed so the service can hold the handler behind an `Arc`
/// without an `async-trait` dependency.
pub trait OssHandler: Send + Sync + 'static {
    /// Handle one routed operation and build its response.
    ///
    /// `parts.extensions` carries the verified
    /// [`AuthResult`](rustoss_auth::AuthResult) when the request was signed.
    fn handle_operation(
        &self,
        op: OssOperation,
        parts: http::request::Parts,
        body: Bytes,
        ctx: RoutingContext,
    ) -> HandlerFuture;
}

/// Dispatch a routed request to the handler.
pub async fn dispatch_operation<H: OssHandler>(
    handler: &H,
    parts: http::request::Parts,
    body: Bytes,
    ctx: RoutingContext,
) -> Result<http::Response<OssResponseBody>, OssError> {
    let op = ctx.operation;
    tracing::debug!(
        operation = %op,
        write = op.is_write(),
        bucket = ?ctx.bucket,
        key = ?ctx.key,
        "dispatching OSS operation"
    );
    handler.handle_operation(op, parts, body, ctx).await
}

/// A handler that rejects every operation with `NotImplemented`.
///
/// Used to exercise routing and authentication without a provider.
#[derive(Debug, Clone, Default)]
pub struct NotImplementedHandler;

impl OssHandler for NotImplementedHandler {
    fn handle_operation(
        &self,
        op: OssOperation,
        _parts: http::request::Parts,
        _body: Bytes,
        _ctx: RoutingContext,
    ) -> HandlerFuture {
        Box::pin(async move { Err(oss_error!(NotImplemented, op.as_str())) })
    }
}

#[cfg(test)]
mod tests {
    use rustoss_model::error::OssErrorCode;

    use super::*;

    #[tokio::test]
    async fn test_should_return_not_implemented_for_default_handler() {
        let (parts, ()) = http::Request::builder()
            .method(http::Method::GET)
            .uri("/mybucket?website")
            .body(())
            .expect("valid request")
            .into_parts();
        let ctx = RoutingContext {
            bucket: Some("mybucket".to_owned()),
            key: None,
            operation: OssOperation::GetBucketWebsite,
            query_params: vec![("website".to_owned(), String::new())],
        };

        let err = dispatch_operation(&NotImplementedHandler, parts, Bytes::new(), ctx)
            .await
            .expect_err("not implemented");
        assert_eq!(err.code, OssErrorCode::NotImplemented);
        assert_eq!(err.message, "GetBucketWebsite");
    }
}
