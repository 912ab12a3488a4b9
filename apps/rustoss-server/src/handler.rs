//! [`OssHandler`] implementation for [`RustOss`].
//!
//! Bridges `rustoss-http` and `rustoss-core`: each operation decodes its
//! input with [`FromOssRequest`], calls the matching `handle_*` method and
//! encodes the output with [`IntoOssResponse`].

use std::future::Future;

use bytes::Bytes;
use http::StatusCode;
use rustoss_auth::AuthResult;
use rustoss_core::RustOss;
use rustoss_http::body::OssResponseBody;
use rustoss_http::dispatch::{HandlerFuture, OssHandler};
use rustoss_http::request::FromOssRequest;
use rustoss_http::response::{IntoOssResponse, empty_response};
use rustoss_http::router::RoutingContext;
use rustoss_model::error::OssError;
use rustoss_model::{OssOperation, OssRequest};

/// Delegates every routed operation to a [`RustOss`] provider.
#[derive(Debug, Clone)]
pub struct RustOssHandler(pub RustOss);

impl OssHandler for RustOssHandler {
    // One delegation per operation.
    #[allow(clippy::too_many_lines)]
    fn handle_operation(
        &self,
        op: OssOperation,
        parts: http::request::Parts,
        body: Bytes,
        ctx: RoutingContext,
    ) -> HandlerFuture {
        let provider = self.0.clone();
        Box::pin(async move {
            let call = Call {
                parts: &parts,
                ctx: &ctx,
                body,
            };

            match op {
                // Service and buckets
                OssOperation::ListBuckets => {
                    call.output(|req| provider.handle_list_buckets(req)).await
                }
                OssOperation::CreateBucket => {
                    call.output(|req| provider.handle_create_bucket(req)).await
                }
                OssOperation::DeleteBucket => {
                    call.void(StatusCode::NO_CONTENT, |req| provider.handle_delete_bucket(req))
                        .await
                }
                OssOperation::GetBucketLocation => {
                    call.output(|req| provider.handle_get_bucket_location(req))
                        .await
                }

                // Logging
                OssOperation::PutBucketLogging => {
                    call.void(StatusCode::OK, |req| provider.handle_put_bucket_logging(req))
                        .await
                }
                OssOperation::GetBucketLogging => {
                    call.output(|req| provider.handle_get_bucket_logging(req))
                        .await
                }
                OssOperation::DeleteBucketLogging => {
                    call.void(StatusCode::NO_CONTENT, |req| {
                        provider.handle_delete_bucket_logging(req)
                    })
                    .await
                }

                // Website
                OssOperation::PutBucketWebsite => {
                    call.void(StatusCode::OK, |req| provider.handle_put_bucket_website(req))
                        .await
                }
                OssOperation::GetBucketWebsite => {
                    call.output(|req| provider.handle_get_bucket_website(req))
                        .await
                }
                OssOperation::DeleteBucketWebsite => {
                    call.void(StatusCode::NO_CONTENT, |req| {
                        provider.handle_delete_bucket_website(req)
                    })
                    .await
                }

                // Objects
                OssOperation::PutObject => {
                    call.output(|req| provider.handle_put_object(req)).await
                }
                OssOperation::GetObject => {
                    call.output(|req| provider.handle_get_object(req)).await
                }
                OssOperation::HeadObject => {
                    call.output(|req| provider.handle_head_object(req)).await
                }
                OssOperation::DeleteObject => {
                    call.void(StatusCode::NO_CONTENT, |req| provider.handle_delete_object(req))
                        .await
                }
                OssOperation::DeleteObjects => {
                    call.output(|req| provider.handle_delete_objects(req)).await
                }
                OssOperation::ListObjects => {
                    call.output(|req| provider.handle_list_objects(req)).await
                }

                // Multipart
                OssOperation::InitiateMultipartUpload => {
                    call.output(|req| provider.handle_initiate_multipart_upload(req))
                        .await
                }
                OssOperation::UploadPart => {
                    call.output(|req| provider.handle_upload_part(req)).await
                }
                OssOperation::CompleteMultipartUpload => {
                    call.output(|req| provider.handle_complete_multipart_upload(req))
                        .await
                }
                OssOperation::AbortMultipartUpload => {
                    call.void(StatusCode::NO_CONTENT, |req| {
                        provider.handle_abort_multipart_upload(req)
                    })
                    .await
                }
                OssOperation::ListMultipartUploads => {
                    call.output(|req| provider.handle_list_multipart_uploads(req))
                        .await
                }
            }
        })
    }
}

/// The decoded pieces of one routed request.
struct Call<'a> {
    parts: &'a http::request::Parts,
    ctx: &'a RoutingContext,
    body: Bytes,
}

impl Call<'_> {
    /// Wrap the decoded input with the verified caller and the request headers.
    fn request<I: FromOssRequest>(self) -> Result<OssRequest<I>, OssError> {
        let input = I::from_oss_request(
            self.parts,
            self.ctx.bucket.as_deref(),
            self.ctx.key.as_deref(),
            &self.ctx.query_params,
            self.body,
        )?;
        Ok(OssRequest {
            input,
            requester: self
                .parts
                .extensions
                .get::<AuthResult>()
                .map(|auth| auth.access_key_id.clone()),
            headers: self.parts.headers.clone(),
        })
    }

    async fn output<I, O, F, Fut>(
        self,
        handler_fn: F,
    ) -> Result<http::Response<OssResponseBody>, OssError>
    where
        I: FromOssRequest,
        O: IntoOssResponse,
        F: FnOnce(OssRequest<I>) -> Fut,
        Fut: Future<Output = Result<O, OssError>>,
    {
        let req = self.request()?;
        handler_fn(req).await?.into_oss_response()
    }

    async fn void<I, F, Fut>(
        self,
        status: StatusCode,
        handler_fn: F,
    ) -> Result<http::Response<OssResponseBody>, OssError>
    where
        I: FromOssRequest,
        F: FnOnce(OssRequest<I>) -> Fut,
        Fut: Future<Output = Result<(), OssError>>,
    {
        let req = self.request()?;
        handler_fn(req).await?;
        empty_response(status)
    }
}

#[cfg(test)]
mod tests {
    use rustoss_auth::AuthMethod;
    use rustoss_core::OssConfig;
    use rustoss_model::error::OssErrorCode;

    use super::*;

    fn routed(method: http::Method, uri: &str, op: OssOperation, bucket: &str, key: Option<&str>) -> (http::request::Parts, RoutingContext) {
        let (mut parts, ()) = http::Request::builder()
            .method(method)
            .uri(uri)
            .body(())
            .expect("valid request")
            .into_parts();
        parts.extensions.insert(AuthResult {
            access_key_id: "alice".to_owned(),
            method: AuthMethod::Header,
        });
        let ctx = RoutingContext {
            bucket: Some(bucket.to_owned()),
            key: key.map(ToOwned::to_owned),
            operation: op,
            query_params: Vec::new(),
        };
        (parts, ctx)
    }

    #[tokio::test]
    async fn test_should_create_bucket_as_verified_caller() {
        let handler = RustOssHandler(RustOss::new(OssConfig::default()));
        let (parts, ctx) = routed(http::Method::PUT, "/photos", OssOperation::CreateBucket, "photos", None);
        let resp = handler
            .handle_operation(OssOperation::CreateBucket, parts, Bytes::new(), ctx)
            .await
            .expect("create");
        assert_eq!(resp.status(), StatusCode::OK);

        let bucket = handler.0.state().get_bucket("photos").expect("bucket");
        assert_eq!(bucket.owner.id, "alice");
    }

    #[tokio::test]
    async fn test_should_answer_no_content_for_deletes() {
        let handler = RustOssHandler(RustOss::new(OssConfig::default()));
        let (parts, ctx) = routed(http::Method::PUT, "/photos", OssOperation::CreateBucket, "photos", None);
        handler
            .handle_operation(OssOperation::CreateBucket, parts, Bytes::new(), ctx)
            .await
            .expect("create");

        let (parts, ctx) = routed(http::Method::DELETE, "/photos", OssOperation::DeleteBucket, "photos", None);
        let resp = handler
            .handle_operation(OssOperation::DeleteBucket, parts, Bytes::new(), ctx)
            .await
            .expect("delete");
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);

        let (parts, ctx) = routed(http::Method::GET, "/photos/a", OssOperation::GetObject, "photos", Some("a"));
        let err = handler
            .handle_operation(OssOperation::GetObject, parts, Bytes::new(), ctx)
            .await
            .expect_err("bucket gone");
        assert_eq!(err.code, OssErrorCode::NoSuchBucket);
    }
}
