//! Bucket logging and website configuration integration tests.

#[cfg(test)]
mod tests {
    use rustoss_client::{
        BucketLoggingResult, ClientError, OssErrorCode, SetBucketLoggingRequest,
        SetBucketWebsiteRequest,
    };

    use crate::{TestServer, test_bucket_name};

    #[tokio::test]
    async fn test_should_round_trip_bucket_logging() {
        let server = TestServer::start().await;
        let source = server.create_bucket("logsrc").await;
        let target = server.create_bucket("logdst").await;

        let logging = server.client.get_bucket_logging(&source).await.expect("get");
        assert_eq!(logging, BucketLoggingResult::default());

        server
            .client
            .set_bucket_logging(
                &SetBucketLoggingRequest::new(&source)
                    .with_target_bucket(&target)
                    .with_target_prefix("access/"),
            )
            .await
            .expect("set");
        let logging = server.client.get_bucket_logging(&source).await.expect("get");
        assert_eq!(logging.target_bucket.as_deref(), Some(target.as_str()));
        assert_eq!(logging.target_prefix.as_deref(), Some("access/"));

        // A null target turns logging off.
        server
            .client
            .set_bucket_logging(&SetBucketLoggingRequest::new(&source))
            .await
            .expect("clear");
        let logging = server.client.get_bucket_logging(&source).await.expect("get");
        assert_eq!(logging.target_bucket, None);
        assert_eq!(logging.target_prefix, None);
    }

    #[tokio::test]
    async fn test_should_store_missing_prefix_as_empty() {
        let server = TestServer::start().await;
        let bucket = server.create_bucket("logself").await;

        // Logging into the bucket itself is allowed.
        server
            .client
            .set_bucket_logging(&SetBucketLoggingRequest::new(&bucket).with_target_bucket(&bucket))
            .await
            .expect("set");
        let logging = server.client.get_bucket_logging(&bucket).await.expect("get");
        assert_eq!(logging.target_bucket.as_deref(), Some(bucket.as_str()));
        assert_eq!(logging.target_prefix.as_deref(), Some(""));

        server.client.delete_bucket_logging(&bucket).await.expect("delete");
        let logging = server.client.get_bucket_logging(&bucket).await.expect("get");
        assert_eq!(logging, BucketLoggingResult::default());
    }

    #[tokio::test]
    async fn test_should_reject_invalid_logging_targets() {
        let server = TestServer::start().await;
        let source = server.create_bucket("logbad").await;

        let missing = SetBucketLoggingRequest::new(&source).with_target_bucket(test_bucket_name("gone"));
        let err = server.client.set_bucket_logging(&missing).await.expect_err("missing target");
        assert_eq!(err.code(), Some(OssErrorCode::InvalidTargetBucketForLogging));

        let foreign = SetBucketLoggingRequest::new(&source).with_target_bucket("oss");
        let err = server.client.set_bucket_logging(&foreign).await.expect_err("foreign target");
        assert_eq!(err.code(), Some(OssErrorCode::InvalidTargetBucketForLogging));

        let missing_source = SetBucketLoggingRequest::new(test_bucket_name("nosrc")).with_target_bucket(&source);
        let err = server.client.set_bucket_logging(&missing_source).await.expect_err("missing source");
        assert_eq!(err.code(), Some(OssErrorCode::NoSuchBucket));

        let err = server.client.get_bucket_logging("oss").await.expect_err("foreign source");
        assert_eq!(err.code(), Some(OssErrorCode::AccessDenied));
    }

    #[tokio::test]
    async fn test_should_reject_logging_target_in_another_region() {
        let hangzhou = TestServer::start().await;
        let shanghai = TestServer::sharing_with(&hangzhou, "oss-cn-shanghai").await;

        let source = hangzhou.create_bucket("logeast").await;
        let target = shanghai.create_bucket("logwest").await;
        assert_eq!(
            hangzhou.client.get_bucket_location(&target).await.expect("location"),
            "oss-cn-shanghai"
        );

        let request = SetBucketLoggingRequest::new(&source).with_target_bucket(&target);
        let err = hangzhou
            .client
            .set_bucket_logging(&request)
            .await
            .expect_err("cross-region target");
        assert_eq!(err.code(), Some(OssErrorCode::InvalidTargetBucketForLogging));
    }

    #[tokio::test]
    async fn test_should_round_trip_bucket_website() {
        let server = TestServer::start().await;
        let bucket = server.create_bucket("site").await;

        let err = server.client.get_bucket_website(&bucket).await.expect_err("unset");
        assert_eq!(err.code(), Some(OssErrorCode::NoSuchWebsiteConfiguration));

        server
            .client
            .set_bucket_website(
                &SetBucketWebsiteRequest::new(&bucket)
                    .with_index_document("index.html")
                    .with_error_document("404.html"),
            )
            .await
            .expect("set");
        let website = server.client.get_bucket_website(&bucket).await.expect("get");
        assert_eq!(website.index_document.as_deref(), Some("index.html"));
        assert_eq!(website.error_document.as_deref(), Some("404.html"));

        server
            .client
            .set_bucket_website(&SetBucketWebsiteRequest::new(&bucket).with_index_document("home.html"))
            .await
            .expect("replace");
        let website = server.client.get_bucket_website(&bucket).await.expect("get");
        assert_eq!(website.index_document.as_deref(), Some("home.html"));
        assert_eq!(website.error_document, None);

        server.client.delete_bucket_website(&bucket).await.expect("delete");
        server.client.delete_bucket_website(&bucket).await.expect("delete again");
        let err = server.client.get_bucket_website(&bucket).await.expect_err("deleted");
        assert_eq!(err.code(), Some(OssErrorCode::NoSuchWebsiteConfiguration));
    }

    #[tokio::test]
    async fn test_should_require_index_document_locally() {
        let server = TestServer::start().await;
        let bucket = server.create_bucket("noindex").await;

        let request = SetBucketWebsiteRequest::new(&bucket).with_error_document("404.html");
        let err = server.client.set_bucket_website(&request).await.expect_err("no index");
        assert!(matches!(err, ClientError::InvalidArgument(_)));

        let err = server.client.get_bucket_website(&bucket).await.expect_err("nothing stored");
        assert_eq!(err.code(), Some(OssErrorCode::NoSuchWebsiteConfiguration));
    }
}
