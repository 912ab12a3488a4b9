//! Bucket lifecycle integration tests.

#[cfg(test)]
mod tests {
    use rustoss_client::{ClientError, ListBucketsRequest, ObjectMetadata, OssErrorCode};

    use crate::{REGION, TestServer, client_for, test_bucket_name};

    #[tokio::test]
    async fn test_should_create_and_delete_bucket() {
        let server = TestServer::start().await;
        let bucket = server.create_bucket("create").await;

        assert!(server.client.does_bucket_exist(&bucket).await.expect("exists"));
        assert_eq!(
            server.client.get_bucket_location(&bucket).await.expect("location"),
            REGION
        );

        server.client.delete_bucket(&bucket).await.expect("delete");
        assert!(!server.client.does_bucket_exist(&bucket).await.expect("exists"));
    }

    #[tokio::test]
    async fn test_should_reject_malformed_bucket_names_locally() {
        let server = TestServer::start().await;
        let too_long = "a".repeat(64);
        let names = ["ab", "Upper", "-leading", "trailing-", "under_score", "dot.name", too_long.as_str()];

        for name in names {
            let err = server.client.create_bucket(name).await.expect_err(name);
            assert!(
                matches!(err, ClientError::InvalidArgument(_)),
                "{name}: expected a local error, got {err}"
            );
        }

        let listing = server
            .client
            .list_buckets(&ListBucketsRequest::default())
            .await
            .expect("list");
        assert!(listing.buckets.is_empty());
    }

    #[tokio::test]
    async fn test_should_create_bucket_idempotently() {
        let server = TestServer::start().await;
        let bucket = server.create_bucket("idem").await;

        server.client.create_bucket(&bucket).await.expect("same bucket again");
        server
            .client
            .create_bucket_with_location(&bucket, REGION)
            .await
            .expect("same location again");

        let err = server
            .client
            .create_bucket_with_location(&bucket, "oss-cn-shanghai")
            .await
            .expect_err("location change");
        assert_eq!(err.code(), Some(OssErrorCode::InvalidLocationConstraint));
    }

    #[tokio::test]
    async fn test_should_reject_unsupported_location() {
        let server = TestServer::start().await;
        let bucket = test_bucket_name("mars");
        let err = server
            .client
            .create_bucket_with_location(&bucket, "oss-mars-1")
            .await
            .expect_err("unsupported location");
        assert_eq!(err.code(), Some(OssErrorCode::InvalidLocationConstraint));
        assert_eq!(err.status().map(|s| s.as_u16()), Some(400));
        assert!(!server.client.does_bucket_exist(&bucket).await.expect("exists"));
    }

    #[tokio::test]
    async fn test_should_reject_foreign_bucket() {
        let server = TestServer::start().await;

        let err = server.client.create_bucket("oss").await.expect_err("taken");
        assert_eq!(err.code(), Some(OssErrorCode::BucketAlreadyExists));
        assert!(err.message().is_some_and(|m| m.starts_with("The requested bucket name is not available")));

        // Exists, but owned by someone else.
        assert!(server.client.does_bucket_exist("oss").await.expect("exists"));
        let err = server.client.delete_bucket("oss").await.expect_err("foreign");
        assert_eq!(err.code(), Some(OssErrorCode::AccessDenied));
    }

    #[tokio::test]
    async fn test_should_reject_deleting_non_empty_bucket() {
        let server = TestServer::start().await;
        let bucket = server.create_bucket("nonempty").await;
        server
            .client
            .put_object(&bucket, "file.txt", "data", &ObjectMetadata::default())
            .await
            .expect("put");

        let err = server.client.delete_bucket(&bucket).await.expect_err("not empty");
        assert_eq!(err.code(), Some(OssErrorCode::BucketNotEmpty));

        server.client.delete_object(&bucket, "file.txt").await.expect("delete object");
        server.client.delete_bucket(&bucket).await.expect("delete bucket");
    }

    #[tokio::test]
    async fn test_should_reject_unknown_credentials() {
        let server = TestServer::start().await;
        let bucket = server.create_bucket("auth").await;

        let stranger = client_for(&server.endpoint, "stranger", "secret");
        let err = stranger.get_bucket_location(&bucket).await.expect_err("unknown key");
        assert_eq!(err.code(), Some(OssErrorCode::InvalidAccessKeyId));

        let config = server.provider.config();
        let wrong_secret = client_for(&server.endpoint, &config.access_key_id, "not-the-secret");
        let err = wrong_secret.get_bucket_location(&bucket).await.expect_err("bad signature");
        assert_eq!(err.code(), Some(OssErrorCode::SignatureDoesNotMatch));
        assert!(err.request_id().is_some());
    }

    #[tokio::test]
    async fn test_should_limit_buckets_per_owner() {
        let config = rustoss_core::OssConfig::builder().max_buckets(2).build();
        let server = TestServer::with_provider(rustoss_core::RustOss::new(config)).await;
        server.create_bucket("one").await;
        server.create_bucket("two").await;

        let err = server
            .client
            .create_bucket(&test_bucket_name("three"))
            .await
            .expect_err("limit reached");
        assert_eq!(err.code(), Some(OssErrorCode::TooManyBuckets));
    }
}
