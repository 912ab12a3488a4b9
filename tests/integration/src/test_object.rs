//! Object integration tests: ranges, conditions, metadata and downloads.

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use chrono::{Duration, Utc};
    use futures::TryStreamExt;
    use rustoss_client::{ClientError, GetObjectRequest, ObjectMetadata, OssErrorCode};

    use crate::TestServer;

    const DIGITS: &[u8] = b"0123456789";

    async fn server_with_digits() -> (TestServer, String) {
        let server = TestServer::start().await;
        let bucket = server.create_bucket("obj").await;
        server
            .client
            .put_object(&bucket, "digits.txt", Bytes::from_static(DIGITS), &ObjectMetadata::default())
            .await
            .expect("put");
        (server, bucket)
    }

    async fn read_range(server: &TestServer, bucket: &str, start: i64, end: i64) -> Bytes {
        let request = GetObjectRequest::new(bucket, "digits.txt").with_range(start, end);
        server
            .client
            .get_object(&request)
            .await
            .expect("get")
            .bytes()
            .await
            .expect("body")
    }

    #[tokio::test]
    async fn test_should_put_and_get_object() {
        let server = TestServer::start().await;
        let bucket = server.create_bucket("putget").await;
        let metadata = ObjectMetadata::default().with_content_type("text/plain");

        let etag = server
            .client
            .put_object(&bucket, "dir/greeting.txt", "hello, oss!", &metadata)
            .await
            .expect("put");
        assert!(etag.starts_with('"') && etag.ends_with('"'));

        let object = server
            .client
            .get_object(&GetObjectRequest::new(&bucket, "dir/greeting.txt"))
            .await
            .expect("get");
        assert_eq!(object.key, "dir/greeting.txt");
        assert_eq!(object.metadata.content_type.as_deref(), Some("text/plain"));
        assert_eq!(object.metadata.content_length, 11);
        assert_eq!(object.metadata.etag.as_deref(), Some(etag.as_str()));
        assert!(object.metadata.last_modified.is_some());
        assert_eq!(object.bytes().await.expect("body").as_ref(), b"hello, oss!");

        let head = server
            .client
            .get_object_metadata(&bucket, "dir/greeting.txt")
            .await
            .expect("head");
        assert_eq!(head.content_length, 11);
        assert_eq!(head.etag.as_deref(), Some(etag.as_str()));
    }

    #[tokio::test]
    async fn test_should_resolve_byte_ranges() {
        let (server, bucket) = server_with_digits().await;

        assert_eq!(read_range(&server, &bucket, 0, 4).await.as_ref(), b"01234");
        assert_eq!(read_range(&server, &bucket, 2, 2).await.as_ref(), b"2");
        assert_eq!(read_range(&server, &bucket, 5, -1).await.as_ref(), b"56789");
        assert_eq!(read_range(&server, &bucket, -1, 3).await.as_ref(), b"789");
        assert_eq!(read_range(&server, &bucket, -1, -1).await.as_ref(), DIGITS);

        let partial = server
            .client
            .get_object(&GetObjectRequest::new(&bucket, "digits.txt").with_range(1, 3))
            .await
            .expect("partial");
        assert_eq!(partial.metadata.content_range.as_deref(), Some("bytes 1-3/10"));
        assert_eq!(partial.metadata.content_length, 3);
    }

    #[tokio::test]
    async fn test_should_ignore_unsatisfiable_ranges() {
        let (server, bucket) = server_with_digits().await;

        // Reversed bounds and an end past the object return everything.
        assert_eq!(read_range(&server, &bucket, 6, 2).await.as_ref(), DIGITS);
        assert_eq!(read_range(&server, &bucket, 0, 10).await.as_ref(), DIGITS);
        assert_eq!(read_range(&server, &bucket, 3, 1000).await.as_ref(), DIGITS);

        let full = server
            .client
            .get_object(&GetObjectRequest::new(&bucket, "digits.txt").with_range(8, 4))
            .await
            .expect("full");
        assert!(full.metadata.content_range.is_none());
    }

    #[tokio::test]
    async fn test_should_reject_empty_suffix_range() {
        let (server, bucket) = server_with_digits().await;
        let err = server
            .client
            .get_object(&GetObjectRequest::new(&bucket, "digits.txt").with_range(-1, 0))
            .await
            .expect_err("bytes=-0");
        assert_eq!(err.code(), Some(OssErrorCode::InvalidRange));
        assert_eq!(err.status().map(|s| s.as_u16()), Some(416));
    }

    #[tokio::test]
    async fn test_should_evaluate_conditional_get() {
        let (server, bucket) = server_with_digits().await;
        let etag = server
            .client
            .get_object_metadata(&bucket, "digits.txt")
            .await
            .expect("head")
            .etag
            .expect("etag");
        let past = Utc::now() - Duration::hours(1);
        let future = Utc::now() + Duration::hours(1);
        let request = || GetObjectRequest::new(&bucket, "digits.txt");

        let ok = [
            request().with_matching_etag(&etag),
            request().with_matching_etag("\"OTHER\"").with_matching_etag(&etag),
            request().with_non_matching_etag("\"OTHER\""),
            request().with_modified_since(past),
            request().with_unmodified_since(future),
        ];
        for request in ok {
            assert!(server.client.get_object(&request).await.is_ok(), "{request:?}");
        }

        let failed = [
            request().with_matching_etag("\"OTHER\""),
            request().with_unmodified_since(past),
        ];
        for request in failed {
            let err = server.client.get_object(&request).await.expect_err("412");
            assert_eq!(err.code(), Some(OssErrorCode::PreconditionFailed), "{request:?}");
        }

        let unchanged = [
            request().with_non_matching_etag(&etag),
            request().with_modified_since(future),
        ];
        for request in unchanged {
            let err = server.client.get_object(&request).await.expect_err("304");
            assert_eq!(err.code(), Some(OssErrorCode::NotModified), "{request:?}");
            assert_eq!(err.message(), Some("Not Modified"));
        }
    }

    #[tokio::test]
    async fn test_should_round_trip_non_ascii_metadata() {
        let server = TestServer::start().await;
        let bucket = server.create_bucket("meta").await;
        let metadata = ObjectMetadata::default()
            .with_user_metadata("City", "東京")
            .with_user_metadata("author", "Zoë Ångström");

        server
            .client
            .put_object(&bucket, "tagged", "x", &metadata)
            .await
            .expect("put");
        let head = server.client.get_object_metadata(&bucket, "tagged").await.expect("head");

        assert_eq!(head.user_metadata.len(), 2);
        assert_eq!(head.user_metadata["city"], "東京");
        assert_eq!(head.user_metadata["author"], "Zoë Ångström");
    }

    #[tokio::test]
    async fn test_should_preserve_malformed_expires() {
        let server = TestServer::start().await;
        let bucket = server.create_bucket("expires").await;

        let metadata = ObjectMetadata::default().with_expires("not a date");
        server.client.put_object(&bucket, "odd", "x", &metadata).await.expect("put");
        let head = server.client.get_object_metadata(&bucket, "odd").await.expect("head");
        assert_eq!(head.raw_expires.as_deref(), Some("not a date"));
        assert!(matches!(
            head.expiration_time(),
            Err(ClientError::InvalidDate(raw)) if raw == "not a date"
        ));

        let metadata = ObjectMetadata::default().with_expires("Wed, 21 Oct 2015 07:28:00 GMT");
        server.client.put_object(&bucket, "dated", "x", &metadata).await.expect("put");
        let head = server.client.get_object_metadata(&bucket, "dated").await.expect("head");
        let expires = head.expiration_time().expect("valid").expect("present");
        assert_eq!(expires.timestamp(), 1_445_412_480);
    }

    #[tokio::test]
    async fn test_should_download_object_to_file() {
        let server = TestServer::start().await;
        let bucket = server.create_bucket("file").await;
        let body: Vec<u8> = DIGITS.iter().copied().cycle().take(200_000).collect();
        server
            .client
            .put_object(&bucket, "blob.bin", body.clone(), &ObjectMetadata::default())
            .await
            .expect("put");

        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("blob.bin");
        let metadata = server
            .client
            .get_object_to_file(&GetObjectRequest::new(&bucket, "blob.bin"), &path)
            .await
            .expect("download");

        let written = tokio::fs::read(&path).await.expect("read file");
        assert_eq!(metadata.content_length, written.len() as u64);
        assert_eq!(written, body);
    }

    #[tokio::test]
    async fn test_should_stream_object_body() {
        let (server, bucket) = server_with_digits().await;
        let object = server
            .client
            .get_object(&GetObjectRequest::new(&bucket, "digits.txt"))
            .await
            .expect("get");
        let chunks: Vec<Bytes> = object.into_stream().try_collect().await.expect("stream");
        assert_eq!(chunks.concat(), DIGITS);
    }

    #[tokio::test]
    async fn test_should_report_missing_objects() {
        let (server, bucket) = server_with_digits().await;

        let err = server
            .client
            .get_object(&GetObjectRequest::new(&bucket, "nope"))
            .await
            .expect_err("missing");
        assert_eq!(err.code(), Some(OssErrorCode::NoSuchKey));

        // HEAD responses have no body; the code comes from the status.
        let err = server
            .client
            .get_object_metadata(&bucket, "nope")
            .await
            .expect_err("missing");
        assert_eq!(err.code(), Some(OssErrorCode::NoSuchKey));

        server.client.delete_object(&bucket, "digits.txt").await.expect("delete");
        server.client.delete_object(&bucket, "digits.txt").await.expect("delete again");
    }
}
