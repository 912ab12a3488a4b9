//! Listing and batch delete integration tests.

#[cfg(test)]
mod tests {
    use rustoss_client::{
        DeleteObjectsRequest, EncodingType, ListBucketsRequest, ListObjectsRequest, ObjectMetadata,
        OssErrorCode,
    };

    use crate::TestServer;

    async fn put_keys(server: &TestServer, bucket: &str, keys: &[&str]) {
        for key in keys {
            server
                .client
                .put_object(bucket, key, "x", &ObjectMetadata::default())
                .await
                .unwrap_or_else(|e| panic!("put {key}: {e}"));
        }
    }

    #[tokio::test]
    async fn test_should_paginate_buckets_with_marker() {
        let server = TestServer::start().await;
        let names: Vec<String> = (1..=5).map(|i| format!("page-bucket-{i}")).collect();
        for name in &names {
            server.client.create_bucket(name).await.expect("create");
        }
        server.create_bucket("other").await;

        let first = server
            .client
            .list_buckets(&ListBucketsRequest::default().with_prefix("page-").with_max_keys(3))
            .await
            .expect("first page");
        let first_names: Vec<&str> = first.buckets.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(first_names, ["page-bucket-1", "page-bucket-2", "page-bucket-3"]);
        assert!(first.is_truncated);
        assert_eq!(first.next_marker.as_deref(), Some("page-bucket-3"));

        let second = server
            .client
            .list_buckets(
                &ListBucketsRequest::default()
                    .with_prefix("page-")
                    .with_marker("page-bucket-3")
                    .with_max_keys(3),
            )
            .await
            .expect("second page");
        let second_names: Vec<&str> = second.buckets.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(second_names, ["page-bucket-4", "page-bucket-5"]);
        assert!(!second.is_truncated);
        assert_eq!(second.next_marker, None);

        let all = server
            .client
            .list_buckets(&ListBucketsRequest::default())
            .await
            .expect("all");
        assert_eq!(all.buckets.len(), 6);
        assert!(all.buckets.iter().all(|b| b.location == crate::REGION));
        assert!(all.buckets.iter().all(|b| b.name != "oss"), "foreign buckets are hidden");
    }

    #[tokio::test]
    async fn test_should_reject_out_of_range_max_keys() {
        let server = TestServer::start().await;
        let bucket = server.create_bucket("maxkeys").await;

        for max_keys in [0, 1001] {
            let err = server
                .client
                .list_buckets(&ListBucketsRequest::default().with_max_keys(max_keys))
                .await
                .expect_err("bucket max-keys");
            assert_eq!(err.code(), Some(OssErrorCode::InvalidArgument));

            let err = server
                .client
                .list_objects(&ListObjectsRequest::new(&bucket).with_max_keys(max_keys))
                .await
                .expect_err("object max-keys");
            assert_eq!(err.code(), Some(OssErrorCode::InvalidArgument));
        }
    }

    #[tokio::test]
    async fn test_should_group_common_prefixes() {
        let server = TestServer::start().await;
        let bucket = server.create_bucket("prefixes").await;
        put_keys(&server, &bucket, &["a.txt", "photos/1.jpg", "photos/2.jpg", "docs/x/y.md", "z.txt"]).await;

        let listing = server
            .client
            .list_objects(&ListObjectsRequest::new(&bucket).with_delimiter("/"))
            .await
            .expect("list");
        let keys: Vec<&str> = listing.contents.iter().map(|o| o.key.as_str()).collect();
        assert_eq!(keys, ["a.txt", "z.txt"]);
        assert_eq!(listing.common_prefixes, ["docs/", "photos/"]);

        let listing = server
            .client
            .list_objects(&ListObjectsRequest::new(&bucket).with_prefix("photos/"))
            .await
            .expect("list prefix");
        let keys: Vec<&str> = listing.contents.iter().map(|o| o.key.as_str()).collect();
        assert_eq!(keys, ["photos/1.jpg", "photos/2.jpg"]);
        assert!(listing.contents.iter().all(|o| o.size == 1));
    }

    #[tokio::test]
    async fn test_should_decode_url_encoded_listing() {
        let server = TestServer::start().await;
        let bucket = server.create_bucket("encoded").await;
        let key = "dir one/a b+c&d=ü.txt";
        put_keys(&server, &bucket, &[key]).await;

        let listing = server
            .client
            .list_objects(
                &ListObjectsRequest::new(&bucket)
                    .with_prefix("dir one/")
                    .with_encoding_type(EncodingType::Url),
            )
            .await
            .expect("list");
        assert_eq!(listing.encoding_type, EncodingType::Url);
        assert_eq!(listing.prefix.as_deref(), Some("dir one/"));
        assert_eq!(listing.contents.len(), 1);
        assert_eq!(listing.contents[0].key, key);
    }

    #[tokio::test]
    async fn test_should_page_through_keys_with_spaces_and_ampersands() {
        let server = TestServer::start().await;
        let bucket = server.create_bucket("spaced").await;
        let keys = ["a & b", "c & d", "tail "];
        put_keys(&server, &bucket, &keys).await;

        let mut listed = Vec::new();
        let mut marker: Option<String> = None;
        loop {
            let mut request = ListObjectsRequest::new(&bucket).with_max_keys(1);
            if let Some(marker) = &marker {
                request = request.with_marker(marker);
            }
            let page = server.client.list_objects(&request).await.expect("list");
            listed.extend(page.contents.into_iter().map(|o| o.key));
            if !page.is_truncated {
                break;
            }
            assert_eq!(page.next_marker.as_deref(), listed.last().map(String::as_str));
            marker = page.next_marker;
        }
        assert_eq!(listed, keys);

        for key in &listed {
            server
                .client
                .get_object_metadata(&bucket, key)
                .await
                .unwrap_or_else(|e| panic!("head {key:?}: {e}"));
        }

        let listing = server
            .client
            .list_objects(&ListObjectsRequest::new(&bucket).with_prefix("a & "))
            .await
            .expect("list prefix");
        assert_eq!(listing.prefix.as_deref(), Some("a & "));
        assert_eq!(listing.contents.len(), 1);
        assert_eq!(listing.contents[0].key, "a & b");
    }

    #[tokio::test]
    async fn test_should_drain_bucket_with_batch_deletes() {
        let server = TestServer::start().await;
        let bucket = server.create_bucket("drain").await;
        let keys: Vec<String> = (0..25).map(|i| format!("obj/{i:02}")).collect();
        let key_refs: Vec<&str> = keys.iter().map(String::as_str).collect();
        put_keys(&server, &bucket, &key_refs).await;

        let mut deleted = Vec::new();
        loop {
            let page = server
                .client
                .list_objects(&ListObjectsRequest::new(&bucket).with_max_keys(10))
                .await
                .expect("list");
            if page.contents.is_empty() {
                break;
            }
            let batch: Vec<String> = page.contents.into_iter().map(|o| o.key).collect();
            let result = server
                .client
                .delete_objects(&DeleteObjectsRequest::new(&bucket, batch.clone()))
                .await
                .expect("delete batch");
            assert_eq!(result.deleted_objects, batch);
            deleted.extend(batch);
        }

        assert_eq!(deleted, keys);
        server.client.delete_bucket(&bucket).await.expect("empty bucket");
    }

    #[tokio::test]
    async fn test_should_delete_objects_quietly() {
        let server = TestServer::start().await;
        let bucket = server.create_bucket("quiet").await;
        put_keys(&server, &bucket, &["one", "two"]).await;

        let request = DeleteObjectsRequest::new(
            &bucket,
            vec!["one".to_owned(), "two".to_owned(), "missing".to_owned()],
        )
        .with_quiet(true);
        let result = server.client.delete_objects(&request).await.expect("delete");
        assert!(result.deleted_objects.is_empty());

        let listing = server
            .client
            .list_objects(&ListObjectsRequest::new(&bucket))
            .await
            .expect("list");
        assert!(listing.contents.is_empty());
    }

    #[tokio::test]
    async fn test_should_decode_deleted_keys() {
        let server = TestServer::start().await;
        let bucket = server.create_bucket("delenc").await;
        let key = "notes/ü & ß.txt";
        put_keys(&server, &bucket, &[key]).await;

        let request = DeleteObjectsRequest::new(&bucket, vec![key.to_owned()])
            .with_encoding_type(EncodingType::Url);
        let result = server.client.delete_objects(&request).await.expect("delete");
        assert_eq!(result.deleted_objects, [key]);
    }
}
