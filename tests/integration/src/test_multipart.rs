//! Multipart upload integration tests.

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use rustoss_client::{
        ClientError, CompleteMultipartUploadRequest, CompletedPart, GetObjectRequest,
        ListMultipartUploadsRequest, OssErrorCode,
    };

    use crate::TestServer;

    const PART_SIZE: usize = 64 * 1024;

    #[tokio::test]
    async fn test_should_complete_multipart_upload() {
        let server = TestServer::start().await;
        let bucket = server.create_bucket("mpu").await;
        let upload = server
            .client
            .initiate_multipart_upload(&bucket, "big.bin")
            .await
            .expect("initiate");
        assert_eq!(upload.key, "big.bin");
        assert!(!upload.upload_id.is_empty());

        let first = vec![b'a'; PART_SIZE];
        let second = b"tail".to_vec();
        let mut parts = Vec::new();
        for (number, body) in [(1, first), (2, second)] {
            let part = server
                .client
                .upload_part(&bucket, "big.bin", &upload.upload_id, number, body)
                .await
                .expect("upload part");
            assert_eq!(part.part_number, number);
            parts.push(part);
        }

        let completed = server
            .client
            .complete_multipart_upload(&CompleteMultipartUploadRequest {
                bucket: bucket.clone(),
                key: "big.bin".to_owned(),
                upload_id: upload.upload_id.clone(),
                parts,
            })
            .await
            .expect("complete");
        assert!(completed.etag.ends_with("-2\""), "{}", completed.etag);

        let object = server
            .client
            .get_object(&GetObjectRequest::new(&bucket, "big.bin"))
            .await
            .expect("get");
        assert_eq!(object.metadata.etag.as_deref(), Some(completed.etag.as_str()));
        let body = object.bytes().await.expect("body");
        assert_eq!(body.len(), PART_SIZE + 4);
        assert_eq!(&body[PART_SIZE..], b"tail");

        let uploads = server
            .client
            .list_multipart_uploads(&ListMultipartUploadsRequest::new(&bucket))
            .await
            .expect("list");
        assert!(uploads.uploads.is_empty());
    }

    #[tokio::test]
    async fn test_should_reject_bad_completions() {
        let server = TestServer::start().await;
        let bucket = server.create_bucket("mpubad").await;
        let upload = server
            .client
            .initiate_multipart_upload(&bucket, "k")
            .await
            .expect("initiate");
        let part = server
            .client
            .upload_part(&bucket, "k", &upload.upload_id, 1, "data")
            .await
            .expect("upload part");

        let complete = |parts: Vec<CompletedPart>| CompleteMultipartUploadRequest {
            bucket: bucket.clone(),
            key: "k".to_owned(),
            upload_id: upload.upload_id.clone(),
            parts,
        };

        let wrong_etag = CompletedPart {
            part_number: 1,
            etag: "\"00000000000000000000000000000000\"".to_owned(),
        };
        let err = server
            .client
            .complete_multipart_upload(&complete(vec![wrong_etag]))
            .await
            .expect_err("wrong etag");
        assert_eq!(err.code(), Some(OssErrorCode::InvalidPart));

        let err = server
            .client
            .complete_multipart_upload(&complete(vec![part.clone(), part.clone()]))
            .await
            .expect_err("out of order");
        assert_eq!(err.code(), Some(OssErrorCode::InvalidPartOrder));

        let err = server
            .client
            .upload_part(&bucket, "k", "", 1, "data")
            .await
            .expect_err("empty upload id");
        assert!(matches!(err, ClientError::InvalidArgument(_)));

        server
            .client
            .abort_multipart_upload(&bucket, "k", &upload.upload_id)
            .await
            .expect("abort");
        let err = server
            .client
            .complete_multipart_upload(&complete(vec![part]))
            .await
            .expect_err("aborted");
        assert_eq!(err.code(), Some(OssErrorCode::NoSuchUpload));
    }

    #[tokio::test]
    async fn test_should_drain_uploads_with_markers() {
        let server = TestServer::start().await;
        let bucket = server.create_bucket("mpulist").await;

        let mut started = BTreeSet::new();
        for key in ["a", "b", "b", "c", "d"] {
            let upload = server
                .client
                .initiate_multipart_upload(&bucket, key)
                .await
                .expect("initiate");
            started.insert((key.to_owned(), upload.upload_id));
        }

        let mut seen = Vec::new();
        let (mut key_marker, mut upload_id_marker) = (None, None);
        loop {
            let page = server
                .client
                .list_multipart_uploads(
                    &ListMultipartUploadsRequest::new(&bucket)
                        .with_markers(key_marker.take(), upload_id_marker.take())
                        .with_max_uploads(2),
                )
                .await
                .expect("list page");
            assert!(page.uploads.len() <= 2);
            seen.extend(page.uploads.into_iter().map(|u| (u.key, u.upload_id)));
            if !page.is_truncated {
                break;
            }
            key_marker = page.next_key_marker;
            upload_id_marker = page.next_upload_id_marker;
        }

        let listed: Vec<(String, String)> = started.iter().cloned().collect();
        assert_eq!(seen, listed, "uploads come back once each, sorted by key and upload id");

        for (key, upload_id) in &seen {
            server
                .client
                .abort_multipart_upload(&bucket, key, upload_id)
                .await
                .expect("abort");
        }
        let page = server
            .client
            .list_multipart_uploads(&ListMultipartUploadsRequest::new(&bucket))
            .await
            .expect("list");
        assert!(page.uploads.is_empty());
        server.client.delete_bucket(&bucket).await.expect("delete bucket");
    }
}
