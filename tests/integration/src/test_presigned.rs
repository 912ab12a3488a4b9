//! Presigned URL integration tests.

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use reqwest::header::{HeaderMap, HeaderValue, RANGE};
    use rustoss_client::{ObjectMetadata, OssErrorCode, PresignedUrlRequest};

    use crate::TestServer;

    async fn server_with_object() -> (TestServer, String) {
        let server = TestServer::start().await;
        let bucket = server.create_bucket("presign").await;
        server
            .client
            .put_object(&bucket, "docs/report.txt", "0123456789", &ObjectMetadata::default())
            .await
            .expect("put");
        (server, bucket)
    }

    #[tokio::test]
    async fn test_should_fetch_object_by_presigned_url() {
        let (server, bucket) = server_with_object().await;
        let request = PresignedUrlRequest::new(&bucket, "docs/report.txt", Utc::now() + Duration::minutes(5));
        let url = server.client.generate_presigned_url(&request).expect("sign");

        let object = server
            .client
            .get_object_by_url(url.as_str(), HeaderMap::new())
            .await
            .expect("get");
        assert_eq!(object.bucket, bucket);
        assert_eq!(object.key, "docs/report.txt");
        assert_eq!(object.bytes().await.expect("body").as_ref(), b"0123456789");

        // The URL needs no credentials at all.
        let plain = reqwest::get(url.as_str()).await.expect("plain GET");
        assert!(plain.status().is_success());
    }

    #[tokio::test]
    async fn test_should_honor_range_on_presigned_url() {
        let (server, bucket) = server_with_object().await;
        let request = PresignedUrlRequest::new(&bucket, "docs/report.txt", Utc::now() + Duration::minutes(5));
        let url = server.client.generate_presigned_url(&request).expect("sign");

        let mut headers = HeaderMap::new();
        headers.insert(RANGE, HeaderValue::from_static("bytes=2-5"));
        let object = server
            .client
            .get_object_by_url(url.as_str(), headers)
            .await
            .expect("ranged get");
        assert_eq!(object.metadata.content_length, 4);
        assert_eq!(object.bytes().await.expect("body").as_ref(), b"2345");
    }

    #[tokio::test]
    async fn test_should_reject_expired_presigned_url() {
        let (server, bucket) = server_with_object().await;
        let request = PresignedUrlRequest::new(&bucket, "docs/report.txt", Utc::now() - Duration::minutes(1));
        let url = server.client.generate_presigned_url(&request).expect("sign");

        let err = server
            .client
            .get_object_by_url(url.as_str(), HeaderMap::new())
            .await
            .expect_err("expired");
        assert_eq!(err.code(), Some(OssErrorCode::AccessDenied));
        assert_eq!(err.message(), Some("Request has expired."));
    }

    #[tokio::test]
    async fn test_should_reject_tampered_presigned_url() {
        let (server, bucket) = server_with_object().await;
        let expiration = Utc::now() + Duration::minutes(5);
        let request = PresignedUrlRequest::new(&bucket, "docs/report.txt", expiration);
        let url = server.client.generate_presigned_url(&request).expect("sign");

        let extended = url.as_str().replace(
            &format!("Expires={}", expiration.timestamp()),
            &format!("Expires={}", expiration.timestamp() + 3600),
        );
        assert_ne!(extended, url.as_str());
        let err = server
            .client
            .get_object_by_url(&extended, HeaderMap::new())
            .await
            .expect_err("tampered expiry");
        assert_eq!(err.code(), Some(OssErrorCode::SignatureDoesNotMatch));

        let other_key = url.as_str().replace("report.txt", "secret.txt");
        let err = server
            .client
            .get_object_by_url(&other_key, HeaderMap::new())
            .await
            .expect_err("tampered key");
        assert_eq!(err.code(), Some(OssErrorCode::SignatureDoesNotMatch));
    }

    #[tokio::test]
    async fn test_should_presign_upload_with_content_type() {
        let (server, bucket) = server_with_object().await;
        let request = PresignedUrlRequest::new(&bucket, "upload.txt", Utc::now() + Duration::minutes(5))
            .with_method(reqwest::Method::PUT)
            .with_content_type("text/plain");
        let url = server.client.generate_presigned_url(&request).expect("sign");

        let http = reqwest::Client::new();
        let response = http
            .put(url.as_str())
            .header("content-type", "text/plain")
            .body("uploaded")
            .send()
            .await
            .expect("presigned PUT");
        assert!(response.status().is_success(), "{}", response.status());

        let head = server.client.get_object_metadata(&bucket, "upload.txt").await.expect("head");
        assert_eq!(head.content_type.as_deref(), Some("text/plain"));
        assert_eq!(head.content_length, 8);

        // A different content type breaks the signature.
        let response = http
            .put(url.as_str())
            .header("content-type", "application/json")
            .body("{}")
            .send()
            .await
            .expect("presigned PUT");
        assert_eq!(response.status(), reqwest::StatusCode::FORBIDDEN);
    }
}
