//! OSS header signatures.
//!
//! The `Authorization` header has the format:
//!
//! ```text
//! OSS <AccessKeyId>:<Signature>
//! ```
//!
//! Where `Signature = Base64(HMAC-SHA1(AccessKeySecret, StringToSign))`.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use hmac::{Hmac, KeyInit, Mac};
use sha1::Sha1;
use subtle::ConstantTimeEq;
use tracing::debug;

use crate::canonical::{header_value, string_to_sign};
use crate::credentials::CredentialProvider;
use crate::error::AuthError;
use crate::presigned::{is_presigned, verify_presigned};

type HmacSha1 = Hmac<Sha1>;

const AUTH_PREFIX: &str = "OSS ";

/// How a verified request was authenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMethod {
    /// `Authorization` header.
    Header,
    /// `OSSAccessKeyId` / `Expires` / `Signature` query parameters.
    Presigned,
}

/// The result of a successful verification.
#[derive(Debug, Clone)]
pub struct AuthResult {
    /// The access key id that signed the request.
    pub access_key_id: String,
    /// Where the signature was found.
    pub method: AuthMethod,
}

/// Compute `Base64(HMAC-SHA1(secret, string_to_sign))`.
#[must_use]
pub fn compute_signature(secret: &str, string_to_sign: &str) -> String {
    let mut mac = HmacSha1::new_from_slice(secret.as_bytes()).expect("HMAC can accept any key length");
    mac.update(string_to_sign.as_bytes());
    BASE64.encode(mac.finalize().into_bytes())
}

/// Sign a request and return the `Authorization` header value.
///
/// `headers` must already carry `Date`, `Content-Type`, `Content-MD5` and the
/// `x-oss-*` headers that will be sent.
#[must_use]
pub fn sign_request(
    access_key_id: &str,
    secret: &str,
    method: &str,
    headers: &http::HeaderMap,
    resource: &str,
) -> String {
    let date = header_value(headers, "date");
    let string_to_sign = string_to_sign(method, headers, date, resource);
    let signature = compute_signature(secret, &string_to_sign);
    format!("{AUTH_PREFIX}{access_key_id}:{signature}")
}

/// Check whether the `Authorization` header uses the OSS scheme.
#[must_use]
pub fn is_oss_auth(auth_header: &str) -> bool {
    auth_header.starts_with(AUTH_PREFIX)
}

/// Verify a request signed either in the header or in the query string.
///
/// `resource` is the canonicalized resource for the routed bucket and key.
///
/// # Errors
///
/// Returns [`AuthError::MissingAuthHeader`] when the request carries no
/// signature at all, or the error of the matching verifier.
pub fn verify_request(
    parts: &http::request::Parts,
    resource: &str,
    credential_provider: &dyn CredentialProvider,
) -> Result<AuthResult, AuthError> {
    if parts.headers.contains_key(http::header::AUTHORIZATION) {
        verify_header(parts, resource, credential_provider)
    } else if is_presigned(parts.uri.query().unwrap_or("")) {
        verify_presigned(parts, resource, credential_provider)
    } else {
        Err(AuthError::MissingAuthHeader)
    }
}

/// Verify an `Authorization: OSS ...` signed request.
///
/// # Errors
///
/// Returns an [`AuthError`] if the header is malformed, the access key is not
/// found, or the signature does not match.
pub fn verify_header(
    parts: &http::request::Parts,
    resource: &str,
    credential_provider: &dyn CredentialProvider,
) -> Result<AuthResult, AuthError> {
    let auth_header = parts
        .headers
        .get(http::header::AUTHORIZATION)
        .ok_or(AuthError::MissingAuthHeader)?
        .to_str()
        .map_err(|_| AuthError::InvalidAuthHeader)?;

    let (access_key_id, provided_signature) = parse_auth_header(auth_header)?;
    let secret_key = credential_provider.get_secret_key(&access_key_id)?;

    let date = header_value(&parts.headers, "date");
    let string_to_sign = string_to_sign(parts.method.as_str(), &parts.headers, date, resource);
    debug!(string_to_sign = ?string_to_sign, "Built OSS string to sign");

    let expected_signature = compute_signature(&secret_key, &string_to_sign);

    if provided_signature
        .as_bytes()
        .ct_eq(expected_signature.as_bytes())
        .into()
    {
        debug!(access_key_id = %access_key_id, "OSS signature verified");
        Ok(AuthResult {
            access_key_id,
            method: AuthMethod::Header,
        })
    } else {
        debug!(access_key_id = %access_key_id, "OSS signature mismatch");
        Err(AuthError::SignatureDoesNotMatch)
    }
}

/// Parse `OSS AccessKeyId:Signature`.
fn parse_auth_header(header: &str) -> Result<(String, String), AuthError> {
    let rest = header
        .strip_prefix(AUTH_PREFIX)
        .ok_or(AuthError::InvalidAuthHeader)?;

    let (access_key_id, signature) = rest.split_once(':').ok_or(AuthError::InvalidAuthHeader)?;

    if access_key_id.is_empty() || signature.is_empty() {
        return Err(AuthError::InvalidAuthHeader);
    }

    Ok((access_key_id.to_owned(), signature.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::StaticCredentialProvider;

    const ACCESS_KEY: &str = "44CF9590006BF252F707";
    const SECRET_KEY: &str = "OtxrzxIsfpFjA7SwPzILwy8Bw21TLhquhboDYROV";

    fn provider() -> StaticCredentialProvider {
        StaticCredentialProvider::new(vec![(ACCESS_KEY.to_owned(), SECRET_KEY.to_owned())])
    }

    fn signed_parts(method: &str, uri: &str, resource: &str) -> http::request::Parts {
        let (mut parts, ()) = http::Request::builder()
            .method(method)
            .uri(uri)
            .header("date", "Thu, 17 Nov 2005 18:49:58 GMT")
            .header("content-type", "text/html")
            .header("x-oss-meta-author", "foo@bar.com")
            .body(())
            .expect("valid request")
            .into_parts();
        let auth = sign_request(ACCESS_KEY, SECRET_KEY, method, &parts.headers, resource);
        parts.headers.insert(
            http::header::AUTHORIZATION,
            http::HeaderValue::from_str(&auth).expect("ascii header"),
        );
        parts
    }

    #[test]
    fn test_should_detect_oss_header() {
        assert!(is_oss_auth("OSS ak:sig"));
        assert!(!is_oss_auth("AWS ak:sig"));
    }

    #[test]
    fn test_should_reject_malformed_header() {
        assert!(parse_auth_header("OSS :sig").is_err());
        assert!(parse_auth_header("OSS key:").is_err());
        assert!(parse_auth_header("OSS noseparator").is_err());
        assert!(parse_auth_header("AWS key:sig").is_err());
    }

    #[test]
    fn test_should_match_reference_signature() {
        let mut headers = http::HeaderMap::new();
        headers.insert("content-md5", http::HeaderValue::from_static("ODBGOERFMDMzQTczRUY3NUE3NzA5QzdFNUYzMDQxNEM="));
        headers.insert("content-type", http::HeaderValue::from_static("text/html"));
        headers.insert("date", http::HeaderValue::from_static("Thu, 17 Nov 2005 18:49:58 GMT"));
        headers.insert("x-oss-magic", http::HeaderValue::from_static("abracadabra"));
        headers.insert("x-oss-meta-author", http::HeaderValue::from_static("foo@bar.com"));

        let auth = sign_request(ACCESS_KEY, SECRET_KEY, "PUT", &headers, "/oss-example/nelson");
        assert_eq!(auth, "OSS 44CF9590006BF252F707:26NBxoKdsyly4EDv6inkoDft/yA=");
    }

    #[test]
    fn test_should_verify_signed_request() {
        let parts = signed_parts("PUT", "http://localhost/bucket/key", "/bucket/key");

        let result = verify_request(&parts, "/bucket/key", &provider()).expect("verified");
        assert_eq!(result.access_key_id, ACCESS_KEY);
        assert_eq!(result.method, AuthMethod::Header);
    }

    #[test]
    fn test_should_reject_signature_for_other_resource() {
        let parts = signed_parts("GET", "http://localhost/bucket/key", "/bucket/key");

        let result = verify_request(&parts, "/bucket/other", &provider());
        assert!(matches!(result, Err(AuthError::SignatureDoesNotMatch)));
    }

    #[test]
    fn test_should_reject_unsigned_request() {
        let (parts, ()) = http::Request::builder()
            .uri("http://localhost/bucket")
            .body(())
            .expect("valid request")
            .into_parts();

        let result = verify_request(&parts, "/bucket/", &provider());
        assert!(matches!(result, Err(AuthError::MissingAuthHeader)));
    }
}
