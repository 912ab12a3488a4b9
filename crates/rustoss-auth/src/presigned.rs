//! Presigned URL signing and verification.
//!
//! Presigned URLs carry the signature in query parameters:
//!
//! - `OSSAccessKeyId` - the access key id
//! - `Expires` - expiration as Unix epoch seconds
//! - `Signature` - `Base64(HMAC-SHA1(secret, StringToSign))`
//!
//! The string to sign uses `Expires` in place of the `Date` header.

use chrono::Utc;
use percent_encoding::utf8_percent_encode;
use subtle::ConstantTimeEq;
use tracing::debug;

use crate::canonical::{QUERY_ENCODE_SET, decode_query, string_to_sign};
use crate::credentials::CredentialProvider;
use crate::error::AuthError;
use crate::signature::{AuthMethod, AuthResult, compute_signature};

const ACCESS_KEY_PARAM: &str = "OSSAccessKeyId";
const EXPIRES_PARAM: &str = "Expires";
const SIGNATURE_PARAM: &str = "Signature";

/// Signature query parameters of a presigned URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresignedParams {
    /// The access key id.
    pub access_key_id: String,
    /// Expiration, Unix epoch seconds.
    pub expires: i64,
    /// The base64 signature.
    pub signature: String,
}

impl PresignedParams {
    /// Render as an encoded query fragment (without a leading `?` or `&`).
    #[must_use]
    pub fn to_query(&self) -> String {
        format!(
            "{ACCESS_KEY_PARAM}={}&{EXPIRES_PARAM}={}&{SIGNATURE_PARAM}={}",
            utf8_percent_encode(&self.access_key_id, QUERY_ENCODE_SET),
            self.expires,
            utf8_percent_encode(&self.signature, QUERY_ENCODE_SET),
        )
    }
}

/// Sign a request for delivery as a presigned URL.
///
/// `headers` holds the headers the eventual caller must send with the same
/// values (`Content-Type`, `Content-MD5` and any `x-oss-*`).
#[must_use]
pub fn presign(
    access_key_id: &str,
    secret: &str,
    method: &str,
    headers: &http::HeaderMap,
    expires: i64,
    resource: &str,
) -> PresignedParams {
    let string_to_sign = string_to_sign(method, headers, &expires.to_string(), resource);
    PresignedParams {
        access_key_id: access_key_id.to_owned(),
        expires,
        signature: compute_signature(secret, &string_to_sign),
    }
}

/// Whether the query string carries presigned URL parameters.
#[must_use]
pub fn is_presigned(query: &str) -> bool {
    query
        .split('&')
        .any(|p| p.split_once('=').map_or(p, |(k, _)| k) == ACCESS_KEY_PARAM)
}

/// Extract the presigned parameters from a raw query string.
///
/// # Errors
///
/// Returns [`AuthError::MissingQueryParam`] when a parameter is absent or
/// `Expires` is not an integer.
pub fn parse_presigned_params(query: &str) -> Result<PresignedParams, AuthError> {
    let params = decode_query(query);
    let get = |name: &str| {
        params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.clone())
            .ok_or_else(|| AuthError::MissingQueryParam(name.to_owned()))
    };

    let access_key_id = get(ACCESS_KEY_PARAM)?;
    let expires = get(EXPIRES_PARAM)?
        .parse::<i64>()
        .map_err(|_| AuthError::MissingQueryParam(format!("{EXPIRES_PARAM} (invalid integer)")))?;
    let signature = get(SIGNATURE_PARAM)?;

    Ok(PresignedParams {
        access_key_id,
        expires,
        signature,
    })
}

/// Verify a presigned URL request against the current time.
///
/// # Errors
///
/// Returns an [`AuthError`] if parameters are missing, the URL has expired,
/// the access key is unknown, or the signature does not match.
pub fn verify_presigned(
    parts: &http::request::Parts,
    resource: &str,
    credential_provider: &dyn CredentialProvider,
) -> Result<AuthResult, AuthError> {
    let parsed = parse_presigned_params(parts.uri.query().unwrap_or(""))?;

    debug!(
        access_key_id = %parsed.access_key_id,
        expires = parsed.expires,
        "Verifying presigned URL"
    );

    if Utc::now().timestamp() > parsed.expires {
        return Err(AuthError::RequestExpired);
    }

    let secret_key = credential_provider.get_secret_key(&parsed.access_key_id)?;
    let string_to_sign = string_to_sign(
        parts.method.as_str(),
        &parts.headers,
        &parsed.expires.to_string(),
        resource,
    );
    let expected_signature = compute_signature(&secret_key, &string_to_sign);

    if parsed
        .signature
        .as_bytes()
        .ct_eq(expected_signature.as_bytes())
        .into()
    {
        Ok(AuthResult {
            access_key_id: parsed.access_key_id,
            method: AuthMethod::Presigned,
        })
    } else {
        debug!(access_key_id = %parsed.access_key_id, "Presigned signature mismatch");
        Err(AuthError::SignatureDoesNotMatch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::StaticCredentialProvider;

    fn provider() -> StaticCredentialProvider {
        StaticCredentialProvider::new(vec![("ak".to_owned(), "sk".to_owned())])
    }

    fn parts_for(uri: &str) -> http::request::Parts {
        let (parts, ()) = http::Request::builder()
            .method("GET")
            .uri(uri)
            .body(())
            .expect("valid request")
            .into_parts();
        parts
    }

    #[test]
    fn test_should_detect_presigned_query() {
        assert!(is_presigned("OSSAccessKeyId=ak&Expires=1&Signature=x"));
        assert!(!is_presigned("prefix=OSSAccessKeyId"));
        assert!(!is_presigned(""));
    }

    #[test]
    fn test_should_verify_presigned_url() {
        let expires = Utc::now().timestamp() + 600;
        let params = presign("ak", "sk", "GET", &http::HeaderMap::new(), expires, "/b/k");

        let parts = parts_for(&format!("http://localhost/b/k?{}", params.to_query()));
        let result = verify_presigned(&parts, "/b/k", &provider()).expect("verified");
        assert_eq!(result.access_key_id, "ak");
        assert_eq!(result.method, AuthMethod::Presigned);
    }

    #[test]
    fn test_should_reject_expired_url() {
        let expires = Utc::now().timestamp() - 1;
        let params = presign("ak", "sk", "GET", &http::HeaderMap::new(), expires, "/b/k");

        let parts = parts_for(&format!("http://localhost/b/k?{}", params.to_query()));
        let result = verify_presigned(&parts, "/b/k", &provider());
        assert!(matches!(result, Err(AuthError::RequestExpired)));
    }

    #[test]
    fn test_should_reject_tampered_expiry() {
        let expires = Utc::now().timestamp() + 600;
        let mut params = presign("ak", "sk", "GET", &http::HeaderMap::new(), expires, "/b/k");
        params.expires += 1;

        let parts = parts_for(&format!("http://localhost/b/k?{}", params.to_query()));
        let result = verify_presigned(&parts, "/b/k", &provider());
        assert!(matches!(result, Err(AuthError::SignatureDoesNotMatch)));
    }

    #[test]
    fn test_should_report_missing_parameter() {
        let result = parse_presigned_params("OSSAccessKeyId=ak&Expires=10");
        assert!(matches!(result, Err(AuthError::MissingQueryParam(p)) if p == "Signature"));
    }
}
