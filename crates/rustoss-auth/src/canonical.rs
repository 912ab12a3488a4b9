//! Construction of the OSS string to sign.
//!
//! ```text
//! StringToSign = VERB + "\n"
//!              + Content-MD5 + "\n"
//!              + Content-Type + "\n"
//!              + Date + "\n"
//!              + CanonicalizedOSSHeaders
//!              + CanonicalizedResource
//! ```
//!
//! Presigned URLs put the `Expires` epoch seconds in the `Date` slot.

use std::collections::BTreeMap;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};

/// Characters escaped in query keys and values.
pub const QUERY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Characters escaped in object keys placed in a URL path; `/` is kept.
pub const KEY_ENCODE_SET: &AsciiSet = &QUERY_ENCODE_SET.remove(b'/');

/// Query parameters that are part of the canonicalized resource.
///
/// Sorted so membership can use a binary search.
pub const SIGNED_SUB_RESOURCES: &[&str] = &[
    "acl",
    "append",
    "bucketInfo",
    "cname",
    "comp",
    "cors",
    "delete",
    "lifecycle",
    "location",
    "logging",
    "objectMeta",
    "partNumber",
    "position",
    "referer",
    "response-cache-control",
    "response-content-disposition",
    "response-content-encoding",
    "response-content-language",
    "response-content-type",
    "response-expires",
    "security-token",
    "symlink",
    "tagging",
    "uploadId",
    "uploads",
    "website",
    "x-oss-process",
];

/// Whether a query key is signed as a sub-resource.
#[must_use]
pub fn is_sub_resource(key: &str) -> bool {
    SIGNED_SUB_RESOURCES.binary_search(&key).is_ok()
}

/// Build the `CanonicalizedOSSHeaders` block.
///
/// Every `x-oss-*` header is lowercased, sorted and written as `name:value\n`;
/// repeated headers are joined with commas.
#[must_use]
pub fn canonicalized_oss_headers(headers: &http::HeaderMap) -> String {
    let mut oss_headers: BTreeMap<&str, Vec<String>> = BTreeMap::new();

    for (name, value) in headers {
        let name_str = name.as_str();
        if name_str.starts_with("x-oss-") {
            let val = String::from_utf8_lossy(value.as_bytes()).trim().to_owned();
            oss_headers.entry(name_str).or_default().push(val);
        }
    }

    let mut result = String::new();
    for (name, values) in &oss_headers {
        result.push_str(name);
        result.push(':');
        result.push_str(&values.join(","));
        result.push('\n');
    }
    result
}

/// Build the `CanonicalizedResource` for a bucket and key.
///
/// `params` are decoded query pairs; only sub-resources are kept, sorted by
/// name, and an empty value is written as the bare name.
pub fn canonicalized_resource<'a>(
    bucket: Option<&str>,
    key: Option<&str>,
    params: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> String {
    let mut resource = match bucket {
        Some(bucket) => format!("/{bucket}/{}", key.unwrap_or_default()),
        None => "/".to_owned(),
    };

    let mut sub_params: Vec<(&str, &str)> = params
        .into_iter()
        .filter(|(k, _)| is_sub_resource(k))
        .collect();
    sub_params.sort_unstable_by(|a, b| a.0.cmp(b.0));

    for (i, (k, v)) in sub_params.iter().enumerate() {
        resource.push(if i == 0 { '?' } else { '&' });
        resource.push_str(k);
        if !v.is_empty() {
            resource.push('=');
            resource.push_str(v);
        }
    }
    resource
}

/// Decode a raw query string into `(key, value)` pairs.
#[must_use]
pub fn decode_query(query: &str) -> Vec<(String, String)> {
    query
        .split('&')
        .filter(|s| !s.is_empty())
        .map(|param| {
            let (k, v) = param.split_once('=').unwrap_or((param, ""));
            (url_decode(k), url_decode(v))
        })
        .collect()
}

fn url_decode(s: &str) -> String {
    percent_encoding::percent_decode_str(s)
        .decode_utf8_lossy()
        .into_owned()
}

/// Assemble the full string to sign.
///
/// `date` is the `Date` header for header signatures and the `Expires` value
/// for presigned URLs.
#[must_use]
pub fn string_to_sign(method: &str, headers: &http::HeaderMap, date: &str, resource: &str) -> String {
    let content_md5 = header_value(headers, "content-md5");
    let content_type = header_value(headers, "content-type");
    let oss_headers = canonicalized_oss_headers(headers);

    format!("{method}\n{content_md5}\n{content_type}\n{date}\n{oss_headers}{resource}")
}

pub(crate) fn header_value<'a>(headers: &'a http::HeaderMap, name: &str) -> &'a str {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}
