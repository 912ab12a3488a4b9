//! OSS service configuration.
//!
//! Provides [`OssConfig`] for configuring the RustOSS service. Values are
//! loaded from environment variables by [`OssConfig::from_env`].

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// Regions served when `OSS_SUPPORTED_REGIONS` is not set.
pub const DEFAULT_SUPPORTED_REGIONS: &[&str] = &[
    "oss-cn-hangzhou",
    "oss-cn-shanghai",
    "oss-cn-qingdao",
    "oss-cn-beijing",
    "oss-cn-shenzhen",
    "oss-cn-hongkong",
];

/// Largest request body accepted when `OSS_MAX_BODY_SIZE` is not set: 5 GiB,
/// the single PutObject limit.
pub const DEFAULT_MAX_BODY_SIZE: u64 = 5 * 1024 * 1024 * 1024;

/// OSS service configuration.
///
/// # Examples
///
/// ```
/// use rustoss_core::config::OssConfig;
///
/// let config = OssConfig::default();
/// assert_eq!(config.gateway_listen, "0.0.0.0:9090");
/// assert_eq!(config.region, "oss-cn-hangzhou");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct OssConfig {
    /// Bind address for the gateway (e.g. `"0.0.0.0:9090"`).
    #[builder(default = String::from("0.0.0.0:9090"))]
    pub gateway_listen: String,

    /// Region of this endpoint; buckets can only be created here.
    #[builder(default = String::from("oss-cn-hangzhou"))]
    pub region: String,

    /// Location constraints accepted by CreateBucket.
    #[builder(default = default_supported_regions())]
    pub supported_regions: Vec<String>,

    /// Domain for virtual-hosted-style addressing (`{bucket}.{domain}`).
    #[builder(default = String::from("oss.localhost"))]
    pub domain: String,

    /// Whether virtual-hosted-style addressing is enabled.
    #[builder(default = true)]
    pub virtual_hosting: bool,

    /// Maximum number of buckets a single owner may hold.
    #[builder(default = 100)]
    pub max_buckets: usize,

    /// Largest request body in bytes; larger uploads fail with `EntityTooLarge`.
    #[builder(default = DEFAULT_MAX_BODY_SIZE)]
    pub max_body_size: u64,

    /// Access key id accepted by the service.
    #[builder(default = String::from("rustoss"))]
    pub access_key_id: String,

    /// Secret paired with `access_key_id`.
    #[builder(default = String::from("rustoss"))]
    #[serde(skip_serializing, default)]
    pub access_key_secret: String,

    /// Whether to skip signature validation on incoming requests.
    #[builder(default = false)]
    pub skip_signature_validation: bool,

    /// Log level filter string (e.g. `"info"`, `"debug"`).
    #[builder(default = String::from("info"))]
    pub log_level: String,
}

fn default_supported_regions() -> Vec<String> {
    DEFAULT_SUPPORTED_REGIONS
        .iter()
        .map(|r| (*r).to_owned())
        .collect()
}

impl Default for OssConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl OssConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `GATEWAY_LISTEN` | `0.0.0.0:9090` |
    /// | `OSS_REGION` | `oss-cn-hangzhou` |
    /// | `OSS_SUPPORTED_REGIONS` | comma separated, see [`DEFAULT_SUPPORTED_REGIONS`] |
    /// | `OSS_DOMAIN` | `oss.localhost` |
    /// | `OSS_VIRTUAL_HOSTING` | `true` |
    /// | `OSS_MAX_BUCKETS` | `100` |
    /// | `OSS_MAX_BODY_SIZE` | 5 GiB |
    /// | `OSS_ACCESS_KEY_ID` | `rustoss` |
    /// | `OSS_ACCESS_KEY_SECRET` | `rustoss` |
    /// | `OSS_SKIP_SIGNATURE_VALIDATION` | `false` |
    /// | `LOG_LEVEL` | `info` |
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(v) = std::env::var("GATEWAY_LISTEN") {
            config.gateway_listen = v;
        }
        if let Ok(v) = std::env::var("OSS_REGION") {
            config.region = v;
        }
        if let Ok(v) = std::env::var("OSS_SUPPORTED_REGIONS") {
            config.supported_regions = parse_list(&v);
        }
        if let Ok(v) = std::env::var("OSS_DOMAIN") {
            config.domain = v;
        }
        if let Ok(v) = std::env::var("OSS_VIRTUAL_HOSTING") {
            config.virtual_hosting = parse_bool(&v);
        }
        if let Ok(v) = std::env::var("OSS_MAX_BUCKETS") {
            if let Ok(n) = v.parse::<usize>() {
                config.max_buckets = n;
            }
        }
        if let Ok(v) = std::env::var("OSS_MAX_BODY_SIZE") {
            if let Ok(n) = v.parse::<u64>() {
                config.max_body_size = n;
            }
        }
        if let Ok(v) = std::env::var("OSS_ACCESS_KEY_ID") {
            config.access_key_id = v;
        }
        if let Ok(v) = std::env::var("OSS_ACCESS_KEY_SECRET") {
            config.access_key_secret = v;
        }
        if let Ok(v) = std::env::var("OSS_SKIP_SIGNATURE_VALIDATION") {
            config.skip_signature_validation = parse_bool(&v);
        }
        if let Ok(v) = std::env::var("LOG_LEVEL") {
            config.log_level = v;
        }

        config
    }

    /// Whether CreateBucket accepts this location constraint.
    #[must_use]
    pub fn is_supported_region(&self, region: &str) -> bool {
        self.supported_regions.iter().any(|r| r == region)
    }
}

/// Parse a string as a boolean, accepting `"1"` and `"true"` (case-insensitive).
fn parse_bool(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}
