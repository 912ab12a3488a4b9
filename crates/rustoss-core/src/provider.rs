//! The OSS provider.
//!
//! [`RustOss`] owns the bucket namespace and the endpoint configuration. Operations are implemented as `handle_*` methods in the
//! [`crate::ops`] submodules.

use std::sync::Arc;

use rustoss_model::types::Owner;

use crate::config::OssConfig;
use crate::state::OssServiceState;

/// The OSS provider for one endpoint.
///
/// Cloning is cheap; clones share state.
///
/// # Examples
///
/// ```
/// use rustoss_core::RustOss;
/// use rustoss_core::config::OssConfig;
///
/// let provider = RustOss::new(OssConfig::default());
/// assert_eq!(provider.config().region, "oss-cn-hangzhou");
/// ```
#[derive(Debug, Clone)]
pub struct RustOss {
    pub(crate) state: Arc<OssServiceState>,
    pub(crate) config: Arc<OssConfig>,
}

impl RustOss {
    /// Create a provider with its own empty namespace.
    #[must_use]
    pub fn new(config: OssConfig) -> Self {
        Self {
            state: Arc::new(OssServiceState::new(&config.region)),
            config: Arc::new(config),
        }
    }

    /// Create a provider for another endpoint that shares `other`'s buckets.
    ///
    /// Used to serve several regions from one namespace.
    #[must_use]
    pub fn sharing_state_with(config: OssConfig, other: &Self) -> Self {
        Self {
            state: Arc::clone(&other.state),
            config: Arc::new(config),
        }
    }

    /// Returns the bucket namespace.
    #[must_use]
    pub fn state(&self) -> &OssServiceState {
        &self.state
    }

    /// Returns the endpoint configuration.
    #[must_use]
    pub fn config(&self) -> &OssConfig {
        &self.config
    }

    /// The owner a request acts as: the verified access key, or the
    /// configured one for unsigned requests.
    pub(crate) fn requester(&self, requester: Option<&str>) -> Owner {
        Owner::from_access_key(requester.unwrap_or(&self.config.access_key_id))
    }

    /// Drop all buckets and their contents.
    pub fn reset(&self) {
        self.state.reset(&self.config.region);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::RESERVED_BUCKET;

    #[test]
    fn test_should_create_provider_with_defaults() {
        let provider = RustOss::new(OssConfig::default());
        assert_eq!(provider.config().gateway_listen, "0.0.0.0:9090");
        assert!(provider.state().bucket_exists(RESERVED_BUCKET));
    }

    #[test]
    fn test_should_share_namespace_between_endpoints() {
        let hangzhou = RustOss::new(OssConfig::default());
        let qingdao = RustOss::sharing_state_with(
            OssConfig::builder().region("oss-cn-qingdao".to_owned()).build(),
            &hangzhou,
        );
        hangzhou
            .state()
            .create_bucket("shared", "oss-cn-hangzhou", &Owner::from_access_key("ak"), 10)
            .expect("create");
        assert!(qingdao.state().bucket_exists("shared"));
        assert_eq!(qingdao.config().region, "oss-cn-qingdao");
    }

    #[test]
    fn test_should_fall_back_to_configured_requester() {
        let provider = RustOss::new(OssConfig::default());
        assert_eq!(provider.requester(None).id, "rustoss");
        assert_eq!(provider.requester(Some("alice")).id, "alice");
    }

    #[test]
    fn test_should_reset_state() {
        let provider = RustOss::new(OssConfig::default());
        provider
            .state()
            .create_bucket("test", "oss-cn-hangzhou", &Owner::from_access_key("ak"), 10)
            .expect("create");
        provider.reset();
        assert!(!provider.state().bucket_exists("test"));
        assert!(provider.state().bucket_exists(RESERVED_BUCKET));
    }
}
