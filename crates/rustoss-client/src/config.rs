//! Configuration for [`OssClient`](crate::OssClient).

use std::time::Duration;

use typed_builder::TypedBuilder;

use crate::error::{ClientError, Result};

/// Default timeout for a single request: 30 seconds.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

fn default_user_agent() -> String {
    format!("rustoss-client/{}", env!("CARGO_PKG_VERSION"))
}

/// Endpoint and credentials of an OSS client.
///
/// # Examples
///
/// ```
/// use rustoss_client::ClientConfig;
///
/// let config = ClientConfig::builder()
///     .endpoint("http://127.0.0.1:9090")
///     .access_key_id("rustoss")
///     .access_key_secret("rustoss")
///     .build();
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, TypedBuilder)]
pub struct ClientConfig {
    /// Service endpoint, e.g. `http://127.0.0.1:9090`.
    #[builder(setter(into))]
    pub endpoint: String,
    /// Access key id used to sign requests.
    #[builder(setter(into))]
    pub access_key_id: String,
    /// Secret paired with `access_key_id`.
    #[builder(setter(into))]
    pub access_key_secret: String,
    /// Per-request timeout.
    #[builder(default = DEFAULT_TIMEOUT)]
    pub timeout: Duration,
    /// `User-Agent` sent with every request.
    #[builder(default = default_user_agent(), setter(into))]
    pub user_agent: String,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("endpoint", &self.endpoint)
            .field("access_key_id", &self.access_key_id)
            .field("access_key_secret", &"[REDACTED]")
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl ClientConfig {
    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.endpoint.is_empty() {
            return Err(ClientError::InvalidArgument("endpoint cannot be empty".into()));
        }
        if self.access_key_id.is_empty() {
            return Err(ClientError::InvalidArgument("access_key_id cannot be empty".into()));
        }
        if self.timeout.is_zero() {
            return Err(ClientError::InvalidArgument("timeout cannot be zero".into()));
        }
        Ok(())
    }
}
