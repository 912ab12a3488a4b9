//! Integration tests for the RustOSS server and client.
//!
//! Every test starts its own server on an ephemeral port, so the tests need
//! no external process and never share buckets:
//!
//! ```text
//! cargo test -p rustoss-integration
//! ```

use std::sync::Once;

use rustoss_client::{ClientConfig, OssClient};
use rustoss_core::{OssConfig, RustOss};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

static INIT: Once = Once::new();

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Default region of test servers.
pub const REGION: &str = "oss-cn-hangzhou";

/// A server running on `127.0.0.1` for the duration of one test.
pub struct TestServer {
    /// Base URL, e.g. `http://127.0.0.1:41234`.
    pub endpoint: String,
    /// The provider behind the server.
    pub provider: RustOss,
    /// A client signed with the server's access key.
    pub client: OssClient,
    shutdown: Option<oneshot::Sender<()>>,
}

impl TestServer {
    /// Start a server with the default configuration.
    pub async fn start() -> Self {
        Self::with_provider(RustOss::new(OssConfig::default())).await
    }

    /// Start a server in `region` that shares `other`'s buckets.
    pub async fn sharing_with(other: &Self, region: &str) -> Self {
        let config = OssConfig::builder().region(region.to_owned()).build();
        Self::with_provider(RustOss::sharing_state_with(config, &other.provider)).await
    }

    /// Start a server for `provider`.
    pub async fn with_provider(provider: RustOss) -> Self {
        init_tracing();

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let addr = listener.local_addr().expect("local address");
        let (tx, rx) = oneshot::channel();

        let service = rustoss_server::build_service(provider.clone());
        tokio::spawn(async move {
            let shutdown = async {
                let _ = rx.await;
            };
            if let Err(e) = rustoss_server::serve(listener, service, shutdown).await {
                tracing::error!(error = %e, "test server failed");
            }
        });

        let endpoint = format!("http://{addr}");
        let config = provider.config();
        let client = client_for(&endpoint, &config.access_key_id, &config.access_key_secret);
        Self {
            endpoint,
            provider,
            client,
            shutdown: Some(tx),
        }
    }

    /// Create a uniquely named bucket and return its name.
    pub async fn create_bucket(&self, prefix: &str) -> String {
        let name = test_bucket_name(prefix);
        self.client
            .create_bucket(&name)
            .await
            .unwrap_or_else(|e| panic!("failed to create bucket {name}: {e}"));
        name
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

/// Create a client for `endpoint` signed with the given key pair.
#[must_use]
pub fn client_for(endpoint: &str, access_key_id: &str, access_key_secret: &str) -> OssClient {
    let config = ClientConfig::builder()
        .endpoint(endpoint)
        .access_key_id(access_key_id)
        .access_key_secret(access_key_secret)
        .build();
    OssClient::new(config).expect("valid client config")
}

/// Generate a unique bucket name for a test.
#[must_use]
pub fn test_bucket_name(prefix: &str) -> String {
    let id = uuid::Uuid::new_v4().simple().to_string()[..8].to_owned();
    format!("test-{prefix}-{id}")
}

mod test_bucket;
mod test_config;
mod test_list;
mod test_multipart;
mod test_object;
mod test_presigned;
