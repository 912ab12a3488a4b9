//! The RustOSS server: an in-memory OSS endpoint over HTTP.
//!
//! The binary in `main.rs` reads [`OssConfig`] from the environment and
//! calls [`serve`]. Tests start the same stack on an ephemeral port.

pub mod handler;

use std::future::Future;
use std::sync::Arc;

use anyhow::Result;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as HttpConnBuilder;
use rustoss_auth::{CredentialProvider, StaticCredentialProvider};
use rustoss_core::{OssConfig, RustOss};
use rustoss_http::service::{OssHttpConfig, OssHttpService};
use tokio::net::TcpListener;
use tracing::{error, info, warn};

pub use crate::handler::RustOssHandler;

/// Build the HTTP layer configuration for a provider configuration.
///
/// The configured access key pair is the only accepted credential.
#[must_use]
pub fn build_http_config(config: &OssConfig) -> OssHttpConfig {
    let credential_provider: Arc<dyn CredentialProvider> =
        Arc::new(StaticCredentialProvider::new([(
            config.access_key_id.clone(),
            config.access_key_secret.clone(),
        )]));

    OssHttpConfig {
        domain: config.domain.clone(),
        virtual_hosting: config.virtual_hosting,
        skip_signature_validation: config.skip_signature_validation,
        region: config.region.clone(),
        max_body_size: config.max_body_size,
        credential_provider: Some(credential_provider),
    }
}

/// Build the complete service for a provider.
#[must_use]
pub fn build_service(provider: RustOss) -> OssHttpService<RustOssHandler> {
    let http_config = build_http_config(provider.config());
    OssHttpService::new(RustOssHandler(provider), http_config)
}

/// Run the accept loop until `shutdown` resolves, then drain connections.
pub async fn serve(
    listener: TcpListener,
    service: OssHttpService<RustOssHandler>,
    shutdown: impl Future<Output = ()>,
) -> Result<()> {
    let graceful = hyper_util::server::graceful::GracefulShutdown::new();
    let http = HttpConnBuilder::new(TokioExecutor::new());

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            result = listener.accept() => {
                let (stream, peer_addr) = match result {
                    Ok(conn) => conn,
                    Err(e) => {
                        warn!(error = %e, "failed to accept connection");
                        continue;
                    }
                };

                let conn = http.serve_connection(TokioIo::new(stream), service.clone());
                let conn = graceful.watch(conn.into_owned());

                tokio::spawn(async move {
                    if let Err(e) = conn.await {
                        error!(peer_addr = %peer_addr, error = %e, "connection error");
                    }
                });
            }

            () = &mut shutdown => {
                info!("shutting down gracefully");
                break;
            }
        }
    }

    graceful.shutdown().await;
    info!("all connections drained");
    Ok(())
}
