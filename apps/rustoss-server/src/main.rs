//! RustOSS server binary.
//!
//! # Usage
//!
//! ```text
//! GATEWAY_LISTEN=0.0.0.0:9090 rustoss-server
//! ```
//!
//! Configuration is read by [`OssConfig::from_env`]. `RUST_LOG`, when set,
//! overrides `LOG_LEVEL`.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use rustoss_core::{OssConfig, RustOss};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = OssConfig::from_env();
    init_tracing(&config.log_level)?;

    info!(
        gateway_listen = %config.gateway_listen,
        region = %config.region,
        domain = %config.domain,
        virtual_hosting = config.virtual_hosting,
        skip_signature_validation = config.skip_signature_validation,
        version = VERSION,
        "starting RustOSS server",
    );

    let addr: SocketAddr = config
        .gateway_listen
        .parse()
        .with_context(|| format!("invalid bind address: {}", config.gateway_listen))?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;
    info!(%addr, "listening for connections");

    let service = rustoss_server::build_service(RustOss::new(config));
    let shutdown = async {
        tokio::signal::ctrl_c().await.ok();
        info!("received shutdown signal, draining connections");
    };
    rustoss_server::serve(listener, service, shutdown).await
}
