//! Infoblox Provider
//!
//! Plugin binary serving two resource types to a declarative engine:
//! - infoblox_network: claims a fixed network or allocates the next free subnet
//! - infoblox_srv_record: manages an SRV record in a DNS view
//!
//! The engine launches the binary, reads the handshake line, then speaks
//! newline-delimited JSON over stdin/stdout. Logs go to stderr.

mod adapter;
mod config;
mod error;
mod protocol;
mod registry;
mod server;
#[cfg(test)]
mod test_utils;

use anyhow::Context;
use config::ProviderConfig;
use server::Provider;
use std::sync::Arc;
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::EnvFilter;

const MAGIC_COOKIE_KEY: &str = "INFOBLOX_PLUGIN_MAGIC_COOKIE";
const MAGIC_COOKIE_VALUE: &str = "3c4f7b1e9a2d46e8b05f1c7d9e3a6b24";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if std::env::var(MAGIC_COOKIE_KEY).ok().as_deref() != Some(MAGIC_COOKIE_VALUE) {
        eprintln!(
            "This binary is a plugin. It is not meant to be executed directly.\n\
             Run the program that consumes this plugin, which will load it automatically."
        );
        std::process::exit(1);
    }

    // stdout carries the protocol
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    info!("Starting Infoblox Provider {}", env!("CARGO_PKG_VERSION"));

    let config = ProviderConfig::from_env().context("Failed to load provider configuration")?;

    info!("Configuration:");
    info!(
        "  Server: {}",
        if config.server.is_empty() { "(from provider block)" } else { config.server.as_str() }
    );
    info!("  WAPI version: {}", config.wapi_version);
    info!("  SSL verify: {}", config.sslverify);

    let provider = Arc::new(Provider::new(config));
    server::serve(provider, BufReader::new(tokio::io::stdin()), tokio::io::stdout()).await?;

    info!("Infoblox Provider stopped");
    Ok(())
}
