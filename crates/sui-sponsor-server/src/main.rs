//! Sui sponsor server - pays gas for other people's transactions.
//!
//! Clients `POST` their gas-less transaction bytes and sender address to the
//! gas endpoint. The server attaches one of its own coins as payment, names
//! itself gas owner, signs, and returns the completed bytes with its
//! signature. The client then signs the same bytes and submits both
//! signatures itself.

mod config;
mod routes;

use anyhow::{Context, Result};
use clap::Parser;
use config::ServerConfig;
use std::sync::Arc;
use sui_sponsor_sdk::api::SuiRpcClient;
use sui_sponsor_sdk::transaction::GasStation;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    let config = ServerConfig::parse();
    let sui_config = config.sui_config()?;
    let rpc_url = sui_config.rpc_url()?;
    let rpc = SuiRpcClient::new(sui_config)?;
    let station = GasStation::new(config.keypair()?, rpc)
        .with_gas_budget(config.gas_budget)
        .with_coin_type(config.coin_type.clone())
        .with_reservation_ttl(config.reservation_ttl());

    let gas_path = config.gas_path();
    tracing::info!(
        fee_payer = %station.address(),
        rpc = %rpc_url,
        coin_type = station.coin_type(),
        gas_budget = station.gas_budget(),
        "sponsor ready"
    );

    let app = routes::router(Arc::new(station), &gas_path);
    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;
    tracing::info!(addr = %config.bind, path = %gas_path, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    tracing::info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
