//! Command-line and environment configuration.

use anyhow::{Context, Result};
use clap::Parser;
use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;
use sui_sponsor_sdk::SuiConfig;
use sui_sponsor_sdk::crypto::SuiKeyPair;
use sui_sponsor_sdk::transaction::{DEFAULT_GAS_BUDGET, SUI_COIN_TYPE};

/// Fee-payer service for sponsored Sui transactions.
#[derive(Parser, Clone)]
#[command(name = "sui-sponsor-server", version, about, long_about = None)]
pub struct ServerConfig {
    /// Fullnode JSON-RPC URL, or one of mainnet, testnet, devnet, localnet
    #[arg(long, env = "SUI_RPC_URL", default_value = "testnet")]
    pub rpc_url: String,

    /// Sponsor private key: suiprivkey1..., base64 flag||secret, or hex Ed25519 seed
    #[arg(long, env = "FEE_PAYER_PRIVATE_KEY", hide_env_values = true)]
    pub fee_payer_key: String,

    /// Address to listen on
    #[arg(long, env = "SPONSOR_BIND", default_value = "0.0.0.0:3000")]
    pub bind: SocketAddr,

    /// Path prefix under which `/gas` is served
    #[arg(long, env = "SPONSOR_BASE_PATH", default_value = "/api")]
    pub base_path: String,

    /// Gas budget attached to every sponsored transaction
    #[arg(long, env = "SPONSOR_GAS_BUDGET", default_value_t = DEFAULT_GAS_BUDGET)]
    pub gas_budget: u64,

    /// Fee coin type
    #[arg(long, env = "SPONSOR_COIN_TYPE", default_value = SUI_COIN_TYPE)]
    pub coin_type: String,

    /// Seconds a handed-out gas coin stays reserved
    #[arg(long, env = "SPONSOR_RESERVATION_TTL", default_value_t = 30)]
    pub reservation_ttl_secs: u64,

    /// Fullnode request timeout in seconds
    #[arg(long, env = "SUI_RPC_TIMEOUT", default_value_t = 30)]
    pub rpc_timeout_secs: u64,
}

impl ServerConfig {
    /// Builds the fullnode client configuration.
    pub fn sui_config(&self) -> Result<SuiConfig> {
        let config = SuiConfig::from_name_or_url(&self.rpc_url)
            .with_context(|| format!("invalid --rpc-url {:?}", self.rpc_url))?;
        Ok(config.with_timeout(Duration::from_secs(self.rpc_timeout_secs)))
    }

    /// Decodes the sponsor key.
    pub fn keypair(&self) -> Result<SuiKeyPair> {
        SuiKeyPair::decode(&self.fee_payer_key).context("invalid FEE_PAYER_PRIVATE_KEY")
    }

    /// Full path of the gas endpoint, e.g. `/api/gas`.
    pub fn gas_path(&self) -> String {
        let base = self.base_path.trim_end_matches('/');
        if base.is_empty() || base.starts_with('/') {
            format!("{base}/gas")
        } else {
            format!("/{base}/gas")
        }
    }

    /// How long a coin stays reserved after being handed out.
    pub fn reservation_ttl(&self) -> Duration {
        Duration::from_secs(self.reservation_ttl_secs)
    }
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("rpc_url", &self.rpc_url)
            .field("fee_payer_key", &"<redacted>")
            .field("bind", &self.bind)
            .field("base_path", &self.base_path)
            .field("gas_budget", &self.gas_budget)
            .field("coin_type", &self.coin_type)
            .field("reservation_ttl_secs", &self.reservation_ttl_secs)
            .field("rpc_timeout_secs", &self.rpc_timeout_secs)
            .finish()
    }
}
