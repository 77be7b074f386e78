//! Network configuration for the sponsor SDK.
//!
//! A [`SuiConfig`] names the ledger RPC endpoint and, optionally, the sponsor
//! service the client asks for gas. Presets exist for the public networks
//! and for a local node.

use crate::error::SponsorResult;
use crate::retry::RetryConfig;
use std::time::Duration;
use url::Url;

/// Known networks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Network {
    /// Public mainnet
    Mainnet,
    /// Public testnet
    Testnet,
    /// Public devnet
    Devnet,
    /// A node on localhost
    Localnet,
    /// Any other endpoint
    Custom,
}

impl Network {
    /// Returns the network name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
            Network::Devnet => "devnet",
            Network::Localnet => "localnet",
            Network::Custom => "custom",
        }
    }

    /// Returns the default JSON-RPC endpoint, if the network has one.
    pub fn default_rpc_url(&self) -> Option<&'static str> {
        match self {
            Network::Mainnet => Some("https://fullnode.mainnet.sui.io:443"),
            Network::Testnet => Some("https://fullnode.testnet.sui.io:443"),
            Network::Devnet => Some("https://fullnode.devnet.sui.io:443"),
            Network::Localnet => Some("http://127.0.0.1:9000"),
            Network::Custom => None,
        }
    }
}

impl std::str::FromStr for Network {
    type Err = crate::error::SponsorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" => Ok(Network::Mainnet),
            "testnet" => Ok(Network::Testnet),
            "devnet" => Ok(Network::Devnet),
            "localnet" | "local" => Ok(Network::Localnet),
            other => Err(crate::error::SponsorError::Config(format!(
                "unknown network '{other}'"
            ))),
        }
    }
}

/// Client configuration.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use sui_sponsor_sdk::SuiConfig;
/// use sui_sponsor_sdk::retry::RetryConfig;
///
/// let config = SuiConfig::testnet()
///     .with_timeout(Duration::from_secs(10))
///     .with_retry(RetryConfig::aggressive());
/// assert!(config.rpc_url().unwrap().as_str().contains("testnet"));
/// ```
#[derive(Debug, Clone)]
pub struct SuiConfig {
    pub(crate) network: Network,
    pub(crate) rpc_url: String,
    pub(crate) sponsor_url: Option<String>,
    pub(crate) timeout: Duration,
    pub(crate) retry_config: RetryConfig,
    pub(crate) max_idle_connections: Option<usize>,
}

impl Default for SuiConfig {
    fn default() -> Self {
        Self::testnet()
    }
}

impl SuiConfig {
    fn preset(network: Network, retry_config: RetryConfig) -> Self {
        Self {
            network,
            rpc_url: network.default_rpc_url().unwrap_or_default().to_string(),
            sponsor_url: None,
            timeout: Duration::from_secs(30),
            retry_config,
            max_idle_connections: None,
        }
    }

    /// Mainnet, with conservative retries.
    pub fn mainnet() -> Self {
        Self::preset(Network::Mainnet, RetryConfig::conservative())
    }

    /// Testnet.
    pub fn testnet() -> Self {
        Self::preset(Network::Testnet, RetryConfig::default())
    }

    /// Devnet.
    pub fn devnet() -> Self {
        Self::preset(Network::Devnet, RetryConfig::default())
    }

    /// A local node on the default port 9000. Short timeout, eager retries.
    pub fn localnet() -> Self {
        Self::preset(Network::Localnet, RetryConfig::aggressive())
            .with_timeout(Duration::from_secs(10))
            .with_max_idle_connections(8)
    }

    /// A custom endpoint.
    pub fn custom(rpc_url: &str) -> SponsorResult<Self> {
        Url::parse(rpc_url)?;
        Ok(Self {
            rpc_url: rpc_url.to_string(),
            ..Self::preset(Network::Custom, RetryConfig::default())
        })
    }

    /// Looks up a preset by network name, or treats `name` as a URL.
    pub fn from_name_or_url(name: &str) -> SponsorResult<Self> {
        match name.parse::<Network>() {
            Ok(Network::Mainnet) => Ok(Self::mainnet()),
            Ok(Network::Testnet) => Ok(Self::testnet()),
            Ok(Network::Devnet) => Ok(Self::devnet()),
            Ok(Network::Localnet) => Ok(Self::localnet()),
            Ok(Network::Custom) | Err(_) => Self::custom(name),
        }
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the retry policy.
    #[must_use]
    pub fn with_retry(mut self, retry_config: RetryConfig) -> Self {
        self.retry_config = retry_config;
        self
    }

    /// Disables retries.
    #[must_use]
    pub fn without_retry(mut self) -> Self {
        self.retry_config = RetryConfig::no_retry();
        self
    }

    /// Caps the idle connections kept open to the fullnode.
    #[must_use]
    pub fn with_max_idle_connections(mut self, max: usize) -> Self {
        self.max_idle_connections = Some(max);
        self
    }

    /// Sets the sponsor service base URL.
    pub fn with_sponsor_url(mut self, url: &str) -> SponsorResult<Self> {
        Url::parse(url)?;
        self.sponsor_url = Some(url.to_string());
        Ok(self)
    }

    /// Returns the network.
    pub fn network(&self) -> Network {
        self.network
    }

    /// Returns the ledger JSON-RPC endpoint.
    pub fn rpc_url(&self) -> SponsorResult<Url> {
        Ok(Url::parse(&self.rpc_url)?)
    }

    /// Returns the sponsor service base URL, if configured.
    pub fn sponsor_url(&self) -> SponsorResult<Option<Url>> {
        self.sponsor_url
            .as_deref()
            .map(|url| Url::parse(url).map_err(Into::into))
            .transpose()
    }

    /// Returns the request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the retry policy.
    pub fn retry_config(&self) -> &RetryConfig {
        &self.retry_config
    }

    pub(crate) fn http_client(&self) -> SponsorResult<reqwest::Client> {
        let builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .tcp_nodelay(true);
        let builder = match self.max_idle_connections {
            Some(max) => builder.pool_max_idle_per_host(max),
            None => builder,
        };
        Ok(builder.build()?)
    }
}
