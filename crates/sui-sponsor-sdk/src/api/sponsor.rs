//! HTTP client for a remote sponsor service.

use crate::config::SuiConfig;
use crate::error::{SponsorError, SponsorResult};
use crate::retry::{RetryConfig, RetryExecutor};
use crate::transaction::{GasRequest, GasResponse, MISSING_FIELDS_MESSAGE, SponsorBackend};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use url::Url;

/// Error body returned by a sponsor.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Client for a sponsor's `POST /gas` endpoint.
///
/// Only transport failures and gateway errors are retried. A sponsor that
/// answers 500 because it has no coins will not gain any by being asked again.
///
/// # Example
///
/// ```rust,no_run
/// use sui_sponsor_sdk::api::SponsorClient;
/// use sui_sponsor_sdk::SuiConfig;
///
/// let config = SuiConfig::testnet().with_sponsor_url("http://localhost:3000/api").unwrap();
/// let sponsor = SponsorClient::new(&config).unwrap();
/// assert!(sponsor.gas_url().as_str().ends_with("/api/gas"));
/// ```
#[derive(Debug, Clone)]
pub struct SponsorClient {
    gas_url: Url,
    client: Client,
    retry_config: Arc<RetryConfig>,
}

impl SponsorClient {
    /// Creates a client for the sponsor configured in `config`.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error if no sponsor URL is set.
    pub fn new(config: &SuiConfig) -> SponsorResult<Self> {
        let base = config
            .sponsor_url()?
            .ok_or_else(|| SponsorError::Config("no sponsor URL configured".into()))?;
        Self::with_client(&base, config.http_client()?, config.retry_config().clone())
    }

    /// Creates a client for the sponsor at `base_url` with default settings.
    pub fn from_url(base_url: &str) -> SponsorResult<Self> {
        let config = SuiConfig::testnet().with_sponsor_url(base_url)?;
        Self::new(&config)
    }

    fn with_client(base: &Url, client: Client, retry_config: RetryConfig) -> SponsorResult<Self> {
        let mut base = base.clone();
        if !base.path().ends_with('/') {
            base.set_path(&format!("{}/", base.path()));
        }
        Ok(Self {
            gas_url: base.join("gas")?,
            client,
            retry_config: Arc::new(retry_config),
        })
    }

    /// Returns the gas endpoint URL.
    pub fn gas_url(&self) -> &Url {
        &self.gas_url
    }

    async fn post_gas(&self, request: &GasRequest) -> SponsorResult<GasResponse> {
        let response = self
            .client
            .post(self.gas_url.clone())
            .json(request)
            .send()
            .await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let code = status.as_u16();
        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.error,
            Err(_) => status.to_string(),
        };
        Err(match code {
            400 => SponsorError::BadRequest(message),
            500 if message.starts_with("Sponsor has no") => SponsorError::InsufficientGas {
                owner: String::from("remote sponsor"),
                coin_symbol: message
                    .trim_start_matches("Sponsor has no ")
                    .trim_end_matches(" for gas")
                    .to_string(),
                detail: message.clone(),
            },
            _ => SponsorError::api(code, message),
        })
    }
}

#[async_trait]
impl SponsorBackend for SponsorClient {
    async fn request_gas(&self, request: GasRequest) -> SponsorResult<GasResponse> {
        if request.tx_bytes.as_ref().is_none_or(Vec::is_empty)
            || request.sender_address.as_deref().is_none_or(str::is_empty)
        {
            return Err(SponsorError::BadRequest(MISSING_FIELDS_MESSAGE.into()));
        }
        let executor = RetryExecutor::new((*self.retry_config).clone());
        let response = executor
            .execute_with_predicate(
                || self.post_gas(&request),
                |e| match e {
                    SponsorError::Http(_) => e.is_retryable(),
                    SponsorError::Api { status_code, .. } => {
                        matches!(status_code, 429 | 502 | 503 | 504)
                    }
                    _ => false,
                },
            )
            .await?;
        tracing::debug!(
            fee_payer = %response.fee_payer_address,
            bytes = response.sponsored_bytes.len(),
            "received sponsorship"
        );
        Ok(response)
    }
}
