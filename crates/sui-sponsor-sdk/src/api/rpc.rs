//! Fullnode JSON-RPC client.

use crate::api::response::{
    CoinPage, DevInspectResponse, ExecuteResponse, ObjectResponse, RpcRequest, RpcResponse,
    u64_lenient,
};
use crate::api::{
    CoinProvider, ExecutionOutcome, ExecutionService, ExecutionStatus, InspectOutcome,
    ObjectResolver,
};
use crate::config::SuiConfig;
use crate::error::{SponsorError, SponsorResult};
use crate::retry::{RetryConfig, RetryExecutor};
use crate::transaction::SignedEnvelope;
use crate::types::{Coin, ObjectId, ResolvedObject, SuiAddress};
use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use url::Url;

const JSON_CONTENT_TYPE: &str = "application/json";

/// Upper bound on coin pages read for one owner.
const MAX_COIN_PAGES: usize = 20;

/// Client for a fullnode's JSON-RPC 2.0 endpoint.
///
/// Read calls are retried with exponential backoff for transient failures,
/// as configured by [`SuiConfig::with_retry`]. Submission is never retried.
///
/// # Example
///
/// ```rust,no_run
/// use sui_sponsor_sdk::api::SuiRpcClient;
/// use sui_sponsor_sdk::SuiConfig;
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let client = SuiRpcClient::new(SuiConfig::testnet())?;
///     let price = client.get_reference_gas_price().await?;
///     println!("reference gas price: {price}");
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct SuiRpcClient {
    url: Url,
    client: Client,
    retry_config: Arc<RetryConfig>,
    next_id: Arc<AtomicU64>,
}

impl SuiRpcClient {
    /// Creates a client for the configured fullnode.
    ///
    /// # Errors
    ///
    /// Returns an error if the RPC URL is invalid or the HTTP client fails to build.
    pub fn new(config: SuiConfig) -> SponsorResult<Self> {
        Ok(Self {
            url: config.rpc_url()?,
            client: config.http_client()?,
            retry_config: Arc::new(config.retry_config().clone()),
            next_id: Arc::new(AtomicU64::new(1)),
        })
    }

    /// Returns the fullnode URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Returns the retry configuration.
    pub fn retry_config(&self) -> &RetryConfig {
        &self.retry_config
    }

    /// Calls `method` with `params`, retrying transient failures.
    pub async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> SponsorResult<T> {
        let result = self.call_raw(method, params, true).await?;
        Ok(serde_json::from_value(result)?)
    }

    async fn call_raw(&self, method: &str, params: Value, retry: bool) -> SponsorResult<Value> {
        let executor = RetryExecutor::new(if retry {
            (*self.retry_config).clone()
        } else {
            RetryConfig::no_retry()
        });
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(method, id, "ledger rpc call");

        executor
            .execute(|| {
                let client = self.client.clone();
                let url = self.url.clone();
                let body = RpcRequest {
                    jsonrpc: "2.0",
                    id,
                    method,
                    params: params.clone(),
                };
                let body = serde_json::to_vec(&body);
                async move {
                    let response = client
                        .post(url)
                        .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
                        .header(ACCEPT, JSON_CONTENT_TYPE)
                        .body(body?)
                        .send()
                        .await?;
                    Self::handle_response(method, response).await
                }
            })
            .await
    }

    async fn handle_response(method: &str, response: reqwest::Response) -> SponsorResult<Value> {
        let status = response.status().as_u16();
        if !response.status().is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(SponsorError::api(status, format!("{method}: {text}")));
        }
        let envelope: RpcResponse = response.json().await?;
        if let Some(error) = envelope.error {
            return Err(SponsorError::api_with_code(
                status,
                format!("{method}: {}", error.message),
                error.code,
            ));
        }
        envelope.result.ok_or_else(|| {
            SponsorError::api(status, format!("{method}: response has no result"))
        })
    }

    /// Reads the current reference, version and owner of an object.
    ///
    /// A missing object is a non-retryable `Resolution` error; a transport
    /// failure is a retryable one.
    pub async fn get_object(&self, id: ObjectId) -> SponsorResult<ResolvedObject> {
        let response: ObjectResponse = self
            .call(
                "sui_getObject",
                json!([id.to_hex(), { "showOwner": true }]),
            )
            .await
            .map_err(|e| SponsorError::resolution(id.to_hex(), &e))?;
        match response.data {
            Some(data) => data.into_resolved(),
            None => {
                let reason = response
                    .error
                    .map(|e| match e.get("code").and_then(Value::as_str) {
                        Some(code) => code.to_string(),
                        None => e.to_string(),
                    })
                    .unwrap_or_else(|| "object not found".to_string());
                Err(SponsorError::object_missing(id.to_hex(), reason))
            }
        }
    }

    /// Reads every coin of `coin_type` owned by `owner`.
    pub async fn get_coins(&self, owner: SuiAddress, coin_type: &str) -> SponsorResult<Vec<Coin>> {
        let mut coins = Vec::new();
        let mut cursor: Option<String> = None;
        for _ in 0..MAX_COIN_PAGES {
            let page: CoinPage = self
                .call(
                    "suix_getCoins",
                    json!([owner.to_hex(), coin_type, cursor, Value::Null]),
                )
                .await?;
            coins.extend(page.data.into_iter().map(Coin::from));
            match page.next_cursor {
                Some(next) if page.has_next_page => cursor = Some(next),
                _ => break,
            }
        }
        Ok(coins)
    }

    /// Reads the current reference gas price.
    pub async fn get_reference_gas_price(&self) -> SponsorResult<u64> {
        let value = self
            .call_raw("suix_getReferenceGasPrice", json!([]), true)
            .await?;
        Ok(u64_lenient(value)?)
    }

    /// Submits a signed envelope and waits for local execution.
    pub async fn execute_transaction(
        &self,
        envelope: &SignedEnvelope,
    ) -> SponsorResult<ExecutionOutcome> {
        let result = self
            .call_raw(
                "sui_executeTransactionBlock",
                json!([
                    envelope.tx_bytes_base64(),
                    envelope.signatures_base64(),
                    { "showEffects": true, "showEvents": true },
                    "WaitForLocalExecution"
                ]),
                false,
            )
            .await?;
        let response: ExecuteResponse = serde_json::from_value(result)?;
        Ok(response.into())
    }

    /// Runs a transaction kind read-only on behalf of `sender`.
    pub async fn dev_inspect_transaction(
        &self,
        sender: SuiAddress,
        kind_bytes: &[u8],
    ) -> SponsorResult<InspectOutcome> {
        let response: DevInspectResponse = self
            .call(
                "sui_devInspectTransactionBlock",
                json!([sender.to_hex(), base64::encode(kind_bytes), Value::Null, Value::Null]),
            )
            .await?;
        Ok(response.into())
    }

    /// Dry-runs complete transaction data without signatures.
    pub async fn dry_run(&self, tx_bytes: &[u8]) -> SponsorResult<ExecutionOutcome> {
        let result = self
            .call_raw(
                "sui_dryRunTransactionBlock",
                json!([base64::encode(tx_bytes)]),
                true,
            )
            .await?;
        let effects = result.get("effects").cloned().unwrap_or(Value::Null);
        let events = match result.get("events") {
            Some(Value::Array(events)) => events.clone(),
            _ => Vec::new(),
        };
        Ok(ExecutionOutcome {
            digest: effects["transactionDigest"]
                .as_str()
                .unwrap_or_default()
                .to_string(),
            status: ExecutionStatus::from_effects(&effects),
            effects,
            events,
        })
    }
}

#[async_trait]
impl ObjectResolver for SuiRpcClient {
    async fn resolve_object(&self, id: ObjectId) -> SponsorResult<ResolvedObject> {
        self.get_object(id).await
    }
}

#[async_trait]
impl CoinProvider for SuiRpcClient {
    async fn coins(&self, owner: SuiAddress, coin_type: &str) -> SponsorResult<Vec<Coin>> {
        self.get_coins(owner, coin_type).await
    }

    async fn reference_gas_price(&self) -> SponsorResult<u64> {
        self.get_reference_gas_price().await
    }
}

#[async_trait]
impl ExecutionService for SuiRpcClient {
    async fn execute(&self, envelope: &SignedEnvelope) -> SponsorResult<ExecutionOutcome> {
        self.execute_transaction(envelope).await
    }

    async fn dev_inspect(
        &self,
        sender: SuiAddress,
        kind_bytes: &[u8],
    ) -> SponsorResult<InspectOutcome> {
        self.dev_inspect_transaction(sender, kind_bytes).await
    }
}
