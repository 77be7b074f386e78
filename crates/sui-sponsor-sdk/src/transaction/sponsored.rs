//! The sponsor side of a gasless transaction.
//!
//! A [`GasStation`] holds the fee payer's key. Given the gas-less bytes of a
//! user's transaction and the user's address, it picks one of its own fee
//! coins, completes the transaction with itself as gas owner, signs it, and
//! hands back the completed bytes and its signature. It never submits.
//!
//! Each request walks a fixed sequence of states, each a distinct type:
//!
//! ```text
//! GasRequest -> Received -> Funded -> Finalized -> Signed -> Returned
//!                  \           \          \           \
//!                   +-----------+----------+-----------+--> Rejected
//! ```
//!
//! Funding is serialized per station: coin lookup and reservation happen
//! under one lock, and a reserved coin is not handed to another request
//! until its reservation expires or is released.
//!
//! # Example
//!
//! ```rust,ignore
//! let station = GasStation::new(SuiKeyPair::decode(&key)?, rpc_client);
//! match station.sponsor(request).await {
//!     SponsorOutcome::Returned(response) => send(response),
//!     SponsorOutcome::Rejected { phase, error } => reject(phase, error),
//! }
//! ```

use crate::api::CoinProvider;
use crate::crypto::{SuiKeyPair, SuiSignature};
use crate::error::{SponsorError, SponsorResult};
use crate::transaction::types::{
    GasData, TransactionData, TransactionDataV1, TransactionExpiration, TransactionKind,
};
use crate::types::{Coin, ObjectId, SuiAddress};
use async_trait::async_trait;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// The native fee coin type.
pub const SUI_COIN_TYPE: &str = "0x2::sui::SUI";

/// Gas budget set on sponsored transactions unless configured otherwise.
pub const DEFAULT_GAS_BUDGET: u64 = 50_000_000;

/// How long a coin stays reserved after it was handed out.
pub const DEFAULT_RESERVATION_TTL: Duration = Duration::from_secs(30);

/// Error text returned when a request lacks its fields.
pub const MISSING_FIELDS_MESSAGE: &str = "Missing txBytes or senderAddress";

/// Body of `POST /gas`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GasRequest {
    /// Gas-less transaction kind bytes, or complete transaction data
    #[serde(
        default,
        deserialize_with = "optional_byte_list",
        skip_serializing_if = "Option::is_none"
    )]
    pub tx_bytes: Option<Vec<u8>>,
    /// The user's address, `0x` + 64 hex digits
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_address: Option<String>,
}

impl GasRequest {
    /// Creates a request for `tx_bytes` on behalf of `sender`.
    pub fn new(tx_bytes: Vec<u8>, sender: SuiAddress) -> Self {
        Self {
            tx_bytes: Some(tx_bytes),
            sender_address: Some(sender.to_hex()),
        }
    }
}

/// Successful answer to `POST /gas`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GasResponse {
    /// Complete transaction data, exactly as the sponsor signed it
    #[serde(deserialize_with = "byte_list")]
    pub sponsored_bytes: Vec<u8>,
    /// The sponsor's serialized signature, Base64
    pub sponsor_signature: String,
    /// The sponsor's address
    pub fee_payer_address: String,
}

impl GasResponse {
    /// Parses the sponsor's signature.
    pub fn signature(&self) -> SponsorResult<SuiSignature> {
        SuiSignature::from_base64(&self.sponsor_signature)
    }

    /// Parses the fee payer's address.
    pub fn fee_payer(&self) -> SponsorResult<SuiAddress> {
        SuiAddress::from_canonical(&self.fee_payer_address)
    }

    /// Decodes the sponsored transaction data.
    pub fn transaction_data(&self) -> SponsorResult<TransactionData> {
        TransactionData::from_bytes(&self.sponsored_bytes)
    }
}

/// Reads a byte list sent as a JSON array or as an index-keyed object.
fn bytes_from_value(value: Value) -> Result<Vec<u8>, String> {
    let byte = |v: &Value| -> Result<u8, String> {
        v.as_u64()
            .and_then(|b| u8::try_from(b).ok())
            .ok_or_else(|| format!("{v} is not a byte"))
    };
    match value {
        Value::Array(items) => items.iter().map(byte).collect(),
        Value::Object(map) => (0..map.len())
            .map(|i| {
                map.get(&i.to_string())
                    .ok_or_else(|| format!("missing index {i}"))
                    .and_then(byte)
            })
            .collect(),
        other => Err(format!("expected a byte list, got {other}")),
    }
}

fn byte_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
    bytes_from_value(Value::deserialize(deserializer)?).map_err(de::Error::custom)
}

fn optional_byte_list<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Vec<u8>>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        value => bytes_from_value(value).map(Some).map_err(de::Error::custom),
    }
}

/// Anything that can fund and co-sign a transaction: a local [`GasStation`]
/// or a remote sponsor service.
#[async_trait]
pub trait SponsorBackend: Send + Sync {
    /// Requests sponsorship for a gas-less transaction.
    async fn request_gas(&self, request: GasRequest) -> SponsorResult<GasResponse>;
}

/// The phases a sponsorship request passes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SponsorPhase {
    /// Validating the request
    Received,
    /// Selecting a fee coin
    Funded,
    /// Completing the transaction data
    Finalized,
    /// Signing
    Signed,
}

impl fmt::Display for SponsorPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SponsorPhase::Received => "received",
            SponsorPhase::Funded => "funded",
            SponsorPhase::Finalized => "finalized",
            SponsorPhase::Signed => "signed",
        })
    }
}

/// A validated request.
#[derive(Debug, Clone)]
pub struct Received {
    sender: SuiAddress,
    kind: TransactionKind,
    expiration: TransactionExpiration,
}

impl Received {
    /// Returns the user's address.
    pub fn sender(&self) -> SuiAddress {
        self.sender
    }

    /// Returns the requested transaction kind.
    pub fn kind(&self) -> &TransactionKind {
        &self.kind
    }
}

/// A request with a reserved fee coin and a gas price.
#[derive(Debug, Clone)]
pub struct Funded {
    received: Received,
    coin: Coin,
    gas_price: u64,
}

impl Funded {
    /// Returns the reserved coin.
    pub fn coin(&self) -> &Coin {
        &self.coin
    }

    /// Returns the gas price.
    pub fn gas_price(&self) -> u64 {
        self.gas_price
    }
}

/// Complete transaction data naming the sponsor as gas owner.
#[derive(Debug, Clone)]
pub struct Finalized {
    data: TransactionData,
    bytes: Vec<u8>,
}

impl Finalized {
    /// Returns the transaction data.
    pub fn transaction_data(&self) -> &TransactionData {
        &self.data
    }

    /// Returns the encoded transaction data.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Finalized bytes with the sponsor's signature over them.
#[derive(Debug, Clone)]
pub struct Signed {
    bytes: Vec<u8>,
    signature: SuiSignature,
    sponsor: SuiAddress,
}

impl Signed {
    /// Returns the sponsor's signature.
    pub fn signature(&self) -> &SuiSignature {
        &self.signature
    }

    /// Turns the signed transaction into the response body.
    pub fn into_response(self) -> GasResponse {
        GasResponse {
            sponsored_bytes: self.bytes,
            sponsor_signature: self.signature.to_base64(),
            fee_payer_address: self.sponsor.to_hex(),
        }
    }
}

/// How a sponsorship request ended.
#[derive(Debug)]
pub enum SponsorOutcome {
    /// The sponsor signed; here are the bytes and the signature.
    Returned(GasResponse),
    /// The request failed in `phase`. No signature was produced.
    Rejected {
        /// Where the request failed
        phase: SponsorPhase,
        /// Why
        error: SponsorError,
    },
}

impl SponsorOutcome {
    /// Converts the outcome into a result.
    pub fn into_result(self) -> SponsorResult<GasResponse> {
        match self {
            SponsorOutcome::Returned(response) => Ok(response),
            SponsorOutcome::Rejected { error, .. } => Err(error),
        }
    }
}

/// Coins handed out recently, keyed by id.
#[derive(Debug)]
struct CoinReservations {
    ttl: Duration,
    held: HashMap<ObjectId, Instant>,
}

impl CoinReservations {
    fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            held: HashMap::new(),
        }
    }

    fn prune(&mut self, now: Instant) {
        let ttl = self.ttl;
        self.held.retain(|_, since| now.duration_since(*since) < ttl);
    }

    fn is_reserved(&self, id: &ObjectId) -> bool {
        self.held.contains_key(id)
    }

    fn reserve(&mut self, id: ObjectId, now: Instant) {
        self.held.insert(id, now);
    }

    fn release(&mut self, id: &ObjectId) {
        self.held.remove(id);
    }
}

/// Short symbol of a coin type, e.g. `SUI` for `0x2::sui::SUI`.
fn coin_symbol(coin_type: &str) -> &str {
    coin_type.rsplit("::").next().unwrap_or(coin_type)
}

/// A fee payer that co-signs gasless transactions.
pub struct GasStation<C> {
    keypair: SuiKeyPair,
    address: SuiAddress,
    coins: C,
    coin_type: String,
    gas_budget: u64,
    funding: Mutex<CoinReservations>,
}

impl<C> fmt::Debug for GasStation<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GasStation")
            .field("address", &self.address)
            .field("coin_type", &self.coin_type)
            .field("gas_budget", &self.gas_budget)
            .finish_non_exhaustive()
    }
}

impl<C: CoinProvider> GasStation<C> {
    /// Creates a station paying with `keypair`'s coins.
    pub fn new(keypair: SuiKeyPair, coins: C) -> Self {
        let address = keypair.address();
        Self {
            keypair,
            address,
            coins,
            coin_type: SUI_COIN_TYPE.to_string(),
            gas_budget: DEFAULT_GAS_BUDGET,
            funding: Mutex::new(CoinReservations::new(DEFAULT_RESERVATION_TTL)),
        }
    }

    /// Sets the gas budget of sponsored transactions.
    #[must_use]
    pub fn with_gas_budget(mut self, gas_budget: u64) -> Self {
        self.gas_budget = gas_budget;
        self
    }

    /// Sets the fee coin type.
    #[must_use]
    pub fn with_coin_type(mut self, coin_type: impl Into<String>) -> Self {
        self.coin_type = coin_type.into();
        self
    }

    /// Sets how long a handed-out coin stays reserved.
    #[must_use]
    pub fn with_reservation_ttl(mut self, ttl: Duration) -> Self {
        self.funding = Mutex::new(CoinReservations::new(ttl));
        self
    }

    /// Returns the sponsor's address.
    pub fn address(&self) -> SuiAddress {
        self.address
    }

    /// Returns the gas budget.
    pub fn gas_budget(&self) -> u64 {
        self.gas_budget
    }

    /// Returns the fee coin type.
    pub fn coin_type(&self) -> &str {
        &self.coin_type
    }

    /// Validates a request.
    pub fn receive(&self, request: GasRequest) -> SponsorResult<Received> {
        let (bytes, sender) = match (request.tx_bytes, request.sender_address) {
            (Some(bytes), Some(sender)) if !bytes.is_empty() && !sender.trim().is_empty() => {
                (bytes, sender)
            }
            _ => return Err(SponsorError::BadRequest(MISSING_FIELDS_MESSAGE.to_string())),
        };
        let sender = SuiAddress::from_canonical(sender.trim())
            .map_err(|e| SponsorError::BadRequest(format!("Invalid senderAddress: {e}")))?;

        let (kind, expiration) = match TransactionKind::from_bytes(&bytes) {
            Ok(kind) => (kind, TransactionExpiration::None),
            Err(kind_err) => {
                let data = TransactionData::from_bytes(&bytes).map_err(|_| {
                    SponsorError::BadRequest(format!("txBytes is not a transaction: {kind_err}"))
                })?;
                if data.sender() != sender {
                    return Err(SponsorError::BadRequest(format!(
                        "txBytes sender {} does not match senderAddress {}",
                        data.sender(),
                        sender
                    )));
                }
                (data.kind().clone(), data.expiration())
            }
        };
        if kind.programmable().uses_gas_coin() {
            return Err(SponsorError::BadRequest(
                "transaction may not use the sponsor's gas coin".to_string(),
            ));
        }
        Ok(Received {
            sender,
            kind,
            expiration,
        })
    }

    /// Reserves one fee coin and reads the gas price.
    ///
    /// Lookup and reservation run under the station's funding lock, so two
    /// concurrent requests never receive the same coin.
    pub async fn fund(&self, received: Received) -> SponsorResult<Funded> {
        let mut reservations = self.funding.lock().await;
        let now = Instant::now();
        reservations.prune(now);

        let coins = self.coins.coins(self.address, &self.coin_type).await?;
        let insufficient = |detail: String| SponsorError::InsufficientGas {
            owner: self.address.to_hex(),
            coin_symbol: coin_symbol(&self.coin_type).to_string(),
            detail,
        };
        if coins.is_empty() {
            return Err(insufficient(format!("no {} coins found", self.coin_type)));
        }
        let coin = coins
            .iter()
            .filter(|coin| !reservations.is_reserved(&coin.object_ref.object_id))
            .find(|coin| coin.balance >= self.gas_budget)
            .copied()
            .ok_or_else(|| {
                let reserved = coins
                    .iter()
                    .filter(|c| reservations.is_reserved(&c.object_ref.object_id))
                    .count();
                insufficient(format!(
                    "{} coins, {} reserved by in-flight requests, none of the rest covers budget {}",
                    coins.len(),
                    reserved,
                    self.gas_budget
                ))
            })?;

        let gas_price = self.coins.reference_gas_price().await?;
        reservations.reserve(coin.object_ref.object_id, now);
        tracing::debug!(
            sponsor = %self.address,
            coin = %coin.object_ref,
            gas_price,
            "reserved gas coin"
        );
        Ok(Funded {
            received,
            coin,
            gas_price,
        })
    }

    /// Completes the transaction with the sponsor as gas owner.
    ///
    /// The sender is copied unchanged from the request.
    pub fn finalize(&self, funded: Funded) -> SponsorResult<Finalized> {
        let Funded {
            received,
            coin,
            gas_price,
        } = funded;
        let data = TransactionData::V1(TransactionDataV1 {
            kind: received.kind,
            sender: received.sender,
            gas_data: GasData {
                payment: vec![coin.object_ref],
                owner: self.address,
                price: gas_price,
                budget: self.gas_budget,
            },
            expiration: received.expiration,
        });
        let bytes = data.to_bytes()?;
        Ok(Finalized { data, bytes })
    }

    /// Signs the finalized bytes.
    pub fn sign(&self, finalized: Finalized) -> SponsorResult<Signed> {
        let signature = self.keypair.sign_transaction(&finalized.bytes)?;
        Ok(Signed {
            bytes: finalized.bytes,
            signature,
            sponsor: self.address,
        })
    }

    /// Releases a reserved coin before its reservation expires.
    pub async fn release(&self, coin: &ObjectId) {
        self.funding.lock().await.release(coin);
    }

    /// Runs a request through every phase.
    pub async fn sponsor(&self, request: GasRequest) -> SponsorOutcome {
        let received = match self.receive(request) {
            Ok(received) => received,
            Err(error) => return self.reject(SponsorPhase::Received, error),
        };
        let sender = received.sender();
        let funded = match self.fund(received).await {
            Ok(funded) => funded,
            Err(error) => return self.reject(SponsorPhase::Funded, error),
        };
        let coin_id = funded.coin.object_ref.object_id;
        let signed = match self.finalize(funded) {
            Ok(finalized) => self.sign(finalized).map_err(|e| (SponsorPhase::Signed, e)),
            Err(e) => Err((SponsorPhase::Finalized, e)),
        };
        match signed {
            Ok(signed) => {
                tracing::info!(
                    sender = %sender,
                    sponsor = %self.address,
                    coin = %coin_id,
                    "sponsored transaction"
                );
                SponsorOutcome::Returned(signed.into_response())
            }
            Err((phase, error)) => {
                self.release(&coin_id).await;
                self.reject(phase, error)
            }
        }
    }

    fn reject(&self, phase: SponsorPhase, error: SponsorError) -> SponsorOutcome {
        tracing::warn!(
            sponsor = %self.address,
            %phase,
            error = %error.sanitized_message(),
            "sponsorship rejected"
        );
        SponsorOutcome::Rejected { phase, error }
    }
}

#[async_trait]
impl<C: CoinProvider> SponsorBackend for GasStation<C> {
    async fn request_gas(&self, request: GasRequest) -> SponsorResult<GasResponse> {
        self.sponsor(request).await.into_result()
    }
}

/// Maps a sponsorship error to the HTTP status and message a sponsor
/// endpoint answers with.
pub fn http_error(error: &SponsorError) -> (u16, String) {
    match error {
        SponsorError::InsufficientGas { coin_symbol, .. } => {
            (500, format!("Sponsor has no {coin_symbol} for gas"))
        }
        SponsorError::BadRequest(message) => (400, message.clone()),
        other if matches!(other.kind(), "key" | "config" | "internal") => {
            (500, other.user_message().to_string())
        }
        other => (other.status_code(), other.sanitized_message()),
    }
}
