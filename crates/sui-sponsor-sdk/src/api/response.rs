//! Ledger RPC response types.

use crate::error::{SponsorError, SponsorResult};
use crate::types::{Coin, ObjectDigest, ObjectOwner, ObjectRef, ResolvedObject, SuiAddress};
use serde::de::{self, Deserializer};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Whether a transaction's effects report success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionStatus {
    /// Effects were applied.
    Success,
    /// The transaction aborted.
    Failure {
        /// The engine's error text
        error: String,
    },
}

impl ExecutionStatus {
    /// Reads `effects.status` from an effects payload.
    pub fn from_effects(effects: &Value) -> Self {
        let status = &effects["status"];
        match status["status"].as_str() {
            Some("success") => ExecutionStatus::Success,
            _ => ExecutionStatus::Failure {
                error: status["error"]
                    .as_str()
                    .unwrap_or("execution status missing from effects")
                    .to_string(),
            },
        }
    }

    /// Returns true on success.
    pub fn is_success(&self) -> bool {
        matches!(self, ExecutionStatus::Success)
    }
}

/// The result of executing a signed transaction.
#[derive(Debug, Clone)]
pub struct ExecutionOutcome {
    /// Transaction digest
    pub digest: String,
    /// Status from the effects
    pub status: ExecutionStatus,
    /// Raw effects payload
    pub effects: Value,
    /// Emitted events
    pub events: Vec<Value>,
}

impl ExecutionOutcome {
    /// Returns the outcome on success, or an `Execution` error carrying the effects.
    pub fn into_result(self) -> SponsorResult<Self> {
        match &self.status {
            ExecutionStatus::Success => Ok(self),
            ExecutionStatus::Failure { error } => Err(SponsorError::Execution {
                status: error.clone(),
                digest: Some(self.digest),
                effects: Some(self.effects),
            }),
        }
    }
}

/// One value returned by a read-only call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnValue {
    /// Encoded value
    pub bytes: Vec<u8>,
    /// Move type of the value
    pub type_tag: String,
}

impl ReturnValue {
    /// Decodes the value.
    pub fn decode<T: DeserializeOwned>(&self) -> SponsorResult<T> {
        crate::encoding::decode(&self.bytes)
    }
}

/// The result of a read-only inspection.
#[derive(Debug, Clone)]
pub struct InspectOutcome {
    /// Status from the effects
    pub status: ExecutionStatus,
    /// Return values of each command, in order
    pub results: Vec<Vec<ReturnValue>>,
    /// Raw effects payload
    pub effects: Value,
}

impl InspectOutcome {
    /// Returns the first return value of the first command.
    pub fn first_return_value(&self) -> Option<&ReturnValue> {
        self.results.first().and_then(|values| values.first())
    }

    /// Returns the outcome on success, or an `Execution` error carrying the effects.
    pub fn into_result(self) -> SponsorResult<Self> {
        match &self.status {
            ExecutionStatus::Success => Ok(self),
            ExecutionStatus::Failure { error } => Err(SponsorError::Execution {
                status: error.clone(),
                digest: None,
                effects: Some(self.effects),
            }),
        }
    }
}

/// A JSON-RPC 2.0 request.
#[derive(Debug, Serialize)]
pub(crate) struct RpcRequest<'a> {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: &'a str,
    pub params: Value,
}

/// A JSON-RPC 2.0 response envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct RpcResponse {
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<RpcErrorObject>,
}

/// A JSON-RPC error object.
#[derive(Debug, Deserialize)]
pub(crate) struct RpcErrorObject {
    pub code: i64,
    pub message: String,
}

/// Reads a `u64` sent either as a JSON number or as a decimal string.
pub(crate) fn u64_lenient<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| de::Error::custom(format!("{n} is not a u64"))),
        Value::String(s) => s.parse().map_err(de::Error::custom),
        other => Err(de::Error::custom(format!("expected a u64, got {other}"))),
    }
}

/// `sui_getObject` response.
#[derive(Debug, Deserialize)]
pub(crate) struct ObjectResponse {
    #[serde(default)]
    pub data: Option<ObjectData>,
    #[serde(default)]
    pub error: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ObjectData {
    pub object_id: SuiAddress,
    #[serde(deserialize_with = "u64_lenient")]
    pub version: u64,
    pub digest: ObjectDigest,
    #[serde(default)]
    pub owner: Option<Value>,
}

impl ObjectData {
    pub fn into_resolved(self) -> SponsorResult<ResolvedObject> {
        let owner = self
            .owner
            .as_ref()
            .ok_or_else(|| {
                SponsorError::object_missing(self.object_id.to_hex(), "owner not returned")
            })
            .and_then(parse_owner)?;
        Ok(ResolvedObject {
            object_ref: ObjectRef::new(self.object_id, self.version, self.digest),
            owner,
        })
    }
}

/// Parses the owner forms the RPC emits:
/// `{"AddressOwner": ..}`, `{"ObjectOwner": ..}`,
/// `{"Shared": {"initial_shared_version": n}}` and `"Immutable"`.
pub(crate) fn parse_owner(value: &Value) -> SponsorResult<ObjectOwner> {
    if value.as_str() == Some("Immutable") {
        return Ok(ObjectOwner::Immutable);
    }
    let address = |v: &Value| -> SponsorResult<SuiAddress> {
        v.as_str()
            .ok_or_else(|| SponsorError::format(format!("owner address is not text: {v}")))
            .and_then(SuiAddress::from_hex)
    };
    if let Some(owner) = value.get("AddressOwner") {
        return address(owner).map(ObjectOwner::Address);
    }
    if let Some(owner) = value.get("ObjectOwner") {
        return address(owner).map(ObjectOwner::Object);
    }
    if let Some(shared) = value.get("Shared") {
        let version = &shared["initial_shared_version"];
        let initial_shared_version = version
            .as_u64()
            .or_else(|| version.as_str().and_then(|s| s.parse().ok()))
            .ok_or_else(|| SponsorError::format(format!("bad shared owner: {shared}")))?;
        return Ok(ObjectOwner::Shared {
            initial_shared_version,
        });
    }
    Err(SponsorError::format(format!("unrecognized owner: {value}")))
}

/// `suix_getCoins` response page.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CoinPage {
    pub data: Vec<CoinData>,
    #[serde(default)]
    pub next_cursor: Option<String>,
    #[serde(default)]
    pub has_next_page: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CoinData {
    pub coin_object_id: SuiAddress,
    #[serde(deserialize_with = "u64_lenient")]
    pub version: u64,
    pub digest: ObjectDigest,
    #[serde(deserialize_with = "u64_lenient")]
    pub balance: u64,
}

impl From<CoinData> for Coin {
    fn from(data: CoinData) -> Self {
        Coin {
            object_ref: ObjectRef::new(data.coin_object_id, data.version, data.digest),
            balance: data.balance,
        }
    }
}

/// `sui_executeTransactionBlock` response.
#[derive(Debug, Deserialize)]
pub(crate) struct ExecuteResponse {
    pub digest: String,
    #[serde(default)]
    pub effects: Option<Value>,
    #[serde(default)]
    pub events: Option<Vec<Value>>,
}

impl From<ExecuteResponse> for ExecutionOutcome {
    fn from(response: ExecuteResponse) -> Self {
        let effects = response.effects.unwrap_or(Value::Null);
        ExecutionOutcome {
            digest: response.digest,
            status: ExecutionStatus::from_effects(&effects),
            effects,
            events: response.events.unwrap_or_default(),
        }
    }
}

/// `sui_devInspectTransactionBlock` response.
#[derive(Debug, Deserialize)]
pub(crate) struct DevInspectResponse {
    #[serde(default)]
    pub effects: Value,
    #[serde(default)]
    pub results: Option<Vec<CommandResult>>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CommandResult {
    #[serde(default)]
    pub return_values: Vec<(Vec<u8>, String)>,
}

impl From<DevInspectResponse> for InspectOutcome {
    fn from(response: DevInspectResponse) -> Self {
        let status = match response.error {
            Some(error) => ExecutionStatus::Failure { error },
            None => ExecutionStatus::from_effects(&response.effects),
        };
        InspectOutcome {
            status,
            results: response
                .results
                .unwrap_or_default()
                .into_iter()
                .map(|result| {
                    result
                        .return_values
                        .into_iter()
                        .map(|(bytes, type_tag)| ReturnValue { bytes, type_tag })
                        .collect()
                })
                .collect(),
            effects: response.effects,
        }
    }
}
