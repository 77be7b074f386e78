//! Ledger and sponsor clients.
//!
//! The rest of the SDK talks to the outside world only through the traits
//! defined here:
//!
//! - [`ObjectResolver`] - current version, digest and owner of an object
//! - [`CoinProvider`] - fee coins held by an address and the gas price
//! - [`ExecutionService`] - submission of signed envelopes and read-only inspection
//!
//! [`SuiRpcClient`] implements all three against a fullnode's JSON-RPC API.
//! [`SponsorClient`] asks a remote sponsor service for gas.

pub mod response;
mod rpc;
mod sponsor;

pub use response::{ExecutionOutcome, ExecutionStatus, InspectOutcome, ReturnValue};
pub use rpc::SuiRpcClient;
pub use sponsor::SponsorClient;

use crate::error::SponsorResult;
use crate::transaction::SignedEnvelope;
use crate::types::{Coin, ObjectId, ResolvedObject, SuiAddress};
use async_trait::async_trait;

/// Looks up the current state of objects.
///
/// A missing object must be reported as a non-retryable
/// [`Resolution`](crate::SponsorError::Resolution) error.
#[async_trait]
pub trait ObjectResolver: Send + Sync {
    /// Returns the object's current reference and owner.
    async fn resolve_object(&self, id: ObjectId) -> SponsorResult<ResolvedObject>;
}

/// Reads an address's fee coins and the network gas price.
#[async_trait]
pub trait CoinProvider: Send + Sync {
    /// Returns coins of `coin_type` owned by `owner`.
    async fn coins(&self, owner: SuiAddress, coin_type: &str) -> SponsorResult<Vec<Coin>>;

    /// Returns the current reference gas price.
    async fn reference_gas_price(&self) -> SponsorResult<u64>;
}

/// Executes and inspects transactions.
#[async_trait]
pub trait ExecutionService: Send + Sync {
    /// Submits a signed envelope and waits for its effects.
    ///
    /// A transaction that aborts on chain is an `Ok` outcome with a failure
    /// status. A node that refuses the envelope outright returns an error;
    /// [`GaslessExecutor`](crate::transaction::GaslessExecutor) reports both
    /// as `Execution` errors.
    async fn execute(&self, envelope: &SignedEnvelope) -> SponsorResult<ExecutionOutcome>;

    /// Runs a transaction kind read-only on behalf of `sender`.
    async fn dev_inspect(
        &self,
        sender: SuiAddress,
        kind_bytes: &[u8],
    ) -> SponsorResult<InspectOutcome>;
}
