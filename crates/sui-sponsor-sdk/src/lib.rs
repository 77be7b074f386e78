//! # Sui Sponsor SDK
//!
//! Gasless Move calls on a Sui ledger: a fee payer co-signs the user's
//! transaction so the user pays nothing.
//!
//! The SDK covers the whole path of such a call: encoding arguments,
//! assembling the unsigned transaction, the sponsor's funding and signing
//! protocol, and combining both signatures for submission.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sui_sponsor_sdk::{SuiConfig, api::{SponsorClient, SuiRpcClient}};
//! use sui_sponsor_sdk::crypto::SuiKeyPair;
//! use sui_sponsor_sdk::did::DidCalls;
//! use sui_sponsor_sdk::transaction::GaslessExecutor;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = SuiConfig::testnet().with_sponsor_url("https://example.com/api")?;
//!     let executor = GaslessExecutor::new(
//!         SponsorClient::new(&config)?,
//!         SuiRpcClient::new(config)?,
//!     );
//!
//!     let user = SuiKeyPair::decode(&std::env::var("USER_KEY")?)?;
//!     let call = DidCalls::new(package_id, "did").create(Some("Qm123"), None)?;
//!     let outcome = executor.execute_call(&user, call).await?;
//!     println!("executed {}", outcome.digest);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `secp256k1` | Yes | Secp256k1 ECDSA keys and signatures |
//! | `secp256r1` | Yes | Secp256r1 (P-256) ECDSA keys and signatures |
//!
//! ## Modules
//!
//! - [`encoding`] - Canonical binary encoding of call arguments
//! - [`transaction`] - Formatting, building, sponsoring and assembling transactions
//! - [`api`] - Fullnode JSON-RPC and sponsor HTTP clients
//! - [`crypto`] - Signature schemes and sponsor keys
//! - [`did`] - Calls into a DID registry module
//! - [`types`] - Addresses, digests, object references and type tags

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

pub mod api;
pub mod config;
pub mod crypto;
pub mod did;
pub mod encoding;
pub mod error;
pub mod retry;
pub mod transaction;
pub mod types;

pub use config::SuiConfig;
pub use error::{SponsorError, SponsorResult};

pub use types::{ObjectId, ObjectRef, SuiAddress, TypeTag};
