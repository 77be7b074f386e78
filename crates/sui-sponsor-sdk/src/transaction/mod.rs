//! Transaction building, sponsorship and signing.
//!
//! # Overview
//!
//! A gasless call moves through these pieces in order:
//!
//! - **Formatting** - raw arguments become [`ArgumentValue`]s, guided by a
//!   declared [`ParameterKind`] per position or by shape inference
//! - **Building** - a [`CallDescriptor`] and a sender become an
//!   [`UnsignedTransaction`], with object arguments resolved on chain
//! - **Sponsorship** - a [`GasStation`] attaches its own fee coin, names
//!   itself gas owner and signs
//! - **Assembly** - the sender signs the same bytes and a
//!   [`SignedEnvelope`] orders the two signatures for submission
//!
//! # Example: Declared Parameters
//!
//! ```rust
//! use sui_sponsor_sdk::transaction::{FunctionSignature, ParameterKind, PureType};
//!
//! let transfer = FunctionSignature::new(
//!     "0x2::example::send",
//!     vec![ParameterKind::Pure(PureType::Address), ParameterKind::Pure(PureType::U64)],
//! );
//! let recipient = format!("0x{}", "c".repeat(64));
//! let call = transfer.call(&[], vec![recipient.as_str().into(), 10u64.into()]).unwrap();
//! assert!(!call.has_object_arguments());
//! ```
//!
//! # Example: Gasless Execution
//!
//! ```rust,ignore
//! use sui_sponsor_sdk::transaction::{GaslessExecutor, UnsignedTransactionBuilder};
//!
//! let unsigned = UnsignedTransactionBuilder::new()
//!     .sender(user.address())
//!     .call(call)
//!     .build(&rpc)
//!     .await?;
//!
//! let executor = GaslessExecutor::new(sponsor_client, rpc);
//! let outcome = executor.execute(&unsigned, &user).await?;
//! ```

pub mod argument;
pub mod assembler;
pub mod builder;
pub mod call;
pub mod sponsored;
pub mod types;

pub use argument::{ArgumentFormatter, ArgumentValue, ParameterKind, PureType, RawArgument};
pub use assembler::{GaslessExecutor, SignedEnvelope, countersign};
pub use builder::{UnsignedTransaction, UnsignedTransactionBuilder};
pub use call::{CallDescriptor, CallDescriptorBuilder, FunctionSignature};
pub use sponsored::{
    DEFAULT_GAS_BUDGET, DEFAULT_RESERVATION_TTL, Finalized, Funded, GasRequest, GasResponse,
    GasStation, MISSING_FIELDS_MESSAGE, Received, SUI_COIN_TYPE, Signed, SponsorBackend,
    SponsorOutcome, SponsorPhase, http_error,
};
pub use types::{
    Argument, CallArg, Command, GasData, ObjectArg, ProgrammableMoveCall,
    ProgrammableTransaction, TransactionData, TransactionDataV1, TransactionExpiration,
    TransactionKind,
};
