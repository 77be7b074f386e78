//! Core ledger types.
//!
//! This module contains the fundamental types used throughout the SDK,
//! including addresses, digests, object references and type tags.

mod address;
mod digest;
mod object;
mod type_tag;

pub use address::{ADDRESS_LENGTH, CANONICAL_ADDRESS_LENGTH, ObjectId, SuiAddress};
pub use digest::{DIGEST_LENGTH, ObjectDigest, TransactionDigest};
pub use object::{Coin, ObjectOwner, ObjectRef, ResolvedObject};
pub use type_tag::{MAX_TYPE_TAG_DEPTH, StructTag, TypeTag};
