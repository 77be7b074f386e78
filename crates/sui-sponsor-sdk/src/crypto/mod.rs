//! Cryptographic primitives for the sponsor SDK.
//!
//! This module provides the signature schemes accepted by the ledger
//! (Ed25519, Secp256k1 and Secp256r1), the serialized signature format
//! carried in a signed envelope, and key decoding for sponsor keys.
//!
//! # Feature Flags
//!
//! - `secp256k1` (default): Secp256k1 ECDSA signatures
//! - `secp256r1` (default): Secp256r1 (P-256) ECDSA signatures
//!
//! # Example
//!
//! ```rust
//! use sui_sponsor_sdk::crypto::{SignatureScheme, SuiKeyPair};
//!
//! let keypair = SuiKeyPair::generate(SignatureScheme::Ed25519).unwrap();
//! let signature = keypair.sign_transaction(b"transaction bytes").unwrap();
//! assert_eq!(signature.signer_address(), keypair.address());
//! ```

#[cfg(any(feature = "secp256k1", feature = "secp256r1"))]
mod ecdsa;
mod ed25519;
mod hash;
mod keypair;
mod signature;
mod traits;

#[cfg(any(feature = "secp256k1", feature = "secp256r1"))]
pub use ecdsa::{ECDSA_PRIVATE_KEY_LENGTH, ECDSA_PUBLIC_KEY_LENGTH};
#[cfg(feature = "secp256k1")]
pub use ecdsa::{Secp256k1PrivateKey, Secp256k1PublicKey};
#[cfg(feature = "secp256r1")]
pub use ecdsa::{Secp256r1PrivateKey, Secp256r1PublicKey};
pub use ed25519::{
    ED25519_PRIVATE_KEY_LENGTH, ED25519_PUBLIC_KEY_LENGTH, Ed25519PrivateKey, Ed25519PublicKey,
};
pub use hash::{Blake2b256, Intent, IntentScope, blake2b_256, blake2b_256_of, intent_digest};
pub use keypair::{SUI_PRIVATE_KEY_PREFIX, SuiKeyPair};
pub use signature::SuiSignature;
pub use traits::{DigestSigner, DigestVerifier, RAW_SIGNATURE_LENGTH};

use crate::error::{SponsorError, SponsorResult};
use crate::types::SuiAddress;
use std::fmt;

/// Signature schemes and their one-byte flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignatureScheme {
    /// Ed25519, flag `0x00`
    Ed25519,
    /// Secp256k1 ECDSA, flag `0x01`
    Secp256k1,
    /// Secp256r1 ECDSA, flag `0x02`
    Secp256r1,
}

impl SignatureScheme {
    /// Returns the scheme flag byte.
    pub fn flag(self) -> u8 {
        match self {
            Self::Ed25519 => 0x00,
            Self::Secp256k1 => 0x01,
            Self::Secp256r1 => 0x02,
        }
    }

    /// Looks a scheme up by its flag byte.
    pub fn from_flag(flag: u8) -> SponsorResult<Self> {
        match flag {
            0x00 => Ok(Self::Ed25519),
            0x01 => Ok(Self::Secp256k1),
            0x02 => Ok(Self::Secp256r1),
            other => Err(SponsorError::InvalidSignature(format!(
                "unsupported signature scheme flag {other:#04x}"
            ))),
        }
    }

    /// Length of a public key for this scheme.
    pub fn public_key_length(self) -> usize {
        match self {
            Self::Ed25519 => 32,
            Self::Secp256k1 | Self::Secp256r1 => 33,
        }
    }
}

impl fmt::Display for SignatureScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ed25519 => "ED25519",
            Self::Secp256k1 => "Secp256k1",
            Self::Secp256r1 => "Secp256r1",
        })
    }
}

/// Derives the address owned by a public key.
///
/// The address is Blake2b-256(`flag || public_key`).
pub fn derive_address(scheme: SignatureScheme, public_key: &[u8]) -> SuiAddress {
    SuiAddress::new(blake2b_256_of([&[scheme.flag()][..], public_key]))
}
