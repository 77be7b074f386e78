//! Ed25519, the default scheme for user and sponsor keys.

use crate::crypto::SignatureScheme;
use crate::crypto::traits::{DigestSigner, DigestVerifier, RAW_SIGNATURE_LENGTH, fixed};
use crate::error::{SponsorError, SponsorResult};
use crate::types::SuiAddress;
use ed25519_dalek::{Signer, SigningKey, VerifyingKey};
use std::fmt;
use zeroize::Zeroizing;

/// Ed25519 seed length in bytes.
pub const ED25519_PRIVATE_KEY_LENGTH: usize = 32;
/// Ed25519 public key length in bytes.
pub const ED25519_PUBLIC_KEY_LENGTH: usize = 32;

/// An Ed25519 private key, wiped from memory when dropped.
///
/// # Example
///
/// ```rust
/// use sui_sponsor_sdk::crypto::{DigestSigner, Ed25519PrivateKey};
///
/// let key = Ed25519PrivateKey::from_bytes(&[1u8; 32]).unwrap();
/// let raw = key.sign_digest(&[0u8; 32]);
/// assert_eq!(raw.len(), 64);
/// ```
#[derive(Clone)]
pub struct Ed25519PrivateKey(SigningKey);

impl Ed25519PrivateKey {
    /// Generates a random key.
    pub fn generate() -> Self {
        Self(SigningKey::generate(&mut rand::rngs::OsRng))
    }

    /// Creates a key from its 32-byte seed.
    pub fn from_bytes(bytes: &[u8]) -> SponsorResult<Self> {
        let seed = fixed::<ED25519_PRIVATE_KEY_LENGTH>(bytes, "Ed25519 seed")
            .map(Zeroizing::new)
            .map_err(SponsorError::InvalidPrivateKey)?;
        Ok(Self(SigningKey::from_bytes(&*seed)))
    }

    /// Returns the seed.
    pub fn to_bytes(&self) -> [u8; ED25519_PRIVATE_KEY_LENGTH] {
        self.0.to_bytes()
    }

    /// Returns the public half.
    pub fn public_key(&self) -> Ed25519PublicKey {
        Ed25519PublicKey(self.0.verifying_key())
    }
}

impl DigestSigner for Ed25519PrivateKey {
    const SCHEME: SignatureScheme = SignatureScheme::Ed25519;

    fn sign_digest(&self, digest: &[u8; 32]) -> [u8; RAW_SIGNATURE_LENGTH] {
        self.0.sign(digest).to_bytes()
    }

    fn public_key_bytes(&self) -> Vec<u8> {
        self.public_key().to_bytes().to_vec()
    }
}

impl fmt::Debug for Ed25519PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ed25519PrivateKey({})", self.public_key().to_address())
    }
}

/// An Ed25519 public key.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Ed25519PublicKey(VerifyingKey);

impl Ed25519PublicKey {
    /// Parses a 32-byte public key.
    pub fn from_bytes(bytes: &[u8]) -> SponsorResult<Self> {
        let raw = fixed::<ED25519_PUBLIC_KEY_LENGTH>(bytes, "Ed25519 public key")
            .map_err(SponsorError::InvalidPublicKey)?;
        VerifyingKey::from_bytes(&raw)
            .map(Self)
            .map_err(|e| SponsorError::InvalidPublicKey(e.to_string()))
    }

    /// Returns the key bytes.
    pub fn to_bytes(&self) -> [u8; ED25519_PUBLIC_KEY_LENGTH] {
        self.0.to_bytes()
    }

    /// Returns the address this key controls.
    pub fn to_address(&self) -> SuiAddress {
        crate::crypto::derive_address(SignatureScheme::Ed25519, &self.to_bytes())
    }
}

impl DigestVerifier for Ed25519PublicKey {
    const SCHEME: SignatureScheme = SignatureScheme::Ed25519;

    fn from_public_key_bytes(bytes: &[u8]) -> SponsorResult<Self> {
        Self::from_bytes(bytes)
    }

    fn verify_digest(&self, digest: &[u8; 32], signature: &[u8]) -> SponsorResult<()> {
        let signature = ed25519_dalek::Signature::from_slice(signature)
            .map_err(|e| SponsorError::InvalidSignature(e.to_string()))?;
        self.0
            .verify_strict(digest, &signature)
            .map_err(|_| SponsorError::SignatureVerificationFailed)
    }
}

impl fmt::Debug for Ed25519PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ed25519PublicKey(0x{})", hex::encode(self.to_bytes()))
    }
}
