//! Hashing and intent-scoped signing messages.
//!
//! Every signature on the ledger covers a Blake2b-256 digest of an intent
//! prefix followed by the encoded payload.

use blake2::Digest;

/// Blake2b with a 256-bit output.
pub type Blake2b256 = blake2::Blake2b<blake2::digest::consts::U32>;

/// Computes the Blake2b-256 hash of the input.
///
/// # Example
///
/// ```rust
/// use sui_sponsor_sdk::crypto::blake2b_256;
///
/// let hash = blake2b_256(b"hello world");
/// assert_eq!(hash.len(), 32);
/// ```
pub fn blake2b_256(data: &[u8]) -> [u8; 32] {
    blake2b_256_of([data])
}

/// Computes the Blake2b-256 hash of several byte slices concatenated.
pub fn blake2b_256_of<I, T>(items: I) -> [u8; 32]
where
    I: IntoIterator<Item = T>,
    T: AsRef<[u8]>,
{
    let mut hasher = Blake2b256::new();
    for item in items {
        hasher.update(item.as_ref());
    }
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}

/// What a signed message is meant to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum IntentScope {
    /// Transaction data to be executed
    TransactionData = 0,
    /// Transaction effects signed by validators
    TransactionEffects = 1,
    /// Checkpoint summary
    CheckpointSummary = 2,
    /// Arbitrary user message
    PersonalMessage = 3,
}

/// A three-byte domain separator prepended to every signed payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Intent {
    /// Message scope
    pub scope: IntentScope,
    /// Intent version, currently 0
    pub version: u8,
    /// Application id, 0 for the ledger itself
    pub app_id: u8,
}

impl Intent {
    /// The intent used for user and sponsor transaction signatures.
    pub const fn transaction_data() -> Self {
        Self {
            scope: IntentScope::TransactionData,
            version: 0,
            app_id: 0,
        }
    }

    /// The intent used for off-chain personal messages.
    pub const fn personal_message() -> Self {
        Self {
            scope: IntentScope::PersonalMessage,
            version: 0,
            app_id: 0,
        }
    }

    /// Returns the three prefix bytes.
    pub fn to_bytes(self) -> [u8; 3] {
        [self.scope as u8, self.version, self.app_id]
    }
}

/// Computes the digest that a signer actually signs for `payload`.
pub fn intent_digest(intent: Intent, payload: &[u8]) -> [u8; 32] {
    blake2b_256_of([intent.to_bytes().as_slice(), payload])
}
