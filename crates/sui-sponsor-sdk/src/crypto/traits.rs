//! The two seams every signature scheme plugs into.
//!
//! [`SuiSignature`](crate::crypto::SuiSignature) only ever signs and checks
//! 32-byte intent digests, so each scheme exposes exactly that.

use crate::crypto::SignatureScheme;
use crate::error::SponsorResult;

/// Length of a raw signature in every supported scheme.
pub const RAW_SIGNATURE_LENGTH: usize = 64;

/// A private key that signs intent digests.
pub trait DigestSigner {
    /// Scheme whose flag prefixes the serialized signature.
    const SCHEME: SignatureScheme;

    /// Returns the raw signature over `digest`.
    fn sign_digest(&self, digest: &[u8; 32]) -> [u8; RAW_SIGNATURE_LENGTH];

    /// Returns the public key in the form carried by serialized signatures.
    fn public_key_bytes(&self) -> Vec<u8>;
}

/// A public key that checks raw signatures over intent digests.
pub trait DigestVerifier: Sized {
    /// Scheme this key belongs to.
    const SCHEME: SignatureScheme;

    /// Parses a public key as carried by serialized signatures.
    fn from_public_key_bytes(bytes: &[u8]) -> SponsorResult<Self>;

    /// Checks `signature` over `digest`.
    fn verify_digest(&self, digest: &[u8; 32], signature: &[u8]) -> SponsorResult<()>;
}

/// Copies `bytes` into an array, naming `what` on a length mismatch.
pub(crate) fn fixed<const N: usize>(bytes: &[u8], what: &str) -> Result<[u8; N], String> {
    bytes
        .try_into()
        .map_err(|_| format!("{what} must be {N} bytes, got {}", bytes.len()))
}
