//! Secp256k1 and Secp256r1 ECDSA keys.
//!
//! Both curves sign the SHA-256 of the intent digest, emit 64-byte compact
//! `r || s` signatures normalised to low `s`, and carry 33-byte compressed
//! public keys.

use crate::crypto::SignatureScheme;
use crate::crypto::traits::{DigestSigner, DigestVerifier, RAW_SIGNATURE_LENGTH, fixed};
use crate::error::{SponsorError, SponsorResult};
use crate::types::SuiAddress;
use std::fmt;

/// ECDSA secret scalar length in bytes.
pub const ECDSA_PRIVATE_KEY_LENGTH: usize = 32;
/// Compressed SEC1 public key length in bytes.
pub const ECDSA_PUBLIC_KEY_LENGTH: usize = 33;

macro_rules! ecdsa_scheme {
    (
        $curve:ident, $feature:literal, $scheme:expr,
        $private:ident, $public:ident, $label:literal
    ) => {
        #[doc = concat!("A ", $label, " private key, wiped from memory when dropped.")]
        #[cfg(feature = $feature)]
        #[derive(Clone)]
        pub struct $private($curve::ecdsa::SigningKey);

        #[cfg(feature = $feature)]
        impl $private {
            /// Generates a random key.
            pub fn generate() -> Self {
                Self($curve::ecdsa::SigningKey::random(&mut rand::rngs::OsRng))
            }

            /// Creates a key from its 32-byte secret scalar.
            pub fn from_bytes(bytes: &[u8]) -> SponsorResult<Self> {
                let secret = fixed::<ECDSA_PRIVATE_KEY_LENGTH>(bytes, concat!($label, " secret"))
                    .map(zeroize::Zeroizing::new)
                    .map_err(SponsorError::InvalidPrivateKey)?;
                $curve::ecdsa::SigningKey::from_slice(secret.as_slice())
                    .map(Self)
                    .map_err(|e| SponsorError::InvalidPrivateKey(e.to_string()))
            }

            /// Returns the secret scalar.
            pub fn to_bytes(&self) -> [u8; ECDSA_PRIVATE_KEY_LENGTH] {
                let mut out = [0u8; ECDSA_PRIVATE_KEY_LENGTH];
                out.copy_from_slice(&self.0.to_bytes());
                out
            }

            /// Returns the public half.
            pub fn public_key(&self) -> $public {
                $public(*self.0.verifying_key())
            }
        }

        #[cfg(feature = $feature)]
        impl DigestSigner for $private {
            const SCHEME: SignatureScheme = $scheme;

            fn sign_digest(&self, digest: &[u8; 32]) -> [u8; RAW_SIGNATURE_LENGTH] {
                use $curve::ecdsa::signature::Signer;
                let signature: $curve::ecdsa::Signature = self.0.sign(digest);
                let mut raw = [0u8; RAW_SIGNATURE_LENGTH];
                raw.copy_from_slice(&signature.normalize_s().unwrap_or(signature).to_bytes());
                raw
            }

            fn public_key_bytes(&self) -> Vec<u8> {
                self.public_key().to_bytes()
            }
        }

        #[cfg(feature = $feature)]
        impl fmt::Debug for $private {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($private), "({})"), self.public_key().to_address())
            }
        }

        #[doc = concat!("A ", $label, " public key.")]
        #[cfg(feature = $feature)]
        #[derive(Clone, Copy, PartialEq, Eq)]
        pub struct $public($curve::ecdsa::VerifyingKey);

        #[cfg(feature = $feature)]
        impl $public {
            /// Parses a SEC1 public key, compressed or not.
            pub fn from_bytes(bytes: &[u8]) -> SponsorResult<Self> {
                $curve::ecdsa::VerifyingKey::from_sec1_bytes(bytes)
                    .map(Self)
                    .map_err(|e| SponsorError::InvalidPublicKey(e.to_string()))
            }

            /// Returns the 33-byte compressed encoding.
            pub fn to_bytes(&self) -> Vec<u8> {
                self.0.to_encoded_point(true).as_bytes().to_vec()
            }

            /// Returns the address this key controls.
            pub fn to_address(&self) -> SuiAddress {
                crate::crypto::derive_address($scheme, &self.to_bytes())
            }
        }

        #[cfg(feature = $feature)]
        impl DigestVerifier for $public {
            const SCHEME: SignatureScheme = $scheme;

            fn from_public_key_bytes(bytes: &[u8]) -> SponsorResult<Self> {
                if bytes.len() != ECDSA_PUBLIC_KEY_LENGTH {
                    return Err(SponsorError::InvalidPublicKey(format!(
                        "{} keys are carried compressed, got {} bytes",
                        $label,
                        bytes.len()
                    )));
                }
                Self::from_bytes(bytes)
            }

            fn verify_digest(&self, digest: &[u8; 32], signature: &[u8]) -> SponsorResult<()> {
                use $curve::ecdsa::signature::Verifier;
                let signature = $curve::ecdsa::Signature::from_slice(signature)
                    .map_err(|e| SponsorError::InvalidSignature(e.to_string()))?;
                // High-s signatures are malleable copies and are not accepted.
                if signature.normalize_s().is_some() {
                    return Err(SponsorError::InvalidSignature("signature is not low-s".into()));
                }
                self.0
                    .verify(digest, &signature)
                    .map_err(|_| SponsorError::SignatureVerificationFailed)
            }
        }

        #[cfg(feature = $feature)]
        impl fmt::Debug for $public {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($public), "(0x{})"), hex::encode(self.to_bytes()))
            }
        }
    };
}

ecdsa_scheme!(
    k256,
    "secp256k1",
    SignatureScheme::Secp256k1,
    Secp256k1PrivateKey,
    Secp256k1PublicKey,
    "Secp256k1"
);

ecdsa_scheme!(
    p256,
    "secp256r1",
    SignatureScheme::Secp256r1,
    Secp256r1PrivateKey,
    Secp256r1PublicKey,
    "Secp256r1"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(feature = "secp256k1")]
    #[test]
    fn test_secp256k1_digest_signature() {
        let key = Secp256k1PrivateKey::generate();
        let public_key = key.public_key();
        let raw = key.sign_digest(&[5u8; 32]);
        assert!(public_key.verify_digest(&[5u8; 32], &raw).is_ok());
        assert!(public_key.verify_digest(&[6u8; 32], &raw).is_err());
        assert_eq!(public_key.to_bytes().len(), ECDSA_PUBLIC_KEY_LENGTH);

        let restored = Secp256k1PrivateKey::from_bytes(&key.to_bytes()).unwrap();
        assert_eq!(restored.public_key(), public_key);
    }

    #[cfg(feature = "secp256r1")]
    #[test]
    fn test_secp256r1_public_key_is_compressed() {
        let key = Secp256r1PrivateKey::generate();
        let compressed = key.public_key().to_bytes();
        assert_eq!(compressed.len(), ECDSA_PUBLIC_KEY_LENGTH);
        assert!(matches!(compressed[0], 0x02 | 0x03));
        assert!(Secp256r1PublicKey::from_public_key_bytes(&compressed).is_ok());

        let uncompressed = key.public_key().0.to_encoded_point(false);
        assert!(Secp256r1PublicKey::from_public_key_bytes(uncompressed.as_bytes()).is_err());
    }

    #[test]
    fn test_zero_secret_rejected() {
        #[cfg(feature = "secp256k1")]
        assert!(Secp256k1PrivateKey::from_bytes(&[0u8; 32]).is_err());
        #[cfg(feature = "secp256r1")]
        assert!(Secp256r1PrivateKey::from_bytes(&[0u8; 16]).is_err());
    }
}
