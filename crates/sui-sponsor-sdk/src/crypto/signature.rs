//! Serialized signatures as carried in a signed envelope.

use crate::crypto::traits::{DigestSigner, DigestVerifier, RAW_SIGNATURE_LENGTH};
use crate::crypto::{Ed25519PublicKey, Intent, SignatureScheme, intent_digest};
use crate::error::{SponsorError, SponsorResult};
use crate::types::SuiAddress;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A signature in wire form: `flag || signature || public_key`.
///
/// The text form is standard Base64.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SuiSignature {
    scheme: SignatureScheme,
    bytes: Vec<u8>,
}

impl SuiSignature {
    /// Assembles a serialized signature from its parts.
    pub fn new(
        scheme: SignatureScheme,
        signature: &[u8],
        public_key: &[u8],
    ) -> SponsorResult<Self> {
        if signature.len() != RAW_SIGNATURE_LENGTH {
            return Err(SponsorError::InvalidSignature(format!(
                "expected {} signature bytes, got {}",
                RAW_SIGNATURE_LENGTH,
                signature.len()
            )));
        }
        if public_key.len() != scheme.public_key_length() {
            return Err(SponsorError::InvalidPublicKey(format!(
                "{} keys are {} bytes, got {}",
                scheme,
                scheme.public_key_length(),
                public_key.len()
            )));
        }
        let mut bytes = Vec::with_capacity(1 + signature.len() + public_key.len());
        bytes.push(scheme.flag());
        bytes.extend_from_slice(signature);
        bytes.extend_from_slice(public_key);
        Ok(Self { scheme, bytes })
    }

    /// Signs `digest` with any supported signer.
    pub fn sign_digest<K: DigestSigner>(key: &K, digest: &[u8; 32]) -> SponsorResult<Self> {
        Self::new(K::SCHEME, &key.sign_digest(digest), &key.public_key_bytes())
    }

    /// Parses a serialized signature from raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> SponsorResult<Self> {
        let (&flag, rest) = bytes
            .split_first()
            .ok_or_else(|| SponsorError::InvalidSignature("empty signature".to_string()))?;
        let scheme = SignatureScheme::from_flag(flag)?;
        if rest.len() < RAW_SIGNATURE_LENGTH {
            return Err(SponsorError::InvalidSignature(format!(
                "signature too short: {} bytes",
                bytes.len()
            )));
        }
        let (signature, public_key) = rest.split_at(RAW_SIGNATURE_LENGTH);
        Self::new(scheme, signature, public_key)
    }

    /// Parses the Base64 text form.
    pub fn from_base64(text: &str) -> SponsorResult<Self> {
        let bytes = base64::decode(text.trim())?;
        Self::from_bytes(&bytes)
    }

    /// Returns the Base64 text form.
    pub fn to_base64(&self) -> String {
        base64::encode(&self.bytes)
    }

    /// Returns the raw serialized bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the signature scheme.
    pub fn scheme(&self) -> SignatureScheme {
        self.scheme
    }

    /// Returns the bare signature bytes.
    pub fn signature_bytes(&self) -> &[u8] {
        &self.bytes[1..1 + RAW_SIGNATURE_LENGTH]
    }

    /// Returns the signer's public key bytes.
    pub fn public_key_bytes(&self) -> &[u8] {
        &self.bytes[1 + RAW_SIGNATURE_LENGTH..]
    }

    /// Returns the address of the key that produced this signature.
    pub fn signer_address(&self) -> SuiAddress {
        crate::crypto::derive_address(self.scheme, self.public_key_bytes())
    }

    /// Verifies this signature over a 32-byte signing digest.
    pub fn verify_digest(&self, digest: &[u8; 32]) -> SponsorResult<()> {
        match self.scheme() {
            SignatureScheme::Ed25519 => self.verify_with::<Ed25519PublicKey>(digest),
            #[cfg(feature = "secp256k1")]
            SignatureScheme::Secp256k1 => {
                self.verify_with::<crate::crypto::Secp256k1PublicKey>(digest)
            }
            #[cfg(feature = "secp256r1")]
            SignatureScheme::Secp256r1 => {
                self.verify_with::<crate::crypto::Secp256r1PublicKey>(digest)
            }
            #[allow(unreachable_patterns)]
            other => Err(SponsorError::InvalidSignature(format!(
                "{other} support is not compiled in"
            ))),
        }
    }

    fn verify_with<V: DigestVerifier>(&self, digest: &[u8; 32]) -> SponsorResult<()> {
        V::from_public_key_bytes(self.public_key_bytes())?
            .verify_digest(digest, self.signature_bytes())
    }

    /// Verifies this signature over encoded transaction data.
    pub fn verify_transaction(&self, tx_bytes: &[u8]) -> SponsorResult<()> {
        self.verify_digest(&intent_digest(Intent::transaction_data(), tx_bytes))
    }
}

impl fmt::Debug for SuiSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SuiSignature({}, {})", self.scheme(), self.to_base64())
    }
}

impl fmt::Display for SuiSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base64())
    }
}

impl FromStr for SuiSignature {
    type Err = SponsorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_base64(s)
    }
}

impl Serialize for SuiSignature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_base64())
        } else {
            serializer.serialize_bytes(&self.bytes)
        }
    }
}

impl<'de> Deserialize<'de> for SuiSignature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let s = String::deserialize(deserializer)?;
            Self::from_base64(&s).map_err(serde::de::Error::custom)
        } else {
            let bytes = Vec::<u8>::deserialize(deserializer)?;
            Self::from_bytes(&bytes).map_err(serde::de::Error::custom)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::Ed25519PrivateKey;

    #[test]
    fn test_ed25519_layout() {
        let key = Ed25519PrivateKey::generate();
        let digest = [4u8; 32];
        let signature = SuiSignature::sign_digest(&key, &digest).unwrap();
        assert_eq!(signature.as_bytes().len(), 97);
        assert_eq!(signature.as_bytes()[0], 0x00);
        assert_eq!(signature.public_key_bytes(), key.public_key().to_bytes());
        assert!(signature.verify_digest(&digest).is_ok());
        assert!(signature.verify_digest(&[5u8; 32]).is_err());
    }

    #[test]
    fn test_base64_roundtrip() {
        let key = Ed25519PrivateKey::generate();
        let signature = SuiSignature::sign_digest(&key, &[1u8; 32]).unwrap();
        let parsed: SuiSignature = signature.to_base64().parse().unwrap();
        assert_eq!(parsed, signature);

        let json = serde_json::to_string(&signature).unwrap();
        assert_eq!(json, format!("\"{}\"", signature.to_base64()));
    }

    #[test]
    fn test_signer_address() {
        let key = Ed25519PrivateKey::generate();
        let signature = SuiSignature::sign_digest(&key, &[1u8; 32]).unwrap();
        assert_eq!(
            signature.signer_address(),
            key.public_key().to_address()
        );
    }

    #[test]
    fn test_rejects_malformed() {
        assert!(SuiSignature::from_bytes(&[]).is_err());
        assert!(SuiSignature::from_bytes(&[0x00; 40]).is_err());
        assert!(SuiSignature::from_bytes(&[0x07; 97]).is_err());
        // Ed25519 flag with a 33-byte key
        assert!(SuiSignature::from_bytes(&[0x00; 98]).is_err());
        assert!(SuiSignature::from_base64("not base64!").is_err());
    }

    #[cfg(feature = "secp256k1")]
    #[test]
    fn test_secp256k1_layout() {
        let key = crate::crypto::Secp256k1PrivateKey::generate();
        let digest = [8u8; 32];
        let signature = SuiSignature::sign_digest(&key, &digest).unwrap();
        assert_eq!(signature.as_bytes().len(), 98);
        assert_eq!(signature.scheme(), SignatureScheme::Secp256k1);
        assert!(signature.verify_digest(&digest).is_ok());
    }

    #[cfg(feature = "secp256r1")]
    #[test]
    fn test_secp256r1_layout() {
        let key = crate::crypto::Secp256r1PrivateKey::generate();
        let digest = [8u8; 32];
        let signature = SuiSignature::sign_digest(&key, &digest).unwrap();
        assert_eq!(signature.scheme(), SignatureScheme::Secp256r1);
        assert!(signature.verify_digest(&digest).is_ok());
    }
}
