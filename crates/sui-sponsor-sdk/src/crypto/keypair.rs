//! Scheme-agnostic key pairs and private key decoding.

use crate::crypto::{
    Ed25519PrivateKey, Intent, SignatureScheme, SuiSignature, intent_digest,
};
use crate::error::{SponsorError, SponsorResult};
use crate::types::SuiAddress;
use bech32::{Bech32, Hrp};
use std::fmt;
use zeroize::Zeroizing;

/// Human-readable prefix of Bech32-encoded private keys.
pub const SUI_PRIVATE_KEY_PREFIX: &str = "suiprivkey";

const SECRET_KEY_LENGTH: usize = 32;

/// A private key of any supported scheme.
#[derive(Clone)]
pub enum SuiKeyPair {
    /// Ed25519 key
    Ed25519(Ed25519PrivateKey),
    /// Secp256k1 key
    #[cfg(feature = "secp256k1")]
    Secp256k1(crate::crypto::Secp256k1PrivateKey),
    /// Secp256r1 key
    #[cfg(feature = "secp256r1")]
    Secp256r1(crate::crypto::Secp256r1PrivateKey),
}

impl SuiKeyPair {
    /// Generates a fresh key for `scheme`.
    pub fn generate(scheme: SignatureScheme) -> SponsorResult<Self> {
        match scheme {
            SignatureScheme::Ed25519 => Ok(Self::Ed25519(Ed25519PrivateKey::generate())),
            #[cfg(feature = "secp256k1")]
            SignatureScheme::Secp256k1 => Ok(Self::Secp256k1(
                crate::crypto::Secp256k1PrivateKey::generate(),
            )),
            #[cfg(feature = "secp256r1")]
            SignatureScheme::Secp256r1 => Ok(Self::Secp256r1(
                crate::crypto::Secp256r1PrivateKey::generate(),
            )),
            #[allow(unreachable_patterns)]
            other => Err(Self::unsupported(other)),
        }
    }

    /// Creates a key from a scheme and its 32 secret bytes.
    pub fn from_secret(scheme: SignatureScheme, secret: &[u8]) -> SponsorResult<Self> {
        match scheme {
            SignatureScheme::Ed25519 => Ok(Self::Ed25519(Ed25519PrivateKey::from_bytes(secret)?)),
            #[cfg(feature = "secp256k1")]
            SignatureScheme::Secp256k1 => Ok(Self::Secp256k1(
                crate::crypto::Secp256k1PrivateKey::from_bytes(secret)?,
            )),
            #[cfg(feature = "secp256r1")]
            SignatureScheme::Secp256r1 => Ok(Self::Secp256r1(
                crate::crypto::Secp256r1PrivateKey::from_bytes(secret)?,
            )),
            #[allow(unreachable_patterns)]
            other => Err(Self::unsupported(other)),
        }
    }

    fn unsupported(scheme: SignatureScheme) -> SponsorError {
        SponsorError::InvalidPrivateKey(format!("{scheme} support is not compiled in"))
    }

    /// Decodes a private key from text.
    ///
    /// Accepted forms, tried in order:
    /// - Bech32 `suiprivkey1...` carrying `flag || secret`
    /// - Base64 of `flag || secret` (keystore format)
    /// - 32-byte hex, taken as an Ed25519 seed
    pub fn decode(text: &str) -> SponsorResult<Self> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SponsorError::InvalidPrivateKey("key is empty".to_string()));
        }
        if text.starts_with(SUI_PRIVATE_KEY_PREFIX) {
            return Self::from_bech32(text);
        }
        let stripped = text.strip_prefix("0x").unwrap_or(text);
        if stripped.len() == SECRET_KEY_LENGTH * 2 {
            if let Ok(seed) = hex::decode(stripped).map(Zeroizing::new) {
                return Self::from_secret(SignatureScheme::Ed25519, &seed);
            }
        }
        let bytes = base64::decode(text).map(Zeroizing::new).map_err(|_| {
            SponsorError::InvalidPrivateKey(
                "expected a suiprivkey, base64 keystore entry or hex seed".to_string(),
            )
        })?;
        Self::from_flagged_bytes(&bytes)
    }

    /// Decodes a Bech32 `suiprivkey1...` string.
    pub fn from_bech32(text: &str) -> SponsorResult<Self> {
        let (hrp, data) = bech32::decode(text)
            .map_err(|e| SponsorError::InvalidPrivateKey(format!("invalid bech32: {e}")))?;
        let data = Zeroizing::new(data);
        if hrp.as_str() != SUI_PRIVATE_KEY_PREFIX {
            return Err(SponsorError::InvalidPrivateKey(format!(
                "unexpected key prefix {:?}",
                hrp.as_str()
            )));
        }
        Self::from_flagged_bytes(&data)
    }

    fn from_flagged_bytes(bytes: &[u8]) -> SponsorResult<Self> {
        match bytes.split_first() {
            Some((&flag, secret)) if secret.len() == SECRET_KEY_LENGTH => {
                let scheme = SignatureScheme::from_flag(flag)
                    .map_err(|e| SponsorError::InvalidPrivateKey(e.to_string()))?;
                Self::from_secret(scheme, secret)
            }
            _ => Err(SponsorError::InvalidPrivateKey(format!(
                "expected {} bytes (flag and secret), got {}",
                SECRET_KEY_LENGTH + 1,
                bytes.len()
            ))),
        }
    }

    /// Encodes this key as a Bech32 `suiprivkey1...` string.
    pub fn to_bech32(&self) -> SponsorResult<String> {
        let mut data = Zeroizing::new(Vec::with_capacity(SECRET_KEY_LENGTH + 1));
        data.push(self.scheme().flag());
        data.extend_from_slice(self.secret_bytes().as_slice());
        let hrp = Hrp::parse(SUI_PRIVATE_KEY_PREFIX)
            .map_err(|e| SponsorError::Internal(e.to_string()))?;
        bech32::encode::<Bech32>(hrp, &data).map_err(|e| SponsorError::Internal(e.to_string()))
    }

    fn secret_bytes(&self) -> Zeroizing<[u8; SECRET_KEY_LENGTH]> {
        Zeroizing::new(match self {
            Self::Ed25519(key) => key.to_bytes(),
            #[cfg(feature = "secp256k1")]
            Self::Secp256k1(key) => key.to_bytes(),
            #[cfg(feature = "secp256r1")]
            Self::Secp256r1(key) => key.to_bytes(),
        })
    }

    /// Returns the key's signature scheme.
    pub fn scheme(&self) -> SignatureScheme {
        match self {
            Self::Ed25519(_) => SignatureScheme::Ed25519,
            #[cfg(feature = "secp256k1")]
            Self::Secp256k1(_) => SignatureScheme::Secp256k1,
            #[cfg(feature = "secp256r1")]
            Self::Secp256r1(_) => SignatureScheme::Secp256r1,
        }
    }

    /// Returns the public key bytes.
    pub fn public_key_bytes(&self) -> Vec<u8> {
        match self {
            Self::Ed25519(key) => key.public_key().to_bytes().to_vec(),
            #[cfg(feature = "secp256k1")]
            Self::Secp256k1(key) => key.public_key().to_bytes(),
            #[cfg(feature = "secp256r1")]
            Self::Secp256r1(key) => key.public_key().to_bytes(),
        }
    }

    /// Returns the address owned by this key.
    pub fn address(&self) -> SuiAddress {
        crate::crypto::derive_address(self.scheme(), &self.public_key_bytes())
    }

    /// Signs a 32-byte signing digest.
    pub fn sign_digest(&self, digest: &[u8; 32]) -> SponsorResult<SuiSignature> {
        match self {
            Self::Ed25519(key) => SuiSignature::sign_digest(key, digest),
            #[cfg(feature = "secp256k1")]
            Self::Secp256k1(key) => SuiSignature::sign_digest(key, digest),
            #[cfg(feature = "secp256r1")]
            Self::Secp256r1(key) => SuiSignature::sign_digest(key, digest),
        }
    }

    /// Signs encoded transaction data under the transaction intent.
    pub fn sign_transaction(&self, tx_bytes: &[u8]) -> SponsorResult<SuiSignature> {
        self.sign_digest(&intent_digest(Intent::transaction_data(), tx_bytes))
    }
}

impl From<Ed25519PrivateKey> for SuiKeyPair {
    fn from(key: Ed25519PrivateKey) -> Self {
        Self::Ed25519(key)
    }
}

impl fmt::Debug for SuiKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SuiKeyPair({}, {})", self.scheme(), self.address())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bech32_roundtrip() {
        let keypair = SuiKeyPair::generate(SignatureScheme::Ed25519).unwrap();
        let encoded = keypair.to_bech32().unwrap();
        assert!(encoded.starts_with("suiprivkey1"));
        let decoded = SuiKeyPair::decode(&encoded).unwrap();
        assert_eq!(decoded.address(), keypair.address());
    }

    #[test]
    fn test_decode_base64_keystore_entry() {
        let keypair = SuiKeyPair::generate(SignatureScheme::Ed25519).unwrap();
        let mut flagged = vec![0x00];
        flagged.extend_from_slice(keypair.secret_bytes().as_slice());
        let decoded = SuiKeyPair::decode(&base64::encode(&flagged)).unwrap();
        assert_eq!(decoded.address(), keypair.address());
    }

    #[test]
    fn test_decode_hex_seed() {
        let seed = [7u8; 32];
        let decoded = SuiKeyPair::decode(&format!("0x{}", hex::encode(seed))).unwrap();
        assert_eq!(decoded.scheme(), SignatureScheme::Ed25519);
        let expected = Ed25519PrivateKey::from_bytes(&seed).unwrap();
        assert_eq!(decoded.address(), expected.public_key().to_address());
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(SuiKeyPair::decode("").is_err());
        assert!(SuiKeyPair::decode("not a key").is_err());
        assert!(SuiKeyPair::decode("suiprivkey1invalid").is_err());
        assert!(SuiKeyPair::decode(&base64::encode([0u8; 10])).is_err());
    }

    #[test]
    fn test_sign_transaction_verifies() {
        let keypair = SuiKeyPair::generate(SignatureScheme::Ed25519).unwrap();
        let signature = keypair.sign_transaction(b"tx").unwrap();
        assert!(signature.verify_transaction(b"tx").is_ok());
        assert!(signature.verify_transaction(b"tx2").is_err());
        assert_eq!(signature.signer_address(), keypair.address());
    }

    #[cfg(feature = "secp256k1")]
    #[test]
    fn test_secp256k1_bech32_roundtrip() {
        let keypair = SuiKeyPair::generate(SignatureScheme::Secp256k1).unwrap();
        let decoded = SuiKeyPair::decode(&keypair.to_bech32().unwrap()).unwrap();
        assert_eq!(decoded.scheme(), SignatureScheme::Secp256k1);
        assert_eq!(decoded.address(), keypair.address());
    }

    #[cfg(feature = "secp256r1")]
    #[test]
    fn test_secp256r1_signs_transactions() {
        let keypair = SuiKeyPair::generate(SignatureScheme::Secp256r1).unwrap();
        let signature = keypair.sign_transaction(b"tx").unwrap();
        assert!(signature.verify_transaction(b"tx").is_ok());
        assert_eq!(signature.signer_address(), keypair.address());
    }

    #[test]
    fn test_debug_hides_secret() {
        let keypair = SuiKeyPair::generate(SignatureScheme::Ed25519).unwrap();
        let debug = format!("{keypair:?}");
        assert!(debug.contains("ED25519"));
        assert!(!debug.contains(&hex::encode(*keypair.secret_bytes())));
    }
}
