//! Content digests for objects and transactions.
//!
//! Digests are 32-byte Blake2b hashes. Their text form is Base58 and their
//! binary form is a length-prefixed byte vector.

use crate::error::{SponsorError, SponsorResult};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// The length of a digest in bytes.
pub const DIGEST_LENGTH: usize = 32;

macro_rules! digest_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        pub struct $name([u8; DIGEST_LENGTH]);

        impl $name {
            /// Creates a digest from a byte array.
            pub const fn new(bytes: [u8; DIGEST_LENGTH]) -> Self {
                Self(bytes)
            }

            /// Creates a digest from a byte slice.
            pub fn from_bytes(bytes: &[u8]) -> SponsorResult<Self> {
                if bytes.len() != DIGEST_LENGTH {
                    return Err(SponsorError::format(format!(
                        "expected {} digest bytes, got {}",
                        DIGEST_LENGTH,
                        bytes.len()
                    )));
                }
                let mut digest = [0u8; DIGEST_LENGTH];
                digest.copy_from_slice(bytes);
                Ok(Self(digest))
            }

            /// Parses a Base58 digest string.
            pub fn from_base58(text: &str) -> SponsorResult<Self> {
                let bytes = bs58::decode(text).into_vec().map_err(|e| {
                    SponsorError::format(format!("invalid base58 digest {text:?}: {e}"))
                })?;
                Self::from_bytes(&bytes)
            }

            /// Returns the Base58 text form.
            pub fn to_base58(&self) -> String {
                bs58::encode(self.0).into_string()
            }

            /// Returns the digest bytes.
            pub fn as_bytes(&self) -> &[u8; DIGEST_LENGTH] {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.to_base58())
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.to_base58())
            }
        }

        impl FromStr for $name {
            type Err = SponsorError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_base58(s)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                if serializer.is_human_readable() {
                    serializer.serialize_str(&self.to_base58())
                } else {
                    serializer.serialize_bytes(&self.0)
                }
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                if deserializer.is_human_readable() {
                    let s = String::deserialize(deserializer)?;
                    Self::from_base58(&s).map_err(serde::de::Error::custom)
                } else {
                    let bytes = Vec::<u8>::deserialize(deserializer)?;
                    Self::from_bytes(&bytes).map_err(serde::de::Error::custom)
                }
            }
        }
    };
}

digest_type!(
    /// Digest of an object's current contents.
    ObjectDigest
);

digest_type!(
    /// Digest identifying an executed transaction.
    TransactionDigest
);
