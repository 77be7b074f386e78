//! Account and object address type.
//!
//! Addresses are 32-byte values displayed as 64 lowercase hexadecimal
//! characters with a `0x` prefix. Object ids share the same representation.

use crate::error::{SponsorError, SponsorResult};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// The length of an address in bytes.
pub const ADDRESS_LENGTH: usize = 32;

/// The length of a canonical textual address: `0x` followed by 64 hex digits.
pub const CANONICAL_ADDRESS_LENGTH: usize = 2 + ADDRESS_LENGTH * 2;

/// A 32-byte ledger address.
///
/// # Example
///
/// ```rust
/// use sui_sponsor_sdk::SuiAddress;
///
/// // Lenient parsing pads short system addresses
/// let clock = SuiAddress::from_hex("0x6").unwrap();
/// assert_eq!(clock, SuiAddress::CLOCK);
///
/// // Strict parsing only accepts the canonical 66-character form
/// assert!(SuiAddress::from_canonical("0x6").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SuiAddress([u8; ADDRESS_LENGTH]);

/// Object ids are addresses.
pub type ObjectId = SuiAddress;

impl SuiAddress {
    /// The "zero" address (all zeros).
    pub const ZERO: Self = Self([0u8; ADDRESS_LENGTH]);

    /// The Move standard library package (0x1).
    pub const STD: Self = Self::from_u64(1);

    /// The framework package (0x2).
    pub const FRAMEWORK: Self = Self::from_u64(2);

    /// The shared clock object (0x6).
    pub const CLOCK: Self = Self::from_u64(6);

    /// Creates an address from a byte array.
    pub const fn new(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }

    const fn from_u64(value: u64) -> Self {
        let mut bytes = [0u8; ADDRESS_LENGTH];
        let value_bytes = value.to_be_bytes();
        let mut i = 0;
        while i < 8 {
            bytes[ADDRESS_LENGTH - 8 + i] = value_bytes[i];
            i += 1;
        }
        Self(bytes)
    }

    /// Parses the canonical textual form: exactly `0x` plus 64 hex digits.
    ///
    /// Upper-case hex digits are accepted; the result always displays in
    /// lower case.
    pub fn from_canonical(text: &str) -> SponsorResult<Self> {
        if text.len() != CANONICAL_ADDRESS_LENGTH {
            return Err(SponsorError::format(format!(
                "address must be {} characters, got {}: {:?}",
                CANONICAL_ADDRESS_LENGTH,
                text.len(),
                text
            )));
        }
        let digits = text
            .strip_prefix("0x")
            .ok_or_else(|| SponsorError::format(format!("address must start with 0x: {text:?}")))?;
        if let Some(bad) = digits.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(SponsorError::format(format!(
                "address contains non-hex character {bad:?}: {text:?}"
            )));
        }
        let mut address = [0u8; ADDRESS_LENGTH];
        hex::decode_to_slice(digits, &mut address)?;
        Ok(Self(address))
    }

    /// Returns true if `text` has the canonical 66-character address shape.
    pub fn is_canonical(text: &str) -> bool {
        text.len() == CANONICAL_ADDRESS_LENGTH
            && text.starts_with("0x")
            && text[2..].chars().all(|c| c.is_ascii_hexdigit())
    }

    /// Creates an address from a hex string (with or without `0x` prefix).
    ///
    /// Short inputs such as `0x2` are zero-padded on the left. Empty strings
    /// and bare prefixes are rejected.
    pub fn from_hex<T: AsRef<[u8]>>(hex_str: T) -> SponsorResult<Self> {
        let raw = hex_str.as_ref();
        let digits = match raw {
            [b'0', b'x' | b'X', rest @ ..] => rest,
            _ => raw,
        };
        match digits.len() {
            0 => Err(SponsorError::format(
                "address must contain at least one hex digit",
            )),
            n if n > ADDRESS_LENGTH * 2 => Err(SponsorError::format(format!(
                "address has {n} hex digits, at most {} allowed",
                ADDRESS_LENGTH * 2
            ))),
            n => {
                // Odd-length input gets one extra leading zero nibble.
                let mut even = Vec::with_capacity(n + 1);
                if n % 2 == 1 {
                    even.push(b'0');
                }
                even.extend_from_slice(digits);
                let decoded = hex::decode(&even)?;
                let mut address = [0u8; ADDRESS_LENGTH];
                address[ADDRESS_LENGTH - decoded.len()..].copy_from_slice(&decoded);
                Ok(Self(address))
            }
        }
    }

    /// Creates an address from a byte slice.
    pub fn from_bytes<T: AsRef<[u8]>>(bytes: T) -> SponsorResult<Self> {
        let bytes = bytes.as_ref();
        if bytes.len() != ADDRESS_LENGTH {
            return Err(SponsorError::format(format!(
                "expected {} address bytes, got {}",
                ADDRESS_LENGTH,
                bytes.len()
            )));
        }
        let mut address = [0u8; ADDRESS_LENGTH];
        address.copy_from_slice(bytes);
        Ok(Self(address))
    }

    /// Returns the address as a byte slice.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the address as a byte array.
    pub fn to_bytes(&self) -> [u8; ADDRESS_LENGTH] {
        self.0
    }

    /// Returns the canonical lower-case hex string with `0x` prefix.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Returns a short hex string, trimming leading zeros.
    pub fn to_short_string(&self) -> String {
        let hex = hex::encode(self.0);
        let trimmed = hex.trim_start_matches('0');
        if trimmed.is_empty() {
            "0x0".to_string()
        } else {
            format!("0x{}", trimmed)
        }
    }

    /// Returns true if this is the zero address.
    pub fn is_zero(&self) -> bool {
        self == &Self::ZERO
    }
}

impl Default for SuiAddress {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Debug for SuiAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SuiAddress({})", self.to_short_string())
    }
}

impl fmt::Display for SuiAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl FromStr for SuiAddress {
    type Err = SponsorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

// Text formats carry the hex form; BCS carries the 32 raw bytes.
impl Serialize for SuiAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match serializer.is_human_readable() {
            true => self.to_hex().serialize(serializer),
            false => self.0.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for SuiAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if !deserializer.is_human_readable() {
            return <[u8; ADDRESS_LENGTH]>::deserialize(deserializer).map(Self);
        }
        let text = <std::borrow::Cow<'de, str>>::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

impl From<[u8; ADDRESS_LENGTH]> for SuiAddress {
    fn from(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }
}

impl From<SuiAddress> for [u8; ADDRESS_LENGTH] {
    fn from(addr: SuiAddress) -> Self {
        addr.0
    }
}

impl AsRef<[u8]> for SuiAddress {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}
