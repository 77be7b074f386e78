//! Canonical binary encoding of pure call arguments.
//!
//! Every function here produces exactly the bytes the execution engine
//! expects for a non-object argument:
//!
//! - addresses are 32 raw bytes with no length prefix
//! - strings and vectors carry a ULEB128 length followed by their contents
//! - options are a `0x00` tag, or a `0x01` tag followed by the value
//! - structs are the concatenation of their fields in declared order
//!
//! # Example
//!
//! ```rust
//! use sui_sponsor_sdk::encoding::{encode_optional_string, encode_string};
//!
//! assert_eq!(encode_string("hi"), vec![2, b'h', b'i']);
//! assert_eq!(encode_optional_string(None), vec![0]);
//! assert_eq!(encode_optional_string(Some("")), vec![1, 0]);
//! ```

use crate::error::{SponsorError, SponsorResult};
use crate::types::{ADDRESS_LENGTH, SuiAddress};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Encodes any serializable value with the canonical encoding.
pub fn encode<T: Serialize + ?Sized>(value: &T) -> SponsorResult<Vec<u8>> {
    bcs::to_bytes(value).map_err(SponsorError::bcs)
}

/// Decodes a value, requiring the whole input to be consumed.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> SponsorResult<T> {
    bcs::from_bytes(bytes).map_err(SponsorError::bcs)
}

/// Encodes a textual address into its 32 raw bytes.
///
/// The text must be exactly `0x` followed by 64 hex digits.
pub fn encode_address(text: &str) -> SponsorResult<[u8; ADDRESS_LENGTH]> {
    SuiAddress::from_canonical(text).map(|addr| addr.to_bytes())
}

/// Decodes 32 raw bytes into the canonical lower-case address text.
pub fn decode_address(bytes: &[u8]) -> SponsorResult<String> {
    SuiAddress::from_bytes(bytes).map(|addr| addr.to_hex())
}

/// Encodes a UTF-8 string as a length-prefixed byte sequence.
pub fn encode_string(value: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(value.len() + 5);
    write_uleb128(&mut out, value.len() as u64);
    out.extend_from_slice(value.as_bytes());
    out
}

/// Decodes a length-prefixed UTF-8 string.
pub fn decode_string(bytes: &[u8]) -> SponsorResult<String> {
    decode(bytes)
}

/// Encodes an optional string.
///
/// `None` and `Some("")` encode differently: `[0]` versus `[1, 0]`.
pub fn encode_optional_string(value: Option<&str>) -> Vec<u8> {
    match value {
        None => vec![0],
        Some(s) => {
            let mut out = vec![1];
            out.extend(encode_string(s));
            out
        }
    }
}

/// Decodes an optional string.
pub fn decode_optional_string(bytes: &[u8]) -> SponsorResult<Option<String>> {
    decode(bytes)
}

/// Encodes items as a vector: a ULEB128 count followed by each item in order.
pub fn encode_vector<T: Serialize>(items: &[T]) -> SponsorResult<Vec<u8>> {
    encode(items)
}

/// Encodes a vector whose items are already encoded.
///
/// Each element of `encoded_items` must be a complete encoding of one item.
pub fn encode_vector_raw<I, B>(encoded_items: I) -> Vec<u8>
where
    I: IntoIterator<Item = B>,
    I::IntoIter: ExactSizeIterator,
    B: AsRef<[u8]>,
{
    let items = encoded_items.into_iter();
    let mut out = Vec::new();
    write_uleb128(&mut out, items.len() as u64);
    for item in items {
        out.extend_from_slice(item.as_ref());
    }
    out
}

/// Decodes a vector, preserving element order.
pub fn decode_vector<T: DeserializeOwned>(bytes: &[u8]) -> SponsorResult<Vec<T>> {
    decode(bytes)
}

/// Encodes a list of textual addresses as `vector<address>`.
pub fn encode_address_vector(addresses: &[&str]) -> SponsorResult<Vec<u8>> {
    let encoded = addresses
        .iter()
        .enumerate()
        .map(|(i, text)| {
            encode_address(text)
                .map_err(|e| SponsorError::format(format!("address vector item {i}: {e}")))
        })
        .collect::<SponsorResult<Vec<_>>>()?;
    Ok(encode_vector_raw(encoded))
}

/// Appends `value` as an unsigned LEB128 integer.
pub fn write_uleb128(out: &mut Vec<u8>, mut value: u64) {
    while value >= 0x80 {
        out.push((value as u8 & 0x7f) | 0x80);
        value >>= 7;
    }
    out.push(value as u8);
}

/// Reads an unsigned LEB128 integer, returning the value and bytes consumed.
pub fn read_uleb128(bytes: &[u8]) -> SponsorResult<(u64, usize)> {
    let mut value: u64 = 0;
    for (i, byte) in bytes.iter().enumerate().take(10) {
        let chunk = u64::from(byte & 0x7f);
        let shift = 7 * i as u32;
        if shift == 63 && chunk > 1 {
            return Err(SponsorError::bcs("ULEB128 value overflows u64"));
        }
        value |= chunk << shift;
        if byte & 0x80 == 0 {
            if i > 0 && *byte == 0 {
                return Err(SponsorError::bcs("non-canonical ULEB128 encoding"));
            }
            return Ok((value, i + 1));
        }
    }
    Err(SponsorError::bcs("truncated ULEB128 value"))
}

/// Builds a struct encoding field by field, in declared order.
///
/// Field names are only used for error reporting; the encoding is the
/// plain concatenation of the field encodings, so the order of `field`
/// calls must match the struct's declaration on the remote side.
///
/// # Example
///
/// ```rust
/// use sui_sponsor_sdk::encoding::StructEncoder;
///
/// let bytes = StructEncoder::new("Endpoint")
///     .field("kind", &1u8)
///     .field("url", "https://example.org")
///     .finish()
///     .unwrap();
/// assert_eq!(bytes[0], 1);
/// ```
#[derive(Debug, Clone)]
pub struct StructEncoder {
    name: String,
    bytes: Vec<u8>,
    fields: Vec<String>,
    errors: Vec<String>,
}

impl StructEncoder {
    /// Starts encoding a struct called `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bytes: Vec::new(),
            fields: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Appends a serializable field.
    #[must_use]
    pub fn field<T: Serialize + ?Sized>(mut self, name: &str, value: &T) -> Self {
        match bcs::to_bytes(value) {
            Ok(bytes) => self.push(name, &bytes),
            Err(e) => self.errors.push(format!("field '{name}': {e}")),
        }
        self
    }

    /// Appends a field whose bytes are already encoded.
    #[must_use]
    pub fn field_raw(mut self, name: &str, encoded: &[u8]) -> Self {
        self.push(name, encoded);
        self
    }

    /// Appends a field produced by one of the fallible encoders in this module.
    #[must_use]
    pub fn field_with(mut self, name: &str, encoded: SponsorResult<Vec<u8>>) -> Self {
        match encoded {
            Ok(bytes) => self.push(name, &bytes),
            Err(e) => self.errors.push(format!("field '{name}': {e}")),
        }
        self
    }

    fn push(&mut self, name: &str, bytes: &[u8]) {
        if self.fields.iter().any(|f| f == name) {
            self.errors.push(format!("field '{name}' declared twice"));
            return;
        }
        self.fields.push(name.to_string());
        self.bytes.extend_from_slice(bytes);
    }

    /// Returns the names of the fields appended so far, in order.
    pub fn field_names(&self) -> &[String] {
        &self.fields
    }

    /// Finishes the struct, failing if any field could not be encoded.
    pub fn finish(self) -> SponsorResult<Vec<u8>> {
        if !self.errors.is_empty() {
            return Err(SponsorError::format(format!(
                "struct {}: {}",
                self.name,
                self.errors.join("; ")
            )));
        }
        Ok(self.bytes)
    }
}
