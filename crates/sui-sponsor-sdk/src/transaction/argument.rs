//! Classification and encoding of call arguments.
//!
//! Every argument of a call is either a reference to on-chain state (an
//! object, resolved when the transaction is built) or a pure value encoded
//! up front. [`ArgumentFormatter::format`] makes that decision from a declared
//! [`ParameterKind`]; [`ArgumentFormatter::infer`] guesses it from the shape
//! of the value for callers that have no declared signature.
//!
//! # Example
//!
//! ```rust
//! use sui_sponsor_sdk::transaction::{ArgumentFormatter, ArgumentValue, ParameterKind, PureType};
//!
//! let address = format!("0x{}", "b".repeat(64));
//!
//! // Declared as a pure address: encoded, not looked up
//! let value = ArgumentFormatter::format(0, &ParameterKind::Pure(PureType::Address), address.as_str().into()).unwrap();
//! assert!(matches!(value, ArgumentValue::PureBytes(ref b) if b.len() == 32));
//!
//! // Declared as an object: looked up at build time
//! let value = ArgumentFormatter::format(0, &ParameterKind::Object { mutable: true }, address.as_str().into()).unwrap();
//! assert!(value.is_object());
//! ```

use crate::encoding::{encode_string, encode_vector_raw, write_uleb128};
use crate::error::{SponsorError, SponsorResult};
use crate::types::{ObjectId, ObjectRef, SuiAddress};
use serde_json::Value;

/// A caller-supplied argument before classification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RawArgument {
    /// No value
    Null,
    /// A boolean
    Bool(bool),
    /// A non-negative integer
    Integer(u128),
    /// Text: an address, an object id, a decimal number or a plain string
    Text(String),
    /// Bytes that are already in their final encoding
    Encoded(Vec<u8>),
    /// An ordered collection
    Sequence(Vec<RawArgument>),
}

impl RawArgument {
    /// Wraps bytes that are already encoded.
    pub fn encoded(bytes: impl Into<Vec<u8>>) -> Self {
        RawArgument::Encoded(bytes.into())
    }

    fn describe(&self) -> &'static str {
        match self {
            RawArgument::Null => "null",
            RawArgument::Bool(_) => "a boolean",
            RawArgument::Integer(_) => "an integer",
            RawArgument::Text(_) => "text",
            RawArgument::Encoded(_) => "encoded bytes",
            RawArgument::Sequence(_) => "a sequence",
        }
    }
}

impl From<bool> for RawArgument {
    fn from(value: bool) -> Self {
        RawArgument::Bool(value)
    }
}

macro_rules! raw_from_unsigned {
    ($($t:ty),*) => {
        $(impl From<$t> for RawArgument {
            fn from(value: $t) -> Self {
                RawArgument::Integer(u128::from(value))
            }
        })*
    };
}

raw_from_unsigned!(u8, u16, u32, u64, u128);

impl From<&str> for RawArgument {
    fn from(value: &str) -> Self {
        RawArgument::Text(value.to_string())
    }
}

impl From<String> for RawArgument {
    fn from(value: String) -> Self {
        RawArgument::Text(value)
    }
}

impl From<SuiAddress> for RawArgument {
    fn from(value: SuiAddress) -> Self {
        RawArgument::Text(value.to_hex())
    }
}

impl<T: Into<RawArgument>> From<Option<T>> for RawArgument {
    fn from(value: Option<T>) -> Self {
        value.map_or(RawArgument::Null, Into::into)
    }
}

impl<T: Into<RawArgument>> From<Vec<T>> for RawArgument {
    fn from(items: Vec<T>) -> Self {
        RawArgument::Sequence(items.into_iter().map(Into::into).collect())
    }
}

const EMPTY_ENCODING: &str = "encoded argument is empty";

impl TryFrom<Value> for RawArgument {
    type Error = SponsorError;

    /// Converts a JSON value.
    ///
    /// An object whose keys are consecutive indices `"0"`, `"1"`, ... and whose
    /// values are bytes is read as an encoded buffer, which is how typed byte
    /// arrays serialize. The empty object is rejected, since no value encodes
    /// to zero bytes.
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Null => Ok(RawArgument::Null),
            Value::Bool(b) => Ok(RawArgument::Bool(b)),
            Value::Number(n) => n
                .as_u64()
                .map(u128::from)
                .or_else(|| n.to_string().parse::<u128>().ok())
                .map(RawArgument::Integer)
                .ok_or_else(|| {
                    SponsorError::format(format!("{n} is not a non-negative integer"))
                }),
            Value::String(s) => Ok(RawArgument::Text(s)),
            Value::Array(items) => items
                .into_iter()
                .map(RawArgument::try_from)
                .collect::<SponsorResult<Vec<_>>>()
                .map(RawArgument::Sequence),
            Value::Object(map) if map.is_empty() => Err(SponsorError::format(
                "an empty byte object is not an encoded value",
            )),
            Value::Object(map) => {
                let mut bytes = Vec::with_capacity(map.len());
                for i in 0..map.len() {
                    let byte = map
                        .get(&i.to_string())
                        .and_then(Value::as_u64)
                        .and_then(|b| u8::try_from(b).ok())
                        .ok_or_else(|| {
                            SponsorError::format(
                                "JSON objects are only accepted as index-keyed byte arrays",
                            )
                        })?;
                    bytes.push(byte);
                }
                Ok(RawArgument::Encoded(bytes))
            }
        }
    }
}

/// A classified argument, ready for the transaction builder.
///
/// Pure variants always hold finished encodings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArgumentValue {
    /// An object by id, resolved to its current version when building.
    Object {
        /// The object id
        id: ObjectId,
        /// Whether the call may mutate the object
        mutable: bool,
    },
    /// An object pinned to a known version and digest.
    ObjectRef(ObjectRef),
    /// An encoded pure value.
    PureBytes(Vec<u8>),
    /// A vector of classified values.
    Vector(Vec<ArgumentValue>),
    /// An optional value; `bytes` is the encoding of the inner value.
    OptionalBytes {
        /// Whether a value is present
        present: bool,
        /// Encoding of the value, empty when absent
        bytes: Vec<u8>,
    },
}

impl ArgumentValue {
    /// Returns true if this value, or anything inside it, refers to an object.
    pub fn is_object(&self) -> bool {
        match self {
            ArgumentValue::Object { .. } | ArgumentValue::ObjectRef(_) => true,
            ArgumentValue::Vector(items) => items.iter().any(ArgumentValue::is_object),
            ArgumentValue::PureBytes(_) | ArgumentValue::OptionalBytes { .. } => false,
        }
    }

    /// Returns the complete pure encoding, or `None` if the value contains objects.
    pub fn pure_bytes(&self) -> Option<Vec<u8>> {
        match self {
            ArgumentValue::PureBytes(bytes) => Some(bytes.clone()),
            ArgumentValue::OptionalBytes { present: false, .. } => Some(vec![0]),
            ArgumentValue::OptionalBytes {
                present: true,
                bytes,
            } => {
                let mut out = Vec::with_capacity(bytes.len() + 1);
                out.push(1);
                out.extend_from_slice(bytes);
                Some(out)
            }
            ArgumentValue::Vector(items) => items
                .iter()
                .map(ArgumentValue::pure_bytes)
                .collect::<Option<Vec<_>>>()
                .map(encode_vector_raw),
            ArgumentValue::Object { .. } | ArgumentValue::ObjectRef(_) => None,
        }
    }
}

/// A primitive Move type accepted as a pure argument.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PureType {
    /// `bool`
    Bool,
    /// `u8`
    U8,
    /// `u16`
    U16,
    /// `u32`
    U32,
    /// `u64`
    U64,
    /// `u128`
    U128,
    /// `u256`
    U256,
    /// `address`, also used for `ID`
    Address,
    /// `0x1::string::String`
    String,
    /// `vector<u8>`
    Bytes,
}

impl PureType {
    /// Encodes `raw` as this type.
    pub fn encode(self, raw: &RawArgument) -> Result<Vec<u8>, String> {
        match (self, raw) {
            (_, RawArgument::Encoded(bytes)) if bytes.is_empty() => {
                Err(EMPTY_ENCODING.to_string())
            }
            (_, RawArgument::Encoded(bytes)) => Ok(bytes.clone()),
            (PureType::Bool, RawArgument::Bool(b)) => Ok(vec![u8::from(*b)]),
            (PureType::Bool, RawArgument::Text(s)) => match s.as_str() {
                "true" => Ok(vec![1]),
                "false" => Ok(vec![0]),
                _ => Err(format!("expected a boolean, got {s:?}")),
            },
            (PureType::U8, _) => Self::unsigned(raw, u8::MAX.into()).map(|v| vec![v as u8]),
            (PureType::U16, _) => Self::unsigned(raw, u16::MAX.into())
                .map(|v| (v as u16).to_le_bytes().to_vec()),
            (PureType::U32, _) => Self::unsigned(raw, u32::MAX.into())
                .map(|v| (v as u32).to_le_bytes().to_vec()),
            (PureType::U64, _) => Self::unsigned(raw, u64::MAX.into())
                .map(|v| (v as u64).to_le_bytes().to_vec()),
            (PureType::U128, _) => {
                Self::unsigned(raw, u128::MAX).map(|v| v.to_le_bytes().to_vec())
            }
            (PureType::U256, RawArgument::Integer(v)) => {
                let mut out = [0u8; 32];
                out[..16].copy_from_slice(&v.to_le_bytes());
                Ok(out.to_vec())
            }
            (PureType::U256, RawArgument::Text(s)) => parse_u256(s).map(|v| v.to_vec()),
            (PureType::Address, RawArgument::Text(s)) => SuiAddress::from_canonical(s)
                .map(|a| a.to_bytes().to_vec())
                .map_err(|e| e.to_string()),
            (PureType::String, RawArgument::Text(s)) => Ok(encode_string(s)),
            (PureType::Bytes, RawArgument::Text(s)) => {
                let stripped = s.strip_prefix("0x").ok_or_else(|| {
                    format!("expected 0x-prefixed hex bytes, got {s:?}")
                })?;
                let bytes = hex::decode(stripped).map_err(|e| e.to_string())?;
                Ok(length_prefixed(&bytes))
            }
            (PureType::Bytes, RawArgument::Sequence(items)) => {
                let bytes = items
                    .iter()
                    .map(|item| Self::unsigned(item, u8::MAX.into()).map(|v| v as u8))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(length_prefixed(&bytes))
            }
            (ty, other) => Err(format!("expected {ty:?}, got {}", other.describe())),
        }
    }

    fn unsigned(raw: &RawArgument, max: u128) -> Result<u128, String> {
        let value = match raw {
            RawArgument::Integer(v) => *v,
            RawArgument::Text(s) => s
                .parse::<u128>()
                .map_err(|_| format!("expected an unsigned integer, got {s:?}"))?,
            other => return Err(format!("expected an integer, got {}", other.describe())),
        };
        if value > max {
            return Err(format!("{value} is out of range (max {max})"));
        }
        Ok(value)
    }
}

fn length_prefixed(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(bytes.len() + 5);
    write_uleb128(&mut out, bytes.len() as u64);
    out.extend_from_slice(bytes);
    out
}

/// Parses a decimal or `0x` hex string into little-endian `u256` bytes.
fn parse_u256(text: &str) -> Result<[u8; 32], String> {
    let mut out = [0u8; 32];
    if let Some(hex_digits) = text.strip_prefix("0x") {
        if hex_digits.is_empty() || hex_digits.len() > 64 {
            return Err(format!("invalid u256 {text:?}"));
        }
        let padded = format!("{hex_digits:0>64}");
        let mut be = [0u8; 32];
        hex::decode_to_slice(&padded, &mut be).map_err(|e| e.to_string())?;
        be.reverse();
        return Ok(be);
    }
    if text.is_empty() {
        return Err("empty u256".to_string());
    }
    for c in text.chars() {
        let digit = c
            .to_digit(10)
            .ok_or_else(|| format!("invalid u256 {text:?}"))?;
        // out = out * 10 + digit
        let mut carry = digit;
        for byte in &mut out {
            let acc = u32::from(*byte) * 10 + carry;
            *byte = (acc & 0xff) as u8;
            carry = acc >> 8;
        }
        if carry != 0 {
            return Err(format!("{text} overflows u256"));
        }
    }
    Ok(out)
}

/// The declared kind of one call parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParameterKind {
    /// An owned or shared object passed by id.
    Object {
        /// Whether the function takes it by mutable reference or by value
        mutable: bool,
    },
    /// The shared clock object at `0x6`, always immutable.
    SharedClock,
    /// A pure value.
    Pure(PureType),
    /// `Option<String>`.
    OptionalString,
    /// A vector of pure values.
    Vector(PureType),
}

/// Classifies raw arguments into [`ArgumentValue`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArgumentFormatter;

impl ArgumentFormatter {
    /// Formats argument number `index` according to its declared kind.
    pub fn format(
        index: usize,
        kind: &ParameterKind,
        raw: RawArgument,
    ) -> SponsorResult<ArgumentValue> {
        Self::format_kind(kind, raw).map_err(|msg| SponsorError::argument(index, msg))
    }

    /// Formats a whole argument list against its declared kinds.
    pub fn format_all(
        kinds: &[ParameterKind],
        raws: Vec<RawArgument>,
    ) -> SponsorResult<Vec<ArgumentValue>> {
        if kinds.len() != raws.len() {
            return Err(SponsorError::format(format!(
                "expected {} arguments, got {}",
                kinds.len(),
                raws.len()
            )));
        }
        kinds
            .iter()
            .zip(raws)
            .enumerate()
            .map(|(i, (kind, raw))| Self::format(i, kind, raw))
            .collect()
    }

    fn format_kind(kind: &ParameterKind, raw: RawArgument) -> Result<ArgumentValue, String> {
        match (kind, raw) {
            (ParameterKind::SharedClock, RawArgument::Null) => Ok(ArgumentValue::Object {
                id: SuiAddress::CLOCK,
                mutable: false,
            }),
            (ParameterKind::SharedClock, RawArgument::Text(s)) => Ok(ArgumentValue::Object {
                id: parse_object_id(&s)?,
                mutable: false,
            }),
            (ParameterKind::Object { mutable }, RawArgument::Text(s)) => {
                Ok(ArgumentValue::Object {
                    id: parse_object_id(&s)?,
                    mutable: *mutable,
                })
            }
            (ParameterKind::Object { .. } | ParameterKind::SharedClock, other) => Err(format!(
                "expected an object id, got {}",
                other.describe()
            )),
            (_, RawArgument::Encoded(bytes)) if bytes.is_empty() => Err(EMPTY_ENCODING.to_string()),
            (_, RawArgument::Encoded(bytes)) => Ok(ArgumentValue::PureBytes(bytes)),
            (ParameterKind::Pure(ty), raw) => ty.encode(&raw).map(ArgumentValue::PureBytes),
            (ParameterKind::OptionalString, RawArgument::Null) => {
                Ok(ArgumentValue::OptionalBytes {
                    present: false,
                    bytes: Vec::new(),
                })
            }
            (ParameterKind::OptionalString, raw) => {
                PureType::String
                    .encode(&raw)
                    .map(|bytes| ArgumentValue::OptionalBytes {
                        present: true,
                        bytes,
                    })
            }
            (ParameterKind::Vector(ty), RawArgument::Sequence(items)) => items
                .iter()
                .enumerate()
                .map(|(i, item)| {
                    ty.encode(item)
                        .map(ArgumentValue::PureBytes)
                        .map_err(|e| format!("item {i}: {e}"))
                })
                .collect::<Result<Vec<_>, _>>()
                .map(ArgumentValue::Vector),
            (ParameterKind::Vector(_), other) => {
                Err(format!("expected a sequence, got {}", other.describe()))
            }
        }
    }

    /// Classifies a value by its shape alone.
    ///
    /// Steps, first match wins:
    /// 1. null becomes an absent optional
    /// 2. a canonical 66-character address becomes an object reference
    /// 3. encoded bytes pass through
    /// 4. a sequence is classified element by element
    /// 5. booleans, integers and other text are encoded as `bool`, `u64`
    ///    (or `u128` when larger) and `String`
    ///
    /// Step 2 cannot tell a pure address from an object id. Prefer
    /// [`format`](Self::format) with a declared kind.
    pub fn infer(raw: RawArgument) -> SponsorResult<ArgumentValue> {
        match raw {
            RawArgument::Null => Ok(ArgumentValue::OptionalBytes {
                present: false,
                bytes: Vec::new(),
            }),
            RawArgument::Text(s) if SuiAddress::is_canonical(&s) => {
                let id = SuiAddress::from_canonical(&s)?;
                Ok(ArgumentValue::Object {
                    id,
                    mutable: id != SuiAddress::CLOCK,
                })
            }
            RawArgument::Encoded(bytes) if bytes.is_empty() => {
                Err(SponsorError::format(EMPTY_ENCODING))
            }
            RawArgument::Encoded(bytes) => Ok(ArgumentValue::PureBytes(bytes)),
            RawArgument::Sequence(items) => items
                .into_iter()
                .map(Self::infer)
                .collect::<SponsorResult<Vec<_>>>()
                .map(ArgumentValue::Vector),
            RawArgument::Bool(b) => Ok(ArgumentValue::PureBytes(vec![u8::from(b)])),
            RawArgument::Integer(v) => Ok(ArgumentValue::PureBytes(match u64::try_from(v) {
                Ok(small) => small.to_le_bytes().to_vec(),
                Err(_) => v.to_le_bytes().to_vec(),
            })),
            RawArgument::Text(s) => Ok(ArgumentValue::PureBytes(encode_string(&s))),
        }
    }

    /// Classifies a list of values by shape.
    pub fn infer_all(raws: Vec<RawArgument>) -> SponsorResult<Vec<ArgumentValue>> {
        raws.into_iter()
            .enumerate()
            .map(|(i, raw)| Self::infer(raw).map_err(|e| SponsorError::argument(i, e)))
            .collect()
    }
}

fn parse_object_id(text: &str) -> Result<ObjectId, String> {
    SuiAddress::from_hex(text).map_err(|e| format!("invalid object id {text:?}: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::{decode, encode_optional_string};
    use serde_json::json;

    fn addr(c: char) -> String {
        format!("0x{}", c.to_string().repeat(64))
    }

    #[test]
    fn test_infer_follows_shape() {
        assert_eq!(
            ArgumentFormatter::infer(RawArgument::Null).unwrap(),
            ArgumentValue::OptionalBytes {
                present: false,
                bytes: vec![]
            }
        );
        assert!(ArgumentFormatter::infer(addr('b').into()).unwrap().is_object());
        assert_eq!(
            ArgumentFormatter::infer(RawArgument::encoded([1, 2, 3])).unwrap(),
            ArgumentValue::PureBytes(vec![1, 2, 3])
        );
        assert_eq!(
            ArgumentFormatter::infer(42u64.into()).unwrap(),
            ArgumentValue::PureBytes(42u64.to_le_bytes().to_vec())
        );
        assert_eq!(
            ArgumentFormatter::infer("hello".into()).unwrap(),
            ArgumentValue::PureBytes(encode_string("hello"))
        );
    }

    #[test]
    fn test_infer_short_address_is_text() {
        // Only the canonical 66-character form is taken as an object
        let value = ArgumentFormatter::infer("0x6".into()).unwrap();
        assert_eq!(value, ArgumentValue::PureBytes(encode_string("0x6")));
    }

    #[test]
    fn test_infer_sequence_recurses() {
        let value =
            ArgumentFormatter::infer(RawArgument::from(vec![1u64, 2u64])).unwrap();
        assert_eq!(
            value.pure_bytes().unwrap(),
            bcs::to_bytes(&vec![1u64, 2u64]).unwrap()
        );
    }

    #[test]
    fn test_declared_address_stays_pure() {
        let value = ArgumentFormatter::format(
            0,
            &ParameterKind::Pure(PureType::Address),
            addr('c').into(),
        )
        .unwrap();
        assert_eq!(value, ArgumentValue::PureBytes(vec![0xcc; 32]));
        assert!(!value.is_object());
    }

    #[test]
    fn test_optional_string_kind() {
        let some = ArgumentFormatter::format(0, &ParameterKind::OptionalString, "Qm123".into())
            .unwrap();
        assert_eq!(
            some,
            ArgumentValue::OptionalBytes {
                present: true,
                bytes: encode_string("Qm123")
            }
        );
        assert_eq!(
            some.pure_bytes().unwrap(),
            encode_optional_string(Some("Qm123"))
        );

        let none =
            ArgumentFormatter::format(0, &ParameterKind::OptionalString, RawArgument::Null)
                .unwrap();
        assert_eq!(none.pure_bytes().unwrap(), encode_optional_string(None));

        let empty =
            ArgumentFormatter::format(0, &ParameterKind::OptionalString, "".into()).unwrap();
        assert_ne!(empty.pure_bytes(), none.pure_bytes());
    }

    #[test]
    fn test_shared_clock_defaults_to_0x6() {
        let value =
            ArgumentFormatter::format(0, &ParameterKind::SharedClock, RawArgument::Null).unwrap();
        assert_eq!(
            value,
            ArgumentValue::Object {
                id: SuiAddress::CLOCK,
                mutable: false
            }
        );
    }

    #[test]
    fn test_integer_widths() {
        let u8_kind = ParameterKind::Pure(PureType::U8);
        assert_eq!(
            ArgumentFormatter::format(0, &u8_kind, 255u64.into()).unwrap(),
            ArgumentValue::PureBytes(vec![255])
        );
        assert!(ArgumentFormatter::format(0, &u8_kind, 256u64.into()).is_err());

        let u64_kind = ParameterKind::Pure(PureType::U64);
        assert_eq!(
            ArgumentFormatter::format(0, &u64_kind, "1000".into()).unwrap(),
            ArgumentValue::PureBytes(1000u64.to_le_bytes().to_vec())
        );
    }

    #[test]
    fn test_u256_from_decimal_and_hex() {
        let kind = ParameterKind::Pure(PureType::U256);
        let decimal = ArgumentFormatter::format(0, &kind, "256".into()).unwrap();
        let hex = ArgumentFormatter::format(0, &kind, "0x100".into()).unwrap();
        let mut expected = vec![0u8; 32];
        expected[1] = 1;
        assert_eq!(decimal, ArgumentValue::PureBytes(expected.clone()));
        assert_eq!(hex, ArgumentValue::PureBytes(expected));

        let max = format!("1{}", "0".repeat(78));
        assert!(ArgumentFormatter::format(0, &kind, max.into()).is_err());
    }

    #[test]
    fn test_vector_kind_preserves_order() {
        let kind = ParameterKind::Vector(PureType::Address);
        let value =
            ArgumentFormatter::format(0, &kind, vec![addr('2'), addr('1')].into()).unwrap();
        let decoded: Vec<SuiAddress> = decode(&value.pure_bytes().unwrap()).unwrap();
        assert_eq!(decoded[0].to_hex(), addr('2'));
        assert_eq!(decoded[1].to_hex(), addr('1'));
    }

    #[test]
    fn test_bytes_kind() {
        let kind = ParameterKind::Pure(PureType::Bytes);
        let from_hex = ArgumentFormatter::format(0, &kind, "0x0102".into()).unwrap();
        let from_seq = ArgumentFormatter::format(0, &kind, vec![1u8, 2u8].into()).unwrap();
        assert_eq!(from_hex, ArgumentValue::PureBytes(vec![2, 1, 2]));
        assert_eq!(from_hex, from_seq);
    }

    #[test]
    fn test_mismatch_names_the_argument() {
        let kinds = [
            ParameterKind::OptionalString,
            ParameterKind::Object { mutable: true },
        ];
        let err = ArgumentFormatter::format_all(&kinds, vec!["cid".into(), true.into()])
            .unwrap_err();
        assert!(matches!(err, SponsorError::Format(_)));
        assert!(err.to_string().contains("argument 1"));
    }

    #[test]
    fn test_format_all_checks_arity() {
        let kinds = [ParameterKind::SharedClock];
        assert!(ArgumentFormatter::format_all(&kinds, vec![]).is_err());
    }

    #[test]
    fn test_raw_from_json() {
        let raw = RawArgument::try_from(json!([null, true, 7, "x"])).unwrap();
        assert_eq!(
            raw,
            RawArgument::Sequence(vec![
                RawArgument::Null,
                RawArgument::Bool(true),
                RawArgument::Integer(7),
                RawArgument::Text("x".into()),
            ])
        );
        assert_eq!(
            RawArgument::try_from(json!({"0": 9, "1": 8})).unwrap(),
            RawArgument::Encoded(vec![9, 8])
        );
        assert!(RawArgument::try_from(json!(-1)).is_err());
        assert!(RawArgument::try_from(json!({"a": 1})).is_err());
    }

    #[test]
    fn test_empty_encoding_rejected() {
        let err = RawArgument::try_from(json!({})).unwrap_err();
        assert!(matches!(err, SponsorError::Format(_)));

        let empty = RawArgument::encoded(Vec::new());
        assert!(matches!(
            ArgumentFormatter::infer(empty.clone()),
            Err(SponsorError::Format(_))
        ));
        assert!(PureType::Bytes.encode(&empty).is_err());
        assert_eq!(
            ArgumentFormatter::infer(RawArgument::encoded([0u8])).unwrap(),
            ArgumentValue::PureBytes(vec![0])
        );
    }
}
