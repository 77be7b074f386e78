//! Move type tags used as type arguments of a call.

use crate::error::{SponsorError, SponsorResult};
use crate::types::SuiAddress;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A Move type.
///
/// Variant order fixes the wire discriminants and must not change.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeTag {
    /// `bool`
    Bool,
    /// `u8`
    U8,
    /// `u64`
    U64,
    /// `u128`
    U128,
    /// `address`
    Address,
    /// `signer`
    Signer,
    /// `vector<T>`
    Vector(Box<TypeTag>),
    /// A struct type such as `0x2::sui::SUI`
    Struct(Box<StructTag>),
    /// `u16`
    U16,
    /// `u32`
    U32,
    /// `u256`
    U256,
}

/// A fully qualified struct type.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StructTag {
    /// Package address
    pub address: SuiAddress,
    /// Module name
    pub module: String,
    /// Struct name
    pub name: String,
    /// Generic type arguments
    pub type_params: Vec<TypeTag>,
}

impl StructTag {
    /// The native fee coin, `0x2::sui::SUI`.
    pub fn gas_coin() -> Self {
        Self {
            address: SuiAddress::FRAMEWORK,
            module: "sui".to_string(),
            name: "SUI".to_string(),
            type_params: Vec::new(),
        }
    }
}

impl FromStr for TypeTag {
    type Err = SponsorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parser = TypeParser::new(s);
        let tag = parser.parse_type()?;
        parser.skip_whitespace();
        if !parser.is_done() {
            return Err(parser.error("unexpected trailing input"));
        }
        Ok(tag)
    }
}

impl FromStr for StructTag {
    type Err = SponsorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.parse::<TypeTag>()? {
            TypeTag::Struct(tag) => Ok(*tag),
            other => Err(SponsorError::InvalidTypeTag(format!(
                "expected a struct type, got {other}"
            ))),
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => f.write_str("bool"),
            Self::U8 => f.write_str("u8"),
            Self::U16 => f.write_str("u16"),
            Self::U32 => f.write_str("u32"),
            Self::U64 => f.write_str("u64"),
            Self::U128 => f.write_str("u128"),
            Self::U256 => f.write_str("u256"),
            Self::Address => f.write_str("address"),
            Self::Signer => f.write_str("signer"),
            Self::Vector(inner) => write!(f, "vector<{inner}>"),
            Self::Struct(tag) => write!(f, "{tag}"),
        }
    }
}

impl fmt::Display for StructTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}::{}", self.address, self.module, self.name)?;
        if !self.type_params.is_empty() {
            f.write_str("<")?;
            for (i, param) in self.type_params.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{param}")?;
            }
            f.write_str(">")?;
        }
        Ok(())
    }
}

/// Deepest nesting of `vector<..>` and struct type parameters accepted, the
/// ledger's limit on type argument depth.
pub const MAX_TYPE_TAG_DEPTH: usize = 16;

struct TypeParser<'a> {
    input: &'a str,
    pos: usize,
    depth: usize,
}

impl<'a> TypeParser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            depth: 0,
        }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn is_done(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn error(&self, msg: &str) -> SponsorError {
        SponsorError::InvalidTypeTag(format!("{msg} at offset {} in {:?}", self.pos, self.input))
    }

    fn skip_whitespace(&mut self) {
        let trimmed = self.rest().trim_start();
        self.pos = self.input.len() - trimmed.len();
    }

    fn eat(&mut self, token: &str) -> bool {
        self.skip_whitespace();
        if self.rest().starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &str) -> SponsorResult<()> {
        if self.eat(token) {
            Ok(())
        } else {
            Err(self.error(&format!("expected {token:?}")))
        }
    }

    fn ident(&mut self) -> SponsorResult<&'a str> {
        self.skip_whitespace();
        let rest = self.rest();
        let len = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(rest.len());
        if len == 0 {
            return Err(self.error("expected identifier"));
        }
        self.pos += len;
        Ok(&rest[..len])
    }

    fn parse_type(&mut self) -> SponsorResult<TypeTag> {
        if self.depth >= MAX_TYPE_TAG_DEPTH {
            return Err(self.error(&format!(
                "type nested deeper than {MAX_TYPE_TAG_DEPTH} levels"
            )));
        }
        self.depth += 1;
        let tag = self.parse_type_inner();
        self.depth -= 1;
        tag
    }

    fn parse_type_inner(&mut self) -> SponsorResult<TypeTag> {
        let word = self.ident()?;
        let tag = match word {
            "bool" => TypeTag::Bool,
            "u8" => TypeTag::U8,
            "u16" => TypeTag::U16,
            "u32" => TypeTag::U32,
            "u64" => TypeTag::U64,
            "u128" => TypeTag::U128,
            "u256" => TypeTag::U256,
            "address" => TypeTag::Address,
            "signer" => TypeTag::Signer,
            "vector" => {
                self.expect("<")?;
                let inner = self.parse_type()?;
                self.expect(">")?;
                TypeTag::Vector(Box::new(inner))
            }
            addr if addr.starts_with("0x") || addr.starts_with("0X") => {
                let address = SuiAddress::from_hex(addr)
                    .map_err(|e| self.error(&format!("bad package address: {e}")))?;
                self.expect("::")?;
                let module = self.ident()?.to_string();
                self.expect("::")?;
                let name = self.ident()?.to_string();
                let mut type_params = Vec::new();
                if self.eat("<") {
                    loop {
                        type_params.push(self.parse_type()?);
                        if self.eat(",") {
                            continue;
                        }
                        self.expect(">")?;
                        break;
                    }
                }
                TypeTag::Struct(Box::new(StructTag {
                    address,
                    module,
                    name,
                    type_params,
                }))
            }
            other => return Err(self.error(&format!("unknown type {other:?}"))),
        };
        Ok(tag)
    }
}
