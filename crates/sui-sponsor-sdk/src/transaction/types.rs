//! Wire types of a programmable transaction.
//!
//! Variant order in every enum here fixes its discriminant on the wire
//! and must not change.

use crate::crypto::{Intent, blake2b_256_of, intent_digest};
use crate::encoding;
use crate::error::SponsorResult;
use crate::types::{ObjectId, ObjectRef, SuiAddress, TransactionDigest, TypeTag};
use serde::{Deserialize, Serialize};

/// An input to a programmable transaction.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CallArg {
    /// A pure value, already encoded.
    Pure(Vec<u8>),
    /// An object.
    Object(ObjectArg),
}

impl CallArg {
    /// Returns the id of the object this input refers to, if any.
    pub fn object_id(&self) -> Option<ObjectId> {
        match self {
            CallArg::Pure(_) => None,
            CallArg::Object(arg) => Some(arg.id()),
        }
    }
}

/// How an object enters a transaction.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectArg {
    /// An owned or immutable object, pinned to a version.
    ImmOrOwnedObject(ObjectRef),
    /// A shared object, sequenced through consensus.
    SharedObject {
        /// The object id
        id: ObjectId,
        /// Version at which the object became shared
        initial_shared_version: u64,
        /// Whether the call may mutate it
        mutable: bool,
    },
    /// An object being received by another object.
    Receiving(ObjectRef),
}

impl ObjectArg {
    /// Returns the object id.
    pub fn id(&self) -> ObjectId {
        match self {
            ObjectArg::ImmOrOwnedObject(r) | ObjectArg::Receiving(r) => r.object_id,
            ObjectArg::SharedObject { id, .. } => *id,
        }
    }
}

/// A reference to a value inside a programmable transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Argument {
    /// The coin paying for gas.
    GasCoin,
    /// The input at this index.
    Input(u16),
    /// The result of the command at this index.
    Result(u16),
    /// One value out of a command returning several.
    NestedResult(u16, u16),
}

/// A Move function call.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProgrammableMoveCall {
    /// Package holding the module
    pub package: ObjectId,
    /// Module name
    pub module: String,
    /// Function name
    pub function: String,
    /// Type arguments
    pub type_arguments: Vec<TypeTag>,
    /// Call arguments
    pub arguments: Vec<Argument>,
}

/// A single step of a programmable transaction.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Command {
    /// Calls a Move function.
    MoveCall(Box<ProgrammableMoveCall>),
    /// Sends objects to an address.
    TransferObjects(Vec<Argument>, Argument),
    /// Splits amounts off a coin.
    SplitCoins(Argument, Vec<Argument>),
    /// Merges coins into the first one.
    MergeCoins(Argument, Vec<Argument>),
    /// Publishes modules with their dependencies.
    Publish(Vec<Vec<u8>>, Vec<ObjectId>),
    /// Builds a vector from arguments.
    MakeMoveVec(Option<TypeTag>, Vec<Argument>),
    /// Upgrades a package.
    Upgrade(Vec<Vec<u8>>, Vec<ObjectId>, ObjectId, Argument),
}

impl Command {
    /// Returns every argument this command consumes.
    pub fn arguments(&self) -> Vec<Argument> {
        match self {
            Command::MoveCall(call) => call.arguments.clone(),
            Command::TransferObjects(objects, recipient) => {
                let mut args = objects.clone();
                args.push(*recipient);
                args
            }
            Command::SplitCoins(coin, amounts) => {
                let mut args = vec![*coin];
                args.extend(amounts);
                args
            }
            Command::MergeCoins(target, sources) => {
                let mut args = vec![*target];
                args.extend(sources);
                args
            }
            Command::Publish(..) => Vec::new(),
            Command::MakeMoveVec(_, items) => items.clone(),
            Command::Upgrade(_, _, _, ticket) => vec![*ticket],
        }
    }
}

/// Inputs and commands of a programmable transaction.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProgrammableTransaction {
    /// Inputs, referenced by `Argument::Input`
    pub inputs: Vec<CallArg>,
    /// Commands, executed in order
    pub commands: Vec<Command>,
}

impl ProgrammableTransaction {
    /// Returns true if any command touches the gas coin.
    pub fn uses_gas_coin(&self) -> bool {
        self.commands
            .iter()
            .flat_map(Command::arguments)
            .any(|arg| arg == Argument::GasCoin)
    }
}

/// What a transaction does, without gas or sender.
///
/// These are the bytes a client hands a sponsor.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionKind {
    /// A programmable transaction.
    ProgrammableTransaction(ProgrammableTransaction),
}

impl TransactionKind {
    /// Encodes the kind.
    pub fn to_bytes(&self) -> SponsorResult<Vec<u8>> {
        encoding::encode(self)
    }

    /// Decodes a kind.
    pub fn from_bytes(bytes: &[u8]) -> SponsorResult<Self> {
        encoding::decode(bytes)
    }

    /// Returns the programmable transaction.
    pub fn programmable(&self) -> &ProgrammableTransaction {
        match self {
            TransactionKind::ProgrammableTransaction(pt) => pt,
        }
    }
}

/// Who pays for gas, with which coins and at what price.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GasData {
    /// Coins paying for gas
    pub payment: Vec<ObjectRef>,
    /// Owner of the payment coins
    pub owner: SuiAddress,
    /// Gas price
    pub price: u64,
    /// Maximum gas the transaction may spend
    pub budget: u64,
}

/// When a transaction stops being valid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionExpiration {
    /// Never expires.
    #[default]
    None,
    /// Expires at the end of this epoch.
    Epoch(u64),
}

/// The first transaction data layout.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionDataV1 {
    /// What the transaction does
    pub kind: TransactionKind,
    /// Who the call is from
    pub sender: SuiAddress,
    /// Gas payment
    pub gas_data: GasData,
    /// Expiration
    pub expiration: TransactionExpiration,
}

/// Complete transaction data; the bytes both parties sign.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionData {
    /// Version 1
    V1(TransactionDataV1),
}

impl TransactionData {
    /// Creates version 1 transaction data that never expires.
    pub fn new(kind: TransactionKind, sender: SuiAddress, gas_data: GasData) -> Self {
        TransactionData::V1(TransactionDataV1 {
            kind,
            sender,
            gas_data,
            expiration: TransactionExpiration::None,
        })
    }

    fn v1(&self) -> &TransactionDataV1 {
        match self {
            TransactionData::V1(data) => data,
        }
    }

    /// Returns the sender.
    pub fn sender(&self) -> SuiAddress {
        self.v1().sender
    }

    /// Returns the gas data.
    pub fn gas_data(&self) -> &GasData {
        &self.v1().gas_data
    }

    /// Returns the gas owner, which is the sponsor for sponsored transactions.
    pub fn gas_owner(&self) -> SuiAddress {
        self.v1().gas_data.owner
    }

    /// Returns true when someone other than the sender pays for gas.
    pub fn is_sponsored(&self) -> bool {
        self.gas_owner() != self.sender()
    }

    /// Returns the transaction kind.
    pub fn kind(&self) -> &TransactionKind {
        &self.v1().kind
    }

    /// Returns the expiration.
    pub fn expiration(&self) -> TransactionExpiration {
        self.v1().expiration
    }

    /// Addresses whose signatures the transaction needs, sender first.
    pub fn required_signers(&self) -> Vec<SuiAddress> {
        if self.is_sponsored() {
            vec![self.sender(), self.gas_owner()]
        } else {
            vec![self.sender()]
        }
    }

    /// Encodes the transaction data.
    pub fn to_bytes(&self) -> SponsorResult<Vec<u8>> {
        encoding::encode(self)
    }

    /// Decodes transaction data.
    pub fn from_bytes(bytes: &[u8]) -> SponsorResult<Self> {
        encoding::decode(bytes)
    }

    /// Returns the digest every signer signs over.
    pub fn signing_digest(&self) -> SponsorResult<[u8; 32]> {
        Ok(intent_digest(Intent::transaction_data(), &self.to_bytes()?))
    }

    /// Returns the transaction digest that identifies it on chain.
    pub fn digest(&self) -> SponsorResult<TransactionDigest> {
        let bytes = self.to_bytes()?;
        Ok(TransactionDigest::new(blake2b_256_of([
            &b"TransactionData::"[..],
            &bytes,
        ])))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ObjectDigest;

    fn sample_kind() -> TransactionKind {
        TransactionKind::ProgrammableTransaction(ProgrammableTransaction {
            inputs: vec![CallArg::Pure(vec![1, 2])],
            commands: vec![Command::MoveCall(Box::new(ProgrammableMoveCall {
                package: SuiAddress::FRAMEWORK,
                module: "m".into(),
                function: "f".into(),
                type_arguments: vec![],
                arguments: vec![Argument::Input(0)],
            }))],
        })
    }

    fn sample_data(sender: SuiAddress, owner: SuiAddress) -> TransactionData {
        TransactionData::new(
            sample_kind(),
            sender,
            GasData {
                payment: vec![ObjectRef::new(
                    SuiAddress::new([3; 32]),
                    4,
                    ObjectDigest::new([5; 32]),
                )],
                owner,
                price: 1000,
                budget: 50_000_000,
            },
        )
    }

    #[test]
    fn test_kind_layout() {
        let bytes = sample_kind().to_bytes().unwrap();
        // kind tag, 1 input, Pure tag, 2 bytes, 1 command, MoveCall tag
        assert_eq!(&bytes[..7], &[0, 1, 0, 2, 1, 2, 1]);
        assert_eq!(bytes[7], 0);
        assert_eq!(&bytes[8..40], SuiAddress::FRAMEWORK.as_bytes());
        assert_eq!(TransactionKind::from_bytes(&bytes).unwrap(), sample_kind());
    }

    #[test]
    fn test_data_roundtrip_keeps_sender() {
        let sender = SuiAddress::new([1; 32]);
        let sponsor = SuiAddress::new([2; 32]);
        let data = sample_data(sender, sponsor);
        let decoded = TransactionData::from_bytes(&data.to_bytes().unwrap()).unwrap();
        assert_eq!(decoded.sender(), sender);
        assert_eq!(decoded.gas_owner(), sponsor);
        assert!(decoded.is_sponsored());
        assert_eq!(decoded.required_signers(), vec![sender, sponsor]);
    }

    #[test]
    fn test_self_paid_requires_one_signer() {
        let sender = SuiAddress::new([1; 32]);
        let data = sample_data(sender, sender);
        assert!(!data.is_sponsored());
        assert_eq!(data.required_signers(), vec![sender]);
    }

    #[test]
    fn test_digests_change_with_gas() {
        let sender = SuiAddress::new([1; 32]);
        let a = sample_data(sender, SuiAddress::new([2; 32]));
        let b = sample_data(sender, SuiAddress::new([9; 32]));
        assert_ne!(a.digest().unwrap(), b.digest().unwrap());
        assert_ne!(a.signing_digest().unwrap(), b.signing_digest().unwrap());
    }

    #[test]
    fn test_uses_gas_coin() {
        let mut pt = sample_kind().programmable().clone();
        assert!(!pt.uses_gas_coin());
        pt.commands
            .push(Command::TransferObjects(vec![Argument::GasCoin], Argument::Input(0)));
        assert!(pt.uses_gas_coin());
    }

    #[test]
    fn test_argument_tags() {
        assert_eq!(encoding::encode(&Argument::GasCoin).unwrap(), vec![0]);
        assert_eq!(encoding::encode(&Argument::Input(2)).unwrap(), vec![1, 2, 0]);
        assert_eq!(
            encoding::encode(&Argument::NestedResult(1, 0)).unwrap(),
            vec![3, 1, 0, 0, 0]
        );
    }
}
