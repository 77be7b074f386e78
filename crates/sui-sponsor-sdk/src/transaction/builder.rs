//! Assembly of unsigned transactions.
//!
//! The builder turns a [`CallDescriptor`] into a programmable transaction:
//! pure arguments become `Pure` inputs, object arguments are resolved to
//! their current version through an [`ObjectResolver`], and vectors of
//! objects are gathered with a `MakeMoveVec` command ahead of the call.

use crate::api::ObjectResolver;
use crate::error::{SponsorError, SponsorResult};
use crate::transaction::argument::ArgumentValue;
use crate::transaction::call::CallDescriptor;
use crate::transaction::types::{
    Argument, CallArg, Command, GasData, ObjectArg, ProgrammableMoveCall,
    ProgrammableTransaction, TransactionData, TransactionDataV1, TransactionExpiration,
    TransactionKind,
};
use crate::types::{ObjectId, ObjectOwner, ResolvedObject, SuiAddress};
use std::collections::HashMap;

/// A transaction that has not been funded or signed yet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnsignedTransaction {
    sender: SuiAddress,
    call: CallDescriptor,
    kind: TransactionKind,
    gas: Option<GasData>,
    expiration: TransactionExpiration,
}

impl UnsignedTransaction {
    /// Returns the sender.
    pub fn sender(&self) -> SuiAddress {
        self.sender
    }

    /// Returns the call this transaction makes.
    pub fn call(&self) -> &CallDescriptor {
        &self.call
    }

    /// Returns the assembled transaction kind.
    pub fn kind(&self) -> &TransactionKind {
        &self.kind
    }

    /// Returns the gas payment, if one was set for self-paid submission.
    pub fn gas(&self) -> Option<&GasData> {
        self.gas.as_ref()
    }

    /// Encodes the gas-less transaction kind sent to a sponsor.
    pub fn to_bytes(&self) -> SponsorResult<Vec<u8>> {
        self.kind.to_bytes()
    }

    /// Completes the transaction with `gas`.
    pub fn finalize(&self, gas: GasData) -> TransactionData {
        TransactionData::V1(TransactionDataV1 {
            kind: self.kind.clone(),
            sender: self.sender,
            gas_data: gas,
            expiration: self.expiration,
        })
    }

    /// Completes a self-paid transaction with the gas set on the builder.
    pub fn transaction_data(&self) -> SponsorResult<TransactionData> {
        let gas = self.gas.clone().ok_or_else(|| {
            SponsorError::Config(
                "no gas payment set; send the transaction to a sponsor or set gas".to_string(),
            )
        })?;
        Ok(self.finalize(gas))
    }
}

/// Builder for [`UnsignedTransaction`].
///
/// # Example
///
/// ```rust,ignore
/// let unsigned = UnsignedTransactionBuilder::new()
///     .sender(user.address())
///     .call(call)
///     .build(&rpc)
///     .await?;
/// let kind_bytes = unsigned.to_bytes()?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct UnsignedTransactionBuilder {
    sender: Option<SuiAddress>,
    call: Option<CallDescriptor>,
    gas: Option<GasData>,
    expiration: TransactionExpiration,
}

impl UnsignedTransactionBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the sender.
    #[must_use]
    pub fn sender(mut self, sender: SuiAddress) -> Self {
        self.sender = Some(sender);
        self
    }

    /// Sets the call.
    #[must_use]
    pub fn call(mut self, call: CallDescriptor) -> Self {
        self.call = Some(call);
        self
    }

    /// Sets gas for a self-paid transaction.
    #[must_use]
    pub fn gas(mut self, gas: GasData) -> Self {
        self.gas = Some(gas);
        self
    }

    /// Sets the expiration.
    #[must_use]
    pub fn expiration(mut self, expiration: TransactionExpiration) -> Self {
        self.expiration = expiration;
        self
    }

    fn parts(self) -> SponsorResult<(SuiAddress, CallDescriptor, Self)> {
        let sender = self
            .sender
            .ok_or_else(|| SponsorError::format("sender is required"))?;
        let call = self
            .call
            .clone()
            .ok_or_else(|| SponsorError::format("call is required"))?;
        Ok((sender, call, self))
    }

    /// Builds the transaction, resolving object arguments through `resolver`.
    pub async fn build<R>(self, resolver: &R) -> SponsorResult<UnsignedTransaction>
    where
        R: ObjectResolver + ?Sized,
    {
        let (sender, call, rest) = self.parts()?;
        let resolved = resolve_objects(&call, resolver).await?;
        rest.assemble(sender, call, &resolved)
    }

    /// Builds the transaction without a ledger connection.
    ///
    /// Fails if the call has object arguments that are not pinned to a reference.
    pub fn build_offline(self) -> SponsorResult<UnsignedTransaction> {
        let (sender, call, rest) = self.parts()?;
        rest.assemble(sender, call, &HashMap::new())
    }

    fn assemble(
        self,
        sender: SuiAddress,
        call: CallDescriptor,
        resolved: &HashMap<ObjectId, ResolvedObject>,
    ) -> SponsorResult<UnsignedTransaction> {
        let mut composer = Composer::default();
        let arguments = call
            .arguments()
            .iter()
            .enumerate()
            .map(|(i, value)| composer.argument(value, resolved).map_err(|e| e.at(i)))
            .collect::<SponsorResult<Vec<_>>>()?;
        composer.commands.push(Command::MoveCall(Box::new(ProgrammableMoveCall {
            package: call.package(),
            module: call.module().to_string(),
            function: call.function().to_string(),
            type_arguments: call.type_arguments().to_vec(),
            arguments,
        })));

        let kind = TransactionKind::ProgrammableTransaction(ProgrammableTransaction {
            inputs: composer.inputs,
            commands: composer.commands,
        });
        tracing::debug!(
            sender = %sender,
            target = %call,
            "assembled unsigned transaction"
        );
        Ok(UnsignedTransaction {
            sender,
            call,
            kind,
            gas: self.gas,
            expiration: self.expiration,
        })
    }
}

/// Collects the distinct object ids in `value`, in order of appearance.
fn collect_objects(value: &ArgumentValue, out: &mut Vec<ObjectId>) {
    match value {
        ArgumentValue::Object { id, .. } => {
            if !out.contains(id) {
                out.push(*id);
            }
        }
        ArgumentValue::Vector(items) => items.iter().for_each(|v| collect_objects(v, out)),
        ArgumentValue::ObjectRef(_)
        | ArgumentValue::PureBytes(_)
        | ArgumentValue::OptionalBytes { .. } => {}
    }
}

async fn resolve_objects<R>(
    call: &CallDescriptor,
    resolver: &R,
) -> SponsorResult<HashMap<ObjectId, ResolvedObject>>
where
    R: ObjectResolver + ?Sized,
{
    let mut ids = Vec::new();
    for value in call.arguments() {
        collect_objects(value, &mut ids);
    }
    let lookups = ids.iter().map(|id| async move {
        resolver.resolve_object(*id).await.map_err(|e| match e {
            SponsorError::Resolution { .. } => e,
            other => SponsorError::resolution(id.to_hex(), &other),
        })
    });
    let objects = futures::future::try_join_all(lookups).await?;
    Ok(ids.into_iter().zip(objects).collect())
}

/// An argument error, tagged with its position once known.
struct ComposeError(SponsorError);

impl ComposeError {
    fn at(self, index: usize) -> SponsorError {
        match self.0 {
            SponsorError::Format(msg) => SponsorError::argument(index, msg),
            other => other,
        }
    }
}

impl From<SponsorError> for ComposeError {
    fn from(e: SponsorError) -> Self {
        Self(e)
    }
}

#[derive(Default)]
struct Composer {
    inputs: Vec<CallArg>,
    commands: Vec<Command>,
    objects: HashMap<ObjectId, u16>,
}

impl Composer {
    fn push_input(&mut self, input: CallArg) -> Result<u16, ComposeError> {
        let index = u16::try_from(self.inputs.len())
            .map_err(|_| SponsorError::format("too many transaction inputs"))?;
        self.inputs.push(input);
        Ok(index)
    }

    fn object_input(&mut self, arg: ObjectArg) -> Result<Argument, ComposeError> {
        let id = arg.id();
        if let Some(&index) = self.objects.get(&id) {
            // the same shared object used twice must be mutable if either use is
            if let (
                CallArg::Object(ObjectArg::SharedObject { mutable, .. }),
                ObjectArg::SharedObject {
                    mutable: wanted, ..
                },
            ) = (&mut self.inputs[usize::from(index)], &arg)
            {
                *mutable |= *wanted;
            }
            return Ok(Argument::Input(index));
        }
        let index = self.push_input(CallArg::Object(arg))?;
        self.objects.insert(id, index);
        Ok(Argument::Input(index))
    }

    fn argument(
        &mut self,
        value: &ArgumentValue,
        resolved: &HashMap<ObjectId, ResolvedObject>,
    ) -> Result<Argument, ComposeError> {
        match value {
            ArgumentValue::Object { id, mutable } => {
                let object = resolved.get(id).ok_or_else(|| {
                    SponsorError::format(format!(
                        "object {id} needs a ledger lookup; build with a resolver"
                    ))
                })?;
                let arg = match object.owner {
                    ObjectOwner::Shared {
                        initial_shared_version,
                    } => ObjectArg::SharedObject {
                        id: *id,
                        initial_shared_version,
                        mutable: *mutable,
                    },
                    ObjectOwner::Address(_) | ObjectOwner::Object(_) | ObjectOwner::Immutable => {
                        ObjectArg::ImmOrOwnedObject(object.object_ref)
                    }
                };
                self.object_input(arg)
            }
            ArgumentValue::ObjectRef(object_ref) => {
                self.object_input(ObjectArg::ImmOrOwnedObject(*object_ref))
            }
            ArgumentValue::Vector(items) if value.is_object() => {
                let elements = items
                    .iter()
                    .map(|item| self.argument(item, resolved))
                    .collect::<Result<Vec<_>, _>>()?;
                let index = u16::try_from(self.commands.len())
                    .map_err(|_| SponsorError::format("too many commands"))?;
                self.commands.push(Command::MakeMoveVec(None, elements));
                Ok(Argument::Result(index))
            }
            pure => {
                let bytes = pure
                    .pure_bytes()
                    .ok_or_else(|| SponsorError::Internal("unexpected object value".into()))?;
                Ok(Argument::Input(self.push_input(CallArg::Pure(bytes))?))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::argument::{ParameterKind, RawArgument};
    use crate::types::{ObjectDigest, ObjectRef};
    use async_trait::async_trait;

    struct Ledger(HashMap<ObjectId, ResolvedObject>);

    impl Ledger {
        fn with_shared(id: ObjectId, version: u64) -> Self {
            let mut map = HashMap::new();
            map.insert(
                id,
                ResolvedObject {
                    object_ref: ObjectRef::new(id, version, ObjectDigest::new([1; 32])),
                    owner: ObjectOwner::Shared {
                        initial_shared_version: 1,
                    },
                },
            );
            Self(map)
        }

        fn add_owned(mut self, id: ObjectId, owner: SuiAddress) -> Self {
            self.0.insert(
                id,
                ResolvedObject {
                    object_ref: ObjectRef::new(id, 9, ObjectDigest::new([2; 32])),
                    owner: ObjectOwner::Address(owner),
                },
            );
            self
        }
    }

    #[async_trait]
    impl ObjectResolver for Ledger {
        async fn resolve_object(&self, id: ObjectId) -> SponsorResult<ResolvedObject> {
            self.0
                .get(&id)
                .copied()
                .ok_or_else(|| SponsorError::object_missing(id.to_hex(), "not found"))
        }
    }

    struct Offline;

    #[async_trait]
    impl ObjectResolver for Offline {
        async fn resolve_object(&self, _id: ObjectId) -> SponsorResult<ResolvedObject> {
            Err(SponsorError::api(503, "node unavailable"))
        }
    }

    fn sender() -> SuiAddress {
        SuiAddress::new([0xaa; 32])
    }

    #[tokio::test]
    async fn test_shared_and_owned_objects() {
        let owned = SuiAddress::new([7; 32]);
        let ledger = Ledger::with_shared(SuiAddress::CLOCK, 100).add_owned(owned, sender());
        let call = CallDescriptor::new("0x2::m::f")
            .arg(ParameterKind::OptionalString, "Qm123")
            .arg(ParameterKind::SharedClock, RawArgument::Null)
            .object(owned, true)
            .build()
            .unwrap();
        let unsigned = UnsignedTransactionBuilder::new()
            .sender(sender())
            .call(call)
            .build(&ledger)
            .await
            .unwrap();

        let pt = unsigned.kind().programmable();
        assert_eq!(pt.inputs.len(), 3);
        assert_eq!(
            pt.inputs[1],
            CallArg::Object(ObjectArg::SharedObject {
                id: SuiAddress::CLOCK,
                initial_shared_version: 1,
                mutable: false,
            })
        );
        assert!(matches!(
            pt.inputs[2],
            CallArg::Object(ObjectArg::ImmOrOwnedObject(r)) if r.version == 9
        ));
        assert!(!unsigned.to_bytes().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_objects_share_one_input() {
        let ledger = Ledger::with_shared(SuiAddress::CLOCK, 5);
        let call = CallDescriptor::new("0x2::m::f")
            .object(SuiAddress::CLOCK, false)
            .object(SuiAddress::CLOCK, true)
            .build()
            .unwrap();
        let unsigned = UnsignedTransactionBuilder::new()
            .sender(sender())
            .call(call)
            .build(&ledger)
            .await
            .unwrap();
        let pt = unsigned.kind().programmable();
        assert_eq!(pt.inputs.len(), 1);
        assert!(matches!(
            pt.inputs[0],
            CallArg::Object(ObjectArg::SharedObject { mutable: true, .. })
        ));
    }

    #[tokio::test]
    async fn test_object_vector_uses_make_move_vec() {
        let a = SuiAddress::new([1; 32]);
        let b = SuiAddress::new([2; 32]);
        let ledger = Ledger(HashMap::new()).add_owned(a, sender()).add_owned(b, sender());
        let call = CallDescriptor::new("0x2::m::f")
            .value(ArgumentValue::Vector(vec![
                ArgumentValue::Object { id: a, mutable: true },
                ArgumentValue::Object { id: b, mutable: true },
            ]))
            .build()
            .unwrap();
        let unsigned = UnsignedTransactionBuilder::new()
            .sender(sender())
            .call(call)
            .build(&ledger)
            .await
            .unwrap();
        let pt = unsigned.kind().programmable();
        assert_eq!(
            pt.commands[0],
            Command::MakeMoveVec(None, vec![Argument::Input(0), Argument::Input(1)])
        );
        match &pt.commands[1] {
            Command::MoveCall(call) => assert_eq!(call.arguments, vec![Argument::Result(0)]),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_object_is_not_retryable() {
        let call = CallDescriptor::new("0x2::m::f")
            .object(SuiAddress::new([3; 32]), true)
            .build()
            .unwrap();
        let err = UnsignedTransactionBuilder::new()
            .sender(sender())
            .call(call)
            .build(&Ledger(HashMap::new()))
            .await
            .unwrap_err();
        assert!(matches!(err, SponsorError::Resolution { retryable: false, .. }));
    }

    #[tokio::test]
    async fn test_connectivity_failure_is_retryable() {
        let call = CallDescriptor::new("0x2::m::f")
            .object(SuiAddress::new([3; 32]), true)
            .build()
            .unwrap();
        let err = UnsignedTransactionBuilder::new()
            .sender(sender())
            .call(call)
            .build(&Offline)
            .await
            .unwrap_err();
        assert!(matches!(err, SponsorError::Resolution { retryable: true, .. }));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_offline_build_with_pinned_refs() {
        let pinned = ObjectRef::new(SuiAddress::new([4; 32]), 3, ObjectDigest::new([0; 32]));
        let call = CallDescriptor::new("0x2::m::f")
            .object_ref(pinned)
            .pure(&1u64)
            .build()
            .unwrap();
        let unsigned = UnsignedTransactionBuilder::new()
            .sender(sender())
            .call(call)
            .build_offline()
            .unwrap();
        assert_eq!(unsigned.kind().programmable().inputs.len(), 2);
        assert!(unsigned.transaction_data().is_err());

        let gas = GasData {
            payment: vec![pinned],
            owner: sender(),
            price: 1000,
            budget: 10_000,
        };
        let data = unsigned.finalize(gas);
        assert_eq!(data.sender(), sender());
        assert!(!data.is_sponsored());
    }

    #[test]
    fn test_offline_build_rejects_unresolved_objects() {
        let call = CallDescriptor::new("0x2::m::f")
            .pure(&1u64)
            .object(SuiAddress::new([5; 32]), true)
            .build()
            .unwrap();
        let err = UnsignedTransactionBuilder::new()
            .sender(sender())
            .call(call)
            .build_offline()
            .unwrap_err();
        assert!(err.to_string().contains("argument 1"));
    }

    #[test]
    fn test_missing_sender() {
        let call = CallDescriptor::new("0x2::m::f").build().unwrap();
        assert!(UnsignedTransactionBuilder::new().call(call).build_offline().is_err());
    }
}
