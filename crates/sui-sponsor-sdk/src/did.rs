//! Calls into an on-chain DID registry module.
//!
//! Every entry function of the registry takes the shared clock as its last
//! argument. Pass `None` for the clock to use the system clock at `0x6`.
//!
//! ```rust
//! use sui_sponsor_sdk::did::DidCalls;
//! use sui_sponsor_sdk::SuiAddress;
//!
//! let did = DidCalls::new(SuiAddress::new([0x42; 32]), "did");
//! let call = did.create(Some("Qm123"), None).unwrap();
//! assert_eq!(call.function(), "create");
//! assert!(call.has_object_arguments());
//! ```

use crate::api::InspectOutcome;
use crate::error::SponsorResult;
use crate::transaction::{CallDescriptor, FunctionSignature, ParameterKind, PureType, RawArgument};
use crate::types::{ObjectId, SuiAddress};

const DID: ParameterKind = ParameterKind::Object { mutable: true };
const ADDRESS: ParameterKind = ParameterKind::Pure(PureType::Address);

/// Builds calls for the DID registry published in `package` under `module`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DidCalls {
    package: ObjectId,
    module: String,
}

impl DidCalls {
    /// Targets `package::module`.
    pub fn new(package: ObjectId, module: impl Into<String>) -> Self {
        Self {
            package,
            module: module.into(),
        }
    }

    /// Returns the package id.
    pub fn package(&self) -> ObjectId {
        self.package
    }

    /// Returns the module name.
    pub fn module(&self) -> &str {
        &self.module
    }

    fn signature(&self, function: &str, parameters: Vec<ParameterKind>) -> FunctionSignature {
        FunctionSignature::new(
            format!("{}::{}::{}", self.package, self.module, function),
            parameters,
        )
    }

    fn call(
        &self,
        function: &str,
        parameters: Vec<ParameterKind>,
        arguments: Vec<RawArgument>,
    ) -> SponsorResult<CallDescriptor> {
        self.signature(function, parameters).call(&[], arguments)
    }

    /// `create(cid: Option<String>, clock)`.
    pub fn create(&self, cid: Option<&str>, clock: Option<ObjectId>) -> SponsorResult<CallDescriptor> {
        self.call(
            "create",
            vec![ParameterKind::OptionalString, ParameterKind::SharedClock],
            vec![cid.into(), clock.into()],
        )
    }

    /// `add_controller(did, controller: address, clock)`.
    pub fn add_controller(
        &self,
        did: ObjectId,
        controller: SuiAddress,
        clock: Option<ObjectId>,
    ) -> SponsorResult<CallDescriptor> {
        self.call(
            "add_controller",
            vec![DID, ADDRESS, ParameterKind::SharedClock],
            vec![did.into(), controller.into(), clock.into()],
        )
    }

    /// `remove_controller(did, controller: address, clock)`.
    pub fn remove_controller(
        &self,
        did: ObjectId,
        controller: SuiAddress,
        clock: Option<ObjectId>,
    ) -> SponsorResult<CallDescriptor> {
        self.call(
            "remove_controller",
            vec![DID, ADDRESS, ParameterKind::SharedClock],
            vec![did.into(), controller.into(), clock.into()],
        )
    }

    /// `update_cid(did, cid: Option<String>, clock)`.
    pub fn update_cid(
        &self,
        did: ObjectId,
        cid: Option<&str>,
        clock: Option<ObjectId>,
    ) -> SponsorResult<CallDescriptor> {
        self.call(
            "update_cid",
            vec![DID, ParameterKind::OptionalString, ParameterKind::SharedClock],
            vec![did.into(), cid.into(), clock.into()],
        )
    }

    /// `revoke(did, clock)`.
    pub fn revoke(&self, did: ObjectId, clock: Option<ObjectId>) -> SponsorResult<CallDescriptor> {
        self.call(
            "revoke",
            vec![DID, ParameterKind::SharedClock],
            vec![did.into(), clock.into()],
        )
    }

    /// `reactivate(did, clock)`.
    pub fn reactivate(
        &self,
        did: ObjectId,
        clock: Option<ObjectId>,
    ) -> SponsorResult<CallDescriptor> {
        self.call(
            "reactivate",
            vec![DID, ParameterKind::SharedClock],
            vec![did.into(), clock.into()],
        )
    }

    /// `get_did_string(registry, owner: address)`, meant for read-only inspection.
    pub fn get_did_string(
        &self,
        registry: ObjectId,
        owner: SuiAddress,
    ) -> SponsorResult<CallDescriptor> {
        self.call(
            "get_did_string",
            vec![ParameterKind::Object { mutable: false }, ADDRESS],
            vec![registry.into(), owner.into()],
        )
    }

    /// Reads the DID string returned by an inspected `get_did_string` call.
    ///
    /// Returns `None` when the call returned nothing.
    pub fn decode_did_string(outcome: &InspectOutcome) -> SponsorResult<Option<String>> {
        outcome
            .first_return_value()
            .map(|value| value.decode::<String>())
            .transpose()
    }
}
