//! Behavioral tests for the SDK.
//!
//! These tests drive the public API end to end against an in-memory ledger,
//! without requiring a live network.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use sui_sponsor_sdk::api::{
    CoinProvider, ExecutionOutcome, ExecutionService, ExecutionStatus, InspectOutcome,
    ObjectResolver, ReturnValue,
};
use sui_sponsor_sdk::crypto::{SignatureScheme, SuiKeyPair};
use sui_sponsor_sdk::transaction::{
    CallDescriptor, GasRequest, GasStation, SignedEnvelope, UnsignedTransaction,
    UnsignedTransactionBuilder,
};
use sui_sponsor_sdk::types::{Coin, ObjectDigest, ObjectOwner, ResolvedObject};
use sui_sponsor_sdk::{ObjectId, ObjectRef, SponsorError, SponsorResult, SuiAddress};

/// A ledger kept in memory: objects, the sponsor's coins and submitted envelopes.
#[derive(Clone, Default)]
struct MemoryLedger {
    objects: Arc<HashMap<ObjectId, ResolvedObject>>,
    coins: Arc<Vec<Coin>>,
    submitted: Arc<Mutex<Vec<SignedEnvelope>>>,
    returns: Arc<Vec<ReturnValue>>,
    abort: Option<String>,
}

impl MemoryLedger {
    fn new() -> Self {
        Self::default()
    }

    fn with_shared(mut self, id: ObjectId) -> Self {
        let mut objects = (*self.objects).clone();
        objects.insert(
            id,
            ResolvedObject {
                object_ref: ObjectRef::new(id, 40, ObjectDigest::new([4; 32])),
                owner: ObjectOwner::Shared {
                    initial_shared_version: 1,
                },
            },
        );
        self.objects = Arc::new(objects);
        self
    }

    fn with_coins(mut self, balances: &[u64]) -> Self {
        let coins = balances
            .iter()
            .enumerate()
            .map(|(i, balance)| {
                let seed = 0x10 + i as u8;
                Coin {
                    object_ref: ObjectRef::new(
                        SuiAddress::new([seed; 32]),
                        1,
                        ObjectDigest::new([seed; 32]),
                    ),
                    balance: *balance,
                }
            })
            .collect();
        self.coins = Arc::new(coins);
        self
    }

    fn with_returns(mut self, returns: Vec<ReturnValue>) -> Self {
        self.returns = Arc::new(returns);
        self
    }

    /// Every accepted envelope aborts on chain with `error`.
    fn with_abort(mut self, error: &str) -> Self {
        self.abort = Some(error.to_string());
        self
    }

    fn submitted(&self) -> Vec<SignedEnvelope> {
        self.submitted.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectResolver for MemoryLedger {
    async fn resolve_object(&self, id: ObjectId) -> SponsorResult<ResolvedObject> {
        self.objects
            .get(&id)
            .copied()
            .ok_or_else(|| SponsorError::object_missing(id.to_hex(), "not found"))
    }
}

#[async_trait]
impl CoinProvider for MemoryLedger {
    async fn coins(&self, _owner: SuiAddress, _coin_type: &str) -> SponsorResult<Vec<Coin>> {
        Ok(self.coins.to_vec())
    }

    async fn reference_gas_price(&self) -> SponsorResult<u64> {
        Ok(1000)
    }
}

#[async_trait]
impl ExecutionService for MemoryLedger {
    async fn execute(&self, envelope: &SignedEnvelope) -> SponsorResult<ExecutionOutcome> {
        // The engine only applies envelopes whose signatures line up with
        // the sender and gas owner.
        let status = match (envelope.verify(), &self.abort) {
            (Err(e), _) => ExecutionStatus::Failure {
                error: e.to_string(),
            },
            (Ok(()), Some(error)) => ExecutionStatus::Failure {
                error: error.clone(),
            },
            (Ok(()), None) => ExecutionStatus::Success,
        };
        let digest = envelope.digest()?.to_string();
        let effects = match &status {
            ExecutionStatus::Success => serde_json::json!({
                "status": { "status": "success" },
                "transactionDigest": digest,
            }),
            ExecutionStatus::Failure { error } => serde_json::json!({
                "status": { "status": "failure", "error": error },
                "transactionDigest": digest,
            }),
        };
        self.submitted.lock().unwrap().push(envelope.clone());
        Ok(ExecutionOutcome {
            digest,
            status,
            effects,
            events: vec![],
        })
    }

    async fn dev_inspect(
        &self,
        _sender: SuiAddress,
        _kind_bytes: &[u8],
    ) -> SponsorResult<InspectOutcome> {
        Ok(InspectOutcome {
            status: ExecutionStatus::Success,
            results: vec![self.returns.to_vec()],
            effects: serde_json::Value::Null,
        })
    }
}

fn keypair() -> SuiKeyPair {
    SuiKeyPair::generate(SignatureScheme::Ed25519).unwrap()
}

fn station(ledger: &MemoryLedger) -> GasStation<MemoryLedger> {
    GasStation::new(keypair(), ledger.clone())
}

fn transfer_call(amount: u64) -> CallDescriptor {
    CallDescriptor::new("0x2::example::pay")
        .pure(&amount)
        .pure(&SuiAddress::new([0xcc; 32]))
        .build()
        .unwrap()
}

fn unsigned(sender: SuiAddress, call: CallDescriptor) -> UnsignedTransaction {
    UnsignedTransactionBuilder::new()
        .sender(sender)
        .call(call)
        .build_offline()
        .unwrap()
}

mod encoding_tests {
    use proptest::prelude::*;
    use sui_sponsor_sdk::encoding::{
        decode_address, decode_optional_string, decode_vector, encode_address,
        encode_optional_string, encode_vector,
    };

    proptest! {
        #[test]
        fn test_address_roundtrip(bytes in any::<[u8; 32]>(), upper in any::<bool>()) {
            let digits = hex::encode(bytes);
            let text = if upper {
                format!("0x{}", digits.to_uppercase())
            } else {
                format!("0x{digits}")
            };
            let encoded = encode_address(&text).unwrap();
            prop_assert_eq!(decode_address(&encoded).unwrap(), format!("0x{digits}"));
        }

        #[test]
        fn test_vector_preserves_order(items in prop::collection::vec(any::<u64>(), 0..64)) {
            let encoded = encode_vector(&items).unwrap();
            prop_assert_eq!(decode_vector::<u64>(&encoded).unwrap(), items);
        }

        #[test]
        fn test_string_vector_preserves_order(items in prop::collection::vec(".{0,12}", 0..16)) {
            let encoded = encode_vector(&items).unwrap();
            prop_assert_eq!(decode_vector::<String>(&encoded).unwrap(), items);
        }
    }

    #[test]
    fn test_absent_and_empty_strings_differ() {
        let absent = encode_optional_string(None);
        let empty = encode_optional_string(Some(""));
        assert_ne!(absent, empty);
        assert_eq!(decode_optional_string(&absent).unwrap(), None);
        assert_eq!(decode_optional_string(&empty).unwrap().as_deref(), Some(""));
    }

    #[test]
    fn test_malformed_address_rejected() {
        let long = format!("0x{}", "a".repeat(65));
        for text in ["0x6", "aa", "0xzz", long.as_str()] {
            assert!(encode_address(text).is_err(), "{text} should be rejected");
        }
    }
}

mod sponsor_tests {
    use super::*;
    use sui_sponsor_sdk::transaction::{SponsorOutcome, SponsorPhase, http_error};

    #[tokio::test]
    async fn test_sponsor_never_changes_sender() {
        let ledger = MemoryLedger::new().with_coins(&[u64::MAX]);
        let station = station(&ledger);

        for seed in [0x01u8, 0x5a, 0xaa, 0xff] {
            let sender = SuiAddress::new([seed; 32]);
            let transaction = unsigned(sender, transfer_call(u64::from(seed)));
            let response = station
                .sponsor(GasRequest::new(transaction.to_bytes().unwrap(), sender))
                .await
                .into_result()
                .unwrap();

            let data = response.transaction_data().unwrap();
            assert_eq!(data.sender(), sender);
            assert_eq!(data.kind(), transaction.kind());
            assert_eq!(data.gas_owner(), station.address());
            station.release(&data.gas_data().payment[0].object_id).await;
        }
    }

    #[tokio::test]
    async fn test_empty_inventory_never_signs() {
        let ledger = MemoryLedger::new();
        let station = station(&ledger);
        let sender = SuiAddress::new([0xaa; 32]);
        let transaction = unsigned(sender, transfer_call(5));

        let outcome = station
            .sponsor(GasRequest::new(transaction.to_bytes().unwrap(), sender))
            .await;
        match outcome {
            SponsorOutcome::Rejected { phase, error } => {
                assert_eq!(phase, SponsorPhase::Funded);
                assert!(matches!(error, SponsorError::InsufficientGas { .. }));
                assert_eq!(http_error(&error).0, 500);
            }
            SponsorOutcome::Returned(response) => {
                panic!("signed without gas: {}", response.sponsor_signature)
            }
        }
    }

    #[tokio::test]
    async fn test_inventory_exhausted_by_reservations() {
        let ledger = MemoryLedger::new().with_coins(&[u64::MAX, u64::MAX]);
        let station = station(&ledger);
        let sender = SuiAddress::new([0xaa; 32]);
        let bytes = unsigned(sender, transfer_call(1)).to_bytes().unwrap();

        let first = station.sponsor(GasRequest::new(bytes.clone(), sender)).await;
        let second = station.sponsor(GasRequest::new(bytes.clone(), sender)).await;
        let third = station.sponsor(GasRequest::new(bytes, sender)).await;

        let coin = |outcome: SponsorOutcome| {
            outcome.into_result().unwrap().transaction_data().unwrap().gas_data().payment[0]
        };
        assert_ne!(coin(first), coin(second));
        assert!(matches!(
            third.into_result(),
            Err(SponsorError::InsufficientGas { .. })
        ));
    }
}

mod assembly_tests {
    use super::*;
    use sui_sponsor_sdk::transaction::{GaslessExecutor, SponsorBackend, countersign};

    #[tokio::test]
    async fn test_user_signs_sponsored_bytes_verbatim() {
        let ledger = MemoryLedger::new().with_coins(&[u64::MAX]);
        let executor = GaslessExecutor::new(station(&ledger), ledger.clone());
        let user = keypair();
        let transaction = unsigned(user.address(), transfer_call(9));

        let response = executor.request_sponsorship(&transaction).await.unwrap();
        let envelope = countersign(&response, &user, &transaction).unwrap();
        assert_eq!(envelope.bytes(), response.sponsored_bytes.as_slice());

        let sender_signature = &envelope.signatures()[0];
        assert!(
            sender_signature
                .verify_transaction(&response.sponsored_bytes)
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_engine_accepts_only_sender_then_sponsor() {
        let ledger = MemoryLedger::new().with_coins(&[u64::MAX]);
        let station = station(&ledger);
        let user = keypair();
        let transaction = unsigned(user.address(), transfer_call(3));

        let response = station
            .request_gas(GasRequest::new(
                transaction.to_bytes().unwrap(),
                user.address(),
            ))
            .await
            .unwrap();
        let bytes = response.sponsored_bytes.clone();
        let sender_signature = user.sign_transaction(&bytes).unwrap();
        let sponsor_signature = response.signature().unwrap();

        let ordered = SignedEnvelope::new(
            bytes.clone(),
            sender_signature.clone(),
            sponsor_signature.clone(),
        );
        let swapped = SignedEnvelope::from_parts(bytes, vec![sponsor_signature, sender_signature]);

        let accepted = ledger.execute(&ordered).await.unwrap();
        let rejected = ledger.execute(&swapped).await.unwrap();
        assert!(accepted.status.is_success());
        assert!(!rejected.status.is_success());
        assert!(matches!(
            swapped.verify(),
            Err(SponsorError::SignatureMismatch { position: 0, .. })
        ));
    }

    #[tokio::test]
    async fn test_foreign_bytes_rejected_before_submission() {
        let ledger = MemoryLedger::new().with_coins(&[u64::MAX]);
        let executor = GaslessExecutor::new(station(&ledger), ledger.clone());
        let user = keypair();
        let requested = unsigned(user.address(), transfer_call(1));
        let other = unsigned(user.address(), transfer_call(2));

        let response = executor.request_sponsorship(&other).await.unwrap();
        assert!(matches!(
            countersign(&response, &user, &requested),
            Err(SponsorError::SignatureMismatch { position: 1, .. })
        ));
        assert!(ledger.submitted().is_empty());
    }
}

mod scenario_tests {
    use super::*;
    use sui_sponsor_sdk::did::DidCalls;
    use sui_sponsor_sdk::encoding::encode_string;
    use sui_sponsor_sdk::transaction::{
        ArgumentValue, CallArg, FunctionSignature, GaslessExecutor, ObjectArg, ParameterKind,
        RawArgument,
    };

    fn sender_text() -> String {
        format!("0x{}", "a".repeat(64))
    }

    fn clock_text() -> String {
        format!("0x{}", "b".repeat(64))
    }

    #[tokio::test]
    async fn test_create_is_sponsored_without_changing_sender() {
        let sender = SuiAddress::from_canonical(&sender_text()).unwrap();
        let clock = SuiAddress::from_canonical(&clock_text()).unwrap();

        let create = FunctionSignature::new(
            "0x42::did::create",
            vec![ParameterKind::OptionalString, ParameterKind::SharedClock],
        );
        let call = create
            .call(
                &[],
                vec![
                    RawArgument::from(Some("Qm123")),
                    RawArgument::from(clock_text()),
                ],
            )
            .unwrap();
        assert_eq!(
            call.arguments(),
            &[
                ArgumentValue::OptionalBytes {
                    present: true,
                    bytes: encode_string("Qm123"),
                },
                ArgumentValue::Object {
                    id: clock,
                    mutable: false,
                },
            ]
        );

        let ledger = MemoryLedger::new()
            .with_shared(clock)
            .with_coins(&[1_000_000_000]);
        let transaction = UnsignedTransactionBuilder::new()
            .sender(sender)
            .call(call)
            .build(&ledger)
            .await
            .unwrap();
        let bytes = transaction.to_bytes().unwrap();
        assert!(!bytes.is_empty());
        assert!(matches!(
            transaction.kind().programmable().inputs[1],
            CallArg::Object(ObjectArg::SharedObject { mutable: false, .. })
        ));

        let station = station(&ledger);
        let response = station
            .sponsor(GasRequest::new(bytes, sender))
            .await
            .into_result()
            .unwrap();
        let data = response.transaction_data().unwrap();
        assert_eq!(data.sender().to_hex(), sender_text());
        assert_eq!(data.gas_owner(), station.address());
        assert_eq!(response.fee_payer().unwrap(), station.address());
    }

    #[tokio::test]
    async fn test_did_lifecycle_through_executor() {
        let package = SuiAddress::new([0x42; 32]);
        let did = SuiAddress::new([0x77; 32]);
        let user = keypair();
        let ledger = MemoryLedger::new()
            .with_shared(SuiAddress::CLOCK)
            .with_shared(did)
            .with_coins(&[1_000_000_000, 1_000_000_000, 1_000_000_000]);
        let executor = GaslessExecutor::new(station(&ledger), ledger.clone());
        let calls = DidCalls::new(package, "did");

        executor
            .execute_call(&user, calls.create(Some("Qm123"), None).unwrap())
            .await
            .unwrap();
        executor
            .execute_call(&user, calls.revoke(did, None).unwrap())
            .await
            .unwrap();

        let submitted = ledger.submitted();
        assert_eq!(submitted.len(), 2);
        for envelope in &submitted {
            let data = envelope.transaction_data().unwrap();
            assert_eq!(data.sender(), user.address());
            assert_eq!(envelope.signatures().len(), 2);
            assert_eq!(envelope.signatures()[0].signer_address(), user.address());
            assert_eq!(envelope.signatures()[1].signer_address(), data.gas_owner());
        }
    }

    #[tokio::test]
    async fn test_on_chain_abort_surfaces_effects() {
        let did = SuiAddress::new([0x77; 32]);
        let user = keypair();
        let ledger = MemoryLedger::new()
            .with_shared(SuiAddress::CLOCK)
            .with_shared(did)
            .with_coins(&[1_000_000_000])
            .with_abort("MoveAbort(did::revoke, 3)");
        let executor = GaslessExecutor::new(station(&ledger), ledger.clone());
        let call = DidCalls::new(SuiAddress::new([0x42; 32]), "did")
            .revoke(did, None)
            .unwrap();

        let error = executor.execute_call(&user, call).await.unwrap_err();
        let submitted = ledger.submitted();
        assert_eq!(submitted.len(), 1);
        let expected_digest = submitted[0].digest().unwrap().to_string();
        match error {
            SponsorError::Execution {
                status,
                digest,
                effects,
            } => {
                assert_eq!(status, "MoveAbort(did::revoke, 3)");
                assert_eq!(digest.as_deref(), Some(expected_digest.as_str()));
                let effects = effects.unwrap();
                assert_eq!(effects["status"]["status"], "failure");
                assert_eq!(effects["transactionDigest"], expected_digest.as_str());
            }
            other => panic!("expected an execution error, got {other:?}"),
        }
        assert!(!SponsorError::Execution {
            status: String::new(),
            digest: None,
            effects: None
        }
        .is_retryable());
    }

    #[tokio::test]
    async fn test_did_string_read_back() {
        let registry = SuiAddress::new([0x55; 32]);
        let ledger = MemoryLedger::new()
            .with_shared(registry)
            .with_returns(vec![ReturnValue {
                bytes: encode_string("did:sui:0xaa"),
                type_tag: "0x1::string::String".into(),
            }]);
        let executor = GaslessExecutor::new(station(&ledger), ledger.clone());
        let user = SuiAddress::new([0xaa; 32]);

        let call = DidCalls::new(SuiAddress::new([0x42; 32]), "did")
            .get_did_string(registry, user)
            .unwrap();
        let outcome = executor.simulate_call(user, call).await.unwrap();
        assert_eq!(
            DidCalls::decode_did_string(&outcome).unwrap().as_deref(),
            Some("did:sui:0xaa")
        );
    }
}
