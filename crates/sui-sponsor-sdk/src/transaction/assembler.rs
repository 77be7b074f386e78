//! Combining the user's and the sponsor's signatures.
//!
//! A sponsored transaction carries two signatures over the same bytes:
//! the sender's first, then the gas owner's. [`SignedEnvelope`] fixes that
//! order and can check it; [`GaslessExecutor`] drives a whole call from an
//! unsigned transaction to its on-chain effects.

use crate::api::{ExecutionOutcome, ExecutionService, InspectOutcome, ObjectResolver};
use crate::crypto::{SuiKeyPair, SuiSignature};
use crate::error::{SponsorError, SponsorResult};
use crate::transaction::builder::{UnsignedTransaction, UnsignedTransactionBuilder};
use crate::transaction::call::CallDescriptor;
use crate::transaction::sponsored::{GasRequest, GasResponse, SponsorBackend};
use crate::transaction::types::TransactionData;
use crate::types::{SuiAddress, TransactionDigest};
use serde_json::json;

/// Transaction bytes with their signatures, ready for submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedEnvelope {
    bytes: Vec<u8>,
    signatures: Vec<SuiSignature>,
}

impl SignedEnvelope {
    /// Creates an envelope for a sponsored transaction, sender first.
    pub fn new(
        bytes: Vec<u8>,
        sender_signature: SuiSignature,
        sponsor_signature: SuiSignature,
    ) -> Self {
        Self {
            bytes,
            signatures: vec![sender_signature, sponsor_signature],
        }
    }

    /// Creates an envelope for a transaction the sender pays for.
    pub fn single(bytes: Vec<u8>, signature: SuiSignature) -> Self {
        Self {
            bytes,
            signatures: vec![signature],
        }
    }

    /// Creates an envelope with signatures in the given order.
    pub fn from_parts(bytes: Vec<u8>, signatures: Vec<SuiSignature>) -> Self {
        Self { bytes, signatures }
    }

    /// Returns the signed transaction bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the signatures in submission order.
    pub fn signatures(&self) -> &[SuiSignature] {
        &self.signatures
    }

    /// Decodes the signed transaction.
    pub fn transaction_data(&self) -> SponsorResult<TransactionData> {
        TransactionData::from_bytes(&self.bytes)
    }

    /// Returns the transaction digest.
    pub fn digest(&self) -> SponsorResult<TransactionDigest> {
        self.transaction_data()?.digest()
    }

    /// Base64 of the transaction bytes.
    pub fn tx_bytes_base64(&self) -> String {
        base64::encode(&self.bytes)
    }

    /// Base64 of each signature, in order.
    pub fn signatures_base64(&self) -> Vec<String> {
        self.signatures.iter().map(SuiSignature::to_base64).collect()
    }

    /// Checks every signature against the bytes and the expected signers.
    ///
    /// Position `i` must be a valid signature over these exact bytes by the
    /// `i`-th required signer: the sender, then the gas owner when they differ.
    pub fn verify(&self) -> SponsorResult<()> {
        let data = self.transaction_data()?;
        let expected = data.required_signers();
        if self.signatures.len() != expected.len() {
            return Err(SponsorError::signature_mismatch(
                self.signatures.len().min(expected.len()),
                format!(
                    "expected {} signatures, got {}",
                    expected.len(),
                    self.signatures.len()
                ),
            ));
        }
        for (position, (signature, signer)) in self.signatures.iter().zip(&expected).enumerate() {
            let actual = signature.signer_address();
            if actual != *signer {
                return Err(SponsorError::signature_mismatch(
                    position,
                    format!("signed by {actual}, expected {signer}"),
                ));
            }
            signature.verify_transaction(&self.bytes).map_err(|e| {
                SponsorError::signature_mismatch(
                    position,
                    format!("signature does not cover these bytes: {e}"),
                )
            })?;
        }
        Ok(())
    }
}

/// Signs a sponsor's response as the sender.
///
/// The bytes are signed exactly as returned. Before signing, the sponsored
/// transaction must still name `signer` as sender, do what `expected` does,
/// and carry a valid sponsor signature from its gas owner.
pub fn countersign(
    response: &GasResponse,
    signer: &SuiKeyPair,
    expected: &UnsignedTransaction,
) -> SponsorResult<SignedEnvelope> {
    let data = response.transaction_data()?;
    if data.sender() != signer.address() || data.sender() != expected.sender() {
        return Err(SponsorError::signature_mismatch(
            0,
            format!(
                "sponsored transaction is from {}, expected {}",
                data.sender(),
                expected.sender()
            ),
        ));
    }
    if data.kind() != expected.kind() {
        return Err(SponsorError::signature_mismatch(
            1,
            "sponsor returned a different transaction",
        ));
    }
    if data.gas_owner() != response.fee_payer()? {
        return Err(SponsorError::signature_mismatch(
            1,
            format!(
                "gas owner {} is not the fee payer {}",
                data.gas_owner(),
                response.fee_payer_address
            ),
        ));
    }

    let sponsor_signature = response.signature()?;
    let sender_signature = signer.sign_transaction(&response.sponsored_bytes)?;
    let envelope = SignedEnvelope::new(
        response.sponsored_bytes.clone(),
        sender_signature,
        sponsor_signature,
    );
    envelope.verify()?;
    Ok(envelope)
}

/// Folds a refused submission into an `Execution` error.
///
/// Nodes refuse envelopes (bad signatures, stale object versions) with a
/// JSON-RPC error rather than failed effects.
fn rejected_submission(envelope: &SignedEnvelope, error: SponsorError) -> SponsorError {
    let effects = match &error {
        SponsorError::Execution { .. } => return error,
        SponsorError::Api {
            status_code,
            message,
            rpc_code,
        } => Some(json!({
            "httpStatus": status_code,
            "code": rpc_code,
            "message": message,
        })),
        _ => None,
    };
    let digest = envelope.digest().ok().map(|d| d.to_string());
    tracing::warn!(
        digest = digest.as_deref().unwrap_or("unknown"),
        error = %error.sanitized_message(),
        "submission refused"
    );
    SponsorError::Execution {
        status: error.sanitized_message(),
        digest,
        effects,
    }
}

/// Runs calls without the sender paying for gas.
///
/// # Example
///
/// ```rust,ignore
/// let executor = GaslessExecutor::new(SponsorClient::new(sponsor_url)?, rpc);
/// let call = DidCalls::new(package, "did").create(Some("Qm123"), None)?;
/// let outcome = executor.execute_call(&user_key, call).await?;
/// println!("executed {}", outcome.digest);
/// ```
#[derive(Debug, Clone)]
pub struct GaslessExecutor<S, E> {
    sponsor: S,
    ledger: E,
}

impl<S: SponsorBackend, E: ExecutionService> GaslessExecutor<S, E> {
    /// Creates an executor asking `sponsor` for gas and submitting to `ledger`.
    pub fn new(sponsor: S, ledger: E) -> Self {
        Self { sponsor, ledger }
    }

    /// Returns the sponsor backend.
    pub fn sponsor(&self) -> &S {
        &self.sponsor
    }

    /// Returns the ledger.
    pub fn ledger(&self) -> &E {
        &self.ledger
    }

    /// Asks the sponsor to fund `transaction`.
    pub async fn request_sponsorship(
        &self,
        transaction: &UnsignedTransaction,
    ) -> SponsorResult<GasResponse> {
        let request = GasRequest::new(transaction.to_bytes()?, transaction.sender());
        self.sponsor.request_gas(request).await
    }

    /// Funds, signs and submits `transaction`.
    ///
    /// Any failed submission is returned as an `Execution` error: an on-chain
    /// abort carries the effects, a node refusal carries its error object.
    /// Nothing is retried once the envelope has been submitted.
    pub async fn execute(
        &self,
        transaction: &UnsignedTransaction,
        signer: &SuiKeyPair,
    ) -> SponsorResult<ExecutionOutcome> {
        let response = self.request_sponsorship(transaction).await?;
        let envelope = countersign(&response, signer, transaction)?;
        tracing::info!(
            sender = %transaction.sender(),
            sponsor = %response.fee_payer_address,
            call = %transaction.call(),
            "submitting sponsored transaction"
        );
        let outcome = match self.ledger.execute(&envelope).await {
            Ok(outcome) => outcome,
            Err(error) => return Err(rejected_submission(&envelope, error)),
        };
        tracing::info!(
            digest = %outcome.digest,
            success = outcome.status.is_success(),
            "sponsored transaction executed"
        );
        outcome.into_result()
    }

    /// Runs `transaction` read-only and returns its results.
    pub async fn simulate(&self, transaction: &UnsignedTransaction) -> SponsorResult<InspectOutcome> {
        self.ledger
            .dev_inspect(transaction.sender(), &transaction.to_bytes()?)
            .await?
            .into_result()
    }
}

impl<S: SponsorBackend, E: ExecutionService + ObjectResolver> GaslessExecutor<S, E> {
    async fn build(&self, sender: SuiAddress, call: CallDescriptor) -> SponsorResult<UnsignedTransaction> {
        UnsignedTransactionBuilder::new()
            .sender(sender)
            .call(call)
            .build(&self.ledger)
            .await
    }

    /// Builds `call` for `signer` and executes it sponsored.
    pub async fn execute_call(
        &self,
        signer: &SuiKeyPair,
        call: CallDescriptor,
    ) -> SponsorResult<ExecutionOutcome> {
        let transaction = self.build(signer.address(), call).await?;
        self.execute(&transaction, signer).await
    }

    /// Builds `call` for `sender` and runs it read-only.
    pub async fn simulate_call(
        &self,
        sender: SuiAddress,
        call: CallDescriptor,
    ) -> SponsorResult<InspectOutcome> {
        let transaction = self.build(sender, call).await?;
        self.simulate(&transaction).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::SignatureScheme;
    use crate::transaction::types::{GasData, TransactionKind};
    use crate::types::{ObjectDigest, ObjectRef};

    fn keypair() -> SuiKeyPair {
        SuiKeyPair::generate(SignatureScheme::Ed25519).unwrap()
    }

    fn unsigned(sender: SuiAddress) -> UnsignedTransaction {
        let call = CallDescriptor::new("0x2::m::f").pure(&1u64).build().unwrap();
        UnsignedTransactionBuilder::new()
            .sender(sender)
            .call(call)
            .build_offline()
            .unwrap()
    }

    fn sponsored(
        transaction: &UnsignedTransaction,
        sponsor: &SuiKeyPair,
        kind: Option<TransactionKind>,
    ) -> GasResponse {
        let mut data = transaction.finalize(GasData {
            payment: vec![ObjectRef::new(SuiAddress::new([9; 32]), 3, ObjectDigest::new([9; 32]))],
            owner: sponsor.address(),
            price: 1000,
            budget: 10_000_000,
        });
        if let Some(kind) = kind {
            data = TransactionData::new(kind, data.sender(), data.gas_data().clone());
        }
        let bytes = data.to_bytes().unwrap();
        GasResponse {
            sponsor_signature: sponsor.sign_transaction(&bytes).unwrap().to_base64(),
            sponsored_bytes: bytes,
            fee_payer_address: sponsor.address().to_hex(),
        }
    }

    #[test]
    fn test_countersign_orders_sender_first() {
        let (user, sponsor) = (keypair(), keypair());
        let transaction = unsigned(user.address());
        let response = sponsored(&transaction, &sponsor, None);

        let envelope = countersign(&response, &user, &transaction).unwrap();
        assert_eq!(envelope.bytes(), response.sponsored_bytes.as_slice());
        assert_eq!(envelope.signatures()[0].signer_address(), user.address());
        assert_eq!(envelope.signatures()[1].signer_address(), sponsor.address());
        assert!(envelope.verify().is_ok());
    }

    #[test]
    fn test_reversed_order_rejected() {
        let (user, sponsor) = (keypair(), keypair());
        let transaction = unsigned(user.address());
        let response = sponsored(&transaction, &sponsor, None);
        let envelope = countersign(&response, &user, &transaction).unwrap();

        let reversed = SignedEnvelope::from_parts(
            envelope.bytes().to_vec(),
            envelope.signatures().iter().rev().cloned().collect(),
        );
        assert!(matches!(
            reversed.verify(),
            Err(SponsorError::SignatureMismatch { position: 0, .. })
        ));
    }

    #[test]
    fn test_foreign_bytes_rejected() {
        let (user, sponsor) = (keypair(), keypair());
        let transaction = unsigned(user.address());
        let response = sponsored(&transaction, &sponsor, None);
        let envelope = countersign(&response, &user, &transaction).unwrap();

        // sender signs a different gas price
        let mut other = response.transaction_data().unwrap();
        let TransactionData::V1(ref mut v1) = other;
        v1.gas_data.price += 1;
        let other_bytes = other.to_bytes().unwrap();
        let wrong = SignedEnvelope::new(
            response.sponsored_bytes.clone(),
            user.sign_transaction(&other_bytes).unwrap(),
            envelope.signatures()[1].clone(),
        );
        assert!(matches!(
            wrong.verify(),
            Err(SponsorError::SignatureMismatch { position: 0, .. })
        ));
    }

    #[test]
    fn test_missing_signature_rejected() {
        let (user, sponsor) = (keypair(), keypair());
        let transaction = unsigned(user.address());
        let response = sponsored(&transaction, &sponsor, None);
        let lone = SignedEnvelope::single(
            response.sponsored_bytes.clone(),
            user.sign_transaction(&response.sponsored_bytes).unwrap(),
        );
        assert!(matches!(
            lone.verify(),
            Err(SponsorError::SignatureMismatch { position: 1, .. })
        ));
    }

    #[test]
    fn test_countersign_refuses_altered_transaction() {
        let (user, sponsor) = (keypair(), keypair());
        let transaction = unsigned(user.address());
        let altered = TransactionKind::ProgrammableTransaction(Default::default());
        let response = sponsored(&transaction, &sponsor, Some(altered));
        assert!(matches!(
            countersign(&response, &user, &transaction),
            Err(SponsorError::SignatureMismatch { position: 1, .. })
        ));

        let stranger = keypair();
        let response = sponsored(&transaction, &sponsor, None);
        assert!(matches!(
            countersign(&response, &stranger, &transaction),
            Err(SponsorError::SignatureMismatch { position: 0, .. })
        ));
    }

    #[test]
    fn test_envelope_base64_parts() {
        let (user, sponsor) = (keypair(), keypair());
        let transaction = unsigned(user.address());
        let response = sponsored(&transaction, &sponsor, None);
        let envelope = countersign(&response, &user, &transaction).unwrap();
        let signatures = envelope.signatures_base64();
        assert_eq!(signatures.len(), 2);
        assert_eq!(signatures[1], response.sponsor_signature);
        assert!(!envelope.tx_bytes_base64().is_empty());
    }
}
