//! The settlement pipeline orchestrator.
//!
//! Sequences the admission plane, the dispatch plane, and the finality
//! plane for one presentment, enforcing the ordering invariants:
//!
//! - nothing is paid before a fresh trust-oracle verification
//! - the route (and destination) resolves before funds are reserved, so a
//!   rejection can never strand a reservation
//! - the settled registry is marked the moment a dispatch succeeds, before
//!   recording, so a recording failure cannot re-open the presentment
//! - a recording failure after payout surfaces as `settled_unrecorded`,
//!   never as a plain failure
//!
//! The webhook confirmation path shares the recorder with the synchronous
//! path; both funnel through the same idempotent `record_settlement`.

use trustrail_ingress::{
    OracleGate, PresentmentValidator, SignatureVerifier, TrustOracle, VaultGuard,
};
use trustrail_routing::{resolve_destination, AdapterRegistry, ProviderRouter, RetryPolicy};
use trustrail_settlement::{
    evidence_url, parse_event, EvidenceStore, LedgerStore, RecordOutcome, SettledRegistry,
    SettlementRecorder, WebhookEvent, WebhookVerifier,
};
use trustrail_types::{
    IdempotencyKey, PayoutReceipt, PayoutRequest, PipelineConfig, Presentment,
    PresentmentRequest, ProviderName, Result, SettlementSnapshot, SettlementSource,
    SubmissionResponse, TransactionId, TrustrailError, WebhookResponse,
};

use crate::state::PipelineState;

/// Externally owned collaborator handles, injected at bootstrap.
///
/// Lifecycle (connection pools, keys, files) belongs to the embedding
/// service; the pipeline only sequences calls against these handles.
pub struct Collaborators {
    /// Authoritative trust-check verifier.
    pub oracle: Box<dyn TrustOracle>,
    /// Custodial vault backing payouts.
    pub vault: VaultGuard,
    /// One adapter per payout rail.
    pub adapters: AdapterRegistry,
    /// Durable settlement ledger.
    pub ledger: Box<dyn LedgerStore>,
    /// Optional content-addressed evidence store.
    pub evidence: Option<Box<dyn EvidenceStore>>,
    /// Authorization verifier (wallet signatures, service tokens).
    pub signatures: SignatureVerifier,
    /// Webhook body authenticator.
    pub webhook: WebhookVerifier,
    /// The rail whose confirmations arrive on the webhook endpoint.
    pub webhook_provider: ProviderName,
}

/// Orchestrates the presentment settlement pipeline.
pub struct SettlementPipeline {
    config: PipelineConfig,
    validator: PresentmentValidator,
    signatures: SignatureVerifier,
    oracle: OracleGate,
    vault: VaultGuard,
    router: ProviderRouter,
    adapters: AdapterRegistry,
    retry: RetryPolicy,
    registry: SettledRegistry,
    recorder: SettlementRecorder,
    webhook: WebhookVerifier,
    webhook_provider: ProviderName,
}

impl SettlementPipeline {
    /// Assemble the pipeline from its configuration and collaborators.
    #[must_use]
    pub fn new(config: PipelineConfig, collaborators: Collaborators) -> Self {
        let Collaborators {
            oracle,
            vault,
            adapters,
            ledger,
            evidence,
            signatures,
            webhook,
            webhook_provider,
        } = collaborators;

        Self {
            validator: PresentmentValidator::with_max_amount(config.max_presentment_amount),
            router: ProviderRouter::new(config.routing.clone()),
            retry: RetryPolicy::new(config.retry),
            registry: SettledRegistry::new(),
            recorder: SettlementRecorder::new(ledger, evidence),
            oracle: OracleGate::new(oracle),
            signatures,
            vault,
            adapters,
            webhook,
            webhook_provider,
            config,
        }
    }

    /// Seed the settled registry from previously recorded transaction ids
    /// (ledger replay at bootstrap).
    pub fn hydrate_settled(&self, ids: impl IntoIterator<Item = TransactionId>) {
        self.registry.hydrate(ids);
    }

    /// Current vault balance (reporting only).
    #[must_use]
    pub fn vault_balance(&self) -> rust_decimal::Decimal {
        self.vault.balance()
    }

    /// Process one presentment submission end to end.
    ///
    /// # Errors
    /// Every pre-reservation error is terminal and side-effect-free; map it
    /// to a wire status with [`TrustrailError::http_status`]. A post-payout
    /// recording failure is **not** an error — it returns the
    /// `SettledUnrecorded` response.
    pub fn submit(&self, request: PresentmentRequest) -> Result<SubmissionResponse> {
        let mut state = PipelineState::Received;

        // -- Received: parse and validate, reject settled repeats ---------
        let (presentment, proof) = request.into_presentment()?;
        self.validator.validate(&presentment)?;
        self.reject_if_settled(&presentment.transaction_id)?;

        // -- Authenticated ------------------------------------------------
        self.signatures.verify(&presentment, &proof)?;
        state = self.advance(state, PipelineState::Authenticated, &presentment);

        // -- TrustVerified: fresh oracle query, fail closed ---------------
        self.oracle.require_valid(&presentment)?;
        state = self.advance(state, PipelineState::TrustVerified, &presentment);

        // Resolve the route and destination while rejection is still free
        // of side effects.
        let binding = self.router.route(presentment.intent)?;
        let adapter = self.adapters.adapter(binding.provider)?;
        let destination = resolve_destination(
            binding.provider,
            &presentment.submitter,
            presentment.recipient.as_ref(),
        )?;
        let payout_amount = (presentment.amount * binding.fee_multiplier).normalize();

        // -- FundsReserved: atomic compare-and-decrement ------------------
        let balance_after = self.vault.reserve(payout_amount)?;
        state = self.advance(state, PipelineState::FundsReserved, &presentment);

        // -- PayoutDispatched: bounded retry, one idempotency key ---------
        let payout_request = PayoutRequest {
            amount: payout_amount,
            currency: self.config.currency.clone(),
            destination,
            idempotency_key: IdempotencyKey::derive(&presentment.transaction_id),
        };
        let receipt = self
            .retry
            .run(|| adapter.execute(&payout_request))
            .map_err(|err| {
                // Reserved but unpaid: the deficit is a known quantity.
                tracing::error!(
                    transaction_id = %presentment.transaction_id,
                    provider = %binding.provider,
                    amount = %payout_amount,
                    state = %PipelineState::Failed,
                    "payout dispatch failed after reservation: {err}"
                );
                err
            })?;
        state = self.advance(state, PipelineState::PayoutDispatched, &presentment);

        // Money moved: this id must never pay again, even if recording
        // fails below.
        if let Err(err) = self.registry.mark_settled(&presentment.transaction_id) {
            tracing::warn!(
                transaction_id = %presentment.transaction_id,
                "settled registry already held id at dispatch: {err}"
            );
        }

        // -- Recorded | SettledUnrecorded ---------------------------------
        let snapshot = SettlementSnapshot::from_receipt(
            presentment.transaction_id.clone(),
            payout_amount,
            &self.config.currency,
            &receipt,
            balance_after,
            SettlementSource::Presentment,
        );
        match self.recorder.record_settlement(snapshot.clone()) {
            Ok(RecordOutcome::Recorded(recorded)) => {
                self.advance(state, PipelineState::Recorded, &presentment);
                Ok(SubmissionResponse::Success {
                    transaction_id: presentment.transaction_id,
                    amount: payout_amount,
                    provider: binding.provider,
                    receipt: receipt.payload,
                    settlement_snapshot: recorded.snapshot,
                    evidence_url: match (&self.config.evidence_base_url, &recorded.content_id) {
                        (Some(base), Some(cid)) => Some(evidence_url(base, cid)),
                        _ => None,
                    },
                })
            }
            Ok(RecordOutcome::AlreadyRecorded) => {
                // The webhook confirmation won the race to the ledger; the
                // payout itself happened exactly once.
                self.advance(state, PipelineState::Recorded, &presentment);
                Ok(SubmissionResponse::Success {
                    transaction_id: presentment.transaction_id,
                    amount: payout_amount,
                    provider: binding.provider,
                    receipt: receipt.payload,
                    settlement_snapshot: snapshot,
                    evidence_url: None,
                })
            }
            Err(err) => {
                self.advance(state, PipelineState::SettledUnrecorded, &presentment);
                tracing::error!(
                    transaction_id = %presentment.transaction_id,
                    "payout succeeded but durable recording failed: {err}"
                );
                Ok(SubmissionResponse::SettledUnrecorded {
                    transaction_id: presentment.transaction_id,
                })
            }
        }
    }

    /// Process an asynchronous provider confirmation.
    ///
    /// The body is authenticated against its exact raw bytes before any
    /// parsing. Recognized confirmations finalize through the same
    /// idempotent recorder as the synchronous path; duplicates are no-ops;
    /// unrecognized event types are acknowledged without side effects.
    ///
    /// # Errors
    /// - `WebhookAuthFailed` / `WebhookMalformed` for bad deliveries (400)
    /// - `RecordingFailure` when finalization cannot reach the ledger — the
    ///   provider will redeliver, and the path is idempotent
    pub fn confirm(&self, raw_body: &[u8], signature_hex: &str) -> Result<WebhookResponse> {
        self.webhook.verify(raw_body, signature_hex)?;

        let (reference, amount, data) = match parse_event(raw_body)? {
            WebhookEvent::Unrecognized { event_type } => {
                tracing::debug!(event_type, "ignoring unrecognized webhook event");
                return Ok(WebhookResponse { received: true });
            }
            WebhookEvent::PaymentConfirmed {
                reference,
                amount,
                data,
            } => (reference, amount, data),
        };

        let provider_ref = data
            .get("id")
            .and_then(serde_json::Value::as_str)
            .unwrap_or(reference.as_str())
            .to_string();
        let receipt = PayoutReceipt {
            provider: self.webhook_provider,
            reference: provider_ref,
            payload: data,
            received_at: chrono::Utc::now(),
        };
        let snapshot = SettlementSnapshot::from_receipt(
            reference.clone(),
            amount.normalize(),
            &self.config.currency,
            &receipt,
            self.vault.balance(),
            SettlementSource::WebhookConfirmation,
        );

        match self.recorder.record_settlement(snapshot)? {
            RecordOutcome::Recorded(_) => {
                // The sync path may or may not have marked the id already.
                if self.registry.mark_settled(&reference).is_ok() {
                    tracing::info!(
                        transaction_id = %reference,
                        "settlement finalized from webhook confirmation"
                    );
                }
            }
            RecordOutcome::AlreadyRecorded => {
                tracing::debug!(
                    transaction_id = %reference,
                    "duplicate confirmation, already recorded"
                );
            }
        }

        Ok(WebhookResponse { received: true })
    }

    /// Reject a transaction id that already settled, checking the
    /// in-process registry first and the durable ledger second.
    fn reject_if_settled(&self, transaction_id: &TransactionId) -> Result<()> {
        if self.registry.is_settled(transaction_id) || self.recorder.is_recorded(transaction_id)? {
            return Err(TrustrailError::AlreadySettled(transaction_id.clone()));
        }
        Ok(())
    }

    /// Advance the state machine, asserting the transition is legal.
    fn advance(
        &self,
        from: PipelineState,
        to: PipelineState,
        presentment: &Presentment,
    ) -> PipelineState {
        debug_assert!(from.can_transition_to(to), "illegal transition {from} → {to}");
        tracing::debug!(
            transaction_id = %presentment.transaction_id,
            state = %to,
            "pipeline state"
        );
        to
    }
}
