//! Card-network rail adapter.
//!
//! Card processors denominate in minor units (cents) and deduplicate on a
//! caller-supplied `idempotency_key`, so this adapter converts the decimal
//! amount exactly and threads the pipeline's deterministic key through.

use chrono::Utc;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::json;
use trustrail_types::{
    Destination, PayoutReceipt, PayoutRequest, ProviderName, Result, TrustrailError,
};

use crate::adapter::{extract_reference, provider_failure, PayoutAdapter, RailGateway};

/// Funding source identifier the card processor settles against.
const SOURCE_ID: &str = "TRUST_CHECK_VAULT";

/// Adapter for the card-network payments rail.
pub struct CardNetworkAdapter {
    gateway: Box<dyn RailGateway>,
}

impl CardNetworkAdapter {
    #[must_use]
    pub fn new(gateway: Box<dyn RailGateway>) -> Self {
        Self { gateway }
    }

    /// Convert a decimal major-unit amount into integral minor units.
    /// Sub-cent amounts cannot be represented on this rail and are refused
    /// before dispatch.
    fn minor_units(amount: Decimal) -> Result<i64> {
        let cents = amount * Decimal::from(100);
        if cents.fract() != Decimal::ZERO {
            return Err(TrustrailError::ProviderFailure {
                provider: ProviderName::CardNetwork,
                code: "AMOUNT_PRECISION".to_string(),
                message: format!("amount {amount} has sub-cent precision"),
                retryable: false,
            });
        }
        cents.to_i64().ok_or(TrustrailError::ProviderFailure {
            provider: ProviderName::CardNetwork,
            code: "AMOUNT_RANGE".to_string(),
            message: format!("amount {amount} exceeds the rail's range"),
            retryable: false,
        })
    }
}

impl PayoutAdapter for CardNetworkAdapter {
    fn provider(&self) -> ProviderName {
        ProviderName::CardNetwork
    }

    fn execute(&self, request: &PayoutRequest) -> Result<PayoutReceipt> {
        if request.destination != Destination::CardAccount {
            return Err(TrustrailError::ProviderFailure {
                provider: self.provider(),
                code: "INVALID_DESTINATION".to_string(),
                message: "card rail pays against the source account only".to_string(),
                retryable: false,
            });
        }

        let payload = json!({
            "idempotency_key": request.idempotency_key.to_string(),
            "amount_money": {
                "amount": Self::minor_units(request.amount)?,
                "currency": request.currency,
            },
            "source_id": SOURCE_ID,
        });

        let response = self
            .gateway
            .submit(&payload)
            .map_err(|fault| provider_failure(self.provider(), &fault))?;

        Ok(PayoutReceipt {
            provider: self.provider(),
            reference: extract_reference(&response, request),
            payload: response,
            received_at: Utc::now(),
        })
    }
}
