//! Stablecoin / crypto settlement rail adapter.
//!
//! Builds a send-transaction payload addressed to the recipient wallet.
//! Amounts travel as decimal strings; the chain-side transaction id comes
//! back as the payout reference.

use chrono::Utc;
use serde_json::json;
use trustrail_types::{
    Destination, PayoutReceipt, PayoutRequest, ProviderName, Result, TrustrailError,
};

use crate::adapter::{extract_reference, provider_failure, PayoutAdapter, RailGateway};

/// Adapter for the stablecoin settlement rail.
pub struct StablecoinAdapter {
    gateway: Box<dyn RailGateway>,
}

impl StablecoinAdapter {
    #[must_use]
    pub fn new(gateway: Box<dyn RailGateway>) -> Self {
        Self { gateway }
    }
}

impl PayoutAdapter for StablecoinAdapter {
    fn provider(&self) -> ProviderName {
        ProviderName::Stablecoin
    }

    fn execute(&self, request: &PayoutRequest) -> Result<PayoutReceipt> {
        let Destination::WalletAddress { address } = &request.destination else {
            return Err(TrustrailError::ProviderFailure {
                provider: self.provider(),
                code: "INVALID_DESTINATION".to_string(),
                message: "stablecoin rail requires a wallet address".to_string(),
                retryable: false,
            });
        };

        let payload = json!({
            "type": "send",
            "to": address,
            "amount": request.amount.to_string(),
            "currency": request.currency,
            "idem": request.idempotency_key.to_string(),
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
