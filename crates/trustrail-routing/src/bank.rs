//! Bank-transfer (ACH-style) rail adapter.
//!
//! Bank rails address the recipient by email and denominate in decimal
//! strings. The payout reference doubles as the rail-side dedup key.

use chrono::Utc;
use serde_json::json;
use trustrail_types::{
    Destination, PayoutReceipt, PayoutRequest, ProviderName, Result, TrustrailError,
};

use crate::adapter::{extract_reference, provider_failure, PayoutAdapter, RailGateway};

/// Adapter for the bank-transfer rail.
pub struct BankTransferAdapter {
    gateway: Box<dyn RailGateway>,
}

impl BankTransferAdapter {
    #[must_use]
    pub fn new(gateway: Box<dyn RailGateway>) -> Self {
        Self { gateway }
    }
}

impl PayoutAdapter for BankTransferAdapter {
    fn provider(&self) -> ProviderName {
        ProviderName::BankTransfer
    }

    fn execute(&self, request: &PayoutRequest) -> Result<PayoutReceipt> {
        let Destination::BankRecipient { email } = &request.destination else {
            return Err(TrustrailError::ProviderFailure {
                provider: self.provider(),
                code: "INVALID_DESTINATION".to_string(),
                message: "bank rail requires a recipient email".to_string(),
                retryable: false,
            });
        };

        let payload = json!({
            "reference": request.idempotency_key.to_string(),
            "amount": request.amount.to_string(),
            "currency": request.currency,
            "recipient": email,
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

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use rust_decimal::Decimal;
    use trustrail_types::{IdempotencyKey, TransactionId};

    use super::*;
    use crate::adapter::GatewayFault;

    struct ScriptedGateway {
        response: std::result::Result<serde_json::Value, GatewayFault>,
        submitted: Mutex<Vec<serde_json::Value>>,
    }

    impl RailGateway for ScriptedGateway {
        fn submit(
            &self,
            payload: &serde_json::Value,
        ) -> std::result::Result<serde_json::Value, GatewayFault> {
            self.submitted.lock().unwrap().push(payload.clone());
            self.response.clone()
        }
    }

    fn request(destination: Destination) -> PayoutRequest {
        PayoutRequest {
            amount: Decimal::new(120050, 2), // 1200.50
            currency: "USD".to_string(),
            destination,
            idempotency_key: IdempotencyKey::derive(&TransactionId::from("TX-rent-7")),
        }
    }

    #[test]
    fn builds_recipient_payload() {
        let gateway = Arc::new(ScriptedGateway {
            response: Ok(json!({"transaction": {"id": "ach-9"}})),
            submitted: Mutex::new(Vec::new()),
        });
        let adapter = BankTransferAdapter::new(Box::new(Arc::clone(&gateway)));

        let receipt = adapter
            .execute(&request(Destination::BankRecipient {
                email: "tenant@example.com".to_string(),
            }))
            .unwrap();

        assert_eq!(receipt.provider, ProviderName::BankTransfer);
        assert_eq!(receipt.reference, "ach-9");

        let submitted = gateway.submitted.lock().unwrap();
        assert_eq!(submitted[0]["recipient"], "tenant@example.com");
        assert_eq!(submitted[0]["amount"], "1200.50");
    }

    #[test]
    fn missing_recipient_refused_without_dispatch() {
        let gateway = Arc::new(ScriptedGateway {
            response: Ok(json!({"id": "never"})),
            submitted: Mutex::new(Vec::new()),
        });
        let adapter = BankTransferAdapter::new(Box::new(Arc::clone(&gateway)));

        let err = adapter
            .execute(&request(Destination::CardAccount))
            .unwrap_err();
        assert!(matches!(&err, TrustrailError::ProviderFailure { code, retryable, .. }
            if code == "INVALID_DESTINATION" && !retryable));
        assert!(
            gateway.submitted.lock().unwrap().is_empty(),
            "nothing may reach the rail on a bad destination"
        );
    }

    #[test]
    fn timeout_surfaces_as_retryable() {
        let gateway = ScriptedGateway {
            response: Err(GatewayFault::Timeout { ms: 5000 }),
            submitted: Mutex::new(Vec::new()),
        };
        let adapter = BankTransferAdapter::new(Box::new(gateway));
        let err = adapter
            .execute(&request(Destination::BankRecipient {
                email: "tenant@example.com".to_string(),
            }))
            .unwrap_err();
        assert!(err.is_retryable());
    }
}
