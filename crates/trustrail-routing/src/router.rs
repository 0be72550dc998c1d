//! Provider router — intent classification to payout rail.
//!
//! The routing table is pure configuration ([`trustrail_types::RoutingConfig`]);
//! this module only looks bindings up and resolves the concrete destination
//! for the chosen rail. Route resolution is a pre-reservation step: an
//! unsupported intent must reject the presentment before any funds move.

use std::collections::HashMap;

use trustrail_types::{
    Destination, Identity, IntentType, ProviderName, RecipientInfo, Result, RouteBinding,
    RoutingConfig, TrustrailError,
};

use crate::adapter::PayoutAdapter;

/// Config-driven intent → route lookup.
pub struct ProviderRouter {
    routing: RoutingConfig,
}

impl ProviderRouter {
    #[must_use]
    pub fn new(routing: RoutingConfig) -> Self {
        Self { routing }
    }

    /// Resolve the route binding for an intent.
    ///
    /// # Errors
    /// Returns `UnsupportedIntent` when the table has no entry — terminal,
    /// nothing is dispatched.
    pub fn route(&self, intent: IntentType) -> Result<&RouteBinding> {
        self.routing
            .binding(intent)
            .ok_or_else(|| TrustrailError::UnsupportedIntent {
                intent: intent.to_string(),
            })
    }
}

/// Holds the one adapter instance per registered rail.
#[derive(Default)]
pub struct AdapterRegistry {
    adapters: HashMap<ProviderName, Box<dyn PayoutAdapter>>,
}

impl AdapterRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            adapters: HashMap::new(),
        }
    }

    /// Register an adapter under the provider it reports. A later
    /// registration for the same provider replaces the earlier one.
    pub fn register(&mut self, adapter: Box<dyn PayoutAdapter>) {
        self.adapters.insert(adapter.provider(), adapter);
    }

    /// Look up the adapter for a provider.
    ///
    /// # Errors
    /// Returns `AdapterUnavailable` if the route names a rail nothing was
    /// registered for — a bootstrap misconfiguration.
    pub fn adapter(&self, provider: ProviderName) -> Result<&dyn PayoutAdapter> {
        self.adapters
            .get(&provider)
            .map(|adapter| &**adapter)
            .ok_or(TrustrailError::AdapterUnavailable(provider))
    }

    /// Number of registered rails.
    #[must_use]
    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    /// Whether no rails are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}

/// Resolve the concrete destination for a rail from the presentment's
/// recipient details.
///
/// Runs before the vault reservation, so a rail that cannot be addressed
/// (bank transfer without a recipient email) rejects the presentment while
/// it is still side-effect-free.
///
/// # Errors
/// Returns `ValidationFailed` when the rail needs recipient details the
/// presentment does not carry.
pub fn resolve_destination(
    provider: ProviderName,
    submitter: &Identity,
    recipient: Option<&RecipientInfo>,
) -> Result<Destination> {
    match provider {
        ProviderName::CardNetwork => Ok(Destination::CardAccount),
        ProviderName::BankTransfer => {
            let email = recipient
                .and_then(|r| r.email.clone())
                .filter(|e| !e.is_empty())
                .ok_or_else(|| TrustrailError::ValidationFailed {
                    reason: "bank transfer requires recipientInfo.recipientEmail".to_string(),
                })?;
            Ok(Destination::BankRecipient { email })
        }
        ProviderName::Stablecoin => {
            // Default to paying back to the submitter's wallet when no
            // explicit recipient address was given.
            let address = recipient
                .and_then(|r| r.address.clone())
                .filter(|a| !a.is_empty())
                .unwrap_or_else(|| submitter.as_str().to_string());
            Ok(Destination::WalletAddress { address })
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use trustrail_types::{PayoutReceipt, PayoutRequest};

    use super::*;

    struct NoopAdapter(ProviderName);

    impl PayoutAdapter for NoopAdapter {
        fn provider(&self) -> ProviderName {
            self.0
        }

        fn execute(&self, request: &PayoutRequest) -> Result<PayoutReceipt> {
            Ok(PayoutReceipt {
                provider: self.0,
                reference: request.idempotency_key.to_string(),
                payload: serde_json::json!({}),
                received_at: Utc::now(),
            })
        }
    }

    #[test]
    fn standard_table_routes_all_intents() {
        let router = ProviderRouter::new(RoutingConfig::standard());
        assert_eq!(
            router.route(IntentType::Goods).unwrap().provider,
            ProviderName::CardNetwork
        );
        assert_eq!(
            router.route(IntentType::Housing).unwrap().provider,
            ProviderName::BankTransfer
        );
        assert_eq!(
            router.route(IntentType::Service).unwrap().provider,
            ProviderName::Stablecoin
        );
    }

    #[test]
    fn missing_route_is_unsupported() {
        let mut cfg = RoutingConfig::standard();
        cfg.routes.remove(&IntentType::Housing);
        let router = ProviderRouter::new(cfg);
        let err = router.route(IntentType::Housing).unwrap_err();
        assert!(matches!(&err, TrustrailError::UnsupportedIntent { intent }
            if intent == "HOUSING"));
    }

    #[test]
    fn registry_lookup() {
        let mut registry = AdapterRegistry::new();
        assert!(registry.is_empty());
        registry.register(Box::new(NoopAdapter(ProviderName::Stablecoin)));
        assert_eq!(registry.len(), 1);
        assert!(registry.adapter(ProviderName::Stablecoin).is_ok());
        let err = registry.adapter(ProviderName::CardNetwork).unwrap_err();
        assert!(matches!(
            err,
            TrustrailError::AdapterUnavailable(ProviderName::CardNetwork)
        ));
    }

    #[test]
    fn card_destination_is_source_account() {
        let dest =
            resolve_destination(ProviderName::CardNetwork, &Identity::new("0xaaa"), None).unwrap();
        assert_eq!(dest, Destination::CardAccount);
    }

    #[test]
    fn bank_destination_requires_email() {
        let err =
            resolve_destination(ProviderName::BankTransfer, &Identity::new("0xaaa"), None)
                .unwrap_err();
        assert!(matches!(err, TrustrailError::ValidationFailed { .. }));

        let recipient = RecipientInfo {
            email: Some("tenant@example.com".to_string()),
            address: None,
        };
        let dest = resolve_destination(
            ProviderName::BankTransfer,
            &Identity::new("0xaaa"),
            Some(&recipient),
        )
        .unwrap();
        assert_eq!(
            dest,
            Destination::BankRecipient {
                email: "tenant@example.com".to_string()
            }
        );
    }

    #[test]
    fn stablecoin_destination_defaults_to_submitter() {
        let dest =
            resolve_destination(ProviderName::Stablecoin, &Identity::new("0xaaa"), None).unwrap();
        assert_eq!(
            dest,
            Destination::WalletAddress {
                address: "0xaaa".to_string()
            }
        );

        let recipient = RecipientInfo {
            email: None,
            address: Some("0xbbb".to_string()),
        };
        let dest = resolve_destination(
            ProviderName::Stablecoin,
            &Identity::new("0xaaa"),
            Some(&recipient),
        )
        .unwrap();
        assert_eq!(
            dest,
            Destination::WalletAddress {
                address: "0xbbb".to_string()
            }
        );
    }
}
