//! Configuration types for the TrustRail pipeline.
//!
//! The routing table is configuration, not code: adding a rail means adding
//! a [`RouteBinding`] entry, never touching pipeline logic.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{constants, IntentType, ProviderName};

/// One routing-table entry: which rail serves an intent, and the fee
/// multiplier applied to the payout amount on that rail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteBinding {
    /// The rail this intent dispatches through.
    pub provider: ProviderName,
    /// Multiplier applied to the presentment amount before dispatch.
    /// Defaults to 1; real values are an integration decision.
    #[serde(default = "default_fee_multiplier")]
    pub fee_multiplier: Decimal,
}

fn default_fee_multiplier() -> Decimal {
    Decimal::ONE
}

impl RouteBinding {
    #[must_use]
    pub fn new(provider: ProviderName) -> Self {
        Self {
            provider,
            fee_multiplier: Decimal::ONE,
        }
    }
}

/// The intent → rail routing table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Intent classification to route binding.
    pub routes: HashMap<IntentType, RouteBinding>,
}

impl RoutingConfig {
    /// The standard three-rail table: goods through the card network,
    /// housing through bank transfer, services through stablecoin.
    #[must_use]
    pub fn standard() -> Self {
        let mut routes = HashMap::new();
        routes.insert(IntentType::Goods, RouteBinding::new(ProviderName::CardNetwork));
        routes.insert(IntentType::Housing, RouteBinding::new(ProviderName::BankTransfer));
        routes.insert(IntentType::Service, RouteBinding::new(ProviderName::Stablecoin));
        Self { routes }
    }

    /// Look up the binding for an intent, if one is configured.
    #[must_use]
    pub fn binding(&self, intent: IntentType) -> Option<&RouteBinding> {
        self.routes.get(&intent)
    }
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self::standard()
    }
}

/// Retry policy knobs for retryable provider failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total dispatch attempts (first try included).
    pub max_attempts: u32,
    /// Base backoff in milliseconds; doubles per retry.
    pub backoff_base_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: constants::DEFAULT_MAX_PAYOUT_ATTEMPTS,
            backoff_base_ms: constants::DEFAULT_BACKOFF_BASE_MS,
        }
    }
}

/// Top-level pipeline configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// ISO currency code payouts are denominated in.
    pub currency: String,
    /// The intent → rail routing table.
    pub routing: RoutingConfig,
    /// Retry policy for retryable provider failures.
    pub retry: RetryConfig,
    /// Ceiling on a single presentment amount.
    pub max_presentment_amount: Decimal,
    /// Base URL evidence content ids are appended to for the
    /// caller-facing evidence link. None disables the link.
    pub evidence_base_url: Option<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            currency: constants::DEFAULT_CURRENCY.to_string(),
            routing: RoutingConfig::standard(),
            retry: RetryConfig::default(),
            max_presentment_amount: Decimal::from(constants::DEFAULT_MAX_PRESENTMENT_AMOUNT),
            evidence_base_url: None,
        }
    }
}
