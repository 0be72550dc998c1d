//! System-wide constants for the TrustRail settlement pipeline.

/// Default maximum dispatch attempts per presentment (first try + retries).
pub const DEFAULT_MAX_PAYOUT_ATTEMPTS: u32 = 3;

/// Default base backoff between payout retries, in milliseconds.
/// Attempt `n` waits `base * 2^(n-1)`.
pub const DEFAULT_BACKOFF_BASE_MS: u64 = 200;

/// Default ceiling on a single presentment amount (anti-fat-finger).
pub const DEFAULT_MAX_PRESENTMENT_AMOUNT: u64 = 1_000_000;

/// Default ISO currency code for payouts.
pub const DEFAULT_CURRENCY: &str = "USD";

/// Capacity hint for the settled-transaction registry.
pub const SETTLED_REGISTRY_CAPACITY: usize = 500_000;

/// Maximum accepted length of a client-supplied transaction id.
pub const MAX_TRANSACTION_ID_LEN: usize = 128;

/// HTTP header carrying the webhook body MAC.
pub const WEBHOOK_SIGNATURE_HEADER: &str = "x-trustrail-signature";

/// Webhook event type that triggers settlement finalization.
pub const EVENT_PAYMENT_CONFIRMED: &str = "payment.confirmed";

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "TrustRail";
