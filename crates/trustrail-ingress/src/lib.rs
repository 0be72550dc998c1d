//! # trustrail-ingress
//!
//! **Admission Plane**: everything that must pass before funds can move.
//!
//! ## Architecture
//!
//! The admission plane sits between the API layer and provider dispatch:
//! 1. **PresentmentValidator**: hard gate — field-level and limit checks
//! 2. **SignatureVerifier**: binds the submitter identity to this exact payload
//! 3. **OracleGate**: fresh authoritative trust-check verification
//! 4. **VaultGuard**: atomic compare-and-decrement reservation
//!
//! ## Admission Flow
//!
//! ```text
//! API → PresentmentValidator.validate() → SignatureVerifier.verify()
//!     → OracleGate.require_valid() → VaultGuard.reserve() → dispatch
//! ```
//!
//! Every check is fail-closed: an error anywhere stops the presentment
//! before any balance is touched.

pub mod oracle;
pub mod signature;
pub mod validator;
pub mod vault;

pub use oracle::{OracleFault, OracleGate, TrustOracle};
pub use signature::SignatureVerifier;
pub use validator::PresentmentValidator;
pub use vault::VaultGuard;
