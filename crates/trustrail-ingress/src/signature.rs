//! Authorization verification — wallet signatures and service tokens.
//!
//! A presentment is authorized either by an ed25519 signature from the
//! submitter's wallet key or, for service-to-service calls, by a static
//! shared-secret token compared in constant time. Every failure mode maps
//! to the same `AuthenticationFailed` error so a caller cannot probe which
//! check tripped.

use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use subtle::ConstantTimeEq;
use trustrail_types::{AuthorizationProof, Presentment, Result, TrustrailError};

/// Verifies that a presentment was authorized by its claimed submitter.
pub struct SignatureVerifier {
    /// Shared secret accepted from service-to-service callers.
    /// None disables the token path entirely.
    service_secret: Option<Vec<u8>>,
}

impl SignatureVerifier {
    /// Create a verifier that accepts only wallet signatures.
    #[must_use]
    pub fn new() -> Self {
        Self {
            service_secret: None,
        }
    }

    /// Create a verifier that additionally accepts the given shared secret.
    #[must_use]
    pub fn with_service_secret(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            service_secret: Some(secret.into()),
        }
    }

    /// Verify the authorization proof against the presentment.
    ///
    /// For wallet signatures, the claimed identity *is* the verifying key
    /// (hex, case-insensitive): verifying the signature against it proves
    /// the submitter authorized exactly this `(transaction, amount,
    /// commitment hash)` payload. A signature by any other key, or over any
    /// other payload, fails.
    ///
    /// # Errors
    /// Returns `AuthenticationFailed` on any mismatch or malformed proof.
    pub fn verify(&self, presentment: &Presentment, proof: &AuthorizationProof) -> Result<()> {
        match proof {
            AuthorizationProof::WalletSignature { signature } => {
                self.verify_wallet_signature(presentment, signature)
            }
            AuthorizationProof::ServiceToken { token } => self.verify_service_token(token),
        }
    }

    fn verify_wallet_signature(&self, presentment: &Presentment, signature: &[u8]) -> Result<()> {
        let key_bytes = presentment
            .submitter
            .key_bytes()
            .map_err(|_| auth_failed("submitter identity is not a valid key"))?;
        let key_bytes: [u8; 32] = key_bytes
            .try_into()
            .map_err(|_| auth_failed("submitter identity has wrong key length"))?;
        let verifying_key = VerifyingKey::from_bytes(&key_bytes)
            .map_err(|_| auth_failed("submitter identity is not a valid ed25519 key"))?;

        let signature = Signature::from_slice(signature)
            .map_err(|_| auth_failed("malformed signature"))?;

        verifying_key
            .verify(&presentment.signing_payload(), &signature)
            .map_err(|_| auth_failed("signature does not match submitter and payload"))
    }

    fn verify_service_token(&self, token: &str) -> Result<()> {
        let Some(secret) = &self.service_secret else {
            return Err(auth_failed("service tokens are not accepted"));
        };
        // ct_eq over slices of unequal length yields false without
        // comparing contents.
        if secret.ct_eq(token.as_bytes()).into() {
            Ok(())
        } else {
            Err(auth_failed("service token mismatch"))
        }
    }
}

impl Default for SignatureVerifier {
    fn default() -> Self {
        Self::new()
    }
}

fn auth_failed(reason: &str) -> TrustrailError {
    TrustrailError::AuthenticationFailed {
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use ed25519_dalek::{Signer, SigningKey};
    use rand::rngs::OsRng;
    use rust_decimal::Decimal;
    use trustrail_types::{Identity, IntentType};

    use super::*;

    /// A presentment whose submitter identity is the given key, plus a
    /// valid signature over its payload.
    fn signed_presentment(key: &SigningKey) -> (Presentment, AuthorizationProof) {
        let mut p = Presentment::dummy("TX1", Decimal::new(10000, 2), IntentType::Service);
        p.submitter = Identity::new(format!("0x{}", hex::encode(key.verifying_key().to_bytes())));
        let signature = key.sign(&p.signing_payload()).to_bytes().to_vec();
        (p, AuthorizationProof::WalletSignature { signature })
    }

    #[test]
    fn valid_signature_passes() {
        let key = SigningKey::generate(&mut OsRng);
        let (p, proof) = signed_presentment(&key);
        assert!(SignatureVerifier::new().verify(&p, &proof).is_ok());
    }

    #[test]
    fn uppercase_identity_still_passes() {
        let key = SigningKey::generate(&mut OsRng);
        let (mut p, _) = signed_presentment(&key);
        p.submitter = Identity::new(p.submitter.as_str().to_ascii_uppercase());
        // Re-sign: payload normalizes identity case, so either casing signs
        // the same bytes.
        let signature = key.sign(&p.signing_payload()).to_bytes().to_vec();
        let proof = AuthorizationProof::WalletSignature { signature };
        assert!(SignatureVerifier::new().verify(&p, &proof).is_ok());
    }

    #[test]
    fn signature_by_other_key_fails() {
        let key = SigningKey::generate(&mut OsRng);
        let impostor = SigningKey::generate(&mut OsRng);
        let (p, _) = signed_presentment(&key);
        let signature = impostor.sign(&p.signing_payload()).to_bytes().to_vec();
        let proof = AuthorizationProof::WalletSignature { signature };
        let err = SignatureVerifier::new().verify(&p, &proof).unwrap_err();
        assert!(matches!(err, TrustrailError::AuthenticationFailed { .. }));
    }

    #[test]
    fn tampered_amount_fails() {
        let key = SigningKey::generate(&mut OsRng);
        let (mut p, proof) = signed_presentment(&key);
        p.amount = Decimal::new(99999, 2); // signed over 100.00
        let err = SignatureVerifier::new().verify(&p, &proof).unwrap_err();
        assert!(matches!(err, TrustrailError::AuthenticationFailed { .. }));
    }

    #[test]
    fn replay_against_other_transaction_fails() {
        let key = SigningKey::generate(&mut OsRng);
        let (mut p, proof) = signed_presentment(&key);
        p.transaction_id = "TX2".into();
        let err = SignatureVerifier::new().verify(&p, &proof).unwrap_err();
        assert!(matches!(err, TrustrailError::AuthenticationFailed { .. }));
    }

    #[test]
    fn malformed_signature_fails() {
        let key = SigningKey::generate(&mut OsRng);
        let (p, _) = signed_presentment(&key);
        let proof = AuthorizationProof::WalletSignature {
            signature: vec![0u8; 12],
        };
        let err = SignatureVerifier::new().verify(&p, &proof).unwrap_err();
        assert!(matches!(err, TrustrailError::AuthenticationFailed { .. }));
    }

    #[test]
    fn garbage_identity_fails() {
        let key = SigningKey::generate(&mut OsRng);
        let (mut p, proof) = signed_presentment(&key);
        p.submitter = Identity::new("not-hex-at-all");
        let err = SignatureVerifier::new().verify(&p, &proof).unwrap_err();
        assert!(matches!(err, TrustrailError::AuthenticationFailed { .. }));
    }

    #[test]
    fn service_token_accepted_when_configured() {
        let verifier = SignatureVerifier::with_service_secret("s3cr3t");
        let p = Presentment::dummy("TX1", Decimal::ONE, IntentType::Goods);
        let proof = AuthorizationProof::ServiceToken {
            token: "s3cr3t".to_string(),
        };
        assert!(verifier.verify(&p, &proof).is_ok());
    }

    #[test]
    fn wrong_service_token_fails() {
        let verifier = SignatureVerifier::with_service_secret("s3cr3t");
        let p = Presentment::dummy("TX1", Decimal::ONE, IntentType::Goods);
        let proof = AuthorizationProof::ServiceToken {
            token: "guess".to_string(),
        };
        let err = verifier.verify(&p, &proof).unwrap_err();
        assert!(matches!(err, TrustrailError::AuthenticationFailed { .. }));
    }

    #[test]
    fn service_token_rejected_when_unconfigured() {
        let verifier = SignatureVerifier::new();
        let p = Presentment::dummy("TX1", Decimal::ONE, IntentType::Goods);
        let proof = AuthorizationProof::ServiceToken {
            token: "anything".to_string(),
        };
        let err = verifier.verify(&p, &proof).unwrap_err();
        assert!(matches!(err, TrustrailError::AuthenticationFailed { .. }));
    }
}
