//! HTTP reply mapping for embedding servers.
//!
//! The pipeline itself is transport-agnostic; these helpers turn its
//! results into `(status code, JSON body)` pairs so every embedding (axum
//! handler, lambda, test harness) answers identically.

use trustrail_types::{ErrorBody, Result, SubmissionResponse, WebhookResponse};

/// Map a submission result to its wire reply.
///
/// Both success shapes answer 200 — `settled_unrecorded` is flagged in the
/// body, not in the status, because the payout *did* happen.
#[must_use]
pub fn submission_reply(result: Result<SubmissionResponse>) -> (u16, serde_json::Value) {
    match result {
        Ok(response) => (
            200,
            serde_json::to_value(&response).unwrap_or_else(|_| {
                serde_json::json!({"error": "TR_ERR_901: response serialization failed"})
            }),
        ),
        Err(err) => {
            let body = ErrorBody::from(&err);
            (
                err.http_status(),
                serde_json::to_value(&body)
                    .unwrap_or_else(|_| serde_json::json!({"error": body.error})),
            )
        }
    }
}

/// Map a webhook result to its wire reply.
#[must_use]
pub fn webhook_reply(result: Result<WebhookResponse>) -> (u16, serde_json::Value) {
    match result {
        Ok(response) => (
            200,
            serde_json::to_value(response).unwrap_or_else(|_| serde_json::json!({"received": true})),
        ),
        Err(err) => {
            let body = ErrorBody::from(&err);
            (
                err.http_status(),
                serde_json::to_value(&body)
                    .unwrap_or_else(|_| serde_json::json!({"error": body.error})),
            )
        }
    }
}
