// ── Core error types ──
//
// Workflow-level errors from pamly-core. Transport failures arrive as
// `pamly_api::Error` and are translated by the `From` impl below; the
// remaining variants come from the access-request and task workflows.

use pamly_api::models::{AccessRequest, AccessRequestState, BatchResponse, TaskName};
use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to appliance at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── API errors ───────────────────────────────────────────────────
    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("API error: {message}")]
    Api {
        message: String,
        /// Appliance error code from the error body, if any.
        code: Option<i64>,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    #[error("Malformed response: {message}")]
    Decode { message: String, body: String },

    // ── Workflow errors ──────────────────────────────────────────────
    #[error("Cannot {operation} access request {request_id} in state {state}")]
    InvalidState {
        operation: &'static str,
        request_id: String,
        state: AccessRequestState,
    },

    #[error("Access request {request_id} is still {state}")]
    StillPending {
        request_id: String,
        state: AccessRequestState,
    },

    #[error("Task id '{id}' is not a valid UUID")]
    InvalidTaskId { id: String },

    #[error("Task type {task} has no task schedule to poll")]
    UnsupportedTask { task: TaskName },

    /// Some entries of a batch create failed. `results` holds every entry,
    /// successful ones included, in submission order.
    #[error("Batch create failed: {message}")]
    PartialBatch {
        results: Vec<BatchResponse<AccessRequest>>,
        message: String,
    },

    #[error("Timed out waiting for {waiting_for}")]
    Timeout { waiting_for: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Returns `true` for a polling deadline, as opposed to a transport failure.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<pamly_api::Error> for CoreError {
    fn from(err: pamly_api::Error) -> Self {
        match err {
            pamly_api::Error::Authentication { message } => CoreError::Authentication { message },
            pamly_api::Error::NotLoggedIn => CoreError::Authentication {
                message: "not logged in".into(),
            },
            pamly_api::Error::Transport(ref e) => {
                if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        code: None,
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            pamly_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            pamly_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            pamly_api::Error::Api {
                status: 404,
                message,
                ..
            } => CoreError::NotFound { message },
            pamly_api::Error::Api {
                status,
                code,
                message,
            } => CoreError::Api {
                message,
                code,
                status: Some(status),
            },
            pamly_api::Error::Deserialization { message, body } => {
                CoreError::Decode { message, body }
            }
            pamly_api::Error::Serialization(e) => {
                CoreError::Internal(format!("Serialization error: {e}"))
            }
        }
    }
}
