// ── Core error types ──
//
// User-facing errors from spalink-core. A single failed status fetch is
// handed to every caller that joined it, so the type is `Clone` and all
// waiters observe value-equal errors. The `From<spalink_api::Error>` impl
// translates transport-layer errors into the taxonomy below.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach spa endpoint at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Spa endpoint timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    // ── Remote errors ────────────────────────────────────────────────
    #[error("API error (HTTP {status} {status_text}): {body}")]
    Api {
        status: u16,
        status_text: String,
        body: String,
    },

    #[error("Malformed response: {message}")]
    MalformedResponse { message: String },

    // ── Caller errors ────────────────────────────────────────────────
    #[error("Invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<spalink_api::Error> for CoreError {
    fn from(err: spalink_api::Error) -> Self {
        match err {
            spalink_api::Error::Transport(e) => CoreError::ConnectionFailed {
                url: e
                    .url()
                    .map_or_else(|| "<unknown>".into(), ToString::to_string),
                reason: e.to_string(),
            },
            spalink_api::Error::Timeout { timeout_ms } => CoreError::Timeout { timeout_ms },
            spalink_api::Error::Api {
                status,
                status_text,
                body,
            } => CoreError::Api {
                status,
                status_text,
                body,
            },
            spalink_api::Error::Deserialization { message, body: _ } => {
                CoreError::MalformedResponse { message }
            }
            spalink_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            spalink_api::Error::InvalidApiKey(reason) => CoreError::Config {
                message: format!("Invalid API key: {reason}"),
            },
            spalink_api::Error::ClientBuild(reason) => CoreError::Config {
                message: format!("HTTP client: {reason}"),
            },
        }
    }
}
