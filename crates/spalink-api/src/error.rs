use thiserror::Error;

/// Top-level error type for the `spalink-api` crate.
///
/// Covers every failure mode of a single request/response cycle against
/// the spa control endpoint. `spalink-core` maps these into user-facing
/// diagnostics and fans them out to every caller awaiting the same fetch.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// No complete response arrived within the configured timeout.
    #[error("Request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// The HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    /// The API key cannot be encoded as a header value.
    #[error("Invalid API key header value: {0}")]
    InvalidApiKey(String),

    // ── Remote API ──────────────────────────────────────────────────
    /// The remote responded with a non-success status.
    ///
    /// `body` is best-effort: a failure to read it leaves it empty rather
    /// than masking the status.
    #[error("API error (HTTP {status} {status_text}): {body}")]
    Api {
        status: u16,
        status_text: String,
        body: String,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// Success status, but the body could not be interpreted as expected.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if the request was aborted by the timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// The HTTP status code of an API error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
