// ── Runtime connection configuration ──
//
// These types describe *how* to talk to the spa endpoint. They carry the
// credential and tuning knobs but never touch disk; the CLI builds a
// `SpaConfig` and hands it in.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

/// Configuration for one spa endpoint.
#[derive(Debug, Clone)]
pub struct SpaConfig {
    /// Base URL every API path is appended to.
    pub endpoint: Url,
    /// Sent as `X-API-KEY` on every request.
    pub api_key: SecretString,
    /// Cached status younger than this is served without a fetch.
    /// Zero makes every non-overlapping read live.
    pub min_interval: Duration,
    /// Absolute per-request timeout.
    pub timeout: Duration,
}

impl SpaConfig {
    pub const DEFAULT_MIN_INTERVAL: Duration = Duration::ZERO;
    pub const DEFAULT_TIMEOUT: Duration = spalink_api::DEFAULT_TIMEOUT;

    pub fn new(endpoint: Url, api_key: SecretString) -> Self {
        Self {
            endpoint,
            api_key,
            min_interval: Self::DEFAULT_MIN_INTERVAL,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    pub fn with_min_interval(mut self, min_interval: Duration) -> Self {
        self.min_interval = min_interval;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
