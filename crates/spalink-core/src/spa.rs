// ── Spa facade ──
//
// The one object every accessory shares. Reads go through the status
// cache; writes go straight to the backend and leave the cache alone, so
// their effect shows up on the next natural poll.

use std::sync::Arc;

use tracing::{debug, info};

use spalink_api::{DeviceStatus, SpaClient, TransportConfig};

use crate::backend::SpaBackend;
use crate::cache::{StatusCache, StatusResult};
use crate::command::Command;
use crate::config::SpaConfig;
use crate::error::CoreError;

/// Handle to one spa. Cheaply cloneable via `Arc<SpaInner>`.
pub struct Spa<B = SpaClient> {
    inner: Arc<SpaInner<B>>,
}

struct SpaInner<B> {
    backend: Arc<B>,
    cache: StatusCache<B>,
}

impl<B> Clone for Spa<B> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl Spa<SpaClient> {
    /// Build the HTTP client described by `config`. Does not touch the network.
    pub fn new(config: &SpaConfig) -> Result<Self, CoreError> {
        let transport = TransportConfig {
            timeout: config.timeout,
            ..TransportConfig::default()
        };
        let client = SpaClient::new(config.endpoint.clone(), &config.api_key, &transport)?;
        info!(
            endpoint = %config.endpoint,
            min_interval = ?config.min_interval,
            timeout = ?config.timeout,
            "spa client ready"
        );
        Ok(Self::with_backend(client, config.min_interval))
    }
}

impl<B: SpaBackend> Spa<B> {
    /// Wrap any backend with a status cache of the given freshness window.
    pub fn with_backend(backend: B, min_interval: std::time::Duration) -> Self {
        let backend = Arc::new(backend);
        let cache = StatusCache::new(Arc::clone(&backend), min_interval);
        Self {
            inner: Arc::new(SpaInner { backend, cache }),
        }
    }

    pub fn backend(&self) -> &B {
        &self.inner.backend
    }

    pub fn cache(&self) -> &StatusCache<B> {
        &self.inner.cache
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// Current status, coalesced with any concurrent reads.
    pub async fn status(&self) -> StatusResult {
        self.inner.cache.get().await
    }

    /// Last known status without triggering a fetch.
    pub fn cached(&self) -> Option<Arc<DeviceStatus>> {
        self.inner.cache.cached()
    }

    // ── Writes ───────────────────────────────────────────────────────

    /// Apply one write. Never reads, never touches the cache.
    pub async fn execute(&self, command: Command) -> Result<(), CoreError> {
        debug!(%command, "sending command");
        self.inner.backend.send(&command).await
    }

    pub async fn set_temperature(&self, setpoint_f: f64) -> Result<(), CoreError> {
        self.execute(Command::temperature(setpoint_f)?).await
    }

    pub async fn set_lights(&self, on: bool) -> Result<(), CoreError> {
        self.execute(Command::SetLights { on }).await
    }

    pub async fn set_pump(&self, pump: &str, state: &str) -> Result<(), CoreError> {
        self.execute(Command::pump(pump, state)?).await
    }

    pub async fn set_blower(&self, blower: &str, state: &str) -> Result<(), CoreError> {
        self.execute(Command::blower(blower, state)?).await
    }

    pub async fn set_toggle(&self, toggle: &str, on: bool) -> Result<(), CoreError> {
        self.execute(Command::toggle(toggle, on)?).await
    }

    pub async fn boost(&self) -> Result<(), CoreError> {
        self.execute(Command::Boost).await
    }
}
