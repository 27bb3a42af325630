//! Caching and control layer between `spalink-api` and its consumers.
//!
//! - **[`Spa`]** — Cloneable facade shared by every accessory. Reads go
//!   through the [`StatusCache`]; writes ([`Command`]) go straight to the
//!   backend and never touch the cache.
//!
//! - **[`StatusCache`]** — Single-flight status cache. Concurrent reads
//!   share one in-flight request, and a successful snapshot is served
//!   without a network call for `min_interval` after it completes. A failed
//!   fetch is delivered to every waiter and leaves the last good snapshot in
//!   place.
//!
//! - **[`SpaBackend`]** — The seam between the cache and the wire.
//!   [`SpaClient`](spalink_api::SpaClient) implements it; tests substitute
//!   scripted backends.
//!
//! - **Accessories** ([`accessory`]) — Thermostat, switches, pump fans and
//!   chemistry sensors rendered from a status snapshot, plus
//!   [`spawn_poller`] to drive them on independent intervals.

pub mod accessory;
pub mod backend;
pub mod cache;
pub mod command;
pub mod config;
pub mod error;
pub mod spa;

pub use accessory::{Accessory, PollerHandle, spawn_poller};
pub use backend::SpaBackend;
pub use cache::{StatusCache, StatusResult};
pub use command::Command;
pub use config::SpaConfig;
pub use error::CoreError;
pub use spa::Spa;

// Re-exported so consumers don't need a direct dependency on spalink-api.
pub use spalink_api::{
    BlowerSelector, DeviceStatus, OnOff, PumpSelector, PumpState, Toggle,
};
