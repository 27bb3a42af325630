// spalink-api: Async Rust client for a hot-tub controller's REST control API

pub mod client;
pub mod error;
pub mod models;
pub mod transport;

pub use client::SpaClient;
pub use error::Error;
pub use models::{BlowerSelector, DeviceStatus, OnOff, PumpSelector, PumpState, Toggle};
pub use transport::{API_KEY_HEADER, DEFAULT_TIMEOUT, Payload, Transport, TransportConfig};
