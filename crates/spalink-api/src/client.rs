// Endpoint methods for the spa control API.
//
// Thin, uncached wrappers over `Transport::request`. Every write is a
// single PUT with no follow-up read; caching lives in `spalink-core`.

use reqwest::Method;
use secrecy::SecretString;
use serde::Serialize;
use url::Url;

use crate::error::Error;
use crate::models::{
    BlowerSelector, DeviceStatus, OnOff, PumpSelector, PumpState, SetpointBody, StateBody, Toggle,
};
use crate::transport::{Payload, Transport, TransportConfig};

/// Raw HTTP client for the spa control endpoint.
#[derive(Debug, Clone)]
pub struct SpaClient {
    transport: Transport,
}

impl SpaClient {
    /// Create a client for `base_url`, authenticating with `api_key`.
    pub fn new(
        base_url: Url,
        api_key: &SecretString,
        config: &TransportConfig,
    ) -> Result<Self, Error> {
        Ok(Self {
            transport: Transport::new(base_url, api_key, config)?,
        })
    }

    /// The underlying transport (for ad-hoc requests).
    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    async fn put<B: Serialize>(&self, path: &str, body: Option<&B>) -> Result<Payload, Error> {
        let body = body
            .map(serde_json::to_value)
            .transpose()
            .map_err(|e| Error::Deserialization {
                message: format!("failed to encode request body: {e}"),
                body: String::new(),
            })?;
        self.transport.request(Method::PUT, path, body.as_ref()).await
    }

    // ── Status ───────────────────────────────────────────────────────

    /// `GET /status`, parsed into a [`DeviceStatus`].
    pub async fn get_status(&self) -> Result<DeviceStatus, Error> {
        self.transport
            .request(Method::GET, "/status", None)
            .await?
            .into_json()
    }

    // ── Writes ───────────────────────────────────────────────────────

    /// `PUT /temperature` with `{setpointF}`. No client-side clamping.
    pub async fn set_temperature(&self, setpoint_f: f64) -> Result<Payload, Error> {
        self.put("/temperature", Some(&SetpointBody { setpoint_f }))
            .await
    }

    /// `PUT /lights` with `{state: "on"|"off"}`.
    pub async fn set_lights(&self, on: bool) -> Result<Payload, Error> {
        self.put("/lights", Some(&StateBody { state: OnOff::from(on) }))
            .await
    }

    /// `PUT /pumps/{pump}` with `{state}`.
    pub async fn set_pump(&self, pump: PumpSelector, state: PumpState) -> Result<Payload, Error> {
        self.put(&format!("/pumps/{pump}"), Some(&StateBody { state }))
            .await
    }

    /// `PUT /blowers/{blower}` with `{state: "on"|"off"}`.
    pub async fn set_blower(&self, blower: BlowerSelector, on: bool) -> Result<Payload, Error> {
        self.put(
            &format!("/blowers/{blower}"),
            Some(&StateBody { state: OnOff::from(on) }),
        )
        .await
    }

    /// `PUT /{toggle}` with `{state: "on"|"off"}`.
    pub async fn set_toggle(&self, toggle: Toggle, on: bool) -> Result<Payload, Error> {
        self.put(
            &format!("/{toggle}"),
            Some(&StateBody { state: OnOff::from(on) }),
        )
        .await
    }

    /// `PUT /boost`, no body.
    pub async fn boost(&self) -> Result<Payload, Error> {
        self.put::<()>("/boost", None).await
    }
}
