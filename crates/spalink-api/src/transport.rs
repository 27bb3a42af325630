// Authenticated request/response cycle against the spa control endpoint.
//
// One `Transport` owns one `reqwest::Client` with the API key and JSON
// content-type baked in as default headers, plus an absolute per-request
// timeout. Response bodies are normalized into a `Payload` so callers can
// distinguish "no content", "some text" and "parsed JSON".

use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;

/// Header carrying the static API credential.
pub const API_KEY_HEADER: &str = "X-API-KEY";

/// Default absolute timeout for one request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);

/// Shared transport configuration for building the HTTP client.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agent: concat!("spalink/", env!("CARGO_PKG_VERSION")).into(),
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` with additional default headers.
    pub fn build_client_with_headers(&self, headers: HeaderMap) -> Result<reqwest::Client, Error> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(&self.user_agent)
            .default_headers(headers)
            .build()
            .map_err(|e| Error::ClientBuild(e.to_string()))
    }
}

/// A successful response body, classified by shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// No body (e.g. `204 No Content`); nothing was parsed.
    Empty,
    /// A body that is not JSON (whatever its declared type), returned
    /// verbatim.
    Text(String),
    /// A JSON body.
    Json(serde_json::Value),
}

impl Payload {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Interpret the payload as structured data of shape `T`.
    ///
    /// Only JSON payloads can succeed; empty and text payloads are
    /// reported as deserialization failures.
    pub fn into_json<T: DeserializeOwned>(self) -> Result<T, Error> {
        match self {
            Self::Json(value) => T::deserialize(&value).map_err(|e| Error::Deserialization {
                message: e.to_string(),
                body: value.to_string(),
            }),
            Self::Text(body) => {
                let preview = preview(&body);
                Err(Error::Deserialization {
                    message: format!("expected JSON, got text (body preview: {preview:?})"),
                    body,
                })
            }
            Self::Empty => Err(Error::Deserialization {
                message: "expected JSON, got an empty response".into(),
                body: String::new(),
            }),
        }
    }
}

/// First 200 characters of a body, for error messages.
fn preview(body: &str) -> &str {
    let end = body.char_indices().nth(200).map_or(body.len(), |(i, _)| i);
    &body[..end]
}

/// One authenticated HTTP client bound to a fixed base URL.
#[derive(Debug, Clone)]
pub struct Transport {
    http: reqwest::Client,
    base_url: Url,
    timeout: Duration,
}

impl Transport {
    /// Build a transport that attaches `X-API-KEY` and
    /// `Content-Type: application/json` to every request.
    pub fn new(
        base_url: Url,
        api_key: &SecretString,
        config: &TransportConfig,
    ) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        let mut key_value = HeaderValue::from_str(api_key.expose_secret())
            .map_err(|e| Error::InvalidApiKey(e.to_string()))?;
        key_value.set_sensitive(true);
        headers.insert(API_KEY_HEADER, key_value);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = config.build_client_with_headers(headers)?;
        Ok(Self {
            http,
            base_url,
            timeout: config.timeout,
        })
    }

    /// The endpoint every path is appended to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Append `path` to the base URL: `{base}{path}`.
    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Ok(Url::parse(&format!("{base}/{path}"))?)
    }

    /// Perform one request/response cycle.
    ///
    /// `body`, when present, is serialized as a JSON object.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<Payload, Error> {
        let url = self.url(path)?;
        debug!("{method} {url}");

        let mut builder = self.http.request(method, url);
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let resp = builder.send().await.map_err(|e| self.map_reqwest(e))?;
        self.handle_response(resp).await
    }

    async fn handle_response(&self, resp: reqwest::Response) -> Result<Payload, Error> {
        let status = resp.status();

        if !status.is_success() {
            // Best effort: a failed body read must not hide the status.
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Api {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_owned(),
                body,
            });
        }

        if status == StatusCode::NO_CONTENT {
            trace!("no content");
            return Ok(Payload::Empty);
        }

        let is_json = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.contains("json"));

        let body = resp.text().await.map_err(|e| self.map_reqwest(e))?;

        if body.is_empty() {
            return Ok(Payload::Empty);
        }
        if !is_json {
            return Ok(Payload::Text(body));
        }

        // A mislabelled body is still an accepted response; only callers
        // that need structure reject it, via `Payload::into_json`.
        match serde_json::from_str(&body) {
            Ok(value) => Ok(Payload::Json(value)),
            Err(e) => {
                debug!(error = %e, "body declared as JSON did not parse, keeping raw text");
                Ok(Payload::Text(body))
            }
        }
    }

    fn map_reqwest(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                timeout_ms: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
            }
        } else {
            Error::Transport(err)
        }
    }
}
