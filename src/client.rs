//! Content client trait and the HTTP delivery API implementation.
//!
//! The [`ContentClient`] trait is the seam between the pipeline and the
//! content repository: one operation, fetch an item by slug or id, returning
//! the raw JSON record or a [`ClientFailure`]. The pipeline never inspects
//! transport details beyond what `ClientFailure` exposes.
//!
//! The production implementation is [`HttpContentClient`], a thin wrapper over
//! a `ureq` agent pointed at the published-content REST endpoints:
//!
//! ```text
//! GET {url}/content/published/api/{version}/items/.by.slug/{slug}?expand=...
//! GET {url}/content/published/api/{version}/items/{id}?expand=...
//! ```

use crate::config::ServerConfig;
use crate::error::TIMEOUT_CODE;
use serde_json::Value;
use std::fmt;
use thiserror::Error;
use tracing::debug;
use ureq::Agent;

/// How an item is addressed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ItemLookup {
    Slug(String),
    Id(String),
}

impl fmt::Display for ItemLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemLookup::Slug(slug) => write!(f, "slug:{slug}"),
            ItemLookup::Id(id) => write!(f, "id:{id}"),
        }
    }
}

/// A single item request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRequest {
    pub lookup: ItemLookup,
    /// Comma-separated field expansion hint, e.g. `fields.sections`.
    pub expand: String,
    pub language: Option<String>,
}

/// A failed client call.
///
/// Any field may be absent; the error normalizer copes with every combination.
#[derive(Error, Debug, Clone, Default, PartialEq, Eq)]
#[error("{detail}")]
pub struct ClientFailure {
    pub status_code: Option<u16>,
    pub status_message: Option<String>,
    pub errno: Option<String>,
    pub code: Option<String>,
    /// Code of the underlying transport error, e.g. `ETIMEDOUT`.
    pub nested_code: Option<String>,
    pub detail: String,
}

impl ClientFailure {
    /// The server answered with an error status.
    pub fn status(code: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            status_code: Some(code),
            detail: format!("HTTP {code} {message}"),
            status_message: Some(message),
            ..Self::default()
        }
    }

    /// The request never got a response.
    pub fn transport(code: &str, detail: impl Into<String>) -> Self {
        Self {
            errno: Some(code.to_string()),
            code: Some(code.to_string()),
            nested_code: Some(code.to_string()),
            detail: detail.into(),
            ..Self::default()
        }
    }

    /// Anything else (bad body, protocol error, ...).
    pub fn other(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
            ..Self::default()
        }
    }
}

fn io_code(kind: std::io::ErrorKind) -> &'static str {
    use std::io::ErrorKind;
    match kind {
        ErrorKind::TimedOut => TIMEOUT_CODE,
        ErrorKind::ConnectionRefused => "ECONNREFUSED",
        ErrorKind::ConnectionReset => "ECONNRESET",
        ErrorKind::ConnectionAborted => "ECONNABORTED",
        ErrorKind::UnexpectedEof => "EPIPE",
        _ => "EIO",
    }
}

impl From<ureq::Error> for ClientFailure {
    fn from(e: ureq::Error) -> Self {
        let detail = e.to_string();
        match e {
            ureq::Error::StatusCode(code) => {
                let reason = ureq::http::StatusCode::from_u16(code)
                    .ok()
                    .and_then(|s| s.canonical_reason())
                    .unwrap_or("HTTP error");
                ClientFailure::status(code, reason)
            }
            ureq::Error::Timeout(_) => ClientFailure::transport(TIMEOUT_CODE, detail),
            ureq::Error::HostNotFound => ClientFailure::transport("ENOTFOUND", detail),
            ureq::Error::ConnectionFailed => ClientFailure::transport("ECONNREFUSED", detail),
            ureq::Error::Io(io) => {
                let mut failure = ClientFailure::transport(io_code(io.kind()), detail);
                if let Some(raw) = io.raw_os_error() {
                    failure.errno = Some(raw.to_string());
                }
                failure
            }
            _ => ClientFailure::other(detail),
        }
    }
}

/// Source of raw content items.
///
/// `Sync` so one client can serve the concurrent rendition lookups of a page.
pub trait ContentClient: Sync {
    /// Fetch one item. A single attempt; implementations do not retry.
    fn get_item(&self, request: &ItemRequest) -> Result<Value, ClientFailure>;
}

/// Content delivery API client over HTTP.
pub struct HttpContentClient {
    agent: Agent,
    items_url: String,
    channel_token: String,
}

impl HttpContentClient {
    pub fn new(server: &ServerConfig) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(server.timeout()))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            items_url: format!(
                "{}/content/published/api/{}/items",
                server.url.trim_end_matches('/'),
                server.api_version
            ),
            channel_token: server.channel_token.clone(),
        }
    }

    fn item_url(&self, lookup: &ItemLookup) -> String {
        match lookup {
            ItemLookup::Slug(slug) => format!("{}/.by.slug/{}", self.items_url, slug),
            ItemLookup::Id(id) => format!("{}/{}", self.items_url, id),
        }
    }
}

impl ContentClient for HttpContentClient {
    fn get_item(&self, request: &ItemRequest) -> Result<Value, ClientFailure> {
        let url = self.item_url(&request.lookup);
        debug!("GET {} (expand: {})", url, request.expand);

        let mut call = self
            .agent
            .get(&url)
            .header("Accept", "application/json")
            .query("expand", &request.expand);
        if !self.channel_token.is_empty() {
            call = call.query("channelToken", &self.channel_token);
        }
        if let Some(language) = &request.language {
            call = call.query("language", language);
        }

        let response = call.call()?;
        let status = response.status();
        let mut body = response.into_body();

        if status.as_u16() >= 400 {
            return Err(ClientFailure::status(
                status.as_u16(),
                status.canonical_reason().unwrap_or("HTTP error"),
            ));
        }

        Ok(body.read_json::<Value>()?)
    }
}
