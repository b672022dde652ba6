//! Failure taxonomy for the content pipeline.
//!
//! Two very different kinds of failure come out of a fetch:
//!
//! - **[`ContentError`]**: the request itself failed (network, timeout, HTTP
//!   status). Every such failure is normalized by [`normalize`] into the same
//!   record, logged once, and handed back as a value. The rendering layer
//!   branches on it to show an error notice.
//! - **[`MalformedContent`]**: the request succeeded but the record breaks the
//!   content model (a rendition without a `webp` format, a missing `self`
//!   link, a field of the wrong shape). This is an upstream contract
//!   violation and is never coerced into a default value.
//!
//! [`PipelineError`] is the union returned by the model fetchers, so callers
//! match exhaustively instead of checking a boolean field.

use crate::client::ClientFailure;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::{error, warn};

/// Nested error code the content client reports when a request timed out.
pub const TIMEOUT_CODE: &str = "ETIMEDOUT";

/// Canonical record of a failed content request.
///
/// Serialized as `{"hasError": true, "statusCode": 404, ...}` with absent
/// fields omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentError {
    pub has_error: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errno: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// Coarse classification of a [`ContentError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// No HTTP status: the request never got a response (network, timeout).
    Transport,
    /// HTTP 404.
    NotFound,
    /// Any other HTTP status.
    Http,
}

impl ContentError {
    pub fn kind(&self) -> FailureKind {
        match self.status_code {
            Some(404) => FailureKind::NotFound,
            Some(_) => FailureKind::Http,
            None => FailureKind::Transport,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == FailureKind::NotFound
    }
}

impl fmt::Display for ContentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.status_code, &self.status_message, &self.code) {
            (Some(status), Some(message), _) => {
                write!(f, "content request failed: {status} {message}")
            }
            (Some(status), None, _) => write!(f, "content request failed: HTTP {status}"),
            (None, _, Some(code)) => write!(f, "content request failed: {code}"),
            (None, Some(message), None) => write!(f, "content request failed: {message}"),
            (None, None, None) => f.write_str("content request failed"),
        }
    }
}

impl std::error::Error for ContentError {}

/// Convert a client failure of any shape into a [`ContentError`].
///
/// Classification, first match wins:
///
/// 1. failure has a status message: log the message
/// 2. nested code is [`TIMEOUT_CODE`]: log the whole failure
/// 3. any other nested code: log just the code
/// 4. anything else: log as a generic error
///
/// Writes exactly one log line per call and never fails.
pub fn normalize(context: &str, failure: &ClientFailure) -> ContentError {
    if let Some(message) = &failure.status_message {
        warn!("{context} : {message}");
    } else if failure.nested_code.as_deref() == Some(TIMEOUT_CODE) {
        warn!("{context} : {failure:?}");
    } else if let Some(code) = &failure.nested_code {
        warn!("{context} : {code}");
    } else {
        error!("{context} {failure}");
    }

    ContentError {
        has_error: true,
        status_code: failure.status_code,
        status_message: failure.status_message.clone(),
        errno: failure.errno.clone(),
        code: failure.code.clone(),
    }
}

/// A content record that violates the expected model.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedContent {
    #[error("asset {asset}: rendition '{rendition}' has no {format} format")]
    MissingFormat {
        asset: String,
        rendition: String,
        format: &'static str,
    },
    #[error("asset {asset}: {format} format of rendition '{rendition}' has no self link")]
    MissingSelfLink {
        asset: String,
        rendition: String,
        format: &'static str,
    },
    #[error("asset {asset}: native rendition has no link")]
    MissingNativeLink { asset: String },
    #[error("{record} record could not be decoded: {reason}")]
    Undecodable { record: &'static str, reason: String },
}

/// Error returned by the site/page fetchers and everything built on them.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Content(#[from] ContentError),
    #[error(transparent)]
    Malformed(#[from] MalformedContent),
    #[error("no page is published at /{0}")]
    UnknownPath(String),
    #[error("site has no navigation pages to serve the root path")]
    EmptySite,
}
