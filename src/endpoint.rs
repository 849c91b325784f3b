//! Client side of the `/chat` endpoint.
//!
//! DESIGN
//! ======
//! `ChatEndpoint` is the seam between the widget and the network so widget
//! behaviour can be driven by mocks. `HttpEndpoint` is the reqwest-backed
//! implementation. Response parsing lives in `parse_reply` /
//! `parse_ticket_status` so it can be tested without a server.
//!
//! ERROR HANDLING
//! ==============
//! Every failure the original widget dropped on the floor (transport error,
//! non-2xx status, non-JSON body, missing `reply`) gets its own variant; the
//! widget turns them into visible `System` entries.

use std::time::Duration;

use tracing::debug;

use crate::protocol::{ChatReply, ChatRequest, TicketStatus};

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

// =============================================================================
// ERROR
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum EndpointError {
    /// Connection refused, DNS failure, timeout, or a broken body stream.
    #[error("request failed: {0}")]
    Request(String),

    /// The endpoint answered with a non-success status.
    #[error("server returned status {status}")]
    Status { status: u16, body: String },

    /// The response body was not the expected JSON.
    #[error("malformed response: {0}")]
    Decode(String),

    /// The response was JSON but carried no `reply` string.
    #[error("response has no reply")]
    MissingReply,

    /// The reqwest client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

// =============================================================================
// TRAIT
// =============================================================================

/// Request/response collaborator for the chat widget. Enables mocking in tests.
#[async_trait::async_trait]
pub trait ChatEndpoint: Send + Sync {
    /// Send one user message and wait for the reply.
    ///
    /// # Errors
    ///
    /// Returns an [`EndpointError`] for transport, status or body failures.
    async fn send(&self, message: &str) -> Result<ChatReply, EndpointError>;

    /// Look up the admin answer for a handed-off ticket; `None` while pending.
    ///
    /// # Errors
    ///
    /// Returns an [`EndpointError`] for transport, status or body failures.
    async fn check_ticket(&self, ticket_id: &str) -> Result<Option<String>, EndpointError>;
}

// =============================================================================
// HTTP ENDPOINT
// =============================================================================

/// Connect and overall request timeouts for [`HttpEndpoint`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndpointTimeouts {
    /// `None` leaves requests unbounded.
    pub request: Option<Duration>,
    pub connect: Duration,
}

impl EndpointTimeouts {
    /// Build from whole seconds; a request timeout of `0` disables it.
    #[must_use]
    pub fn from_secs(request_secs: u64, connect_secs: u64) -> Self {
        let request = (request_secs > 0).then(|| Duration::from_secs(request_secs));
        Self { request, connect: Duration::from_secs(connect_secs) }
    }
}

impl Default for EndpointTimeouts {
    fn default() -> Self {
        Self::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_CONNECT_TIMEOUT_SECS)
    }
}

pub struct HttpEndpoint {
    http: reqwest::Client,
    base_url: String,
}

impl HttpEndpoint {
    /// Build an endpoint rooted at `base_url` (e.g. `http://127.0.0.1:3000`).
    ///
    /// # Errors
    ///
    /// Returns [`EndpointError::HttpClientBuild`] if reqwest rejects the config.
    pub fn new(base_url: &str, timeouts: EndpointTimeouts) -> Result<Self, EndpointError> {
        let mut builder = reqwest::Client::builder().connect_timeout(timeouts.connect);
        if let Some(request) = timeouts.request {
            builder = builder.timeout(request);
        }
        let http = builder
            .build()
            .map_err(|e| EndpointError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: base_url.trim_end_matches('/').to_owned() })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn read_body(response: reqwest::Response) -> Result<String, EndpointError> {
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| EndpointError::Request(e.to_string()))?;
        if !status.is_success() {
            return Err(EndpointError::Status { status: status.as_u16(), body: text });
        }
        Ok(text)
    }
}

#[async_trait::async_trait]
impl ChatEndpoint for HttpEndpoint {
    async fn send(&self, message: &str) -> Result<ChatReply, EndpointError> {
        let url = format!("{}/chat", self.base_url);
        debug!(%url, message_len = message.len(), "endpoint: sending chat message");
        let response = self
            .http
            .post(url)
            .json(&ChatRequest { message: message.to_owned() })
            .send()
            .await
            .map_err(|e| EndpointError::Request(e.to_string()))?;
        let text = Self::read_body(response).await?;
        parse_reply(&text)
    }

    async fn check_ticket(&self, ticket_id: &str) -> Result<Option<String>, EndpointError> {
        let url = format!("{}/chat/check/{ticket_id}", self.base_url);
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| EndpointError::Request(e.to_string()))?;
        let text = Self::read_body(response).await?;
        parse_ticket_status(&text)
    }
}

// =============================================================================
// PARSING
// =============================================================================

#[derive(serde::Deserialize)]
struct RawReply {
    reply: Option<String>,
    #[serde(default)]
    admin: bool,
    #[serde(default)]
    ticket_id: Option<String>,
}

/// Parse a `/chat` response body. Extra fields are ignored.
pub(crate) fn parse_reply(json: &str) -> Result<ChatReply, EndpointError> {
    let raw: RawReply = serde_json::from_str(json).map_err(|e| EndpointError::Decode(e.to_string()))?;
    let reply = raw.reply.ok_or(EndpointError::MissingReply)?;
    Ok(ChatReply { reply, admin: raw.admin, ticket_id: raw.ticket_id })
}

/// Parse a `/chat/check/{id}` response body.
pub(crate) fn parse_ticket_status(json: &str) -> Result<Option<String>, EndpointError> {
    let status: TicketStatus = serde_json::from_str(json).map_err(|e| EndpointError::Decode(e.to_string()))?;
    Ok(status.reply)
}

#[cfg(test)]
#[path = "endpoint_test.rs"]
mod tests;
