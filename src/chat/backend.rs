//! HTTP client for the backend chat endpoint.
//!
//! Talks to `POST {base}/api/chat` using the synchronous `ureq` client. The
//! transport is a trait so the chat controller can be exercised against a
//! mock in tests; [`HttpChatBackend`] is the production implementation.

use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::CharlaConfig;
use crate::session::Turn;

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// Request body for `POST /api/chat`.
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
    conversation_history: &'a [Turn],
    session_id: &'a str,
}

/// Response body from `POST /api/chat`.
///
/// A healthy response carries `response` (and optionally `sources`); a
/// failed one carries `error`. Both fields are optional on the wire, so the
/// controller decides what counts as a protocol violation.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub sources: Vec<SourceRef>,
    #[serde(default)]
    pub error: Option<String>,
}

/// A cited source attached to a response. Extra backend fields (type,
/// relevance, ...) are ignored — only the label matters here.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceRef {
    pub source: String,
}

// ---------------------------------------------------------------------------
// Transport seam
// ---------------------------------------------------------------------------

/// The chat controller's network seam. Exactly one call per `send`.
pub trait ChatTransport {
    fn send_chat(&self, message: &str, history: &[Turn], session_id: &str) -> Result<ChatResponse>;
}

// ---------------------------------------------------------------------------
// HTTP implementation
// ---------------------------------------------------------------------------

/// Synchronous backend chat client.
#[derive(Debug)]
pub struct HttpChatBackend {
    base_url: String,
    timeout: Duration,
}

impl HttpChatBackend {
    /// Build a client from the resolved config.
    pub fn from_config(config: &CharlaConfig) -> Self {
        Self {
            base_url: config.backend.base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_millis(config.backend.timeout_ms),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check whether the backend answers at all.
    ///
    /// Uses a short timeout so startup doesn't stall when the backend is
    /// down. Any HTTP response (including 4xx/5xx) counts as reachable.
    pub fn is_reachable(&self) -> bool {
        let result = ureq::get(&self.base_url)
            .timeout(Duration::from_secs(5))
            .call();
        match result {
            Ok(_) => true,
            Err(ureq::Error::Status(_, _)) => true,
            Err(_) => false,
        }
    }
}

impl ChatTransport for HttpChatBackend {
    fn send_chat(&self, message: &str, history: &[Turn], session_id: &str) -> Result<ChatResponse> {
        let url = format!("{}/api/chat", self.base_url);
        let body = ChatRequest {
            message,
            conversation_history: history,
            session_id,
        };

        let resp = ureq::post(&url)
            .timeout(self.timeout)
            .send_json(&body)
            .context("chat request failed")?;

        resp.into_json().context("failed to parse chat response")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
