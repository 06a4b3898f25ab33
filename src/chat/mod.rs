//! Chat orchestration — one `send` turns user input into a renderable message.
//!
//! The controller owns the exchange lifecycle: precondition checks, exactly
//! one backend call, chart extraction and planning over the response, history
//! append, and source de-duplication. A failed exchange is never recorded as
//! a turn — the session is only mutated after the backend succeeded.
//!
//! Concurrency discipline: at most one request in flight per controller.
//! A second `send` while one is pending is rejected, not queued, which is
//! what makes the single-writer history invariant hold without locks.

pub mod backend;
pub mod export;

use crate::chart::{RenderPlan, extract, plan};
use crate::session::Session;

use backend::{ChatTransport, SourceRef};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Everything that can go wrong during a `send`.
///
/// Transport and protocol failures look the same to the user but are kept
/// apart for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatError {
    /// Input was empty or whitespace-only; no network call was made.
    EmptyMessage,
    /// Another request is already in flight; no network call was made.
    RequestInFlight,
    /// Network or HTTP failure.
    Transport(String),
    /// The backend answered, but with an explicit error or without the
    /// expected response field.
    Protocol(String),
}

impl std::fmt::Display for ChatError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyMessage => write!(f, "message is empty"),
            Self::RequestInFlight => write!(f, "a request is already in flight"),
            Self::Transport(detail) => write!(f, "transport failure: {detail}"),
            Self::Protocol(detail) => write!(f, "protocol violation: {detail}"),
        }
    }
}

impl std::error::Error for ChatError {}

// ---------------------------------------------------------------------------
// Renderable message
// ---------------------------------------------------------------------------

/// The record handed to the rendering collaborators: prose for the markup
/// renderer, an optional resolved chart plan, and de-duplicated source
/// labels.
#[derive(Debug, Clone)]
pub struct RenderableMessage {
    /// Always `"assistant"` for controller output.
    pub role: String,
    pub display_text: String,
    pub render_plan: Option<RenderPlan>,
    pub sources: Vec<String>,
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// Orchestrates a conversation against a [`ChatTransport`].
#[derive(Debug)]
pub struct ChatController<T: ChatTransport> {
    transport: T,
    in_flight: bool,
}

impl<T: ChatTransport> ChatController<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            in_flight: false,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send one user message and produce a renderable assistant message.
    ///
    /// On success the completed turn is appended to `session` (with FIFO
    /// truncation). On any error the session is left exactly as it was.
    pub fn send(
        &mut self,
        session: &mut Session,
        user_text: &str,
    ) -> Result<RenderableMessage, ChatError> {
        let user_text = user_text.trim();
        if user_text.is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        if self.in_flight {
            return Err(ChatError::RequestInFlight);
        }

        self.in_flight = true;
        let result = self.exchange(session, user_text);
        self.in_flight = false;
        result
    }

    fn exchange(
        &mut self,
        session: &mut Session,
        user_text: &str,
    ) -> Result<RenderableMessage, ChatError> {
        let response = self
            .transport
            .send_chat(user_text, &session.history, &session.session_id)
            .map_err(|e| ChatError::Transport(format!("{e:#}")))?;

        if let Some(error) = response.error {
            return Err(ChatError::Protocol(error));
        }
        let raw_text = match response.response {
            Some(text) if !text.trim().is_empty() => text,
            _ => {
                return Err(ChatError::Protocol(
                    "backend returned no response text".to_string(),
                ));
            }
        };

        let extraction = extract::extract(&raw_text);
        let render_plan = extraction.spec.as_ref().map(plan::plan);

        session.append_turn(user_text, raw_text.as_str());

        Ok(RenderableMessage {
            role: "assistant".to_string(),
            display_text: extraction.display_text,
            render_plan,
            sources: dedupe_sources(&response.sources),
        })
    }
}

/// Collapse duplicate source labels, preserving first-seen order.
fn dedupe_sources(sources: &[SourceRef]) -> Vec<String> {
    let mut seen = Vec::new();
    for source in sources {
        if !seen.iter().any(|s| s == &source.source) {
            seen.push(source.source.clone());
        }
    }
    seen
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn refs(labels: &[&str]) -> Vec<SourceRef> {
        labels
            .iter()
            .map(|l| SourceRef {
                source: (*l).to_string(),
            })
            .collect()
    }

    #[test]
    fn dedupe_preserves_first_seen_order() {
        let sources = refs(&["Dataset", "Posts", "Dataset", "Comments", "Posts"]);
        assert_eq!(dedupe_sources(&sources), vec!["Dataset", "Posts", "Comments"]);
    }

    #[test]
    fn dedupe_of_empty_is_empty() {
        assert!(dedupe_sources(&[]).is_empty());
    }

    #[test]
    fn chat_error_display_is_informative() {
        assert_eq!(ChatError::EmptyMessage.to_string(), "message is empty");
        assert!(
            ChatError::Protocol("missing field".to_string())
                .to_string()
                .contains("protocol violation")
        );
    }
}
