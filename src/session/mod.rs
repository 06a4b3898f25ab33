//! Conversation session state — identity plus bounded turn history.
//!
//! A [`Session`] owns the conversation identity and the rolling history sent
//! back to the backend with every message. History is bounded: each completed
//! exchange contributes one user and one assistant entry, and once the bound
//! is exceeded the oldest entries are evicted first.
//!
//! Resetting a session is destructive, so it is modeled as a two-step
//! protocol: [`Session::request_reset`] hands out an intent bound to the
//! current state, and [`Session::confirm_reset`] only performs the wipe when
//! the intent still matches. Callers surface the confirmation to the user in
//! between.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default number of turns kept in history (each turn = 2 entries).
pub const DEFAULT_MAX_TURNS: usize = 5;

// ---------------------------------------------------------------------------
// Turn
// ---------------------------------------------------------------------------

/// A single history entry. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    /// `"user"` or `"assistant"`.
    pub role: String,
    pub content: String,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Conversation identity plus bounded history.
///
/// Invariant: `history.len() <= 2 * max_turns`. Only the chat controller
/// mutates history, and only after a successful backend exchange.
#[derive(Debug, Clone)]
pub struct Session {
    pub session_id: String,
    pub history: Vec<Turn>,
    max_turns: usize,
}

impl Session {
    /// Create a session with an empty history and a fresh identifier.
    pub fn new() -> Self {
        Self::with_max_turns(DEFAULT_MAX_TURNS)
    }

    /// Create a session keeping at most `max_turns` turns of history.
    pub fn with_max_turns(max_turns: usize) -> Self {
        Self {
            session_id: generate_session_id(),
            history: Vec::new(),
            max_turns,
        }
    }

    pub fn max_turns(&self) -> usize {
        self.max_turns
    }

    /// Append a completed exchange (user entry then assistant entry), then
    /// evict the oldest entries until `history.len() <= 2 * max_turns`.
    pub fn append_turn(&mut self, user_text: impl Into<String>, assistant_text: impl Into<String>) {
        self.history.push(Turn::user(user_text));
        self.history.push(Turn::assistant(assistant_text));

        let cap = 2 * self.max_turns;
        if self.history.len() > cap {
            let excess = self.history.len() - cap;
            self.history.drain(..excess);
        }
    }

    /// Step one of a reset: capture an intent bound to the current state.
    ///
    /// Returns `None` when the history is empty — there is nothing to lose,
    /// so callers may reset immediately via a fresh [`Session::new`] without
    /// asking for confirmation.
    pub fn request_reset(&self) -> Option<ResetIntent> {
        if self.history.is_empty() {
            return None;
        }
        Some(ResetIntent {
            session_id: self.session_id.clone(),
            history_len: self.history.len(),
        })
    }

    /// Step two of a reset: discard history and issue a new identifier.
    ///
    /// Only applies if the intent still matches the current state; a stale
    /// intent (session already reset, or turns appended since) is rejected
    /// and the session is left untouched.
    pub fn confirm_reset(&mut self, intent: ResetIntent) -> bool {
        if intent.session_id != self.session_id || intent.history_len != self.history.len() {
            return false;
        }
        self.session_id = generate_session_id();
        self.history.clear();
        true
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Proof that a reset was requested against a specific session state.
///
/// Not `Clone` — an intent authorizes at most one confirmation.
#[derive(Debug)]
pub struct ResetIntent {
    session_id: String,
    history_len: usize,
}

/// Generate a session identifier unique with overwhelming probability:
/// millisecond timestamp prefix plus a 9-character random suffix.
fn generate_session_id() -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix: String = Uuid::new_v4().simple().to_string().chars().take(9).collect();
    format!("session_{millis}_{suffix}")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
