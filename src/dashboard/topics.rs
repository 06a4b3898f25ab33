//! Default topic tagger — keyword spotting over user messages.
//!
//! The aggregator tallies whatever tags its collaborator supplies; this is
//! the built-in collaborator, matching a fixed keyword list against the
//! lowercased user message. Substring matching is intentional so informal
//! variants ("presupuestos", "charts") still count.

use super::client::LogRecord;

/// Keywords counted as topics, in display priority order.
pub const TOPIC_KEYWORDS: [&str; 15] = [
    "sentiment",
    "interest",
    "topic",
    "post",
    "comment",
    "analysis",
    "chart",
    "graph",
    "visualization",
    "recommendation",
    "negative",
    "positive",
    "corruption",
    "budget",
    "presupuesto",
];

/// Tag a record with every keyword its user message mentions.
pub fn keyword_topics(record: &LogRecord) -> Vec<String> {
    let message = record.user_message.to_lowercase();
    TOPIC_KEYWORDS
        .iter()
        .filter(|keyword| message.contains(**keyword))
        .map(|keyword| (*keyword).to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
