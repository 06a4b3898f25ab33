//! Conversation export — write the current session to a downloadable file.
//!
//! The artifact mirrors the wire shape of a conversation:
//! `{ session_id, timestamp, messages }`, pretty-printed JSON. The filename
//! carries a millisecond timestamp for uniqueness.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use crate::session::{Session, Turn};

/// The exported conversation document.
#[derive(Debug, Serialize)]
struct ConversationExport<'a> {
    session_id: &'a str,
    timestamp: String,
    messages: &'a [Turn],
}

/// Write the session's conversation to `dir`, returning the file path.
///
/// Fails when there is nothing to export.
pub fn write_conversation(session: &Session, dir: &Path) -> Result<PathBuf> {
    if session.history.is_empty() {
        anyhow::bail!("no conversation to export");
    }

    let export = ConversationExport {
        session_id: &session.session_id,
        timestamp: Utc::now().to_rfc3339(),
        messages: &session.history,
    };

    let filename = format!("charla_chat_{}.json", Utc::now().timestamp_millis());
    let path = dir.join(filename);

    let json =
        serde_json::to_string_pretty(&export).context("failed to serialize conversation")?;
    fs::write(&path, json)
        .with_context(|| format!("failed to write export to {}", path.display()))?;

    Ok(path)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_session_refuses_to_export() {
        let session = Session::new();
        let result = write_conversation(&session, Path::new("."));
        assert!(result.is_err());
    }

    #[test]
    fn export_writes_session_document() {
        let dir = std::env::temp_dir();
        let mut session = Session::new();
        session.append_turn("what changed?", "nothing yet");

        let path = write_conversation(&session, &dir).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();

        assert_eq!(value["session_id"], session.session_id.as_str());
        assert_eq!(value["messages"][0]["role"], "user");
        assert_eq!(value["messages"][1]["content"], "nothing yet");

        let _ = fs::remove_file(path);
    }
}
