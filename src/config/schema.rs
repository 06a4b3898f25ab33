//! Configuration schema and defaults for the entire charla client.
//!
//! Defines the TOML-serializable configuration structure with all sections:
//! `[backend]`, `[chat]`, `[dashboard]`, and `[web]`.
//!
//! Every field has a sensible built-in default. Users only need to set the
//! values they want to override.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level charla configuration.
///
/// Maps directly to the `~/.charla/config.toml` and `.charla.toml` file
/// schemas. All sections and fields are optional — missing values fall back
/// to built-in defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CharlaConfig {
    pub backend: BackendConfig,
    pub chat: ChatConfig,
    pub dashboard: DashboardConfig,
    pub web: WebConfig,
}

// ---------------------------------------------------------------------------
// [backend]
// ---------------------------------------------------------------------------

/// Backend API settings, shared by the chat and dashboard clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL of the backend serving `/api/chat` and `/api/dashboard`.
    pub base_url: String,
    /// Per-request timeout (milliseconds).
    pub timeout_ms: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            timeout_ms: 30_000,
        }
    }
}

// ---------------------------------------------------------------------------
// [chat]
// ---------------------------------------------------------------------------

/// Conversation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Turns of history kept and resent with each message. Each turn
    /// contributes two history entries.
    pub max_turns: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self { max_turns: 5 }
    }
}

// ---------------------------------------------------------------------------
// [dashboard]
// ---------------------------------------------------------------------------

/// Admin dashboard settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Default day window for log and analytics queries.
    pub default_days: u32,
    /// Default day window for log exports.
    pub export_days: u32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            default_days: 7,
            export_days: 30,
        }
    }
}

// ---------------------------------------------------------------------------
// [web]
// ---------------------------------------------------------------------------

/// Embedded web dashboard settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    /// Listen address for `charla web`.
    pub listen_addr: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:9750".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default TOML content
// ---------------------------------------------------------------------------

impl CharlaConfig {
    /// Generate the annotated default TOML config file content.
    ///
    /// Used by `charla config init` to create a starting config file with
    /// all settings documented.
    pub fn default_toml() -> String {
        r#"# charla Configuration
#
# Configuration hierarchy (highest precedence wins):
#   1. Environment variables (CHARLA_*)
#   2. Project config (.charla.toml in current directory)
#   3. User global config (~/.charla/config.toml)
#   4. Built-in defaults

[backend]
base_url = "http://localhost:3000"
timeout_ms = 30000

[chat]
max_turns = 5              # Turns of history resent with each message

[dashboard]
default_days = 7           # Day window for logs and analytics
export_days = 30           # Day window for exports

[web]
listen_addr = "127.0.0.1:9750"
"#
        .to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_values() {
        let config = CharlaConfig::default();
        assert_eq!(config.backend.base_url, "http://localhost:3000");
        assert_eq!(config.backend.timeout_ms, 30_000);
        assert_eq!(config.chat.max_turns, 5);
        assert_eq!(config.dashboard.default_days, 7);
        assert_eq!(config.dashboard.export_days, 30);
        assert_eq!(config.web.listen_addr, "127.0.0.1:9750");
    }

    #[test]
    fn deserialize_minimal_toml() {
        let toml_str = r#"
[backend]
base_url = "https://charla.example.com"
"#;
        let config: CharlaConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.backend.base_url, "https://charla.example.com");
        // All other fields fall back to defaults
        assert_eq!(config.backend.timeout_ms, 30_000);
        assert_eq!(config.chat.max_turns, 5);
    }

    #[test]
    fn empty_toml_produces_defaults() {
        let config: CharlaConfig = toml::from_str("").unwrap();
        assert_eq!(config.chat.max_turns, 5);
        assert_eq!(config.dashboard.default_days, 7);
    }

    #[test]
    fn default_toml_parses_back() {
        let toml_str = CharlaConfig::default_toml();
        let config: CharlaConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.backend.base_url, "http://localhost:3000");
        assert_eq!(config.web.listen_addr, "127.0.0.1:9750");
    }
}
