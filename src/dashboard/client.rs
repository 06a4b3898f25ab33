//! HTTP client for the backend dashboard endpoint.
//!
//! All dashboard operations go through `POST {base}/api/dashboard` with an
//! action name, the operator password, and a day window. There is no server
//! session: every call carries the credential and every response reports
//! `authenticated` back.

use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::CharlaConfig;

// ---------------------------------------------------------------------------
// Log and analytics types
// ---------------------------------------------------------------------------

/// One logged conversation exchange, as stored by the backend. Read-only on
/// this side; unknown backend fields are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    pub session_id: String,
    /// ISO-8601 timestamp string; the calendar date is its first 10 chars.
    pub timestamp: String,
    pub user_message: String,
    pub assistant_response: String,
    #[serde(default)]
    pub sources: Vec<String>,
}

/// Aggregated conversation statistics. Computed locally by the aggregator
/// or returned precomputed by the backend's `get_analytics` action.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsSummary {
    pub total_messages: usize,
    pub unique_sessions: usize,
    /// Mean character length, rounded to one decimal. 0 when empty.
    pub avg_message_length: f64,
    pub avg_response_length: f64,
    /// Calendar date (`YYYY-MM-DD`) to query count, sorted by date.
    pub queries_per_day: BTreeMap<String, usize>,
    /// `(topic, count)` pairs, most frequent first.
    pub popular_topics: Vec<(String, usize)>,
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// Request body for `POST /api/dashboard`.
#[derive(Debug, Serialize)]
struct DashboardRequest<'a> {
    action: &'a str,
    password: &'a str,
    days: u32,
}

/// Response envelope from `POST /api/dashboard`.
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardResponse {
    #[serde(default)]
    pub authenticated: bool,
    #[serde(default)]
    pub logs: Option<Vec<LogRecord>>,
    #[serde(default)]
    pub analytics: Option<AnalyticsSummary>,
    #[serde(default)]
    pub error: Option<String>,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Synchronous backend dashboard client.
#[derive(Debug)]
pub struct DashboardClient {
    base_url: String,
    timeout: Duration,
}

impl DashboardClient {
    /// Build a client from the resolved config.
    pub fn from_config(config: &CharlaConfig) -> Self {
        Self {
            base_url: config.backend.base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_millis(config.backend.timeout_ms),
        }
    }

    /// `get_logs` — conversation logs from the last `days` days.
    pub fn fetch_logs(&self, password: &str, days: u32) -> Result<DashboardResponse> {
        self.post("get_logs", password, days)
    }

    /// `get_analytics` — backend-precomputed statistics.
    pub fn fetch_analytics(&self, password: &str, days: u32) -> Result<DashboardResponse> {
        self.post("get_analytics", password, days)
    }

    /// `export_logs` — the export payload (same log shape, wider default
    /// window on the backend side).
    pub fn export_logs(&self, password: &str, days: u32) -> Result<DashboardResponse> {
        self.post("export_logs", password, days)
    }

    fn post(&self, action: &str, password: &str, days: u32) -> Result<DashboardResponse> {
        let url = format!("{}/api/dashboard", self.base_url);
        let body = DashboardRequest {
            action,
            password,
            days,
        };

        let resp = ureq::post(&url)
            .timeout(self.timeout)
            .send_json(&body)
            .with_context(|| format!("dashboard request '{action}' failed"))?;

        resp.into_json()
            .context("failed to parse dashboard response")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_record_tolerates_extra_fields() {
        let json = r#"{
            "session_id": "session_1",
            "timestamp": "2026-02-10T14:03:00+00:00",
            "user_message": "hola",
            "assistant_response": "hola!",
            "model": "claude-3-5-haiku",
            "dataset_size": 2042
        }"#;
        let record: LogRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.session_id, "session_1");
        assert!(record.sources.is_empty());
    }

    #[test]
    fn unauthenticated_response_deserializes() {
        let json = r#"{"error": "Invalid password", "authenticated": false}"#;
        let resp: DashboardResponse = serde_json::from_str(json).unwrap();
        assert!(!resp.authenticated);
        assert_eq!(resp.error.as_deref(), Some("Invalid password"));
        assert!(resp.logs.is_none());
    }

    #[test]
    fn analytics_popular_topics_round_trip_as_pairs() {
        let summary = AnalyticsSummary {
            total_messages: 4,
            unique_sessions: 2,
            avg_message_length: 20.5,
            avg_response_length: 300.1,
            queries_per_day: BTreeMap::from([("2026-02-10".to_string(), 4)]),
            popular_topics: vec![("budget".to_string(), 3)],
        };
        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains(r#"[["budget",3]]"#));

        let back: AnalyticsSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(back, summary);
    }
}
