//! JSON API handlers for the embedded dashboard.
//!
//! Each handler forwards to the backend dashboard endpoint with the password
//! taken from the request body, and returns a `Response<Cursor<Vec<u8>>>`
//! with JSON content. The `authenticated` flag is passed through unchanged
//! so the page can drop back to the login screen when the backend says no.

use std::io::Cursor;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tiny_http::{Response, StatusCode};

use crate::chat::backend::HttpChatBackend;
use crate::config;
use crate::dashboard::client::{AnalyticsSummary, DashboardClient, LogRecord};
use crate::dashboard::{aggregate, filter, topics};

use super::content_type_json;

// ---------------------------------------------------------------------------
// JSON request/response types
// ---------------------------------------------------------------------------

/// Request body for every privileged dashboard action.
#[derive(Deserialize)]
struct DashboardActionRequest {
    #[serde(default)]
    password: String,
    #[serde(default)]
    days: Option<u32>,
    #[serde(default)]
    search: Option<String>,
}

/// Login API response.
#[derive(Serialize)]
struct LoginResponse {
    authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Logs API response.
#[derive(Serialize)]
struct LogsResponse {
    authenticated: bool,
    logs: Vec<LogRecord>,
    total: usize,
}

/// Analytics API response.
#[derive(Serialize)]
struct AnalyticsResponse {
    authenticated: bool,
    analytics: AnalyticsSummary,
}

/// Health API response.
#[derive(Serialize)]
struct HealthResponse {
    backend_url: String,
    backend_reachable: bool,
    config_exists: bool,
    default_days: u32,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Build a JSON success response.
fn json_response<T: Serialize>(data: &T) -> Result<Response<Cursor<Vec<u8>>>> {
    let body = serde_json::to_string(data).context("failed to serialize JSON response")?;
    Ok(Response::from_data(body.into_bytes())
        .with_header(content_type_json())
        .with_status_code(StatusCode(200)))
}

/// The "backend rejected the password" response, shared by all handlers.
fn unauthenticated() -> Result<Response<Cursor<Vec<u8>>>> {
    json_response(&LoginResponse {
        authenticated: false,
        error: Some("Invalid password".to_string()),
    })
}

fn parse_action_request(body: &str) -> Result<DashboardActionRequest> {
    serde_json::from_str(body).context("invalid JSON in dashboard request")
}

// ---------------------------------------------------------------------------
// API Handlers
// ---------------------------------------------------------------------------

/// `POST /api/login` — validate the password with a cheap privileged fetch.
pub fn post_login(body: &str) -> Result<Response<Cursor<Vec<u8>>>> {
    let req = parse_action_request(body)?;
    let cfg = config::load();
    let client = DashboardClient::from_config(&cfg);

    let resp = client.fetch_logs(&req.password, 1)?;
    json_response(&LoginResponse {
        authenticated: resp.authenticated,
        error: if resp.authenticated {
            None
        } else {
            Some("Invalid password".to_string())
        },
    })
}

/// `POST /api/logs` — conversation logs, optionally filtered by a search
/// term server-side.
pub fn post_logs(body: &str) -> Result<Response<Cursor<Vec<u8>>>> {
    let req = parse_action_request(body)?;
    let cfg = config::load();
    let client = DashboardClient::from_config(&cfg);
    let days = req.days.unwrap_or(cfg.dashboard.default_days);

    let resp = client.fetch_logs(&req.password, days)?;
    if !resp.authenticated {
        return unauthenticated();
    }

    let logs = resp.logs.unwrap_or_default();
    let term = req.search.as_deref().unwrap_or("");
    let matched: Vec<LogRecord> = filter::filter(&logs, term).into_iter().cloned().collect();

    json_response(&LogsResponse {
        authenticated: true,
        total: matched.len(),
        logs: matched,
    })
}

/// `POST /api/analytics` — fetch logs and aggregate them locally.
pub fn post_analytics(body: &str) -> Result<Response<Cursor<Vec<u8>>>> {
    let req = parse_action_request(body)?;
    let cfg = config::load();
    let client = DashboardClient::from_config(&cfg);
    let days = req.days.unwrap_or(cfg.dashboard.default_days);

    let resp = client.fetch_logs(&req.password, days)?;
    if !resp.authenticated {
        return unauthenticated();
    }

    let logs = resp.logs.unwrap_or_default();
    let analytics = aggregate::aggregate(&logs, topics::keyword_topics);

    json_response(&AnalyticsResponse {
        authenticated: true,
        analytics,
    })
}

/// `POST /api/export` — the export payload (wider default window), returned
/// to the page for download.
pub fn post_export(body: &str) -> Result<Response<Cursor<Vec<u8>>>> {
    let req = parse_action_request(body)?;
    let cfg = config::load();
    let client = DashboardClient::from_config(&cfg);
    let days = req.days.unwrap_or(cfg.dashboard.export_days);

    let resp = client.export_logs(&req.password, days)?;
    if !resp.authenticated {
        return unauthenticated();
    }

    let logs = resp.logs.unwrap_or_default();
    json_response(&LogsResponse {
        authenticated: true,
        total: logs.len(),
        logs,
    })
}

/// `GET /api/health` — backend reachability and config summary.
pub fn get_health() -> Result<Response<Cursor<Vec<u8>>>> {
    let cfg = config::load();
    let backend = HttpChatBackend::from_config(&cfg);

    let config_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);

    let resp = HealthResponse {
        backend_url: backend.base_url().to_string(),
        backend_reachable: backend.is_reachable(),
        config_exists,
        default_days: cfg.dashboard.default_days,
    };

    json_response(&resp)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_request_parses_full_body() {
        let req = parse_action_request(
            r#"{"password": "secret", "days": 14, "search": "budget"}"#,
        )
        .unwrap();
        assert_eq!(req.password, "secret");
        assert_eq!(req.days, Some(14));
        assert_eq!(req.search.as_deref(), Some("budget"));
    }

    #[test]
    fn action_request_defaults_missing_fields() {
        let req = parse_action_request("{}").unwrap();
        assert!(req.password.is_empty());
        assert!(req.days.is_none());
        assert!(req.search.is_none());
    }

    #[test]
    fn action_request_rejects_malformed_json() {
        assert!(parse_action_request("not json").is_err());
    }

    #[test]
    fn logs_response_serializes() {
        let resp = LogsResponse {
            authenticated: true,
            total: 1,
            logs: vec![LogRecord {
                session_id: "session_1".to_string(),
                timestamp: "2026-02-10T08:00:00".to_string(),
                user_message: "hola".to_string(),
                assistant_response: "hola!".to_string(),
                sources: Vec::new(),
            }],
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"authenticated\":true"));
        assert!(json.contains("\"total\":1"));
    }

    #[test]
    fn login_response_omits_error_when_authenticated() {
        let resp = LoginResponse {
            authenticated: true,
            error: None,
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(!json.contains("error"));
    }
}
