//! Admin dashboard core — authenticated log access and analytics.
//!
//! Structure mirrors the data flow: [`client`] fetches logs from the backend
//! (per-call password, no server session — see [`auth`]), [`filter`] narrows
//! them, [`aggregate`] summarizes them into chart-ready statistics, and
//! [`topics`] supplies the default topic tagging.

pub mod aggregate;
pub mod auth;
pub mod client;
pub mod filter;
pub mod topics;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;

use client::LogRecord;

/// Write fetched logs to `dir` as pretty-printed JSON, returning the path.
///
/// The filename carries the calendar date, matching the export the web
/// dashboard offers for download.
pub fn write_logs_export(logs: &[LogRecord], dir: &Path) -> Result<PathBuf> {
    let filename = format!("charla_logs_{}.json", Utc::now().format("%Y-%m-%d"));
    let path = dir.join(filename);

    let json = serde_json::to_string_pretty(logs).context("failed to serialize logs")?;
    fs::write(&path, json)
        .with_context(|| format!("failed to write export to {}", path.display()))?;

    Ok(path)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
