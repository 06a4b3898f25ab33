//! Chart protocol — typed specs embedded in assistant replies.
//!
//! The backend's model may embed a chart specification in its reply between
//! `[CHART_START]` and `[CHART_END]` markers. [`extract`] pulls the spec out
//! of the prose and [`plan`] resolves it into a complete render plan
//! (colors, options) that any renderer can draw without further decisions.
//!
//! The whole pipeline fails open: a reply with a malformed or missing spec
//! is still a perfectly good text reply.

pub mod extract;
pub mod plan;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// Chart spec (as authored by the model)
// ---------------------------------------------------------------------------

/// A chart specification as it appears between the markers.
///
/// Only `type` and `data` are required; everything the author leaves out is
/// filled in by the planner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    #[serde(rename = "type")]
    pub chart_type: String,
    #[serde(default)]
    pub title: Option<String>,
    pub data: ChartData,
    /// Author-supplied renderer options, merged over the planner's defaults.
    #[serde(default)]
    pub options: Option<Map<String, Value>>,
}

/// Labels plus one or more datasets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

/// One series of values. Styling fields are optional; unknown renderer
/// fields pass through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    #[serde(default)]
    pub label: Option<String>,
    pub data: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_color: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_width: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ---------------------------------------------------------------------------
// Render plan (as consumed by renderers)
// ---------------------------------------------------------------------------

/// A fully resolved chart: normalized type, styled datasets, and complete
/// renderer options. Nothing optional is left for the renderer to decide.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderPlan {
    pub chart_type: String,
    pub title: Option<String>,
    pub data: ChartData,
    pub options: Map<String, Value>,
}
