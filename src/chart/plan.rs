//! Render planning — resolve a [`ChartSpec`] into a complete [`RenderPlan`].
//!
//! The planner fills in everything the author left out: default colors
//! (a cycling palette for categorical charts, the primary brand color
//! otherwise), normalized chart types, and a complete renderer options
//! object. Author-supplied options win over planner defaults at the top
//! level; nested keys are not merged.

use serde_json::{Map, Value, json};

use super::{ChartSpec, Dataset, RenderPlan};

/// Brand color, used for single-series non-categorical datasets.
pub const PRIMARY_COLOR: &str = "#667eea";

/// Palette cycled over the points of categorical (pie/doughnut) datasets.
pub const PALETTE: [&str; 12] = [
    "#667eea", "#764ba2", "#f093fb", "#4facfe", "#43e97b", "#fa709a", "#fee140", "#30cfd0",
    "#a8edea", "#ff9a9e", "#fbc2eb", "#84fab0",
];

/// Resolve a spec into a plan a renderer can draw without further decisions.
pub fn plan(spec: &ChartSpec) -> RenderPlan {
    let horizontal = spec.chart_type == "horizontalBar";
    let chart_type = normalize_type(&spec.chart_type);
    let categorical = is_categorical(&chart_type);

    let title = spec
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string);

    let mut data = spec.data.clone();
    for dataset in &mut data.datasets {
        style_dataset(dataset, categorical, data.labels.len());
    }

    RenderPlan {
        options: build_options(spec, categorical, horizontal, title.as_deref()),
        chart_type,
        title,
        data,
    }
}

/// Categorical charts color per data point; the rest color per series.
fn is_categorical(chart_type: &str) -> bool {
    matches!(chart_type, "pie" | "doughnut")
}

/// Map legacy type aliases to their modern renderer equivalents. The
/// horizontal orientation is re-expressed via `indexAxis` in the options.
fn normalize_type(chart_type: &str) -> String {
    match chart_type {
        "horizontalBar" => "bar".to_string(),
        other => other.to_string(),
    }
}

/// Fill in the styling fields the author left out.
fn style_dataset(dataset: &mut Dataset, categorical: bool, points: usize) {
    if dataset.background_color.is_none() {
        dataset.background_color = Some(default_color(categorical, points));
    }
    if categorical {
        if dataset.border_color.is_none() {
            dataset.border_color = Some(Value::String("#ffffff".to_string()));
        }
        if dataset.border_width.is_none() {
            dataset.border_width = Some(2.0);
        }
    } else {
        if dataset.border_color.is_none() {
            dataset.border_color = Some(Value::String(PRIMARY_COLOR.to_string()));
        }
        if dataset.border_width.is_none() {
            dataset.border_width = Some(0.0);
        }
    }
}

/// Default fill color: one palette entry per point for categorical charts
/// (cycling past twelve), a single brand color otherwise.
fn default_color(categorical: bool, points: usize) -> Value {
    if categorical {
        let colors: Vec<Value> = (0..points)
            .map(|i| Value::String(PALETTE[i % PALETTE.len()].to_string()))
            .collect();
        Value::Array(colors)
    } else {
        Value::String(PRIMARY_COLOR.to_string())
    }
}

/// Build the complete renderer options object.
///
/// Author options are applied last as a shallow override: a top-level key
/// the author sets replaces the planner's value wholesale.
fn build_options(
    spec: &ChartSpec,
    categorical: bool,
    horizontal: bool,
    title: Option<&str>,
) -> Map<String, Value> {
    let mut options = Map::new();
    options.insert("responsive".to_string(), Value::Bool(true));
    options.insert("maintainAspectRatio".to_string(), Value::Bool(false));

    let mut plugins = Map::new();
    plugins.insert("legend".to_string(), json!({ "position": "top" }));
    if let Some(title) = title {
        plugins.insert("title".to_string(), json!({ "display": true, "text": title }));
    }
    options.insert("plugins".to_string(), Value::Object(plugins));

    if horizontal {
        options.insert("indexAxis".to_string(), Value::String("y".to_string()));
    }

    // Pie and doughnut charts have no axes to scale.
    if !categorical {
        options.insert(
            "scales".to_string(),
            json!({ "y": { "beginAtZero": true } }),
        );
    }

    if let Some(author) = &spec.options {
        for (key, value) in author {
            options.insert(key.clone(), value.clone());
        }
    }

    options
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
