//! Chart pipeline tests — extraction through planning.
//!
//! Drives realistic assistant replies through `extract` and `plan` together,
//! the way the chat controller uses them. Unit-level corner cases live next
//! to the modules; these cover the combined behavior.

use serde_json::Value;

use charla::chart::extract::extract;
use charla::chart::plan::{PALETTE, PRIMARY_COLOR, plan};

// ---------------------------------------------------------------------------
// End-to-end: reply text to render plan
// ---------------------------------------------------------------------------

#[test]
fn bar_chart_reply_produces_complete_plan() {
    let reply = concat!(
        "Here are comments per month:\n\n",
        r#"[CHART_START]{"type":"bar","title":"Comments per month","data":{"labels":["Jan","Feb","Mar"],"datasets":[{"label":"Comments","data":[120,85,143]}]}}[CHART_END]"#,
        "\n\nMarch was the busiest month."
    );

    let extraction = extract(reply);
    let spec = extraction.spec.expect("spec expected");
    let plan = plan(&spec);

    assert_eq!(plan.chart_type, "bar");
    assert_eq!(plan.title.as_deref(), Some("Comments per month"));
    assert_eq!(plan.data.labels, vec!["Jan", "Feb", "Mar"]);
    assert_eq!(plan.data.datasets[0].data, vec![120.0, 85.0, 143.0]);

    // Defaults are fully resolved: color, border, options.
    assert_eq!(
        plan.data.datasets[0].background_color,
        Some(Value::String(PRIMARY_COLOR.to_string()))
    );
    assert_eq!(plan.options["responsive"], Value::Bool(true));
    assert_eq!(plan.options["scales"]["y"]["beginAtZero"], Value::Bool(true));
    assert_eq!(
        plan.options["plugins"]["title"]["text"],
        Value::String("Comments per month".to_string())
    );

    // The prose reads cleanly without the region.
    assert!(!extraction.display_text.contains("[CHART_START]"));
    assert!(extraction.display_text.starts_with("Here are comments per month:"));
    assert!(extraction.display_text.ends_with("March was the busiest month."));
}

#[test]
fn pie_chart_reply_gets_palette_per_slice() {
    let reply = concat!(
        r#"[CHART_START]{"type":"pie","data":{"labels":["positive","neutral","negative"],"#,
        r#""datasets":[{"data":[10,25,65]}]}}[CHART_END]"#
    );

    let spec = extract(reply).spec.expect("spec expected");
    let plan = plan(&spec);

    let Some(Value::Array(colors)) = &plan.data.datasets[0].background_color else {
        panic!("expected per-slice colors");
    };
    assert_eq!(colors.len(), 3);
    assert_eq!(colors[1], Value::String(PALETTE[1].to_string()));
    assert_eq!(plan.data.datasets[0].border_width, Some(2.0));
    assert!(!plan.options.contains_key("scales"));
}

#[test]
fn horizontal_bar_reply_is_normalized() {
    let reply = concat!(
        r#"[CHART_START]{"type":"horizontalBar","title":"Top topics","data":"#,
        r#"{"labels":["budget","corruption"],"datasets":[{"data":[40,22]}]}}[CHART_END]"#
    );

    let spec = extract(reply).spec.expect("spec expected");
    let plan = plan(&spec);

    assert_eq!(plan.chart_type, "bar");
    assert_eq!(plan.options["indexAxis"], Value::String("y".to_string()));
}

#[test]
fn author_options_survive_planning() {
    let reply = concat!(
        r#"[CHART_START]{"type":"line","data":{"labels":["a"],"datasets":[{"data":[1]}]},"#,
        r#""options":{"maintainAspectRatio":true}}[CHART_END]"#
    );

    let spec = extract(reply).spec.expect("spec expected");
    let plan = plan(&spec);

    assert_eq!(plan.options["maintainAspectRatio"], Value::Bool(true));
    // Untouched defaults remain.
    assert_eq!(plan.options["responsive"], Value::Bool(true));
}

// ---------------------------------------------------------------------------
// Degradation
// ---------------------------------------------------------------------------

#[test]
fn reply_with_broken_chart_is_still_usable_text() {
    let reply = "Numbers: [CHART_START]{\"type\":\"bar\"[CHART_END] as requested.";
    let extraction = extract(reply);

    assert!(extraction.spec.is_none());
    assert_eq!(extraction.display_text, reply);
}

#[test]
fn second_chart_region_is_left_for_the_reader() {
    let valid = r#"{"type":"bar","data":{"labels":["x"],"datasets":[{"data":[1]}]}}"#;
    let reply = format!(
        "[CHART_START]{valid}[CHART_END] and also [CHART_START]{valid}[CHART_END]"
    );

    let extraction = extract(&reply);
    assert!(extraction.spec.is_some());
    assert!(extraction.display_text.contains("[CHART_START]"));

    // A second pass over the remaining prose picks up the second region.
    let second = extract(&extraction.display_text);
    assert!(second.spec.is_some());
    assert!(!second.display_text.contains("[CHART_START]"));
}
