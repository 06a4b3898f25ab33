//! Chart region extraction from assistant reply text.
//!
//! Scans for the first `[CHART_START]...[CHART_END]` region, parses its
//! payload as a [`ChartSpec`], and returns the prose with the region removed.
//! Any failure (no region, malformed JSON, wrong shape) falls open: the
//! original text is returned unchanged and no spec is produced.

use std::sync::LazyLock;

use regex::Regex;

use super::ChartSpec;

/// Matches the first marker-delimited region, payload included. Non-greedy
/// so a second region is left in the prose untouched.
static CHART_REGION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\[CHART_START\](.*?)\[CHART_END\]")
        .unwrap_or_else(|e| panic!("invalid chart region regex: {e}"))
});

/// The result of scanning a reply for an embedded chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    /// The prose to display. Equal to the input unless a valid spec was
    /// found, in which case the region is cut out.
    pub display_text: String,
    pub spec: Option<ChartSpec>,
}

/// Extract the first embedded chart spec from `text`.
pub fn extract(text: &str) -> Extraction {
    let Some(captures) = CHART_REGION_RE.captures(text) else {
        return fail_open(text);
    };

    let payload = match captures.get(1) {
        Some(m) => m.as_str().trim(),
        None => return fail_open(text),
    };
    let Ok(spec) = serde_json::from_str::<ChartSpec>(payload) else {
        return fail_open(text);
    };

    let region = match captures.get(0) {
        Some(m) => m,
        None => return fail_open(text),
    };
    let mut display_text = String::with_capacity(text.len() - region.len());
    display_text.push_str(&text[..region.start()]);
    display_text.push_str(&text[region.end()..]);

    Extraction {
        display_text: display_text.trim().to_string(),
        spec: Some(spec),
    }
}

fn fail_open(text: &str) -> Extraction {
    Extraction {
        display_text: text.to_string(),
        spec: None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_SPEC: &str =
        r#"{"type":"bar","title":"Sentiment","data":{"labels":["pos","neg"],"datasets":[{"data":[5,3]}]}}"#;

    #[test]
    fn plain_text_passes_through() {
        let result = extract("Just a normal reply.");
        assert_eq!(result.display_text, "Just a normal reply.");
        assert!(result.spec.is_none());
    }

    #[test]
    fn valid_region_is_extracted_and_removed() {
        let text = format!("Here is the chart:\n[CHART_START]{VALID_SPEC}[CHART_END]\nAs shown.");
        let result = extract(&text);

        let spec = result.spec.unwrap();
        assert_eq!(spec.chart_type, "bar");
        assert_eq!(spec.data.labels, vec!["pos", "neg"]);
        assert!(!result.display_text.contains("[CHART_START]"));
        assert!(result.display_text.contains("Here is the chart:"));
        assert!(result.display_text.contains("As shown."));
    }

    #[test]
    fn payload_may_span_lines() {
        let text = format!(
            "[CHART_START]\n{}\n[CHART_END]",
            VALID_SPEC.replace(",\"data\"", ",\n\"data\"")
        );
        let result = extract(&text);
        assert!(result.spec.is_some());
        assert!(result.display_text.is_empty());
    }

    #[test]
    fn malformed_json_fails_open() {
        let text = "Chart: [CHART_START]{not json}[CHART_END] done.";
        let result = extract(text);
        assert!(result.spec.is_none());
        // Markers stay visible so nothing is silently swallowed.
        assert_eq!(result.display_text, text);
    }

    #[test]
    fn wrong_shape_fails_open() {
        let text = r#"[CHART_START]{"type":"bar"}[CHART_END]"#;
        let result = extract(text);
        assert!(result.spec.is_none());
        assert_eq!(result.display_text, text);
    }

    #[test]
    fn missing_end_marker_fails_open() {
        let text = format!("[CHART_START]{VALID_SPEC}");
        let result = extract(&text);
        assert!(result.spec.is_none());
        assert_eq!(result.display_text, text);
    }

    #[test]
    fn only_first_region_is_extracted() {
        let text = format!(
            "[CHART_START]{VALID_SPEC}[CHART_END] and [CHART_START]{VALID_SPEC}[CHART_END]"
        );
        let result = extract(&text);
        assert!(result.spec.is_some());
        // The second region stays in the prose.
        assert!(result.display_text.contains("[CHART_START]"));
    }

    #[test]
    fn extraction_is_idempotent_on_clean_text() {
        let text = format!("Intro [CHART_START]{VALID_SPEC}[CHART_END] outro");
        let first = extract(&text);
        let second = extract(&first.display_text);
        assert!(second.spec.is_none());
        assert_eq!(second.display_text, first.display_text);
    }

    #[test]
    fn whitespace_around_region_is_trimmed() {
        let text = format!("  [CHART_START]{VALID_SPEC}[CHART_END]  ");
        let result = extract(&text);
        assert!(result.spec.is_some());
        assert!(result.display_text.is_empty());
    }
}
