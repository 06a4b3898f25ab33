//! Log search — case-insensitive substring filtering.

use super::client::LogRecord;

/// Return the logs matching `term` in the user message, assistant response,
/// or session id (OR across the three). An empty term matches everything.
pub fn filter<'a>(logs: &'a [LogRecord], term: &str) -> Vec<&'a LogRecord> {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return logs.iter().collect();
    }

    logs.iter()
        .filter(|log| {
            log.user_message.to_lowercase().contains(&term)
                || log.assistant_response.to_lowercase().contains(&term)
                || log.session_id.to_lowercase().contains(&term)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_logs() -> Vec<LogRecord> {
        vec![
            LogRecord {
                session_id: "session_100_abc".to_string(),
                timestamp: "2026-02-10T08:00:00".to_string(),
                user_message: "What does the Budget cover?".to_string(),
                assistant_response: "The budget allocates funds across...".to_string(),
                sources: Vec::new(),
            },
            LogRecord {
                session_id: "session_200_xyz".to_string(),
                timestamp: "2026-02-10T09:00:00".to_string(),
                user_message: "Show sentiment by topic".to_string(),
                assistant_response: "Negative sentiment dominates.".to_string(),
                sources: Vec::new(),
            },
        ]
    }

    #[test]
    fn empty_term_returns_all_logs() {
        let logs = sample_logs();
        assert_eq!(filter(&logs, "").len(), logs.len());
        assert_eq!(filter(&logs, "   ").len(), logs.len());
    }

    #[test]
    fn match_is_case_insensitive() {
        let logs = sample_logs();
        let hits = filter(&logs, "budget");
        assert_eq!(hits.len(), 1);
        assert!(hits[0].user_message.contains("Budget"));
    }

    #[test]
    fn matches_any_of_the_three_fields() {
        let logs = sample_logs();
        // Response text only.
        assert_eq!(filter(&logs, "dominates").len(), 1);
        // Session id only.
        assert_eq!(filter(&logs, "200_xyz").len(), 1);
    }

    #[test]
    fn no_match_returns_empty() {
        let logs = sample_logs();
        assert!(filter(&logs, "nonexistent term").is_empty());
    }
}
