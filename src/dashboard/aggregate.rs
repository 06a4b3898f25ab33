//! Log aggregation — turn raw conversation logs into analytics.
//!
//! Pure and deterministic: the same logs and tagger always produce the same
//! summary. Topic tagging is supplied by the caller (the aggregator only
//! tallies); [`crate::dashboard::topics::keyword_topics`] is the default
//! collaborator.

use std::collections::BTreeMap;

use super::client::{AnalyticsSummary, LogRecord};

/// Maximum number of topics kept in `popular_topics`.
pub const TOP_TOPICS: usize = 10;

/// Aggregate logs into an [`AnalyticsSummary`].
///
/// `tagger` supplies the topic tags for each record. Averages are arithmetic
/// means of character lengths rounded to one decimal (the backend's
/// convention), and 0 for empty input — no division by zero.
pub fn aggregate<F>(logs: &[LogRecord], tagger: F) -> AnalyticsSummary
where
    F: Fn(&LogRecord) -> Vec<String>,
{
    if logs.is_empty() {
        return AnalyticsSummary::default();
    }

    let total_messages = logs.len();

    let mut session_ids: Vec<&str> = logs.iter().map(|r| r.session_id.as_str()).collect();
    session_ids.sort_unstable();
    session_ids.dedup();
    let unique_sessions = session_ids.len();

    let message_chars: usize = logs.iter().map(|r| r.user_message.chars().count()).sum();
    let response_chars: usize = logs
        .iter()
        .map(|r| r.assistant_response.chars().count())
        .sum();
    let avg_message_length = round1(message_chars as f64 / total_messages as f64);
    let avg_response_length = round1(response_chars as f64 / total_messages as f64);

    // Calendar date = first 10 chars of the ISO timestamp; no timezone
    // normalization beyond what the timestamp already encodes.
    let mut queries_per_day: BTreeMap<String, usize> = BTreeMap::new();
    for record in logs {
        let date = record.timestamp.get(..10).unwrap_or("unknown").to_string();
        *queries_per_day.entry(date).or_default() += 1;
    }

    AnalyticsSummary {
        total_messages,
        unique_sessions,
        avg_message_length,
        avg_response_length,
        queries_per_day,
        popular_topics: tally_topics(logs, tagger),
    }
}

/// Count topic tags across all records, sorted descending by count with ties
/// broken by first-seen order, truncated to [`TOP_TOPICS`].
fn tally_topics<F>(logs: &[LogRecord], tagger: F) -> Vec<(String, usize)>
where
    F: Fn(&LogRecord) -> Vec<String>,
{
    // Vec instead of HashMap to keep first-seen order for tie-breaking.
    let mut counts: Vec<(String, usize)> = Vec::new();
    for record in logs {
        for topic in tagger(record) {
            match counts.iter_mut().find(|(t, _)| *t == topic) {
                Some((_, count)) => *count += 1,
                None => counts.push((topic, 1)),
            }
        }
    }

    // Stable sort: equal counts keep their first-seen order.
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(TOP_TOPICS);
    counts
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn record(session: &str, timestamp: &str, message: &str, response: &str) -> LogRecord {
        LogRecord {
            session_id: session.to_string(),
            timestamp: timestamp.to_string(),
            user_message: message.to_string(),
            assistant_response: response.to_string(),
            sources: Vec::new(),
        }
    }

    fn no_topics(_: &LogRecord) -> Vec<String> {
        Vec::new()
    }

    #[test]
    fn empty_logs_yield_zeroed_summary() {
        let summary = aggregate(&[], no_topics);
        assert_eq!(summary.total_messages, 0);
        assert_eq!(summary.unique_sessions, 0);
        assert_eq!(summary.avg_message_length, 0.0);
        assert_eq!(summary.avg_response_length, 0.0);
        assert!(summary.queries_per_day.is_empty());
        assert!(summary.popular_topics.is_empty());
    }

    #[test]
    fn counts_messages_and_unique_sessions() {
        let logs = vec![
            record("s1", "2026-02-10T08:00:00", "a", "b"),
            record("s2", "2026-02-10T09:00:00", "c", "d"),
            record("s1", "2026-02-10T10:00:00", "e", "f"),
        ];
        let summary = aggregate(&logs, no_topics);
        assert_eq!(summary.total_messages, 3);
        assert_eq!(summary.unique_sessions, 2);
    }

    #[test]
    fn averages_are_rounded_to_one_decimal() {
        let logs = vec![
            record("s1", "2026-02-10T08:00:00", "ab", "abcde"),
            record("s1", "2026-02-10T09:00:00", "abc", "abcdefgh"),
            record("s1", "2026-02-10T10:00:00", "abcd", "ab"),
        ];
        // messages: (2+3+4)/3 = 3.0; responses: (5+8+2)/3 = 5.0
        let summary = aggregate(&logs, no_topics);
        assert_eq!(summary.avg_message_length, 3.0);
        assert_eq!(summary.avg_response_length, 5.0);

        let logs = vec![
            record("s1", "2026-02-10T08:00:00", "a", ""),
            record("s1", "2026-02-10T09:00:00", "ab", ""),
        ];
        // (1+2)/2 = 1.5
        assert_eq!(aggregate(&logs, no_topics).avg_message_length, 1.5);
    }

    #[test]
    fn queries_bucket_by_calendar_date() {
        let logs = vec![
            record("s1", "2026-02-10T08:00:00", "a", "b"),
            record("s1", "2026-02-10T12:00:00", "a", "b"),
            record("s2", "2026-02-10T23:59:00", "a", "b"),
            record("s2", "2026-02-11T00:01:00", "a", "b"),
        ];
        let summary = aggregate(&logs, no_topics);
        assert_eq!(summary.queries_per_day.len(), 2);
        assert_eq!(summary.queries_per_day["2026-02-10"], 3);
        assert_eq!(summary.queries_per_day["2026-02-11"], 1);
    }

    #[test]
    fn topics_sort_by_count_with_first_seen_tiebreak() {
        let logs = vec![
            record("s1", "2026-02-10T08:00:00", "budget corruption", ""),
            record("s1", "2026-02-10T09:00:00", "budget sentiment", ""),
            record("s1", "2026-02-10T10:00:00", "budget", ""),
        ];
        let tagger = |r: &LogRecord| {
            r.user_message
                .split_whitespace()
                .map(str::to_string)
                .collect()
        };
        let summary = aggregate(&logs, tagger);
        assert_eq!(
            summary.popular_topics,
            vec![
                ("budget".to_string(), 3),
                // Both seen once; corruption appeared first.
                ("corruption".to_string(), 1),
                ("sentiment".to_string(), 1),
            ]
        );
    }

    #[test]
    fn topics_are_truncated_to_top_ten() {
        let logs = vec![record(
            "s1",
            "2026-02-10T08:00:00",
            "a b c d e f g h i j k l",
            "",
        )];
        let tagger = |r: &LogRecord| {
            r.user_message
                .split_whitespace()
                .map(str::to_string)
                .collect()
        };
        let summary = aggregate(&logs, tagger);
        assert_eq!(summary.popular_topics.len(), TOP_TOPICS);
    }
}
