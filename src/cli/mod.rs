//! CLI command implementations for charla.
//!
//! Provides subcommand handlers for:
//! - `charla chat` — interactive conversation REPL
//! - `charla logs --days N --search term` — fetch and filter conversation logs
//! - `charla analytics --days N` — aggregated statistics
//! - `charla export --days N` — download logs to a JSON file
//! - `charla health` — check backend and config
//! - `charla config show|init|set|reset` — configuration management

use std::io::{BufRead, Write as _};

use anyhow::Result;
use colored::Colorize;

use crate::chart::RenderPlan;
use crate::chat::backend::HttpChatBackend;
use crate::chat::{ChatController, ChatError, RenderableMessage, export};
use crate::config;
use crate::dashboard::auth::DashboardAuthSession;
use crate::dashboard::client::{AnalyticsSummary, DashboardClient, LogRecord};
use crate::dashboard::{aggregate, filter, topics, write_logs_export};
use crate::session::Session;

/// Output format for dashboard commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl OutputFormat {
    pub fn from_str_opt(s: Option<&str>) -> Self {
        match s {
            Some("json") => Self::Json,
            Some("csv") => Self::Csv,
            _ => Self::Table,
        }
    }
}

// ---------------------------------------------------------------------------
// charla chat
// ---------------------------------------------------------------------------

/// Run the interactive conversation REPL.
///
/// Commands inside the REPL: `/new` (confirmed reset), `/export`, `/quit`.
pub fn run_chat() -> Result<()> {
    let cfg = config::load();
    let backend = HttpChatBackend::from_config(&cfg);

    println!("{}", "charla — AI conversation client".bold().cyan());
    if backend.is_reachable() {
        println!("  {} connected to {}", "●".green(), backend.base_url());
    } else {
        println!(
            "  {} backend not reachable at {} — messages will fail until it is up",
            "●".red(),
            backend.base_url()
        );
    }
    println!("  {}", "Type a message, or /new, /export, /quit".dimmed());
    println!();

    let mut controller = ChatController::new(backend);
    let mut session = Session::with_max_turns(cfg.chat.max_turns);

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("{} ", "you>".bold().green());
        std::io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break; // EOF
        };
        let input = line?;
        let input = input.trim();

        match input {
            "" => continue,
            "/quit" | "/exit" => break,
            "/new" => handle_new_chat(&mut session, &mut lines)?,
            "/export" => handle_export(&session),
            text => match controller.send(&mut session, text) {
                Ok(message) => print_message(&message),
                Err(error) => print_chat_error(&error),
            },
        }
    }

    Ok(())
}

/// `/new` — reset the session, asking for confirmation when history would
/// be lost.
fn handle_new_chat(
    session: &mut Session,
    lines: &mut impl Iterator<Item = std::io::Result<String>>,
) -> Result<()> {
    let Some(intent) = session.request_reset() else {
        *session = Session::with_max_turns(session.max_turns());
        println!("  {}", "Started a new conversation.".dimmed());
        return Ok(());
    };

    print!("Start a new conversation? Current chat will be cleared. [y/N] ");
    std::io::stdout().flush()?;
    let answer = lines.next().transpose()?.unwrap_or_default();

    if answer.trim().eq_ignore_ascii_case("y") && session.confirm_reset(intent) {
        println!("  {}", "Started a new conversation.".dimmed());
    } else {
        println!("  {}", "Kept the current conversation.".dimmed());
    }
    Ok(())
}

/// `/export` — write the conversation to a timestamped JSON file.
fn handle_export(session: &Session) {
    match export::write_conversation(session, std::path::Path::new(".")) {
        Ok(path) => println!(
            "{} Conversation exported to {}",
            "✓".green().bold(),
            path.display()
        ),
        Err(e) => println!("{} {}", "✗".red().bold(), e),
    }
}

/// Print a renderable assistant message: prose, then chart, then sources.
fn print_message(message: &RenderableMessage) {
    println!();
    println!("{}", message.display_text);

    if let Some(plan) = &message.render_plan {
        println!();
        print_chart(plan);
    }

    if !message.sources.is_empty() {
        println!();
        println!(
            "  {} {}",
            "Sources:".dimmed(),
            message.sources.join(", ").dimmed()
        );
    }
    println!();
}

/// Transient failure notice. Transport and protocol failures read the same
/// to the user; the detail goes to stderr for diagnosis.
fn print_chat_error(error: &ChatError) {
    match error {
        ChatError::EmptyMessage => {}
        ChatError::RequestInFlight => {
            println!(
                "{}",
                "A message is still being processed — please wait.".yellow()
            );
        }
        ChatError::Transport(_) | ChatError::Protocol(_) => {
            println!(
                "{}",
                "Sorry, there was an error processing your request. Please try again.".red()
            );
            eprintln!("{}", format!("charla: {error}").dimmed());
        }
    }
}

// ---------------------------------------------------------------------------
// Terminal chart rendering
// ---------------------------------------------------------------------------

/// Width of the widest bar in terminal chart output.
const BAR_WIDTH: usize = 30;

/// Print a render plan as a textual chart, degrading to a placeholder when
/// the plan cannot be rendered.
pub fn print_chart(plan: &RenderPlan) {
    match render_chart_text(plan) {
        Ok(text) => print!("{text}"),
        Err(_) => println!("  {}", "[chart could not be rendered]".dimmed()),
    }
}

/// Build a textual bar rendering of the first dataset.
///
/// This is the CLI's charting collaborator; the web dashboard uses a real
/// renderer instead.
fn render_chart_text(plan: &RenderPlan) -> Result<String> {
    let dataset = plan
        .data
        .datasets
        .first()
        .ok_or_else(|| anyhow::anyhow!("chart has no datasets"))?;
    if dataset.data.is_empty() || plan.data.labels.is_empty() {
        anyhow::bail!("chart has no data points");
    }

    let max = dataset.data.iter().cloned().fold(f64::MIN, f64::max);
    if !max.is_finite() || max <= 0.0 {
        anyhow::bail!("chart values are not renderable");
    }

    let label_width = plan
        .data
        .labels
        .iter()
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(0)
        .min(24);

    let mut out = String::new();
    if let Some(title) = &plan.title {
        out.push_str(&format!("  {}\n", title.bold()));
    }
    for (label, value) in plan.data.labels.iter().zip(&dataset.data) {
        let bar_len = ((value / max) * BAR_WIDTH as f64).round() as usize;
        out.push_str(&format!(
            "  {:<label_width$} {} {}\n",
            truncate(label, 24),
            "█".repeat(bar_len.max(1)).cyan(),
            value,
        ));
    }
    Ok(out)
}

// ---------------------------------------------------------------------------
// charla logs
// ---------------------------------------------------------------------------

/// Fetch conversation logs, optionally filtered by a search term.
pub fn run_logs(
    format: OutputFormat,
    days: Option<u32>,
    search: Option<&str>,
    password: Option<&str>,
) -> Result<()> {
    let cfg = config::load();
    let client = DashboardClient::from_config(&cfg);
    let days = days.unwrap_or(cfg.dashboard.default_days);

    let Some(auth) = login(&client, password)? else {
        return Ok(());
    };
    let resp = client.fetch_logs(auth.credential().unwrap_or_default(), days)?;
    let logs = resp.logs.unwrap_or_default();

    let term = search.unwrap_or("");
    let matched: Vec<&LogRecord> = filter::filter(&logs, term);

    if matched.is_empty() {
        println!(
            "{}",
            format!("No logs found for the last {days} days.").yellow()
        );
        return Ok(());
    }

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&matched)?),
        OutputFormat::Csv => print_logs_csv(&matched),
        OutputFormat::Table => print_logs_table(&matched, days),
    }

    Ok(())
}

fn print_logs_table(logs: &[&LogRecord], days: u32) {
    println!(
        "{}",
        format!("Conversation Logs — Last {days} Days").bold().cyan()
    );
    println!("{}", "=".repeat(60));

    for (i, log) in logs.iter().enumerate() {
        println!(
            "  {} {}",
            truncate(&log.session_id, 28).bold(),
            log.timestamp.dimmed()
        );
        println!("  {} {}", "user:".green(), truncate(&log.user_message, 100));
        println!(
            "  {} {}",
            "asst:".blue(),
            truncate(&log.assistant_response, 100)
        );
        if !log.sources.is_empty() {
            println!("  {} {}", "src: ".dimmed(), log.sources.join(", ").dimmed());
        }
        if i + 1 < logs.len() {
            println!("  {}", "-".repeat(58).dimmed());
        }
    }

    println!();
    println!("  {} entries", logs.len());
}

fn print_logs_csv(logs: &[&LogRecord]) {
    println!("session_id,timestamp,user_message,assistant_response");
    for log in logs {
        println!(
            "{},{},{},{}",
            log.session_id,
            log.timestamp,
            csv_escape(&log.user_message),
            csv_escape(&log.assistant_response),
        );
    }
}

/// Quote a CSV field containing commas, quotes, or newlines.
fn csv_escape(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

// ---------------------------------------------------------------------------
// charla analytics
// ---------------------------------------------------------------------------

/// Show aggregated statistics for the last `days` days.
///
/// By default logs are fetched and aggregated locally; `--backend` asks the
/// backend for its precomputed summary instead.
pub fn run_analytics(
    format: OutputFormat,
    days: Option<u32>,
    use_backend: bool,
    password: Option<&str>,
) -> Result<()> {
    let cfg = config::load();
    let client = DashboardClient::from_config(&cfg);
    let days = days.unwrap_or(cfg.dashboard.default_days);

    let Some(auth) = login(&client, password)? else {
        return Ok(());
    };
    let credential = auth.credential().unwrap_or_default();

    let summary = if use_backend {
        client
            .fetch_analytics(credential, days)?
            .analytics
            .unwrap_or_default()
    } else {
        let resp = client.fetch_logs(credential, days)?;
        let logs = resp.logs.unwrap_or_default();
        aggregate::aggregate(&logs, topics::keyword_topics)
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Csv => print_analytics_csv(&summary),
        OutputFormat::Table => print_analytics_table(&summary, days),
    }

    Ok(())
}

fn print_analytics_table(summary: &AnalyticsSummary, days: u32) {
    println!(
        "{}",
        format!("charla Analytics — Last {days} Days").bold().cyan()
    );
    println!("{}", "=".repeat(60));
    println!();

    println!(
        "  {} {}",
        "Total messages: ".bold(),
        format_number(summary.total_messages)
    );
    println!(
        "  {} {}",
        "Unique sessions:".bold(),
        format_number(summary.unique_sessions)
    );
    println!(
        "  {} {:.1} chars",
        "Avg message:    ".bold(),
        summary.avg_message_length
    );
    println!(
        "  {} {:.1} chars",
        "Avg response:   ".bold(),
        summary.avg_response_length
    );
    println!();

    if !summary.queries_per_day.is_empty() {
        println!("{}", "Queries per Day".bold().cyan());
        println!("  {:<12} {:>8}", "Date", "Queries");
        println!("  {}", "-".repeat(22));
        for (date, count) in &summary.queries_per_day {
            println!("  {:<12} {:>8}", date, count);
        }
        println!();
    }

    if !summary.popular_topics.is_empty() {
        println!("{}", "Popular Topics".bold().cyan());
        let max = summary
            .popular_topics
            .iter()
            .map(|(_, c)| *c)
            .max()
            .unwrap_or(1)
            .max(1);
        for (topic, count) in &summary.popular_topics {
            let bar_len = (count * BAR_WIDTH).div_ceil(max);
            println!(
                "  {:<16} {} {}",
                truncate(topic, 16),
                "█".repeat(bar_len).cyan(),
                count
            );
        }
    }
}

fn print_analytics_csv(summary: &AnalyticsSummary) {
    println!("metric,value");
    println!("total_messages,{}", summary.total_messages);
    println!("unique_sessions,{}", summary.unique_sessions);
    println!("avg_message_length,{:.1}", summary.avg_message_length);
    println!("avg_response_length,{:.1}", summary.avg_response_length);
    for (date, count) in &summary.queries_per_day {
        println!("queries:{date},{count}");
    }
    for (topic, count) in &summary.popular_topics {
        println!("topic:{topic},{count}");
    }
}

// ---------------------------------------------------------------------------
// charla export
// ---------------------------------------------------------------------------

/// Download logs for the last `days` days to a dated JSON file.
pub fn run_export(days: Option<u32>, password: Option<&str>) -> Result<()> {
    let cfg = config::load();
    let client = DashboardClient::from_config(&cfg);
    let days = days.unwrap_or(cfg.dashboard.export_days);

    let Some(auth) = login(&client, password)? else {
        return Ok(());
    };
    let resp = client.export_logs(auth.credential().unwrap_or_default(), days)?;
    let logs = resp.logs.unwrap_or_default();

    if logs.is_empty() {
        println!(
            "{}",
            format!("No logs to export for the last {days} days.").yellow()
        );
        return Ok(());
    }

    let path = write_logs_export(&logs, std::path::Path::new("."))?;
    println!(
        "{} Exported {} log entries to {}",
        "✓".green().bold(),
        logs.len(),
        path.display()
    );

    Ok(())
}

// ---------------------------------------------------------------------------
// Login helper
// ---------------------------------------------------------------------------

/// Resolve the operator password and authenticate against the backend.
///
/// Order: `--password` flag, `CHARLA_DASHBOARD_PASSWORD`, interactive
/// prompt. Returns `None` (after printing the inline error) when the
/// backend rejects the credential; the credential is not retained.
fn login(client: &DashboardClient, password: Option<&str>) -> Result<Option<DashboardAuthSession>> {
    let password = match password {
        Some(p) => p.to_string(),
        None => match std::env::var("CHARLA_DASHBOARD_PASSWORD") {
            Ok(p) if !p.is_empty() => p,
            _ => prompt_password()?,
        },
    };

    let mut auth = DashboardAuthSession::new();
    if auth.authenticate(client, &password)? {
        Ok(Some(auth))
    } else {
        println!("{}", "Invalid password".red());
        Ok(None)
    }
}

fn prompt_password() -> Result<String> {
    print!("Dashboard password: ");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

// ---------------------------------------------------------------------------
// charla health
// ---------------------------------------------------------------------------

/// Check system health: backend reachability, config files.
pub fn run_health() -> Result<()> {
    println!("{}", "charla Health Check".bold().cyan());
    println!("{}", "=".repeat(40));

    let cfg = config::load();

    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    print_health_item(
        "Global config",
        global_exists,
        if global_exists {
            "~/.charla/config.toml found"
        } else {
            "not found (run `charla config init` to create)"
        },
    );
    print_health_item(
        "Project config",
        project_exists,
        if project_exists {
            ".charla.toml found"
        } else {
            "none (optional)"
        },
    );

    let backend = HttpChatBackend::from_config(&cfg);
    let reachable = backend.is_reachable();
    let detail = if reachable {
        format!("reachable at {}", backend.base_url())
    } else {
        format!("not reachable at {}", backend.base_url())
    };
    print_health_item("Backend", reachable, &detail);

    print_health_item(
        "Chat history",
        true,
        &format!("{} turns kept per session", cfg.chat.max_turns),
    );
    print_health_item(
        "Dashboard window",
        true,
        &format!("{} days default", cfg.dashboard.default_days),
    );

    Ok(())
}

fn print_health_item(name: &str, ok: bool, detail: &str) {
    let status = if ok {
        "✓".green().bold()
    } else {
        "✗".red().bold()
    };
    println!("  {} {:<20} {}", status, name, detail.dimmed());
}

// ---------------------------------------------------------------------------
// charla config show | init | set | reset
// ---------------------------------------------------------------------------

/// Show the effective (merged) configuration as TOML.
pub fn run_config_show() -> Result<()> {
    let toml_str = config::show_effective_config()?;
    println!("{}", "Effective charla Configuration".bold().cyan());
    println!("{}", "=".repeat(50));
    println!();
    println!("{toml_str}");

    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    println!("{}", "Sources (highest priority last):".dimmed());
    println!("  {} built-in defaults", "·".dimmed());
    if global_exists {
        println!("  {} {}", "✓".green(), "~/.charla/config.toml".dimmed());
    } else {
        println!(
            "  {} {}",
            "·".dimmed(),
            "~/.charla/config.toml (not found)".dimmed()
        );
    }
    if project_exists {
        println!("  {} {}", "✓".green(), ".charla.toml".dimmed());
    } else {
        println!("  {} {}", "·".dimmed(), ".charla.toml (not found)".dimmed());
    }
    println!(
        "  {} {}",
        "·".dimmed(),
        "CHARLA_* environment variables".dimmed()
    );

    Ok(())
}

/// Initialize a default config file at `~/.charla/config.toml`.
pub fn run_config_init(force: bool) -> Result<()> {
    let path = config::init_config(force)?;
    println!(
        "{} Config written to {}",
        "✓".green().bold(),
        path.display()
    );
    Ok(())
}

/// Set a single configuration value in the global config file.
pub fn run_config_set(key: &str, value: &str) -> Result<()> {
    config::set_config_value(key, value)?;
    println!("{} Set {} = {}", "✓".green().bold(), key.bold(), value);
    Ok(())
}

/// Reset configuration to defaults.
pub fn run_config_reset() -> Result<()> {
    let path = config::reset_config()?;
    println!(
        "{} Config reset to defaults at {}",
        "✓".green().bold(),
        path.display()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

/// Format a number with comma separators for readability.
fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    result.chars().rev().collect()
}

/// Truncate a string to `max_len` characters, appending "…" if truncated.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{kept}…")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{extract::extract, plan::plan};

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1234567), "1,234,567");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 5), "hell…");
        assert_eq!(truncate("sí señor", 8), "sí señor");
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!(OutputFormat::from_str_opt(None), OutputFormat::Table);
        assert_eq!(OutputFormat::from_str_opt(Some("json")), OutputFormat::Json);
        assert_eq!(OutputFormat::from_str_opt(Some("csv")), OutputFormat::Csv);
        assert_eq!(
            OutputFormat::from_str_opt(Some("unknown")),
            OutputFormat::Table
        );
    }

    #[test]
    fn csv_escape_quotes_when_needed() {
        assert_eq!(csv_escape("plain"), "plain");
        assert_eq!(csv_escape("a,b"), "\"a,b\"");
        assert_eq!(csv_escape("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn chart_text_renders_each_label() {
        let spec = extract(
            r#"[CHART_START]{"type":"bar","title":"T","data":{"labels":["alpha","beta"],"datasets":[{"data":[4,2]}]}}[CHART_END]"#,
        )
        .spec
        .unwrap();
        let text = render_chart_text(&plan(&spec)).unwrap();
        assert!(text.contains("alpha"));
        assert!(text.contains("beta"));
        assert!(text.contains('█'));
    }

    #[test]
    fn chart_text_fails_on_empty_dataset() {
        let spec = extract(
            r#"[CHART_START]{"type":"bar","data":{"labels":[],"datasets":[]}}[CHART_END]"#,
        )
        .spec
        .unwrap();
        assert!(render_chart_text(&plan(&spec)).is_err());
    }
}
