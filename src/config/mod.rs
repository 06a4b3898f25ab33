//! Configuration system for charla.
//!
//! Provides a layered configuration hierarchy:
//!
//! 1. **Built-in defaults** — hardcoded in [`schema::CharlaConfig::default()`]
//! 2. **User global config** — `~/.charla/config.toml`
//! 3. **Project local config** — `.charla.toml` in the current working directory
//! 4. **Environment variables** — `CHARLA_*` overrides (highest precedence)
//!
//! Later layers override earlier ones. Missing sections in a TOML file fall
//! back to the previous layer's values.
//!
//! The dashboard password is deliberately NOT part of this schema: the
//! credential is volatile and per-invocation (flag,
//! `CHARLA_DASHBOARD_PASSWORD`, or interactive prompt), never written to disk.

pub mod schema;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

pub use schema::CharlaConfig;

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load the fully resolved charla configuration.
///
/// Merges all layers in order: defaults → global TOML → project TOML → env
/// vars. This is the primary entry point for all modules that need
/// configuration.
pub fn load() -> CharlaConfig {
    let mut merged = toml::Value::try_from(CharlaConfig::default())
        .unwrap_or(toml::Value::Table(toml::map::Map::new()));

    // Layer 2: user global config (~/.charla/config.toml)
    if let Some(global) = load_toml_value(global_config_path()) {
        overlay_tables(&mut merged, global);
    }

    // Layer 3: project local config (.charla.toml)
    if let Some(project) = load_toml_value(project_config_path()) {
        overlay_tables(&mut merged, project);
    }

    let mut config: CharlaConfig = merged.try_into().unwrap_or_default();

    // Layer 4: environment variable overrides
    apply_env_overrides(&mut config);

    config
}

/// Load a TOML config file from the given path (if it exists).
///
/// Returns `None` if the path is `None`, the file doesn't exist, or the
/// content is malformed. A broken config file degrades to the previous
/// layers rather than taking the client down.
fn load_toml_value(path: Option<PathBuf>) -> Option<toml::Value> {
    let path = path?;
    let content = fs::read_to_string(&path).ok()?;
    content.parse::<toml::Value>().ok()
}

/// Overlay one config layer onto an accumulated base.
///
/// Tables merge key by key, recursively, so a layer only affects the keys
/// it actually sets; leaf values (and type mismatches) replace wholesale.
fn overlay_tables(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base_table), toml::Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                match base_table.get_mut(&key) {
                    Some(existing) => overlay_tables(existing, value),
                    None => {
                        base_table.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

// ---------------------------------------------------------------------------
// File paths
// ---------------------------------------------------------------------------

/// Path to the user global config: `~/.charla/config.toml`.
fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".charla").join("config.toml"))
}

/// Path to the project local config: `.charla.toml` in the current directory.
fn project_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|cwd| cwd.join(".charla.toml"))
}

/// Return the path to the global config file for display/init purposes.
pub fn global_config_file() -> Option<PathBuf> {
    global_config_path()
}

/// Return the path to the project config file for display purposes.
pub fn project_config_file() -> Option<PathBuf> {
    project_config_path()
}

// ---------------------------------------------------------------------------
// Environment variable overrides
// ---------------------------------------------------------------------------

/// Apply environment variable overrides (highest precedence layer).
///
/// Supported variables:
/// - `CHARLA_BACKEND_URL` — backend base URL
/// - `CHARLA_TIMEOUT_MS` — per-request timeout
/// - `CHARLA_MAX_TURNS` — history turns kept per session
/// - `CHARLA_DAYS` — default dashboard day window
/// - `CHARLA_WEB_ADDR` — embedded dashboard listen address
fn apply_env_overrides(config: &mut CharlaConfig) {
    if let Ok(val) = std::env::var("CHARLA_BACKEND_URL")
        && !val.is_empty()
    {
        config.backend.base_url = val;
    }
    if let Ok(val) = std::env::var("CHARLA_TIMEOUT_MS")
        && let Ok(ms) = val.parse::<u64>()
    {
        config.backend.timeout_ms = ms;
    }
    if let Ok(val) = std::env::var("CHARLA_MAX_TURNS")
        && let Ok(turns) = val.parse::<usize>()
    {
        config.chat.max_turns = turns;
    }
    if let Ok(val) = std::env::var("CHARLA_DAYS")
        && let Ok(days) = val.parse::<u32>()
    {
        config.dashboard.default_days = days;
    }
    if let Ok(val) = std::env::var("CHARLA_WEB_ADDR")
        && !val.is_empty()
    {
        config.web.listen_addr = val;
    }
}

/// Check if a string value represents a truthy boolean.
fn is_truthy(val: &str) -> bool {
    matches!(
        val.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

// ---------------------------------------------------------------------------
// Config init / set / reset
// ---------------------------------------------------------------------------

/// Write the default annotated config to `~/.charla/config.toml`.
///
/// Creates the `~/.charla/` directory if it doesn't exist. Returns an error
/// if the file already exists (use `force = true` to overwrite).
pub fn init_config(force: bool) -> Result<PathBuf> {
    let path = global_config_path().context("could not determine home directory")?;

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create ~/.charla/ directory")?;
    }

    fs::write(&path, CharlaConfig::default_toml()).context("failed to write config file")?;

    Ok(path)
}

/// Set a single config key to a value in the global config file.
///
/// Reads the current global config (or defaults), updates the specified key,
/// and writes the result back. Supports dotted keys like `backend.base_url`.
pub fn set_config_value(key: &str, value: &str) -> Result<()> {
    let path = global_config_path().context("could not determine home directory")?;

    let content = if path.exists() {
        fs::read_to_string(&path).context("failed to read config file")?
    } else {
        toml::to_string_pretty(&CharlaConfig::default())
            .context("failed to serialize default config")?
    };

    let mut value_table: toml::Value =
        toml::from_str(&content).context("failed to parse config as TOML value")?;

    set_toml_value(&mut value_table, key, value)?;

    let output =
        toml::to_string_pretty(&value_table).context("failed to serialize updated config")?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create config directory")?;
    }
    fs::write(&path, output).context("failed to write config file")?;

    Ok(())
}

/// Set a value in a TOML value tree using a dotted key path.
fn set_toml_value(root: &mut toml::Value, key: &str, raw_value: &str) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();
    if parts.is_empty() {
        anyhow::bail!("empty config key");
    }

    // Navigate to the parent table
    let mut current = root;
    for &part in &parts[..parts.len() - 1] {
        current = current
            .get_mut(part)
            .with_context(|| format!("config key not found: section '{part}' in '{key}'"))?;
    }

    let leaf = parts[parts.len() - 1];

    let table = current.as_table_mut().with_context(|| {
        format!(
            "expected table at '{}'",
            key.rsplit_once('.').map(|(s, _)| s).unwrap_or("")
        )
    })?;

    // Determine the type of the existing value to parse correctly
    let existing = table.get(leaf);
    let new_value = match existing {
        Some(toml::Value::Boolean(_)) => toml::Value::Boolean(is_truthy(raw_value)),
        Some(toml::Value::Integer(_)) => {
            let n: i64 = raw_value
                .parse()
                .with_context(|| format!("expected integer for '{key}', got '{raw_value}'"))?;
            toml::Value::Integer(n)
        }
        Some(toml::Value::Float(_)) => {
            let f: f64 = raw_value
                .parse()
                .with_context(|| format!("expected float for '{key}', got '{raw_value}'"))?;
            toml::Value::Float(f)
        }
        _ => toml::Value::String(raw_value.to_string()),
    };

    table.insert(leaf.to_string(), new_value);
    Ok(())
}

/// Reset the global config to defaults (overwrite the file).
pub fn reset_config() -> Result<PathBuf> {
    init_config(true)
}

/// Show the effective (fully resolved) config as TOML.
pub fn show_effective_config() -> Result<String> {
    let config = load();
    toml::to_string_pretty(&config).context("failed to serialize effective config")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_returns_defaults_when_no_files_exist() {
        // This test relies on no config files being present in the test
        // environment. If run in a dev environment with ~/.charla/config.toml,
        // the result will reflect that file's contents.
        let config = load();
        assert!(!config.backend.base_url.is_empty());
    }

    fn resolve_layers(layers: &[&str]) -> CharlaConfig {
        let mut merged = toml::Value::try_from(CharlaConfig::default()).unwrap();
        for layer in layers {
            overlay_tables(&mut merged, layer.parse().unwrap());
        }
        merged.try_into().unwrap()
    }

    #[test]
    fn project_layer_keeps_unrelated_global_values() {
        // A project file that only sets chat.max_turns must not revert the
        // global file's backend section to built-in defaults.
        let global = r#"
[backend]
base_url = "http://global-host:9999"
"#;
        let project = r#"
[chat]
max_turns = 8
"#;
        let config = resolve_layers(&[global, project]);
        assert_eq!(config.backend.base_url, "http://global-host:9999");
        assert_eq!(config.chat.max_turns, 8);
        // Keys no layer touched stay at the built-in default.
        assert_eq!(config.backend.timeout_ms, 30_000);
    }

    #[test]
    fn later_layer_wins_on_the_same_key() {
        let global = r#"
[dashboard]
default_days = 14
export_days = 60
"#;
        let project = r#"
[dashboard]
default_days = 3
"#;
        let config = resolve_layers(&[global, project]);
        assert_eq!(config.dashboard.default_days, 3);
        // Sibling key from the earlier layer survives.
        assert_eq!(config.dashboard.export_days, 60);
    }

    #[test]
    fn empty_layer_changes_nothing() {
        let global = r#"
[web]
listen_addr = "127.0.0.1:8000"
"#;
        let config = resolve_layers(&[global, ""]);
        assert_eq!(config.web.listen_addr, "127.0.0.1:8000");
    }

    #[test]
    fn is_truthy_accepts_variants() {
        assert!(is_truthy("1"));
        assert!(is_truthy("true"));
        assert!(is_truthy("YES"));
        assert!(is_truthy("on"));
        assert!(!is_truthy("0"));
        assert!(!is_truthy("false"));
        assert!(!is_truthy(""));
    }

    #[test]
    fn set_toml_value_updates_string() {
        let toml_str = r#"
[backend]
base_url = "http://localhost:3000"
"#;
        let mut root: toml::Value = toml::from_str(toml_str).unwrap();
        set_toml_value(&mut root, "backend.base_url", "https://charla.example.com").unwrap();

        let table = root.as_table().unwrap();
        let backend = table["backend"].as_table().unwrap();
        assert_eq!(
            backend["base_url"].as_str(),
            Some("https://charla.example.com")
        );
    }

    #[test]
    fn set_toml_value_updates_integer() {
        let toml_str = r#"
[chat]
max_turns = 5
"#;
        let mut root: toml::Value = toml::from_str(toml_str).unwrap();
        set_toml_value(&mut root, "chat.max_turns", "8").unwrap();

        let table = root.as_table().unwrap();
        let chat = table["chat"].as_table().unwrap();
        assert_eq!(chat["max_turns"].as_integer(), Some(8));
    }

    #[test]
    fn set_toml_value_rejects_invalid_key() {
        let toml_str = r#"
[backend]
base_url = "http://localhost:3000"
"#;
        let mut root: toml::Value = toml::from_str(toml_str).unwrap();
        let result = set_toml_value(&mut root, "nonexistent.key", "value");
        assert!(result.is_err());
    }

    #[test]
    fn show_effective_config_returns_toml() {
        let result = show_effective_config();
        assert!(result.is_ok());
        let toml_str = result.unwrap();
        // Should be parseable back
        let _: CharlaConfig = toml::from_str(&toml_str).unwrap();
    }
}
