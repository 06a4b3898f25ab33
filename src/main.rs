use anyhow::Result;
use clap::{Parser, Subcommand};

use charla::{cli, config, web};

#[derive(Debug, Parser)]
#[command(name = "charla")]
#[command(about = "Conversational AI client with an embedded admin dashboard")]
struct App {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Interactive conversation REPL (/new, /export, /quit)
    Chat,
    /// Start the embedded web dashboard
    Web {
        /// Listen address (default from config: 127.0.0.1:9750)
        #[arg(long)]
        addr: Option<String>,
    },
    /// Show conversation logs from the backend
    Logs {
        /// Output format: table (default), json, csv
        #[arg(long, default_value = "table")]
        format: String,
        /// Only include the last N days of data
        #[arg(long)]
        days: Option<u32>,
        /// Filter logs by a case-insensitive search term
        #[arg(long)]
        search: Option<String>,
        /// Dashboard password (falls back to CHARLA_DASHBOARD_PASSWORD, then a prompt)
        #[arg(long)]
        password: Option<String>,
    },
    /// Show aggregated conversation statistics
    Analytics {
        /// Output format: table (default), json, csv
        #[arg(long, default_value = "table")]
        format: String,
        /// Only include the last N days of data
        #[arg(long)]
        days: Option<u32>,
        /// Use the backend's precomputed summary instead of aggregating locally
        #[arg(long)]
        backend: bool,
        /// Dashboard password (falls back to CHARLA_DASHBOARD_PASSWORD, then a prompt)
        #[arg(long)]
        password: Option<String>,
    },
    /// Export conversation logs to a JSON file
    Export {
        /// Only include the last N days of data (default: 30)
        #[arg(long)]
        days: Option<u32>,
        /// Dashboard password (falls back to CHARLA_DASHBOARD_PASSWORD, then a prompt)
        #[arg(long)]
        password: Option<String>,
    },
    /// Check system health: backend, config
    Health,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigCommands {
    /// Show the effective (merged) configuration
    Show,
    /// Create a default config file at ~/.charla/config.toml
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
    /// Set a config value, e.g. `charla config set backend.base_url http://host:3000`
    Set { key: String, value: String },
    /// Reset the config file to defaults
    Reset,
}

fn main() -> Result<()> {
    let app = App::parse();

    match app.command {
        Commands::Chat => cli::run_chat(),
        Commands::Web { addr } => {
            let addr = addr.unwrap_or_else(|| config::load().web.listen_addr);
            web::serve(&addr)
        }
        Commands::Logs {
            format,
            days,
            search,
            password,
        } => {
            let fmt = cli::OutputFormat::from_str_opt(Some(&format));
            cli::run_logs(fmt, days, search.as_deref(), password.as_deref())
        }
        Commands::Analytics {
            format,
            days,
            backend,
            password,
        } => {
            let fmt = cli::OutputFormat::from_str_opt(Some(&format));
            cli::run_analytics(fmt, days, backend, password.as_deref())
        }
        Commands::Export { days, password } => cli::run_export(days, password.as_deref()),
        Commands::Health => cli::run_health(),
        Commands::Config { action } => match action {
            ConfigCommands::Show => cli::run_config_show(),
            ConfigCommands::Init { force } => cli::run_config_init(force),
            ConfigCommands::Set { key, value } => cli::run_config_set(&key, &value),
            ConfigCommands::Reset => cli::run_config_reset(),
        },
    }
}
