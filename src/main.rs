use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use bugdeck::config::Config;

mod cli;

#[derive(Parser)]
#[command(name = "bugdeck")]
#[command(about = "Unified bug dashboard over Slack, Zendesk and Shortcut")]
#[command(version)]
struct Cli {
    /// Path to the config file (defaults to ~/.bugdeck/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the dashboard GUI
    Gui,

    /// Print aggregate counts from the gateway
    Summary {
        /// Restrict to one source (slack, zendesk, shortcut)
        #[arg(long)]
        source: Option<String>,

        /// Start date (YYYY-MM-DD, requires --end)
        #[arg(long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD, requires --start)
        #[arg(long)]
        end: Option<String>,
    },

    /// Fetch, filter and print bug records
    List {
        /// Restrict to one source (slack, zendesk, shortcut)
        #[arg(long)]
        source: Option<String>,

        /// Case-insensitive text search
        #[arg(long)]
        search: Option<String>,

        /// Exact priority match
        #[arg(long)]
        priority: Option<String>,

        /// Exact workflow-state match
        #[arg(long)]
        state: Option<String>,

        /// Start date (YYYY-MM-DD, requires --end)
        #[arg(long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD, requires --start)
        #[arg(long)]
        end: Option<String>,

        /// Maximum rows to print
        #[arg(long, default_value_t = 100)]
        limit: usize,
    },

    /// Print per-day record counts for the recent past
    Trends {
        /// Number of days to look back
        #[arg(long, default_value_t = 30)]
        days: u32,

        /// Restrict to one source (slack, zendesk, shortcut)
        #[arg(long)]
        source: Option<String>,
    },

    /// Link an old ticket identifier to a new one
    Link {
        old_ticket_id: String,
        new_ticket_id: String,
    },

    /// Probe the gateway's health endpoint
    Health,

    /// Initialize a new config file
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    let config_path = cli.config.unwrap_or_else(Config::global_config_path);
    let config = Config::load_or_default(&config_path);

    match cli.command {
        Some(Commands::Gui) | None => {
            bugdeck::gui::run_gui(config)?;
        }
        Some(Commands::Summary { source, start, end }) => {
            cli::summary::summary_command(&config, source, start, end)?;
        }
        Some(Commands::List {
            source,
            search,
            priority,
            state,
            start,
            end,
            limit,
        }) => {
            cli::list::list_command(
                &config,
                cli::list::ListOptions {
                    source,
                    search,
                    priority,
                    state,
                    start,
                    end,
                    limit,
                },
            )?;
        }
        Some(Commands::Trends { days, source }) => {
            cli::trends::trends_command(&config, days, source)?;
        }
        Some(Commands::Link {
            old_ticket_id,
            new_ticket_id,
        }) => {
            cli::link::link_command(&config, &old_ticket_id, &new_ticket_id)?;
        }
        Some(Commands::Health) => {
            cli::health::health_command(&config)?;
        }
        Some(Commands::Init { force }) => {
            cli::init::init_command(&config_path, force)?;
        }
    }

    Ok(())
}
