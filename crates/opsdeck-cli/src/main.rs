//! OpsDeck CLI - Admin dashboard with an AI assistant
//!
//! # Quick Start
//!
//! ```bash
//! # Interactive dashboard (default)
//! OPSDECK_API_KEY=... opsdeck
//!
//! # One assistant exchange
//! opsdeck ask "Add a new operator named Alex."
//!
//! # AI insight over the seeded data
//! opsdeck insight resources
//!
//! # Deterministic simulator run
//! opsdeck simulate --ticks 15 --seed 7
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use opsdeck_assistant::{Assistant, InsightKind};
use opsdeck_guard::GuardConfig;
use opsdeck_tui::TuiConfig;
use opsdeck_types::DEFAULT_WINDOW;
use tracing_subscriber::EnvFilter;

mod commands;
mod display;

use commands::{ask, insight, simulate};

/// Shortest accepted simulator period
const MIN_TICK_MS: u64 = 100;

/// Upper bound for `simulate --ticks`
const MAX_SIMULATED_TICKS: u64 = 1_000_000;

/// OpsDeck CLI - Admin dashboard with an AI assistant
#[derive(Parser)]
#[command(name = "opsdeck")]
#[command(author = "OpsDeck Contributors")]
#[command(version)]
#[command(about = "Admin dashboard with live metrics and a command-capable AI assistant", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Write logs to this file (the dashboard otherwise discards them)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Debug-level logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Longest user name the assistant may create
    #[arg(long, global = true, default_value_t = GuardConfig::default().max_name_chars)]
    max_name_chars: usize,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive dashboard
    Tui {
        /// Milliseconds between simulator ticks
        #[arg(long, default_value = "2000")]
        tick_ms: u64,

        /// Samples kept per metric series
        #[arg(long, default_value_t = DEFAULT_WINDOW)]
        window: usize,
    },

    /// Send one prompt to the assistant against a fresh session
    Ask {
        /// The prompt
        #[arg(required = true, num_args = 1..)]
        prompt: Vec<String>,

        /// Samples kept per metric series
        #[arg(long, default_value_t = DEFAULT_WINDOW)]
        window: usize,
    },

    /// Request one AI insight
    Insight {
        #[arg(value_enum)]
        kind: InsightTarget,
    },

    /// Apply simulator ticks without a timer and print the result as JSON
    Simulate {
        /// Number of ticks to apply
        #[arg(short, long, default_value = "12", value_parser = clap::value_parser!(u64).range(..=MAX_SIMULATED_TICKS))]
        ticks: u64,

        /// Samples kept per metric series
        #[arg(long, default_value_t = DEFAULT_WINDOW)]
        window: usize,

        /// Seed for a reproducible run
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum InsightTarget {
    /// Analyze recent activity logs
    Logs,
    /// Recommend a role for a monitoring user
    Roles,
    /// Resource allocation and optimization plan
    Resources,
}

impl From<InsightTarget> for InsightKind {
    fn from(target: InsightTarget) -> Self {
        match target {
            InsightTarget::Logs => InsightKind::Logs,
            InsightTarget::Roles => InsightKind::Roles,
            InsightTarget::Resources => InsightKind::Resources,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Tui {
        tick_ms: 2000,
        window: DEFAULT_WINDOW,
    });

    let guard = GuardConfig {
        max_name_chars: cli.max_name_chars,
    };
    let interactive = matches!(command, Commands::Tui { .. });
    init_logging(cli.verbose, cli.log_file.as_deref(), interactive)?;

    match command {
        Commands::Tui { tick_ms, window } => {
            let config = TuiConfig {
                tick: Duration::from_millis(tick_ms.max(MIN_TICK_MS)),
                window,
                guard,
            };
            opsdeck_tui::run_dashboard(config, Assistant::from_env()).await?;
        }
        Commands::Ask { prompt, window } => {
            print_banner();
            ask::run_ask(&prompt.join(" "), window, guard).await?;
        }
        Commands::Insight { kind } => {
            print_banner();
            insight::run_insight(kind.into()).await?;
        }
        Commands::Simulate { ticks, window, seed } => {
            simulate::run_simulate(ticks, window, seed)?;
        }
    }

    Ok(())
}

/// Install the tracing subscriber
///
/// Logs go to `log_file` when given. Otherwise they go to stderr, except in
/// the dashboard where the terminal belongs to the UI and logs are dropped.
fn init_logging(verbose: bool, log_file: Option<&Path>, interactive: bool) -> anyhow::Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new().create(true).append(true).open(path)?;
            tracing_subscriber::fmt()
                .with_writer(std::sync::Mutex::new(file))
                .with_ansi(false)
                .with_env_filter(env_filter)
                .init();
        }
        None if interactive => {}
        None => {
            tracing_subscriber::fmt()
                .with_writer(std::io::stderr)
                .with_env_filter(env_filter)
                .init();
        }
    }

    Ok(())
}

fn print_banner() {
    println!();
    println!("{}", "╔══════════════════════════════════════════════════════════╗".bright_cyan());
    println!("{}{}{}",
        "║  ".bright_cyan(),
        "OpsDeck".bright_white().bold(),
        " - Admin Dashboard with an AI Assistant               ║".bright_cyan()
    );
    println!("{}", "╚══════════════════════════════════════════════════════════╝".bright_cyan());
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_command_is_dashboard() {
        let cli = Cli::try_parse_from(["opsdeck"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_ask_joins_words() {
        let cli = Cli::try_parse_from(["opsdeck", "ask", "Add", "an", "operator"]).unwrap();
        match cli.command {
            Some(Commands::Ask { prompt, window }) => {
                assert_eq!(prompt.join(" "), "Add an operator");
                assert_eq!(window, DEFAULT_WINDOW);
            }
            _ => panic!("expected ask"),
        }
    }

    #[test]
    fn test_insight_kind_argument() {
        let cli = Cli::try_parse_from(["opsdeck", "insight", "resources"]).unwrap();
        match cli.command {
            Some(Commands::Insight { kind }) => {
                assert_eq!(InsightKind::from(kind), InsightKind::Resources)
            }
            _ => panic!("expected insight"),
        }
        assert!(Cli::try_parse_from(["opsdeck", "insight", "weather"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["opsdeck", "simulate", "--seed", "7", "-v", "--log-file", "ops.log"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.log_file, Some(PathBuf::from("ops.log")));
    }

    #[test]
    fn test_max_name_chars_defaults_to_guard_config() {
        let cli = Cli::try_parse_from(["opsdeck", "ask", "hi"]).unwrap();
        assert_eq!(cli.max_name_chars, GuardConfig::default().max_name_chars);

        let cli = Cli::try_parse_from(["opsdeck", "ask", "hi", "--max-name-chars", "12"]).unwrap();
        assert_eq!(cli.max_name_chars, 12);
    }

    #[test]
    fn test_simulate_ticks_are_bounded() {
        let cli = Cli::try_parse_from(["opsdeck", "simulate", "--ticks", "1000000"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Simulate { ticks: 1_000_000, .. })));

        assert!(Cli::try_parse_from(["opsdeck", "simulate", "--ticks", "1000001"]).is_err());
        assert!(Cli::try_parse_from(["opsdeck", "simulate", "--ticks", "4294967296"]).is_err());
    }
}
