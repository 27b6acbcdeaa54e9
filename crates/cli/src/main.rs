mod commands;
mod config;
mod input;
mod render;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Review ERP price and stock edits before writing them back.
#[derive(Parser)]
#[command(
    name = "pricesync",
    version,
    about = "Review ERP price and stock edits before writing them back"
)]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    /// Path to the configuration file (default: ./pricesync.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show every row with derived pricing and validation status
    Rows {
        /// Path to the ERP snapshot JSON
        snapshot: PathBuf,
        /// Path to an edit set JSON keyed by item_id
        #[arg(long)]
        edits: Option<PathBuf>,
    },

    /// List the price and stock changes the edits would write back
    Diff {
        /// Path to the ERP snapshot JSON
        snapshot: PathBuf,
        /// Path to an edit set JSON keyed by item_id
        #[arg(long)]
        edits: Option<PathBuf>,
    },

    /// Report whether the edited catalog may be synced
    Check {
        /// Path to the ERP snapshot JSON
        snapshot: PathBuf,
        /// Path to an edit set JSON keyed by item_id
        #[arg(long)]
        edits: Option<PathBuf>,
    },

    /// Apply an action log to a snapshot and show the resulting state
    Replay {
        /// Path to the ERP snapshot JSON
        snapshot: PathBuf,
        /// Path to the action log JSON
        #[arg(long)]
        actions: PathBuf,
    },

    /// Prepare a sync payload and hand it to the outbox
    Push {
        /// Path to the ERP snapshot JSON
        snapshot: PathBuf,
        /// Path to an edit set JSON keyed by item_id
        #[arg(long)]
        edits: PathBuf,
        /// Free-text reason recorded with the payload
        #[arg(long)]
        reason: Option<String>,
        /// Outbox directory (overrides [sync].outbox)
        #[arg(long)]
        outbox: Option<PathBuf>,
        /// Refuse to write regardless of configuration
        #[arg(long)]
        read_only: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Rows { snapshot, edits } => {
            commands::cmd_rows(&snapshot, edits.as_deref(), cli.output, cli.quiet);
        }
        Commands::Diff { snapshot, edits } => {
            commands::cmd_diff(&snapshot, edits.as_deref(), cli.output, cli.quiet);
        }
        Commands::Check { snapshot, edits } => {
            commands::cmd_check(&snapshot, edits.as_deref(), cli.output, cli.quiet);
        }
        Commands::Replay { snapshot, actions } => {
            commands::cmd_replay(&snapshot, &actions, cli.output, cli.quiet);
        }
        Commands::Push {
            snapshot,
            edits,
            reason,
            outbox,
            read_only,
        } => {
            commands::cmd_push(commands::PushOptions {
                snapshot: &snapshot,
                edits: &edits,
                reason: reason.as_deref(),
                outbox: outbox.as_deref(),
                read_only,
                config: cli.config.as_deref(),
                output: cli.output,
                quiet: cli.quiet,
            });
        }
    }
}

/// Logs go to stderr so stdout stays machine-readable.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("{}", msg),
        OutputFormat::Json => {
            eprintln!("{}", serde_json::json!({ "error": msg }));
        }
    }
}
