mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{config::ConfigSubcommand, lead::LeadSubcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "leadflow",
    about = "Lead pipeline CRM — capture leads, work the kanban board, keep stale deals visible",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from .leadflow/ or .git/)
    #[arg(long, global = true, env = "LEADFLOW_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize leadflow in the current project
    Init,

    /// Show pipeline summary and recent activity
    State,

    /// Show the kanban board (all columns, or one stage)
    Board {
        /// Stage slug (omit for the full board)
        stage: Option<String>,
    },

    /// Manage leads
    Lead {
        #[command(subcommand)]
        subcommand: LeadSubcommand,
    },

    /// Inspect and validate the project configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },

    /// Launch the dashboard API server
    Ui {
        /// Port to listen on (0 = OS-assigned)
        #[arg(long, default_value = "0")]
        port: u16,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Ui { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .init();

    let root_path = cli.root.as_deref();
    let root = root::resolve_root(root_path);

    let result = match cli.command {
        Commands::Init => cmd::init::run(&root),
        Commands::State => cmd::state::run(&root, cli.json),
        Commands::Board { stage } => cmd::board::run(&root, stage.as_deref(), cli.json),
        Commands::Lead { subcommand } => cmd::lead::run(&root, subcommand, cli.json),
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, cli.json),
        Commands::Ui { port } => cmd::ui::run(&root, port),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
