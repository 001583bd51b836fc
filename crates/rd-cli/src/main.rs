//! Developer CLI for Redact narrative graphs.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "rd",
    about = "Redact: check, inspect and play narrative graphs",
    version,
    propagate_version = true
)]
struct Cli {
    /// Log session internals to stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a graph file and report issues
    Check {
        /// Graph JSON file
        #[arg(short, long)]
        graph: PathBuf,
    },

    /// List the nodes of a graph
    Show {
        /// Graph JSON file
        #[arg(short, long)]
        graph: PathBuf,
    },

    /// Play a graph interactively on stdin
    Play {
        /// Graph JSON file
        #[arg(short, long)]
        graph: PathBuf,

        /// Session config JSON file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn init_logging(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Check { graph } => commands::check::run(&graph),
        Commands::Show { graph } => commands::show::run(&graph),
        Commands::Play { graph, config } => commands::play::run(&graph, config.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
