//! CLI frontend for the Novella narrative engine.

mod commands;
mod play;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "nv",
    about = "Novella: branching visual-novel scripts, checked and played in the terminal",
    version,
    propagate_version = true
)]
struct Cli {
    /// Log engine activity to stderr (same as RUST_LOG=debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the demo chapter as a starter script
    Init {
        /// Path of the script to create
        #[arg(default_value = "script.json")]
        path: PathBuf,
    },

    /// Validate a script and report every problem found
    Check {
        /// Script file
        #[arg(short, long, default_value = "script.json")]
        script: PathBuf,
    },

    /// List the nodes of a script
    List {
        /// Only list endings
        #[arg(short, long)]
        endings: bool,

        /// Script file
        #[arg(short, long, default_value = "script.json")]
        script: PathBuf,
    },

    /// Show one node in detail
    Show {
        /// Node ID
        id: String,

        /// Script file
        #[arg(short, long, default_value = "script.json")]
        script: PathBuf,
    },

    /// Display the links between nodes as text
    Graph {
        /// Only show links into and out of this node
        #[arg(short, long)]
        focus: Option<String>,

        /// Script file
        #[arg(short, long, default_value = "script.json")]
        script: PathBuf,
    },

    /// Export the script to a different format
    Export {
        /// Output format: json, dot
        format: String,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Script file
        #[arg(short, long, default_value = "script.json")]
        script: PathBuf,
    },

    /// Play through a script without a terminal UI
    Run {
        /// Choices to make, in order (node IDs or 1-based choice numbers)
        #[arg(short, long = "choose", value_name = "CHOICE")]
        choices: Vec<String>,

        /// Print engine events as JSON lines
        #[arg(long)]
        json: bool,

        /// Stop after this many nodes
        #[arg(long, default_value = "100")]
        max_steps: u32,

        /// Script file
        #[arg(short, long, default_value = "script.json")]
        script: PathBuf,
    },

    /// Play a script in the terminal
    Play {
        /// Milliseconds between revealed characters
        #[arg(long, default_value = "30")]
        tick_ms: u64,

        /// Show each node's text at once
        #[arg(long)]
        instant: bool,

        /// Script file
        #[arg(short, long, default_value = "script.json")]
        script: PathBuf,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Init { path } => commands::init::run(&path),
        Commands::Check { script } => commands::check::run(&script),
        Commands::List { endings, script } => commands::list::run(&script, endings),
        Commands::Show { id, script } => commands::show::run(&script, &id),
        Commands::Graph { focus, script } => commands::graph::run(&script, focus.as_deref()),
        Commands::Export {
            format,
            output,
            script,
        } => commands::export::run(&script, &format, output.as_deref()),
        Commands::Run {
            choices,
            json,
            max_steps,
            script,
        } => commands::run::run(&script, &choices, json, max_steps),
        Commands::Play {
            tick_ms,
            instant,
            script,
        } => commands::play::run(&script, tick_ms, instant),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
