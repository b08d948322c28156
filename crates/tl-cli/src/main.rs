//! CLI frontend for the Threadline narrative engine.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "tl",
    about = "Threadline: play branching dialogue and manage its saves",
    version,
    propagate_version = true
)]
struct Cli {
    /// Log debug output to stderr (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load or start a game and play it on the terminal
    Play {
        /// Content file describing the dialogue graphs
        #[arg(short, long, default_value = "content.json")]
        content: PathBuf,

        /// Directory holding save files
        #[arg(short, long, default_value = "saves")]
        save_dir: PathBuf,

        /// Player id for a new game (default: a fresh UUID)
        #[arg(short, long)]
        player: Option<String>,
    },

    /// Show the state of the primary and backup saves
    Status {
        /// Content file describing the dialogue graphs
        #[arg(short, long, default_value = "content.json")]
        content: PathBuf,

        /// Directory holding save files
        #[arg(short, long, default_value = "saves")]
        save_dir: PathBuf,
    },

    /// Print the current save as JSON
    Export {
        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Content file describing the dialogue graphs
        #[arg(short, long, default_value = "content.json")]
        content: PathBuf,

        /// Directory holding save files
        #[arg(short, long, default_value = "saves")]
        save_dir: PathBuf,
    },

    /// Validate a save file and make it the current save
    Import {
        /// Save JSON to import
        file: PathBuf,

        /// Content file describing the dialogue graphs
        #[arg(short, long, default_value = "content.json")]
        content: PathBuf,

        /// Directory holding save files
        #[arg(short, long, default_value = "saves")]
        save_dir: PathBuf,
    },

    /// Show where a node id ends up after following redirects
    Resolve {
        /// Node id to resolve
        node_id: String,

        /// Content file describing the dialogue graphs
        #[arg(short, long, default_value = "content.json")]
        content: PathBuf,

        /// Maximum redirects to follow
        #[arg(long, default_value_t = tl_core::DEFAULT_MAX_HOPS)]
        max_hops: usize,
    },

    /// Delete the primary and backup saves
    Reset {
        /// Content file describing the dialogue graphs
        #[arg(short, long, default_value = "content.json")]
        content: PathBuf,

        /// Directory holding save files
        #[arg(short, long, default_value = "saves")]
        save_dir: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Play {
            content,
            save_dir,
            player,
        } => commands::play::run(&content, &save_dir, player.as_deref()),
        Commands::Status { content, save_dir } => commands::status::run(&content, &save_dir),
        Commands::Export {
            output,
            content,
            save_dir,
        } => commands::export::run(&content, &save_dir, output.as_deref()),
        Commands::Import {
            file,
            content,
            save_dir,
        } => commands::import::run(&file, &content, &save_dir),
        Commands::Resolve {
            node_id,
            content,
            max_hops,
        } => commands::resolve::run(&content, &node_id, max_hops),
        Commands::Reset { content, save_dir } => commands::reset::run(&content, &save_dir),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_level = "warn";
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(default_level))
            .unwrap_or_else(|_| EnvFilter::new(default_level))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
