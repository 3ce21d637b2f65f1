mod app;
mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "studyflow-cli", about = "Study session analytics and review planning", version)]
struct Cli {
    /// Directory holding stored sessions and the cache archive
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Engine config file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// List stored sessions, most recent first
    Sessions,

    /// Show performance metrics for a session
    Analyze {
        /// Session ID, "latest", or path to a session JSON file
        session: String,
    },

    /// Show the review schedule for a session
    Schedule {
        /// Session ID, "latest", or path to a session JSON file
        session: String,
        /// Only show reviews that are due now
        #[arg(long)]
        due: bool,
    },

    /// List archived cache entries
    Archive,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let use_color = !cli.no_color && atty_check();
    let app = app::App::new(cli.data_dir, cli.config.as_deref())?;

    match cli.command {
        Command::Sessions => {
            commands::sessions::run(&app, &cli.format, use_color)?;
        }
        Command::Analyze { session } => {
            commands::analyze::run(&app, &session, &cli.format, use_color)?;
        }
        Command::Schedule { session, due } => {
            commands::schedule::run(&app, &session, due, &cli.format, use_color)?;
        }
        Command::Archive => {
            commands::archive::run(&app, &cli.format)?;
        }
    }

    Ok(())
}

/// Check if stdout is a terminal (for color support)
fn atty_check() -> bool {
    unsafe { libc_isatty(1) != 0 }
}

extern "C" {
    #[link_name = "isatty"]
    fn libc_isatty(fd: i32) -> i32;
}
