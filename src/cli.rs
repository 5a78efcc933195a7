use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "popcorn",
    version,
    about = "Search movies on OMDb, rate them and keep a watched list"
)]
pub struct Cli {
    /// Read configuration from this file instead of the default location.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Open the interactive browser.
    Tui {
        /// Initial search query.
        query: Option<String>,
    },
    /// Search once and print the results.
    Search { query: String },
    /// Fetch and print the details of one movie.
    Show { id: String },
    /// Print the watched list with its summary.
    Watched,
    /// Remove a movie from the watched list.
    Forget { id: String },
}
