mod app;
mod cancel;
mod cli;
mod config;
mod db;
mod http;
mod logging;
mod models;
mod omdb;
mod paths;
#[cfg(test)]
mod test_support;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    let _log_guard = logging::init_logging(cli.verbose)?;
    app::run(cli)
}
