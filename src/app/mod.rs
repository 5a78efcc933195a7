mod browser;
mod detail;
mod format;
mod search;
mod selection;
mod tui;
mod watched;


use std::sync::Arc;

use anyhow::{Context, Result};

use crate::cancel::CancelDomain;
use crate::cli::{Cli, Command};
use crate::config::{Config, GatewayConfig};
use crate::db::Database;
use crate::omdb::{GatewayError, MovieGateway, OmdbGateway};
use crate::paths::database_file_path;

use self::browser::Browser;
use self::format::{format_rating, format_runtime, format_updated_at, truncate};
use self::watched::{WATCHED_KEY, WatchedStore, format_average};

pub fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(search = %config.api.search_base_url, "configuration loaded");

    match cli.command {
        Some(Command::Search { query }) => run_search(&config.api, &query)?,
        Some(Command::Show { id }) => run_show(&config.api, &id)?,
        Some(Command::Watched) => run_watched()?,
        Some(Command::Forget { id }) => run_forget(&id)?,
        Some(Command::Tui { query }) => run_browser(config, query)?,
        None => run_browser(config, None)?,
    }

    Ok(())
}

fn run_browser(config: Config, query: Option<String>) -> Result<()> {
    let store = open_store()?;
    let gateway: Arc<dyn MovieGateway> = Arc::new(OmdbGateway::new(config.api)?);
    let initial_query = query.unwrap_or(config.ui.initial_query);
    let mut browser = Browser::new(store);
    tui::run_tui(&mut browser, gateway, &initial_query)
}

fn run_search(api: &GatewayConfig, query: &str) -> Result<()> {
    let gateway = OmdbGateway::new(api.clone())?;
    let token = CancelDomain::new("cli-search").begin();
    let results = match gateway.search(query.trim(), &token) {
        Ok(results) => results,
        Err(err) => {
            println!("{}", one_shot_failure(&err, search::SEARCH_FAILED_MESSAGE));
            return Ok(());
        }
    };

    println!("Found {} results", results.len());
    println!("{:<12} {:<48} {:<10}", "IMDB ID", "TITLE", "YEAR");
    for item in results {
        println!(
            "{:<12} {:<48} {:<10}",
            item.id,
            truncate(&item.title, 48),
            item.year
        );
    }
    Ok(())
}

fn run_show(api: &GatewayConfig, id: &str) -> Result<()> {
    let gateway = OmdbGateway::new(api.clone())?;
    let token = CancelDomain::new("cli-detail").begin();
    let detail = match gateway.fetch_by_id(id.trim(), &token) {
        Ok(detail) => detail,
        Err(err) => {
            println!("{}", one_shot_failure(&err, detail::DETAIL_FAILED_MESSAGE));
            return Ok(());
        }
    };

    let store = open_store()?;
    println!("{} ({})", detail.title, detail.year);
    println!("{} • {} • {}", detail.released, detail.runtime, detail.genre);
    println!("IMDb rating: {}", format_rating(detail.imdb_rating));
    if let Some(entry) = store.get(&detail.id) {
        println!("You rated with movie {}", entry.user_rating);
    }
    println!();
    println!("{}", detail.plot);
    println!();
    println!("Starring {}", detail.actors);
    println!("Directed by {}", detail.director);
    println!("Poster: {}", detail.poster_url);
    Ok(())
}

fn run_watched() -> Result<()> {
    let store = open_store()?;
    if store.all().is_empty() {
        println!("No watched movies yet. Rate one in the browser and press a.");
        return Ok(());
    }

    let summary = store.summary();
    println!(
        "{} movies  IMDb avg {}  your avg {}  runtime avg {} min",
        summary.count,
        format_average(summary.avg_imdb_rating),
        format_average(summary.avg_user_rating),
        format_average(summary.avg_runtime),
    );
    if let Some(updated_at) = store.storage().updated_at(WATCHED_KEY)? {
        println!("Last changed {}", format_updated_at(&updated_at));
    }
    println!();
    println!(
        "{:<12} {:<40} {:<6} {:<6} {:<6} {:<8}",
        "IMDB ID", "TITLE", "YEAR", "IMDB", "YOU", "RUNTIME"
    );
    for entry in store.all() {
        println!(
            "{:<12} {:<40} {:<6} {:<6} {:<6} {:<8}",
            entry.id,
            truncate(&entry.title, 40),
            entry.year,
            format_rating(entry.imdb_rating),
            entry.user_rating,
            format_runtime(entry.runtime_minutes),
        );
    }
    Ok(())
}

fn run_forget(id: &str) -> Result<()> {
    let mut store = open_store()?;
    let title = store.get(id).map(|entry| entry.title.clone());
    if store.remove(id)? {
        println!(
            "Removed from watched list: {}",
            title.as_deref().unwrap_or(id)
        );
    } else {
        println!("No watched entry with id {id}.");
    }
    Ok(())
}

fn open_store() -> Result<WatchedStore<Database>> {
    let db_path = database_file_path()?;
    let db = Database::open(&db_path)?;
    db.migrate()?;
    Ok(WatchedStore::hydrate(db))
}

fn one_shot_failure(err: &GatewayError, fallback: &str) -> String {
    match err {
        GatewayError::NotFound(_) => search::NOT_FOUND_MESSAGE.to_string(),
        other => format!("{fallback}: {other}"),
    }
}
