use std::path::PathBuf;

use anyhow::{Context, Result};

const APP_DIR: &str = "popcorn";

pub fn database_file_path() -> Result<PathBuf> {
    let base = dirs::data_dir().context("unable to resolve data directory")?;
    Ok(base.join(APP_DIR).join("popcorn.db"))
}

pub fn log_dir_path() -> Result<PathBuf> {
    let base = dirs::data_dir().context("unable to resolve data directory")?;
    Ok(base.join(APP_DIR).join("logs"))
}

pub fn config_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|base| base.join(APP_DIR).join("config.toml"))
}
