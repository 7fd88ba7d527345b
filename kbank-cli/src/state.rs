use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

pub fn home_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home))
}

pub fn kbank_home() -> Result<PathBuf> {
    Ok(home_dir()?.join(".kbank"))
}

pub fn ensure_kbank_home() -> Result<PathBuf> {
    let dir = kbank_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

pub fn default_cookie_path() -> Result<PathBuf> {
    Ok(ensure_kbank_home()?.join("cookies.json"))
}

/// Expand a leading `~/` against `$HOME`.
pub fn expand_home(path: &str) -> Result<PathBuf> {
    match path.strip_prefix("~/") {
        Some(rest) => Ok(home_dir()?.join(rest)),
        None => Ok(PathBuf::from(path)),
    }
}
