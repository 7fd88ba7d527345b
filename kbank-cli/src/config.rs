use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use kbank_portal::Endpoints;
use kbank_portal::endpoints::{EBANK_URL, ONLINE_URL};

use crate::state::{default_cookie_path, ensure_kbank_home, expand_home};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub portal: PortalSection,
    #[serde(default)]
    pub credentials: CredentialsSection,
    #[serde(default)]
    pub session: SessionSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalSection {
    pub online_url: String,
    pub ebank_url: String,
}

impl Default for PortalSection {
    fn default() -> Self {
        Self {
            online_url: ONLINE_URL.to_string(),
            ebank_url: EBANK_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CredentialsSection {
    pub username: Option<String>,
    /// Plain-text password. Prefer KBANK_PASSWORD.
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSection {
    /// Keep cookies between runs so one login serves many commands.
    pub persist: bool,
    /// Defaults to ~/.kbank/cookies.json
    pub cookie_file: Option<String>,
}

impl Default for SessionSection {
    fn default() -> Self {
        Self {
            persist: true,
            cookie_file: None,
        }
    }
}

impl Config {
    pub fn endpoints(&self) -> Endpoints {
        Endpoints::new(&self.portal.online_url, &self.portal.ebank_url)
    }

    pub fn cookie_path(&self) -> Result<Option<PathBuf>> {
        self.cookie_path_or(default_cookie_path)
    }

    /// `None` means an in-memory jar. `default` is only consulted when
    /// persisting without an explicit `cookie_file`.
    fn cookie_path_or(&self, default: impl FnOnce() -> Result<PathBuf>) -> Result<Option<PathBuf>> {
        if !self.session.persist {
            return Ok(None);
        }
        match &self.session.cookie_file {
            Some(p) => Ok(Some(expand_home(p)?)),
            None => Ok(Some(default()?)),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_kbank_home()?.join("config.toml"))
}

pub fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", path.display()))
}

pub fn load_config() -> Result<Config> {
    load_config_from(&config_path()?)
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = config_path()?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config(username: Option<String>) -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    let mut cfg = Config::default();
    cfg.credentials.username = username;
    save_config(&cfg)?;
    println!("Wrote {}", p.display());
    Ok(())
}
