use anyhow::{Context, Result};
use std::io::{self, Write};

use kbank_core::Credentials;

use crate::config::Config;

fn prompt(label: &str) -> Result<String> {
    print!("{}: ", label);
    io::stdout().flush().ok();
    let mut s = String::new();
    io::stdin().read_line(&mut s)?;
    Ok(s.trim().to_string())
}

fn from_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// KBANK_USERNAME / KBANK_PASSWORD, then config.toml, then stdin.
pub fn resolve_credentials(cfg: &Config) -> Result<Credentials> {
    let username = match from_env("KBANK_USERNAME").or_else(|| cfg.credentials.username.clone()) {
        Some(u) => u,
        None => prompt("Username")?,
    };
    let password = match from_env("KBANK_PASSWORD").or_else(|| cfg.credentials.password.clone()) {
        Some(p) => p,
        None => prompt("Password")?,
    };

    Credentials::new(username, password).context("set KBANK_USERNAME/KBANK_PASSWORD or edit ~/.kbank/config.toml")
}
