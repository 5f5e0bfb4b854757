//! Common paths for hubwatch data storage
//!
//! Everything lives under one directory, `~/.config/hubwatch/` unless the
//! `HUBWATCH_HOME` environment variable points somewhere else:
//! - config.toml - User configuration
//! - credentials.enc - Encrypted settings store (access token)

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// Environment variable that overrides the data directory
pub const HOME_ENV: &str = "HUBWATCH_HOME";

/// Get the hubwatch data directory, creating it if needed
pub fn hubwatch_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os(HOME_ENV) {
        Some(home) if !home.is_empty() => PathBuf::from(home),
        _ => {
            let home = dirs::home_dir().context("Could not determine home directory")?;
            home.join(".config").join("hubwatch")
        }
    };
    fs::create_dir_all(&dir).context("Failed to create hubwatch directory")?;
    Ok(dir)
}

/// Get the config file path (`<dir>/config.toml`)
pub fn config_path() -> Result<PathBuf> {
    Ok(hubwatch_dir()?.join("config.toml"))
}

/// Get the credentials file path (`<dir>/credentials.enc`)
pub fn credentials_path() -> Result<PathBuf> {
    Ok(hubwatch_dir()?.join("credentials.enc"))
}
