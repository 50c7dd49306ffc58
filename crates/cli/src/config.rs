// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Client configuration management.
//!
//! Configuration is stored in `<data_dir>/config.toml` and includes:
//! - `[remote]`: the document server URL and its timeouts
//! - `[connectivity]`: how the reachability probe runs
//!
//! A missing file means defaults. The data directory also holds the local
//! database and the log file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};
use crate::sync::RemoteConfig;

const CONFIG_FILE_NAME: &str = "config.toml";
const DB_FILE_NAME: &str = "liftlog.db";
const LOG_FILE_NAME: &str = "liftlog.log";
const APP_DIR_NAME: &str = "liftlog";

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "LIFTLOG_DATA_DIR";

/// Client configuration stored in `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub remote: RemoteSection,
    #[serde(default)]
    pub connectivity: ConnectivitySection,
}

/// Remote document server settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteSection {
    /// WebSocket URL, `ws://` or `wss://`.
    #[serde(default = "default_url")]
    pub url: String,
    /// Max time to wait for a connection in seconds (default: 5).
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Max time to wait for one reply in seconds (default: 10).
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for RemoteSection {
    fn default() -> Self {
        RemoteSection {
            url: default_url(),
            connect_timeout_secs: default_connect_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// Reachability probe settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectivitySection {
    /// `host:port` to probe. Defaults to the remote URL's host and port.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probe_addr: Option<String>,
    #[serde(default = "default_probe_interval_ms")]
    pub probe_interval_ms: u64,
    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,
}

impl Default for ConnectivitySection {
    fn default() -> Self {
        ConnectivitySection {
            probe_addr: None,
            probe_interval_ms: default_probe_interval_ms(),
            probe_timeout_ms: default_probe_timeout_ms(),
        }
    }
}

fn default_url() -> String {
    "ws://localhost:7890".to_string()
}

fn default_connect_timeout_secs() -> u64 {
    5
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_probe_interval_ms() -> u64 {
    5_000
}

fn default_probe_timeout_ms() -> u64 {
    2_000
}

impl RemoteSection {
    /// Validates that the URL is a WebSocket URL with a host.
    ///
    /// Returns an error message if the URL is invalid.
    pub fn validate_url(&self) -> Option<String> {
        match split_ws_url(&self.url) {
            Some((_, authority)) if !authority.is_empty() => None,
            Some(_) => Some(format!("invalid remote URL '{}': missing host", self.url)),
            None => Some(format!(
                "invalid remote URL '{}': must be ws:// or wss://",
                self.url
            )),
        }
    }

    /// `host:port` of the server, with the scheme's default port filled in.
    pub fn host_port(&self) -> Option<String> {
        let (secure, authority) = split_ws_url(&self.url)?;
        if authority.is_empty() {
            return None;
        }
        let has_port = authority
            .rfind(':')
            .is_some_and(|i| !authority[i..].contains(']'));
        Some(if has_port {
            authority.to_string()
        } else {
            format!("{authority}:{}", if secure { 443 } else { 80 })
        })
    }

    /// Settings for the WebSocket remote client.
    pub fn client_config(&self) -> RemoteConfig {
        RemoteConfig {
            url: self.url.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }
}

/// Splits a WebSocket URL into (is_secure, authority).
fn split_ws_url(url: &str) -> Option<(bool, &str)> {
    let (secure, rest) = if let Some(rest) = url.strip_prefix("wss://") {
        (true, rest)
    } else {
        (false, url.strip_prefix("ws://")?)
    };
    let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
    let authority = authority.rsplit('@').next().unwrap_or_default();
    Some((secure, authority))
}

impl Config {
    /// Loads configuration from `data_dir`; a missing file yields defaults.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let config_path = data_dir.join(CONFIG_FILE_NAME);
        if !config_path.exists() {
            return Ok(Config::default());
        }
        let content = fs::read_to_string(&config_path)
            .map_err(|e| Error::Config(format!("failed to read config: {}", e)))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;
        if let Some(msg) = config.remote.validate_url() {
            return Err(Error::Config(msg));
        }
        Ok(config)
    }

    /// Saves configuration to `data_dir`.
    pub fn save(&self, data_dir: &Path) -> Result<()> {
        let config_path = data_dir.join(CONFIG_FILE_NAME);
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("failed to serialize config: {}", e)))?;
        fs::write(&config_path, content)?;
        Ok(())
    }

    /// Address the connectivity probe targets.
    pub fn probe_addr(&self) -> Result<String> {
        match &self.connectivity.probe_addr {
            Some(addr) => Ok(addr.clone()),
            None => self.remote.host_port().ok_or_else(|| {
                Error::Config(format!("cannot derive probe address from '{}'", self.remote.url))
            }),
        }
    }

    pub fn probe_interval(&self) -> Duration {
        Duration::from_millis(self.connectivity.probe_interval_ms)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.connectivity.probe_timeout_ms)
    }
}

/// Resolves the data directory: explicit flag, then `LIFTLOG_DATA_DIR`, then
/// the platform data directory.
pub fn resolve_data_dir(flag: Option<&Path>) -> Result<PathBuf> {
    if let Some(dir) = flag {
        return Ok(dir.to_path_buf());
    }
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    dirs::data_dir()
        .map(|d| d.join(APP_DIR_NAME))
        .ok_or_else(|| {
            Error::Config(format!(
                "no data directory found\n  hint: pass --data-dir or set {DATA_DIR_ENV}"
            ))
        })
}

/// Writes a fresh config into `data_dir`, creating the directory.
pub fn init_data_dir(data_dir: &Path, remote_url: Option<String>) -> Result<Config> {
    let config_path = data_dir.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        return Err(Error::AlreadyInitialized(data_dir.display().to_string()));
    }

    let mut config = Config::default();
    if let Some(url) = remote_url {
        config.remote.url = url;
    }
    if let Some(msg) = config.remote.validate_url() {
        return Err(Error::Config(msg));
    }

    fs::create_dir_all(data_dir)?;
    config.save(data_dir)?;
    Ok(config)
}

/// Path of the local database.
pub fn db_path(data_dir: &Path) -> PathBuf {
    data_dir.join(DB_FILE_NAME)
}

/// Path of the log file.
pub fn log_path(data_dir: &Path) -> PathBuf {
    data_dir.join(LOG_FILE_NAME)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
