use std::{net::SocketAddr, time::Duration};

use anyhow::{bail, Context};
use ledgerfolio_core::constants::{DEFAULT_PORTFOLIO_ID, DEFAULT_USER_ID};

/// Backing store for the repositories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageMode {
    Sqlite,
    Memory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    pub storage: StorageMode,
    pub api_key: Option<String>,
    pub auth_enabled: bool,
    pub dev_mode: bool,
    pub portfolio_id: String,
    pub user_id: String,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub log_format: LogFormat,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let listen_addr: SocketAddr = var("LF_LISTEN_ADDR")
            .unwrap_or_else(|| "0.0.0.0:8080".to_string())
            .parse()
            .context("Invalid LF_LISTEN_ADDR")?;
        let db_path = var("LF_DB_PATH").unwrap_or_else(|| "./db/ledger.db".into());

        let storage = match var("LF_STORAGE").as_deref().map(str::to_lowercase).as_deref() {
            None | Some("sqlite") => StorageMode::Sqlite,
            Some("memory") => StorageMode::Memory,
            Some(other) => bail!("Invalid LF_STORAGE '{}': expected sqlite or memory", other),
        };

        let log_format = match var("LF_LOG_FORMAT").as_deref().map(str::to_lowercase).as_deref() {
            None | Some("text") => LogFormat::Text,
            Some("json") => LogFormat::Json,
            Some(other) => bail!("Invalid LF_LOG_FORMAT '{}': expected text or json", other),
        };

        let auth_enabled = parse_flag(var("LF_AUTH_ENABLED"), true, "LF_AUTH_ENABLED")?;
        let dev_mode = parse_flag(var("LF_DEV_MODE"), false, "LF_DEV_MODE")?;
        let api_key = var("LF_API_KEY");
        if auth_enabled && !dev_mode && api_key.is_none() {
            bail!("LF_API_KEY must be set when authentication is enabled");
        }

        let cors_allow = var("LF_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = var("LF_REQUEST_TIMEOUT_MS")
            .unwrap_or_else(|| "30000".into())
            .parse()
            .unwrap_or(30000);

        Ok(Self {
            listen_addr,
            db_path,
            storage,
            api_key,
            auth_enabled,
            dev_mode,
            portfolio_id: var("LF_PORTFOLIO_ID").unwrap_or_else(|| DEFAULT_PORTFOLIO_ID.into()),
            user_id: var("LF_USER_ID").unwrap_or_else(|| DEFAULT_USER_ID.into()),
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            log_format,
        })
    }

    /// Whether requests to protected routes must carry the API key.
    pub fn auth_required(&self) -> bool {
        self.auth_enabled && !self.dev_mode
    }
}

fn parse_flag(value: Option<String>, default: bool, name: &str) -> anyhow::Result<bool> {
    match value.as_deref().map(str::to_lowercase).as_deref() {
        None => Ok(default),
        Some("1" | "true" | "yes" | "on") => Ok(true),
        Some("0" | "false" | "no" | "off") => Ok(false),
        Some(other) => bail!("Invalid {} '{}': expected true or false", name, other),
    }
}
