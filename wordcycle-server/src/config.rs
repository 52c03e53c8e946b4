//! Server configuration from environment variables.
//!
//!   PORT              — listen port (default: 3000)
//!   BIND_HOST         — listen host (default: 0.0.0.0)
//!   VOCAB_PATH        — dataset file (default: words_output.json)
//!   RELOAD_ON_CYCLE   — re-read the dataset at every cycle reset (default: false)
//!   GIST_ID           — remote seen-set gist; together with GITHUB_TOKEN
//!                       selects the remote backend
//!   GITHUB_TOKEN      — bearer token for the gist API
//!   GIST_FILENAME     — file inside the gist (default: seen_words.json)
//!   GITHUB_API_BASE   — API root (default: https://api.github.com)
//!   GIST_TIMEOUT_SECS — HTTP client timeout (default: 30)

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use wordcycle_core::GistConfig;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_VOCAB_PATH: &str = "words_output.json";

#[derive(Debug, Clone)]
pub enum Backend {
    /// In-process shuffled stack.
    Memory,
    /// Seen list persisted in a GitHub gist.
    Gist(GistConfig),
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_host: String,
    pub port: u16,
    pub vocab_path: PathBuf,
    pub reload_on_cycle: bool,
    pub backend: Backend,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match get("PORT") {
            Some(raw) => raw.trim().parse::<u16>().unwrap_or_else(|_| {
                tracing::warn!("Invalid PORT {:?}, using {}", raw, DEFAULT_PORT);
                DEFAULT_PORT
            }),
            None => DEFAULT_PORT,
        };

        let reload_on_cycle = match get("RELOAD_ON_CYCLE") {
            Some(raw) => parse_flag(&raw).with_context(|| format!("RELOAD_ON_CYCLE={raw}"))?,
            None => false,
        };

        let backend = match (get("GIST_ID"), get("GITHUB_TOKEN")) {
            (Some(gist_id), Some(token)) => {
                let mut gist = GistConfig::new(gist_id, token);
                if let Some(filename) = get("GIST_FILENAME") {
                    gist = gist.with_filename(filename);
                }
                if let Some(api_base) = get("GITHUB_API_BASE") {
                    gist = gist.with_api_base(api_base);
                }
                if let Some(raw) = get("GIST_TIMEOUT_SECS") {
                    let secs: u64 = raw.trim().parse().with_context(|| {
                        format!("GIST_TIMEOUT_SECS must be an integer, got {raw:?}")
                    })?;
                    gist = gist.with_timeout(Duration::from_secs(secs));
                }
                Backend::Gist(gist)
            }
            (None, None) => Backend::Memory,
            (Some(_), None) => bail!("GIST_ID is set but GITHUB_TOKEN is missing"),
            (None, Some(_)) => bail!("GITHUB_TOKEN is set but GIST_ID is missing"),
        };

        Ok(Self {
            bind_host: get("BIND_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            vocab_path: get("VOCAB_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_VOCAB_PATH)),
            reload_on_cycle,
            backend,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_host, self.port)
    }
}

fn parse_flag(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("expected a boolean, got {other:?}"),
    }
}
