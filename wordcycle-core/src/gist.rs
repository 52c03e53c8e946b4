//! GitHub Gist seen-set store
//!
//! The seen list lives in one file of a gist as a serialized JSON array of
//! terms. Each read is a `GET /gists/{id}`, each write a `PATCH` replacing
//! that file's content.
//!
//! There is no revision check between read and write: two concurrent
//! requests can read the same list and the later write wins.

use std::collections::HashMap;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::error::CycleError;
use crate::store::SeenStore;

pub const GITHUB_API_BASE: &str = "https://api.github.com";
pub const DEFAULT_GIST_FILENAME: &str = "seen_words.json";
const USER_AGENT: &str = concat!("wordcycle/", env!("CARGO_PKG_VERSION"));
const GITHUB_API_VERSION: &str = "2022-11-28";

#[derive(Debug, Clone)]
pub struct GistConfig {
    pub gist_id: String,
    pub token: String,
    /// Name of the file inside the gist holding the seen list.
    pub filename: String,
    pub api_base: String,
    pub timeout: Duration,
}

impl GistConfig {
    pub fn new(gist_id: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            gist_id: gist_id.into(),
            token: token.into(),
            filename: DEFAULT_GIST_FILENAME.to_string(),
            api_base: GITHUB_API_BASE.to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Deserialize)]
struct GistDocument {
    #[serde(default)]
    files: HashMap<String, Option<GistFile>>,
}

#[derive(Debug, Deserialize)]
struct GistFile {
    content: Option<String>,
}

pub struct GistSeenStore {
    http: Client,
    config: GistConfig,
}

impl GistSeenStore {
    pub fn new(config: GistConfig) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { http, config })
    }

    pub fn config(&self) -> &GistConfig {
        &self.config
    }

    fn gist_url(&self) -> String {
        format!(
            "{}/gists/{}",
            self.config.api_base.trim_end_matches('/'),
            self.config.gist_id
        )
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .bearer_auth(&self.config.token)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", GITHUB_API_VERSION)
    }

    async fn fetch_document(&self) -> Result<GistDocument, CycleError> {
        let response = self
            .authorized(self.http.get(self.gist_url()))
            .send()
            .await
            .map_err(|e| CycleError::RemoteStoreUnavailable(format!("fetch failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CycleError::RemoteStoreUnavailable(format!(
                "gist API error {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| CycleError::RemoteStoreUnavailable(format!("invalid gist document: {e}")))
    }
}

/// Parse the seen-list file content: a JSON array of strings.
fn parse_seen(content: &str) -> Result<Vec<String>, CycleError> {
    serde_json::from_str(content)
        .map_err(|e| CycleError::RemoteStoreUnavailable(format!("invalid seen list: {e}")))
}

#[async_trait]
impl SeenStore for GistSeenStore {
    async fn read_seen(&self) -> Result<Vec<String>, CycleError> {
        let document = self.fetch_document().await?;
        let content = document
            .files
            .get(&self.config.filename)
            .and_then(|file| file.as_ref())
            .and_then(|file| file.content.as_deref())
            .ok_or_else(|| {
                CycleError::RemoteStoreUnavailable(format!(
                    "gist has no file named {}",
                    self.config.filename
                ))
            })?;
        parse_seen(content)
    }

    async fn write_seen(&self, seen: &[String]) -> Result<(), CycleError> {
        let content = serde_json::to_string(seen)
            .map_err(|e| CycleError::RemoteStoreWriteFailure(e.to_string()))?;
        let body = serde_json::json!({
            "files": {
                self.config.filename.as_str(): { "content": content }
            }
        });

        let response = self
            .authorized(self.http.patch(self.gist_url()))
            .json(&body)
            .send()
            .await
            .map_err(|e| CycleError::RemoteStoreWriteFailure(format!("update failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CycleError::RemoteStoreWriteFailure(format!(
                "gist API error {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }
        Ok(())
    }
}
