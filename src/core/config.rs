//! Configuration management with layered hierarchy

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::transport::HttpTransport;

/// Backend used when nothing else is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Name of the per-directory config file
pub const LOCAL_CONFIG_FILE: &str = ".fua.yaml";

/// fua configuration with layered hierarchy
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Backend root, e.g. `https://uploader.example.com`
    pub base_url: Option<String>,

    /// Bearer token sent with every request
    pub token: Option<String>,

    /// Per-request timeout in seconds
    pub timeout_secs: Option<u64>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        let local = std::env::current_dir()
            .ok()
            .map(|dir| dir.join(LOCAL_CONFIG_FILE));
        let mut config = Self::load_from(Self::global_config_path().as_deref(), local.as_deref());
        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    /// Merge the global and local files (either may be missing or unreadable)
    pub fn load_from(global: Option<&Path>, local: Option<&Path>) -> Self {
        let mut config = Config::default();

        // 1. Built-in defaults (already in Default impl)

        // 2. Global user config (~/.config/fua/config.yaml)
        if let Some(global) = global.and_then(Self::read_file) {
            config.merge(global);
        }

        // 3. Local config (./.fua.yaml)
        if let Some(local) = local.and_then(Self::read_file) {
            config.merge(local);
        }

        config
    }

    fn read_file(path: &Path) -> Option<Config> {
        let contents = std::fs::read_to_string(path).ok()?;
        serde_yml::from_str::<Config>(&contents).ok()
    }

    /// 4. Environment variables (lookup injected for testing)
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base_url) = lookup("FUA_BASE_URL") {
            self.base_url = Some(base_url);
        }
        if let Some(token) = lookup("FUA_TOKEN") {
            self.token = Some(token);
        }
    }

    /// Get the path to the global config file
    pub fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "fua")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    pub fn merge(&mut self, other: Config) {
        if other.base_url.is_some() {
            self.base_url = other.base_url;
        }
        if other.token.is_some() {
            self.token = other.token;
        }
        if other.timeout_secs.is_some() {
            self.timeout_secs = other.timeout_secs;
        }
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(30))
    }

    /// Token with everything but the last four characters hidden
    pub fn masked_token(&self) -> Option<String> {
        self.token.as_ref().map(|t| {
            let chars: Vec<char> = t.chars().collect();
            let visible = chars.len().min(4);
            let tail: String = chars[chars.len() - visible..].iter().collect();
            format!("{}{}", "*".repeat(chars.len() - visible), tail)
        })
    }

    /// Build the HTTP transport this configuration describes
    pub fn transport(&self, verbose: bool) -> HttpTransport {
        HttpTransport::new(self.base_url())
            .with_token(self.token.clone())
            .with_timeout(self.timeout())
            .with_verbose(verbose)
    }
}
