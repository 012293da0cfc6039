//! Precedence resolution for configuration values and the GitHub token.
//!
//! ## Precedence (highest to lowest)
//!
//! 1. Environment variables (`GH_TOKEN`, `CURSOR_SYNC_API_URL`)
//! 2. config.kdl
//! 3. Built-in defaults
//!
//! The token is only ever read from the environment (a `.env` file in the
//! working directory is loaded into the environment first).

use super::schema::SyncConfig;
use super::{
    API_URL_ENV, DEFAULT_API_URL, DEFAULT_GIST_DESCRIPTION, DEFAULT_GIST_FILENAME, GITHUB_TOKEN_ENV,
};
use std::path::PathBuf;

/// Tracks where a resolved value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueSource {
    /// Value from environment variable
    EnvVar(String),
    /// Value from config.kdl
    ConfigFile,
    /// Built-in default value
    Default,
}

impl std::fmt::Display for ValueSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueSource::EnvVar(name) => write!(f, "env:{}", name),
            ValueSource::ConfigFile => write!(f, "config"),
            ValueSource::Default => write!(f, "default"),
        }
    }
}

/// A resolved value with its source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved<T> {
    pub value: T,
    pub source: ValueSource,
}

impl<T> Resolved<T> {
    pub fn new(value: T, source: ValueSource) -> Self {
        Self { value, source }
    }
}

/// Fully resolved settings with source tracking.
#[derive(Debug, Clone)]
pub struct ResolvedSettings {
    /// Label that identifies the sync gist
    pub gist_description: Resolved<String>,
    /// Snapshot file name inside the gist
    pub gist_filename: Resolved<String>,
    /// GitHub API base URL
    pub api_url: Resolved<String>,
    /// Log directory, if one could be determined
    pub log_dir: Option<Resolved<PathBuf>>,
    /// GitHub token for API access
    pub github_token: Option<Resolved<String>>,
}

impl ResolvedSettings {
    /// Get the token value, if set.
    pub fn token(&self) -> Option<&str> {
        self.github_token.as_ref().map(|r| r.value.as_str())
    }

    /// Get the masked token for display purposes.
    pub fn masked_token(&self) -> Option<String> {
        self.github_token.as_ref().map(|r| {
            let token = &r.value;
            if token.len() <= 12 {
                format!("{}...", token.get(..4.min(token.len())).unwrap_or(""))
            } else {
                format!(
                    "{}...{}",
                    token.get(..4).unwrap_or(""),
                    token.get(token.len() - 4..).unwrap_or("")
                )
            }
        })
    }
}

/// Resolve settings from a loaded config file and an environment lookup.
///
/// `env` is injected so tests don't have to touch the process environment.
pub fn resolve_settings<F>(file: &SyncConfig, env: F) -> ResolvedSettings
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |name: &str| env(name).filter(|v| !v.trim().is_empty());

    let from_file_or_default = |value: &Option<String>, default: &str| match value {
        Some(v) => Resolved::new(v.clone(), ValueSource::ConfigFile),
        None => Resolved::new(default.to_string(), ValueSource::Default),
    };

    let api_url = match non_empty(API_URL_ENV) {
        Some(url) => Resolved::new(url, ValueSource::EnvVar(API_URL_ENV.to_string())),
        None => from_file_or_default(&file.api_url, DEFAULT_API_URL),
    };

    let log_dir = match &file.log_dir {
        Some(dir) => Some(Resolved::new(dir.clone(), ValueSource::ConfigFile)),
        None => super::default_log_dir().map(|dir| Resolved::new(dir, ValueSource::Default)),
    };

    let github_token = non_empty(GITHUB_TOKEN_ENV).map(|token| {
        Resolved::new(token, ValueSource::EnvVar(GITHUB_TOKEN_ENV.to_string()))
    });

    ResolvedSettings {
        gist_description: from_file_or_default(&file.gist_description, DEFAULT_GIST_DESCRIPTION),
        gist_filename: from_file_or_default(&file.gist_filename, DEFAULT_GIST_FILENAME),
        api_url,
        log_dir,
        github_token,
    }
}
