//! Configuration for cursor-sync.
//!
//! ## config.kdl - User preferences
//!
//! Located at `~/.config/cursor-sync/config.kdl` (platform config dir), or
//! wherever `--config` / `CURSOR_SYNC_CONFIG` points. The file is optional.
//! See [`schema`] for the format.
//!
//! ## Environment
//!
//! - `GH_TOKEN` - GitHub token with the `gist` scope (required for push/pull)
//! - `CURSOR_SYNC_API_URL` - override the GitHub API base URL
//!
//! A `.env` file in the working directory is loaded before the environment
//! is read. Variables already set in the environment win.
//!
//! Use the [`resolver`] module for precedence resolution.

pub mod resolver;
pub mod schema;

pub use resolver::{Resolved, ResolvedSettings, ValueSource, resolve_settings};
pub use schema::SyncConfig;

use crate::{APP_NAME, Error, Result};
use kdl::KdlDocument;
use std::path::{Path, PathBuf};

/// Environment variable holding the GitHub token.
pub const GITHUB_TOKEN_ENV: &str = "GH_TOKEN";

/// Environment variable overriding the API base URL.
pub const API_URL_ENV: &str = "CURSOR_SYNC_API_URL";

/// Environment variable pointing at an alternate config.kdl.
pub const CONFIG_PATH_ENV: &str = "CURSOR_SYNC_CONFIG";

/// Environment variable pointing at an alternate editor root.
pub const ROOT_ENV: &str = "CURSOR_SYNC_ROOT";

pub const DEFAULT_GIST_DESCRIPTION: &str = "Cursor Editor Settings Sync";
pub const DEFAULT_GIST_FILENAME: &str = "cursor-settings.json";
pub const DEFAULT_API_URL: &str = "https://api.github.com";

const CONFIG_FILE_NAME: &str = "config.kdl";

/// Default config.kdl location, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_NAME).join(CONFIG_FILE_NAME))
}

/// Default directory for log files.
pub fn default_log_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join(APP_NAME))
}

/// Load config.kdl from `path`.
///
/// Returns defaults if the file doesn't exist.
pub fn load_config_file(path: &Path) -> Result<SyncConfig> {
    if !path.exists() {
        return Ok(SyncConfig::new());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;

    let doc: KdlDocument = content
        .parse()
        .map_err(|e| Error::Config(format!("Failed to parse KDL in {}: {}", path.display(), e)))?;

    let config = SyncConfig::from_kdl(&doc);
    config
        .validate()
        .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
    Ok(config)
}

/// Load `.env` from the working directory into the process environment.
///
/// Returns the path of the loaded file, if there was one.
pub fn load_dotenv() -> Option<PathBuf> {
    dotenvy::dotenv().ok()
}

/// Load the config file and resolve every value against the real environment.
pub fn resolve(config_path: Option<&Path>) -> Result<ResolvedSettings> {
    let file = match config_path.map(Path::to_path_buf).or_else(default_config_path) {
        Some(path) => load_config_file(&path)?,
        None => SyncConfig::new(),
    };
    Ok(resolve_settings(&file, |name| std::env::var(name).ok()))
}
