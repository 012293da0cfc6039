//! KDL schema for config.kdl.
//!
//! ```kdl
//! // All entries are optional
//! gist-description "Cursor Editor Settings Sync"
//! gist-filename "cursor-settings.json"
//! api-url "https://api.github.com"
//! log-dir "/home/me/.local/share/cursor-sync"
//! ```
//!
//! Unknown nodes are ignored so newer files still load.

use kdl::{KdlDocument, KdlNode};
use std::path::PathBuf;

/// User preferences stored in config.kdl.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncConfig {
    /// Description that identifies the sync gist
    pub gist_description: Option<String>,

    /// Name of the snapshot file inside the gist
    pub gist_filename: Option<String>,

    /// GitHub API base URL (for GitHub Enterprise)
    pub api_url: Option<String>,

    /// Directory for rotated log files
    pub log_dir: Option<PathBuf>,
}

impl SyncConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the config values.
    ///
    /// Returns an error message if any value is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(ref description) = self.gist_description {
            if description.trim().is_empty() {
                return Err("gist-description must not be empty".to_string());
            }
        }
        if let Some(ref filename) = self.gist_filename {
            if filename.trim().is_empty() || filename.contains('/') {
                return Err(format!("gist-filename must be a plain file name, got {:?}", filename));
            }
        }
        if let Some(ref url) = self.api_url {
            if !(url.starts_with("https://") || url.starts_with("http://")) {
                return Err(format!("api-url must be an http(s) URL, got {:?}", url));
            }
        }
        Ok(())
    }

    /// Parse config from a KDL document.
    pub fn from_kdl(doc: &KdlDocument) -> Self {
        Self {
            gist_description: get_string_arg(doc.get("gist-description")),
            gist_filename: get_string_arg(doc.get("gist-filename")),
            api_url: get_string_arg(doc.get("api-url")),
            log_dir: get_string_arg(doc.get("log-dir")).map(PathBuf::from),
        }
    }
}

/// Get a string argument from a node's first entry.
fn get_string_arg(node: Option<&KdlNode>) -> Option<String> {
    node?
        .entries()
        .first()
        .and_then(|e| e.value().as_string())
        .map(|s| s.to_string())
}
