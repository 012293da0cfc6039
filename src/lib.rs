//! cursor-sync - Sync Cursor editor configuration across machines.
//!
//! This library provides the core functionality for the `cursor-sync` CLI:
//! collecting the local editor configuration into a [`snapshot::Snapshot`],
//! storing it in a secret GitHub gist, and applying a pulled snapshot back
//! onto the local machine.

pub mod applier;
pub mod cli;
pub mod collector;
pub mod commands;
pub mod config;
pub mod gist;
pub mod jsonc;
pub mod logging;
pub mod paths;
pub mod reporter;
pub mod snapshot;

/// Application name, used for config and log directories.
pub const APP_NAME: &str = "cursor-sync";

/// Library-level error type for cursor-sync operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Transport(#[from] gist::TransportError),

    #[error(
        "{} environment variable not found. Please set {} in your .env file.",
        config::GITHUB_TOKEN_ENV,
        config::GITHUB_TOKEN_ENV
    )]
    MissingToken,
}

/// Result type alias for cursor-sync operations.
pub type Result<T> = std::result::Result<T, Error>;
