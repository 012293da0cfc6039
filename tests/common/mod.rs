//! Common test utilities for cursor-sync integration tests.
//!
//! Provides `TestEnv` for isolated test environments that never touch the
//! user's real Cursor installation, config directory or GitHub account.

#![allow(dead_code)]

use assert_cmd::Command;
use std::path::{Path, PathBuf};
pub use tempfile::TempDir;

/// Address nothing listens on, so every API call fails fast.
pub const UNREACHABLE_API: &str = "http://127.0.0.1:9";

/// A test environment with isolated directories.
///
/// - `home_dir`: stands in for `$HOME` and the XDG config/data dirs
/// - `editor_dir`: the Cursor root passed via `CURSOR_SYNC_ROOT`
/// - `work_dir`: the working directory, where a `.env` may be placed
pub struct TestEnv {
    pub home_dir: TempDir,
    pub editor_dir: TempDir,
    pub work_dir: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            home_dir: TempDir::new().unwrap(),
            editor_dir: TempDir::new().unwrap(),
            work_dir: TempDir::new().unwrap(),
        }
    }

    /// Get a Command for the cursor-sync binary with no token configured.
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_cursor-sync"));
        cmd.current_dir(self.work_dir.path());
        cmd.env("HOME", self.home_dir.path());
        cmd.env("XDG_CONFIG_HOME", self.home_dir.path().join(".config"));
        cmd.env("XDG_DATA_HOME", self.home_dir.path().join(".local/share"));
        cmd.env("CURSOR_SYNC_CONFIG", self.config_path());
        cmd.env("CURSOR_SYNC_ROOT", self.editor_dir.path());
        cmd.env_remove("GH_TOKEN");
        cmd.env_remove("CURSOR_SYNC_API_URL");
        cmd.env_remove("RUST_LOG");
        cmd
    }

    /// Like [`cmd`](Self::cmd), with a token and an API URL that refuses connections.
    pub fn cmd_offline(&self) -> Command {
        let mut cmd = self.cmd();
        cmd.env("GH_TOKEN", "ghp_test_token_not_real");
        cmd.env("CURSOR_SYNC_API_URL", UNREACHABLE_API);
        cmd
    }

    pub fn config_path(&self) -> PathBuf {
        self.home_dir.path().join("config.kdl")
    }

    pub fn write_config(&self, content: &str) {
        std::fs::write(self.config_path(), content).unwrap();
    }

    pub fn write_dotenv(&self, content: &str) {
        std::fs::write(self.work_dir.path().join(".env"), content).unwrap();
    }

    pub fn editor_path(&self) -> &Path {
        self.editor_dir.path()
    }

    /// Directory the file log sink writes to by default.
    pub fn log_dir(&self) -> PathBuf {
        self.home_dir.path().join(".local/share/cursor-sync")
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}
