//! CLI argument definitions for cursor-sync.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("CURSOR_SYNC_GIT_COMMIT"),
    ", built ",
    env!("CURSOR_SYNC_BUILD_TIMESTAMP"),
    ")"
);

/// cursor-sync - Sync Cursor editor settings through a secret GitHub gist.
///
/// Set GH_TOKEN (or put it in a .env file) to a token with the `gist` scope,
/// run `cursor-sync push` on one machine and `cursor-sync pull` on another.
#[derive(Parser, Debug)]
#[command(name = "cursor-sync")]
#[command(author, version, long_version = LONG_VERSION)]
#[command(about = "Sync Cursor editor settings through a GitHub Gist", long_about = None)]
pub struct Cli {
    /// Increase log verbosity on stderr (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Print the command outcome as JSON instead of human-readable text
    #[arg(long = "json", global = true)]
    pub json: bool,

    /// Path to config.kdl (defaults to the platform config directory)
    #[arg(long = "config", global = true, env = "CURSOR_SYNC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Use <dir>/User and <dir>/extensions instead of the Cursor install paths
    #[arg(long = "root", global = true, env = "CURSOR_SYNC_ROOT")]
    pub root: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Collect local settings and upload them to the sync gist
    Push,

    /// Download the sync gist and write its settings locally
    Pull,
}

impl Commands {
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Push => "push",
            Commands::Pull => "pull",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_push_with_globals() {
        let cli = Cli::try_parse_from(["cursor-sync", "-vv", "push", "--json", "--root", "/tmp/c"])
            .unwrap();
        assert_eq!(cli.command, Commands::Push);
        assert_eq!(cli.verbose, 2);
        assert!(cli.json);
        assert_eq!(cli.root, Some(PathBuf::from("/tmp/c")));
    }

    #[test]
    fn test_subcommand_is_required() {
        assert!(Cli::try_parse_from(["cursor-sync"]).is_err());
    }

    #[test]
    fn test_unknown_subcommand_rejected() {
        assert!(Cli::try_parse_from(["cursor-sync", "sync"]).is_err());
    }

    #[test]
    fn test_command_names() {
        assert_eq!(Commands::Push.name(), "push");
        assert_eq!(Commands::Pull.name(), "pull");
    }
}
