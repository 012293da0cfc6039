//! cursor-sync CLI - Sync Cursor editor settings through a GitHub Gist.

use clap::Parser;
use cursor_sync::applier::Applier;
use cursor_sync::cli::{Cli, Commands};
use cursor_sync::collector::Collector;
use cursor_sync::commands::{self, CommandResult};
use cursor_sync::config::{self, ResolvedSettings};
use cursor_sync::gist::{GistStore, HttpGists};
use cursor_sync::logging::{LogConfig, init_logging};
use cursor_sync::paths::EditorPaths;
use cursor_sync::reporter::{Reporter, TracingReporter};
use cursor_sync::{Error, Result};
use std::io::{self, Write};
use std::process;

fn main() {
    // Real environment variables win over .env entries
    config::load_dotenv();
    let cli = Cli::parse();
    let json = cli.json;

    let code = match run(cli) {
        Ok(code) => code,
        Err(e) => {
            if json {
                eprintln!("{}", serde_json::json!({ "error": e.to_string() }));
            } else {
                eprintln!("Error: {}", e);
            }
            1
        }
    };
    process::exit(code);
}

/// Run the selected command and return the process exit code.
fn run(cli: Cli) -> Result<i32> {
    let settings = config::resolve(cli.config.as_deref())?;

    let log_config = LogConfig::from_verbosity(cli.verbose)
        .with_log_dir(settings.log_dir.as_ref().map(|dir| dir.value.clone()));
    let _log_guard = init_logging(&log_config);
    log_settings(&settings);

    let paths = match &cli.root {
        Some(root) => EditorPaths::under(root),
        None => EditorPaths::detect(),
    };

    // In JSON mode stdout carries only the command result
    let out: Box<dyn Write> = if cli.json {
        Box::new(io::sink())
    } else {
        Box::new(io::stdout())
    };
    let reporter = TracingReporter::new(out);

    let token = settings.token().ok_or(Error::MissingToken)?;
    let api = HttpGists::new(settings.api_url.value.as_str(), token);
    let store = GistStore::new(&api, settings.gist_filename.value.as_str(), &reporter);
    let label = settings.gist_description.value.as_str();

    tracing::debug!("Running {}", cli.command.name());
    match cli.command {
        Commands::Push => {
            let collector = Collector::new(&paths, &reporter);
            match commands::push(&collector, &store, label, &reporter) {
                Ok(result) => {
                    output(&result, cli.json);
                    Ok(0)
                }
                Err(e) => {
                    reporter.say("Failed to push settings to GitHub Gist.");
                    Err(e)
                }
            }
        }
        Commands::Pull => {
            let applier = Applier::new(&paths, &reporter);
            match commands::pull(&store, &applier, label, &reporter) {
                Ok(result) => {
                    output(&result, cli.json);
                    Ok(if result.success { 0 } else { 1 })
                }
                Err(e) => {
                    reporter.say("No settings found or failed to pull from GitHub Gist.");
                    Err(e)
                }
            }
        }
    }
}

fn log_settings(settings: &ResolvedSettings) {
    tracing::debug!(
        "gist description {:?} ({})",
        settings.gist_description.value,
        settings.gist_description.source
    );
    tracing::debug!(
        "gist file {:?} ({})",
        settings.gist_filename.value,
        settings.gist_filename.source
    );
    tracing::debug!(
        "api url {} ({})",
        settings.api_url.value,
        settings.api_url.source
    );
    match (&settings.github_token, settings.masked_token()) {
        (Some(token), Some(masked)) => tracing::debug!("token {} ({})", masked, token.source),
        _ => tracing::debug!("token not set"),
    }
}

/// Print output in JSON or human-readable format.
fn output<T: CommandResult>(result: &T, json: bool) {
    if json {
        println!("{}", result.to_json());
    } else {
        println!("{}", result.to_human());
    }
}
