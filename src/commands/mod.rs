//! Command implementations for the cursor-sync CLI.
//!
//! - `push` - collect the local configuration and upsert it into the gist
//! - `pull` - fetch the gist snapshot and apply it locally
//!
//! Both return a [`CommandResult`] so `main` can print either JSON or text.

use crate::Result;
use crate::applier::{Applier, ApplyReport, Outcome, Resource};
use crate::collector::Collector;
use crate::gist::{GistStore, TransportError, UpsertAction};
use crate::reporter::Reporter;
use crate::snapshot::{Snapshot, is_blank};
use serde::Serialize;
use std::path::PathBuf;

/// Command results that can be serialized to JSON or formatted for humans.
pub trait CommandResult {
    /// Serialize to JSON string.
    fn to_json(&self) -> String;

    /// Format for human-readable output.
    fn to_human(&self) -> String;
}

/// Outcome of `push`.
#[derive(Debug, Clone, Serialize)]
pub struct PushResult {
    pub gist_id: String,
    pub url: String,
    pub action: UpsertAction,
    pub settings: usize,
    pub keybindings: bool,
    pub extensions: usize,
    pub snippets: usize,
}

impl CommandResult for PushResult {
    fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    fn to_human(&self) -> String {
        format!(
            "Success! Gist URL: {}\nSettings successfully pushed to GitHub Gist!",
            self.url
        )
    }
}

/// A sub-resource that could not be written during `pull`.
#[derive(Debug, Clone, Serialize)]
pub struct PullFailure {
    pub resource: Resource,
    pub error: String,
}

/// Outcome of `pull`.
#[derive(Debug, Clone, Serialize)]
pub struct PullResult {
    pub success: bool,
    pub written: Vec<PathBuf>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<PullFailure>,
    pub extensions: usize,
}

impl PullResult {
    fn from_report(report: &ApplyReport) -> Self {
        let extensions = report
            .outcomes
            .iter()
            .find_map(|o| match o.outcome {
                Outcome::Reported(n) => Some(n),
                _ => None,
            })
            .unwrap_or(0);
        Self {
            success: report.is_success(),
            written: report.written().map(PathBuf::from).collect(),
            failures: report
                .failures()
                .map(|(resource, e)| PullFailure {
                    resource,
                    error: e.to_string(),
                })
                .collect(),
            extensions,
        }
    }
}

impl CommandResult for PullResult {
    fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    fn to_human(&self) -> String {
        if self.success {
            "Settings successfully applied!".to_string()
        } else {
            "Some settings could not be applied.".to_string()
        }
    }
}

/// Collect the local configuration and store it in the gist labelled `label`.
pub fn push(
    collector: &Collector,
    store: &GistStore,
    label: &str,
    reporter: &dyn Reporter,
) -> Result<PushResult> {
    reporter.say("Collecting Cursor settings...");
    let snapshot = collector.collect();
    let content = snapshot.to_json()?;
    reporter.debug(&format!("Snapshot is {} bytes", content.len()));

    let upserted = store.upsert(label, &content)?;
    Ok(PushResult {
        gist_id: upserted.id,
        url: upserted.url,
        action: upserted.action,
        settings: snapshot.settings.len(),
        keybindings: !is_blank(&snapshot.keybindings),
        extensions: snapshot.extensions.len(),
        snippets: snapshot.snippets.len(),
    })
}

/// Fetch the snapshot from the gist labelled `label` and apply it.
///
/// Missing gists and unreadable snapshots are errors. Write failures are
/// reported in the returned [`PullResult`].
pub fn pull(
    store: &GistStore,
    applier: &Applier,
    label: &str,
    reporter: &dyn Reporter,
) -> Result<PullResult> {
    reporter.say("Pulling settings from GitHub Gist...");
    let content = store.fetch(label)?;
    let snapshot = Snapshot::from_json(&content).map_err(|e| {
        reporter.error(&format!("Error pulling from gist: {}", e));
        TransportError::Parse(format!("snapshot is not valid JSON: {}", e))
    })?;
    reporter.debug(&format!(
        "Snapshot version {} from platform {}",
        snapshot.format_version, snapshot.origin_platform
    ));

    let report = applier.apply(&snapshot);
    Ok(PullResult::from_report(&report))
}
