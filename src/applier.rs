//! Write a [`Snapshot`] back onto the local machine.
//!
//! Every sub-resource is applied independently. A failure is recorded in the
//! [`ApplyReport`] and the remaining sub-resources are still attempted.
//! Nothing is merged: each written file is replaced in full.

use crate::paths::EditorPaths;
use crate::reporter::Reporter;
use crate::snapshot::{Snapshot, is_blank};
use serde::Serialize;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// First line of a written keybindings file, as Cursor writes its default file.
pub const KEYBINDINGS_HEADER: &str = "// Empty\n";

/// One of the four independently synced facets of the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    Settings,
    Keybindings,
    Extensions,
    Snippets,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Resource::Settings => "settings",
            Resource::Keybindings => "keybindings",
            Resource::Extensions => "extensions",
            Resource::Snippets => "snippets",
        };
        write!(f, "{}", name)
    }
}

/// Why writing a sub-resource failed.
#[derive(Debug, Error)]
pub enum ApplyError {
    #[error("could not create directory {}: {source}", path.display())]
    DirectoryCreateFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not write {}: {source}", path.display())]
    FileWriteFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// What happened to one sub-resource (or one snippet file).
#[derive(Debug)]
pub enum Outcome {
    /// File written at this path
    Written(PathBuf),
    /// Nothing to apply
    Skipped,
    /// Listed for the user but not written (extensions)
    Reported(usize),
    Failed(ApplyError),
}

#[derive(Debug)]
pub struct ResourceOutcome {
    pub resource: Resource,
    pub outcome: Outcome,
}

/// Result of applying a snapshot.
#[derive(Debug, Default)]
pub struct ApplyReport {
    pub outcomes: Vec<ResourceOutcome>,
}

impl ApplyReport {
    fn record(&mut self, resource: Resource, outcome: Outcome) {
        self.outcomes.push(ResourceOutcome { resource, outcome });
    }

    /// True when nothing failed.
    pub fn is_success(&self) -> bool {
        self.failures().next().is_none()
    }

    /// All recorded failures.
    pub fn failures(&self) -> impl Iterator<Item = (Resource, &ApplyError)> {
        self.outcomes.iter().filter_map(|o| match &o.outcome {
            Outcome::Failed(e) => Some((o.resource, e)),
            _ => None,
        })
    }

    /// Paths of all files written.
    pub fn written(&self) -> impl Iterator<Item = &Path> {
        self.outcomes.iter().filter_map(|o| match &o.outcome {
            Outcome::Written(p) => Some(p.as_path()),
            _ => None,
        })
    }
}

/// Writes snapshots to an [`EditorPaths`] layout.
pub struct Applier<'a> {
    paths: &'a EditorPaths,
    reporter: &'a dyn Reporter,
}

impl<'a> Applier<'a> {
    pub fn new(paths: &'a EditorPaths, reporter: &'a dyn Reporter) -> Self {
        Self { paths, reporter }
    }

    /// Apply every non-blank sub-resource of `snapshot`.
    pub fn apply(&self, snapshot: &Snapshot) -> ApplyReport {
        self.reporter.info("Starting to apply settings to local system");
        self.reporter
            .debug(&format!("Target paths: {:?}", self.paths));
        let mut report = ApplyReport::default();

        let settings = self.apply_settings(snapshot);
        self.note(Resource::Settings, &settings);
        report.record(Resource::Settings, settings);

        let keybindings = self.apply_keybindings(snapshot);
        self.note(Resource::Keybindings, &keybindings);
        report.record(Resource::Keybindings, keybindings);

        for outcome in self.apply_snippets(snapshot) {
            self.note(Resource::Snippets, &outcome);
            report.record(Resource::Snippets, outcome);
        }

        let extensions = self.report_extensions(snapshot);
        report.record(Resource::Extensions, extensions);

        if report.is_success() {
            self.reporter.info("Successfully applied all settings");
        } else {
            self.reporter.warn("Some settings could not be applied");
        }
        report
    }

    fn note(&self, resource: Resource, outcome: &Outcome) {
        match outcome {
            Outcome::Written(path) => {
                self.reporter
                    .info(&format!("Updated {} file: {}", resource, path.display()));
                self.reporter
                    .say(&format!("Updated {} file: {}", resource, path.display()));
            }
            Outcome::Failed(e) => {
                self.reporter
                    .error(&format!("Error writing {}: {}", resource, e));
                self.reporter
                    .say(&format!("Error writing {}: {}", resource, e));
            }
            Outcome::Skipped => self
                .reporter
                .debug(&format!("No {} to apply", resource)),
            Outcome::Reported(_) => {}
        }
    }

    /// Overwrite `settings.json` with the snapshot's settings.
    pub fn apply_settings(&self, snapshot: &Snapshot) -> Outcome {
        if snapshot.settings.is_empty() {
            return Outcome::Skipped;
        }
        let path = &self.paths.settings;
        self.reporter
            .debug(&format!("Applying settings to {}", path.display()));
        let body = pretty(&snapshot.settings);
        to_outcome(path, write_file(path, body))
    }

    /// Overwrite `keybindings.json`, framed with [`KEYBINDINGS_HEADER`].
    pub fn apply_keybindings(&self, snapshot: &Snapshot) -> Outcome {
        if is_blank(&snapshot.keybindings) {
            return Outcome::Skipped;
        }
        let path = &self.paths.keybindings;
        self.reporter
            .debug(&format!("Applying keybindings to {}", path.display()));
        let body = pretty(&snapshot.keybindings).map(|json| format!("{KEYBINDINGS_HEADER}{json}"));
        to_outcome(path, write_file(path, body))
    }

    /// Write one `<name>.json` per snippet set. Other files in the directory
    /// are left alone.
    pub fn apply_snippets(&self, snapshot: &Snapshot) -> Vec<Outcome> {
        if snapshot.snippets.is_empty() {
            return vec![Outcome::Skipped];
        }
        let dir = &self.paths.snippets;
        self.reporter
            .debug(&format!("Applying {} snippets", snapshot.snippets.len()));

        if let Err(source) = fs::create_dir_all(dir) {
            return vec![Outcome::Failed(ApplyError::DirectoryCreateFailed {
                path: dir.clone(),
                source,
            })];
        }

        let outcomes = snapshot
            .snippets
            .iter()
            .map(|(name, content)| {
                let path = dir.join(format!("{}.json", name));
                if !is_safe_snippet_name(name) {
                    return Outcome::Failed(ApplyError::FileWriteFailed {
                        path,
                        source: io::Error::new(
                            io::ErrorKind::InvalidInput,
                            "snippet name must be a plain file name",
                        ),
                    });
                }
                to_outcome(&path, write_file(&path, pretty(content)))
            })
            .collect();
        self.reporter
            .info(&format!("Applied {} snippet files", snapshot.snippets.len()));
        outcomes
    }

    /// List synced extensions. Installing them is left to the user.
    pub fn report_extensions(&self, snapshot: &Snapshot) -> Outcome {
        if snapshot.extensions.is_empty() {
            return Outcome::Skipped;
        }
        self.reporter.info(&format!(
            "Found {} extensions in sync",
            snapshot.extensions.len()
        ));
        self.reporter.say("\nExtensions found in sync:");
        for ext in &snapshot.extensions {
            self.reporter.say(&format!("  - {}", ext.display_line()));
        }
        self.reporter
            .say("\nNote: Extensions need to be installed manually in Cursor.");
        Outcome::Reported(snapshot.extensions.len())
    }
}

fn pretty<T: Serialize + ?Sized>(value: &T) -> io::Result<String> {
    serde_json::to_string_pretty(value).map_err(io::Error::from)
}

/// Create the parent directory, then write `body` to `path`.
fn write_file(path: &Path, body: io::Result<String>) -> Result<(), ApplyError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| ApplyError::DirectoryCreateFailed {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    body.and_then(|body| fs::write(path, body))
        .map_err(|source| ApplyError::FileWriteFailed {
            path: path.to_path_buf(),
            source,
        })
}

fn to_outcome(path: &Path, result: Result<(), ApplyError>) -> Outcome {
    match result {
        Ok(()) => Outcome::Written(path.to_path_buf()),
        Err(e) => Outcome::Failed(e),
    }
}

fn is_safe_snippet_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
        && !name.contains('\0')
}
