//! Collect the local Cursor configuration into a [`Snapshot`].
//!
//! Each of the four sources is read independently. A source that is missing
//! or malformed degrades to its empty value with a warning; collection as a
//! whole never fails.

use crate::jsonc;
use crate::paths::{EditorPaths, PACKAGE_JSON_FILE, Platform};
use crate::reporter::Reporter;
use crate::snapshot::{ExtensionRecord, Snapshot};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Why a source could not be collected.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Path does not exist
    #[error("{} not found", .0.display())]
    Unavailable(PathBuf),

    /// Path exists but could not be read
    #[error("could not read {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Content is not valid JSON
    #[error("could not parse {}: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Content is valid JSON but not the expected shape
    #[error("{} does not contain a JSON object", .0.display())]
    NotAnObject(PathBuf),
}

/// Reads the four configuration sources.
pub struct Collector<'a> {
    paths: &'a EditorPaths,
    platform: Platform,
    reporter: &'a dyn Reporter,
}

impl<'a> Collector<'a> {
    pub fn new(paths: &'a EditorPaths, reporter: &'a dyn Reporter) -> Self {
        Self {
            paths,
            platform: Platform::current(),
            reporter,
        }
    }

    /// Override the platform tag recorded in the snapshot.
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Build a snapshot from whatever can be read right now.
    pub fn collect(&self) -> Snapshot {
        self.reporter.info("Starting to collect Cursor settings");
        self.reporter.debug(&format!("Cursor paths: {:?}", self.paths));

        let mut snapshot = Snapshot::new(self.platform.as_str());

        match self.read_settings() {
            Ok(settings) => {
                self.reporter.info("Successfully loaded settings.json");
                snapshot.settings = settings;
            }
            Err(e) => self.warn_source("settings file", &e),
        }

        match self.read_keybindings() {
            Ok(Some(keybindings)) => {
                self.reporter.info("Successfully loaded keybindings.json");
                snapshot.keybindings = keybindings;
            }
            Ok(None) => self
                .reporter
                .info("Keybindings file is empty after removing comments"),
            Err(e) => self.warn_source("keybindings file", &e),
        }

        match self.scan_extensions() {
            Ok(extensions) => {
                self.reporter
                    .info(&format!("Found {} extensions", extensions.len()));
                snapshot.extensions = extensions;
            }
            Err(e) => self.warn_source("extensions directory", &e),
        }

        match self.scan_snippets() {
            Ok(snippets) => {
                self.reporter
                    .info(&format!("Found {} snippet files", snippets.len()));
                snapshot.snippets = snippets;
            }
            Err(e) => self.warn_source("snippets directory", &e),
        }

        self.reporter.info("Finished collecting Cursor settings");
        snapshot
    }

    fn warn_source(&self, what: &str, err: &SourceError) {
        match err {
            SourceError::Unavailable(path) => self
                .reporter
                .warn(&format!("{} not found at {}", capitalize(what), path.display())),
            other => self
                .reporter
                .warn(&format!("Could not read {}: {}", what, other)),
        }
    }

    /// Read `settings.json` as a JSON object.
    pub fn read_settings(&self) -> Result<Map<String, Value>, SourceError> {
        let path = &self.paths.settings;
        self.reporter
            .debug(&format!("Reading settings from {}", path.display()));
        match read_json(path)? {
            Value::Object(map) => Ok(map),
            _ => Err(SourceError::NotAnObject(path.clone())),
        }
    }

    /// Read `keybindings.json`, ignoring comment-only lines.
    ///
    /// `Ok(None)` means the file held nothing but comments.
    pub fn read_keybindings(&self) -> Result<Option<Value>, SourceError> {
        let path = &self.paths.keybindings;
        self.reporter
            .debug(&format!("Reading keybindings from {}", path.display()));
        let text = read_text(path)?;
        jsonc::parse_commented(&text).map_err(|source| SourceError::Malformed {
            path: path.clone(),
            source,
        })
    }

    /// List installed extensions from the extensions directory.
    ///
    /// A broken entry degrades to a name-only record or is skipped; it never
    /// aborts the scan.
    pub fn scan_extensions(&self) -> Result<Vec<ExtensionRecord>, SourceError> {
        let dir = &self.paths.extensions;
        self.reporter
            .debug(&format!("Scanning extensions directory: {}", dir.display()));
        let entries = list_dir(dir)?;

        let mut extensions = Vec::new();
        for entry in self.readable_entries(dir, entries) {
            let ext_dir = entry.path();
            if !ext_dir.is_dir() {
                continue;
            }
            let dir_name = entry.file_name().to_string_lossy().into_owned();

            let record = match read_manifest(&ext_dir, &dir_name) {
                Ok(record) => {
                    self.reporter.debug(&format!(
                        "Found extension: {}.{}",
                        record.publisher(),
                        record.name
                    ));
                    record
                }
                Err(e) => {
                    self.reporter
                        .debug(&format!("Found extension (no package.json): {} ({})", dir_name, e));
                    ExtensionRecord::bare(dir_name)
                }
            };
            extensions.push(record);
        }
        Ok(extensions)
    }

    /// Read every `*.json` file directly inside the snippets directory.
    pub fn scan_snippets(&self) -> Result<BTreeMap<String, Value>, SourceError> {
        let dir = &self.paths.snippets;
        self.reporter
            .debug(&format!("Scanning snippets directory: {}", dir.display()));
        let entries = list_dir(dir)?;

        let mut snippets = BTreeMap::new();
        for entry in self.readable_entries(dir, entries) {
            let path = entry.path();
            if path.extension().is_none_or(|ext| ext != "json") || !path.is_file() {
                continue;
            }
            let Some(name) = path.file_stem().map(|s| s.to_string_lossy().into_owned()) else {
                continue;
            };
            match read_json(&path) {
                Ok(content) => {
                    self.reporter.debug(&format!("Found snippet: {}", name));
                    snippets.insert(name, content);
                }
                Err(e) => self.reporter.warn(&format!(
                    "Could not read snippet file {}: {}",
                    path.display(),
                    e
                )),
            }
        }
        Ok(snippets)
    }

    /// Entries of `dir` that could be read; the rest are skipped with a warning.
    fn readable_entries<I>(&self, dir: &Path, entries: I) -> Vec<fs::DirEntry>
    where
        I: IntoIterator<Item = io::Result<fs::DirEntry>>,
    {
        entries
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    self.reporter
                        .warn(&format!("Skipping unreadable entry in {}: {}", dir.display(), e));
                    None
                }
            })
            .collect()
    }
}

/// Build a record from `<ext_dir>/package.json`.
///
/// Missing or non-string fields fall back independently: `name` to the
/// directory name, `version` and `publisher` to "unknown".
fn read_manifest(ext_dir: &Path, dir_name: &str) -> Result<ExtensionRecord, SourceError> {
    let manifest = match read_json(&ext_dir.join(PACKAGE_JSON_FILE))? {
        Value::Object(map) => map,
        _ => return Err(SourceError::NotAnObject(ext_dir.join(PACKAGE_JSON_FILE))),
    };
    let field = |key: &str| manifest.get(key).and_then(Value::as_str).map(str::to_string);

    Ok(ExtensionRecord {
        name: field("name").unwrap_or_else(|| dir_name.to_string()),
        version: Some(field("version").unwrap_or_else(|| crate::snapshot::UNKNOWN.to_string())),
        publisher: Some(
            field("publisher").unwrap_or_else(|| crate::snapshot::UNKNOWN.to_string()),
        ),
    })
}

fn read_text(path: &Path) -> Result<String, SourceError> {
    if !path.exists() {
        return Err(SourceError::Unavailable(path.to_path_buf()));
    }
    fs::read_to_string(path).map_err(|source| SourceError::Unreadable {
        path: path.to_path_buf(),
        source,
    })
}

fn read_json(path: &Path) -> Result<Value, SourceError> {
    let text = read_text(path)?;
    serde_json::from_str(&text).map_err(|source| SourceError::Malformed {
        path: path.to_path_buf(),
        source,
    })
}

fn list_dir(dir: &Path) -> Result<fs::ReadDir, SourceError> {
    if !dir.exists() {
        return Err(SourceError::Unavailable(dir.to_path_buf()));
    }
    fs::read_dir(dir).map_err(|source| SourceError::Unreadable {
        path: dir.to_path_buf(),
        source,
    })
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
