//! Snapshot storage in a secret GitHub gist.
//!
//! The gist is never tracked by id. Every operation first lists the user's
//! gists and picks the first one whose description equals the sync label,
//! so any machine with the same token finds the same gist.
//!
//! - [`GistStore::find`]: label → gist id
//! - [`GistStore::upsert`]: update the found gist, or create one
//! - [`GistStore::fetch`]: label → content of the snapshot file

pub mod api;
pub mod http;
pub mod memory;

pub use api::{GIST_PAGE_SIZE, Gist, GistApi, GistFile, GistRequest};
pub use http::HttpGists;
pub use memory::MemoryGists;

use crate::reporter::Reporter;
use serde::Serialize;
use thiserror::Error;

/// Errors talking to the gist API.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Token is invalid or expired (401 Unauthorized)
    #[error("Invalid or expired token: GitHub returned 401 Unauthorized")]
    Unauthorized,

    /// Token lacks the gist scope (403 Forbidden)
    #[error("Token lacks required permissions: GitHub returned 403 Forbidden")]
    Forbidden,

    /// Network or other HTTP error
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Failed to parse response
    #[error("Failed to parse GitHub response: {0}")]
    Parse(String),

    /// No gist carries the sync label
    #[error("No existing settings gist found")]
    NotFound,

    /// The gist exists but lacks the snapshot file
    #[error("Settings file {0} not found in gist")]
    MissingFile(String),
}

/// Whether an upsert created a new gist or updated an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UpsertAction {
    Created,
    Updated,
}

/// Where an upserted snapshot now lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upserted {
    pub id: String,
    pub url: String,
    pub action: UpsertAction,
}

/// Label-addressed snapshot storage on top of a [`GistApi`].
pub struct GistStore<'a> {
    api: &'a dyn GistApi,
    filename: String,
    reporter: &'a dyn Reporter,
}

impl<'a> GistStore<'a> {
    /// `filename` is the file inside the gist that holds the snapshot.
    pub fn new(api: &'a dyn GistApi, filename: impl Into<String>, reporter: &'a dyn Reporter) -> Self {
        Self {
            api,
            filename: filename.into(),
            reporter,
        }
    }

    /// Id of the first gist whose description equals `label`.
    ///
    /// Pages are read in order until a match or the last page. A failed
    /// listing also yields `None`; it is logged as an error, while a plain
    /// miss is logged at info.
    pub fn find(&self, label: &str) -> Option<String> {
        self.reporter.debug("Searching for existing settings gist");
        let mut page = 1;
        loop {
            let gists = match self.api.list(page) {
                Ok(gists) => gists,
                Err(e) => {
                    self.reporter
                        .error(&format!("Error searching for existing gist: {}", e));
                    return None;
                }
            };
            let last_page = gists.len() < self.api.page_size();
            if let Some(gist) = gists
                .into_iter()
                .find(|g| g.description.as_deref() == Some(label))
            {
                self.reporter
                    .info(&format!("Found existing gist: {}", gist.id));
                return Some(gist.id);
            }
            if last_page {
                self.reporter.info("No existing settings gist found");
                return None;
            }
            self.reporter
                .debug(&format!("No match on page {}, reading the next one", page));
            page += 1;
        }
    }

    /// Store `content` in the gist labelled `label`, creating it if needed.
    pub fn upsert(&self, label: &str, content: &str) -> Result<Upserted, TransportError> {
        self.reporter.info("Starting to push settings to GitHub Gist");
        let request = GistRequest::single_file(label, self.filename.as_str(), content);

        let (gist, action) = match self.find(label) {
            Some(id) => {
                self.reporter.debug(&format!("Updating existing gist: {}", id));
                self.reporter.say(&format!("Updating existing gist: {}", id));
                (self.api.update(&id, &request), UpsertAction::Updated)
            }
            None => {
                self.reporter.debug("Creating new gist");
                self.reporter.say("Creating new gist");
                (self.api.create(&request), UpsertAction::Created)
            }
        };

        match gist {
            Ok(gist) => {
                self.reporter.info(&format!(
                    "Successfully pushed settings to gist: {}",
                    gist.html_url
                ));
                Ok(Upserted {
                    id: gist.id,
                    url: gist.html_url,
                    action,
                })
            }
            Err(e) => {
                self.reporter.error(&format!("Error pushing to gist: {}", e));
                Err(e)
            }
        }
    }

    /// Content of the snapshot file in the gist labelled `label`.
    pub fn fetch(&self, label: &str) -> Result<String, TransportError> {
        self.reporter.info("Starting to pull settings from GitHub Gist");
        let Some(id) = self.find(label) else {
            self.reporter.warn("No existing settings gist found");
            return Err(TransportError::NotFound);
        };

        self.reporter.debug(&format!("Fetching gist: {}", id));
        let result = self.api.get(&id).and_then(|gist| self.file_content(gist));
        match &result {
            Ok(_) => self.reporter.info("Successfully pulled settings from gist"),
            Err(e) => self.reporter.error(&format!("Error pulling from gist: {}", e)),
        }
        result
    }

    fn file_content(&self, mut gist: Gist) -> Result<String, TransportError> {
        let file = gist
            .files
            .remove(&self.filename)
            .ok_or_else(|| TransportError::MissingFile(self.filename.clone()))?;
        match (file.truncated, file.raw_url, file.content) {
            (true, Some(raw_url), _) => {
                self.reporter
                    .debug(&format!("Gist file is truncated, fetching {}", raw_url));
                self.api.get_raw(&raw_url)
            }
            (_, _, Some(content)) => Ok(content),
            (_, _, None) => Err(TransportError::Parse(format!(
                "file {} has no content",
                self.filename
            ))),
        }
    }
}
