//! Gist API seam and wire types.

use super::TransportError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A gist as returned by the GitHub REST API (only fields we care about).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gist {
    pub id: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub html_url: String,
    #[serde(default)]
    pub files: BTreeMap<String, GistFile>,
}

/// One file inside a gist.
///
/// Listings omit `content`; single-gist responses include it but cut it off
/// for large files, setting `truncated` and pointing at `raw_url`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GistFile {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub truncated: bool,
    #[serde(default)]
    pub raw_url: Option<String>,
}

/// Body of a create or update request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GistRequest {
    pub description: String,
    pub public: bool,
    pub files: BTreeMap<String, FileContent>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileContent {
    pub content: String,
}

impl GistRequest {
    /// A secret gist holding a single file.
    pub fn single_file(
        description: impl Into<String>,
        filename: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        let mut files = BTreeMap::new();
        files.insert(
            filename.into(),
            FileContent {
                content: content.into(),
            },
        );
        Self {
            description: description.into(),
            public: false,
            files,
        }
    }
}

/// Largest page GitHub serves for gist listings.
pub const GIST_PAGE_SIZE: usize = 100;

/// The four gist endpoints the store needs, plus raw file download.
pub trait GistApi {
    /// `GET /gists?page={page}`: one page of the authenticated user's
    /// gists, newest first. Pages start at 1.
    fn list(&self, page: u32) -> Result<Vec<Gist>, TransportError>;

    /// Entries per full page. A shorter page is the last one.
    fn page_size(&self) -> usize {
        GIST_PAGE_SIZE
    }

    /// `GET /gists/{id}`
    fn get(&self, id: &str) -> Result<Gist, TransportError>;

    /// `POST /gists`
    fn create(&self, request: &GistRequest) -> Result<Gist, TransportError>;

    /// `PATCH /gists/{id}`
    fn update(&self, id: &str, request: &GistRequest) -> Result<Gist, TransportError>;

    /// Download the full content behind a file's `raw_url`.
    fn get_raw(&self, url: &str) -> Result<String, TransportError>;
}
