//! In-memory [`GistApi`] used by the unit and integration tests.

use super::TransportError;
use super::api::{GIST_PAGE_SIZE, Gist, GistApi, GistFile, GistRequest};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

/// A fake gist account held in memory.
#[derive(Debug)]
pub struct MemoryGists {
    gists: RefCell<Vec<Gist>>,
    raw: RefCell<BTreeMap<String, String>>,
    next_id: Cell<u64>,
    failing: Cell<bool>,
    page_size: usize,
    list_calls: Cell<usize>,
    creates: Cell<usize>,
    updates: Cell<usize>,
}

impl Default for MemoryGists {
    fn default() -> Self {
        Self {
            gists: RefCell::default(),
            raw: RefCell::default(),
            next_id: Cell::default(),
            failing: Cell::default(),
            page_size: GIST_PAGE_SIZE,
            list_calls: Cell::default(),
            creates: Cell::default(),
            updates: Cell::default(),
        }
    }
}

impl MemoryGists {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve listings in pages of `size` entries.
    pub fn with_page_size(mut self, size: usize) -> Self {
        self.page_size = size.max(1);
        self
    }

    /// Add an existing gist with the given id, description and files.
    pub fn with_gist(self, id: &str, description: Option<&str>, files: &[(&str, &str)]) -> Self {
        let files = files
            .iter()
            .map(|(name, content)| {
                (
                    name.to_string(),
                    GistFile {
                        content: Some(content.to_string()),
                        ..Default::default()
                    },
                )
            })
            .collect();
        self.gists.borrow_mut().push(Gist {
            id: id.to_string(),
            description: description.map(str::to_string),
            html_url: html_url(id),
            files,
        });
        self
    }

    /// Add a gist whose file is truncated and must be fetched from `raw_url`.
    pub fn with_truncated_gist(self, id: &str, description: &str, filename: &str, content: &str) -> Self {
        let raw_url = format!("memory://raw/{}/{}", id, filename);
        let file = GistFile {
            content: Some(content.chars().take(8).collect()),
            truncated: true,
            raw_url: Some(raw_url.clone()),
        };
        self.raw.borrow_mut().insert(raw_url, content.to_string());
        self.gists.borrow_mut().push(Gist {
            id: id.to_string(),
            description: Some(description.to_string()),
            html_url: html_url(id),
            files: BTreeMap::from([(filename.to_string(), file)]),
        });
        self
    }

    /// Make every call fail as if the network were down.
    pub fn set_failing(&self, failing: bool) {
        self.failing.set(failing);
    }

    /// Snapshot of the stored gists.
    pub fn gists(&self) -> Vec<Gist> {
        self.gists.borrow().clone()
    }

    /// Number of listing requests served, failed ones included.
    pub fn list_calls(&self) -> usize {
        self.list_calls.get()
    }

    /// Number of successful create calls.
    pub fn create_count(&self) -> usize {
        self.creates.get()
    }

    /// Number of successful update calls.
    pub fn update_count(&self) -> usize {
        self.updates.get()
    }

    fn check(&self) -> Result<(), TransportError> {
        if self.failing.get() {
            Err(TransportError::Http("connection refused".to_string()))
        } else {
            Ok(())
        }
    }
}

fn html_url(id: &str) -> String {
    format!("https://gist.github.com/memory/{}", id)
}

fn files_from(request: &GistRequest) -> BTreeMap<String, GistFile> {
    request
        .files
        .iter()
        .map(|(name, file)| {
            (
                name.clone(),
                GistFile {
                    content: Some(file.content.clone()),
                    ..Default::default()
                },
            )
        })
        .collect()
}

impl GistApi for MemoryGists {
    fn list(&self, page: u32) -> Result<Vec<Gist>, TransportError> {
        self.list_calls.set(self.list_calls.get() + 1);
        self.check()?;
        let skip = (page.max(1) as usize - 1) * self.page_size;
        // Listings carry no file content
        Ok(self
            .gists
            .borrow()
            .iter()
            .skip(skip)
            .take(self.page_size)
            .map(|g| Gist {
                files: g
                    .files
                    .keys()
                    .map(|k| (k.clone(), GistFile::default()))
                    .collect(),
                ..g.clone()
            })
            .collect())
    }

    fn page_size(&self) -> usize {
        self.page_size
    }

    fn get(&self, id: &str) -> Result<Gist, TransportError> {
        self.check()?;
        self.gists
            .borrow()
            .iter()
            .find(|g| g.id == id)
            .cloned()
            .ok_or_else(|| TransportError::Http(format!("HTTP 404: gist {} not found", id)))
    }

    fn create(&self, request: &GistRequest) -> Result<Gist, TransportError> {
        self.check()?;
        let n = self.next_id.get() + 1;
        self.next_id.set(n);
        let id = format!("memory-gist-{}", n);
        let gist = Gist {
            id: id.clone(),
            description: Some(request.description.clone()),
            html_url: html_url(&id),
            files: files_from(request),
        };
        self.gists.borrow_mut().push(gist.clone());
        self.creates.set(self.creates.get() + 1);
        Ok(gist)
    }

    fn update(&self, id: &str, request: &GistRequest) -> Result<Gist, TransportError> {
        self.check()?;
        let mut gists = self.gists.borrow_mut();
        let gist = gists
            .iter_mut()
            .find(|g| g.id == id)
            .ok_or_else(|| TransportError::Http(format!("HTTP 404: gist {} not found", id)))?;
        gist.description = Some(request.description.clone());
        gist.files.extend(files_from(request));
        self.updates.set(self.updates.get() + 1);
        Ok(gist.clone())
    }

    fn get_raw(&self, url: &str) -> Result<String, TransportError> {
        self.check()?;
        self.raw
            .borrow()
            .get(url)
            .cloned()
            .ok_or_else(|| TransportError::Http(format!("HTTP 404: {} not found", url)))
    }
}
