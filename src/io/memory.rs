//! In-memory filesystem and transport implementations for testing.

use std::collections::{HashMap, HashSet};
use std::io::{self, Cursor};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

use super::{FetchError, FileStat, FileSystem, OpenedFile, Response, Transport};

/// In-memory filesystem for testing.
///
/// Clones share the same files and access counter.
#[derive(Debug, Clone, Default)]
pub struct InMemoryFs {
    files: Arc<Mutex<HashMap<PathBuf, Arc<Vec<u8>>>>>,
    denied: Arc<Mutex<HashSet<PathBuf>>>,
    modified: Option<SystemTime>,
    accesses: Arc<AtomicUsize>,
}

impl InMemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report `modified` as the mtime of every file.
    pub fn with_modified(mut self, modified: SystemTime) -> Self {
        self.modified = Some(modified);
        self
    }

    /// Add (or replace) a file.
    pub fn add_file(&self, path: impl Into<PathBuf>, data: impl Into<Vec<u8>>) {
        self.files
            .lock()
            .unwrap()
            .insert(path.into(), Arc::new(data.into()));
    }

    /// Make `path` exist but refuse to open it.
    pub fn deny(&self, path: impl Into<PathBuf>) {
        self.denied.lock().unwrap().insert(path.into());
    }

    /// Number of `open` calls made so far.
    pub fn accesses(&self) -> usize {
        self.accesses.load(Ordering::SeqCst)
    }

    fn lookup(&self, path: &Path) -> io::Result<Arc<Vec<u8>>> {
        self.accesses.fetch_add(1, Ordering::SeqCst);
        if self.denied.lock().unwrap().contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("access to {} denied", path.display()),
            ));
        }
        self.files.lock().unwrap().get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} does not exist", path.display()),
            )
        })
    }
}

impl FileSystem for InMemoryFs {
    fn open(&self, path: &Path) -> io::Result<OpenedFile> {
        let data = self.lookup(path)?;
        let stat = FileStat {
            modified: self.modified,
            len: data.len() as u64,
        };
        Ok(OpenedFile::new(Box::new(Cursor::new(data.as_ref().clone())), stat))
    }
}

/// A canned response served by [`InMemoryTransport`].
#[derive(Debug, Clone)]
pub struct CannedResponse {
    pub status: u16,
    /// Set when the request is redirected
    pub final_url: Option<String>,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl CannedResponse {
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self::with_status(200, body)
    }

    pub fn with_status(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            final_url: None,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn redirected_to(mut self, url: impl Into<String>) -> Self {
        self.final_url = Some(url.into());
        self
    }
}

/// A request seen by [`InMemoryTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
}

/// In-memory transport for testing.
///
/// Unknown URLs answer 404.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTransport {
    routes: Arc<Mutex<HashMap<String, CannedResponse>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl InMemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(&self, url: impl Into<String>, response: CannedResponse) {
        self.routes.lock().unwrap().insert(url.into(), response);
    }

    /// Requests received so far, oldest first.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Transport for InMemoryTransport {
    fn fetch(&self, url: &str, headers: &[(&str, &str)]) -> Result<Response, FetchError> {
        self.requests.lock().unwrap().push(RecordedRequest {
            url: url.to_owned(),
            headers: headers
                .iter()
                .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
                .collect(),
        });

        let canned = self
            .routes
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .unwrap_or_else(|| CannedResponse::with_status(404, Vec::new()));
        let final_url = canned.final_url.unwrap_or_else(|| url.to_owned());

        if !(200..300).contains(&canned.status) {
            return Err(FetchError::Status {
                status: canned.status,
                url: final_url,
            });
        }

        let body = Box::new(Cursor::new(canned.body));
        let mut response = Response::new(final_url, canned.status, body);
        for (name, value) in &canned.headers {
            response = response.with_header(name, value.clone());
        }
        Ok(response)
    }
}
