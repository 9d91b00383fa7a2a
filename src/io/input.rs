//! Filesystem collaborator trait definition.

use std::fmt::{self, Debug};
use std::fs;
use std::io::Read;
use std::path::Path;
use std::time::SystemTime;

/// Modification time and size of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStat {
    /// Last modification time, if the platform reports one
    pub modified: Option<SystemTime>,
    /// Size in bytes
    pub len: u64,
}

impl From<&fs::Metadata> for FileStat {
    fn from(meta: &fs::Metadata) -> Self {
        Self {
            modified: meta.modified().ok(),
            len: meta.len(),
        }
    }
}

/// A file opened for reading, with the statistics of that same file.
pub struct OpenedFile {
    pub reader: Box<dyn Read + Send>,
    pub stat: FileStat,
}

impl OpenedFile {
    pub fn new(reader: Box<dyn Read + Send>, stat: FileStat) -> Self {
        Self { reader, stat }
    }
}

impl fmt::Debug for OpenedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenedFile")
            .field("stat", &self.stat)
            .finish_non_exhaustive()
    }
}

/// Trait for the filesystem primitives the resolver needs.
///
/// Errors keep their `io::ErrorKind` so the resolver can tell `NotFound` and
/// `PermissionDenied` apart.
pub trait FileSystem: Send + Sync + Debug {
    /// Open `path` for reading, positioned at the beginning.
    ///
    /// The returned stat describes the opened file itself, not whatever
    /// `path` names by the time it is inspected again.
    fn open(&self, path: &Path) -> std::io::Result<OpenedFile>;
}
