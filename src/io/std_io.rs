//! Local filesystem implementation.

use std::fs::File;
use std::io;
use std::path::Path;

use super::{FileStat, FileSystem, OpenedFile};

/// Filesystem backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl LocalFs {
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for LocalFs {
    fn open(&self, path: &Path) -> io::Result<OpenedFile> {
        let file = File::open(path)?;
        let stat = FileStat::from(&file.metadata()?);
        Ok(OpenedFile::new(Box::new(file), stat))
    }
}
