//! Caller-supplied open streams.

use std::borrow::Borrow;
use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use crate::io::FileStat;

/// Whether a handle's bytes are already known to be text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HandleMode {
    /// Encoding unknown: use the read codec if one is given, else sniff
    #[default]
    Binary,
    /// Text in the read codec (UTF-8 if none is given)
    Text,
}

/// An already-open stream passed in by the caller.
///
/// The resolver never re-opens a handle. The reader moves into the returned
/// `TextStream`; wrap a `&mut` reference to keep ownership with the caller.
pub struct Handle<'a> {
    pub(crate) reader: Box<dyn Read + 'a>,
    pub(crate) name: Option<String>,
    pub(crate) stat: Option<FileStat>,
    pub(crate) mode: HandleMode,
}

impl fmt::Debug for Handle<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("name", &self.name)
            .field("stat", &self.stat)
            .field("mode", &self.mode)
            .finish()
    }
}

impl<'a> Handle<'a> {
    /// Wrap an anonymous reader.
    pub fn new(reader: impl Read + 'a) -> Self {
        Self {
            reader: Box::new(reader),
            name: None,
            stat: None,
            mode: HandleMode::Binary,
        }
    }

    /// Wrap an open file, owned or borrowed, recording its statistics.
    pub fn from_file<F>(file: F, path: impl AsRef<Path>) -> io::Result<Self>
    where
        F: Read + Borrow<File> + 'a,
    {
        let stat = FileStat::from(&file.borrow().metadata()?);
        Ok(Self {
            reader: Box::new(file),
            name: Some(path.as_ref().to_string_lossy().into_owned()),
            stat: Some(stat),
            mode: HandleMode::Binary,
        })
    }

    /// Name the handle (usually the path it was opened from).
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_stat(mut self, stat: FileStat) -> Self {
        self.stat = Some(stat);
        self
    }

    pub fn with_mode(mut self, mode: HandleMode) -> Self {
        self.mode = mode;
        self
    }

    /// Shorthand for `with_mode(HandleMode::Text)`.
    pub fn text(self) -> Self {
        self.with_mode(HandleMode::Text)
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn mode(&self) -> HandleMode {
        self.mode
    }
}
