//! What was learned about a source while resolving it.

use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use std::time::SystemTime;

use chrono::{DateTime, Local};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::source::URL_MARKER;

/// Process-wide directory that paths are rendered relative to.
static DISPLAY_OFFSET: Lazy<RwLock<Option<PathBuf>>> = Lazy::new(|| RwLock::new(None));

/// Set (or clear) the process-wide display offset.
///
/// Meant for bootstrap and test code only: do not change it while other
/// threads are resolving sources.
pub fn set_display_offset(offset: Option<PathBuf>) {
    *DISPLAY_OFFSET
        .write()
        .unwrap_or_else(PoisonError::into_inner) = offset;
}

/// The current process-wide display offset.
pub fn display_offset() -> Option<PathBuf> {
    DISPLAY_OFFSET
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// Origin information filled in by `open`/`read`.
///
/// For file, URL and handle sources `origin`, `origin_timestamp` and
/// `origin_size` are outputs only: passing a record with any of them set is
/// rejected as invalid usage. Call [`clear`](Metadata::clear) to reuse a
/// record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// Absolute path, final URL or handle name; `None` for literal text
    pub origin: Option<String>,
    /// File mtime (RFC 3339), `Last-Modified`/`Date` header, or the time of reading
    pub origin_timestamp: Option<String>,
    /// Size in bytes, or in characters for literal text
    pub origin_size: Option<u64>,
    /// Directory or URL prefix for resolving relative sources
    pub base_location: Option<String>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset every field.
    pub fn clear(&mut self) -> &mut Self {
        *self = Self::default();
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// True if any output-only field has been filled in.
    pub(crate) fn has_outputs(&self) -> bool {
        self.origin.is_some() || self.origin_timestamp.is_some() || self.origin_size.is_some()
    }

    /// `origin` relative to the process-wide display offset.
    pub fn display_origin(&self) -> Option<String> {
        self.display_origin_with(display_offset().as_deref())
    }

    /// `base_location` relative to the process-wide display offset.
    pub fn display_base_location(&self) -> Option<String> {
        self.display_base_location_with(display_offset().as_deref())
    }

    /// `origin` rendered relative to `offset`; URLs are left alone.
    pub fn display_origin_with(&self, offset: Option<&Path>) -> Option<String> {
        self.origin.as_deref().map(|v| relative_to(v, offset))
    }

    /// `base_location` rendered relative to `offset`; URLs are left alone.
    pub fn display_base_location_with(&self, offset: Option<&Path>) -> Option<String> {
        self.base_location.as_deref().map(|v| relative_to(v, offset))
    }
}

fn relative_to(value: &str, offset: Option<&Path>) -> String {
    match offset {
        Some(offset) if !value.contains(URL_MARKER) => pathdiff::diff_paths(value, offset)
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_else(|| value.to_owned()),
        _ => value.to_owned(),
    }
}

pub(crate) fn format_time(time: SystemTime) -> String {
    DateTime::<Local>::from(time).to_rfc3339()
}

pub(crate) fn now() -> String {
    Local::now().to_rfc3339()
}
