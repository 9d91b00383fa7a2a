//! Reader configuration loadable from configuration files.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::OpenOptions;
use crate::codec::Codec;
use crate::error::Result;
use crate::metadata;

/// Serializable counterpart of [`OpenOptions`].
///
/// Codec names are kept as strings and validated by
/// [`into_options`](ReaderConfig::into_options).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// Directory or URL prefix for relative sources
    pub base_location: Option<String>,
    /// `Accept` header for URL requests
    pub accept_header: Option<String>,
    /// Codec name: "utf-8", "utf-16le", "latin-1", ...
    pub read_codec: Option<String>,
    /// Directory that logged paths are shown relative to
    pub display_offset: Option<PathBuf>,
}

impl ReaderConfig {
    /// Create a new empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base location.
    pub fn with_base_location(mut self, base: impl Into<String>) -> Self {
        self.base_location = Some(base.into());
        self
    }

    /// Set the codec name.
    pub fn with_read_codec(mut self, codec: impl Into<String>) -> Self {
        self.read_codec = Some(codec.into());
        self
    }

    /// Build per-call options.
    ///
    /// Fails with `InvalidUsage` if the codec name is unknown.
    pub fn into_options(self) -> Result<OpenOptions> {
        let read_codec = self
            .read_codec
            .as_deref()
            .map(str::parse::<Codec>)
            .transpose()?;

        let mut options = OpenOptions::new();
        options.base_location = self.base_location;
        options.accept_header = self.accept_header;
        options.read_codec = read_codec;
        Ok(options)
    }

    /// Install `display_offset` as the process-wide display offset.
    ///
    /// Call once during start-up, before any source is resolved.
    pub fn apply_display_offset(&self) {
        metadata::set_display_offset(self.display_offset.clone());
    }
}

impl TryFrom<ReaderConfig> for OpenOptions {
    type Error = crate::error::Error;

    fn try_from(config: ReaderConfig) -> Result<Self> {
        config.into_options()
    }
}
