//! Per-call options for `open`/`read`.

use std::fmt;
use std::sync::Arc;

use crate::codec::Codec;
use crate::source::is_actual_data;

/// Predicate deciding whether a string is literal text rather than a path or URL.
pub type DataPredicate = dyn Fn(&str) -> bool + Send + Sync;

/// Options steering classification and opening.
#[derive(Clone, Default)]
pub struct OpenOptions {
    /// Directory or URL prefix that relative paths and URLs are resolved against
    pub base_location: Option<String>,
    /// `Accept` header sent with URL requests
    pub accept_header: Option<String>,
    /// Codec for file, URL and handle bytes. For URLs and binary handles,
    /// `None` means sniff the byte-order mark; files default to UTF-8.
    pub read_codec: Option<Codec>,
    is_actual_data: Option<Arc<DataPredicate>>,
}

impl fmt::Debug for OpenOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenOptions")
            .field("base_location", &self.base_location)
            .field("accept_header", &self.accept_header)
            .field("read_codec", &self.read_codec)
            .field("custom_predicate", &self.is_actual_data.is_some())
            .finish()
    }
}

impl OpenOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base location.
    pub fn with_base_location(mut self, base: impl Into<String>) -> Self {
        self.base_location = Some(base.into());
        self
    }

    /// Set the `Accept` header.
    pub fn with_accept_header(mut self, accept: impl Into<String>) -> Self {
        self.accept_header = Some(accept.into());
        self
    }

    /// Set the read codec.
    pub fn with_read_codec(mut self, codec: Codec) -> Self {
        self.read_codec = Some(codec);
        self
    }

    /// Replace the default literal-text predicate.
    pub fn with_is_actual_data<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.is_actual_data = Some(Arc::new(predicate));
        self
    }

    /// Apply the configured predicate, or the default one.
    pub fn is_actual_data(&self, s: &str) -> bool {
        match &self.is_actual_data {
            Some(predicate) => predicate(s),
            None => is_actual_data(s),
        }
    }

    pub fn base_location(&self) -> Option<&str> {
        self.base_location.as_deref()
    }
}
