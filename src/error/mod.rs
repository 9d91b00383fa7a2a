//! Error types for resolving and reading sources.
//!
//! Every failure surfaces to the caller of `open`/`read` as one [`Error`]:
//! - `NotFound` / `PermissionDenied`: the filesystem refused the path
//! - `Http`: non-2xx response or transport failure, with the requested URL attached
//! - `Decode`: bytes that do not match the selected codec (raised lazily, on read)
//! - `InvalidUsage`: contract violations by the caller
//! - `Io`: any other I/O failure

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::codec::Codec;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The file (or the file behind a handle) does not exist
    #[error("No such file or directory: {}", .0.display())]
    NotFound(PathBuf),

    /// Access to the file was refused
    #[error("Permission denied: {}", .0.display())]
    PermissionDenied(PathBuf),

    /// A URL could not be fetched.
    ///
    /// `status` is `None` when the request never produced a response.
    #[error("{}", describe_http(.status, .url, .reason))]
    Http {
        status: Option<u16>,
        url: String,
        reason: Option<String>,
    },

    /// Input bytes are not valid under the codec in use
    #[error("cannot decode '{target}' as {codec}: {reason}")]
    Decode {
        codec: Codec,
        target: String,
        reason: String,
    },

    /// The caller broke the calling contract
    #[error("invalid usage: {0}")]
    InvalidUsage(String),

    /// Any other I/O failure
    #[error("I/O error on '{target}': {source}")]
    Io {
        target: String,
        #[source]
        source: io::Error,
    },
}

fn describe_http(status: &Option<u16>, url: &str, reason: &Option<String>) -> String {
    match (status, reason) {
        (Some(status), _) => format!("HTTP Error {status}: {url}"),
        (None, Some(reason)) => format!("HTTP request failed: {url}: {reason}"),
        (None, None) => format!("HTTP request failed: {url}"),
    }
}

impl Error {
    /// Map a filesystem error for `path` onto the crate taxonomy.
    pub(crate) fn from_fs(err: io::Error, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match err.kind() {
            io::ErrorKind::NotFound => Error::NotFound(path),
            io::ErrorKind::PermissionDenied => Error::PermissionDenied(path),
            _ => Error::Io {
                target: path.to_string_lossy().into_owned(),
                source: err,
            },
        }
    }

    /// HTTP status code, if this is an HTTP error with a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Http { status, .. } => *status,
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}

impl From<Error> for io::Error {
    fn from(err: Error) -> Self {
        let kind = match &err {
            Error::NotFound(_) => io::ErrorKind::NotFound,
            Error::PermissionDenied(_) => io::ErrorKind::PermissionDenied,
            Error::Decode { .. } => io::ErrorKind::InvalidData,
            Error::InvalidUsage(_) => io::ErrorKind::InvalidInput,
            Error::Io { source, .. } => source.kind(),
            Error::Http { .. } => io::ErrorKind::Other,
        };
        io::Error::new(kind, err)
    }
}

#[cfg(feature = "miette")]
mod miette_impl;

#[cfg(feature = "miette")]
pub use miette_impl::*;
