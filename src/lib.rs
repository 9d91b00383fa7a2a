//! # anytext
//!
//! Read text from whatever a caller hands you.
//!
//! ## Overview
//!
//! anytext accepts one value and works out what it is:
//! - **Literal text**: strings that look like data (newlines, tabs, quotes,
//!   double spaces) are returned as is
//! - **Bytes**: decoded as UTF-8
//! - **File paths**: resolved against an optional base directory and opened
//! - **URLs**: joined onto an optional base URL and fetched over HTTP
//! - **Open handles**: any `Read`, optionally carrying a name and file statistics
//! - **Stringable values**: anything implementing `Display`
//!
//! Every kind comes back as a [`TextStream`], and an optional [`Metadata`]
//! record learns where the text came from (absolute path or final URL,
//! timestamp, size, base location for resolving siblings).
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use anytext::{Metadata, OpenOptions};
//!
//! fn main() -> anytext::Result<()> {
//!     let options = OpenOptions::new().with_base_location("/etc");
//!     let mut metadata = Metadata::new();
//!
//!     let hosts = anytext::read("hosts", Some(&mut metadata), &options)?;
//!     println!("{} bytes from {:?}", metadata.origin_size.unwrap_or(0), metadata.origin);
//!
//!     // Siblings resolve against what the first read learned
//!     let base = metadata.base_location.clone().unwrap_or_default();
//!     let options = OpenOptions::new().with_base_location(base);
//!     let mut stream = anytext::open("resolv.conf", None, &options)?;
//!     for line in &mut stream {
//!         print!("{}", line?);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Encodings
//!
//! Files and text-mode handles are read as UTF-8 unless `read_codec` says
//! otherwise. URLs and binary handles sniff a byte-order mark on the first
//! read (UTF-8, UTF-16 LE/BE, UTF-32 LE/BE) and fall back to UTF-8. Decoding
//! is incremental, so invalid input is reported by the read that reaches it.
//!
//! ## Features
//!
//! - `http` - Fetch URLs with `ureq` (enabled by default; without it URLs are refused)
//! - `miette` - Pretty error reporting with miette

// Core modules
pub mod builder;
pub mod codec;
pub mod config;
pub mod error;
pub mod io;
pub mod metadata;
pub mod resolver;
pub mod source;
pub mod stream;

// Re-exports for convenience
pub use builder::ResolverBuilder;
pub use codec::Codec;
pub use config::{DataPredicate, OpenOptions, ReaderConfig};
pub use error::{Error, Result};
pub use io::{
    CannedResponse, FetchError, FileStat, FileSystem, InMemoryFs, InMemoryTransport, LocalFs,
    OfflineTransport, OpenedFile, Response, Transport,
};
#[cfg(feature = "http")]
pub use io::HttpTransport;
pub use metadata::Metadata;
pub use resolver::Resolver;
pub use source::{Handle, HandleMode, Kind, Source, classify, is_actual_data};
pub use stream::TextStream;

use once_cell::sync::Lazy;

static DEFAULT_RESOLVER: Lazy<Resolver> = Lazy::new(Resolver::default);

/// Open `source` with the default resolver (local filesystem, default
/// transport). See [`Resolver::open`].
pub fn open<'a>(
    source: impl Into<Source<'a>>,
    metadata: Option<&mut Metadata>,
    options: &OpenOptions,
) -> Result<TextStream<'a>> {
    DEFAULT_RESOLVER.open(source, metadata, options)
}

/// Read all text of `source` with the default resolver. See [`Resolver::read`].
pub fn read<'a>(
    source: impl Into<Source<'a>>,
    metadata: Option<&mut Metadata>,
    options: &OpenOptions,
) -> Result<String> {
    DEFAULT_RESOLVER.read(source, metadata, options)
}

// Miette re-exports
#[cfg(feature = "miette")]
pub use error::SourceDiagnostic;

// Internal test modules (see src/tests)
#[cfg(test)]
mod tests;
