//! I/O collaborators: filesystem and network transport.
//!
//! This module provides:
//! - `FileSystem`: Trait for opening files together with their stat
//! - `Transport`: Trait for fetching URLs
//! - Standard implementations (`LocalFs`, `HttpTransport` with the `http` feature)
//! - In-memory implementations for testing

mod input;
mod memory;
mod std_io;
mod transport;

pub use input::{FileStat, FileSystem, OpenedFile};
pub use memory::{CannedResponse, InMemoryFs, InMemoryTransport, RecordedRequest};
pub use std_io::LocalFs;
pub use transport::{FetchError, OfflineTransport, Response, Transport};

// HTTP support
#[cfg(feature = "http")]
mod http;

#[cfg(feature = "http")]
pub use http::HttpTransport;

use std::sync::Arc;

/// The transport used when none is configured.
pub fn default_transport() -> Arc<dyn Transport> {
    #[cfg(feature = "http")]
    {
        Arc::new(HttpTransport::new())
    }
    #[cfg(not(feature = "http"))]
    {
        Arc::new(OfflineTransport)
    }
}
