//! Builder for creating Resolver instances.

use std::sync::Arc;

use crate::io::{FileSystem, LocalFs, OfflineTransport, Transport, default_transport};
use crate::resolver::Resolver;

/// Assembles a [`Resolver`] from its collaborators.
///
/// Anything left unset falls back to the local filesystem and the default
/// transport (HTTP when the `http` feature is enabled).
#[derive(Debug, Default)]
pub struct ResolverBuilder {
    filesystem: Option<Arc<dyn FileSystem>>,
    transport: Option<Arc<dyn Transport>>,
}

impl ResolverBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filesystem(self, filesystem: impl FileSystem + 'static) -> Self {
        self.with_shared_filesystem(Arc::new(filesystem))
    }

    /// Use a filesystem that is also held elsewhere, e.g. an `InMemoryFs`
    /// whose access counter a test inspects.
    pub fn with_shared_filesystem(mut self, filesystem: Arc<dyn FileSystem>) -> Self {
        self.filesystem = Some(filesystem);
        self
    }

    pub fn with_transport(self, transport: impl Transport + 'static) -> Self {
        self.with_shared_transport(Arc::new(transport))
    }

    pub fn with_shared_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Refuse every URL without touching the network.
    pub fn offline(self) -> Self {
        self.with_transport(OfflineTransport)
    }

    pub fn build(self) -> Resolver {
        let filesystem = self
            .filesystem
            .unwrap_or_else(|| Arc::new(LocalFs::new()));
        let transport = self.transport.unwrap_or_else(default_transport);
        Resolver::new(filesystem, transport)
    }
}
