use crate::error::{Error, Result};
use crate::provider::{FileSystemProvider, TreeProvider};
use diagnostics::log_debug;
use std::sync::Arc;

/// Registration-ordered set of id-addressed providers.
///
/// Given a node id, the first provider whose `can_handle` predicate matches
/// answers it. Registration order is part of the contract: predicates
/// should be mutually exclusive, and when they are not, first-registered
/// wins. The router is an explicitly constructed object passed to callers
/// at startup; there is no ambient global registry.
#[derive(Clone, Default)]
pub struct Router {
    providers: Vec<Arc<dyn TreeProvider>>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, provider: Arc<dyn TreeProvider>) {
        self.providers.push(provider);
    }

    /// First registered provider whose predicate matches `node_id`
    pub fn provider_for(&self, node_id: &str) -> Result<Arc<dyn TreeProvider>> {
        for (index, provider) in self.providers.iter().enumerate() {
            if provider.can_handle(node_id) {
                log_debug!("Routed node id {node_id} to provider #{index}");
                return Ok(provider.clone());
            }
        }
        Err(Error::no_provider(node_id))
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

/// Mount table: the mapping of mount name to the path-addressed provider
/// instance that answers all path queries under that root. Supplied by the
/// embedding layer at construction time.
#[derive(Clone, Default)]
pub struct Mounts {
    entries: Vec<(String, Arc<dyn FileSystemProvider>)>,
}

impl Mounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mount<S: Into<String>>(
        &mut self,
        name: S,
        provider: Arc<dyn FileSystemProvider>,
    ) -> Result<()> {
        let name = name.into();
        if self.entries.iter().any(|(n, _)| *n == name) {
            return Err(Error::conflict(format!("mount {name:?} already exists")));
        }
        self.entries.push((name, provider));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<Arc<dyn FileSystemProvider>> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, p)| p.clone())
            .ok_or_else(|| Error::unknown_mount(name))
    }

    /// Mount names in registration order
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(n, _)| n.as_str()).collect()
    }
}
