//! polyfs: a virtual-filesystem / tree-provider routing layer.
//!
//! Heterogeneous backends (a local pseudo-filesystem, a remote filesystem
//! behind a broker, registry-style trees of infrastructure objects) are
//! composed into one lazily-loaded, path-addressed hierarchy:
//!
//! - [`TreePath`] is the universal cross-provider key: an ordered sequence
//!   of segments from a mount root, with a canonical string serialization.
//! - [`FileSystemProvider`] is the path-addressed capability contract;
//!   [`TreeProvider`] is the id-addressed one, bridged into the path world
//!   by [`TreeProviderAdapter`].
//! - [`Router`] selects an id-addressed provider by its `can_handle`
//!   predicate, first-registered match winning; [`Mounts`] maps mount names
//!   to path-addressed provider instances.
//! - [`TreeCache`] materializes the tree lazily, one children-fetch at a
//!   time, until a mutation or refresh invalidates a subtree.
//!
//! Side-store consistency (the rename/delete cascade) and availability
//! gating live in the `sidecar` and `helm` crates layered on top.

mod adapter;
mod cache;
mod error;
pub mod memory;
mod node;
mod path;
mod provider;
mod router;

pub use adapter::TreeProviderAdapter;
pub use cache::TreeCache;
pub use error::{Error, Result};
pub use node::{Node, NodeKind};
pub use path::{SEPARATOR, TreePath};
pub use provider::{
    ChangeCallback, FileSystemProvider, SearchHit, Subscription, TransferOutcome, TreeProvider,
};
pub use router::{Mounts, Router};

#[cfg(test)]
mod tests;
