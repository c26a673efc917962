use crate::error::Result;
use crate::node::Node;
use crate::path::TreePath;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// A search result, flattened out of hierarchy: carries the full path from
/// the mount root alongside the node itself.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub node: Node,
    pub path: TreePath,
}

/// Result of a multi-item move or copy.
///
/// Providers that cannot apply the batch atomically must say so here
/// rather than silently degrading; `atomic == false` means the guarantee
/// is best-effort and `transferred` lists what actually landed.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferOutcome {
    pub transferred: Vec<String>,
    pub atomic: bool,
}

impl TransferOutcome {
    pub fn atomic(items: &[String]) -> Self {
        Self {
            transferred: items.to_vec(),
            atomic: true,
        }
    }
}

/// The path-addressed capability contract implemented by filesystem-shaped
/// backends (local pseudo-filesystem, remote broker filesystem) and by the
/// adapter over id-addressed trees.
///
/// Failure model: an unimplemented capability reports
/// [`Error::NotSupported`](crate::Error::NotSupported), which is permanent
/// for the provider instance; transport problems report
/// [`Error::Io`](crate::Error::Io), which is retryable.
#[async_trait]
pub trait FileSystemProvider: Send + Sync {
    /// Direct children of `path`, never recursive
    async fn get_contents(&self, path: &TreePath) -> Result<Vec<Node>>;

    /// The mount root with its first level of children loaded
    /// (`children_loaded = true` on the root), deeper levels unloaded
    async fn get_folder_tree(&self) -> Result<Node>;

    /// File content at `path`
    async fn read_file(&self, path: &TreePath) -> Result<Vec<u8>>;

    async fn create_directory(&self, path: &TreePath, name: &str) -> Result<()>;

    async fn create_file(&self, path: &TreePath, name: &str, content: &[u8]) -> Result<()>;

    async fn remove_directory(&self, path: &TreePath, name: &str) -> Result<()>;

    async fn delete_file(&self, path: &TreePath, name: &str) -> Result<()>;

    /// Rename one child of `path`. The backend either applies the rename or
    /// leaves the tree untouched; the side-store cascade is sequenced by the
    /// orchestration layer after this returns success.
    async fn rename(&self, path: &TreePath, old_name: &str, new_name: &str) -> Result<()>;

    /// Move the named items from `source` to `dest` in one call
    async fn move_items(
        &self,
        source: &TreePath,
        dest: &TreePath,
        items: &[String],
    ) -> Result<TransferOutcome>;

    /// Copy the named items from `source` to `dest` in one call
    async fn copy_items(
        &self,
        source: &TreePath,
        dest: &TreePath,
        items: &[String],
    ) -> Result<TransferOutcome>;

    async fn search(&self, query: &str) -> Result<Vec<SearchHit>>;
}

/// Callback invoked with the id of a changed node
pub type ChangeCallback = Arc<dyn Fn(&str) + Send + Sync>;

/// Handle for an optional push channel. Providers with no push support
/// return [`Subscription::noop`]; callers must not rely on it firing and
/// must still poll or refresh explicitly.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn noop() -> Self {
        Self { cancel: None }
    }

    pub fn new<F: FnOnce() + Send + 'static>(cancel: F) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Subscription({})",
            if self.cancel.is_some() { "live" } else { "noop" }
        )
    }
}

/// The id-addressed capability contract implemented by registry-style trees
/// (hosts, services, lookups). Nodes are addressed by their own opaque id;
/// the adapter bridges this into the path world.
#[async_trait]
pub trait TreeProvider: Send + Sync {
    /// Pure, side-effect-free predicate. The router asks registered
    /// providers in registration order and takes the first match.
    fn can_handle(&self, node_id: &str) -> bool;

    /// Children of the node with this id
    async fn get_children(&self, node_id: &str) -> Result<Vec<Node>>;

    /// Open-ended command channel; the operation vocabulary is
    /// provider-specific and not type-checked by the router
    async fn execute_operation(
        &self,
        node_id: &str,
        operation: &str,
        params: Value,
    ) -> Result<Value>;

    /// Operations `execute_operation` accepts for this node; may
    /// legitimately be empty
    async fn available_operations(&self, node_id: &str) -> Result<Vec<String>>;

    /// Optional push channel; the default is a no-op subscription
    fn watch_changes(&self, node_id: &str, callback: ChangeCallback) -> Subscription {
        let _ = (node_id, callback);
        Subscription::noop()
    }
}
