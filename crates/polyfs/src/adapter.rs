use crate::error::{Error, Result};
use crate::node::Node;
use crate::path::TreePath;
use crate::provider::{FileSystemProvider, SearchHit, TransferOutcome, TreeProvider};
use async_trait::async_trait;
use diagnostics::log_debug;
use std::collections::VecDeque;
use std::sync::Arc;

/// Cap on nodes visited by a registry search walk
const MAX_SEARCH_NODES: usize = 4096;

/// Bridges an id-addressed [`TreeProvider`] into the path-addressed
/// [`FileSystemProvider`] contract under a chosen mount root id.
///
/// Path resolution walks from the root id one segment at a time, calling
/// `get_children` and scanning linearly by name. That is O(depth ×
/// children-per-level) per call and is intentionally uncached so every call
/// reflects the current registry state; registry trees are shallow and
/// rarely re-walked in a tight loop. Filesystem-scale trees must implement
/// path addressing natively instead of going through this adapter.
///
/// The adapter is read-only: every mutating capability reports
/// `NotSupported`.
pub struct TreeProviderAdapter {
    provider: Arc<dyn TreeProvider>,
    root_id: String,
    root_name: String,
}

impl TreeProviderAdapter {
    pub fn new<S: Into<String>, N: Into<String>>(
        provider: Arc<dyn TreeProvider>,
        root_id: S,
        root_name: N,
    ) -> Self {
        Self {
            provider,
            root_id: root_id.into(),
            root_name: root_name.into(),
        }
    }

    /// Resolve a path to the backing node id. Fails with not-found at the
    /// first segment with no matching child.
    pub async fn resolve_node_id(&self, path: &TreePath) -> Result<String> {
        let mut current = self.root_id.clone();
        for segment in path.segments() {
            let children = self.provider.get_children(&current).await?;
            let next = children
                .iter()
                .find(|child| child.name == *segment)
                .and_then(|child| child.id.clone());
            match next {
                Some(id) => current = id,
                None => return Err(Error::not_found(path.serialize())),
            }
        }
        log_debug!("Resolved path {path} to node id {current}", path: path.serialize());
        Ok(current)
    }

    /// Map registry children into the common node shape. Children are never
    /// eagerly expanded more than one level, which bounds the walk cost.
    fn flatten(children: Vec<Node>) -> Vec<Node> {
        children
            .into_iter()
            .map(|mut child| {
                child.children = None;
                child.children_loaded = false;
                child
            })
            .collect()
    }

    fn read_only<T>(&self, capability: &str) -> Result<T> {
        Err(Error::not_supported(format!(
            "{capability} on read-only registry adapter"
        )))
    }
}

#[async_trait]
impl FileSystemProvider for TreeProviderAdapter {
    async fn get_contents(&self, path: &TreePath) -> Result<Vec<Node>> {
        let id = self.resolve_node_id(path).await?;
        let children = self.provider.get_children(&id).await?;
        Ok(Self::flatten(children))
    }

    async fn get_folder_tree(&self) -> Result<Node> {
        let children = self.provider.get_children(&self.root_id).await?;
        let mut root = Node::folder(self.root_name.clone()).with_id(self.root_id.clone());
        root.set_children(Self::flatten(children));
        Ok(root)
    }

    async fn read_file(&self, _path: &TreePath) -> Result<Vec<u8>> {
        self.read_only("read_file")
    }

    async fn create_directory(&self, _path: &TreePath, _name: &str) -> Result<()> {
        self.read_only("create_directory")
    }

    async fn create_file(&self, _path: &TreePath, _name: &str, _content: &[u8]) -> Result<()> {
        self.read_only("create_file")
    }

    async fn remove_directory(&self, _path: &TreePath, _name: &str) -> Result<()> {
        self.read_only("remove_directory")
    }

    async fn delete_file(&self, _path: &TreePath, _name: &str) -> Result<()> {
        self.read_only("delete_file")
    }

    async fn rename(&self, _path: &TreePath, _old_name: &str, _new_name: &str) -> Result<()> {
        self.read_only("rename")
    }

    async fn move_items(
        &self,
        _source: &TreePath,
        _dest: &TreePath,
        _items: &[String],
    ) -> Result<TransferOutcome> {
        self.read_only("move_items")
    }

    async fn copy_items(
        &self,
        _source: &TreePath,
        _dest: &TreePath,
        _items: &[String],
    ) -> Result<TransferOutcome> {
        self.read_only("copy_items")
    }

    /// Case-insensitive name search over the registry tree, breadth first.
    /// Registry trees are shallow; the visit cap guards against
    /// pathological providers.
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>> {
        let needle = query.to_lowercase();
        let mut hits = Vec::new();
        let mut visited = 0usize;
        let mut queue: VecDeque<(String, TreePath)> = VecDeque::new();
        queue.push_back((self.root_id.clone(), TreePath::root()));

        while let Some((id, path)) = queue.pop_front() {
            if visited >= MAX_SEARCH_NODES {
                break;
            }
            visited += 1;
            for child in Self::flatten(self.provider.get_children(&id).await?) {
                let child_path = path.join(&child.name)?;
                if child.name.to_lowercase().contains(&needle) {
                    hits.push(SearchHit {
                        node: child.clone(),
                        path: child_path.clone(),
                    });
                }
                if let Some(child_id) = child.id.clone() {
                    queue.push_back((child_id, child_path));
                }
            }
        }
        Ok(hits)
    }
}
