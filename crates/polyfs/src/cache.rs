use crate::node::Node;
use crate::path::TreePath;
use diagnostics::log_debug;
use std::collections::HashMap;
use tokio::sync::Mutex;

/// The in-memory partial tree, one root per mount.
///
/// Children of a node are fetched once and cached until a mutation or an
/// explicit refresh invalidates the subtree. This layer does not deduplicate
/// concurrent fetches for the same path: both complete and both write, last
/// writer wins. Callers needing single-flight behavior implement it
/// themselves.
#[derive(Default)]
pub struct TreeCache {
    roots: Mutex<HashMap<String, Node>>,
}

fn find_node_mut<'a>(root: &'a mut Node, path: &TreePath) -> Option<&'a mut Node> {
    let mut current = root;
    for segment in path.segments() {
        current = current.child_mut(segment)?;
    }
    Some(current)
}

impl TreeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached children of `path` under `mount`, if that node has completed
    /// a fetch. `Some(vec![])` is a loaded empty folder; `None` means the
    /// caller must fetch.
    pub async fn children(&self, mount: &str, path: &TreePath) -> Option<Vec<Node>> {
        let mut roots = self.roots.lock().await;
        let root = roots.get_mut(mount)?;
        let node = find_node_mut(root, path)?;
        if node.children_loaded {
            node.children.clone()
        } else {
            None
        }
    }

    /// Record a completed fetch of `path`'s children. Intermediate nodes on
    /// the way down are created as unloaded placeholder folders when the
    /// fetch raced ahead of its ancestors.
    pub async fn store_children(&self, mount: &str, path: &TreePath, children: Vec<Node>) {
        let mut roots = self.roots.lock().await;
        let root = roots
            .entry(mount.to_string())
            .or_insert_with(|| Node::folder(mount));
        let mut current = root;
        for segment in path.segments() {
            if current.child(segment).is_none() {
                let placeholder = Node::folder(segment.clone());
                match &mut current.children {
                    Some(existing) => existing.push(placeholder),
                    None => current.children = Some(vec![placeholder]),
                }
            }
            current = current
                .child_mut(segment)
                .unwrap_or_else(|| unreachable!("placeholder inserted above"));
        }
        current.set_children(children);
    }

    /// Mark the subtree at `path` unloaded so the next read refetches.
    /// Invalidating the root drops the whole mount.
    pub async fn invalidate(&self, mount: &str, path: &TreePath) {
        let mut roots = self.roots.lock().await;
        if path.is_root() {
            roots.remove(mount);
            log_debug!("Invalidated mount {mount}");
            return;
        }
        if let Some(root) = roots.get_mut(mount)
            && let Some(node) = find_node_mut(root, path)
        {
            node.unload_children();
            log_debug!("Invalidated subtree {path} under {mount}", path: path.serialize());
        }
    }

    /// Drop every cached tree
    pub async fn clear(&self) {
        self.roots.lock().await.clear();
    }
}
