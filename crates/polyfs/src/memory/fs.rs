use crate::error::{Error, Result};
use crate::node::Node;
use crate::path::TreePath;
use crate::provider::{FileSystemProvider, SearchHit, TransferOutcome};
use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::Mutex;

/// One entry in the in-memory tree
#[derive(Debug, Clone)]
enum MemNode {
    Folder(BTreeMap<String, MemNode>),
    File(Vec<u8>),
}

impl MemNode {
    fn as_folder(&self) -> Option<&BTreeMap<String, MemNode>> {
        match self {
            MemNode::Folder(entries) => Some(entries),
            MemNode::File(_) => None,
        }
    }

    fn as_folder_mut(&mut self) -> Option<&mut BTreeMap<String, MemNode>> {
        match self {
            MemNode::Folder(entries) => Some(entries),
            MemNode::File(_) => None,
        }
    }

    fn to_node(&self, name: &str) -> Node {
        match self {
            MemNode::Folder(_) => Node::folder(name),
            MemNode::File(_) => Node::file(name),
        }
    }
}

/// Path-addressed provider backed by a BTreeMap tree.
pub struct MemoryFsProvider {
    root_name: String,
    root: Mutex<MemNode>,
}

fn resolve<'a>(root: &'a MemNode, path: &TreePath) -> Result<&'a MemNode> {
    let mut current = root;
    for segment in path.segments() {
        let entries = current
            .as_folder()
            .ok_or_else(|| Error::conflict(format!("{segment:?} is not inside a folder")))?;
        current = entries
            .get(segment)
            .ok_or_else(|| Error::not_found(path.serialize()))?;
    }
    Ok(current)
}

fn resolve_folder_mut<'a>(
    root: &'a mut MemNode,
    path: &TreePath,
) -> Result<&'a mut BTreeMap<String, MemNode>> {
    let mut current = root;
    for segment in path.segments() {
        let entries = current
            .as_folder_mut()
            .ok_or_else(|| Error::conflict(format!("{segment:?} is not inside a folder")))?;
        current = entries
            .get_mut(segment)
            .ok_or_else(|| Error::not_found(path.serialize()))?;
    }
    current
        .as_folder_mut()
        .ok_or_else(|| Error::conflict(format!("{} is not a folder", path.serialize())))
}

fn collect_hits(entries: &BTreeMap<String, MemNode>, path: &TreePath, needle: &str, hits: &mut Vec<SearchHit>) {
    for (name, entry) in entries {
        // Names come from TreePath-validated inserts, so join cannot fail
        let Ok(child_path) = path.join(name) else {
            continue;
        };
        if name.to_lowercase().contains(needle) {
            hits.push(SearchHit {
                node: entry.to_node(name),
                path: child_path.clone(),
            });
        }
        if let MemNode::Folder(children) = entry {
            collect_hits(children, &child_path, needle, hits);
        }
    }
}

impl MemoryFsProvider {
    pub fn new<S: Into<String>>(root_name: S) -> Self {
        Self {
            root_name: root_name.into(),
            root: Mutex::new(MemNode::Folder(BTreeMap::new())),
        }
    }

    async fn insert(&self, path: &TreePath, name: &str, node: MemNode) -> Result<()> {
        let mut root = self.root.lock().await;
        let entries = resolve_folder_mut(&mut root, path)?;
        if entries.contains_key(name) {
            return Err(Error::conflict(format!(
                "{} already exists under {}",
                name,
                path.serialize()
            )));
        }
        entries.insert(name.to_string(), node);
        Ok(())
    }

    async fn remove(&self, path: &TreePath, name: &str, want_folder: bool) -> Result<()> {
        let mut root = self.root.lock().await;
        let entries = resolve_folder_mut(&mut root, path)?;
        let full = || format!("{}/{}", path.serialize(), name);
        match entries.get(name) {
            None => Err(Error::not_found(full())),
            Some(MemNode::Folder(_)) if !want_folder => {
                Err(Error::conflict(format!("{} is a folder", full())))
            }
            Some(MemNode::File(_)) if want_folder => {
                Err(Error::conflict(format!("{} is a file", full())))
            }
            Some(_) => {
                entries.remove(name);
                Ok(())
            }
        }
    }

    /// Validate-then-apply so the batch is all-or-nothing as observed
    /// through subsequent reads.
    async fn transfer(
        &self,
        source: &TreePath,
        dest: &TreePath,
        items: &[String],
        remove_source: bool,
    ) -> Result<TransferOutcome> {
        let mut root = self.root.lock().await;

        {
            let source_entries = resolve(&root, source)?
                .as_folder()
                .ok_or_else(|| Error::conflict(format!("{} is not a folder", source.serialize())))?;
            let dest_entries = resolve(&root, dest)?
                .as_folder()
                .ok_or_else(|| Error::conflict(format!("{} is not a folder", dest.serialize())))?;
            for item in items {
                if !source_entries.contains_key(item) {
                    return Err(Error::not_found(format!("{}/{}", source.serialize(), item)));
                }
                if dest_entries.contains_key(item) {
                    return Err(Error::conflict(format!("{}/{}", dest.serialize(), item)));
                }
                let item_path = source.join(item)?;
                if dest.starts_with(&item_path) {
                    return Err(Error::conflict(format!(
                        "cannot transfer {} into itself",
                        item_path.serialize()
                    )));
                }
            }
        }

        for item in items {
            let taken = {
                let source_entries = resolve_folder_mut(&mut root, source)?;
                if remove_source {
                    source_entries
                        .remove(item)
                        .ok_or_else(|| Error::not_found(item.clone()))?
                } else {
                    source_entries
                        .get(item)
                        .cloned()
                        .ok_or_else(|| Error::not_found(item.clone()))?
                }
            };
            let dest_entries = resolve_folder_mut(&mut root, dest)?;
            dest_entries.insert(item.clone(), taken);
        }
        Ok(TransferOutcome::atomic(items))
    }
}

#[async_trait]
impl FileSystemProvider for MemoryFsProvider {
    async fn get_contents(&self, path: &TreePath) -> Result<Vec<Node>> {
        let root = self.root.lock().await;
        let entries = resolve(&root, path)?
            .as_folder()
            .ok_or_else(|| Error::conflict(format!("{} is not a folder", path.serialize())))?;
        Ok(entries
            .iter()
            .map(|(name, entry)| entry.to_node(name))
            .collect())
    }

    async fn get_folder_tree(&self) -> Result<Node> {
        let children = self.get_contents(&TreePath::root()).await?;
        let mut root = Node::folder(self.root_name.clone());
        root.set_children(children);
        Ok(root)
    }

    async fn read_file(&self, path: &TreePath) -> Result<Vec<u8>> {
        let root = self.root.lock().await;
        match resolve(&root, path)? {
            MemNode::File(content) => Ok(content.clone()),
            MemNode::Folder(_) => Err(Error::conflict(format!(
                "{} is a folder",
                path.serialize()
            ))),
        }
    }

    async fn create_directory(&self, path: &TreePath, name: &str) -> Result<()> {
        self.insert(path, name, MemNode::Folder(BTreeMap::new()))
            .await
    }

    async fn create_file(&self, path: &TreePath, name: &str, content: &[u8]) -> Result<()> {
        self.insert(path, name, MemNode::File(content.to_vec()))
            .await
    }

    async fn remove_directory(&self, path: &TreePath, name: &str) -> Result<()> {
        self.remove(path, name, true).await
    }

    async fn delete_file(&self, path: &TreePath, name: &str) -> Result<()> {
        self.remove(path, name, false).await
    }

    async fn rename(&self, path: &TreePath, old_name: &str, new_name: &str) -> Result<()> {
        let mut root = self.root.lock().await;
        let entries = resolve_folder_mut(&mut root, path)?;
        if entries.contains_key(new_name) {
            return Err(Error::conflict(format!(
                "{}/{} already exists",
                path.serialize(),
                new_name
            )));
        }
        let entry = entries
            .remove(old_name)
            .ok_or_else(|| Error::not_found(format!("{}/{}", path.serialize(), old_name)))?;
        entries.insert(new_name.to_string(), entry);
        Ok(())
    }

    async fn move_items(
        &self,
        source: &TreePath,
        dest: &TreePath,
        items: &[String],
    ) -> Result<TransferOutcome> {
        self.transfer(source, dest, items, true).await
    }

    async fn copy_items(
        &self,
        source: &TreePath,
        dest: &TreePath,
        items: &[String],
    ) -> Result<TransferOutcome> {
        self.transfer(source, dest, items, false).await
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchHit>> {
        let root = self.root.lock().await;
        let entries = root
            .as_folder()
            .ok_or_else(|| Error::io("root is not a folder"))?;
        let mut hits = Vec::new();
        collect_hits(entries, &TreePath::root(), &query.to_lowercase(), &mut hits);
        Ok(hits)
    }
}
