use crate::error::{Error, Result};
use crate::node::{Node, NodeKind};
use crate::provider::TreeProvider;
use async_trait::async_trait;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Debug, Clone)]
struct RegistryEntry {
    name: String,
    kind: NodeKind,
    children: Vec<String>,
    operations: Vec<String>,
    metadata: serde_json::Map<String, Value>,
}

/// Id-addressed registry tree held in a HashMap.
///
/// `can_handle` matches ids beginning with the configured prefix, the
/// convention registry backends use to namespace their object ids
/// (`host:...`, `svc:...`). Executed operations are recorded so tests can
/// assert on the command channel.
pub struct MemoryTreeProvider {
    prefix: String,
    entries: Mutex<HashMap<String, RegistryEntry>>,
    executed: Mutex<Vec<(String, String)>>,
}

impl MemoryTreeProvider {
    pub fn new<S: Into<String>>(prefix: S) -> Self {
        Self {
            prefix: prefix.into(),
            entries: Mutex::new(HashMap::new()),
            executed: Mutex::new(Vec::new()),
        }
    }

    pub fn add_node<I, N>(&self, id: I, name: N, kind: NodeKind, operations: Vec<String>)
    where
        I: Into<String>,
        N: Into<String>,
    {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(
            id.into(),
            RegistryEntry {
                name: name.into(),
                kind,
                children: Vec::new(),
                operations,
                metadata: serde_json::Map::new(),
            },
        );
    }

    pub fn set_metadata(&self, id: &str, key: &str, value: Value) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(entry) = entries.get_mut(id) {
            entry.metadata.insert(key.to_string(), value);
        }
    }

    pub fn add_child(&self, parent_id: &str, child_id: &str) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(parent) = entries.get_mut(parent_id) {
            parent.children.push(child_id.to_string());
        }
    }

    /// Operations executed so far, as (node id, operation) pairs
    pub fn executed(&self) -> Vec<(String, String)> {
        self.executed
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl TreeProvider for MemoryTreeProvider {
    fn can_handle(&self, node_id: &str) -> bool {
        node_id.starts_with(&self.prefix)
    }

    async fn get_children(&self, node_id: &str) -> Result<Vec<Node>> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let entry = entries
            .get(node_id)
            .ok_or_else(|| Error::not_found(node_id))?;
        Ok(entry
            .children
            .iter()
            .filter_map(|child_id| {
                entries.get(child_id).map(|child| {
                    let mut node =
                        Node::new(child.name.clone(), child.kind.clone()).with_id(child_id);
                    node.metadata = child.metadata.clone();
                    node
                })
            })
            .collect())
    }

    async fn execute_operation(
        &self,
        node_id: &str,
        operation: &str,
        _params: Value,
    ) -> Result<Value> {
        let supported = {
            let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
            let entry = entries
                .get(node_id)
                .ok_or_else(|| Error::not_found(node_id))?;
            entry.operations.iter().any(|op| op == operation)
        };
        if !supported {
            return Err(Error::not_supported(format!(
                "operation {operation:?} on {node_id}"
            )));
        }
        self.executed
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((node_id.to_string(), operation.to_string()));
        Ok(json!({ "status": "ok" }))
    }

    async fn available_operations(&self, node_id: &str) -> Result<Vec<String>> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let entry = entries
            .get(node_id)
            .ok_or_else(|| Error::not_found(node_id))?;
        Ok(entry.operations.clone())
    }
}
