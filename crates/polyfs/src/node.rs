use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Kind of a node. Folders and files are the filesystem kinds; registry
/// trees introduce domain-specific leaf kinds at runtime ("host",
/// "service", "lookup", ...), so this is an open set rather than a closed
/// union.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Folder,
    File,
    #[serde(untagged)]
    Other(String),
}

impl NodeKind {
    pub fn other<S: Into<String>>(tag: S) -> Self {
        NodeKind::Other(tag.into())
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, NodeKind::Folder)
    }

    pub fn label(&self) -> &str {
        match self {
            NodeKind::Folder => "folder",
            NodeKind::File => "file",
            NodeKind::Other(tag) => tag,
        }
    }
}

/// One entry in the virtual tree.
///
/// A node's identity is its path from the mount root (concatenated ancestor
/// names); `id` is an opaque backend identifier that only id-addressed
/// providers are required to supply. `metadata` is carried from the backend
/// and passed through uninterpreted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub name: String,
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Present only once children have been fetched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Node>>,
    /// False until a fetch has completed; a folder must not be assumed
    /// empty until this is true
    #[serde(default)]
    pub children_loaded: bool,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
}

impl Node {
    pub fn new<S: Into<String>>(name: S, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            id: None,
            children: None,
            children_loaded: false,
            metadata: Map::new(),
        }
    }

    pub fn folder<S: Into<String>>(name: S) -> Self {
        Self::new(name, NodeKind::Folder)
    }

    pub fn file<S: Into<String>>(name: S) -> Self {
        Self::new(name, NodeKind::File)
    }

    pub fn with_id<S: Into<String>>(mut self, id: S) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_metadata<S: Into<String>>(mut self, key: S, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Record a completed children fetch. An empty vector is a real result,
    /// distinct from never having fetched.
    pub fn set_children(&mut self, children: Vec<Node>) {
        self.children = Some(children);
        self.children_loaded = true;
    }

    /// Drop any loaded children so the next read refetches
    pub fn unload_children(&mut self) {
        self.children = None;
        self.children_loaded = false;
    }

    /// Loaded child by name; None when unloaded or absent
    pub fn child(&self, name: &str) -> Option<&Node> {
        self.children
            .as_deref()
            .and_then(|children| children.iter().find(|c| c.name == name))
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut Node> {
        self.children
            .as_deref_mut()
            .and_then(|children| children.iter_mut().find(|c| c.name == name))
    }
}
