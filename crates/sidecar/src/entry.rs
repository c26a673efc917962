use polyfs::TreePath;
use serde::{Deserialize, Serialize};

/// How a store derives its string key from a mount name and a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyStyle {
    /// The serialized path alone ("docs/2024")
    Path,
    /// `source::key`, where source is the mount name and key is the
    /// remaining path joined by "/" ("local::docs/2024"). Used by notes.
    SourceQualified,
}

impl KeyStyle {
    pub fn key_for(self, mount: &str, path: &TreePath) -> String {
        match self {
            KeyStyle::Path => path.serialize(),
            KeyStyle::SourceQualified => format!("{}::{}", mount, path.serialize()),
        }
    }
}

/// Display properties a user attaches to a folder location
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FolderProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view: Option<String>,
}

/// A free-text note attached to a folder location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub text: String,
}

/// A saved shortcut to a location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bookmark {
    pub label: String,
}
