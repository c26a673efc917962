//! sidecar: path-keyed side stores and their rename/delete cascade.
//!
//! Side stores decorate tree *locations* (folder display properties,
//! per-folder notes, bookmarks), keyed by the serialized path. Their
//! entries live independently of the nodes they decorate and are kept
//! consistent with the namespace by cascading renames and deletes over
//! every key under the affected prefix.

mod entry;
mod error;
mod manager;
mod store;

pub use entry::{Bookmark, FolderProperties, KeyStyle, Note};
pub use error::{Error, Result};
pub use manager::{SideStore, SideStoreManager};
pub use store::{FlakyStore, KeyValueStore, MemoryStore};
