use super::p;
use crate::memory::MemoryTreeProvider;
use crate::{Error, FileSystemProvider, NodeKind, TreePath, TreeProviderAdapter};
use std::sync::Arc;

fn registry() -> Arc<MemoryTreeProvider> {
    // root -> "a" -> "b", plus a service leaf under "a"
    let registry = Arc::new(MemoryTreeProvider::new("reg:"));
    registry.add_node("reg:root", "infra", NodeKind::Folder, vec![]);
    registry.add_node("reg:a", "a", NodeKind::Folder, vec![]);
    registry.add_node("reg:b", "b", NodeKind::Folder, vec![]);
    registry.add_node(
        "reg:web",
        "web-frontend",
        NodeKind::other("service"),
        vec!["restart".to_string()],
    );
    registry.add_child("reg:root", "reg:a");
    registry.add_child("reg:a", "reg:b");
    registry.add_child("reg:a", "reg:web");
    registry
}

fn adapter() -> TreeProviderAdapter {
    TreeProviderAdapter::new(registry(), "reg:root", "infra")
}

#[tokio::test]
async fn test_resolve_node_id() {
    let adapter = adapter();
    assert_eq!(adapter.resolve_node_id(&p("a/b")).await.unwrap(), "reg:b");
    assert_eq!(
        adapter.resolve_node_id(&TreePath::root()).await.unwrap(),
        "reg:root"
    );
}

#[tokio::test]
async fn test_resolve_missing_segment_is_not_found() {
    let adapter = adapter();
    assert_eq!(
        adapter.resolve_node_id(&p("a/missing")).await.err(),
        Some(Error::not_found("a/missing"))
    );
    // A miss at the first segment fails the same way, never partially
    assert!(matches!(
        adapter.resolve_node_id(&p("zzz/b")).await,
        Err(Error::NotFound(_))
    ));
}

#[tokio::test]
async fn test_contents_are_one_level_unloaded() {
    let adapter = adapter();
    let children = adapter.get_contents(&p("a")).await.unwrap();
    assert_eq!(children.len(), 2);
    for child in &children {
        assert!(!child.children_loaded);
        assert!(child.children.is_none());
        assert!(child.id.is_some());
    }
}

#[tokio::test]
async fn test_folder_tree_loads_first_level_only() {
    let adapter = adapter();
    let root = adapter.get_folder_tree().await.unwrap();
    assert_eq!(root.name, "infra");
    assert!(root.children_loaded);
    let children = root.children.unwrap();
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].name, "a");
    assert!(!children[0].children_loaded);
}

#[tokio::test]
async fn test_writes_are_not_supported() {
    let adapter = adapter();
    assert!(matches!(
        adapter.create_directory(&p("a"), "new").await,
        Err(Error::NotSupported(_))
    ));
    assert!(matches!(
        adapter.rename(&p("a"), "b", "c").await,
        Err(Error::NotSupported(_))
    ));
    assert!(matches!(
        adapter.delete_file(&p("a"), "b").await,
        Err(Error::NotSupported(_))
    ));
}

#[tokio::test]
async fn test_search_carries_full_paths() {
    let adapter = adapter();
    let hits = adapter.search("web").await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].node.name, "web-frontend");
    assert_eq!(hits[0].path, p("a/web-frontend"));
}

#[tokio::test]
async fn test_walk_reflects_registry_changes() {
    // The resolution walk is uncached: a node added after a first walk is
    // visible to the next one.
    let registry = registry();
    let adapter = TreeProviderAdapter::new(registry.clone(), "reg:root", "infra");

    assert!(adapter.resolve_node_id(&p("a/c")).await.is_err());

    registry.add_node("reg:c", "c", NodeKind::Folder, vec![]);
    registry.add_child("reg:a", "reg:c");
    assert_eq!(adapter.resolve_node_id(&p("a/c")).await.unwrap(), "reg:c");
}
