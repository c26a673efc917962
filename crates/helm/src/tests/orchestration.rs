use crate::gate::{AvailabilityGate, HealthProbe};
use crate::helm::Helm;
use async_trait::async_trait;
use polyfs::memory::{MemoryFsProvider, MemoryTreeProvider};
use polyfs::{FileSystemProvider, Mounts, NodeKind, Router, TreePath};
use sidecar::{FolderProperties, KeyStyle, MemoryStore, Note, SideStoreManager};
use std::sync::Arc;
use std::time::Duration;

fn p(key: &str) -> TreePath {
    TreePath::parse(key).unwrap()
}

struct AlwaysUp;

#[async_trait]
impl HealthProbe for AlwaysUp {
    async fn probe(&self, _base_url: &str) -> bool {
        true
    }
}

async fn seeded_helm() -> Helm {
    let local = Arc::new(MemoryFsProvider::new("local"));
    local.create_directory(&TreePath::root(), "docs").await.unwrap();
    local.create_directory(&p("docs"), "2024").await.unwrap();
    local
        .create_file(&p("docs/2024"), "notes.txt", b"hello")
        .await
        .unwrap();

    let registry = Arc::new(MemoryTreeProvider::new("svc:"));
    registry.add_node(
        "svc:root",
        "services",
        NodeKind::Folder,
        vec![],
    );
    registry.add_node(
        "svc:web",
        "web",
        NodeKind::other("service"),
        vec!["restart".to_string()],
    );
    registry.add_child("svc:root", "svc:web");

    let mut mounts = Mounts::new();
    mounts.mount("local", local).unwrap();

    let mut router = Router::new();
    router.register(registry);

    let mut stores = SideStoreManager::new();
    stores.register("properties", KeyStyle::Path, Arc::new(MemoryStore::new()));
    stores.register(
        "notes",
        KeyStyle::SourceQualified,
        Arc::new(MemoryStore::new()),
    );

    let gate = AvailabilityGate::new(Arc::new(AlwaysUp), Duration::from_secs(300));
    Helm::new(mounts, router, stores, gate)
}

#[tokio::test]
async fn test_contents_cache_and_refresh() {
    let helm = seeded_helm().await;
    let names: Vec<String> = helm
        .contents("local", &p("docs"))
        .await
        .unwrap()
        .into_iter()
        .map(|n| n.name)
        .collect();
    assert_eq!(names, vec!["2024"]);

    // Mutate behind the cache: the stale listing is served until refresh
    let provider = helm.mounts().get("local").unwrap();
    provider.create_directory(&p("docs"), "2025").await.unwrap();
    assert_eq!(helm.contents("local", &p("docs")).await.unwrap().len(), 1);

    helm.refresh("local", &p("docs")).await;
    assert_eq!(helm.contents("local", &p("docs")).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_rename_fans_out_to_stores_and_cache() {
    let helm = seeded_helm().await;
    let properties = helm.stores().store("properties").unwrap();
    properties
        .put_entry(
            "local",
            &p("docs/2024"),
            &FolderProperties {
                icon: Some("calendar".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    helm.stores()
        .store("notes")
        .unwrap()
        .put_entry(
            "local",
            &p("docs/2024"),
            &Note {
                text: "archive".to_string(),
            },
        )
        .await
        .unwrap();

    // Warm the cache so invalidation is observable
    helm.contents("local", &p("docs")).await.unwrap();

    helm.rename("local", &p("docs"), "2024", "archive").await.unwrap();

    let names: Vec<String> = helm
        .contents("local", &p("docs"))
        .await
        .unwrap()
        .into_iter()
        .map(|n| n.name)
        .collect();
    assert_eq!(names, vec!["archive"]);

    let properties = helm.stores().store("properties").unwrap();
    assert_eq!(properties.keys().await.unwrap(), vec!["docs/archive"]);
    assert_eq!(
        helm.stores().store("notes").unwrap().keys().await.unwrap(),
        vec!["local::docs/archive"]
    );
}

#[tokio::test]
async fn test_delete_drops_entries() {
    let helm = seeded_helm().await;
    helm.stores()
        .store("properties")
        .unwrap()
        .put_entry(
            "local",
            &p("docs/2024"),
            &FolderProperties::default(),
        )
        .await
        .unwrap();

    helm.delete("local", &p("docs"), "2024", true).await.unwrap();

    assert!(helm.contents("local", &p("docs")).await.unwrap().is_empty());
    assert!(
        helm.stores()
            .store("properties")
            .unwrap()
            .keys()
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn test_same_mount_move_migrates_entries() {
    let helm = seeded_helm().await;
    let provider = helm.mounts().get("local").unwrap();
    provider
        .create_directory(&TreePath::root(), "attic")
        .await
        .unwrap();
    helm.stores()
        .store("properties")
        .unwrap()
        .put_entry("local", &p("docs/2024"), &FolderProperties::default())
        .await
        .unwrap();

    let outcome = helm
        .move_items("local", &p("docs"), &p("attic"), &["2024".to_string()])
        .await
        .unwrap();
    assert!(outcome.atomic);

    assert_eq!(
        helm.stores()
            .store("properties")
            .unwrap()
            .keys()
            .await
            .unwrap(),
        vec!["attic/2024"]
    );
    assert_eq!(
        helm.read_file("local", &p("attic/2024/notes.txt"))
            .await
            .unwrap(),
        b"hello"
    );
}

#[tokio::test]
async fn test_copy_does_not_migrate_entries() {
    let helm = seeded_helm().await;
    let provider = helm.mounts().get("local").unwrap();
    provider
        .create_directory(&TreePath::root(), "attic")
        .await
        .unwrap();
    helm.stores()
        .store("properties")
        .unwrap()
        .put_entry("local", &p("docs/2024"), &FolderProperties::default())
        .await
        .unwrap();

    helm.copy_items("local", &p("docs"), &p("attic"), &["2024".to_string()])
        .await
        .unwrap();

    // The decoration stays at the source location
    assert_eq!(
        helm.stores()
            .store("properties")
            .unwrap()
            .keys()
            .await
            .unwrap(),
        vec!["docs/2024"]
    );
}

#[tokio::test]
async fn test_registry_routing_through_helm() {
    let helm = seeded_helm().await;
    let children = helm.registry_children("svc:root").await.unwrap();
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].name, "web");

    let result = helm
        .registry_execute("svc:web", "restart", serde_json::json!({}))
        .await
        .unwrap();
    assert_eq!(result["status"], "ok");

    assert!(helm.registry_children("host:db").await.is_err());
}

#[tokio::test]
async fn test_empty_mount_root_lists_empty() {
    let mut mounts = Mounts::new();
    mounts
        .mount("remote", Arc::new(MemoryFsProvider::new("remote")))
        .unwrap();
    let helm = Helm::new(
        mounts,
        Router::new(),
        SideStoreManager::new(),
        AvailabilityGate::new(Arc::new(AlwaysUp), Duration::from_secs(300)),
    );
    assert!(
        helm.contents("remote", &TreePath::root())
            .await
            .unwrap()
            .is_empty()
    );
}
