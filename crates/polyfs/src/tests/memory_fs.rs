use super::p;
use crate::memory::MemoryFsProvider;
use crate::{Error, FileSystemProvider, TreePath};

async fn seeded() -> MemoryFsProvider {
    let fs = MemoryFsProvider::new("local");
    let root = TreePath::root();
    fs.create_directory(&root, "docs").await.unwrap();
    fs.create_directory(&p("docs"), "2024").await.unwrap();
    fs.create_file(&p("docs/2024"), "notes.txt", b"hello")
        .await
        .unwrap();
    fs.create_directory(&root, "images").await.unwrap();
    fs
}

#[tokio::test]
async fn test_empty_root_lists_empty() {
    // A freshly constructed provider with zero files returns an empty
    // sequence for the root, not an error.
    let fs = MemoryFsProvider::new("local");
    assert_eq!(fs.get_contents(&TreePath::root()).await.unwrap(), vec![]);
}

#[tokio::test]
async fn test_contents_are_direct_children_only() {
    let fs = seeded().await;
    let names: Vec<String> = fs
        .get_contents(&p("docs"))
        .await
        .unwrap()
        .into_iter()
        .map(|n| n.name)
        .collect();
    assert_eq!(names, vec!["2024"]);
}

#[tokio::test]
async fn test_folder_tree_first_level() {
    let fs = seeded().await;
    let root = fs.get_folder_tree().await.unwrap();
    assert!(root.children_loaded);
    let names: Vec<String> = root
        .children
        .unwrap()
        .into_iter()
        .map(|n| n.name)
        .collect();
    assert_eq!(names, vec!["docs", "images"]);
}

#[tokio::test]
async fn test_read_and_missing_files() {
    let fs = seeded().await;
    assert_eq!(
        fs.read_file(&p("docs/2024/notes.txt")).await.unwrap(),
        b"hello"
    );
    assert!(matches!(
        fs.read_file(&p("docs/2024/absent.txt")).await,
        Err(Error::NotFound(_))
    ));
    assert!(matches!(
        fs.read_file(&p("docs")).await,
        Err(Error::Conflict(_))
    ));
}

#[tokio::test]
async fn test_create_conflicts() {
    let fs = seeded().await;
    assert!(matches!(
        fs.create_directory(&TreePath::root(), "docs").await,
        Err(Error::Conflict(_))
    ));
    assert!(matches!(
        fs.create_file(&p("missing"), "a.txt", b"").await,
        Err(Error::NotFound(_))
    ));
}

#[tokio::test]
async fn test_delete_kind_checks() {
    let fs = seeded().await;
    assert!(matches!(
        fs.delete_file(&p("docs"), "2024").await,
        Err(Error::Conflict(_))
    ));
    fs.remove_directory(&p("docs"), "2024").await.unwrap();
    assert!(matches!(
        fs.get_contents(&p("docs/2024")).await,
        Err(Error::NotFound(_))
    ));
}

#[tokio::test]
async fn test_rename_conflict_leaves_tree_untouched() {
    let fs = seeded().await;
    fs.create_directory(&p("docs"), "archive").await.unwrap();
    assert!(matches!(
        fs.rename(&p("docs"), "2024", "archive").await,
        Err(Error::Conflict(_))
    ));
    // Nothing moved
    let names: Vec<String> = fs
        .get_contents(&p("docs"))
        .await
        .unwrap()
        .into_iter()
        .map(|n| n.name)
        .collect();
    assert_eq!(names, vec!["2024", "archive"]);
}

#[tokio::test]
async fn test_move_items_all_or_nothing() {
    let fs = seeded().await;
    fs.create_file(&p("docs"), "a.txt", b"a").await.unwrap();
    fs.create_file(&p("docs"), "b.txt", b"b").await.unwrap();

    // One missing item fails the whole batch
    let err = fs
        .move_items(
            &p("docs"),
            &p("images"),
            &["a.txt".to_string(), "missing.txt".to_string()],
        )
        .await
        .err()
        .unwrap();
    assert!(matches!(err, Error::NotFound(_)));
    assert_eq!(fs.get_contents(&p("images")).await.unwrap(), vec![]);

    let outcome = fs
        .move_items(
            &p("docs"),
            &p("images"),
            &["a.txt".to_string(), "b.txt".to_string()],
        )
        .await
        .unwrap();
    assert!(outcome.atomic);
    assert_eq!(outcome.transferred.len(), 2);
    assert_eq!(fs.get_contents(&p("images")).await.unwrap().len(), 2);
    assert!(fs.read_file(&p("docs/a.txt")).await.is_err());
}

#[tokio::test]
async fn test_copy_items_keeps_source() {
    let fs = seeded().await;
    fs.copy_items(&p("docs"), &p("images"), &["2024".to_string()])
        .await
        .unwrap();
    assert_eq!(
        fs.read_file(&p("images/2024/notes.txt")).await.unwrap(),
        b"hello"
    );
    assert_eq!(
        fs.read_file(&p("docs/2024/notes.txt")).await.unwrap(),
        b"hello"
    );
}

#[tokio::test]
async fn test_search_flattens_hierarchy() {
    let fs = seeded().await;
    let hits = fs.search("notes").await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].path, p("docs/2024/notes.txt"));

    // Case-insensitive
    let hits = fs.search("DOCS").await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].path, p("docs"));
}
