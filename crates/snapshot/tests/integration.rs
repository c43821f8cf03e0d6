//! Integration tests for snapshot building and persistence

use std::fs;
use std::path::Path;

use driftwatch_snapshot::{SnapshotBuilder, SnapshotStore};
use tempfile::tempdir;

fn write(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

#[tokio::test]
async fn scan_freeze_and_reload_round_trip() {
    let temp = tempdir().unwrap();
    let root = temp.path().join("site-packages");
    write(&root, "requests/__init__.py", "from .api import get\n");
    write(&root, "requests/api.py", "def get(url): ...\n");
    write(&root, "urllib3/__init__.py", "VERSION = '2.0'\n");

    let mut snapshot = SnapshotBuilder::new()
        .scan(&root, &["requests".to_string(), "urllib3".to_string()])
        .await
        .unwrap();
    snapshot.trusted = true;

    let freeze_file = temp.path().join("freeze.json");
    let store = SnapshotStore::new(&freeze_file);
    store.save(&snapshot).await.unwrap();

    let loaded = store.load().await.unwrap();
    assert_eq!(loaded, snapshot);
    assert!(loaded.trusted);
    assert_eq!(loaded.library_count(), 2);
    assert_eq!(loaded.file_count(), 3);
}

#[tokio::test]
async fn freeze_file_outlives_the_scanned_tree() {
    let temp = tempdir().unwrap();
    let root = temp.path().join("site-packages");
    write(&root, "lib/mod.py", "x = 1\n");

    let snapshot = SnapshotBuilder::new()
        .scan(&root, &["lib".to_string()])
        .await
        .unwrap();

    let store = SnapshotStore::new(temp.path().join("freeze.json"));
    store.save(&snapshot).await.unwrap();

    // Deleting the scanned tree must not affect loading
    fs::remove_dir_all(&root).unwrap();
    let loaded = store.load().await.unwrap();
    assert_eq!(loaded.file_count(), 1);
}

#[tokio::test]
async fn rescan_after_no_changes_is_identical() {
    let temp = tempdir().unwrap();
    let root = temp.path().join("site-packages");
    write(&root, "lib/a.py", "a\n");
    write(&root, "lib/sub/b.py", "b\n");

    let builder = SnapshotBuilder::new();
    let names = vec!["lib".to_string()];
    let first = builder.scan(&root, &names).await.unwrap();
    let second = builder.scan(&root, &names).await.unwrap();
    assert_eq!(first, second);
}
