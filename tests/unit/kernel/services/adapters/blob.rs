use super::*;

#[test]
fn test_memory_store_counts_writes() {
    let mut store = MemoryBlobStore::new();
    assert_eq!(store.get("k").unwrap(), None);

    store.set("k", "v1").unwrap();
    store.set("k", "v2").unwrap();

    assert_eq!(store.get("k").unwrap().as_deref(), Some("v2"));
    assert_eq!(store.writes(), 2);
}

#[test]
fn test_file_store_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = FileBlobStore::new(dir.path().join("nested"));

    assert_eq!(store.get("dsa-studio-storage").unwrap(), None);
    store.set("dsa-studio-storage", "payload").unwrap();
    store.set("dsa-studio-storage", "payload-2").unwrap();

    assert_eq!(
        store.get("dsa-studio-storage").unwrap().as_deref(),
        Some("payload-2")
    );
    assert!(dir.path().join("nested/dsa-studio-storage.blob").is_file());
}

#[test]
fn test_file_store_leaves_no_temp_files() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = FileBlobStore::new(dir.path());
    store.set("a", "1").unwrap();

    let names: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    assert_eq!(names, vec!["a.blob".to_string()]);
}

#[test]
fn test_file_store_rejects_path_like_keys() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = FileBlobStore::new(dir.path());

    for key in ["", "../escape", ".hidden", "a/b"] {
        assert!(matches!(
            store.set(key, "x"),
            Err(BlobStoreError::InvalidKey(_))
        ));
    }
}
