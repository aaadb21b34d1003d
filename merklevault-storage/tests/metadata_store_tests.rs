use merklevault_storage::{FileMetadataStore, FileRecord, MemoryMetadataStore, StorageError};
use pretty_assertions::assert_eq;

fn record(owner: &str, name: &str, hash: &str) -> FileRecord {
    FileRecord::new(owner, name, hash, false)
}

#[tokio::test]
async fn insert_and_get_by_id() {
    let store = MemoryMetadataStore::new();
    let rec = record("alice", "notes.txt", "h1");
    let id = rec.id.clone();

    store.insert(rec.clone()).await.unwrap();
    assert_eq!(store.get_by_id(&id).await.unwrap(), Some(rec));
}

#[tokio::test]
async fn get_by_name_scoped_to_owner() {
    let store = MemoryMetadataStore::new();
    store.insert(record("alice", "notes.txt", "h1")).await.unwrap();
    store.insert(record("bob", "notes.txt", "h2")).await.unwrap();

    let found = store.get_by_name("alice", "notes.txt").await.unwrap().unwrap();
    assert_eq!(found.owner, "alice");
    assert_eq!(found.content_hash, "h1");

    assert!(store.get_by_name("carol", "notes.txt").await.unwrap().is_none());
}

#[tokio::test]
async fn list_by_owner_excludes_other_owners() {
    let store = MemoryMetadataStore::new();
    store.insert(record("alice", "a.txt", "h1")).await.unwrap();
    store.insert(record("alice", "b.txt", "h2")).await.unwrap();
    store.insert(record("bob", "c.txt", "h3")).await.unwrap();

    let files = store.list_by_owner("alice").await.unwrap();
    assert_eq!(files.len(), 2);
    assert!(files.iter().all(|f| f.owner == "alice"));
}

#[tokio::test]
async fn list_by_folder_filters_folder_id() {
    let store = MemoryMetadataStore::new();
    let mut in_folder = record("alice", "a.txt", "h1");
    in_folder.folder_id = Some("docs".into());
    store.insert(in_folder).await.unwrap();
    store.insert(record("alice", "b.txt", "h2")).await.unwrap();

    let files = store.list_by_folder("alice", "docs").await.unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].name, "a.txt");
}

#[tokio::test]
async fn search_is_case_insensitive_substring() {
    let store = MemoryMetadataStore::new();
    store.insert(record("alice", "Vacation-Photos.zip", "h1")).await.unwrap();
    store.insert(record("alice", "taxes.pdf", "h2")).await.unwrap();
    store.insert(record("bob", "photos.zip", "h3")).await.unwrap();

    let hits = store.search_by_name("alice", "photo").await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "Vacation-Photos.zip");
}

#[tokio::test]
async fn update_replaces_record_with_same_id() {
    let store = MemoryMetadataStore::new();
    let mut rec = record("alice", "a.txt", "h1");
    store.insert(rec.clone()).await.unwrap();

    rec.folder_id = Some("docs".into());
    store.update(rec.clone()).await.unwrap();

    let stored = store.get_by_id(&rec.id).await.unwrap().unwrap();
    assert_eq!(stored.folder_id.as_deref(), Some("docs"));
}

#[tokio::test]
async fn update_unknown_id_is_not_found() {
    let store = MemoryMetadataStore::new();
    let err = store.update(record("alice", "a.txt", "h1")).await.unwrap_err();
    assert!(matches!(err, StorageError::NotFound(_)));
}

#[tokio::test]
async fn remove_deletes_and_second_remove_fails() {
    let store = MemoryMetadataStore::new();
    let rec = record("alice", "a.txt", "h1");
    let id = rec.id.clone();
    store.insert(rec).await.unwrap();

    store.remove(&id).await.unwrap();
    assert!(store.get_by_id(&id).await.unwrap().is_none());
    assert!(matches!(
        store.remove(&id).await.unwrap_err(),
        StorageError::NotFound(_)
    ));
}

#[tokio::test]
async fn dedup_count_excludes_requesting_owner() {
    let store = MemoryMetadataStore::new();
    store.insert(record("alice", "a.txt", "shared")).await.unwrap();
    store.insert(record("bob", "b.txt", "shared")).await.unwrap();

    // Alice asking: bob still references the hash.
    assert_eq!(
        store.count_by_hash_excluding_owner("shared", "alice").await.unwrap(),
        1
    );
    // Bob asking: alice still references it.
    assert_eq!(
        store.count_by_hash_excluding_owner("shared", "bob").await.unwrap(),
        1
    );
    // A third party asking: both count.
    assert_eq!(
        store.count_by_hash_excluding_owner("shared", "carol").await.unwrap(),
        2
    );
}

#[tokio::test]
async fn dedup_count_ignores_owners_own_duplicates() {
    let store = MemoryMetadataStore::new();
    store.insert(record("alice", "a.txt", "shared")).await.unwrap();
    store.insert(record("alice", "a-copy.txt", "shared")).await.unwrap();

    assert_eq!(
        store.count_by_hash_excluding_owner("shared", "alice").await.unwrap(),
        0
    );
}

#[tokio::test]
async fn dedup_count_zero_for_unknown_hash() {
    let store = MemoryMetadataStore::new();
    assert_eq!(
        store.count_by_hash_excluding_owner("ghost", "alice").await.unwrap(),
        0
    );
}
