use std::path::PathBuf;

use serde_json::json;
use storefront_client::types::{Credential, Role};
use storefront_client::{CredentialStore, FileStore, Identity, MemoryStore};

fn credential(access: &str, refresh: &str) -> Credential {
    Credential {
        access_token: access.to_string(),
        refresh_token: refresh.to_string(),
        token_type: "Bearer".to_string(),
    }
}

fn identity() -> Identity {
    Identity {
        username: "coral".to_string(),
        role: Role::Admin,
        id: "u-1".to_string(),
    }
}

fn scratch_path(tag: &str) -> PathBuf {
    PathBuf::from("target").join(format!("storefront-{tag}-{}.json", uuid::Uuid::new_v4()))
}

#[test]
fn memory_store_saves_and_clears_the_whole_session() {
    let store = MemoryStore::new();
    assert!(store.access_token().is_none());

    store
        .save(&credential("A1", "R1"), &identity())
        .expect("save succeeds");
    assert_eq!(store.access_token().as_deref(), Some("A1"));
    assert_eq!(store.refresh_token().as_deref(), Some("R1"));
    assert_eq!(store.identity(), Some(identity()));

    store.clear().expect("clear succeeds");
    assert!(store.access_token().is_none());
    assert!(store.refresh_token().is_none());
    assert!(store.identity().is_none());
}

#[test]
fn memory_store_overwrites_the_previous_session() {
    let store = MemoryStore::new();
    store
        .save(&credential("A1", "R1"), &identity())
        .expect("first save");
    store
        .save(&credential("A2", "R2"), &identity())
        .expect("second save");
    assert_eq!(store.access_token().as_deref(), Some("A2"));
    assert_eq!(store.refresh_token().as_deref(), Some("R2"));
}

#[test]
fn file_store_round_trips_across_reopen() {
    let path = scratch_path("roundtrip");

    {
        let store = FileStore::open(&path).expect("store opens");
        store
            .save(&credential("A1", "R1"), &identity())
            .expect("save succeeds");
    }

    let reopened = FileStore::open(&path).expect("store reopens");
    assert_eq!(reopened.access_token().as_deref(), Some("A1"));
    assert_eq!(reopened.refresh_token().as_deref(), Some("R1"));
    assert_eq!(reopened.identity(), Some(identity()));

    reopened.clear().expect("clear succeeds");
    let cleared = FileStore::open(&path).expect("store reopens after clear");
    assert!(cleared.access_token().is_none());
    assert!(cleared.refresh_token().is_none());
    assert!(cleared.identity().is_none());

    let _ = std::fs::remove_file(&path);
}

#[test]
fn file_store_starts_empty_when_the_file_is_missing() {
    let path = scratch_path("missing");
    let store = FileStore::open(&path).expect("store opens without a file");
    assert!(store.access_token().is_none());
    assert!(store.identity().is_none());
}

#[test]
fn file_store_tolerates_a_corrupted_file() {
    let path = scratch_path("corrupted");
    std::fs::write(&path, "not json at all").expect("write fixture");

    let store = FileStore::open(&path).expect("store opens despite corruption");
    assert!(store.access_token().is_none());

    // A save replaces the corrupted contents with a usable file.
    store
        .save(&credential("A1", "R1"), &identity())
        .expect("save succeeds");
    let reopened = FileStore::open(&path).expect("store reopens");
    assert_eq!(reopened.access_token().as_deref(), Some("A1"));

    let _ = std::fs::remove_file(&path);
}

#[test]
fn a_malformed_identity_entry_fails_soft() {
    let path = scratch_path("bad-identity");
    std::fs::write(
        &path,
        json!({
            "accessToken": "A1",
            "refreshToken": "R1",
            "user": "{not json"
        })
        .to_string(),
    )
    .expect("write fixture");

    let store = FileStore::open(&path).expect("store opens");
    assert_eq!(store.access_token().as_deref(), Some("A1"));
    assert_eq!(store.refresh_token().as_deref(), Some("R1"));
    assert!(store.identity().is_none());

    let _ = std::fs::remove_file(&path);
}

#[test]
fn a_failed_save_does_not_pollute_the_in_memory_view() {
    let path = scratch_path("unwritable-save");
    let store = FileStore::open(&path).expect("store opens");

    // A directory squatting on the store's path makes the write-through fail.
    std::fs::create_dir(&path).expect("create blocking dir");
    assert!(store.save(&credential("A1", "R1"), &identity()).is_err());

    assert!(store.access_token().is_none());
    assert!(store.refresh_token().is_none());
    assert!(store.identity().is_none());

    let _ = std::fs::remove_dir(&path);
}

#[test]
fn a_failed_clear_keeps_the_session_visible() {
    let path = scratch_path("unwritable-clear");
    let store = FileStore::open(&path).expect("store opens");
    store
        .save(&credential("A1", "R1"), &identity())
        .expect("save succeeds");

    std::fs::remove_file(&path).expect("drop backing file");
    std::fs::create_dir(&path).expect("create blocking dir");
    assert!(store.clear().is_err());

    // The last state the disk accepted is still what callers see.
    assert_eq!(store.access_token().as_deref(), Some("A1"));
    assert_eq!(store.refresh_token().as_deref(), Some("R1"));
    assert_eq!(store.identity(), Some(identity()));

    let _ = std::fs::remove_dir(&path);
}
