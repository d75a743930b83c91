use clasp::store::{CredentialId, DiskStore, LockStore, StoreError};

fn open(dir: &tempfile::TempDir) -> DiskStore {
    DiskStore::open(dir.path().to_path_buf()).unwrap()
}

#[test]
fn test_defaults_locked_when_nothing_persisted() {
    let dir = tempfile::tempdir().unwrap();
    let store = open(&dir);
    assert!(!store.unlocked("default").unwrap());
    assert!(store.credential_id("default").unwrap().is_none());
}

#[test]
fn test_credential_roundtrip_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let id = CredentialId::new(vec![0xA1, 0xB2, 0x5F, 0x00]);

    {
        let mut store = open(&dir);
        store.put_credential_id("default", &id).unwrap();
    }

    // Reload from disk
    let store = open(&dir);
    assert_eq!(store.credential_id("default").unwrap(), Some(id));
}

#[test]
fn test_unlocked_flag_roundtrip_across_reopen() {
    let dir = tempfile::tempdir().unwrap();

    {
        let mut store = open(&dir);
        store.set_unlocked("default", true).unwrap();
    }

    let store = open(&dir);
    assert!(store.unlocked("default").unwrap());

    {
        let mut store = open(&dir);
        store.set_unlocked("default", false).unwrap();
    }
    let store = open(&dir);
    assert!(!store.unlocked("default").unwrap());
}

#[test]
fn test_record_holds_exactly_two_entries() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = open(&dir);
    store
        .put_credential_id("default", &CredentialId::new(vec![0xA1, 0xB2]))
        .unwrap();
    store.set_unlocked("default", true).unwrap();

    let text = std::fs::read_to_string(store.record_path("default")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    let object = value.as_object().unwrap();
    assert_eq!(object.len(), 2);
    assert!(object.contains_key("credential_id"));
    assert_eq!(object["unlocked"], serde_json::Value::Bool(true));
}

#[test]
fn test_stored_identifier_is_url_safe_text() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = open(&dir);
    store
        .put_credential_id("default", &CredentialId::new(vec![0xfb, 0xef, 0xff]))
        .unwrap();

    let text = std::fs::read_to_string(store.record_path("default")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    let encoded = value["credential_id"].as_str().unwrap();
    assert!(!encoded.contains('+'));
    assert!(!encoded.contains('/'));
    assert!(!encoded.contains('='));
}

#[test]
fn test_corrupt_record_surfaces_corrupt_error() {
    let dir = tempfile::tempdir().unwrap();
    let store = open(&dir);
    std::fs::write(store.record_path("default"), b"{ not json").unwrap();

    assert!(matches!(
        store.credential_id("default").unwrap_err(),
        StoreError::Corrupt(_)
    ));
    assert!(matches!(
        store.unlocked("default").unwrap_err(),
        StoreError::Corrupt(_)
    ));
}

#[test]
fn test_malformed_encoded_identifier_is_corrupt() {
    let dir = tempfile::tempdir().unwrap();
    let store = open(&dir);
    std::fs::write(
        store.record_path("default"),
        br#"{"credential_id": "not base64url!", "unlocked": false}"#,
    )
    .unwrap();

    assert!(matches!(
        store.credential_id("default").unwrap_err(),
        StoreError::Corrupt(_)
    ));
    // The flag itself is still readable.
    assert!(!store.unlocked("default").unwrap());
}

#[test]
fn test_put_recovers_from_corrupt_record() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = open(&dir);
    std::fs::write(store.record_path("default"), b"garbage").unwrap();

    let id = CredentialId::new(vec![0x42; 16]);
    store.put_credential_id("default", &id).unwrap();
    assert_eq!(store.credential_id("default").unwrap(), Some(id));
}

#[test]
fn test_overwrite_replaces_identifier() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = open(&dir);

    store
        .put_credential_id("default", &CredentialId::new(vec![0xA1, 0xB2]))
        .unwrap();
    let newer = CredentialId::new(vec![0xC3, 0xD4]);
    store.put_credential_id("default", &newer).unwrap();

    assert_eq!(store.credential_id("default").unwrap(), Some(newer));
}

#[test]
fn test_overwrite_keeps_unlocked_flag() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = open(&dir);
    store.set_unlocked("default", true).unwrap();
    store
        .put_credential_id("default", &CredentialId::new(vec![1, 2, 3]))
        .unwrap();
    assert!(store.unlocked("default").unwrap());
}

#[test]
fn test_write_leaves_no_temp_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = open(&dir);
    store
        .put_credential_id("default", &CredentialId::new(vec![1]))
        .unwrap();

    let leftovers: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().and_then(|x| x.to_str()) == Some("tmp"))
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn test_profiles_are_independent() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = open(&dir);

    store
        .put_credential_id("alice", &CredentialId::new(vec![0xAA]))
        .unwrap();
    store.set_unlocked("alice", true).unwrap();

    assert!(store.credential_id("bob").unwrap().is_none());
    assert!(!store.unlocked("bob").unwrap());
    assert!(store.unlocked("alice").unwrap());
}
