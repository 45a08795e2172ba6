use super::*;

fn scratch_path(name: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("portal-storage-{}-{name}.json", std::process::id()));
    let _ = std::fs::remove_file(&path);
    path
}

fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

// =============================================================
// MemoryTokenStore
// =============================================================

#[test]
fn memory_default_has_no_token() {
    assert_eq!(MemoryTokenStore::default().get(), None);
}

#[test]
fn memory_set_then_clear() {
    let store = MemoryTokenStore::default();
    store.set("abc").unwrap();
    assert_eq!(store.get().as_deref(), Some("abc"));
    store.clear().unwrap();
    assert_eq!(store.get(), None);
}

#[test]
fn memory_empty_token_is_absent() {
    let store = MemoryTokenStore::with_token("");
    assert_eq!(store.get(), None);
}

// =============================================================
// FileTokenStore
// =============================================================

#[test]
fn file_missing_means_no_token() {
    let store = FileTokenStore::new(scratch_path("missing"));
    assert_eq!(store.get(), None);
    // Clearing an absent token does not create the file.
    store.clear().unwrap();
    assert!(!store.path().exists());
}

#[test]
fn file_round_trip_persists_under_token_key() {
    let path = scratch_path("roundtrip");
    let store = FileTokenStore::new(&path);
    store.set("jwt-value").unwrap();

    let reopened = FileTokenStore::new(&path);
    assert_eq!(reopened.get().as_deref(), Some("jwt-value"));

    let raw = read_json(&path);
    assert_eq!(raw[TOKEN_KEY], "jwt-value");
    let _ = std::fs::remove_file(path);
}

#[test]
fn file_clear_keeps_other_keys() {
    let path = scratch_path("otherkeys");
    std::fs::write(&path, r#"{"theme":"dark","token":"t1"}"#).unwrap();
    let store = FileTokenStore::new(&path);

    store.clear().unwrap();
    assert_eq!(store.get(), None);
    let raw = read_json(&path);
    assert_eq!(raw["theme"], "dark");
    assert!(raw.get(TOKEN_KEY).is_none());
    let _ = std::fs::remove_file(path);
}

#[test]
fn file_set_keeps_keys_of_any_type() {
    let path = scratch_path("mixed");
    std::fs::write(&path, r#"{"theme":1,"lang":"pt","flags":{"beta":true}}"#).unwrap();
    let store = FileTokenStore::new(&path);

    store.set("tok").unwrap();
    assert_eq!(store.get().as_deref(), Some("tok"));
    let raw = read_json(&path);
    assert_eq!(raw["theme"], 1);
    assert_eq!(raw["lang"], "pt");
    assert_eq!(raw["flags"]["beta"], true);
    let _ = std::fs::remove_file(path);
}

#[test]
fn file_non_string_token_is_absent() {
    let path = scratch_path("numtoken");
    std::fs::write(&path, r#"{"token":42}"#).unwrap();
    assert_eq!(FileTokenStore::new(&path).get(), None);
    let _ = std::fs::remove_file(path);
}

#[test]
fn file_corrupt_contents_read_as_no_token_and_are_not_overwritten() {
    let path = scratch_path("corrupt");
    std::fs::write(&path, "not json").unwrap();
    let store = FileTokenStore::new(&path);
    assert_eq!(store.get(), None);

    assert!(matches!(store.set("fresh").unwrap_err(), ApiError::Storage(_)));
    assert!(matches!(store.clear().unwrap_err(), ApiError::Storage(_)));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "not json");
    let _ = std::fs::remove_file(path);
}

#[test]
fn file_non_object_json_is_not_overwritten() {
    let path = scratch_path("array");
    std::fs::write(&path, "[1,2]").unwrap();
    let store = FileTokenStore::new(&path);
    assert!(matches!(store.set("fresh").unwrap_err(), ApiError::Storage(_)));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "[1,2]");
    let _ = std::fs::remove_file(path);
}

#[test]
fn file_write_failure_is_storage_error() {
    let dir = std::env::temp_dir().join(format!("portal-storage-dir-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    // A directory cannot be written as a file.
    let store = FileTokenStore::new(&dir);
    let err = store.set("x").unwrap_err();
    assert!(matches!(err, ApiError::Storage(_)));
    let _ = std::fs::remove_dir(dir);
}
