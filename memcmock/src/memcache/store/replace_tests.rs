use super::test_utils::*;

#[test]
fn replace_should_fail_if_not_exists() {
    let server = create_mock_server();
    let result = server.storage.replace("missing", from_string("v"), 1);
    assert_eq!(result, Err(CacheError::ItemNotStored));
    assert!(server.storage.get("missing").is_none());
}

#[test]
fn replace_should_overwrite_existing_value() {
    let server = create_mock_server();
    let stored = server.storage.set("key", from_string("old"), 0);
    let replaced = server.storage.replace("key", from_string("new"), 0).unwrap();
    assert_ne!(stored.cas, replaced.cas);
    assert_eq!(server.storage.get("key"), Some(from_string("new")));
}

#[test]
fn replace_should_reset_ttl() {
    let server = create_mock_server();
    server.storage.set("key", from_string("old"), 1);
    server.storage.replace("key", from_string("new"), 10).unwrap();
    server.timer.add_seconds(5);
    assert_eq!(server.storage.get("key"), Some(from_string("new")));
}

#[test]
fn replace_should_fail_if_entry_expired() {
    let server = create_mock_server();
    server.storage.set("key", from_string("old"), 1);
    server.timer.add_seconds(1);
    let result = server.storage.replace("key", from_string("new"), 0);
    assert_eq!(result, Err(CacheError::ItemNotStored));
    assert!(server.storage.entry_store().is_empty());
}
