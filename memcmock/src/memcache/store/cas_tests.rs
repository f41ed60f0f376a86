use super::test_utils::*;

#[test]
fn cas_should_store_on_matching_token() {
    let server = create_mock_server();
    server.storage.set("k", from_string("v1"), 1);
    let token = server.storage.gets("k").unwrap().cas;
    let result = server.storage.cas("k", from_string("v2"), token, 1);
    assert!(result.is_some());
    assert_ne!(result.unwrap().cas, token);
    assert_eq!(server.storage.get("k"), Some(from_string("v2")));
}

#[test]
fn cas_should_fail_on_stale_token() {
    let server = create_mock_server();
    server.storage.set("k", from_string("v1"), 1);
    let stale = server.storage.gets("k").unwrap().cas;
    server.storage.set("k", from_string("v2"), 1);
    assert!(server.storage.cas("k", from_string("v3"), stale, 1).is_none());
    assert_eq!(server.storage.get("k"), Some(from_string("v2")));
}

#[test]
fn cas_should_fail_if_key_missing() {
    let server = create_mock_server();
    let token = server.storage.set("other", from_string("v"), 0).cas;
    assert!(server.storage.cas("k", from_string("v"), token, 0).is_none());
    assert!(server.storage.get("k").is_none());
}

#[test]
fn cas_should_fail_if_entry_expired() {
    let server = create_mock_server();
    let token = server.storage.set("k", from_string("v1"), 1).cas;
    server.timer.add_seconds(1);
    assert!(server.storage.cas("k", from_string("v2"), token, 0).is_none());
    assert!(server.storage.get("k").is_none());
}

#[test]
fn cas_token_can_be_used_only_once() {
    let server = create_mock_server();
    let token = server.storage.set("k", from_string("v1"), 0).cas;
    assert!(server.storage.cas("k", from_string("v2"), token, 0).is_some());
    assert!(server.storage.cas("k", from_string("v3"), token, 0).is_none());
    assert_eq!(server.storage.get("k"), Some(from_string("v2")));
}
