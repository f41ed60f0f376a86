use super::test_utils::*;

#[test]
fn touch_should_fail_if_not_exist() {
    let server = create_mock_server();
    assert!(!server.storage.touch("key", 10));
    assert!(server.storage.get("key").is_none());
}

#[test]
fn touch_should_change_only_expiry() {
    let server = create_mock_server();
    let status = server.storage.set("key", from_string("value"), 1);
    assert!(server.storage.touch("key", 2));
    let entry = server.storage.entry_store().get("key").unwrap();
    assert_eq!(entry.cas(), status.cas);
    assert_eq!(entry.value(), &from_string("value"));
    assert_eq!(entry.expires_at(), NOW + 2_000);
}

#[test]
fn touch_should_extend_lifetime() {
    let server = create_mock_server();
    server.storage.set("key", from_string("value"), 1);
    server.storage.touch("key", 2);
    server.timer.add_millis(1_500);
    assert_eq!(server.storage.get("key"), Some(from_string("value")));
    server.timer.add_millis(500);
    assert!(server.storage.get("key").is_none());
}

#[test]
fn touch_with_zero_should_make_entry_permanent() {
    let server = create_mock_server();
    server.storage.set("key", from_string("value"), 1);
    server.storage.touch("key", 0);
    server.timer.add_seconds(1_000);
    assert!(server.storage.get("key").is_some());
}

#[test]
fn touch_should_fail_if_entry_expired() {
    let server = create_mock_server();
    server.storage.set("key", from_string("value"), 1);
    server.timer.add_seconds(1);
    assert!(!server.storage.touch("key", 100));
    assert!(server.storage.get("key").is_none());
}
