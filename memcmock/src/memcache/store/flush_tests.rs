use super::test_utils::*;

#[test]
fn flush_should_remove_all_values() {
    let server = create_mock_server();
    for idx in 0..10 {
        server
            .storage
            .set(&format!("key{}", idx), from_string("test data"), 0);
    }
    server.storage.flush();
    assert!(server.storage.entry_store().is_empty());
    for idx in 0..10 {
        assert!(server.storage.get(&format!("key{}", idx)).is_none());
    }
}

#[test]
fn flush_should_not_reset_cas_sequence() {
    let server = create_mock_server();
    let before = server.storage.set("key", from_string("a"), 0);
    server.storage.flush();
    let after = server.storage.set("key", from_string("b"), 0);
    let before: u64 = before.cas.to_string().parse().unwrap();
    let after: u64 = after.cas.to_string().parse().unwrap();
    assert!(after > before);
}
