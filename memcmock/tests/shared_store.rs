mod common;

use memcmock::cache::cache::Value;

#[test]
fn clients_are_isolated_by_default() {
    let first = common::create_client();
    let second = common::create_client();

    common::deliver(&first.client, |cb| first.client.set("foo", "bar", 0, cb));
    let value = common::deliver(&second.client, |cb| second.client.get("foo", cb)).result;
    assert_eq!(value, None);
}

#[test]
fn bound_store_is_shared() {
    let first = common::create_client();
    let mut second = common::create_client();

    let previous = second.client.bind_store(first.client.store());
    assert!(previous.is_empty());

    common::deliver(&first.client, |cb| first.client.set("foo", "bar", 0, cb));
    let value = common::deliver(&second.client, |cb| second.client.get("foo", cb)).result;
    assert_eq!(value, Some(Value::from("bar")));

    common::deliver(&second.client, |cb| second.client.delete("foo", cb));
    let value = common::deliver(&first.client, |cb| first.client.get("foo", cb)).result;
    assert_eq!(value, None);
}

#[test]
fn store_snapshot_and_replace_all() {
    let test = common::create_client();
    let client = &test.client;

    common::deliver(client, |cb| client.set("foo", "bar", 0, cb));
    let snapshot = client.store().snapshot();
    common::deliver(client, |cb| client.flush(cb));
    assert!(client.store().is_empty());

    client.store().replace_all(snapshot);
    let value = common::deliver(client, |cb| client.get("foo", cb)).result;
    assert_eq!(value, Some(Value::from("bar")));
}
