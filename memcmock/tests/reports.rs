mod common;

use memcmock::memcache::reports::CacheDump;

#[test]
fn version_per_server() {
    let test = common::create_client_with_servers(vec!["a:1", "b:2"]);
    let client = &test.client;

    let report = common::deliver(client, |cb| client.version(cb));
    assert!(report.error.is_none());
    assert_eq!(report.result.len(), 2);
    assert_eq!(report.result[0].server, "a:1");
    assert_eq!(report.result[1].server, "b:2");
    assert_eq!(report.result[0].version, "1.4.20");
    assert_eq!(report.result[0].major, "1");
    assert_eq!(report.result[0].minor, "4");
    assert_eq!(report.result[0].bugfix, "20");
}

#[test]
fn stats_time_is_current_unix_seconds() {
    let test = common::create_client();
    let client = &test.client;

    let report = common::deliver(client, |cb| client.stats(cb)).result;
    assert_eq!(report.len(), 1);
    assert_eq!(report[0].server, common::DEFAULT_SERVER);
    assert_eq!(report[0].info.time, common::NOW / 1000);
}

#[test]
fn settings_and_slabs_per_server() {
    let test = common::create_client_with_servers(vec!["a:1", "b:2", "c:3"]);
    let client = &test.client;

    assert_eq!(common::deliver(client, |cb| client.settings(cb)).result.len(), 3);
    assert_eq!(common::deliver(client, |cb| client.slabs(cb)).result.len(), 3);
}

#[test]
fn items_follow_store_contents() {
    let test = common::create_client();
    let client = &test.client;

    let empty = common::deliver(client, |cb| client.items(cb)).result;
    assert_eq!(empty.len(), 1);
    assert!(empty[0].is_empty());

    common::deliver(client, |cb| client.set("a", "1", 0, cb));
    common::deliver(client, |cb| client.set("b", "2", 0, cb));
    let items = common::deliver(client, |cb| client.items(cb)).result;
    assert!(!items[0].is_empty());
    assert_eq!(items[0].server.as_deref(), Some(common::DEFAULT_SERVER));
    assert_eq!(items[0].slabs["1"].number, 2);
}

#[test]
fn cachedump_lists_entries() {
    let test = common::create_client();
    let client = &test.client;

    let empty = common::deliver(client, |cb| client.cachedump("srv", 1, 10, cb)).result;
    assert_eq!(empty, CacheDump::Empty);

    common::deliver(client, |cb| client.set("key", "value", 10, cb));
    match common::deliver(client, |cb| client.cachedump("srv", 1, 10, cb)).result {
        CacheDump::Single(item) => {
            assert_eq!(item.key, "key");
            assert_eq!(item.size, 5);
            assert_eq!(item.expires, common::NOW / 1000 + 10);
        }
        other => panic!("unexpected dump: {:?}", other),
    }

    common::deliver(client, |cb| client.set("other", "v", 0, cb));
    match common::deliver(client, |cb| client.cachedump("srv", 1, 10, cb)).result {
        CacheDump::Multiple(items) => {
            let mut keys: Vec<String> = items.into_iter().map(|item| item.key).collect();
            keys.sort();
            assert_eq!(keys, vec![String::from("key"), String::from("other")]);
        }
        other => panic!("unexpected dump: {:?}", other),
    }
}

#[test]
fn settings_report_configured_max_value() {
    let timer = std::sync::Arc::new(memcmock::cache::timer::ManualTimer::new(common::NOW));
    let config = memcmock::memcache::config::ClientConfig::default().with_max_value(2048);
    let client = memcmock::Memcached::with_timer([common::DEFAULT_SERVER], config, timer);

    let report = common::deliver(&client, |cb| client.settings(cb)).result;
    assert_eq!(report[0].info.item_size_max, 2048);
}

#[test]
fn version_for_single_server_label() {
    let timer = std::sync::Arc::new(memcmock::cache::timer::ManualTimer::new(common::NOW));
    let config = memcmock::memcache::config::ClientConfig::default();
    let client = memcmock::Memcached::with_timer("solo:11211", config, timer);

    let report = common::deliver(&client, |cb| client.version(cb)).result;
    assert_eq!(report.len(), 1);
    assert_eq!(report[0].server, "solo:11211");
}
