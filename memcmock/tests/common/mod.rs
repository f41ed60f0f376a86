#![allow(dead_code)]
use memcmock::cache::error::CacheError;
use memcmock::cache::timer::ManualTimer;
use memcmock::memcache::config::ClientConfig;
use memcmock::memcache::dispatcher::{BoxedCallback, InvocationContext};
use memcmock::Memcached;
use std::sync::{Arc, Mutex};

pub const NOW: u64 = 1_700_000_000_000;
pub const DEFAULT_SERVER: &str = "127.0.0.1:11211";

pub struct TestClient {
    pub timer: Arc<ManualTimer>,
    pub client: Memcached,
}

pub fn create_client() -> TestClient {
    create_client_with_servers(vec![DEFAULT_SERVER])
}

pub fn create_client_with_servers(servers: Vec<&str>) -> TestClient {
    let timer = Arc::new(ManualTimer::new(NOW));
    let client = Memcached::with_timer(servers, ClientConfig::default(), timer.clone());
    TestClient { timer, client }
}

/// What a callback was called with
pub struct Delivery<T> {
    pub context: InvocationContext,
    pub error: Option<CacheError>,
    pub result: T,
}

/// Issues a command through `invoke` and runs the dispatcher until its
/// callback has fired.
pub fn deliver<T, I>(client: &Memcached, invoke: I) -> Delivery<T>
where
    T: Send + 'static,
    I: FnOnce(BoxedCallback<T>),
{
    let slot: Arc<Mutex<Option<Delivery<T>>>> = Arc::new(Mutex::new(None));
    let sink = slot.clone();
    let callback: BoxedCallback<T> = Box::new(move |context, error, result| {
        *sink.lock().unwrap() = Some(Delivery {
            context: context.clone(),
            error,
            result,
        });
    });
    invoke(callback);
    assert!(
        slot.lock().unwrap().is_none(),
        "callback fired before the dispatcher ran"
    );
    client.run_until_idle();
    let delivery = slot.lock().unwrap().take();
    delivery.expect("callback was not delivered")
}
