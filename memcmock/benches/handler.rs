use bytes::{BufMut, Bytes, BytesMut};
use criterion::{criterion_group, criterion_main, Criterion};
use criterion::{BenchmarkId, Throughput};
use memcmock::cache::cache::Value;
use memcmock::memcache::config::ClientConfig;
use memcmock::Memcached;
use rand::Rng;

struct KeyValue {
    pub key: String,
    pub value: Bytes,
}

fn generate_random_key_values(capacity: usize) -> Vec<KeyValue> {
    let mut values: Vec<KeyValue> = Vec::with_capacity(capacity);
    for _idx in 0..capacity {
        let key = create_random_value(200);
        let value = create_random_value(1024);
        values.push(KeyValue {
            key: String::from_utf8_lossy(&key).into_owned(),
            value,
        });
    }
    values
}

pub fn create_random_value(capacity: usize) -> Bytes {
    let mut rng = rand::rng();
    let mut value = BytesMut::with_capacity(capacity);
    for _ in 0..capacity {
        let random_char = rng.random_range(b'a'..=b'z');
        value.put_u8(random_char);
    }
    value.freeze()
}

fn create_client() -> Memcached {
    Memcached::new(["127.0.0.1:11211"], ClientConfig::default())
}

fn test_set(client: &Memcached, key_values: &[KeyValue]) {
    for key_value in key_values {
        client.set(
            key_value.key.clone(),
            Value::Text(key_value.value.clone()),
            0,
            |_ctx, err, res| {
                assert!(err.is_none());
                assert!(res);
            },
        );
    }
    client.run_pending_tasks();
}

fn test_get(client: &Memcached, key_values: &[KeyValue]) {
    for key_value in key_values {
        client.get(key_value.key.clone(), |_ctx, err, res| {
            assert!(err.is_none());
            assert!(res.is_some());
        });
    }
    client.run_pending_tasks();
}

fn set_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("set");
    for size in [1_000usize, 10_000usize].iter() {
        let key_values = generate_random_key_values(*size);
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &key_values, |b, kv| {
            let client = create_client();
            b.iter(|| test_set(&client, kv));
        });
    }
    group.finish();
}

fn get_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("get");
    for size in [1_000usize, 10_000usize].iter() {
        let key_values = generate_random_key_values(*size);
        let client = create_client();
        test_set(&client, &key_values);
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &key_values, |b, kv| {
            b.iter(|| test_get(&client, kv));
        });
    }
    group.finish();
}

criterion_group!(benches, set_benchmark, get_benchmark);
criterion_main!(benches);
