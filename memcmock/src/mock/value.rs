use crate::cache::cache::Value;
use bytes::{BufMut, BytesMut};

pub fn from_string(val: &str) -> Value {
    let mut value = BytesMut::with_capacity(val.len());
    value.put_slice(val.as_bytes());
    Value::Text(value.freeze())
}
