#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;

pub mod cache;
pub mod memcache;
pub mod memory_store;
pub mod version;

pub use memcache::client::Memcached;

#[cfg(test)]
mod mock;
