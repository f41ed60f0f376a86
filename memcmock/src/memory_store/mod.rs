pub mod dash_map_store;
pub mod shared_store_state;
