pub const MEMCMOCK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// memcached release reported by the `version` and `stats` commands
pub const EMULATED_SERVER_VERSION: &str = "1.4.20";
pub const EMULATED_SERVER_MAJOR: &str = "1";
pub const EMULATED_SERVER_MINOR: &str = "4";
pub const EMULATED_SERVER_BUGFIX: &str = "20";
