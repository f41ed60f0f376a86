use crate::memcache::config::ClientConfig;
use crate::version;
use byte_unit::Byte;
use clap::Parser;
use std::fmt::Debug;

const DEFAULT_SERVER: &str = "127.0.0.1:11211";
const DEFAULT_MAX_EXPIRATION: u64 = 2_592_000;
const MAX_VALUE: &str = "1MiB";

#[derive(Parser, Debug, Clone)]
#[command(author, version = version::MEMCMOCK_VERSION, about, long_about = None)]
/// memcached client double reading commands from standard input
pub struct MemcmockArgs {
    #[arg(short, long = "server", value_name = "LABEL", default_value = DEFAULT_SERVER)]
    /// server label shown in aggregate reports, may be repeated
    pub servers: Vec<String>,

    #[arg(short = 'e', long, value_name = "SECONDS", default_value_t = DEFAULT_MAX_EXPIRATION)]
    /// lifetimes above this many seconds are absolute unix timestamps
    pub max_expiration: u64,

    #[arg(short = 'I', long, value_name = "VALUE-SIZE", value_parser = parse_memory, default_value = MAX_VALUE)]
    /// max value size, reported as item_size_max by settings
    pub max_value: u64,

    #[arg(short, long, action = clap::ArgAction::Count)]
    /// sets the level of verbosity
    pub verbose: u8,
}

fn parse_memory(s: &str) -> Result<u64, String> {
    match Byte::parse_str(s, true) {
        Ok(bytes) => Ok(bytes.as_u64()),
        Err(byte_error) => Err(format!("{}", byte_error)),
    }
}

impl MemcmockArgs {
    fn from_args(args: Vec<String>) -> Result<MemcmockArgs, String> {
        MemcmockArgs::try_parse_from(args.iter()).map_err(|err| err.to_string())
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::default()
            .with_max_expiration(self.max_expiration)
            .with_max_value(self.max_value)
    }

    pub fn log_level(&self) -> tracing::Level {
        get_log_level(self.verbose)
    }
}

pub fn get_log_level(verbose: u8) -> tracing::Level {
    // Vary the output based on how many times the user used the "verbose" flag
    // (i.e. 'myprog -v -v -v' or 'myprog -vvv' vs 'myprog -v'
    match verbose {
        0 => tracing::Level::ERROR,
        1 => tracing::Level::WARN,
        2 => tracing::Level::INFO,
        3 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    }
}

pub fn parse(args: Vec<String>) -> Result<MemcmockArgs, String> {
    MemcmockArgs::from_args(args)
}
