use log::{error, info};
use memcmock::memcache::cli::{parser, shell};
use memcmock::memcache::pending_tasks_runner::PendingTasksRunner;
use memcmock::Memcached;
use std::env;
use std::process;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing_log::LogTracer;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    LogTracer::init().expect("Cannot initialize logger");

    let args: Vec<String> = env::args().collect();
    let cli_config = match parser::parse(args) {
        Ok(config) => config,
        Err(err) => {
            eprint!("{}", err);
            process::exit(1);
        }
    };
    tracing_subscriber::fmt()
        .with_max_level(cli_config.log_level())
        .with_writer(std::io::stderr)
        .init();

    let config = cli_config.client_config();
    info!("Servers: {:?}", cli_config.servers);
    info!("Max expiration: {}s", config.max_expiration);
    info!(
        "Max value size: {}",
        byte_unit::Byte::from_u64(config.max_value)
            .get_appropriate_unit(byte_unit::UnitType::Binary)
    );
    info!("Emulated server version: {}", memcmock::version::EMULATED_SERVER_VERSION);

    let client = Memcached::new(cli_config.servers.clone(), config);
    let runner = PendingTasksRunner::new(client.dispatcher());
    tokio::spawn(async move { runner.run().await });

    let (sender, mut receiver) = mpsc::unbounded_channel();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(err) => {
                error!("Cannot read command: {}", err);
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        let command = match shell::parse_line(&line) {
            Ok(command) => command,
            Err(err) => {
                println!("ERROR {}", err);
                continue;
            }
        };
        let replies = command.replies();
        shell::execute(&client, command, sender.clone());
        if !replies {
            break;
        }
        match receiver.recv().await {
            Some(reply) => println!("{}", reply),
            None => break,
        }
    }
    client.end();
}
