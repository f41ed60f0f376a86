pub mod cli;
pub mod client;
pub mod config;
pub mod dispatcher;
pub mod pending_tasks_runner;
pub mod reports;
pub mod store;
