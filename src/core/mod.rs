pub mod config_resolver;
pub mod process_runner;
