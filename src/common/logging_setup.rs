use crate::app_config::ApplicationConfig;
use crate::common::timestamp_utils::{current_local_timestamp_str, LOG_TIMESTAMP_FORMAT};
use env_logger::Builder;
use log::LevelFilter;
use std::io::Write;

/// Log level from the CLI verbose flag, then the config file, then `info`.
pub fn resolve_level(verbose: bool, config: Option<&ApplicationConfig>) -> LevelFilter {
    if verbose {
        return LevelFilter::Debug;
    }
    let log_level_str = config
        .and_then(|c| c.log_level.clone())
        .unwrap_or_else(|| "info".to_string());

    match log_level_str.to_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        s => {
            eprintln!("Unrecognized log level '{}', defaulting to info.", s);
            LevelFilter::Info
        }
    }
}

/// Installs the logger before the config file is read.
///
/// The logger itself accepts every level; the active level is the global max
/// level, which `apply_config_level` adjusts once the config file is known.
pub fn initialize_logging(verbose: bool) {
    let mut builder = Builder::new();
    builder.filter_level(LevelFilter::Trace);
    builder.format(|buf, record| {
        writeln!(
            buf,
            "{} [{}] - {}",
            current_local_timestamp_str(LOG_TIMESTAMP_FORMAT),
            record.level(),
            record.args()
        )
    });

    builder.try_init().unwrap_or_else(|e| {
        eprintln!("Failed to initialize logger: {}. Logging might not work as expected.", e);
    });
    log::set_max_level(resolve_level(verbose, None));
}

pub fn apply_config_level(verbose: bool, config: &ApplicationConfig) {
    log::set_max_level(resolve_level(verbose, Some(config)));
}
