use anyhow::{Context, Result};
use log::{debug, error, info};
use pistream::app_config::ApplicationConfig;
use pistream::cli;
use pistream::common::logging_setup;
use pistream::config_loader;
use pistream::core::process_runner::SystemProcessRunner;
use pistream::operations::stream_op;
use std::sync::Arc;
use std::time::Instant;

#[tokio::main]
async fn main() -> Result<()> {
    let main_start_time = Instant::now();
    let matches = cli::build_cli().get_matches();
    let verbose = matches.get_flag("verbose");

    // The config file may change the log level, which is applied once it is read.
    logging_setup::initialize_logging(verbose);

    let master_config = match matches.get_one::<String>("conf") {
        Some(path) => match config_loader::load_config(path) {
            Ok(cfg) => Some(cfg),
            Err(e) => {
                error!("❌ Failed to load configuration from '{}': {}. Exiting.", path, e);
                return Err(anyhow::Error::new(e)
                    .context(format!("Failed to load configuration from '{}'", path)));
            }
        },
        None => None,
    };

    let app_layer = master_config
        .as_ref()
        .map(|c| c.app_settings.clone())
        .unwrap_or_default();
    let app_config = ApplicationConfig::default().overlay(app_layer);
    logging_setup::apply_config_level(verbose, &app_config);
    debug!("Application settings: {:?}", app_config);

    let file_layer = master_config.map(|c| c.layer()).unwrap_or_default();
    let runner = Arc::new(SystemProcessRunner::new());
    stream_op::handle_stream_cli(&app_config, file_layer, &matches, runner)
        .await
        .context("Streaming failed")?;

    info!("🏁 pistream finished in {:?}.", main_start_time.elapsed());
    Ok(())
}
