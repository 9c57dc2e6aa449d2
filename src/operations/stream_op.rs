use crate::app_config::ApplicationConfig;
use crate::camera::device_configurator::DeviceConfigurator;
use crate::camera::stream_launcher::{EncoderHandle, EncoderSettings, StreamLauncher};
use crate::camera_config::{ConfigLayer, EffectiveConfiguration};
use crate::cli::cli_layer;
use crate::config_loader::validate_effective_config;
use crate::core::config_resolver::resolve;
use crate::core::process_runner::ProcessRunner;
use crate::errors::AppError;
use anyhow::{Context, Result};
use clap::ArgMatches;
use log::{debug, error, info, warn};
use std::sync::Arc;
use std::time::Instant;

/// Configures the device, then starts the encoder.
///
/// A missing stream key is rejected before the device is touched. Any failure
/// stops the sequence; the encoder only starts after both device calls succeed.
pub async fn start_stream(
    config: &EffectiveConfiguration,
    configurator: &DeviceConfigurator,
    launcher: &StreamLauncher,
) -> Result<EncoderHandle, AppError> {
    if config.destination.is_empty() {
        return Err(AppError::MissingCredential);
    }
    configurator.configure(&config.capture).await?;
    launcher.launch(&config.destination, &config.capture)
}

pub async fn handle_stream_cli(
    app_config: &ApplicationConfig,
    file_layer: ConfigLayer,
    args: &ArgMatches,
    runner: Arc<dyn ProcessRunner>,
) -> Result<()> {
    let op_start_time = Instant::now();

    let config = resolve(EffectiveConfiguration::default(), file_layer, cli_layer(args));
    validate_effective_config(&config).context("Effective configuration is invalid")?;

    let configurator =
        DeviceConfigurator::new(Arc::clone(&runner), app_config.device_ctl_program.clone());
    let launcher = StreamLauncher::new(runner, EncoderSettings::from(app_config));

    let handle = match start_stream(&config, &configurator, &launcher).await {
        Ok(handle) => handle,
        Err(e) => {
            error!("❌ Stream setup failed after {:?}: {}", op_start_time.elapsed(), e);
            return Err(e.into());
        }
    };
    debug!("Encoder started in {:?}, waiting for it to exit.", op_start_time.elapsed());

    let status = handle
        .wait()
        .await
        .with_context(|| format!("Failed to wait for '{}'", app_config.encoder_program))?;
    if status.success {
        info!("🏁 Encoder finished after {:?}.", op_start_time.elapsed());
    } else {
        warn!("⚠️ Encoder exited with {} after {:?}.", status, op_start_time.elapsed());
    }
    Ok(())
}
