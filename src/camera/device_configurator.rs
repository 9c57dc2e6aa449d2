use crate::camera_config::CaptureSettings;
use crate::core::process_runner::{CommandSpec, ProcessRunner};
use crate::errors::AppError;
use log::{debug, error, info};
use std::sync::Arc;
use std::time::Instant;

/// V4L2 pixel format code for H.264.
pub const PIXEL_FORMAT_H264: &str = "4";
/// `video_bitrate_mode` value selecting constant bitrate.
pub const BITRATE_MODE_CONSTANT: &str = "1";

pub fn join_props(props: &[(&str, String)], kv_separator: &str, field_separator: &str) -> String {
    props
        .iter()
        .map(|(key, value)| format!("{}{}{}", key, kv_separator, value))
        .collect::<Vec<_>>()
        .join(field_separator)
}

fn flag(value: bool) -> String {
    let digit = if value { "1" } else { "0" };
    digit.to_string()
}

pub fn format_args(settings: &CaptureSettings) -> Vec<String> {
    let props = [
        ("width", settings.width.to_string()),
        ("height", settings.height.to_string()),
        ("pixelformat", PIXEL_FORMAT_H264.to_string()),
    ];
    vec![format!("--set-fmt-video={}", join_props(&props, "=", ","))]
}

pub fn control_args(settings: &CaptureSettings) -> Vec<String> {
    let props = [
        ("sharpness", settings.sharpness.to_string()),
        ("compression_quality", settings.quality.to_string()),
        ("video_bitrate_mode", BITRATE_MODE_CONSTANT.to_string()),
        ("video_bitrate", settings.bitrate.to_string()),
        ("vertical_flip", flag(settings.vertical_flip)),
        ("horizontal_flip", flag(settings.horizontal_flip)),
    ];
    vec![format!("--set-ctrl={}", join_props(&props, "=", ","))]
}

/// Applies capture settings to the device through `v4l2-ctl`.
#[derive(Clone)]
pub struct DeviceConfigurator {
    runner: Arc<dyn ProcessRunner>,
    program: String,
}

impl DeviceConfigurator {
    pub fn new(runner: Arc<dyn ProcessRunner>, program: impl Into<String>) -> Self {
        DeviceConfigurator {
            runner,
            program: program.into(),
        }
    }

    /// Sets the video format, then the controls. Stops at the first failing call.
    pub async fn configure(&self, settings: &CaptureSettings) -> Result<(), AppError> {
        let start_time = Instant::now();
        info!(
            "🎛️ Configuring capture device: {}x{}, bitrate {} bps",
            settings.width, settings.height, settings.bitrate
        );

        let format_cmd = CommandSpec::new(&self.program, format_args(settings));
        self.run_step("format", format_cmd).await?;
        let control_cmd = CommandSpec::new(&self.program, control_args(settings));
        self.run_step("control", control_cmd).await?;

        info!("✅ Capture device configured in {:?}.", start_time.elapsed());
        Ok(())
    }

    async fn run_step(&self, step: &str, command: CommandSpec) -> Result<(), AppError> {
        debug!("Running command: {}", command);
        let status = self.runner.run(&command).await.map_err(|e| {
            error!("❌ Failed to run '{}' for {} configuration: {}", self.program, step, e);
            AppError::DeviceConfiguration(format!(
                "failed to run '{}' for {} configuration: {}",
                self.program, step, e
            ))
        })?;

        if !status.success {
            error!("❌ '{}' {} configuration failed with {}", self.program, step, status);
            return Err(AppError::DeviceConfiguration(format!(
                "'{}' {} configuration failed with {}",
                self.program, step, status
            )));
        }
        debug!("{} configuration applied.", step);
        Ok(())
    }
}
