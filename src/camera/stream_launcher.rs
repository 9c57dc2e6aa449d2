use crate::app_config::{
    ApplicationConfig, DEFAULT_ENCODER_PROGRAM, DEFAULT_INGEST_URL_BASE, DEFAULT_VIDEO_DEVICE,
};
use crate::camera_config::{CaptureSettings, DestinationCredential};
use crate::core::process_runner::{CommandSpec, CommandStatus, ProcessRunner, RunningProcess};
use crate::errors::AppError;
use log::{debug, error, info};
use std::io;
use std::sync::Arc;

/// Keyframe interval in frames; two seconds at 30 fps.
pub const KEYFRAME_INTERVAL: u32 = 60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncoderSettings {
    pub program: String,
    pub video_device: String,
    pub ingest_url_base: String,
}

impl Default for EncoderSettings {
    fn default() -> Self {
        EncoderSettings {
            program: DEFAULT_ENCODER_PROGRAM.to_string(),
            video_device: DEFAULT_VIDEO_DEVICE.to_string(),
            ingest_url_base: DEFAULT_INGEST_URL_BASE.to_string(),
        }
    }
}

impl From<&ApplicationConfig> for EncoderSettings {
    fn from(config: &ApplicationConfig) -> Self {
        EncoderSettings {
            program: config.encoder_program.clone(),
            video_device: config.video_device.clone(),
            ingest_url_base: config.ingest_url_base.clone(),
        }
    }
}

/// The credential is appended verbatim, without any escaping.
pub fn stream_url(ingest_url_base: &str, destination: &DestinationCredential) -> String {
    format!("{}{}", ingest_url_base, destination.expose())
}

#[rustfmt::skip]
pub fn encoder_args(video_device: &str, url: &str) -> Vec<String> {
    let keyframe_interval = KEYFRAME_INTERVAL.to_string();
    [
        "-re",                              // read input at its native rate
        "-f", "lavfi", "-i", "anullsrc",    // silent audio source
        "-f", "h264", "-i", video_device,   // raw H.264 from the capture device
        "-acodec", "aac",
        "-b:a", "0",                        // no real audio, so no audio bitrate
        "-map", "0:a",
        "-map", "1:v",
        "-f", "h264",
        "-vcodec", "copy",                  // pass video through untouched
        "-g", keyframe_interval.as_str(),
        "-f", "flv",
        url,
    ]
    .iter()
    .map(|arg| arg.to_string())
    .collect()
}

/// Handle to a running encoder. Dropping it does not stop the process.
pub struct EncoderHandle {
    process: Box<dyn RunningProcess>,
}

impl EncoderHandle {
    pub fn id(&self) -> Option<u32> {
        self.process.id()
    }

    pub async fn wait(mut self) -> io::Result<CommandStatus> {
        self.process.wait().await
    }
}

#[derive(Clone)]
pub struct StreamLauncher {
    runner: Arc<dyn ProcessRunner>,
    settings: EncoderSettings,
}

impl StreamLauncher {
    pub fn new(runner: Arc<dyn ProcessRunner>, settings: EncoderSettings) -> Self {
        StreamLauncher { runner, settings }
    }

    /// Starts the encoder and returns without waiting for it.
    pub fn launch(
        &self,
        destination: &DestinationCredential,
        capture: &CaptureSettings,
    ) -> Result<EncoderHandle, AppError> {
        if destination.is_empty() {
            error!("❌ No stream key configured, not starting '{}'.", self.settings.program);
            return Err(AppError::MissingCredential);
        }

        let url = stream_url(&self.settings.ingest_url_base, destination);
        let args = encoder_args(&self.settings.video_device, &url);
        let command = CommandSpec::new(&self.settings.program, args);

        // `destination` formats as <redacted>, so the key stays out of the log.
        let shown_url = format!("{}{}", self.settings.ingest_url_base, destination);
        let shown_args = encoder_args(&self.settings.video_device, &shown_url);
        debug!("Starting command: {} {}", command.program, shown_args.join(" "));

        let process = self.runner.start(&command).map_err(|e| {
            error!("❌ Failed to start '{}': {}", self.settings.program, e);
            AppError::Launch(format!("failed to start '{}': {}", self.settings.program, e))
        })?;

        info!(
            "📡 Streaming {}x{} at {} bps from {} (pid {:?})",
            capture.width,
            capture.height,
            capture.bitrate,
            self.settings.video_device,
            process.id()
        );
        Ok(EncoderHandle { process })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_url_appends_key_verbatim() {
        let url = stream_url(DEFAULT_INGEST_URL_BASE, &DestinationCredential::new("XYZ"));
        assert_eq!(url, "rtmp://va.pscp.tv:80/x/XYZ");

        let url = stream_url(DEFAULT_INGEST_URL_BASE, &DestinationCredential::new("a b/c?d"));
        assert_eq!(url, "rtmp://va.pscp.tv:80/x/a b/c?d");
    }

    #[rustfmt::skip]
    #[test]
    fn encoder_args_have_fixed_shape() {
        let args = encoder_args("/dev/video0", "rtmp://va.pscp.tv:80/x/XYZ");
        let expected = [
            "-re", "-f", "lavfi", "-i", "anullsrc", "-f", "h264", "-i", "/dev/video0",
            "-acodec", "aac", "-b:a", "0", "-map", "0:a", "-map", "1:v", "-f", "h264",
            "-vcodec", "copy", "-g", "60", "-f", "flv", "rtmp://va.pscp.tv:80/x/XYZ",
        ];
        assert_eq!(args, expected);
    }

    #[test]
    fn encoder_settings_follow_application_config() {
        let app = ApplicationConfig {
            video_device: "/dev/video2".to_string(),
            ..Default::default()
        };
        let settings = EncoderSettings::from(&app);
        assert_eq!(settings.video_device, "/dev/video2");
        assert_eq!(settings.program, "ffmpeg");
        assert_eq!(
            EncoderSettings::from(&ApplicationConfig::default()),
            EncoderSettings::default()
        );
    }
}
