use serde::Deserialize;

pub const DEFAULT_DEVICE_CTL_PROGRAM: &str = "v4l2-ctl";
pub const DEFAULT_ENCODER_PROGRAM: &str = "ffmpeg";
pub const DEFAULT_VIDEO_DEVICE: &str = "/dev/video0";
pub const DEFAULT_INGEST_URL_BASE: &str = "rtmp://va.pscp.tv:80/x/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationConfig {
    pub log_level: Option<String>, // CLI --verbose takes priority
    pub device_ctl_program: String,
    pub encoder_program: String,
    pub video_device: String,     // raw H.264 source read by the encoder
    pub ingest_url_base: String,  // stream key is appended verbatim
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        ApplicationConfig {
            log_level: None,
            device_ctl_program: DEFAULT_DEVICE_CTL_PROGRAM.to_string(),
            encoder_program: DEFAULT_ENCODER_PROGRAM.to_string(),
            video_device: DEFAULT_VIDEO_DEVICE.to_string(),
            ingest_url_base: DEFAULT_INGEST_URL_BASE.to_string(),
        }
    }
}

impl ApplicationConfig {
    pub fn overlay(self, layer: ApplicationLayer) -> Self {
        ApplicationConfig {
            log_level: layer.log_level.or(self.log_level),
            device_ctl_program: layer.device_ctl_program.unwrap_or(self.device_ctl_program),
            encoder_program: layer.encoder_program.unwrap_or(self.encoder_program),
            video_device: layer.video_device.unwrap_or(self.video_device),
            ingest_url_base: layer.ingest_url_base.unwrap_or(self.ingest_url_base),
        }
    }
}

/// The optional `application` section of a configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ApplicationLayer {
    pub log_level: Option<String>,
    pub device_ctl_program: Option<String>,
    pub encoder_program: Option<String>,
    pub video_device: Option<String>,
    pub ingest_url_base: Option<String>,
}
