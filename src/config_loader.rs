use crate::app_config::ApplicationLayer;
use crate::camera_config::{CaptureLayer, ConfigLayer, CredentialLayer, EffectiveConfiguration};
use crate::errors::AppError;
use log::{debug, info};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Instant;

/// Everything a configuration file may contain. Absent sections and fields are unset.
#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct MasterConfig {
    #[serde(rename = "application", default)]
    pub app_settings: ApplicationLayer,
    #[serde(default)]
    pub periscope: CredentialLayer,
    #[serde(default)]
    pub video: CaptureLayer,
}

impl MasterConfig {
    pub fn layer(&self) -> ConfigLayer {
        ConfigLayer {
            periscope: self.periscope.clone(),
            video: self.video,
        }
    }
}

enum FileFormat {
    Json,
    Yaml,
}

impl FileFormat {
    fn for_path(path: &str) -> Self {
        let ext = Path::new(path).extension().and_then(|e| e.to_str());
        match ext.map(str::to_ascii_lowercase).as_deref() {
            Some("yaml") | Some("yml") => FileFormat::Yaml,
            _ => FileFormat::Json,
        }
    }
}

pub fn load_config(path: &str) -> Result<MasterConfig, AppError> {
    info!("📄 Using configuration file '{}'", path);
    let start_time = Instant::now();

    let config_str = fs::read_to_string(path)
        .map_err(|e| AppError::config_file(path, format!("Failed to read file: {}", e)))?;
    debug!("Read config file in {:?}", start_time.elapsed());

    let config = parse_config(path, &config_str)?;
    debug!("Loaded configuration file '{}' in {:?}", path, start_time.elapsed());
    Ok(config)
}

/// Decodes file content; `path` only selects the format and labels errors.
pub fn parse_config(path: &str, content: &str) -> Result<MasterConfig, AppError> {
    let parse_start_time = Instant::now();
    let decode_error = |e: &dyn std::fmt::Display| {
        AppError::config_file(path, format!("Error in configuration file: {}", e))
    };
    let config: MasterConfig = match FileFormat::for_path(path) {
        FileFormat::Yaml => serde_yaml::from_str(content).map_err(|e| decode_error(&e))?,
        FileFormat::Json => serde_json::from_str(content).map_err(|e| decode_error(&e))?,
    };
    debug!("Parsed configuration in {:?}", parse_start_time.elapsed());
    Ok(config)
}

pub fn validate_effective_config(config: &EffectiveConfiguration) -> Result<(), AppError> {
    debug!("🕵️ Validating effective configuration...");
    let capture = &config.capture;
    if capture.width == 0 || capture.height == 0 {
        return Err(AppError::InvalidConfig(format!(
            "Video dimensions must be non-zero, got {}x{}.",
            capture.width, capture.height
        )));
    }
    if capture.bitrate == 0 {
        return Err(AppError::InvalidConfig("Video bitrate must be non-zero.".to_string()));
    }
    if !(1..=100).contains(&capture.quality) {
        return Err(AppError::InvalidConfig(format!(
            "Video quality must be between 1 and 100, got {}.",
            capture.quality
        )));
    }
    Ok(())
}
