use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration File Error ({path}): {details}")]
    ConfigFile { path: String, details: String },

    #[error("Invalid Configuration: {0}")]
    InvalidConfig(String),

    #[error("Stream key (-k, --key) is required.")]
    MissingCredential,

    #[error("Device Configuration Error: {0}")]
    DeviceConfiguration(String),

    #[error("Encoder Launch Error: {0}")]
    Launch(String),
}

impl AppError {
    pub fn config_file(path: &str, details: impl std::fmt::Display) -> Self {
        AppError::ConfigFile {
            path: path.to_string(),
            details: details.to_string(),
        }
    }
}
