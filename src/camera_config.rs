use serde::{Deserialize, Deserializer};
use std::fmt;

/// Opaque stream key for the ingest endpoint. Empty means unset.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct DestinationCredential(String);

impl DestinationCredential {
    pub fn new(key: impl Into<String>) -> Self {
        DestinationCredential(key.into())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

// Keys must never end up in log output.
impl fmt::Debug for DestinationCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DestinationCredential({})", self)
    }
}

impl fmt::Display for DestinationCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("<unset>")
        } else {
            f.write_str("<redacted>")
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureSettings {
    pub width: u32,     // pixels
    pub height: u32,    // pixels
    pub sharpness: i32, // device-defined scale
    pub quality: u32,   // compression quality
    pub bitrate: u32,   // bits/sec
    pub vertical_flip: bool,
    pub horizontal_flip: bool,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        CaptureSettings {
            width: 960,
            height: 540,
            sharpness: 30,
            quality: 80,
            bitrate: 800_000,
            vertical_flip: false,
            horizontal_flip: false,
        }
    }
}

impl CaptureSettings {
    pub fn overlay(self, layer: CaptureLayer) -> Self {
        CaptureSettings {
            width: layer.width.unwrap_or(self.width),
            height: layer.height.unwrap_or(self.height),
            sharpness: layer.sharpness.unwrap_or(self.sharpness),
            quality: layer.quality.unwrap_or(self.quality),
            bitrate: layer.bitrate.unwrap_or(self.bitrate),
            vertical_flip: layer.vertical_flip.unwrap_or(self.vertical_flip),
            horizontal_flip: layer.horizontal_flip.unwrap_or(self.horizontal_flip),
        }
    }
}

/// The resolved configuration handed to the device configurator and the stream launcher.
///
/// `Default` yields the compiled-in baseline that every run starts from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EffectiveConfiguration {
    pub destination: DestinationCredential,
    pub capture: CaptureSettings,
}

impl EffectiveConfiguration {
    /// Applies every field `layer` sets on top of `self`.
    pub fn overlay(self, layer: ConfigLayer) -> Self {
        let destination = match layer.periscope.key {
            Some(key) => DestinationCredential::new(key),
            None => self.destination,
        };
        EffectiveConfiguration {
            destination,
            capture: self.capture.overlay(layer.video),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CredentialLayer {
    #[serde(default, deserialize_with = "empty_as_unset")]
    pub key: Option<String>,
}

impl CredentialLayer {
    /// Builds the layer from a raw flag value; an empty string leaves the key unset.
    pub fn from_key(key: Option<&str>) -> Self {
        CredentialLayer {
            key: key.filter(|k| !k.is_empty()).map(str::to_string),
        }
    }

    pub fn merge(self, higher: CredentialLayer) -> CredentialLayer {
        CredentialLayer {
            key: higher.key.or(self.key),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct CaptureLayer {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub sharpness: Option<i32>,
    pub quality: Option<u32>,
    pub bitrate: Option<u32>,
    #[serde(rename = "vflip")]
    pub vertical_flip: Option<bool>,
    #[serde(rename = "hflip")]
    pub horizontal_flip: Option<bool>,
}

impl CaptureLayer {
    pub fn merge(self, higher: CaptureLayer) -> CaptureLayer {
        CaptureLayer {
            width: higher.width.or(self.width),
            height: higher.height.or(self.height),
            sharpness: higher.sharpness.or(self.sharpness),
            quality: higher.quality.or(self.quality),
            bitrate: higher.bitrate.or(self.bitrate),
            vertical_flip: higher.vertical_flip.or(self.vertical_flip),
            horizontal_flip: higher.horizontal_flip.or(self.horizontal_flip),
        }
    }
}

/// One configuration source. A `None` field is not set by this layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigLayer {
    pub periscope: CredentialLayer,
    pub video: CaptureLayer,
}

impl ConfigLayer {
    /// Field-wise merge where every field set in `higher` wins.
    pub fn merge(self, higher: ConfigLayer) -> ConfigLayer {
        ConfigLayer {
            periscope: self.periscope.merge(higher.periscope),
            video: self.video.merge(higher.video),
        }
    }
}

fn empty_as_unset<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}
