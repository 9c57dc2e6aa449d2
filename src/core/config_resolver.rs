use crate::camera_config::{ConfigLayer, EffectiveConfiguration};
use log::debug;

/// Resolves the effective configuration with precedence defaults < file < CLI.
///
/// File and CLI layers are merged first and the result is applied over the
/// defaults. Pure and total: decoding errors happen before this step.
pub fn resolve(
    defaults: EffectiveConfiguration,
    file_config: ConfigLayer,
    cli_config: ConfigLayer,
) -> EffectiveConfiguration {
    let overrides = file_config.merge(cli_config);
    let resolved = defaults.overlay(overrides);
    debug!(
        "Resolved configuration: key={} {}x{} sharpness={} quality={} bitrate={} vflip={} hflip={}",
        resolved.destination,
        resolved.capture.width,
        resolved.capture.height,
        resolved.capture.sharpness,
        resolved.capture.quality,
        resolved.capture.bitrate,
        resolved.capture.vertical_flip,
        resolved.capture.horizontal_flip,
    );
    resolved
}
