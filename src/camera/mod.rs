pub mod device_configurator;
pub mod stream_launcher;
