pub mod data;
pub mod io;
pub mod keys;
pub mod printing;

pub use data::{CameraConfig, Config, VoiceConfig};
pub use io::ConfigError;
pub use keys::ConfigKey;

#[cfg(test)]
mod tests;
