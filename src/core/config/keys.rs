//! Scalar configuration keys settable from the command line.

use crate::core::config::data::Config;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    ServerUrl,
    DataDir,
    VoiceLocale,
}

impl ConfigKey {
    pub fn all() -> &'static [ConfigKey] {
        &[
            ConfigKey::ServerUrl,
            ConfigKey::DataDir,
            ConfigKey::VoiceLocale,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ConfigKey::ServerUrl => "server-url",
            ConfigKey::DataDir => "data-dir",
            ConfigKey::VoiceLocale => "voice-locale",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|key| key.as_str().eq_ignore_ascii_case(name.trim()))
    }
}

impl Config {
    pub fn set_key(&mut self, key: ConfigKey, value: &str) -> Result<(), String> {
        let value = value.trim();
        if value.is_empty() {
            return Err(format!("A value is required for {}", key.as_str()));
        }
        match key {
            ConfigKey::ServerUrl => {
                if !(value.starts_with("http://") || value.starts_with("https://")) {
                    return Err(format!("server-url must start with http:// or https://: {value}"));
                }
                self.server_url = Some(value.to_string());
            }
            ConfigKey::DataDir => self.data_dir = Some(PathBuf::from(value)),
            ConfigKey::VoiceLocale => self.voice.locale = Some(value.to_string()),
        }
        Ok(())
    }

    pub fn unset_key(&mut self, key: ConfigKey) {
        match key {
            ConfigKey::ServerUrl => self.server_url = None,
            ConfigKey::DataDir => self.data_dir = None,
            ConfigKey::VoiceLocale => self.voice.locale = None,
        }
    }
}
