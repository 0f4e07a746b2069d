use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_VOICE_LOCALE: &str = "en-US";
pub const DEFAULT_CAMERA_WIDTH: u32 = 640;
pub const DEFAULT_CAMERA_HEIGHT: u32 = 480;

/// Environment override for the chat server base URL.
pub const SERVER_URL_ENV: &str = "PARLEY_SERVER_URL";

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct VoiceConfig {
    /// Recognizer argv. `{locale}` is replaced with the configured locale.
    /// Voice input is unavailable while this is unset.
    pub command: Option<Vec<String>>,
    pub locale: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct CameraConfig {
    /// Capture argv that writes raw RGB24 frames of `width x height` to
    /// stdout until killed. `{width}` and `{height}` are substituted.
    pub command: Option<Vec<String>>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the chat server (e.g., "http://127.0.0.1:5000")
    pub server_url: Option<String>,
    /// Directory holding the history and theme slots
    pub data_dir: Option<PathBuf>,
    #[serde(default)]
    pub voice: VoiceConfig,
    #[serde(default)]
    pub camera: CameraConfig,
}

impl Config {
    /// Resolve the server URL: explicit override, then environment, then
    /// config file, then the built-in default.
    pub fn resolve_server_url(&self, cli_override: Option<&str>) -> String {
        let env_value = std::env::var(SERVER_URL_ENV).ok();
        Self::pick_server_url(cli_override, env_value.as_deref(), self.server_url.as_deref())
    }

    pub(crate) fn pick_server_url(
        cli_override: Option<&str>,
        env_value: Option<&str>,
        configured: Option<&str>,
    ) -> String {
        [cli_override, env_value, configured]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|value| !value.is_empty())
            .unwrap_or(DEFAULT_SERVER_URL)
            .to_string()
    }

    pub fn voice_locale(&self) -> &str {
        self.voice
            .locale
            .as_deref()
            .filter(|locale| !locale.trim().is_empty())
            .unwrap_or(DEFAULT_VOICE_LOCALE)
    }

    pub fn voice_command(&self) -> Option<&[String]> {
        self.voice
            .command
            .as_deref()
            .filter(|argv| !argv.is_empty())
    }

    pub fn camera_command(&self) -> Option<&[String]> {
        self.camera
            .command
            .as_deref()
            .filter(|argv| !argv.is_empty())
    }

    pub fn camera_dimensions(&self) -> (u32, u32) {
        (
            self.camera.width.unwrap_or(DEFAULT_CAMERA_WIDTH),
            self.camera.height.unwrap_or(DEFAULT_CAMERA_HEIGHT),
        )
    }
}

pub fn path_display(path: &Path) -> String {
    path.display().to_string()
}
