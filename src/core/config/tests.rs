use super::data::{DEFAULT_CAMERA_HEIGHT, DEFAULT_CAMERA_WIDTH, DEFAULT_SERVER_URL};
use super::*;
use tempfile::TempDir;

#[test]
fn test_load_nonexistent_config() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("nonexistent_config.toml");

    let config = Config::load_from_path(&config_path).expect("Failed to load config");

    assert_eq!(config, Config::default());
}

#[test]
fn test_save_and_load_config() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("nested").join("config.toml");

    let config = Config {
        server_url: Some("http://chat.local:8080".to_string()),
        voice: VoiceConfig {
            command: Some(vec!["stt".to_string(), "{locale}".to_string()]),
            locale: Some("fr-FR".to_string()),
        },
        ..Default::default()
    };

    config
        .save_to_path(&config_path)
        .expect("Failed to save config");
    let loaded = Config::load_from_path(&config_path).expect("Failed to load config");

    assert_eq!(loaded, config);
}

#[test]
fn test_parse_error_names_the_path() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, "server_url = [").unwrap();

    let err = Config::load_from_path(&config_path).unwrap_err();

    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().contains("config.toml"));
}

#[test]
fn test_sectioned_config_parses() {
    let config: Config = toml::from_str(
        r#"
server_url = "https://chat.example.com"

[voice]
command = ["whisper-once", "--lang", "{locale}"]

[camera]
command = ["ffmpeg", "-i", "/dev/video0", "-f", "rawvideo", "-"]
width = 320
"#,
    )
    .unwrap();

    assert_eq!(config.voice_locale(), "en-US");
    assert_eq!(config.voice_command().map(<[String]>::len), Some(3));
    assert_eq!(config.camera_dimensions(), (320, DEFAULT_CAMERA_HEIGHT));
}

#[test]
fn test_empty_commands_disable_capabilities() {
    let config = Config {
        voice: VoiceConfig {
            command: Some(Vec::new()),
            locale: Some("  ".to_string()),
        },
        camera: CameraConfig {
            command: Some(Vec::new()),
            ..Default::default()
        },
        ..Default::default()
    };

    assert!(config.voice_command().is_none());
    assert!(config.camera_command().is_none());
    assert_eq!(config.voice_locale(), "en-US");
    assert_eq!(
        config.camera_dimensions(),
        (DEFAULT_CAMERA_WIDTH, DEFAULT_CAMERA_HEIGHT)
    );
}

#[test]
fn test_server_url_precedence() {
    assert_eq!(
        Config::pick_server_url(Some("http://cli"), Some("http://env"), Some("http://file")),
        "http://cli"
    );
    assert_eq!(
        Config::pick_server_url(None, Some("http://env"), Some("http://file")),
        "http://env"
    );
    assert_eq!(
        Config::pick_server_url(Some("  "), None, Some("http://file")),
        "http://file"
    );
    assert_eq!(Config::pick_server_url(None, None, None), DEFAULT_SERVER_URL);
}

#[test]
fn test_set_and_unset_keys() {
    let mut config = Config::default();

    config
        .set_key(ConfigKey::ServerUrl, "https://chat.example.com")
        .unwrap();
    config.set_key(ConfigKey::VoiceLocale, "de-DE").unwrap();
    assert!(config.set_key(ConfigKey::ServerUrl, "ftp://nope").is_err());
    assert!(config.set_key(ConfigKey::DataDir, "   ").is_err());

    assert_eq!(config.server_url.as_deref(), Some("https://chat.example.com"));
    assert_eq!(config.voice_locale(), "de-DE");

    config.unset_key(ConfigKey::ServerUrl);
    assert_eq!(config.server_url, None);
}

#[test]
fn test_config_key_names() {
    assert_eq!(ConfigKey::parse("Server-URL"), Some(ConfigKey::ServerUrl));
    assert_eq!(ConfigKey::parse("theme"), None);
}
