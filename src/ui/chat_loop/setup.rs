use std::sync::Arc;

use tracing::info;

use super::executors::Services;
use crate::api::{BackendError, HttpBackend};
use crate::core::app::{App, Capabilities};
use crate::core::camera::{CameraDevice, CommandCamera};
use crate::core::config::Config;
use crate::core::storage::KeyValueStore;
use crate::core::voice::{CommandRecognizer, RecognitionSettings, SpeechRecognizer};

pub struct SessionBootstrap {
    pub app: App,
    pub services: Services,
}

/// Wire the configured server and devices to an `App` restored from `store`.
pub fn bootstrap_session(
    config: &Config,
    store: Arc<dyn KeyValueStore>,
    server_override: Option<&str>,
) -> Result<SessionBootstrap, BackendError> {
    let backend = HttpBackend::new(config.resolve_server_url(server_override))?;
    info!(server_url = backend.base_url(), "starting chat session");

    let mut services = Services::new(Arc::new(backend));

    let recognizer = config
        .voice_command()
        .and_then(|argv| CommandRecognizer::new(argv.to_vec()));
    let voice = recognizer
        .is_some()
        .then(|| RecognitionSettings::single_shot(config.voice_locale()));
    services.recognizer = recognizer.map(|r| Arc::new(r) as Arc<dyn SpeechRecognizer>);

    let (width, height) = config.camera_dimensions();
    services.camera = config
        .camera_command()
        .and_then(|argv| CommandCamera::new(argv.to_vec(), width, height))
        .map(|camera| Arc::new(camera) as Arc<dyn CameraDevice>);

    let capabilities = Capabilities {
        voice,
        camera: services.camera.is_some(),
    };
    info!(
        voice = capabilities.voice.is_some(),
        camera = capabilities.camera,
        "capabilities"
    );

    Ok(SessionBootstrap {
        app: App::new(store, capabilities),
        services,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::storage::MemoryStore;

    #[test]
    fn unconfigured_devices_are_unavailable() {
        let session = bootstrap_session(
            &Config::default(),
            Arc::new(MemoryStore::new()),
            Some("http://localhost:9"),
        )
        .unwrap();
        assert!(session.app.voice_settings().is_none());
        assert!(!session.app.camera.is_available());
        assert!(session.services.recognizer.is_none());
        assert!(session.services.camera.is_none());
    }

    #[test]
    fn configured_devices_are_wired() {
        let mut config = Config::default();
        config.voice.command = Some(vec!["stt".into(), "{locale}".into()]);
        config.voice.locale = Some("fr-FR".into());
        config.camera.command = Some(vec!["cam".into()]);

        let session = bootstrap_session(&config, Arc::new(MemoryStore::new()), None).unwrap();

        let settings = session.app.voice_settings().expect("voice configured");
        assert_eq!(settings.locale, "fr-FR");
        assert!(session.app.camera.is_available());
        assert!(session.services.camera.is_some());
    }
}
