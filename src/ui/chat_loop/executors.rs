//! Runs the side effects the reducer asks for and reports back with actions.

use std::path::Path;
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::debug;

use crate::api::{mime_for_file_name, ChatBackend};
use crate::core::app::{AppAction, AppActionDispatcher, AppCommand};
use crate::core::camera::{capture_png, CameraDevice, CameraError, CameraStream};
use crate::core::voice::{RecognitionSettings, SpeechRecognizer, VoiceError};
use crate::utils::clipboard::{copy_to_clipboard, ClipboardError};

pub type ClipboardFn = fn(&str) -> Result<(), ClipboardError>;

/// The outside world the chat session talks to.
#[derive(Clone)]
pub struct Services {
    pub backend: Arc<dyn ChatBackend>,
    pub recognizer: Option<Arc<dyn SpeechRecognizer>>,
    pub camera: Option<Arc<dyn CameraDevice>>,
    pub clipboard: ClipboardFn,
}

impl Services {
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        Self {
            backend,
            recognizer: None,
            camera: None,
            clipboard: copy_to_clipboard,
        }
    }
}

#[derive(Clone)]
pub struct CommandExecutor {
    services: Services,
    dispatcher: AppActionDispatcher,
}

impl CommandExecutor {
    pub fn new(services: Services, dispatcher: AppActionDispatcher) -> Self {
        Self {
            services,
            dispatcher,
        }
    }

    /// Start `command` on its own task. Nothing started here is cancelled.
    pub fn spawn(&self, command: AppCommand) -> JoinHandle<()> {
        let executor = self.clone();
        tokio::spawn(async move { executor.run(command).await })
    }

    pub async fn run(&self, command: AppCommand) {
        match command {
            AppCommand::SendChat { message } => self.send_chat(&message).await,
            AppCommand::CopyToClipboard { ordinal, text } => self.copy(ordinal, text).await,
            AppCommand::Recognize { settings } => self.recognize(&settings).await,
            AppCommand::OpenCamera => self.open_camera().await,
            AppCommand::CaptureAndUpload { stream } => self.capture_and_upload(stream).await,
            AppCommand::UploadFile { path } => self.upload_file(&path).await,
            AppCommand::SignIn {
                username,
                password,
                new_account,
            } => self.sign_in(username, &password, new_account).await,
            AppCommand::Logout => {
                let error = self.services.backend.logout().await.err();
                self.dispatcher.dispatch(AppAction::LoggedOut { error });
            }
        }
    }

    async fn send_chat(&self, message: &str) {
        let action = match self.services.backend.send_message(message).await {
            Ok(reply) => AppAction::ChatReplyReceived { reply },
            Err(error) => AppAction::ChatFailed { error },
        };
        self.dispatcher.dispatch(action);
    }

    async fn copy(&self, ordinal: usize, text: String) {
        let clipboard = self.services.clipboard;
        let result = match tokio::task::spawn_blocking(move || clipboard(&text)).await {
            Ok(result) => result.map_err(|err| err.to_string()),
            Err(err) => Err(err.to_string()),
        };
        self.dispatcher
            .dispatch(AppAction::CopyFinished { ordinal, result });
    }

    async fn recognize(&self, settings: &RecognitionSettings) {
        let Some(recognizer) = &self.services.recognizer else {
            self.dispatcher.dispatch(AppAction::VoiceFailed {
                error: VoiceError::AudioCapture("no recognizer configured".into()),
            });
            return;
        };

        self.dispatcher.dispatch(AppAction::VoiceStarted);
        let action = match recognizer.recognize(settings).await {
            Ok(transcript) => AppAction::VoiceRecognized { transcript },
            Err(error) => AppAction::VoiceFailed { error },
        };
        self.dispatcher.dispatch(action);
    }

    async fn open_camera(&self) {
        let action = match &self.services.camera {
            Some(camera) => match camera.open().await {
                Ok(stream) => AppAction::CameraOpened { stream },
                Err(error) => AppAction::CameraFailed { error },
            },
            None => AppAction::CameraFailed {
                error: CameraError::Access("no camera configured".into()),
            },
        };
        self.dispatcher.dispatch(action);
    }

    async fn capture_and_upload(&self, stream: Box<dyn CameraStream>) {
        let result = match capture_png(stream).await {
            Ok(png) => {
                debug!(bytes = png.len(), "uploading capture");
                self.services
                    .backend
                    .upload_image(png)
                    .await
                    .map(|_| ())
                    .map_err(|err| format!("Image upload failed: {err}"))
            }
            Err(err) => Err(format!("Capture failed: {err}")),
        };
        self.dispatcher
            .dispatch(AppAction::UploadFinished { result });
    }

    async fn upload_file(&self, path: &Path) {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let result = match tokio::fs::read(path).await {
            Ok(bytes) => {
                let mime = mime_for_file_name(&name);
                debug!(%name, mime, bytes = bytes.len(), "uploading file");
                self.services
                    .backend
                    .upload_file(&name, mime, bytes)
                    .await
                    .map(|_| ())
                    .map_err(|err| format!("Upload of {name} failed: {err}"))
            }
            Err(err) => Err(format!("Cannot read {}: {err}", path.display())),
        };
        self.dispatcher
            .dispatch(AppAction::FileUploadFinished { name, result });
    }

    async fn sign_in(&self, username: String, password: &str, new_account: bool) {
        let backend = &self.services.backend;
        let outcome = if new_account {
            backend.signup(&username, password).await
        } else {
            backend.login(&username, password).await
        };
        let result = outcome.map_err(|err| err.to_string());
        self.dispatcher
            .dispatch(AppAction::SignedIn { username, result });
    }
}
