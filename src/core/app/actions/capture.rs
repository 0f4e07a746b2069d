use tracing::{info, warn};

use super::chat::submit_message;
use super::{App, AppAction, AppCommand};
use crate::core::message::MessageKind;

pub const LISTENING_TEXT: &str = "🎤 Listening...";
pub const UPLOADED_TEXT: &str = "📷 Image captured and uploaded";

pub fn file_uploaded_text(name: &str) -> String {
    format!("📎 {name} uploaded")
}

pub(super) fn handle_capture_action(app: &mut App, action: AppAction) -> Option<AppCommand> {
    match action {
        AppAction::StartVoice => match app.voice_settings() {
            Some(settings) => Some(AppCommand::Recognize {
                settings: settings.clone(),
            }),
            None => {
                app.ui.raise_alert(
                    "Voice recognition is unavailable. Set voice.command in config.toml to enable it.",
                );
                None
            }
        },
        AppAction::VoiceStarted => {
            app.add_message(LISTENING_TEXT, MessageKind::Bot, false);
            None
        }
        AppAction::VoiceRecognized { transcript } => {
            app.ui.set_input_text(&transcript);
            let message = app.ui.input_text();
            submit_message(app, &message)
        }
        AppAction::VoiceFailed { error } => {
            warn!(%error, "speech recognition failed");
            app.ui.raise_alert(format!("Voice error: {}", error.code()));
            None
        }
        AppAction::OpenCamera => {
            if !app.camera.is_available() {
                app.ui.raise_alert(
                    "Camera capture is unavailable. Set camera.command in config.toml to enable it.",
                );
                return None;
            }
            if app.camera.release() {
                info!("released previous camera stream");
            }
            app.ui.set_status("Opening camera...");
            Some(AppCommand::OpenCamera)
        }
        AppAction::CameraOpened { stream } => {
            let (width, height) = stream.dimensions();
            app.camera.attach(stream);
            app.ui.set_status(format!(
                "Camera live ({width}x{height}). Ctrl+P or /capture takes a picture"
            ));
            None
        }
        AppAction::CameraFailed { error } => {
            warn!(%error, "camera unavailable");
            app.ui.raise_alert(format!("Cannot access camera: {error}"));
            None
        }
        AppAction::CaptureImage => match app.camera.take_for_capture() {
            Some(stream) => {
                app.ui.uploading = true;
                app.ui.set_status("Uploading picture...");
                Some(AppCommand::CaptureAndUpload { stream })
            }
            None => {
                app.ui.set_status("Camera is not open. Ctrl+O or /camera starts it");
                None
            }
        },
        AppAction::UploadFinished { result } => {
            app.ui.uploading = false;
            match result {
                Ok(()) => {
                    app.ui.clear_status();
                    app.add_message(UPLOADED_TEXT, MessageKind::User, false);
                }
                Err(detail) => {
                    warn!(%detail, "picture upload failed");
                    app.ui.raise_alert(detail);
                }
            }
            None
        }
        AppAction::UploadFile { path } => {
            app.ui.uploading = true;
            app.ui.set_status(format!("Uploading {}...", path.display()));
            Some(AppCommand::UploadFile { path })
        }
        AppAction::FileUploadFinished { name, result } => {
            app.ui.uploading = false;
            match result {
                Ok(()) => {
                    app.ui.clear_status();
                    app.add_message(file_uploaded_text(&name), MessageKind::User, false);
                }
                Err(detail) => {
                    warn!(%detail, %name, "file upload failed");
                    app.ui.raise_alert(detail);
                }
            }
            None
        }
        _ => unreachable!("non-capture action routed to capture handler"),
    }
}
