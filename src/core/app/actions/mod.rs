mod capture;
mod chat;
mod input;

use std::path::PathBuf;

use tokio::sync::mpsc;

use super::App;
use crate::api::BackendError;
use crate::core::camera::{CameraError, CameraStream};
use crate::core::voice::{RecognitionSettings, VoiceError};

pub enum AppAction {
    /// Enter in the input box: run a command or send the text.
    SubmitInput,
    SubmitMessage {
        message: String,
    },
    ChatReplyReceived {
        reply: String,
    },
    ChatFailed {
        error: BackendError,
    },
    NewChat,
    ShowHistory,
    ToggleTheme,
    /// `None` targets the latest actionable reply.
    CopyReply {
        ordinal: Option<usize>,
    },
    CopyFinished {
        ordinal: usize,
        result: Result<(), String>,
    },
    EditReply {
        ordinal: Option<usize>,
    },
    StartVoice,
    VoiceStarted,
    VoiceRecognized {
        transcript: String,
    },
    VoiceFailed {
        error: VoiceError,
    },
    OpenCamera,
    CameraOpened {
        stream: Box<dyn CameraStream>,
    },
    CameraFailed {
        error: CameraError,
    },
    CaptureImage,
    UploadFinished {
        result: Result<(), String>,
    },
    UploadFile {
        path: PathBuf,
    },
    FileUploadFinished {
        name: String,
        result: Result<(), String>,
    },
    /// `new_account` picks `/signup` over `/login`.
    SignIn {
        username: String,
        password: String,
        new_account: bool,
    },
    SignedIn {
        username: String,
        result: Result<(), String>,
    },
    Logout,
    LoggedOut {
        error: Option<BackendError>,
    },
    ShowHelp,
    DismissOverlay,
    Quit,
}

#[derive(Clone)]
pub struct AppActionDispatcher {
    tx: mpsc::UnboundedSender<AppAction>,
}

impl AppActionDispatcher {
    pub fn new(tx: mpsc::UnboundedSender<AppAction>) -> Self {
        Self { tx }
    }

    pub fn dispatch(&self, action: AppAction) {
        let _ = self.tx.send(action);
    }
}

/// Work the reducer hands to the async side.
pub enum AppCommand {
    SendChat {
        message: String,
    },
    CopyToClipboard {
        ordinal: usize,
        text: String,
    },
    Recognize {
        settings: RecognitionSettings,
    },
    OpenCamera,
    CaptureAndUpload {
        stream: Box<dyn CameraStream>,
    },
    UploadFile {
        path: PathBuf,
    },
    SignIn {
        username: String,
        password: String,
        new_account: bool,
    },
    Logout,
}

pub fn apply_actions(
    app: &mut App,
    actions: impl IntoIterator<Item = AppAction>,
) -> Vec<AppCommand> {
    let mut commands = Vec::new();
    for action in actions {
        if let Some(cmd) = apply_action(app, action) {
            commands.push(cmd);
        }
    }
    commands
}

pub fn apply_action(app: &mut App, action: AppAction) -> Option<AppCommand> {
    match action {
        AppAction::SubmitInput
        | AppAction::SubmitMessage { .. }
        | AppAction::ChatReplyReceived { .. }
        | AppAction::ChatFailed { .. }
        | AppAction::NewChat
        | AppAction::ShowHistory
        | AppAction::SignIn { .. }
        | AppAction::SignedIn { .. }
        | AppAction::Logout
        | AppAction::LoggedOut { .. }
        | AppAction::Quit => chat::handle_chat_action(app, action),

        AppAction::StartVoice
        | AppAction::VoiceStarted
        | AppAction::VoiceRecognized { .. }
        | AppAction::VoiceFailed { .. }
        | AppAction::OpenCamera
        | AppAction::CameraOpened { .. }
        | AppAction::CameraFailed { .. }
        | AppAction::CaptureImage
        | AppAction::UploadFinished { .. }
        | AppAction::UploadFile { .. }
        | AppAction::FileUploadFinished { .. } => capture::handle_capture_action(app, action),

        AppAction::ToggleTheme
        | AppAction::CopyReply { .. }
        | AppAction::CopyFinished { .. }
        | AppAction::EditReply { .. }
        | AppAction::ShowHelp
        | AppAction::DismissOverlay => input::handle_input_action(app, action),
    }
}
