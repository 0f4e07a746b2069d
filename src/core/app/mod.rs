use std::sync::Arc;

use tracing::{info, warn};

use crate::core::camera::CameraController;
use crate::core::history::{ChatLog, LoadOutcome, CORRUPT_HISTORY_KEY};
use crate::core::message::{actionable_indices, Message, MessageKind};
use crate::core::storage::KeyValueStore;
use crate::core::theme::ThemeToggle;
use crate::core::voice::RecognitionSettings;

pub mod actions;
pub mod ui_state;

pub use actions::{apply_action, apply_actions, AppAction, AppActionDispatcher, AppCommand};
pub use ui_state::{ExitReason, UiState};

/// Optional devices the session was started with.
#[derive(Debug, Clone, Default)]
pub struct Capabilities {
    /// Present when a speech recognizer is configured.
    pub voice: Option<RecognitionSettings>,
    pub camera: bool,
}

pub struct App {
    pub history: ChatLog,
    pub theme: ThemeToggle,
    pub ui: UiState,
    pub camera: CameraController,
    voice: Option<RecognitionSettings>,
}

impl App {
    /// Restore the chat log and theme from `store` and report what was found.
    pub fn new(store: Arc<dyn KeyValueStore>, capabilities: Capabilities) -> Self {
        let theme = ThemeToggle::load(store.clone());
        let mut ui = UiState::new();

        let history = match ChatLog::load(store.clone()) {
            Ok((log, outcome)) => {
                match outcome {
                    LoadOutcome::Empty => {}
                    LoadOutcome::Restored(count) => {
                        info!(count, "restored chat history");
                        ui.set_status(format!("Restored {}", plural(count, "message")));
                    }
                    LoadOutcome::Corrupt { error, backed_up } => {
                        warn!(%error, backed_up, "discarding unreadable chat history");
                        let mut alert = format!("{error}. Starting with an empty chat.");
                        if backed_up {
                            alert.push_str(&format!(
                                " The old contents were kept as {CORRUPT_HISTORY_KEY}."
                            ));
                        }
                        ui.raise_alert(alert);
                    }
                }
                log
            }
            Err(err) => {
                warn!(%err, "chat history could not be read");
                ui.raise_alert(format!("{err}. Starting with an empty chat."));
                ChatLog::empty(store)
            }
        };

        Self {
            history,
            theme,
            ui,
            camera: CameraController::new(capabilities.camera),
            voice: capabilities.voice,
        }
    }

    #[cfg(test)]
    pub fn from_store(store: Arc<dyn KeyValueStore>, voice: bool, camera: bool) -> Self {
        let voice = voice.then(|| RecognitionSettings::single_shot("en-US"));
        Self::new(store, Capabilities { voice, camera })
    }

    pub fn messages(&self) -> &[Message] {
        self.history.messages()
    }

    pub fn voice_settings(&self) -> Option<&RecognitionSettings> {
        self.voice.as_ref()
    }

    /// Append through the chat log and follow the transcript to the end.
    /// Returns false, with an alert raised, when the message could not be saved.
    pub fn add_message(
        &mut self,
        text: impl Into<String>,
        kind: MessageKind,
        allow_actions: bool,
    ) -> bool {
        match self.history.append(Message::new(text, kind, allow_actions)) {
            Ok(()) => {
                self.ui.follow_latest();
                true
            }
            Err(err) => {
                warn!(%err, "message not saved");
                self.ui.raise_alert(format!("Could not save chat history: {err}"));
                false
            }
        }
    }

    /// Resolve a 1-based reply ordinal, or the latest reply when `None`.
    pub fn actionable_reply(&self, ordinal: Option<usize>) -> Result<(usize, &Message), String> {
        let indices = actionable_indices(self.messages());
        let position = match ordinal {
            None => indices.len().checked_sub(1).ok_or("No replies yet")?,
            Some(0) => return Err("Replies are numbered from 1".to_string()),
            Some(n) => n - 1,
        };
        indices
            .get(position)
            .map(|&index| (position + 1, &self.messages()[index]))
            .ok_or_else(|| format!("No such reply: #{}", position + 1))
    }
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("1 {noun}")
    } else {
        format!("{count} {noun}s")
    }
}
