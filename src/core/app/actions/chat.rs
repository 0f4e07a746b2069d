use tracing::{debug, warn};

use super::{apply_action, App, AppAction, AppCommand};
use crate::commands::{process_input, CommandResult};
use crate::core::app::ExitReason;
use crate::core::message::MessageKind;

pub(super) fn handle_chat_action(app: &mut App, action: AppAction) -> Option<AppCommand> {
    match action {
        AppAction::SubmitInput => submit_input(app),
        AppAction::SubmitMessage { message } => submit_message(app, &message),
        AppAction::ChatReplyReceived { reply } => {
            app.ui.pending_replies = app.ui.pending_replies.saturating_sub(1);
            app.add_message(reply, MessageKind::Bot, true);
            None
        }
        AppAction::ChatFailed { error } => {
            app.ui.pending_replies = app.ui.pending_replies.saturating_sub(1);
            warn!(%error, "chat request failed");
            app.ui.raise_alert(format!("Chat request failed: {error}"));
            None
        }
        AppAction::NewChat => {
            match app.history.clear() {
                Ok(()) => {
                    app.ui.follow_latest();
                    app.ui.set_status("Started a new chat");
                }
                Err(err) => {
                    warn!(%err, "chat history not cleared");
                    app.ui.raise_alert(format!("Could not clear chat history: {err}"));
                }
            }
            None
        }
        AppAction::ShowHistory => {
            if let Err(err) = app.history.reload() {
                warn!(%err, "chat history not reloaded");
                app.ui.raise_alert(format!("{err}"));
                return None;
            }
            if app.history.is_empty() {
                app.ui.raise_alert("No past chats available.");
            } else {
                app.ui.follow_latest();
                app.ui
                    .set_status(format!("Showing {} saved messages", app.history.len()));
            }
            None
        }
        AppAction::SignIn {
            username,
            password,
            new_account,
        } => {
            app.ui.set_status(format!("Signing in as {username}..."));
            Some(AppCommand::SignIn {
                username,
                password,
                new_account,
            })
        }
        AppAction::SignedIn { username, result } => {
            match result {
                Ok(()) => {
                    app.ui.set_status(format!("Signed in as {username}"));
                    app.ui.account = Some(username);
                }
                Err(detail) => {
                    warn!(%detail, %username, "sign-in failed");
                    app.ui.raise_alert(format!("Sign-in failed: {detail}"));
                }
            }
            None
        }
        AppAction::Logout => {
            app.ui.set_status("Logging out...");
            Some(AppCommand::Logout)
        }
        AppAction::LoggedOut { error } => {
            if let Some(error) = error {
                warn!(%error, "logout request failed");
            }
            app.camera.release();
            app.ui.request_exit(ExitReason::LoggedOut);
            None
        }
        AppAction::Quit => {
            app.camera.release();
            app.ui.request_exit(ExitReason::Quit);
            None
        }
        _ => unreachable!("non-chat action routed to chat handler"),
    }
}

fn submit_input(app: &mut App) -> Option<AppCommand> {
    let input = app.ui.input_text();
    if input.trim().is_empty() {
        return None;
    }

    match process_input(app, &input) {
        CommandResult::Continue => {
            app.ui.clear_input();
            None
        }
        CommandResult::ProcessAsMessage(message) => submit_message(app, &message),
        CommandResult::Dispatch(action) => {
            app.ui.clear_input();
            apply_action(app, action)
        }
    }
}

/// Append the user's message, clear the input, then ask for a reply.
pub(super) fn submit_message(app: &mut App, message: &str) -> Option<AppCommand> {
    let message = message.trim();
    if message.is_empty() {
        return None;
    }
    if !app.add_message(message, MessageKind::User, true) {
        return None;
    }
    app.ui.clear_input();
    app.ui.pending_replies += 1;
    debug!(chars = message.chars().count(), "sending chat message");
    Some(AppCommand::SendChat {
        message: message.to_string(),
    })
}
