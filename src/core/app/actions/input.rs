use tracing::warn;

use super::{App, AppAction, AppCommand};

pub(super) fn handle_input_action(app: &mut App, action: AppAction) -> Option<AppCommand> {
    match action {
        AppAction::ToggleTheme => {
            match app.theme.toggle() {
                Ok(theme) => app.ui.set_status(format!("Theme: {theme}")),
                Err(err) => {
                    warn!(%err, "theme preference not saved");
                    app.ui
                        .set_status(format!("Theme: {} (not saved: {err})", app.theme.current()));
                }
            }
            None
        }
        AppAction::CopyReply { ordinal } => match app.actionable_reply(ordinal) {
            Ok((ordinal, message)) => Some(AppCommand::CopyToClipboard {
                ordinal,
                text: message.text.clone(),
            }),
            Err(reason) => {
                app.ui.set_status(reason);
                None
            }
        },
        AppAction::CopyFinished { ordinal, result } => {
            match result {
                Ok(()) => app.ui.set_status(format!("Copied reply #{ordinal}")),
                Err(err) => {
                    warn!(%err, "clipboard write failed");
                    app.ui.set_status(format!("Copy failed: {err}"));
                }
            }
            None
        }
        AppAction::EditReply { ordinal } => {
            match app.actionable_reply(ordinal) {
                Ok((ordinal, message)) => {
                    let text = message.text.clone();
                    app.ui.set_input_text(&text);
                    app.ui.set_status(format!("Editing reply #{ordinal}"));
                }
                Err(reason) => app.ui.set_status(reason),
            }
            None
        }
        AppAction::ShowHelp => {
            app.ui.help_visible = true;
            None
        }
        AppAction::DismissOverlay => {
            app.ui.dismiss_overlay();
            None
        }
        _ => unreachable!("non-input action routed to input handler"),
    }
}
