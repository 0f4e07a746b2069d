mod registry;

pub use registry::{all_commands, matching_commands, CommandInvocation};

use std::io;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::core::app::{App, AppAction};
use crate::core::history::{default_export_filename, export_transcript};
use crate::core::theme::ThemePreference;

pub enum CommandResult {
    Continue,
    ProcessAsMessage(String),
    Dispatch(AppAction),
}

pub fn process_input(app: &mut App, input: &str) -> CommandResult {
    let trimmed = input.trim();

    if !trimmed.starts_with('/') {
        return CommandResult::ProcessAsMessage(input.to_string());
    }

    let mut parts = trimmed[1..].splitn(2, char::is_whitespace);
    let command_name = match parts.next() {
        Some(name) if !name.is_empty() => name,
        _ => return CommandResult::ProcessAsMessage(input.to_string()),
    };
    let args = parts.next().unwrap_or("").trim();

    match registry::find_command(command_name) {
        Some(command) => {
            let invocation = CommandInvocation {
                input: trimmed,
                args,
            };
            (command.handler)(app, invocation)
        }
        None => CommandResult::ProcessAsMessage(input.to_string()),
    }
}

/// Parse an optional 1-based reply number.
fn parse_ordinal(args: &str) -> Result<Option<usize>, String> {
    if args.is_empty() {
        return Ok(None);
    }
    args.parse::<usize>()
        .map(Some)
        .map_err(|_| format!("Not a reply number: {args}"))
}

fn reply_command(
    app: &mut App,
    invocation: CommandInvocation<'_>,
    action: fn(Option<usize>) -> AppAction,
) -> CommandResult {
    match parse_ordinal(invocation.args) {
        Ok(ordinal) => CommandResult::Dispatch(action(ordinal)),
        Err(reason) => {
            app.ui.set_status(reason);
            CommandResult::Continue
        }
    }
}

pub(super) fn handle_help(_app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    CommandResult::Dispatch(AppAction::ShowHelp)
}

pub(super) fn handle_new(_app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    CommandResult::Dispatch(AppAction::NewChat)
}

pub(super) fn handle_history(_app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    CommandResult::Dispatch(AppAction::ShowHistory)
}

pub(super) fn handle_theme(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    let preference = match invocation.args.to_ascii_lowercase().as_str() {
        "" | "toggle" => return CommandResult::Dispatch(AppAction::ToggleTheme),
        "dark" => ThemePreference::Dark,
        "light" => ThemePreference::Light,
        other => {
            app.ui
                .set_status(format!("Unknown theme: {other}. Use dark or light"));
            return CommandResult::Continue;
        }
    };
    match app.theme.set(preference) {
        Ok(()) => app.ui.set_status(format!("Theme: {preference}")),
        Err(err) => {
            tracing::warn!(%err, "theme preference not saved");
            app.ui
                .set_status(format!("Theme: {preference} (not saved: {err})"));
        }
    }
    CommandResult::Continue
}

pub(super) fn handle_copy(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    reply_command(app, invocation, |ordinal| AppAction::CopyReply { ordinal })
}

pub(super) fn handle_edit(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    reply_command(app, invocation, |ordinal| AppAction::EditReply { ordinal })
}

pub(super) fn handle_voice(_app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    CommandResult::Dispatch(AppAction::StartVoice)
}

pub(super) fn handle_camera(_app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    CommandResult::Dispatch(AppAction::OpenCamera)
}

pub(super) fn handle_capture(_app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    CommandResult::Dispatch(AppAction::CaptureImage)
}

pub(super) fn handle_dump(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    if app.history.is_empty() {
        app.ui.set_status("Nothing to export yet");
        return CommandResult::Continue;
    }

    let filename = if invocation.args.is_empty() {
        default_export_filename(Local::now().date_naive())
    } else {
        invocation.args.to_string()
    };

    match export_transcript(app.messages(), Path::new(&filename)) {
        Ok(()) => app.ui.set_status(format!("Chat exported to {filename}")),
        Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
            app.ui
                .set_status(format!("{filename} already exists. Use /dump <file>"));
        }
        Err(err) => {
            tracing::warn!(%err, filename, "transcript export failed");
            app.ui.set_status(format!("Export failed: {err}"));
        }
    }
    CommandResult::Continue
}

pub(super) fn handle_upload(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    if invocation.args.is_empty() {
        app.ui.set_status("Usage: /upload <file>");
        return CommandResult::Continue;
    }
    CommandResult::Dispatch(AppAction::UploadFile {
        path: PathBuf::from(invocation.args),
    })
}

/// Split `<user> <password>`; the password is everything after the name.
fn parse_credentials(args: &str) -> Option<(String, String)> {
    let (username, password) = args.split_once(char::is_whitespace)?;
    let password = password.trim();
    if password.is_empty() {
        return None;
    }
    Some((username.to_string(), password.to_string()))
}

fn credentials_command(
    app: &mut App,
    invocation: CommandInvocation<'_>,
    new_account: bool,
) -> CommandResult {
    match parse_credentials(invocation.args) {
        Some((username, password)) => CommandResult::Dispatch(AppAction::SignIn {
            username,
            password,
            new_account,
        }),
        None => {
            let name = if new_account { "signup" } else { "login" };
            app.ui
                .set_status(format!("Usage: /{name} <user> <password>"));
            CommandResult::Continue
        }
    }
}

pub(super) fn handle_login(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    credentials_command(app, invocation, false)
}

pub(super) fn handle_signup(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    credentials_command(app, invocation, true)
}

pub(super) fn handle_logout(_app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    CommandResult::Dispatch(AppAction::Logout)
}

pub(super) fn handle_quit(_app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    CommandResult::Dispatch(AppAction::Quit)
}
