use super::CommandResult;
use crate::core::app::App;

pub type CommandHandler = fn(&mut App, CommandInvocation<'_>) -> CommandResult;

pub struct Command {
    pub name: &'static str,
    pub usage: &'static str,
    pub help: &'static str,
    pub handler: CommandHandler,
}

#[derive(Clone, Copy)]
pub struct CommandInvocation<'a> {
    pub input: &'a str,
    pub args: &'a str,
}

pub fn all_commands() -> &'static [Command] {
    COMMANDS
}

pub fn find_command(name: &str) -> Option<&'static Command> {
    all_commands()
        .iter()
        .find(|command| command.name.eq_ignore_ascii_case(name))
}

/// Commands whose name starts with `prefix`, for completion hints.
pub fn matching_commands(prefix: &str) -> Vec<&'static Command> {
    let prefix = prefix.to_ascii_lowercase();
    all_commands()
        .iter()
        .filter(|command| command.name.starts_with(&prefix))
        .collect()
}

const COMMANDS: &[Command] = &[
    Command {
        name: "help",
        usage: "/help",
        help: "Show commands and key bindings.",
        handler: super::handle_help,
    },
    Command {
        name: "new",
        usage: "/new",
        help: "Start a new chat and forget the saved history.",
        handler: super::handle_new,
    },
    Command {
        name: "history",
        usage: "/history",
        help: "Reload the saved chat history.",
        handler: super::handle_history,
    },
    Command {
        name: "theme",
        usage: "/theme [dark|light]",
        help: "Toggle the theme or pick one.",
        handler: super::handle_theme,
    },
    Command {
        name: "copy",
        usage: "/copy [n]",
        help: "Copy reply #n (default: latest) to the clipboard.",
        handler: super::handle_copy,
    },
    Command {
        name: "edit",
        usage: "/edit [n]",
        help: "Put reply #n (default: latest) in the input box.",
        handler: super::handle_edit,
    },
    Command {
        name: "voice",
        usage: "/voice",
        help: "Dictate one message.",
        handler: super::handle_voice,
    },
    Command {
        name: "camera",
        usage: "/camera",
        help: "Open the camera preview.",
        handler: super::handle_camera,
    },
    Command {
        name: "capture",
        usage: "/capture",
        help: "Take a picture and upload it.",
        handler: super::handle_capture,
    },
    Command {
        name: "upload",
        usage: "/upload <file>",
        help: "Upload a file for the assistant to read.",
        handler: super::handle_upload,
    },
    Command {
        name: "dump",
        usage: "/dump [file]",
        help: "Export the chat as plain text.",
        handler: super::handle_dump,
    },
    Command {
        name: "login",
        usage: "/login <user> <password>",
        help: "Sign in to the chat server.",
        handler: super::handle_login,
    },
    Command {
        name: "signup",
        usage: "/signup <user> <password>",
        help: "Create an account and sign in.",
        handler: super::handle_signup,
    },
    Command {
        name: "logout",
        usage: "/logout",
        help: "Log out of the chat server and exit.",
        handler: super::handle_logout,
    },
    Command {
        name: "quit",
        usage: "/quit",
        help: "Exit parley.",
        handler: super::handle_quit,
    },
];
