//! Command-line interface parsing and handling
//!
//! This module parses command-line arguments and either starts the
//! interactive chat or runs one of the one-shot maintenance subcommands.

use std::error::Error;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::warn;

use crate::core::app::ExitReason;
use crate::core::config::{Config, ConfigKey};
use crate::core::history::{
    default_export_filename, export_transcript, write_transcript, ChatLog, LoadOutcome,
};
use crate::core::storage::{default_data_dir, FileStore, KeyValueStore, StorageError};
use crate::core::theme::{ThemePreference, ThemeToggle};
use crate::ui::chat_loop::{bootstrap_session, run_chat};
use crate::utils::logging::{init_file_logging, init_stderr_logging};

#[derive(Parser, Debug)]
#[command(name = "parley")]
#[command(version)]
#[command(about = "A terminal chat client for a simple chat server")]
#[command(
    long_about = "Parley is a full-screen terminal chat client. Messages are posted to the \
server's /chat endpoint and the conversation is kept on disk between sessions.\n\n\
Environment Variables:\n\
  PARLEY_SERVER_URL   Chat server base URL (overridden by --server)\n\
  PARLEY_LOG          Log filter directive, e.g. parley=debug\n\n\
Controls:\n\
  Enter             Send the message\n\
  Alt+Enter         Insert a newline\n\
  PgUp/PgDn         Scroll through the conversation\n\
  Ctrl+T            Toggle dark/light theme\n\
  Ctrl+Y / Ctrl+E   Copy / edit the latest reply\n\
  Ctrl+V            Voice input\n\
  Ctrl+O / Ctrl+P   Open camera / capture and upload\n\
  Ctrl+C            Quit\n\n\
Type /help in the chat for the full list of commands."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Chat server base URL
    #[arg(short = 's', long, global = true, value_name = "URL")]
    pub server: Option<String>,

    /// Append diagnostics for the chat session to this file
    #[arg(long, global = true, value_name = "FILE")]
    pub debug_log: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the chat interface (default)
    Chat,
    /// Print, export, or clear the saved conversation
    History {
        /// Delete every saved message
        #[arg(long, conflicts_with = "export")]
        clear: bool,
        /// Write a plain-text transcript to FILE (defaults to parley-log-YYYY-MM-DD.txt)
        #[arg(long, value_name = "FILE", num_args = 0..=1, default_missing_value = "")]
        export: Option<String>,
    },
    /// Show or change the stored theme preference
    Theme {
        #[arg(value_enum)]
        action: Option<ThemeAction>,
    },
    /// Set configuration values, or print them when no value is given
    Set {
        /// Configuration key to set
        key: Option<String>,
        /// Value to set for the key
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        value: Option<Vec<String>>,
    },
    /// Unset configuration values
    Unset {
        /// Configuration key to unset
        key: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ThemeAction {
    Toggle,
    Dark,
    Light,
}

pub fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    tokio::runtime::Runtime::new()?.block_on(async_main(args))
}

async fn async_main(args: Args) -> Result<(), Box<dyn Error>> {
    let Args {
        command,
        server,
        debug_log,
    } = args;

    match command.unwrap_or(Commands::Chat) {
        Commands::Chat => chat(server.as_deref(), debug_log.as_deref()).await,
        Commands::History { clear, export } => {
            init_stderr_logging();
            let config = Config::load()?;
            let store: Arc<dyn KeyValueStore> = Arc::new(open_store(&config)?);
            let export = export.map(|name| export_path(&name));
            history(store, clear, export.as_deref(), &mut io::stdout().lock())
        }
        Commands::Theme { action } => {
            init_stderr_logging();
            let config = Config::load()?;
            let store: Arc<dyn KeyValueStore> = Arc::new(open_store(&config)?);
            let preference = theme(store, action)?;
            match action {
                None => println!("Theme: {preference}"),
                Some(_) => println!("✅ Theme set to: {preference}"),
            }
            Ok(())
        }
        Commands::Set { key, value } => {
            init_stderr_logging();
            let mut config = Config::load()?;
            let value = value.map(|parts| parts.join(" ")).unwrap_or_default();
            match key {
                Some(key) if !value.trim().is_empty() => {
                    let key = parse_key(&key)?;
                    config.set_key(key, &value)?;
                    config.save()?;
                    println!("✅ Set {} to: {}", key.as_str(), value.trim());
                }
                _ => config.print_all(),
            }
            Ok(())
        }
        Commands::Unset { key } => {
            init_stderr_logging();
            let mut config = Config::load()?;
            let key = parse_key(&key)?;
            config.unset_key(key);
            config.save()?;
            println!("✅ Unset {}", key.as_str());
            Ok(())
        }
    }
}

async fn chat(server: Option<&str>, debug_log: Option<&Path>) -> Result<(), Box<dyn Error>> {
    if let Some(path) = debug_log {
        init_file_logging(path)?;
    }
    let config = Config::load()?;
    let store: Arc<dyn KeyValueStore> = Arc::new(open_store(&config)?);
    let session = bootstrap_session(&config, store, server)?;

    match run_chat(session).await? {
        ExitReason::Quit => {}
        ExitReason::LoggedOut => println!("Logged out."),
    }
    Ok(())
}

/// The store lives in `data-dir` when configured, otherwise in the
/// platform data directory.
pub fn open_store(config: &Config) -> Result<FileStore, StorageError> {
    let dir = match &config.data_dir {
        Some(dir) => dir.clone(),
        None => default_data_dir()?,
    };
    Ok(FileStore::new(dir))
}

fn export_path(name: &str) -> PathBuf {
    if name.trim().is_empty() {
        PathBuf::from(default_export_filename(chrono::Local::now().date_naive()))
    } else {
        PathBuf::from(name)
    }
}

fn parse_key(name: &str) -> Result<ConfigKey, String> {
    ConfigKey::parse(name).ok_or_else(|| {
        let known: Vec<&str> = ConfigKey::all().iter().map(|key| key.as_str()).collect();
        format!("Unknown config key: {name} (expected one of: {})", known.join(", "))
    })
}

fn history<W: Write>(
    store: Arc<dyn KeyValueStore>,
    clear: bool,
    export: Option<&Path>,
    out: &mut W,
) -> Result<(), Box<dyn Error>> {
    let (mut log, outcome) = ChatLog::load(store)?;
    if let LoadOutcome::Corrupt { error, backed_up } = &outcome {
        warn!(%error, backed_up, "saved history is unreadable");
        writeln!(out, "⚠️  Saved history could not be read and was ignored.")?;
    }

    if clear {
        let count = log.len();
        log.clear()?;
        writeln!(out, "✅ Cleared {count} saved message(s)")?;
        return Ok(());
    }

    if let Some(path) = export {
        if log.is_empty() {
            writeln!(out, "Nothing to export yet")?;
            return Ok(());
        }
        return match export_transcript(log.messages(), path) {
            Ok(()) => {
                writeln!(out, "✅ Chat exported to {}", path.display())?;
                Ok(())
            }
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
                Err(format!("{} already exists", path.display()).into())
            }
            Err(err) => Err(err.into()),
        };
    }

    if log.is_empty() {
        writeln!(out, "No past chats available.")?;
        return Ok(());
    }
    write_transcript(log.messages(), out)?;
    Ok(())
}

fn theme(
    store: Arc<dyn KeyValueStore>,
    action: Option<ThemeAction>,
) -> Result<ThemePreference, StorageError> {
    let mut toggle = ThemeToggle::load(store);
    match action {
        None => Ok(toggle.current()),
        Some(ThemeAction::Toggle) => toggle.toggle(),
        Some(ThemeAction::Dark) => toggle.set(ThemePreference::Dark).map(|_| ThemePreference::Dark),
        Some(ThemeAction::Light) => toggle
            .set(ThemePreference::Light)
            .map(|_| ThemePreference::Light),
    }
}
