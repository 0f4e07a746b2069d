use std::fmt;
use std::io::Write;
use std::process::{Command, Stdio};

use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipboardError {
    /// None of the platform clipboard programs could be started.
    NoBackend,
    /// A clipboard program started but did not accept the text.
    Failed(String),
}

impl fmt::Display for ClipboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClipboardError::NoBackend => {
                write!(f, "No clipboard command found (install wl-copy, xclip, or xsel)")
            }
            ClipboardError::Failed(detail) => write!(f, "Clipboard write failed: {detail}"),
        }
    }
}

impl std::error::Error for ClipboardError {}

#[cfg(target_os = "macos")]
const CANDIDATES: &[(&str, &[&str])] = &[("pbcopy", &[])];

#[cfg(target_os = "windows")]
const CANDIDATES: &[(&str, &[&str])] = &[("cmd", &["/C", "clip"])];

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const CANDIDATES: &[(&str, &[&str])] = &[
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
];

/// Write `text` to the system clipboard using the first program that works.
pub fn copy_to_clipboard(text: &str) -> Result<(), ClipboardError> {
    let mut last_failure = None;
    for (cmd, args) in CANDIDATES {
        match run_with_stdin(cmd, args, text) {
            Ok(()) => {
                debug!(program = *cmd, chars = text.chars().count(), "copied to clipboard");
                return Ok(());
            }
            Err(Some(detail)) => last_failure = Some(detail),
            Err(None) => {}
        }
    }
    Err(last_failure
        .map(ClipboardError::Failed)
        .unwrap_or(ClipboardError::NoBackend))
}

/// `Err(None)` means the program is not installed.
fn run_with_stdin(cmd: &str, args: &[&str], input: &str) -> Result<(), Option<String>> {
    let mut child = Command::new(cmd)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|_| None)?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(input.as_bytes())
            .map_err(|err| Some(format!("`{cmd}`: {err}")))?;
    }
    match child.wait() {
        Ok(status) if status.success() => Ok(()),
        Ok(status) => Err(Some(format!("`{cmd}` exited with {status}"))),
        Err(err) => Err(Some(format!("`{cmd}`: {err}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_program_reports_not_installed() {
        assert_eq!(
            run_with_stdin("parley-no-such-clipboard", &[], "text"),
            Err(None)
        );
    }

    #[cfg(unix)]
    #[test]
    fn failing_program_reports_detail() {
        let result = run_with_stdin("false", &[], "text");
        assert!(matches!(result, Err(Some(detail)) if detail.contains("false")));
    }

    #[cfg(unix)]
    #[test]
    fn accepting_program_succeeds() {
        assert_eq!(run_with_stdin("cat", &[], "copied"), Ok(()));
    }
}
