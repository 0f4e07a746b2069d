use crate::commands::all_commands;

pub const KEY_BINDINGS: &[(&str, &str)] = &[
    ("Enter", "Send the message"),
    ("Alt+Enter", "New line"),
    ("Tab", "Complete a /command"),
    ("Ctrl+T", "Toggle dark/light theme"),
    ("Ctrl+N", "New chat"),
    ("Ctrl+L", "Show saved history"),
    ("Ctrl+Y", "Copy the latest reply"),
    ("Ctrl+E", "Edit the latest reply"),
    ("Ctrl+V", "Voice input"),
    ("Ctrl+O", "Open the camera"),
    ("Ctrl+P", "Take a picture"),
    ("PgUp/PgDn", "Scroll the chat"),
    ("Ctrl+C", "Quit"),
];

/// Plain lines for the help overlay: commands first, then keys.
pub fn help_lines() -> Vec<String> {
    let mut lines = vec!["Commands".to_string()];
    let usage_width = all_commands()
        .iter()
        .map(|command| command.usage.len())
        .max()
        .unwrap_or(0);
    for command in all_commands() {
        lines.push(format!(
            "  {:<width$}  {}",
            command.usage,
            command.help,
            width = usage_width
        ));
    }

    lines.push(String::new());
    lines.push("Keys".to_string());
    let key_width = KEY_BINDINGS.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
    for (key, description) in KEY_BINDINGS {
        lines.push(format!("  {key:<key_width$}  {description}"));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn help_lists_every_command_and_key() {
        let lines = help_lines();
        for command in all_commands() {
            assert!(lines.iter().any(|line| line.contains(command.usage)));
        }
        assert!(lines.iter().any(|line| line.contains("Ctrl+T")));
    }
}
