//! Maps key presses to reducer actions or input edits.

use crate::commands::matching_commands;
use crate::core::app::{App, AppAction};
use crate::ui::renderer::{chat_layout, max_scroll_offset};
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::Rect;
use tui_textarea::Input as TAInput;

/// Translate `key` into an action, or apply it to the input box or scroll
/// position directly. `area` is the full terminal area.
pub fn handle_key(app: &mut App, key: KeyEvent, area: Rect) -> Option<AppAction> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    if ctrl && key.code == KeyCode::Char('c') {
        return Some(AppAction::Quit);
    }
    if app.ui.has_overlay() {
        return Some(AppAction::DismissOverlay);
    }

    if ctrl {
        if let KeyCode::Char(ch) = key.code {
            if let Some(action) = control_action(ch) {
                return Some(action);
            }
        }
    }

    match key.code {
        KeyCode::Enter
            if key
                .modifiers
                .intersects(KeyModifiers::ALT | KeyModifiers::SHIFT) =>
        {
            app.ui.textarea_mut().insert_newline();
            None
        }
        KeyCode::Enter => Some(AppAction::SubmitInput),
        KeyCode::Tab if complete_command(app) => None,
        KeyCode::PageUp => {
            let page = page_height(app, area);
            let max = max_scroll_offset(app, area);
            app.ui.scroll_up(page);
            app.ui.scroll_offset = app.ui.scroll_offset.min(max);
            None
        }
        KeyCode::PageDown => {
            let page = page_height(app, area);
            app.ui.scroll_down(page);
            None
        }
        _ => {
            app.ui.textarea_mut().input(TAInput::from(key));
            None
        }
    }
}

fn control_action(ch: char) -> Option<AppAction> {
    let action = match ch.to_ascii_lowercase() {
        't' => AppAction::ToggleTheme,
        'n' => AppAction::NewChat,
        'l' => AppAction::ShowHistory,
        'y' => AppAction::CopyReply { ordinal: None },
        'e' => AppAction::EditReply { ordinal: None },
        'v' => AppAction::StartVoice,
        'o' => AppAction::OpenCamera,
        'p' => AppAction::CaptureImage,
        _ => return None,
    };
    Some(action)
}

/// Complete a partly typed `/command`. Returns false when the input is not
/// a bare command prefix, so Tab falls through to the input box.
fn complete_command(app: &mut App) -> bool {
    let input = app.ui.input_text();
    let Some(prefix) = input.strip_prefix('/') else {
        return false;
    };
    if prefix.chars().any(char::is_whitespace) {
        return false;
    }

    match matching_commands(prefix).as_slice() {
        [] => app.ui.set_status(format!("No command starts with /{prefix}")),
        [command] => app.ui.set_input_text(&format!("/{} ", command.name)),
        several => {
            let names: Vec<String> = several.iter().map(|c| format!("/{}", c.name)).collect();
            app.ui.set_status(names.join("  "));
        }
    }
    true
}

fn page_height(app: &App, area: Rect) -> u16 {
    chat_layout(area, app).transcript.height.saturating_sub(1).max(1)
}

/// Bracketed paste goes straight into the input box.
pub fn handle_paste(app: &mut App, text: &str) {
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
    app.ui.insert_text(&normalized);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::MessageKind;
    use crate::utils::test_utils::create_test_app;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    fn area() -> Rect {
        Rect::new(0, 0, 60, 20)
    }

    #[test]
    fn control_keys_map_to_actions() {
        let mut app = create_test_app();
        let action = handle_key(&mut app, press(KeyCode::Char('t'), KeyModifiers::CONTROL), area());
        assert!(matches!(action, Some(AppAction::ToggleTheme)));

        let action = handle_key(&mut app, press(KeyCode::Char('y'), KeyModifiers::CONTROL), area());
        assert!(matches!(action, Some(AppAction::CopyReply { ordinal: None })));

        let action = handle_key(&mut app, press(KeyCode::Char('c'), KeyModifiers::CONTROL), area());
        assert!(matches!(action, Some(AppAction::Quit)));
    }

    #[test]
    fn typing_edits_the_input_and_enter_submits() {
        let mut app = create_test_app();
        for ch in "hi".chars() {
            let key = press(KeyCode::Char(ch), KeyModifiers::NONE);
            assert!(handle_key(&mut app, key, area()).is_none());
        }
        assert!(handle_key(&mut app, press(KeyCode::Enter, KeyModifiers::ALT), area()).is_none());
        handle_key(&mut app, press(KeyCode::Char('!'), KeyModifiers::NONE), area());

        assert_eq!(app.ui.input_text(), "hi\n!");
        let action = handle_key(&mut app, press(KeyCode::Enter, KeyModifiers::NONE), area());
        assert!(matches!(action, Some(AppAction::SubmitInput)));
    }

    #[test]
    fn any_key_closes_an_overlay() {
        let mut app = create_test_app();
        app.ui.raise_alert("No past chats available.");
        let action = handle_key(&mut app, press(KeyCode::Char('x'), KeyModifiers::NONE), area());
        assert!(matches!(action, Some(AppAction::DismissOverlay)));
        assert_eq!(app.ui.input_text(), "");
    }

    #[test]
    fn paging_stays_within_the_transcript() {
        let mut app = create_test_app();
        for n in 0..10 {
            app.add_message(format!("line {n}"), MessageKind::User, true);
        }
        let max = max_scroll_offset(&app, area());

        handle_key(&mut app, press(KeyCode::PageUp, KeyModifiers::NONE), area());
        handle_key(&mut app, press(KeyCode::PageUp, KeyModifiers::NONE), area());
        assert_eq!(app.ui.scroll_offset, max);

        handle_key(&mut app, press(KeyCode::PageDown, KeyModifiers::NONE), area());
        handle_key(&mut app, press(KeyCode::PageDown, KeyModifiers::NONE), area());
        assert_eq!(app.ui.scroll_offset, 0);
        assert!(app.ui.auto_scroll);
    }

    #[test]
    fn tab_completes_slash_commands() {
        let mut app = create_test_app();
        app.ui.set_input_text("/hi");
        assert!(handle_key(&mut app, press(KeyCode::Tab, KeyModifiers::NONE), area()).is_none());
        assert_eq!(app.ui.input_text(), "/history ");

        app.ui.set_input_text("/c");
        handle_key(&mut app, press(KeyCode::Tab, KeyModifiers::NONE), area());
        assert_eq!(app.ui.input_text(), "/c");
        assert_eq!(app.ui.status.as_deref(), Some("/copy  /camera  /capture"));
    }

    #[test]
    fn paste_normalizes_line_endings() {
        let mut app = create_test_app();
        handle_paste(&mut app, "one\r\ntwo\rthree");
        assert_eq!(app.ui.input_text(), "one\ntwo\nthree");
    }
}
