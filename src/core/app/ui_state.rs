use std::time::{Duration, Instant};

use ratatui::style::Style;
use tui_textarea::{CursorMove, TextArea};

/// Status notes fade after this long.
pub const STATUS_TTL: Duration = Duration::from_secs(6);

/// Why the chat loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    Quit,
    LoggedOut,
}

pub struct UiState {
    textarea: TextArea<'static>,
    /// Modal message; any key dismisses it.
    pub alert: Option<String>,
    pub help_visible: bool,
    pub status: Option<String>,
    pub status_set_at: Option<Instant>,
    /// Lines scrolled up from the bottom of the transcript.
    pub scroll_offset: u16,
    pub auto_scroll: bool,
    /// Chat requests sent and not yet answered.
    pub pending_replies: usize,
    pub uploading: bool,
    /// Username the server accepted this session, if any.
    pub account: Option<String>,
    pub exit_requested: Option<ExitReason>,
}

impl Default for UiState {
    fn default() -> Self {
        Self::new()
    }
}

impl UiState {
    pub fn new() -> Self {
        let mut ui = Self {
            textarea: TextArea::default(),
            alert: None,
            help_visible: false,
            status: None,
            status_set_at: None,
            scroll_offset: 0,
            auto_scroll: true,
            pending_replies: 0,
            uploading: false,
            account: None,
            exit_requested: None,
        };
        ui.configure_textarea();
        ui
    }

    fn configure_textarea(&mut self) {
        self.textarea.set_cursor_line_style(Style::default());
        self.textarea.set_placeholder_text("Type a message, or /help");
    }

    pub fn textarea(&self) -> &TextArea<'static> {
        &self.textarea
    }

    pub fn textarea_mut(&mut self) -> &mut TextArea<'static> {
        &mut self.textarea
    }

    pub fn input_text(&self) -> String {
        self.textarea.lines().join("\n")
    }

    pub fn input_line_count(&self) -> usize {
        self.textarea.lines().len().max(1)
    }

    /// Replace the whole input with `text` and put the cursor at its end.
    pub fn set_input_text(&mut self, text: &str) {
        let lines: Vec<String> = text.split('\n').map(str::to_string).collect();
        self.textarea = TextArea::from(lines);
        self.textarea.move_cursor(CursorMove::Bottom);
        self.textarea.move_cursor(CursorMove::End);
        self.configure_textarea();
    }

    pub fn clear_input(&mut self) {
        self.textarea = TextArea::default();
        self.configure_textarea();
    }

    pub fn insert_text(&mut self, text: &str) {
        self.textarea.insert_str(text);
    }

    pub fn set_status<S: Into<String>>(&mut self, s: S) {
        self.status = Some(s.into());
        self.status_set_at = Some(Instant::now());
    }

    pub fn clear_status(&mut self) {
        self.status = None;
        self.status_set_at = None;
    }

    /// Drop the status note once it has been visible long enough.
    pub fn expire_status(&mut self, now: Instant) -> bool {
        match self.status_set_at {
            Some(set_at) if now.duration_since(set_at) >= STATUS_TTL => {
                self.clear_status();
                true
            }
            _ => false,
        }
    }

    pub fn raise_alert<S: Into<String>>(&mut self, message: S) {
        self.alert = Some(message.into());
    }

    pub fn dismiss_alert(&mut self) -> bool {
        self.alert.take().is_some()
    }

    /// True while an alert or the help overlay covers the chat.
    pub fn has_overlay(&self) -> bool {
        self.alert.is_some() || self.help_visible
    }

    /// Close the topmost overlay. Alerts sit above help.
    pub fn dismiss_overlay(&mut self) -> bool {
        if self.dismiss_alert() {
            return true;
        }
        std::mem::take(&mut self.help_visible)
    }

    /// Pin the transcript to its newest line.
    pub fn follow_latest(&mut self) {
        self.auto_scroll = true;
        self.scroll_offset = 0;
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.auto_scroll = false;
        self.scroll_offset = self.scroll_offset.saturating_add(lines);
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.scroll_offset = self.scroll_offset.saturating_sub(lines);
        if self.scroll_offset == 0 {
            self.auto_scroll = true;
        }
    }

    pub fn request_exit(&mut self, reason: ExitReason) {
        self.exit_requested = Some(reason);
    }
}
