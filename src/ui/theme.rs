use crate::core::theme::ThemePreference;
use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone)]
pub struct Theme {
    // Overall background color to paint the full frame
    pub background_color: Color,
    // Transcript
    pub user_prefix_style: Style,
    pub user_text_style: Style,
    pub bot_prefix_style: Style,
    pub bot_text_style: Style,
    /// Messages that offer no actions (listening notes, upload receipts).
    pub note_text_style: Style,
    pub action_hint_style: Style,

    // Chrome
    pub title_style: Style,
    pub status_style: Style,
    pub pending_indicator_style: Style,
    pub input_border_style: Style,
    pub input_title_style: Style,
    pub input_text_style: Style,
    pub preview_border_style: Style,
    pub preview_text_style: Style,
    pub overlay_border_style: Style,
    pub overlay_text_style: Style,
}

impl Theme {
    pub fn for_preference(preference: ThemePreference) -> Self {
        match preference {
            ThemePreference::Dark => Self::dark(),
            ThemePreference::Light => Self::light(),
        }
    }

    pub fn dark() -> Self {
        Theme {
            background_color: Color::Rgb(0x1e, 0x1e, 0x1e),
            user_prefix_style: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            user_text_style: Style::default().fg(Color::Cyan),
            bot_prefix_style: Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
            bot_text_style: Style::default().fg(Color::White),
            note_text_style: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
            action_hint_style: Style::default().fg(Color::DarkGray),

            title_style: Style::default().fg(Color::Gray),
            status_style: Style::default().fg(Color::Yellow),
            pending_indicator_style: Style::default().fg(Color::White),
            input_border_style: Style::default().fg(Color::Gray),
            input_title_style: Style::default().fg(Color::Gray),
            input_text_style: Style::default().fg(Color::White),
            preview_border_style: Style::default().fg(Color::Magenta),
            preview_text_style: Style::default().fg(Color::Gray),
            overlay_border_style: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            overlay_text_style: Style::default().fg(Color::White),
        }
    }

    pub fn light() -> Self {
        Theme {
            background_color: Color::Rgb(0xfa, 0xfa, 0xfa),
            user_prefix_style: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            user_text_style: Style::default().fg(Color::Blue),
            bot_prefix_style: Style::default()
                .fg(Color::Rgb(0x00, 0x80, 0x00))
                .add_modifier(Modifier::BOLD),
            bot_text_style: Style::default().fg(Color::Black),
            note_text_style: Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::ITALIC),
            action_hint_style: Style::default().fg(Color::Gray),

            title_style: Style::default().fg(Color::DarkGray),
            status_style: Style::default().fg(Color::Rgb(0x99, 0x60, 0x00)),
            pending_indicator_style: Style::default().fg(Color::Black),
            input_border_style: Style::default().fg(Color::Black),
            input_title_style: Style::default().fg(Color::DarkGray),
            input_text_style: Style::default().fg(Color::Black),
            preview_border_style: Style::default().fg(Color::Magenta),
            preview_text_style: Style::default().fg(Color::DarkGray),
            overlay_border_style: Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
            overlay_text_style: Style::default().fg(Color::Black),
        }
    }
}
