use crate::core::app::App;
use crate::core::message::Message;
use crate::ui::help::help_lines;
use crate::ui::theme::Theme;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthChar;

pub const USER_LABEL: &str = "You";
pub const BOT_LABEL: &str = "Bot";

const MAX_INPUT_LINES: u16 = 6;
const PREVIEW_HEIGHT: u16 = 4;

/// Transcript lines for `messages`, in order: a header line, the text lines
/// and a blank separator per message. Actionable replies are numbered in
/// the header; the numbers are what `/copy n` and `/edit n` take.
pub fn build_display_lines(messages: &[Message], theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let mut ordinal = 0;

    for message in messages {
        let (label, prefix_style, text_style) = if message.is_user() {
            (USER_LABEL, theme.user_prefix_style, theme.user_text_style)
        } else {
            (BOT_LABEL, theme.bot_prefix_style, theme.bot_text_style)
        };
        let text_style = if message.allow_actions {
            text_style
        } else {
            theme.note_text_style
        };

        let mut header = vec![Span::styled(label, prefix_style)];
        if message.has_actions() {
            ordinal += 1;
            header.push(Span::styled(format!(" #{ordinal}"), prefix_style));
            header.push(Span::styled(
                format!("   /copy {ordinal} · /edit {ordinal}"),
                theme.action_hint_style,
            ));
        }
        lines.push(Line::from(header));

        for text_line in message.text.split('\n') {
            lines.push(Line::from(Span::styled(
                text_line.replace('\t', "    "),
                text_style,
            )));
        }
        lines.push(Line::default());
    }
    lines
}

/// Break lines into rows of at most `width` terminal cells.
pub fn wrap_lines(lines: &[Line<'static>], width: u16) -> Vec<Line<'static>> {
    let width = usize::from(width.max(1));
    let mut rows = Vec::with_capacity(lines.len());

    for line in lines {
        let mut row: Vec<Span<'static>> = Vec::new();
        let mut used = 0;
        for span in &line.spans {
            let mut chunk = String::new();
            for ch in span.content.chars() {
                let ch_width = ch.width().unwrap_or(0);
                if used + ch_width > width && used > 0 {
                    if !chunk.is_empty() {
                        row.push(Span::styled(std::mem::take(&mut chunk), span.style));
                    }
                    rows.push(Line::from(std::mem::take(&mut row)));
                    used = 0;
                }
                chunk.push(ch);
                used += ch_width;
            }
            if !chunk.is_empty() {
                row.push(Span::styled(chunk, span.style));
            }
        }
        rows.push(Line::from(row));
    }
    rows
}

pub struct ChatLayout {
    pub title: Rect,
    pub transcript: Rect,
    pub preview: Option<Rect>,
    pub status: Rect,
    pub input: Rect,
}

pub fn chat_layout(area: Rect, app: &App) -> ChatLayout {
    let input_lines = u16::try_from(app.ui.input_line_count()).unwrap_or(MAX_INPUT_LINES);
    let input_height = input_lines.clamp(1, MAX_INPUT_LINES) + 2;
    let preview_height = if app.camera.is_previewing() {
        PREVIEW_HEIGHT
    } else {
        0
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(preview_height),
            Constraint::Length(1),
            Constraint::Length(input_height),
        ])
        .split(area);

    ChatLayout {
        title: chunks[0],
        transcript: chunks[1],
        preview: app.camera.is_previewing().then_some(chunks[2]),
        status: chunks[3],
        input: chunks[4],
    }
}

fn transcript_rows(app: &App, theme: &Theme, width: u16) -> Vec<Line<'static>> {
    wrap_lines(&build_display_lines(app.messages(), theme), width)
}

/// How far the transcript can scroll up from the bottom in `area`.
pub fn max_scroll_offset(app: &App, area: Rect) -> u16 {
    let layout = chat_layout(area, app);
    let theme = Theme::for_preference(app.theme.current());
    let rows = transcript_rows(app, &theme, layout.transcript.width).len();
    let max = rows.saturating_sub(usize::from(layout.transcript.height));
    u16::try_from(max).unwrap_or(u16::MAX)
}

pub fn ui(f: &mut Frame, app: &App) {
    let theme = Theme::for_preference(app.theme.current());
    let area = f.area();
    f.render_widget(
        Block::default().style(Style::default().bg(theme.background_color)),
        area,
    );

    let layout = chat_layout(area, app);

    let account = match &app.ui.account {
        Some(username) => format!(" • signed in as {username}"),
        None => String::new(),
    };
    let title = format!(
        "parley v{}{account} • {} theme • /help for commands",
        env!("CARGO_PKG_VERSION"),
        app.theme.current()
    );
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(title, theme.title_style))),
        layout.title,
    );

    render_transcript(f, app, &theme, layout.transcript);
    if let Some(preview) = layout.preview {
        render_preview(f, app, &theme, preview);
    }
    render_status(f, app, &theme, layout.status);
    render_input(f, app, &theme, layout.input);

    if let Some(alert) = &app.ui.alert {
        let lines = alert.lines().map(str::to_string).collect();
        render_overlay(f, &theme, " Notice ", lines, area);
    } else if app.ui.help_visible {
        render_overlay(f, &theme, " Help ", help_lines(), area);
    }
}

fn render_transcript(f: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let rows = transcript_rows(app, theme, area.width);
    let max = rows.len().saturating_sub(usize::from(area.height));
    let from_bottom = if app.ui.auto_scroll {
        0
    } else {
        usize::from(app.ui.scroll_offset).min(max)
    };
    let top = u16::try_from(max - from_bottom).unwrap_or(u16::MAX);

    f.render_widget(Paragraph::new(rows).scroll((top, 0)), area);
}

fn render_preview(f: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let title = match app.camera.dimensions() {
        Some((width, height)) => format!(" Camera {width}x{height} "),
        None => " Camera ".to_string(),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.preview_border_style)
        .title(title);
    let text = vec![
        Line::from(Span::styled("● Live", theme.preview_border_style)),
        Line::from(Span::styled(
            "Ctrl+P or /capture takes the picture",
            theme.preview_text_style,
        )),
    ];
    f.render_widget(Paragraph::new(text).block(block), area);
}

fn render_status(f: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let mut spans = Vec::new();
    if app.ui.pending_replies > 0 {
        spans.push(Span::styled(
            "● waiting for reply  ",
            theme.pending_indicator_style,
        ));
    }
    if app.ui.uploading {
        spans.push(Span::styled("● uploading  ", theme.pending_indicator_style));
    }
    if let Some(status) = &app.ui.status {
        spans.push(Span::styled(status.clone(), theme.status_style));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_input(f: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.input_border_style)
        .title(Span::styled(
            "Message (Enter to send, Alt+Enter for new line, Ctrl+C to quit)",
            theme.input_title_style,
        ));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let mut textarea = app.ui.textarea().clone();
    textarea.set_style(theme.input_text_style);
    f.render_widget(&textarea, inner);
}

fn render_overlay(f: &mut Frame, theme: &Theme, title: &str, mut lines: Vec<String>, area: Rect) {
    lines.push(String::new());
    lines.push("Press any key to close".to_string());

    let width = (area.width / 4 * 3).max(20).min(area.width);
    let wanted = u16::try_from(lines.len()).unwrap_or(u16::MAX).saturating_add(2);
    let height = wanted.min(area.height);
    let popup = Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    };

    let text: Vec<Line> = lines
        .into_iter()
        .map(|line| Line::from(Span::styled(line, theme.overlay_text_style)))
        .collect();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.overlay_border_style)
        .title(title.to_string())
        .style(Style::default().bg(theme.background_color));

    f.render_widget(Clear, popup);
    f.render_widget(
        Paragraph::new(text).block(block).wrap(Wrap { trim: false }),
        popup,
    );
}
