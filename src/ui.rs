use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{
        Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, Wrap,
    },
};
use crate::app::{App, BackendStatus, ChatRole};
use crate::format::{parse_markup, Segment};
use crate::texts::Language;

/// Convert one parsed transcript line into styled spans. Linked runs (tel:
/// and mailto: targets) are underlined so they stand out; most terminal
/// emulators make them clickable on their own.
fn markup_line(segments: Vec<Segment>) -> Line<'static> {
    if segments.is_empty() {
        return Line::default();
    }

    let spans: Vec<Span<'static>> = segments
        .into_iter()
        .map(|seg| match seg.link {
            Some(_) => Span::styled(
                seg.text,
                Style::default()
                    .fg(Color::Blue)
                    .add_modifier(Modifier::UNDERLINED),
            ),
            None => Span::raw(seg.text),
        })
        .collect();

    Line::from(spans)
}

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, transcript, input, footer
    let [header_area, transcript_area, input_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);
    render_transcript(app, frame, transcript_area);
    render_input(app, frame, input_area);
    render_footer(app, frame, footer_area);
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let texts = app.language.texts();

    let (status_text, status_color) = match app.backend_status {
        BackendStatus::Unknown => (String::new(), Color::DarkGray),
        BackendStatus::Healthy => (format!("[{}]", texts.status_healthy), Color::Green),
        BackendStatus::Degraded => (format!("[{}]", texts.status_degraded), Color::Yellow),
        BackendStatus::Unreachable => (format!("[{}]", texts.status_unreachable), Color::Red),
    };

    let title = Line::from(vec![
        Span::styled(
            format!(" {} ", texts.title),
            Style::default().fg(Color::Cyan).bold(),
        ),
        Span::styled(status_text, Style::default().fg(status_color)),
        Span::raw(" "),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn render_transcript(app: &mut App, frame: &mut Frame, area: Rect) {
    let texts = app.language.texts();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(format!(" {} ", texts.assistant_label));

    // Store inner dimensions for scroll calculations (minus borders)
    app.transcript_height = area.height.saturating_sub(2);
    app.transcript_width = area.width.saturating_sub(2);

    let transcript_text = if app.messages.is_empty() && !app.loading {
        Text::from(Span::styled(
            texts.welcome,
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        let mut lines: Vec<Line> = Vec::new();

        for msg in &app.messages {
            let (label, label_color) = match msg.role {
                ChatRole::User => (texts.user_label, Color::Cyan),
                ChatRole::Assistant => (texts.assistant_label, Color::Yellow),
            };
            lines.push(Line::from(Span::styled(
                format!("{}:", label),
                Style::default()
                    .fg(label_color)
                    .add_modifier(Modifier::BOLD),
            )));
            for line in parse_markup(&msg.content) {
                lines.push(markup_line(line));
            }
            lines.push(Line::default());
        }

        if app.loading {
            lines.push(Line::from(Span::styled(
                format!("{}:", texts.assistant_label),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )));
            // Animated ellipsis: cycles through ".", "..", "..."
            let dots = ".".repeat((app.animation_frame as usize) + 1);
            lines.push(Line::from(Span::styled(
                format!("{}{}", texts.sending, dots),
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            )));
        }

        Text::from(lines)
    };

    let transcript = Paragraph::new(transcript_text)
        .block(block)
        .wrap(Wrap { trim: true })
        .scroll((app.transcript_scroll, 0));

    frame.render_widget(transcript, area);

    // Render scrollbar
    let total_lines = app.transcript_line_count();
    if total_lines > app.transcript_height {
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("^"))
            .end_symbol(Some("v"));

        let mut scrollbar_state =
            ScrollbarState::new(total_lines as usize).position(app.transcript_scroll as usize);

        frame.render_stateful_widget(
            scrollbar,
            area.inner(ratatui::layout::Margin {
                vertical: 1,
                horizontal: 0,
            }),
            &mut scrollbar_state,
        );
    }
}

fn render_input(app: &App, frame: &mut Frame, area: Rect) {
    let texts = app.language.texts();

    let input_border_color = if app.loading {
        Color::DarkGray
    } else {
        Color::Yellow
    };

    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(input_border_color));

    // Calculate visible portion of input with horizontal scrolling
    // Inner width = total width - 2 (for borders)
    let inner_width = area.width.saturating_sub(2) as usize;
    let cursor_pos = app.cursor;

    // Calculate scroll offset to keep cursor visible
    let scroll_offset = if inner_width == 0 {
        0
    } else if cursor_pos >= inner_width {
        cursor_pos - inner_width + 1
    } else {
        0
    };

    // Get the visible slice of the input
    let visible_text: String = app
        .input
        .chars()
        .skip(scroll_offset)
        .take(inner_width)
        .collect();

    let input = if app.input.is_empty() {
        Paragraph::new(texts.placeholder)
            .style(Style::default().fg(Color::DarkGray))
            .block(input_block)
    } else {
        Paragraph::new(visible_text)
            .style(Style::default().fg(Color::Cyan))
            .block(input_block)
    };

    frame.render_widget(input, area);

    // Show cursor unless the input is frozen by an in-flight query
    if !app.loading {
        let cursor_x = (cursor_pos - scroll_offset) as u16;
        frame.set_cursor_position((area.x + cursor_x + 1, area.y + 1));
    }
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let texts = app.language.texts();

    // Key style: dark background with bright text for visibility on both light/dark terminals
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);

    let active_lang = Style::default()
        .bg(Color::Black)
        .fg(Color::White)
        .add_modifier(Modifier::BOLD);
    let inactive_lang = Style::default().bg(Color::Black).fg(Color::DarkGray);

    let mut hints = vec![
        Span::styled(" F2/F3 ", key_style),
        Span::styled(format!(" {} ", texts.hint_language), label_style),
    ];
    for (i, &lang) in Language::all().iter().enumerate() {
        if i > 0 {
            hints.push(Span::styled("|", label_style));
        }
        let lang_style = if lang == app.language {
            active_lang
        } else {
            inactive_lang
        };
        hints.push(Span::styled(format!(" {} ", lang.label()), lang_style));
    }
    hints.extend(vec![
        Span::styled(" Enter ", key_style),
        Span::styled(format!(" {} ", texts.hint_send), label_style),
        Span::styled(" ↑/↓ ", key_style),
        Span::styled(format!(" {} ", texts.hint_scroll), label_style),
        Span::styled(" Esc ", key_style),
        Span::styled(format!(" {} ", texts.hint_quit), label_style),
    ]);

    let footer = Paragraph::new(Line::from(hints));
    frame.render_widget(footer, area);
}
