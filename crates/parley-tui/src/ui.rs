use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, Wrap},
};
use parley_core::{ChatMessage, ChatOrigin};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};
use crate::app::{App, InputMode};

const CAPTION_HEIGHT: u16 = 7;

/// Parse a line of text and convert **bold** markdown to styled spans
fn parse_markdown_line(text: &str, base: Style) -> Vec<Span<'static>> {
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut chars = text.chars().peekable();
    let mut current_text = String::new();

    while let Some(c) = chars.next() {
        if c == '*' && chars.peek() == Some(&'*') {
            chars.next();

            if !current_text.is_empty() {
                spans.push(Span::styled(std::mem::take(&mut current_text), base));
            }

            // Find closing **
            let mut bold_text = String::new();
            let mut found_close = false;

            while let Some(c) = chars.next() {
                if c == '*' && chars.peek() == Some(&'*') {
                    chars.next();
                    found_close = true;
                    break;
                }
                bold_text.push(c);
            }

            if found_close && !bold_text.is_empty() {
                spans.push(Span::styled(bold_text, base.add_modifier(Modifier::BOLD)));
            } else {
                // No closing **, treat as literal
                current_text.push_str("**");
                current_text.push_str(&bold_text);
            }
        } else {
            current_text.push(c);
        }
    }

    if !current_text.is_empty() {
        spans.push(Span::styled(current_text, base));
    }

    spans
}

type Piece = (String, Style);

fn push_piece(pieces: &mut Vec<Piece>, text: &str, style: Style) {
    match pieces.last_mut() {
        Some((current, s)) if *s == style => current.push_str(text),
        _ => pieces.push((text.to_string(), style)),
    }
}

/// Split styled spans into words. A word keeps the style of every character,
/// so a bold phrase stays bold wherever it lands.
fn split_words(spans: &[Span<'_>]) -> Vec<Vec<Piece>> {
    let mut words = Vec::new();
    let mut current: Vec<Piece> = Vec::new();

    for span in spans {
        for c in span.content.chars() {
            if c.is_whitespace() {
                if !current.is_empty() {
                    words.push(std::mem::take(&mut current));
                }
            } else {
                push_piece(&mut current, c.encode_utf8(&mut [0; 4]), span.style);
            }
        }
    }

    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// Word-wrap styled spans to at most `width` terminal cells per row. Words
/// wider than a row are split between characters.
fn wrap_spans(spans: &[Span<'_>], width: usize) -> Vec<Vec<Span<'static>>> {
    let width = width.max(1);
    let mut rows: Vec<Vec<Piece>> = Vec::new();
    let mut row: Vec<Piece> = Vec::new();
    let mut row_width = 0;

    for word in split_words(spans) {
        let word_width: usize = word.iter().map(|(text, _)| text.width()).sum();

        if row_width > 0 && row_width + 1 + word_width > width {
            rows.push(std::mem::take(&mut row));
            row_width = 0;
        }

        if word_width > width {
            for (text, style) in word {
                for c in text.chars() {
                    let char_width = c.width().unwrap_or(0);
                    if row_width > 0 && row_width + char_width > width {
                        rows.push(std::mem::take(&mut row));
                        row_width = 0;
                    }
                    push_piece(&mut row, c.encode_utf8(&mut [0; 4]), style);
                    row_width += char_width;
                }
            }
            continue;
        }

        if row_width > 0 {
            push_piece(&mut row, " ", word[0].1);
            row_width += 1;
        }
        for (text, style) in &word {
            push_piece(&mut row, text, *style);
        }
        row_width += word_width;
    }
    rows.push(row);

    rows.into_iter()
        .map(|pieces| {
            pieces
                .into_iter()
                .map(|(text, style)| Span::styled(text, style))
                .collect()
        })
        .collect()
}

struct BubbleStyle {
    label: &'static str,
    color: Color,
    alignment: Alignment,
}

fn bubble_style(origin: ChatOrigin) -> BubbleStyle {
    match origin {
        ChatOrigin::Human => BubbleStyle {
            label: "You",
            color: Color::Cyan,
            alignment: Alignment::Right,
        },
        ChatOrigin::Assistant => BubbleStyle {
            label: "AI",
            color: Color::Yellow,
            alignment: Alignment::Left,
        },
    }
}

/// Draw `text` as a bordered bubble no wider than three quarters of `area_width`.
fn bubble_lines(
    style: &BubbleStyle,
    text: &str,
    text_style: Style,
    markdown: bool,
    area_width: usize,
) -> Vec<Line<'static>> {
    let max_inner = (area_width * 3 / 4).saturating_sub(4).max(1);
    let border = Style::default().fg(style.color);

    // Markdown is parsed per logical line before wrapping
    let mut rows: Vec<(Vec<Span<'static>>, usize)> = Vec::new();
    for raw in text.lines() {
        let spans = if markdown {
            parse_markdown_line(raw, text_style)
        } else {
            vec![Span::styled(raw.to_string(), text_style)]
        };
        for row in wrap_spans(&spans, max_inner) {
            let width = row.iter().map(Span::width).sum();
            rows.push((row, width));
        }
    }
    if rows.is_empty() {
        rows.push((Vec::new(), 0));
    }

    let label_len = style.label.width();
    let inner = rows
        .iter()
        .map(|(_, w)| *w)
        .max()
        .unwrap_or(0)
        .max(label_len + 1);

    let mut lines = Vec::with_capacity(rows.len() + 3);

    let top_fill = (inner + 4).saturating_sub(5 + label_len);
    lines.push(
        Line::from(vec![
            Span::styled("╭─ ", border),
            Span::styled(style.label, border.add_modifier(Modifier::BOLD)),
            Span::styled(format!(" {}╮", "─".repeat(top_fill)), border),
        ])
        .alignment(style.alignment),
    );

    for (spans, width) in rows {
        let mut row = vec![Span::styled("│ ", border)];
        row.extend(spans);
        row.push(Span::raw(" ".repeat(inner.saturating_sub(width))));
        row.push(Span::styled(" │", border));
        lines.push(Line::from(row).alignment(style.alignment));
    }

    lines.push(
        Line::from(Span::styled(
            format!("╰{}╯", "─".repeat(inner + 2)),
            border,
        ))
        .alignment(style.alignment),
    );
    lines.push(Line::default());

    lines
}

fn message_lines(msg: &ChatMessage, area_width: usize) -> Vec<Line<'static>> {
    let style = bubble_style(msg.origin);
    let markdown = msg.origin == ChatOrigin::Assistant;
    bubble_lines(&style, &msg.text, Style::default(), markdown, area_width)
}

/// Every line of the transcript pane, including the "Thinking..." bubble
fn transcript_lines(app: &App, area_width: usize) -> Vec<Line<'static>> {
    let mut lines: Vec<Line<'static>> = Vec::new();

    for msg in app.conversation.messages() {
        lines.extend(message_lines(msg, area_width));
    }

    if let Some(pending) = &app.pending {
        // Echo the question right away; it is committed only with the reply
        lines.extend(message_lines(&ChatMessage::human(pending.user_text.clone()), area_width));

        // Animated ellipsis: cycles through ".", "..", "..."
        let dots = ".".repeat((app.animation_frame as usize) + 1);
        lines.extend(bubble_lines(
            &bubble_style(ChatOrigin::Assistant),
            &format!("Thinking{}", dots),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
            false,
            area_width,
        ));
    }

    lines
}

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    let [header_area, chat_area, input_area, caption_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(3),
        Constraint::Length(3),
        Constraint::Length(CAPTION_HEIGHT),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);
    render_chat(app, frame, chat_area);
    render_input(app, frame, input_area);
    render_caption(app, frame, caption_area);
    render_footer(app, frame, footer_area);
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let title = Line::from(vec![
        Span::styled(" parley ", Style::default().fg(Color::Cyan).bold()),
        Span::styled(
            format!("{} ", app.turns.model()),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::Gray),
        ),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn render_chat(app: &mut App, frame: &mut Frame, area: Rect) {
    app.chat_area = Some(area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Chat ");

    let inner_width = area.width.saturating_sub(2) as usize;
    app.chat_height = area.height.saturating_sub(2);

    let lines = transcript_lines(app, inner_width);
    let total_lines = u16::try_from(lines.len()).unwrap_or(u16::MAX);

    app.chat_max_scroll = total_lines.saturating_sub(app.chat_height);
    app.chat_scroll = if app.follow_bottom {
        app.chat_max_scroll
    } else {
        app.chat_scroll.min(app.chat_max_scroll)
    };

    let text = if lines.is_empty() {
        Text::from(Span::styled(
            "Say something to start the conversation...",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Text::from(lines)
    };

    let chat = Paragraph::new(text)
        .block(block)
        .scroll((app.chat_scroll, 0));
    frame.render_widget(chat, area);

    if app.chat_max_scroll > 0 {
        let mut scrollbar_state = ScrollbarState::new(app.chat_max_scroll as usize)
            .position(app.chat_scroll as usize);
        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight),
            area,
            &mut scrollbar_state,
        );
    }
}

fn render_input(app: &App, frame: &mut Frame, area: Rect) {
    let border_color = if app.input_mode == InputMode::Editing {
        Color::Yellow
    } else {
        Color::DarkGray
    };

    let title = if app.is_waiting() {
        " Waiting for reply... "
    } else {
        " Message (Enter to send) "
    };

    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(title);

    // Horizontal scrolling keeps the cursor visible
    let inner_width = area.width.saturating_sub(2) as usize;
    let cursor_pos = app.cursor;
    let scroll_offset = if inner_width == 0 {
        0
    } else if cursor_pos >= inner_width {
        cursor_pos - inner_width + 1
    } else {
        0
    };

    let visible_text: String = app.input
        .chars()
        .skip(scroll_offset)
        .take(inner_width)
        .collect();

    let input = Paragraph::new(visible_text)
        .style(Style::default().fg(Color::Cyan))
        .block(input_block);

    frame.render_widget(input, area);

    if app.input_mode == InputMode::Editing {
        let cursor_x = (cursor_pos - scroll_offset) as u16;
        frame.set_cursor_position((area.x + cursor_x + 1, area.y + 1));
    }
}

fn render_caption(app: &App, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Session ");

    let mut lines = vec![Line::from(vec![
        Span::styled(
            format!("Used {} tokens", app.conversation.token_count()),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  {} turns", app.conversation.turn_count()),
            Style::default().fg(Color::DarkGray),
        ),
    ])];

    if let Some(error) = &app.last_error {
        lines.push(Line::from(Span::styled(
            format!("Error: {} (message not sent)", error),
            Style::default().fg(Color::Red),
        )));
    }

    let summary = app.conversation.summary();
    lines.push(Line::from(vec![
        Span::styled("Summary: ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            if summary.is_empty() { "(empty)".to_string() } else { summary.to_string() },
            Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
        ),
    ]));

    let caption = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: true });
    frame.render_widget(caption, area);
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let mode_style = match app.input_mode {
        InputMode::Normal => Style::default().bg(Color::Blue).fg(Color::White),
        InputMode::Editing => Style::default().bg(Color::Yellow).fg(Color::Black),
    };

    let mode_text = match app.input_mode {
        InputMode::Normal => " NORMAL ",
        InputMode::Editing => " INSERT ",
    };

    // Key style: dark background with bright text for visibility on both light/dark terminals
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);

    let hints = match app.input_mode {
        InputMode::Normal => vec![
            Span::styled(" j/k ", key_style),
            Span::styled(" scroll ", label_style),
            Span::styled(" g/G ", key_style),
            Span::styled(" top/bottom ", label_style),
            Span::styled(" i ", key_style),
            Span::styled(" type ", label_style),
            Span::styled(" q ", key_style),
            Span::styled(" quit ", label_style),
        ],
        InputMode::Editing => vec![
            Span::styled(" Enter ", key_style),
            Span::styled(" send ", label_style),
            Span::styled(" PgUp/PgDn ", key_style),
            Span::styled(" scroll ", label_style),
            Span::styled(" Esc ", key_style),
            Span::styled(" stop typing ", label_style),
        ],
    };

    let footer_content = Line::from(
        vec![
            Span::styled(mode_text, mode_style),
            Span::styled(" ", label_style),
        ]
        .into_iter()
        .chain(hints)
        .collect::<Vec<_>>(),
    );

    let footer = Paragraph::new(footer_content).style(Style::default().bg(Color::Black));
    frame.render_widget(footer, area);
}
