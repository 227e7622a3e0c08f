use ratatui::{
    Frame,
    layout::{Constraint, Layout, Position, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use crate::app::{App, InputMode};
use crate::panel::{Display, PanelState};
use crate::quran::SURAH_COUNT;
use crate::render::Rendered;
use crate::tui::Pane;

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, body, footer
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(frame, header_area);

    let [chapter_area, keyword_area] = Layout::horizontal([
        Constraint::Percentage(50),
        Constraint::Percentage(50),
    ])
    .areas(body_area);

    let (view_height, content_rows) = render_pane(app, frame, chapter_area, Pane::Chapter);
    app.chapter.set_viewport(view_height, content_rows);
    let (view_height, content_rows) = render_pane(app, frame, keyword_area, Pane::Keyword);
    app.keyword.set_viewport(view_height, content_rows);

    render_footer(app, frame, footer_area);
}

fn render_header(frame: &mut Frame, area: Rect) {
    let title = Line::from(vec![
        Span::styled(" Quran ", Style::default().fg(Color::Cyan).bold()),
        Span::raw(" "),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

/// Draw one pane. Returns the result area height and the wrapped row count of its content.
fn render_pane(app: &App, frame: &mut Frame, area: Rect, pane: Pane) -> (u16, u16) {
    let panel = app.panel(pane);
    let focused = app.focus == pane;

    let (title, input_title) = match pane {
        Pane::Chapter => (" Surah ", format!(" Surah number (1-{}) ", SURAH_COUNT)),
        Pane::Keyword => (" Keyword ", " Search for keyword ".to_string()),
    };

    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [input_area, results_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(0),
    ])
    .areas(inner);

    render_input(app, frame, input_area, panel, &input_title, focused);

    let mut content_rows = 0u16;
    let results = match &panel.display {
        Display::Idle => Paragraph::new(Span::styled(
            "Press Enter to search",
            Style::default().fg(Color::DarkGray),
        )),
        Display::Fetching => {
            let dots = ".".repeat(app.animation_frame as usize + 1);
            Paragraph::new(Span::styled(
                format!("Loading{}", dots),
                Style::default().fg(Color::Yellow),
            ))
        }
        Display::Error(message) => Paragraph::new(Line::from(Span::styled(
            message.clone(),
            Style::default().fg(Color::Red),
        )))
        .centered(),
        Display::Rendered(rendered) => {
            let paragraph = Paragraph::new(rendered_text(rendered)).wrap(Wrap { trim: false });
            // Scroll bounds come from wrapped rows, not logical lines
            content_rows = u16::try_from(paragraph.line_count(results_area.width))
                .unwrap_or(u16::MAX);
            let max_scroll = content_rows.saturating_sub(results_area.height.max(1));
            paragraph.scroll((panel.scroll.min(max_scroll), 0))
        }
    };

    frame.render_widget(results, results_area);
    (results_area.height, content_rows)
}

fn render_input(
    app: &App,
    frame: &mut Frame,
    area: Rect,
    panel: &PanelState,
    title: &str,
    focused: bool,
) {
    let editing = focused && app.input_mode == InputMode::Editing;
    let style = if editing {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let input = Paragraph::new(panel.input.as_str())
        .style(style)
        .block(Block::default().borders(Borders::ALL).title(title.to_string()));
    frame.render_widget(input, area);

    if editing {
        // Position cursor inside the input border
        let cursor_x = area.x + 1 + panel.cursor as u16;
        let max_x = area.x + area.width.saturating_sub(2);
        frame.set_cursor_position(Position::new(cursor_x.min(max_x), area.y + 1));
    }
}

fn rendered_text(rendered: &Rendered) -> Text<'static> {
    let mut lines: Vec<Line<'static>> = Vec::new();

    if let Some(header) = &rendered.header {
        lines.push(Line::from(Span::styled(
            header.clone(),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )));
    }

    for line in &rendered.lines {
        lines.push(Line::from(vec![
            Span::styled(
                format!("{}: ", line.label),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::raw(line.text.clone()),
        ]));
    }

    if let Some(notice) = &rendered.notice {
        lines.push(Line::from(Span::styled(
            notice.clone(),
            Style::default().fg(Color::DarkGray),
        )));
    }

    Text::from(lines)
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let mode_style = match app.input_mode {
        InputMode::Normal => Style::default().bg(Color::Blue).fg(Color::White),
        InputMode::Editing => Style::default().bg(Color::Yellow).fg(Color::Black),
    };

    let mode_text = match app.input_mode {
        InputMode::Normal => " NORMAL ",
        InputMode::Editing => " EDIT ",
    };

    // Key style: dark background with bright text for visibility on both light/dark terminals
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);

    let hints = match app.input_mode {
        InputMode::Normal => vec![
            Span::styled(" Tab ", key_style),
            Span::styled(" pane ", label_style),
            Span::styled(" i ", key_style),
            Span::styled(" edit ", label_style),
            Span::styled(" r ", key_style),
            Span::styled(" search ", label_style),
            Span::styled(" x ", key_style),
            Span::styled(" clear ", label_style),
            Span::styled(" j/k ", key_style),
            Span::styled(" scroll ", label_style),
            Span::styled(" q ", key_style),
            Span::styled(" quit ", label_style),
        ],
        InputMode::Editing => vec![
            Span::styled(" Enter ", key_style),
            Span::styled(" search ", label_style),
            Span::styled(" ^L ", key_style),
            Span::styled(" clear ", label_style),
            Span::styled(" Tab ", key_style),
            Span::styled(" pane ", label_style),
            Span::styled(" Esc ", key_style),
            Span::styled(" normal ", label_style),
        ],
    };

    let mut spans = vec![Span::styled(mode_text, mode_style)];
    spans.extend(hints);

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
