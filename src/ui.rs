use crate::app::{App, InputMode};
use crossterm::event::{self, Event as CEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io;
use std::time::Duration;

fn get_legend(input_mode: &InputMode) -> Text<'static> {
    match input_mode {
        InputMode::Normal => Text::from(Line::from(vec![
            Span::styled(" q ", Style::default().fg(Color::Red)),
            Span::raw(": Quit "),
            Span::styled(" j ", Style::default().fg(Color::Red)),
            Span::raw(": Scroll Down "),
            Span::styled(" k ", Style::default().fg(Color::Red)),
            Span::raw(": Scroll Up "),
            Span::styled(" i ", Style::default().fg(Color::Red)),
            Span::raw(": Type Command "),
        ])),
        InputMode::Editing => Text::from(Line::from(vec![
            Span::styled(" Enter ", Style::default().fg(Color::Red)),
            Span::raw(": Submit "),
            Span::styled(" Up/Down ", Style::default().fg(Color::Red)),
            Span::raw(": History "),
            Span::styled(" PgUp/PgDn ", Style::default().fg(Color::Red)),
            Span::raw(": Scroll "),
            Span::styled(" Esc ", Style::default().fg(Color::Red)),
            Span::raw(": Clear "),
            Span::styled(" Ctrl-C ", Style::default().fg(Color::Red)),
            Span::raw(": Quit Without Saving "),
        ])),
    }
}

fn transcript_lines(app: &App) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for exchange in &app.transcript {
        if let Some(input) = &exchange.input {
            lines.push(Line::from(Span::styled(
                format!("> {}", input),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )));
        }
        let style = if exchange.is_error {
            Style::default().fg(Color::Red)
        } else {
            Style::default()
        };
        for reply_line in exchange.reply.lines() {
            lines.push(Line::from(Span::styled(reply_line.to_string(), style)));
        }
        lines.push(Line::default());
    }
    lines
}

pub fn draw(f: &mut Frame, app: &mut App) {
    let size = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(0)
        .constraints(
            [
                Constraint::Min(0),
                Constraint::Length(3),
                Constraint::Length(2),
            ]
            .as_ref(),
        )
        .split(size);

    let body_chunk = chunks[0];
    let input_chunk = chunks[1];
    let footer_chunk = chunks[2];

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)].as_ref())
        .split(body_chunk);

    // Left panel: conversation, pinned to the bottom unless scrolled back
    let lines = transcript_lines(app);
    let inner_width = body[0].width.saturating_sub(2).max(1);
    let inner_height = body[0].height.saturating_sub(2) as usize;
    let total: usize = lines
        .iter()
        .map(|line| {
            let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
            calculate_wrapped_lines(&text, inner_width)
        })
        .sum();
    let max_scroll = total.saturating_sub(inner_height);
    app.scroll_back = app.scroll_back.min(max_scroll.min(u16::MAX as usize) as u16);
    let offset = max_scroll.saturating_sub(app.scroll_back as usize);

    let transcript = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Chat"))
        .wrap(Wrap { trim: false })
        .scroll((offset.min(u16::MAX as usize) as u16, 0));
    f.render_widget(transcript, body[0]);

    // Right panel: latest task listing
    let listing = if app.listing.is_empty() {
        Paragraph::new("No tasks to show").style(Style::default().fg(Color::DarkGray))
    } else {
        let lines: Vec<Line> = app
            .listing
            .lines()
            .map(|line| {
                if line.contains("][X]") {
                    Line::from(Span::styled(line, Style::default().fg(Color::Green)))
                } else {
                    Line::from(line)
                }
            })
            .collect();
        Paragraph::new(lines)
    };
    f.render_widget(
        listing
            .block(Block::default().borders(Borders::ALL).title("Tasks"))
            .wrap(Wrap { trim: true }),
        body[1],
    );

    let input_style = match app.input_mode {
        InputMode::Editing => Style::default().fg(Color::Green),
        InputMode::Normal => Style::default().fg(Color::DarkGray),
    };
    let input = Paragraph::new(format!("> {}", app.input))
        .style(Style::default().fg(Color::White))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Command")
                .style(input_style),
        );
    f.render_widget(input, input_chunk);

    if app.input_mode == InputMode::Editing {
        let cursor_x = input_chunk.x + 3 + app.input.chars().count() as u16;
        f.set_cursor_position((
            cursor_x.min(input_chunk.right().saturating_sub(2)),
            input_chunk.y + 1,
        ));
    }

    let legend = Paragraph::new(get_legend(&app.input_mode))
        .style(Style::default().fg(Color::White))
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: true });

    f.render_widget(legend, footer_chunk);
}

pub fn run_app<B: Backend>(terminal: &mut Terminal<B>, mut app: App) -> io::Result<()> {
    loop {
        terminal.draw(|f| draw(f, &mut app))?;

        if event::poll(Duration::from_millis(100))? {
            if let CEvent::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if app.handle_input(key) {
                    return Ok(());
                }
            }
        }
    }
}

fn calculate_wrapped_lines(text: &str, max_width: u16) -> usize {
    let width = text.chars().count();
    let max_width = max_width.max(1) as usize;
    width.div_ceil(max_width).max(1)
}
