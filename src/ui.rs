use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::{engine::Outcome, App, Page};

const HORIZONTAL_MARGIN: u16 = 5;
const HEADER_LINES: u16 = 2;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.page {
            Page::Typing => render_typing(self, area, buf),
            Page::Help => render_help(area, buf),
            Page::Results => render_results(self, area, buf),
        }
    }
}

fn header() -> Paragraph<'static> {
    Paragraph::new(Span::styled(
        "pacer / press ? for help",
        Style::default()
            .add_modifier(Modifier::DIM | Modifier::ITALIC),
    ))
    .alignment(Alignment::Center)
}

fn render_typing(app: &App, area: Rect, buf: &mut Buffer) {
    let engine = &app.engine;
    let passage = engine.passage();

    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let green_bold_style = Style::default().patch(bold_style).fg(Color::Green);
    let red_bold_style = Style::default().patch(bold_style).fg(Color::Red);
    let dim_bold_style = Style::default()
        .patch(bold_style)
        .add_modifier(Modifier::DIM);
    let underlined_dim_bold_style = Style::default()
        .patch(dim_bold_style)
        .add_modifier(Modifier::UNDERLINED);

    let max_chars_per_line = area.width.saturating_sub(HORIZONTAL_MARGIN * 2).max(1);
    let mut passage_occupied_lines =
        ((passage.width() as f64 / max_chars_per_line as f64).ceil() + 1.0) as u16;
    if passage.width() <= max_chars_per_line as usize {
        passage_occupied_lines = 1;
    }

    let padding = area
        .height
        .saturating_sub(HEADER_LINES)
        .saturating_sub(passage_occupied_lines)
        / 2;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints(
            [
                Constraint::Length(HEADER_LINES),
                Constraint::Length(padding),
                Constraint::Length(passage_occupied_lines),
                Constraint::Min(0),
            ]
            .as_ref(),
        )
        .split(area);

    header().render(chunks[0], buf);

    let mut spans = engine
        .history()
        .iter()
        .map(|k| match k.outcome {
            Outcome::Incorrect => Span::styled(
                match k.key {
                    ' ' => "·".to_owned(),
                    c => c.to_string(),
                },
                red_bold_style,
            ),
            Outcome::Correct => Span::styled(k.key.to_string(), green_bold_style),
        })
        .collect::<Vec<Span>>();

    if let Some((&next, rest)) = engine.remaining().split_first() {
        spans.push(Span::styled(next.to_string(), underlined_dim_bold_style));
        spans.push(Span::styled(
            rest.iter().collect::<String>(),
            dim_bold_style,
        ));
    }

    let widget = Paragraph::new(Line::from(spans))
        .alignment(if passage_occupied_lines == 1 {
            // when the passage fits on one line, centering the text
            // gives a nice zen feeling
            Alignment::Center
        } else {
            Alignment::Left
        })
        .wrap(Wrap { trim: true });

    widget.render(chunks[2], buf);
}

fn render_results(app: &App, area: Rect, buf: &mut Buffer) {
    let engine = &app.engine;

    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let italic_style = Style::default().add_modifier(Modifier::ITALIC);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints(
            [
                Constraint::Length(HEADER_LINES),
                Constraint::Length(area.height.saturating_sub(HEADER_LINES + 4) / 2),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
            ]
            .as_ref(),
        )
        .split(area);

    header().render(chunks[0], buf);

    let secs = engine.elapsed_secs().unwrap_or(0.0);
    let wpm = engine.wpm().unwrap_or(0.0);

    let time_taken = Paragraph::new(Span::styled(
        format!("Time taken: {:.2}s", secs),
        bold_style,
    ))
    .alignment(Alignment::Center);
    time_taken.render(chunks[2], buf);

    let words_per_minute = Paragraph::new(Span::styled(
        format!("Words per minute: {:.2}", wpm),
        bold_style,
    ))
    .alignment(Alignment::Center);
    words_per_minute.render(chunks[3], buf);

    let legend = Paragraph::new(Span::styled(
        "press (enter) to start a new test / (q) to quit",
        italic_style,
    ))
    .alignment(Alignment::Center);
    legend.render(chunks[5], buf);
}

fn binding_table(rows: &[(&'static str, &'static str)], title: &'static str) -> Table<'static> {
    let rows: Vec<Row> = rows
        .iter()
        .map(|(key, action)| Row::new(vec![Cell::from(*key), Cell::from(*action)]))
        .collect();

    Table::new(rows, &[Constraint::Length(24), Constraint::Length(28)])
        .block(Block::default().borders(Borders::ALL).title(title))
        .style(Style::default())
}

fn render_help(area: Rect, buf: &mut Buffer) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints(
            [
                Constraint::Length(HEADER_LINES),
                Constraint::Length(4),
                Constraint::Length(7),
                Constraint::Length(4),
                Constraint::Min(0),
            ]
            .as_ref(),
        )
        .split(area);

    header().render(chunks[0], buf);

    let all_pages = binding_table(
        &[("?", "help"), ("ctrl+c", "quit")],
        "All pages",
    );
    all_pages.render(chunks[1], buf);

    let typing_test = binding_table(
        &[
            ("tab", "new test"),
            ("backspace", "undo last key"),
            ("ctrl+w / alt+backspace", "delete last word"),
            ("ctrl+u", "clear everything typed"),
            ("esc", "quit"),
        ],
        "Typing test",
    );
    typing_test.render(chunks[2], buf);

    let other_pages = binding_table(
        &[("enter / esc / tab", "new test"), ("q", "quit")],
        "Other pages",
    );
    other_pages.render(chunks[3], buf);
}
