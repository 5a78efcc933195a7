use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, BorderType, Borders, Cell, Clear, List, ListItem, Padding, Paragraph, Row, Table, Wrap,
};

use crate::db::KeyValueStore;

use super::super::browser::Browser;
use super::super::detail::{DetailStatus, DetailView};
use super::super::format::{format_rating, format_runtime, star_bar, truncate};
use super::super::search::SearchStatus;
use super::super::selection::Selection;
use super::super::watched::{WatchedStore, format_average};
use super::{Focus, UiState};

const ACCENT: Color = Color::Rgb(110, 170, 255);
const MUTED: Color = Color::Rgb(185, 195, 210);
const TEXT: Color = Color::Rgb(230, 230, 230);

pub(super) fn draw_tui<S: KeyValueStore>(frame: &mut Frame, browser: &Browser<S>, ui: &mut UiState) {
    let bg = Block::default().style(Style::default().bg(Color::Black));
    frame.render_widget(bg, frame.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(frame.area());

    draw_header(frame, chunks[0], browser, ui);

    let body_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(42), Constraint::Percentage(58)])
        .split(chunks[1]);
    draw_results(frame, body_chunks[0], browser, ui);
    draw_side(frame, body_chunks[1], browser, ui);

    let controls = Paragraph::new(controls_line(ui.focus))
        .alignment(Alignment::Center)
        .block(panel_block("Controls", false));
    frame.render_widget(controls, chunks[2]);

    let status_widget = Paragraph::new(ui.status.clone())
        .style(status_style(&ui.status))
        .block(panel_block("Status", false));
    frame.render_widget(status_widget, chunks[3]);

    if let Some(confirm) = &ui.pending_delete {
        let popup_text = format!(
            "Remove from watched list?\n\n{}\n\nThis cannot be undone.\n\n[y / Enter] Delete   [n / Esc] Cancel",
            confirm.title
        );
        let popup_area = popup_rect_for_text(frame.area(), &popup_text);
        render_popup_shadow(frame, popup_area);
        frame.render_widget(Clear, popup_area);
        let popup = Paragraph::new(popup_text)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(modal_block("Confirm Delete"));
        frame.render_widget(popup, popup_area);
    }
}

fn draw_header<S: KeyValueStore>(frame: &mut Frame, area: Rect, browser: &Browser<S>, ui: &UiState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(16),
            Constraint::Min(20),
            Constraint::Length(22),
        ])
        .split(area);

    let logo = Paragraph::new(Line::from(Span::styled(
        "🍿 popcorn",
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center)
    .block(panel_block("", false));
    frame.render_widget(logo, columns[0]);

    let query = browser.search().query();
    let placeholder = query.is_empty();
    let input_text = if placeholder {
        Span::styled("Search movies...", Style::default().fg(Color::Rgb(110, 118, 130)))
    } else {
        Span::styled(query.to_string(), Style::default().fg(TEXT))
    };
    let input = Paragraph::new(Line::from(input_text))
        .block(panel_block("Search", ui.focus == Focus::Search));
    frame.render_widget(input, columns[1]);
    if ui.focus == Focus::Search && ui.pending_delete.is_none() {
        let typed = u16::try_from(query.chars().count()).unwrap_or(u16::MAX);
        let max_x = columns[1].x + columns[1].width.saturating_sub(2);
        let x = (columns[1].x + 1).saturating_add(typed).min(max_x);
        frame.set_cursor_position((x, columns[1].y + 1));
    }

    let found = Paragraph::new(Line::from(vec![
        Span::styled("Found ", Style::default().fg(MUTED)),
        Span::styled(
            browser.search().results().len().to_string(),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        Span::styled(" results", Style::default().fg(MUTED)),
    ]))
    .alignment(Alignment::Center)
    .block(panel_block("", false));
    frame.render_widget(found, columns[2]);
}

fn draw_results<S: KeyValueStore>(
    frame: &mut Frame,
    area: Rect,
    browser: &Browser<S>,
    ui: &mut UiState,
) {
    let focused = ui.focus == Focus::Results;
    let block = panel_block(if ui.list_open { "Results" } else { "Results [+]" }, focused);
    if !ui.list_open {
        frame.render_widget(block, area);
        return;
    }

    let search = browser.search();
    match search.status() {
        SearchStatus::Loading => {
            frame.render_widget(centered_message("Loading...", MUTED).block(block), area);
        }
        SearchStatus::Error => {
            let message = format!("⛔ {}", search.error_message());
            let widget = centered_message(&message, Color::Rgb(255, 145, 120)).block(block);
            frame.render_widget(widget, area);
        }
        SearchStatus::Idle if search.results().is_empty() => {
            let widget = centered_message("Type at least 3 characters to search.", MUTED).block(block);
            frame.render_widget(widget, area);
        }
        SearchStatus::Idle | SearchStatus::Ready => {
            let selected_id = match browser.selection() {
                Selection::Selected(id) => Some(id.as_str()),
                Selection::Unselected => None,
            };
            let width = usize::from(area.width.saturating_sub(14));
            let items: Vec<ListItem> = search
                .results()
                .iter()
                .map(|item| {
                    let marker = if selected_id == Some(item.id.as_str()) { "● " } else { "  " };
                    ListItem::new(Line::from(vec![
                        Span::styled(marker, Style::default().fg(Color::Yellow)),
                        Span::styled(truncate(&item.title, width.max(8)), Style::default().fg(TEXT)),
                        Span::styled(format!("  🗓 {}", item.year), Style::default().fg(MUTED)),
                    ]))
                })
                .collect();
            let list = List::new(items)
                .block(block)
                .highlight_style(highlight_style())
                .highlight_symbol("▸ ");
            frame.render_stateful_widget(list, area, &mut ui.results);
        }
    }
}

fn draw_side<S: KeyValueStore>(frame: &mut Frame, area: Rect, browser: &Browser<S>, ui: &mut UiState) {
    let focused = ui.focus == Focus::Watched;
    let detail_open = !matches!(browser.selection(), Selection::Unselected);
    let title = match (detail_open, ui.side_open) {
        (true, true) => "Details",
        (true, false) => "Details [+]",
        (false, true) => "Watched",
        (false, false) => "Watched [+]",
    };
    let block = panel_block(title, focused);
    if !ui.side_open {
        frame.render_widget(block, area);
        return;
    }

    if detail_open {
        match browser.detail_status() {
            DetailStatus::Idle | DetailStatus::Loading { .. } => {
                frame.render_widget(centered_message("Loading...", MUTED).block(block), area);
            }
            DetailStatus::Error { message, .. } => {
                let text = format!("⛔ {message}");
                let widget = centered_message(&text, Color::Rgb(255, 145, 120)).block(block);
                frame.render_widget(widget, area);
            }
            DetailStatus::Ready(_) => {
                if let Some(view) = browser.detail_view() {
                    let widget = Paragraph::new(detail_lines(&view))
                        .wrap(Wrap { trim: true })
                        .block(block);
                    frame.render_widget(widget, area);
                }
            }
        }
        return;
    }

    let inner = block.inner(area);
    frame.render_widget(block, area);
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(inner);
    frame.render_widget(summary_paragraph(browser.watched()), parts[0]);
    draw_watched_table(frame, parts[1], browser.watched(), ui);
}

fn detail_lines(view: &DetailView<'_>) -> Vec<Line<'static>> {
    let detail = view.detail;
    let label = Style::default().fg(MUTED);
    let mut lines = vec![
        Line::from(Span::styled(
            detail.title.clone(),
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(format!("Poster: {}", detail.poster_url), label)),
        Line::from(format!("{} • {}", detail.released, detail.runtime)),
        Line::from(detail.genre.clone()),
        Line::from(format!("⭐ {} IMDb rating", format_rating(detail.imdb_rating))),
        Line::from(""),
    ];

    match view.watched_user_rating {
        Some(rating) => lines.push(Line::from(Span::styled(
            format!("You rated with movie {rating} ⭐"),
            Style::default().fg(Color::Yellow),
        ))),
        None => {
            let pending = view.pending_rating;
            lines.push(Line::from(Span::styled(
                star_bar(pending),
                Style::default().fg(Color::Yellow),
            )));
            if pending > 0 {
                lines.push(Line::from(Span::styled(
                    format!("{pending}/10  press a to add to list"),
                    Style::default().fg(Color::Rgb(150, 220, 160)),
                )));
            } else {
                lines.push(Line::from(Span::styled("rate with 1-9, 0 for 10", label)));
            }
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        detail.plot.clone(),
        Style::default().add_modifier(Modifier::ITALIC),
    )));
    lines.push(Line::from(""));
    lines.push(Line::from(format!("Starring {}", detail.actors)));
    lines.push(Line::from(format!("Directed by {}", detail.director)));
    lines
}

fn summary_paragraph<S: KeyValueStore>(watched: &WatchedStore<S>) -> Paragraph<'static> {
    let summary = watched.summary();
    Paragraph::new(vec![
        Line::from(Span::styled(
            "Movies you watched",
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        )),
        Line::from(format!(
            "#️⃣ {} movies   ⭐ {}   🌟 {}   ⏳ {} min",
            summary.count,
            format_average(summary.avg_imdb_rating),
            format_average(summary.avg_user_rating),
            format_average(summary.avg_runtime),
        )),
    ])
    .style(Style::default().fg(TEXT))
}

fn draw_watched_table<S: KeyValueStore>(
    frame: &mut Frame,
    area: Rect,
    watched: &WatchedStore<S>,
    ui: &mut UiState,
) {
    if watched.all().is_empty() {
        frame.render_widget(
            centered_message("Nothing watched yet. Rate a movie and press a.", MUTED),
            area,
        );
        return;
    }

    let rows: Vec<Row> = watched
        .all()
        .iter()
        .map(|entry| {
            Row::new(vec![
                Cell::from(entry.title.clone()),
                Cell::from(format_rating(entry.imdb_rating)),
                Cell::from(entry.user_rating.to_string()),
                Cell::from(format_runtime(entry.runtime_minutes)),
            ])
        })
        .collect();
    let table = Table::new(
        rows,
        [
            Constraint::Min(16),
            Constraint::Length(6),
            Constraint::Length(6),
            Constraint::Length(9),
        ],
    )
    .header(
        Row::new(vec!["Title", "IMDb", "You", "Runtime"])
            .style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)),
    )
    .row_highlight_style(highlight_style())
    .highlight_symbol("▸ ");
    frame.render_stateful_widget(table, area, &mut ui.watched);
}

fn centered_message(text: &str, color: Color) -> Paragraph<'static> {
    Paragraph::new(text.to_string())
        .style(Style::default().fg(color))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
}

fn panel_block(title: &'static str, focused: bool) -> Block<'static> {
    let border = if focused {
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Rgb(125, 135, 150))
    };
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border)
        .title(title)
}

fn modal_block(title: &'static str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(
            Style::default()
                .fg(Color::Rgb(160, 190, 235))
                .add_modifier(Modifier::BOLD),
        )
        .title(title)
        .padding(Padding::new(2, 2, 1, 1))
}

fn highlight_style() -> Style {
    Style::default()
        .bg(ACCENT)
        .fg(Color::Black)
        .add_modifier(Modifier::BOLD)
}

fn pill_style(active: bool) -> Style {
    if active {
        highlight_style()
    } else {
        Style::default()
            .bg(Color::Rgb(72, 82, 96))
            .fg(Color::Rgb(230, 235, 242))
    }
}

fn controls_line(focus: Focus) -> Line<'static> {
    Line::from(vec![
        Span::styled(" SEARCH ", pill_style(focus == Focus::Search)),
        Span::raw(" "),
        Span::styled(" RESULTS ", pill_style(focus == Focus::Results)),
        Span::raw(" "),
        Span::styled(" WATCHED ", pill_style(focus == Focus::Watched)),
        Span::styled(
            "   Tab focus  / search  Enter open  1-0 rate  a add  d delete  - fold  Esc close  q quit",
            Style::default().fg(MUTED),
        ),
    ])
}

fn status_style(status: &str) -> Style {
    if status.starts_with("ERROR:") {
        Style::default()
            .fg(Color::Rgb(255, 145, 120))
            .add_modifier(Modifier::BOLD)
    } else if status.starts_with("INFO:") {
        Style::default().fg(Color::Rgb(205, 165, 255))
    } else {
        Style::default().fg(Color::Rgb(230, 235, 242))
    }
}

fn popup_rect_for_text(area: Rect, text: &str) -> Rect {
    let widest = text.lines().map(|line| line.chars().count()).max().unwrap_or(0);
    let widest = u16::try_from(widest).unwrap_or(u16::MAX);
    let line_count = u16::try_from(text.lines().count()).unwrap_or(u16::MAX);

    let available_width = area.width.saturating_sub(2).max(1);
    let width = widest
        .saturating_add(12)
        .clamp(44.min(available_width), 72.min(available_width));
    let available_height = area.height.saturating_sub(2).max(1);
    let height = line_count
        .saturating_add(6)
        .clamp(9.min(available_height), 16.min(available_height));

    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width, height)
}

fn render_popup_shadow(frame: &mut Frame, popup_area: Rect) {
    let area = frame.area();
    let shadow = Rect::new(
        (popup_area.x + 1).min(area.x + area.width.saturating_sub(1)),
        (popup_area.y + 1).min(area.y + area.height.saturating_sub(1)),
        popup_area.width.saturating_sub(1),
        popup_area.height.saturating_sub(1),
    );
    if shadow.width == 0 || shadow.height == 0 {
        return;
    }
    frame.render_widget(
        Block::default().style(Style::default().bg(Color::Rgb(14, 16, 24))),
        shadow,
    );
}
