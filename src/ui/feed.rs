use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph};
use ratatui::Frame;

use crate::app::App;
use crate::feed::Phase;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(
            " Movies ({}) - page {} ",
            app.feed.items().len(),
            app.feed.page()
        ));

    let placeholder = if app.feed.error() {
        Some(("Failed to fetch movies. Please try again later.", Color::Red))
    } else if app.feed.phase() == Phase::Initializing {
        Some(("Loading movies...", Color::Yellow))
    } else if app.feed.items().is_empty() {
        Some(("No movies found", Color::Gray))
    } else {
        None
    };
    if let Some((text, color)) = placeholder {
        let empty = Paragraph::new(text)
            .block(block)
            .style(Style::default().fg(color));
        frame.render_widget(empty, area);
        return;
    }

    // Rows are laid out by hand from the app's own offset, which is the one
    // the sentinel observes.
    let width = area.width.saturating_sub(2) as usize;
    let height = area.height.saturating_sub(2) as usize;
    let items = app.feed.items();
    let marker_rows = if app.feed.has_more() {
        app.marker_rows
    } else {
        0
    };
    let end = (app.feed_offset + height).min(items.len() + marker_rows);

    let rows: Vec<ListItem> = (app.feed_offset..end)
        .map(|row| match items.get(row) {
            Some(movie) => {
                let selected = row == app.feed_index;
                let item = ListItem::new(super::movie_line(movie, selected, app, width));
                if selected {
                    item.style(Style::default().bg(Color::DarkGray))
                } else {
                    item
                }
            }
            None if row == items.len() => ListItem::new(Line::from(Span::styled(
                "Loading more movies...",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::ITALIC),
            ))),
            None => ListItem::new(""),
        })
        .collect();

    frame.render_widget(List::new(rows).block(block), area);
}
