use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use ratatui::Frame;

use crate::app::App;
use crate::types::Movie;

pub fn render(frame: &mut Frame, app: &App, area: Rect, title: &str, movies: &[Movie], index: usize) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("{}({}) ", title, movies.len()));

    if movies.is_empty() {
        let empty = Paragraph::new("Nothing here yet")
            .block(block)
            .style(Style::default().fg(Color::Gray));
        frame.render_widget(empty, area);
        return;
    }

    let width = area.width.saturating_sub(2) as usize;
    let items: Vec<ListItem> = movies
        .iter()
        .enumerate()
        .map(|(i, movie)| ListItem::new(super::movie_line(movie, i == index, app, width)))
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::DarkGray));

    let mut state = ListState::default();
    state.select(Some(index));

    frame.render_stateful_widget(list, area, &mut state);
}
