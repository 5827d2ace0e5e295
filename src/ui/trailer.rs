use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::app::{TrailerState, TrailerView};
use crate::trailer::watch_url;

/// Centered overlay for the selected movie's trailer.
pub fn render(frame: &mut Frame, view: &TrailerView) {
    let area = centered_rect(64, 12, frame.area());
    frame.render_widget(Clear, area);

    let mut lines = vec![Line::from("")];
    if let Some(overview) = view.overview.as_deref().filter(|o| !o.is_empty()) {
        lines.push(Line::from(Span::styled(
            super::truncate(overview, 180),
            Style::default().fg(Color::Gray),
        )));
        lines.push(Line::from(""));
    }
    match &view.state {
        TrailerState::Loading => {
            lines.push(Line::from(Span::styled(
                "Loading trailer...",
                Style::default().fg(Color::Yellow),
            )));
        }
        TrailerState::Missing => {
            lines.push(Line::from(Span::styled(
                "No trailer available.",
                Style::default().fg(Color::Gray),
            )));
        }
        TrailerState::Ready(key) => {
            lines.push(Line::from(Span::styled(
                watch_url(key),
                Style::default().fg(Color::Cyan),
            )));
            lines.push(Line::from(""));
            lines.push(Line::from(vec![
                Span::styled("[o]", Style::default().fg(Color::Green)),
                Span::raw("pen  "),
                Span::styled("[y]", Style::default().fg(Color::Green)),
                Span::raw("ank url  "),
                Span::styled("[esc]", Style::default().fg(Color::Red)),
                Span::raw(" close"),
            ]));
        }
    }

    let popup = Paragraph::new(lines)
        .block(
            Block::default().borders(Borders::ALL).title(Span::styled(
                format!(" {} ", view.title),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )),
        )
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    frame.render_widget(popup, area);
}

/// Fixed-size rect centered in `outer`, shrunk to fit.
fn centered_rect(width: u16, height: u16, outer: Rect) -> Rect {
    let popup_width = width.min(outer.width);
    let popup_height = height.min(outer.height);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((outer.height.saturating_sub(popup_height)) / 2),
            Constraint::Length(popup_height),
            Constraint::Min(0),
        ])
        .split(outer);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length((outer.width.saturating_sub(popup_width)) / 2),
            Constraint::Length(popup_width),
            Constraint::Min(0),
        ])
        .split(vertical[1]);

    horizontal[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_rect_fits_inside_small_terminal() {
        let outer = Rect::new(0, 0, 40, 6);
        let r = centered_rect(64, 9, outer);
        assert_eq!((r.width, r.height), (40, 6));
    }

    #[test]
    fn centered_rect_is_centered() {
        let outer = Rect::new(0, 0, 100, 30);
        let r = centered_rect(60, 10, outer);
        assert_eq!((r.x, r.y, r.width, r.height), (20, 10, 60, 10));
    }
}
