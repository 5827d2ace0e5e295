mod feed;
mod saved;
mod trailer;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::action::Screen;
use crate::app::App;
use crate::types::Movie;

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);

    match app.screen {
        Screen::Feed => feed::render(frame, app, chunks[1]),
        Screen::Starred => saved::render(frame, app, chunks[1], " Starred ", &app.starred, app.starred_index),
        Screen::WatchLater => saved::render(
            frame,
            app,
            chunks[1],
            " Watch later ",
            &app.watch_later,
            app.watch_later_index,
        ),
    }

    render_status_bar(frame, app, chunks[2]);

    if let Some(view) = &app.trailer {
        trailer::render(frame, view);
    }
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let title = match app.screen {
        Screen::Feed => match app.feed.query().term() {
            Some(term) => format!("marquee - Search: {}", term),
            None => "marquee - Discover".to_string(),
        },
        Screen::Starred => "marquee - Starred".to_string(),
        Screen::WatchLater => "marquee - Watch later".to_string(),
    };

    let star = if app.starred.is_empty() {
        Span::styled("  ☆", Style::default().fg(Color::Gray))
    } else {
        Span::styled(
            format!("  ★ {}", app.starred.len()),
            Style::default().fg(Color::Yellow),
        )
    };

    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            title,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        star,
        Span::styled(
            format!("  ⏲ {}", app.watch_later.len()),
            Style::default().fg(Color::Gray),
        ),
    ]))
    .style(Style::default().bg(Color::DarkGray));

    frame.render_widget(header, area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let status = if app.search_mode {
        Line::from(vec![
            Span::styled("Search: ", Style::default().fg(Color::Yellow)),
            Span::raw(app.search_input.as_str()),
            Span::styled("█", Style::default().fg(Color::Gray)),
        ])
    } else if let Some(error) = &app.error {
        Line::from(vec![Span::styled(
            format!("Error: {}", error),
            Style::default().fg(Color::Red),
        )])
    } else if let Some(notice) = &app.notice {
        Line::from(vec![Span::styled(
            notice.as_str(),
            Style::default().fg(Color::Green),
        )])
    } else if app.is_loading() {
        Line::from(vec![Span::styled(
            "Loading...",
            Style::default().fg(Color::Yellow),
        )])
    } else {
        let help = match app.screen {
            Screen::Feed => {
                "j/k/g/G: nav | Ctrl+d/u: page | Enter: trailer | /: search | s: star | w: later | Tab: lists | q: quit"
            }
            Screen::Starred | Screen::WatchLater => {
                "j/k/g/G: nav | Enter: trailer | s: star | w: later | H: home | q: back"
            }
        };
        Line::from(vec![Span::styled(help, Style::default().fg(Color::Gray))])
    };

    let status_bar = Paragraph::new(status).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status_bar, area);
}

/// Cut to `max` characters, marking the cut with "...".
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}

/// One list row: title, year, rating and saved-list badges.
fn movie_line<'a>(movie: &Movie, selected: bool, app: &App, width: usize) -> Line<'a> {
    let fixed = 18; // year(4) + spaces(2) + rating(6) + spaces(2) + badges(4)
    let flex = width.saturating_sub(fixed).max(10);

    let style = if selected {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };

    let year = movie
        .year()
        .map(|y| y.to_string())
        .unwrap_or_else(|| "----".to_string());
    let rating = movie
        .vote_average
        .map(|v| format!("★ {:.1}", v))
        .unwrap_or_default();
    let badges = format!(
        "{}{}",
        if app.is_starred(movie.id) { "★" } else { " " },
        if app.is_watch_later(movie.id) { "⏲" } else { " " },
    );

    Line::from(vec![
        Span::styled(format!("{:<flex$}", truncate(&movie.title, flex)), style),
        Span::raw("  "),
        Span::styled(year, Style::default().fg(Color::DarkGray)),
        Span::raw("  "),
        Span::styled(format!("{:>6}", rating), Style::default().fg(Color::Gray)),
        Span::raw("  "),
        Span::styled(badges, Style::default().fg(Color::Yellow)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use tokio::sync::mpsc;

    use crate::app::{TrailerState, TrailerView};
    use crate::config::FeedConfig;
    use crate::store::Baseline;
    use crate::testing::{batch, FakeSource};
    use crate::types::{Query, ResultBatch};

    fn app() -> App {
        let (tx, _rx) = mpsc::unbounded_channel();
        App::new(Arc::new(FakeSource::new()), &FeedConfig::default(), tx)
    }

    fn with_baseline(app: &mut App, batch: ResultBatch) {
        let baseline = Baseline {
            generation: 1,
            query: Query::discover(),
            page: 1,
            batch,
        };
        app.feed.reset(Query::discover(), Some(baseline));
    }

    /// Draw the whole screen and return it row by row.
    fn draw(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn feed_shows_loading_before_first_page() {
        let screen = draw(&app());
        assert!(screen.contains("Loading movies..."));
    }

    #[test]
    fn feed_shows_failure_message() {
        let mut app = app();
        let request = app.feed.reset(Query::discover(), None).unwrap();
        app.feed.complete(request.token, Err::<ResultBatch, _>("timeout"));

        let screen = draw(&app);
        assert!(screen.contains("Failed to fetch movies. Please try again later."));
        assert!(!screen.contains("Loading movies..."));
    }

    #[test]
    fn marker_row_only_while_more_pages_remain() {
        let mut app = app();
        with_baseline(&mut app, batch(1..=3, 10));
        let screen = draw(&app);
        assert!(screen.contains("Movie 3"));
        assert!(screen.contains("Loading more movies..."));

        with_baseline(&mut app, batch(1..=3, 3));
        let screen = draw(&app);
        assert!(screen.contains("Movie 3"));
        assert!(!screen.contains("Loading more movies..."));
    }

    #[test]
    fn empty_result_says_no_movies() {
        let mut app = app();
        with_baseline(&mut app, batch(1..=0, 0));
        assert!(draw(&app).contains("No movies found"));
    }

    #[test]
    fn trailer_overlay_reports_missing_trailer() {
        let mut app = app();
        with_baseline(&mut app, batch(1..=3, 3));
        app.trailer = Some(TrailerView {
            movie_id: 1,
            title: "Movie 1".to_string(),
            overview: None,
            state: TrailerState::Missing,
        });
        assert!(draw(&app).contains("No trailer available."));

        app.trailer.as_mut().unwrap().state = TrailerState::Ready("abc".to_string());
        assert!(draw(&app).contains("https://www.youtube.com/watch?v=abc"));
    }

    #[test]
    fn truncate_short_text_unchanged() {
        assert_eq!(truncate("Alien", 10), "Alien");
    }

    #[test]
    fn truncate_counts_chars_not_bytes() {
        assert_eq!(truncate("Amélie Poulain", 9), "Amélie...");
    }
}
