mod action;
mod app;
mod config;
mod error;
mod event;
mod feed;
mod sentinel;
mod source;
mod store;
#[cfg(test)]
mod testing;
mod tmdb;
mod trailer;
mod tui;
mod types;
mod ui;

use std::panic;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use clap::Parser;
use tokio::sync::mpsc;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::action::Action;
use crate::app::App;
use crate::config::Config;
use crate::event::Event;
use crate::source::CatalogSource;
use crate::tmdb::Tmdb;
use crate::tui::EventHandler;
use crate::types::Query;

#[derive(Parser, Debug)]
#[command(name = "marquee", version, about = "Browse and search a movie catalog from the terminal")]
struct Cli {
    /// Start with this search instead of the discover feed
    #[arg(short, long)]
    search: Option<String>,

    /// Catalog API key (overrides config and environment)
    #[arg(long)]
    api_key: Option<String>,

    /// Catalog API base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Config file (default: <config dir>/marquee/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

/// The terminal belongs to the UI, so logs go to a file when one can be
/// opened.
fn log_writer() -> BoxMakeWriter {
    let file = dirs::cache_dir()
        .map(|dir| dir.join("marquee"))
        .and_then(|dir| std::fs::create_dir_all(&dir).ok().map(|_| dir))
        .and_then(|dir| {
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(dir.join("marquee.log"))
                .ok()
        });

    match file {
        Some(file) => BoxMakeWriter::new(Mutex::new(file)),
        None => BoxMakeWriter::new(std::io::stderr),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(log_writer()),
        )
        .init();

    let mut config = Config::load(cli.config.as_deref());
    if let Some(base_url) = cli.base_url {
        config.api.base_url = base_url;
    }
    let api_key = config.resolve_api_key(cli.api_key)?;
    let source: Arc<dyn CatalogSource> = Arc::new(Tmdb::new(&config.api, api_key)?);
    let query = Query::new(cli.search.unwrap_or_default());

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = tui::restore();
        original_hook(panic_info);
    }));

    // Run the application
    let result = run(source, config, query).await;

    // Restore terminal
    tui::restore()?;

    result
}

async fn run(
    source: Arc<dyn CatalogSource>,
    config: Config,
    query: Query,
) -> Result<(), Box<dyn std::error::Error>> {
    // Initialize terminal
    let mut terminal = tui::init()?;

    // Create action channel
    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();

    // Create app state
    let mut app = App::new(source, &config.feed, action_tx.clone());
    app.update(Action::Resize(terminal.size()?.height));
    app.start(query);

    // Create event handler
    let tick_rate = Duration::from_millis(250);
    let render_rate = Duration::from_millis(16); // ~60fps
    let mut events = EventHandler::new(tick_rate, render_rate);

    // Main loop
    loop {
        tokio::select! {
            Some(event) = events.next() => {
                if event.is_quit() {
                    break;
                }

                match event {
                    Event::Render => {
                        terminal.draw(|frame| ui::render(frame, &app))?;
                    }
                    _ => {
                        let action = app.handle_event(event);
                        if !matches!(action, Action::None) {
                            action_tx.send(action)?;
                        }
                    }
                }
            }
            Some(action) = action_rx.recv() => {
                app.update(action);
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_defaults_to_discover() {
        let cli = Cli::try_parse_from(["marquee"]).unwrap();
        assert!(cli.search.is_none());
        assert!(Query::new(cli.search.unwrap_or_default()).is_discover());
    }

    #[test]
    fn cli_accepts_search_and_overrides() {
        let cli = Cli::try_parse_from([
            "marquee",
            "-s",
            "blade runner",
            "--api-key",
            "k",
            "--base-url",
            "http://localhost:9000/3",
        ])
        .unwrap();
        assert_eq!(cli.search.as_deref(), Some("blade runner"));
        assert_eq!(cli.api_key.as_deref(), Some("k"));
        assert_eq!(cli.base_url.as_deref(), Some("http://localhost:9000/3"));
    }
}
