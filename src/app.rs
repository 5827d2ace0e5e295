use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc;

use crate::action::{Action, Screen};
use crate::config::FeedConfig;
use crate::error::FeedError;
use crate::event::Event;
use crate::feed::{Completion, FeedController, PageRequest};
use crate::sentinel::{Marker, Sentinel, Viewport};
use crate::source::CatalogSource;
use crate::store::{ResultStore, StoreRequest};
use crate::trailer::{watch_url, TrailerResolver};
use crate::types::{FetchStatus, Movie, Query};

/// Rows not available to the list: header, status bar and the list border.
pub const CHROME_ROWS: u16 = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrailerState {
    Loading,
    Ready(String),
    Missing,
}

#[derive(Debug, Clone)]
pub struct TrailerView {
    pub movie_id: u64,
    pub title: String,
    pub overview: Option<String>,
    pub state: TrailerState,
}

pub struct App {
    pub screen: Screen,

    // Feed
    pub feed: FeedController,
    pub store: ResultStore,
    sentinel: Sentinel,
    pub marker_rows: usize,
    pub feed_index: usize,
    pub feed_offset: usize,
    pub list_height: usize,

    // Saved lists
    pub starred: Vec<Movie>,
    pub watch_later: Vec<Movie>,
    pub starred_index: usize,
    pub watch_later_index: usize,

    // Search
    pub search_mode: bool,
    pub search_input: String,

    pub trailer: Option<TrailerView>,
    trailer_load_id: u64,

    pub notice: Option<String>,
    pub error: Option<String>,
    pub should_quit: bool,
    source: Arc<dyn CatalogSource>,
    resolver: TrailerResolver,
    action_tx: mpsc::UnboundedSender<Action>,
}

impl App {
    pub fn new(
        source: Arc<dyn CatalogSource>,
        feed_config: &FeedConfig,
        action_tx: mpsc::UnboundedSender<Action>,
    ) -> Self {
        Self {
            screen: Screen::Feed,

            feed: FeedController::new(),
            store: ResultStore::new(),
            sentinel: Sentinel::new(feed_config.sentinel_threshold),
            marker_rows: feed_config.marker_rows.max(1) as usize,
            feed_index: 0,
            feed_offset: 0,
            list_height: 0,

            starred: Vec::new(),
            watch_later: Vec::new(),
            starred_index: 0,
            watch_later_index: 0,

            search_mode: false,
            search_input: String::new(),

            trailer: None,
            trailer_load_id: 0,

            notice: None,
            error: None,
            should_quit: false,
            resolver: TrailerResolver::new(Arc::clone(&source)),
            source,
            action_tx,
        }
    }

    /// Kick off the first load.
    pub fn start(&mut self, query: Query) {
        tracing::info!(source = self.source.name(), %query, "starting feed");
        self.search_input = query.term().unwrap_or_default().to_string();
        self.change_query(query, true);
    }

    pub fn is_loading(&self) -> bool {
        self.feed.is_loading() || self.store.status() == FetchStatus::Loading
    }

    pub fn is_starred(&self, id: u64) -> bool {
        self.starred.iter().any(|m| m.id == id)
    }

    pub fn is_watch_later(&self, id: u64) -> bool {
        self.watch_later.iter().any(|m| m.id == id)
    }

    pub fn handle_event(&self, event: Event) -> Action {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Resize(_, rows) => Action::Resize(rows),
            _ => Action::None,
        }
    }

    fn handle_key(&self, key: KeyEvent) -> Action {
        if self.search_mode {
            return match key.code {
                KeyCode::Esc => Action::ClearSearch,
                KeyCode::Enter => Action::Search(Query::new(self.search_input.clone())),
                KeyCode::Backspace => Action::SearchBackspace,
                KeyCode::Char(c) => Action::SearchInput(c),
                _ => Action::None,
            };
        }

        if self.trailer.is_some() {
            return match key.code {
                KeyCode::Esc | KeyCode::Char('q') | KeyCode::Enter => Action::CloseTrailer,
                KeyCode::Char('o') => Action::OpenTrailer,
                KeyCode::Char('y') => Action::YankTrailerUrl,
                _ => Action::None,
            };
        }

        match (key.code, key.modifiers) {
            (KeyCode::Char('d'), KeyModifiers::CONTROL) | (KeyCode::PageDown, _) => Action::PageDown,
            (KeyCode::Char('u'), KeyModifiers::CONTROL) | (KeyCode::PageUp, _) => Action::PageUp,
            (KeyCode::Char('q'), _) | (KeyCode::Esc, _) => {
                if self.screen == Screen::Feed {
                    Action::Quit
                } else {
                    Action::Back
                }
            }
            (KeyCode::Char('j'), _) | (KeyCode::Down, _) => Action::ScrollDown,
            (KeyCode::Char('k'), _) | (KeyCode::Up, _) => Action::ScrollUp,
            (KeyCode::Char('g'), _) | (KeyCode::Home, _) => Action::GoToTop,
            (KeyCode::Char('G'), _) | (KeyCode::End, _) => Action::GoToBottom,
            (KeyCode::Enter, _) => Action::Select,
            (KeyCode::Char('/'), _) => Action::EnterSearchMode,
            (KeyCode::Char('s'), _) => Action::ToggleStar,
            (KeyCode::Char('w'), _) => Action::ToggleWatchLater,
            (KeyCode::Char('H'), _) => Action::Home,
            (KeyCode::Tab, _) => Action::NextScreen,
            (KeyCode::Char('1'), _) => Action::ShowScreen(Screen::Feed),
            (KeyCode::Char('2'), _) => Action::ShowScreen(Screen::Starred),
            (KeyCode::Char('3'), _) => Action::ShowScreen(Screen::WatchLater),
            _ => Action::None,
        }
    }

    pub fn update(&mut self, action: Action) {
        let background = matches!(
            action,
            Action::None
                | Action::Resize(_)
                | Action::StoreLoaded { .. }
                | Action::PageLoaded { .. }
                | Action::TrailerResolved { .. }
        );
        if !background {
            self.notice = None;
            if self.error.is_some() && !matches!(action, Action::Quit | Action::Back) {
                self.error = None;
            }
        }

        match action {
            Action::Quit => {
                self.should_quit = true;
            }
            Action::Back => match self.screen {
                Screen::Feed => self.should_quit = true,
                _ => self.set_screen(Screen::Feed),
            },
            Action::ScrollUp => self.move_selection(-1),
            Action::ScrollDown => self.move_selection(1),
            Action::PageUp => self.move_selection(-(self.list_height.max(1) as isize)),
            Action::PageDown => self.move_selection(self.list_height.max(1) as isize),
            Action::GoToTop => self.move_selection(isize::MIN),
            Action::GoToBottom => self.move_selection(isize::MAX),
            Action::Select => {
                if let Some(movie) = self.selected_movie().cloned() {
                    self.open_trailer(movie);
                }
            }
            Action::Resize(rows) => {
                self.list_height = rows.saturating_sub(CHROME_ROWS) as usize;
                self.after_feed_move();
            }

            // Navigation
            Action::ShowScreen(screen) => self.set_screen(screen),
            Action::NextScreen => self.set_screen(self.screen.next()),
            Action::Home => {
                self.search_mode = false;
                self.search_input.clear();
                self.change_query(Query::discover(), false);
                self.set_screen(Screen::Feed);
            }

            // Search
            Action::EnterSearchMode => {
                self.search_mode = true;
            }
            Action::SearchInput(c) => {
                self.search_input.push(c);
                self.change_query(Query::new(self.search_input.clone()), false);
            }
            Action::SearchBackspace => {
                self.search_input.pop();
                self.change_query(Query::new(self.search_input.clone()), false);
            }
            Action::ClearSearch => {
                self.search_mode = false;
                self.search_input.clear();
                self.change_query(Query::discover(), false);
            }
            Action::Search(query) => {
                self.search_mode = false;
                self.search_input = query.term().unwrap_or_default().to_string();
                self.change_query(query, false);
            }

            // Feed
            Action::StoreLoaded {
                token,
                query,
                result,
            } => {
                let Some(baseline) = self.store.complete(token, query, result) else {
                    return;
                };
                tracing::debug!(
                    generation = baseline.generation,
                    page = baseline.page,
                    stored = self.store.results().len(),
                    "store baseline published"
                );
                if self.feed.accepts_baseline(&baseline) {
                    let query = baseline.query.clone();
                    self.feed.reset(query, Some(baseline));
                    self.sentinel.reset();
                    self.after_feed_move();
                } else {
                    tracing::debug!(query = %baseline.query, page = self.feed.page(), "baseline not applied to feed");
                }
            }
            Action::PageLoaded { token, result } => {
                if self.feed.complete(token, result) == Completion::Applied {
                    self.after_feed_move();
                }
            }

            // Saved lists
            Action::ToggleStar => {
                if let Some(movie) = self.selected_movie().cloned() {
                    let added = toggle(&mut self.starred, movie);
                    self.notice = Some(if added { "Starred" } else { "Unstarred" }.to_string());
                    self.clamp_saved_indices();
                }
            }
            Action::ToggleWatchLater => {
                if let Some(movie) = self.selected_movie().cloned() {
                    let added = toggle(&mut self.watch_later, movie);
                    self.notice = Some(
                        if added {
                            "Added to watch later"
                        } else {
                            "Removed from watch later"
                        }
                        .to_string(),
                    );
                    self.clamp_saved_indices();
                }
            }

            // Trailer overlay
            Action::TrailerResolved {
                movie_id,
                key,
                load_id,
            } => {
                if load_id != self.trailer_load_id {
                    return;
                }
                if let Some(view) = self.trailer.as_mut() {
                    if view.movie_id == movie_id {
                        view.state = match key {
                            Some(key) => TrailerState::Ready(key),
                            None => TrailerState::Missing,
                        };
                    }
                }
            }
            Action::CloseTrailer => {
                self.trailer = None;
            }
            Action::OpenTrailer => {
                if let Some(url) = self.trailer_url() {
                    if let Err(e) = open::that(&url) {
                        self.action_tx.send(Action::from(FeedError::Io(e))).ok();
                    }
                }
            }
            Action::YankTrailerUrl => {
                if let Some(url) = self.trailer_url() {
                    match arboard::Clipboard::new().and_then(|mut c| c.set_text(url)) {
                        Ok(()) => self.notice = Some("Copied trailer URL".to_string()),
                        Err(e) => {
                            self.action_tx.send(Action::Error(e.to_string())).ok();
                        }
                    }
                }
            }

            Action::Error(msg) => {
                tracing::warn!(%msg, "action error");
                self.error = Some(msg);
            }
            Action::None => {}
        }
    }

    /// Issue a new query cycle: store dispatch plus a controller reset.
    fn change_query(&mut self, query: Query, force: bool) {
        if !force && *self.feed.query() == query {
            return;
        }
        tracing::info!(%query, "query changed");

        let request = self.store.dispatch_fetch(query.clone(), 1);
        self.spawn_store_fetch(request);

        let baseline = self.store.baseline_for(&query);
        if let Some(request) = self.feed.reset(query, baseline) {
            self.spawn_load_page(request);
        }

        self.screen = Screen::Feed;
        self.feed_index = 0;
        self.feed_offset = 0;
        self.sentinel.reset();
        self.after_feed_move();
    }

    fn set_screen(&mut self, screen: Screen) {
        self.screen = screen;
        self.clamp_saved_indices();
        self.check_sentinel();
    }

    fn move_selection(&mut self, delta: isize) {
        let len = match self.screen {
            Screen::Feed => self.feed.items().len(),
            Screen::Starred => self.starred.len(),
            Screen::WatchLater => self.watch_later.len(),
        };
        let index = match self.screen {
            Screen::Feed => &mut self.feed_index,
            Screen::Starred => &mut self.starred_index,
            Screen::WatchLater => &mut self.watch_later_index,
        };
        *index = step(*index, delta, len);

        if self.screen == Screen::Feed {
            self.after_feed_move();
        }
    }

    fn after_feed_move(&mut self) {
        self.ensure_feed_visible();
        self.check_sentinel();
    }

    /// Keep the selection on screen. At the last item the trailing marker is
    /// scrolled into view too, the terminal analogue of reaching the bottom
    /// of the page.
    fn ensure_feed_visible(&mut self) {
        let len = self.feed.items().len();
        if len == 0 {
            self.feed_index = 0;
            self.feed_offset = 0;
            return;
        }
        let height = self.list_height.max(1);
        self.feed_index = self.feed_index.min(len - 1);

        let bottom = if self.feed_index == len - 1 && self.feed.has_more() {
            len + self.marker_rows - 1
        } else {
            self.feed_index
        };
        if bottom >= self.feed_offset + height {
            self.feed_offset = bottom + 1 - height;
        }
        if self.feed_index < self.feed_offset {
            self.feed_offset = self.feed_index;
        }
    }

    fn check_sentinel(&mut self) {
        let marker = (self.screen == Screen::Feed && self.feed.has_more()).then(|| Marker {
            top: self.feed.items().len(),
            height: self.marker_rows,
        });
        let viewport = Viewport {
            offset: self.feed_offset,
            height: self.list_height,
        };
        let entered = self.sentinel.observe(viewport, marker);
        if let Some(request) = self.feed.on_visibility(entered) {
            tracing::debug!(
                page = request.token.page,
                intersecting = self.sentinel.is_intersecting(),
                "sentinel requested next page"
            );
            self.spawn_load_page(request);
        }
    }

    fn clamp_saved_indices(&mut self) {
        self.starred_index = self.starred_index.min(self.starred.len().saturating_sub(1));
        self.watch_later_index = self
            .watch_later_index
            .min(self.watch_later.len().saturating_sub(1));
    }

    pub fn selected_movie(&self) -> Option<&Movie> {
        match self.screen {
            Screen::Feed => self.feed.items().get(self.feed_index),
            Screen::Starred => self.starred.get(self.starred_index),
            Screen::WatchLater => self.watch_later.get(self.watch_later_index),
        }
    }

    fn trailer_url(&self) -> Option<String> {
        match &self.trailer.as_ref()?.state {
            TrailerState::Ready(key) => Some(watch_url(key)),
            _ => None,
        }
    }

    fn open_trailer(&mut self, movie: Movie) {
        self.trailer_load_id += 1;
        self.trailer = Some(TrailerView {
            movie_id: movie.id,
            title: movie.title,
            overview: movie.overview,
            state: TrailerState::Loading,
        });
        self.spawn_resolve_trailer(movie.id, self.trailer_load_id);
    }

    fn spawn_store_fetch(&self, request: StoreRequest) {
        let tx = self.action_tx.clone();
        let source = Arc::clone(&self.source);
        tokio::spawn(async move {
            let result = source
                .fetch_page(&request.query, request.token.page)
                .await
                .map_err(|e| e.to_string());
            tx.send(Action::StoreLoaded {
                token: request.token,
                query: request.query,
                result,
            })
            .ok();
        });
    }

    fn spawn_load_page(&self, request: PageRequest) {
        let tx = self.action_tx.clone();
        let source = Arc::clone(&self.source);
        tokio::spawn(async move {
            let result = source
                .fetch_page(&request.query, request.token.page)
                .await
                .map_err(|e| e.to_string());
            tx.send(Action::PageLoaded {
                token: request.token,
                result,
            })
            .ok();
        });
    }

    fn spawn_resolve_trailer(&self, movie_id: u64, load_id: u64) {
        let tx = self.action_tx.clone();
        let resolver = self.resolver.clone();
        tokio::spawn(async move {
            let key = resolver.resolve(movie_id).await;
            tx.send(Action::TrailerResolved {
                movie_id,
                key,
                load_id,
            })
            .ok();
        });
    }
}

/// Add `movie` if absent, otherwise remove it. Returns whether it was added.
fn toggle(list: &mut Vec<Movie>, movie: Movie) -> bool {
    if let Some(pos) = list.iter().position(|m| m.id == movie.id) {
        list.remove(pos);
        false
    } else {
        list.push(movie);
        true
    }
}

fn step(index: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let max = len - 1;
    if delta < 0 {
        index.saturating_sub(delta.unsigned_abs()).min(max)
    } else {
        index.saturating_add(delta as usize).min(max)
    }
}
