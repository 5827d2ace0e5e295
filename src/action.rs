use crate::error::FeedError;
use crate::types::{FetchToken, Query, ResultBatch};

/// Top-level screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Feed,
    Starred,
    WatchLater,
}

impl Screen {
    pub fn next(self) -> Self {
        match self {
            Screen::Feed => Screen::Starred,
            Screen::Starred => Screen::WatchLater,
            Screen::WatchLater => Screen::Feed,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Action {
    Quit,
    Back,
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    GoToTop,
    GoToBottom,
    Select,
    /// Terminal height changed
    Resize(u16),

    // Navigation
    ShowScreen(Screen),
    NextScreen,
    Home,

    // Search
    EnterSearchMode,
    SearchInput(char),
    SearchBackspace,
    ClearSearch,
    /// Submit the search box
    Search(Query),

    // Feed: results come back tagged with the token they were issued under
    StoreLoaded {
        token: FetchToken,
        query: Query,
        result: Result<ResultBatch, String>,
    },
    PageLoaded {
        token: FetchToken,
        result: Result<ResultBatch, String>,
    },

    // Saved lists
    ToggleStar,
    ToggleWatchLater,

    // Trailer overlay
    TrailerResolved {
        movie_id: u64,
        key: Option<String>,
        load_id: u64,
    },
    CloseTrailer,
    OpenTrailer,
    YankTrailerUrl,

    Error(String),
    None,
}

impl From<FeedError> for Action {
    fn from(err: FeedError) -> Self {
        Action::Error(err.to_string())
    }
}
