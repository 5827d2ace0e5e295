use std::sync::Arc;

use crate::source::CatalogSource;
use crate::types::Video;

const TRAILER_TYPE: &str = "Trailer";

/// First video typed as a trailer, else whatever comes first.
pub fn pick_trailer(videos: &[Video]) -> Option<&Video> {
    videos
        .iter()
        .find(|v| v.kind == TRAILER_TYPE)
        .or_else(|| videos.first())
}

pub fn watch_url(key: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", key)
}

/// Looks up a playable media key for a movie. Uncached; every call fetches.
#[derive(Debug, Clone)]
pub struct TrailerResolver {
    source: Arc<dyn CatalogSource>,
}

impl TrailerResolver {
    pub fn new(source: Arc<dyn CatalogSource>) -> Self {
        Self { source }
    }

    /// Failures are logged and reported as no trailer.
    pub async fn resolve(&self, movie_id: u64) -> Option<String> {
        let videos = match self.source.fetch_videos(movie_id).await {
            Ok(videos) => videos,
            Err(e) => {
                tracing::warn!(movie_id, error = %e, "error fetching movie details");
                return None;
            }
        };

        let key = pick_trailer(&videos)
            .map(|v| v.key.clone())
            .filter(|k| !k.is_empty());
        tracing::debug!(movie_id, videos = videos.len(), found = key.is_some(), "trailer resolved");
        key
    }
}
