use async_trait::async_trait;

use crate::error::Result;
use crate::types::{Query, ResultBatch, Video};

/// Remote content provider backing the feed and the trailer overlay.
#[async_trait]
pub trait CatalogSource: Send + Sync + std::fmt::Debug {
    fn name(&self) -> &str;

    /// One page of the discover listing, or of search results when the
    /// query carries a term. Pages are 1-based.
    async fn fetch_page(&self, query: &Query, page: u32) -> Result<ResultBatch>;

    /// Videos attached to a single movie's detail payload.
    async fn fetch_videos(&self, movie_id: u64) -> Result<Vec<Video>>;
}
