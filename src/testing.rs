//! Fixtures shared by the unit tests.

use std::collections::HashMap;
use std::ops::RangeInclusive;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{FeedError, Result};
use crate::source::CatalogSource;
use crate::types::{Movie, Query, ResultBatch, Video};

pub fn movie(id: u64) -> Movie {
    Movie {
        id,
        title: format!("Movie {}", id),
        overview: None,
        release_date: Some("2001-01-01".to_string()),
        vote_average: Some(7.0),
    }
}

pub fn batch(ids: RangeInclusive<u64>, total: u64) -> ResultBatch {
    ResultBatch {
        items: ids.map(movie).collect(),
        total_available: total,
    }
}

pub fn ids(movies: &[Movie]) -> Vec<u64> {
    movies.iter().map(|m| m.id).collect()
}

pub fn video(kind: &str, key: &str) -> Video {
    Video {
        key: key.to_string(),
        kind: kind.to_string(),
    }
}

/// Scripted catalog. Unscripted requests fail.
#[derive(Debug, Default)]
pub struct FakeSource {
    pages: HashMap<(Query, u32), std::result::Result<ResultBatch, String>>,
    videos: HashMap<u64, std::result::Result<Vec<Video>, String>>,
    page_calls: Mutex<Vec<(Query, u32)>>,
    video_calls: Mutex<Vec<u64>>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(
        mut self,
        query: Query,
        page: u32,
        result: std::result::Result<ResultBatch, String>,
    ) -> Self {
        self.pages.insert((query, page), result);
        self
    }

    pub fn with_videos(
        mut self,
        movie_id: u64,
        result: std::result::Result<Vec<Video>, String>,
    ) -> Self {
        self.videos.insert(movie_id, result);
        self
    }

    pub fn page_calls(&self) -> Vec<(Query, u32)> {
        self.page_calls.lock().unwrap().clone()
    }

    pub fn video_calls(&self) -> Vec<u64> {
        self.video_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CatalogSource for FakeSource {
    fn name(&self) -> &str {
        "fake"
    }

    async fn fetch_page(&self, query: &Query, page: u32) -> Result<ResultBatch> {
        self.page_calls.lock().unwrap().push((query.clone(), page));
        match self.pages.get(&(query.clone(), page)) {
            Some(Ok(batch)) => Ok(batch.clone()),
            Some(Err(e)) => Err(FeedError::Network(e.clone())),
            None => Err(FeedError::Network(format!("no fixture for {} page {}", query, page))),
        }
    }

    async fn fetch_videos(&self, movie_id: u64) -> Result<Vec<Video>> {
        self.video_calls.lock().unwrap().push(movie_id);
        match self.videos.get(&movie_id) {
            Some(Ok(videos)) => Ok(videos.clone()),
            Some(Err(e)) => Err(FeedError::Network(e.clone())),
            None => Ok(Vec::new()),
        }
    }
}
