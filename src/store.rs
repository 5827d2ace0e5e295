use std::fmt::Display;

use crate::types::{FetchStatus, FetchToken, Movie, Query, ResultBatch};

/// A fetch the store wants executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreRequest {
    pub token: FetchToken,
    pub query: Query,
}

/// Published by the store after a successful dispatch. Carries the full held
/// list, so a consumer can replace its own list wholesale.
#[derive(Debug, Clone, PartialEq)]
pub struct Baseline {
    pub generation: u64,
    pub query: Query,
    pub page: u32,
    pub batch: ResultBatch,
}

/// Single-slot cache of the first-page result set for the active query.
#[derive(Debug, Default)]
pub struct ResultStore {
    query: Query,
    results: Vec<Movie>,
    total: u64,
    status: FetchStatus,
    loaded: bool,
    generation: u64,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> FetchStatus {
        self.status
    }

    pub fn results(&self) -> &[Movie] {
        &self.results
    }

    /// Start a fetch. Any dispatch still outstanding is superseded.
    pub fn dispatch_fetch(&mut self, query: Query, page: u32) -> StoreRequest {
        self.generation += 1;
        self.status = FetchStatus::Loading;
        tracing::debug!(%query, page, generation = self.generation, "store dispatch");
        StoreRequest {
            token: FetchToken {
                generation: self.generation,
                page,
            },
            query,
        }
    }

    /// Apply a completion. Returns the new baseline on success.
    pub fn complete<E: Display>(
        &mut self,
        token: FetchToken,
        query: Query,
        result: Result<ResultBatch, E>,
    ) -> Option<Baseline> {
        if token.generation != self.generation {
            tracing::debug!(%query, generation = token.generation, "dropping superseded store result");
            return None;
        }

        match result {
            Ok(batch) => {
                if token.page == 1 {
                    self.results = batch.items;
                    self.query = query.clone();
                } else {
                    self.results.extend(batch.items);
                }
                self.total = batch.total_available;
                self.status = FetchStatus::Success;
                self.loaded = true;
                Some(self.snapshot(token.page))
            }
            Err(e) => {
                self.status = FetchStatus::Error;
                tracing::warn!(%query, page = token.page, status = %self.status, error = %e, "store fetch failed");
                None
            }
        }
    }

    /// Held result set, if it belongs to `query`.
    pub fn baseline_for(&self, query: &Query) -> Option<Baseline> {
        if self.loaded && self.query == *query {
            Some(self.snapshot(1))
        } else {
            None
        }
    }

    fn snapshot(&self, page: u32) -> Baseline {
        Baseline {
            generation: self.generation,
            query: self.query.clone(),
            page,
            batch: ResultBatch {
                items: self.results.clone(),
                total_available: self.total,
            },
        }
    }
}
