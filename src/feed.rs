use std::fmt::Display;

use crate::store::Baseline;
use crate::types::{FetchToken, Movie, Query, ResultBatch};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting on a page-1 fetch of our own.
    Initializing,
    Idle,
    LoadingNext,
    Exhausted,
    Failed,
}

/// A page fetch the controller wants executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub token: FetchToken,
    pub query: Query,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    Stale,
}

/// Pagination cursor and accumulated item list for the current query.
///
/// The controller never performs I/O. Every state change that needs a fetch
/// returns a [`PageRequest`]; the caller runs it and feeds the outcome back
/// through [`FeedController::complete`] with the request's token. Tokens
/// from before the latest [`FeedController::reset`] are discarded.
#[derive(Debug)]
pub struct FeedController {
    query: Query,
    items: Vec<Movie>,
    page: u32,
    has_more: bool,
    error: bool,
    phase: Phase,
    generation: u64,
    in_flight: Option<FetchToken>,
}

impl Default for FeedController {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedController {
    pub fn new() -> Self {
        Self {
            query: Query::discover(),
            items: Vec::new(),
            page: 1,
            has_more: false,
            error: false,
            phase: Phase::Initializing,
            generation: 0,
            in_flight: None,
        }
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn items(&self) -> &[Movie] {
        &self.items
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn error(&self) -> bool {
        self.error
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Start over for `query`. Without a baseline the controller fetches
    /// page 1 itself so the first paint does not wait on the store.
    pub fn reset(&mut self, query: Query, baseline: Option<Baseline>) -> Option<PageRequest> {
        self.generation += 1;
        self.query = query;
        self.page = 1;
        self.error = false;
        self.in_flight = None;

        match baseline {
            Some(baseline) => {
                let empty = baseline.batch.items.is_empty();
                self.items = baseline.batch.items;
                self.settle(baseline.batch.total_available, empty);
                tracing::debug!(
                    query = %self.query,
                    items = self.items.len(),
                    has_more = self.has_more,
                    "feed reset from baseline"
                );
                None
            }
            None => {
                self.items.clear();
                self.has_more = false;
                self.phase = Phase::Initializing;
                Some(self.issue())
            }
        }
    }

    /// Whether a store baseline may still replace the list. Once pagination
    /// has moved past page 1 the list already holds that page and more, so a
    /// late baseline for the same query would only throw that work away.
    pub fn accepts_baseline(&self, baseline: &Baseline) -> bool {
        baseline.query == self.query && self.page == 1
    }

    /// Feed a sentinel edge. Only a fresh entry while more pages remain and
    /// nothing is outstanding advances the cursor.
    pub fn on_visibility(&mut self, entered: bool) -> Option<PageRequest> {
        if !entered || !self.has_more || self.in_flight.is_some() {
            return None;
        }
        self.page += 1;
        self.phase = Phase::LoadingNext;
        Some(self.issue())
    }

    pub fn complete<E: Display>(
        &mut self,
        token: FetchToken,
        result: Result<ResultBatch, E>,
    ) -> Completion {
        if self.in_flight != Some(token) {
            tracing::debug!(
                generation = token.generation,
                page = token.page,
                current = self.generation,
                "dropping stale page"
            );
            return Completion::Stale;
        }
        self.in_flight = None;

        match result {
            Ok(batch) => {
                let empty = batch.items.is_empty();
                if token.page == 1 {
                    self.items = batch.items;
                } else {
                    self.items.extend(batch.items);
                }
                self.settle(batch.total_available, empty);
            }
            Err(e) => {
                tracing::warn!(query = %self.query, page = token.page, error = %e, "page fetch failed");
                self.error = true;
                self.has_more = false;
                self.phase = Phase::Failed;
            }
        }
        Completion::Applied
    }

    fn issue(&mut self) -> PageRequest {
        let token = FetchToken {
            generation: self.generation,
            page: self.page,
        };
        self.in_flight = Some(token);
        PageRequest {
            token,
            query: self.query.clone(),
        }
    }

    fn settle(&mut self, total: u64, last_batch_empty: bool) {
        self.has_more = !last_batch_empty && (self.items.len() as u64) < total;
        self.phase = if self.has_more {
            Phase::Idle
        } else {
            Phase::Exhausted
        };
    }
}
