use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Search term driving the feed. An empty term means discover mode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Query(String);

impl Query {
    pub fn new(term: impl Into<String>) -> Self {
        let term = term.into();
        if term.trim().is_empty() {
            Self::discover()
        } else {
            Self(term)
        }
    }

    pub fn discover() -> Self {
        Self(String::new())
    }

    pub fn is_discover(&self) -> bool {
        self.0.is_empty()
    }

    /// The search term, or `None` in discover mode.
    pub fn term(&self) -> Option<&str> {
        if self.is_discover() {
            None
        } else {
            Some(&self.0)
        }
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.term() {
            Some(term) => write!(f, "\"{}\"", term),
            None => write!(f, "discover"),
        }
    }
}

/// Catalog entry. Only `id` matters to the feed engine; the rest is display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
}

impl Movie {
    pub fn year(&self) -> Option<i32> {
        let date = self.release_date.as_deref()?;
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .ok()
            .map(|d| d.year())
    }
}

/// One page of results for a (Query, Page) pair.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultBatch {
    pub items: Vec<Movie>,
    pub total_available: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Video {
    #[serde(default)]
    pub key: String,
    #[serde(rename = "type", default)]
    pub kind: String,
}

/// Issued with every fetch and handed back with its completion. A completion
/// whose token no longer matches the issuer's current one is stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FetchToken {
    pub generation: u64,
    pub page: u32,
}

/// Status of the most recent store dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

impl fmt::Display for FetchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchStatus::Idle => write!(f, "idle"),
            FetchStatus::Loading => write!(f, "loading"),
            FetchStatus::Success => write!(f, "success"),
            FetchStatus::Error => write!(f, "error"),
        }
    }
}
