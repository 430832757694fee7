//! Search lifecycle: Loading → Results/Empty/Failed, with stale searches superseded.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use catalog::Catalog;
use shared::domain::{AuthorId, Book, CategoryId};
use tracing::{debug, info};

use crate::selection::SelectionController;

pub const DEFAULT_SEARCH_LATENCY: Duration = Duration::from_millis(800);

#[async_trait]
pub trait BookSource: Send + Sync {
    async fn books_matching(&self, author: AuthorId, category: CategoryId) -> Result<Vec<Book>>;
}

#[async_trait]
impl BookSource for Catalog {
    async fn books_matching(&self, author: AuthorId, category: CategoryId) -> Result<Vec<Book>> {
        Ok(Catalog::books_matching(self, author, category))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum SearchPhase {
    /// No search has run yet.
    #[default]
    Idle,
    Loading,
    Results(Vec<Book>),
    Empty,
    Failed(String),
}

/// Identifies one search request; only the newest ticket may complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchTicket {
    pub generation: u64,
    pub author: AuthorId,
    pub category: CategoryId,
}

#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub ticket: SearchTicket,
    pub result: Result<Vec<Book>, String>,
}

#[derive(Debug, Default)]
pub struct SearchSession {
    generation: u64,
    phase: SearchPhase,
}

impl SearchSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &SearchPhase {
        &self.phase
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, SearchPhase::Loading)
    }

    /// Starts a search for the controller's current choice; `None` unless
    /// both an author and a category are selected.
    pub fn begin_for(&mut self, selection: &SelectionController) -> Option<SearchTicket> {
        let (author, category) = selection.search_params()?;
        Some(self.begin(author, category))
    }

    /// Starts a search for an explicit pair, superseding any search in flight.
    pub fn begin(&mut self, author: AuthorId, category: CategoryId) -> SearchTicket {
        self.generation += 1;
        self.phase = SearchPhase::Loading;
        debug!(generation = self.generation, %author, %category, "search started");
        SearchTicket {
            generation: self.generation,
            author,
            category,
        }
    }

    pub fn is_current(&self, ticket: &SearchTicket) -> bool {
        ticket.generation == self.generation && self.is_loading()
    }

    /// Applies a finished search. Returns `false` when the outcome belongs to
    /// a superseded search and was dropped.
    pub fn apply(&mut self, outcome: SearchOutcome) -> bool {
        if !self.is_current(&outcome.ticket) {
            debug!(
                generation = outcome.ticket.generation,
                current = self.generation,
                "dropping stale search result"
            );
            return false;
        }

        self.phase = match outcome.result {
            Ok(books) if books.is_empty() => SearchPhase::Empty,
            Ok(books) => SearchPhase::Results(books),
            Err(message) => SearchPhase::Failed(message),
        };
        true
    }

    /// Drops whatever is shown and invalidates any search in flight.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.phase = SearchPhase::Idle;
    }
}

/// Waits out `latency`, then queries `source` for the ticket's pair.
pub async fn run_search(
    source: &dyn BookSource,
    ticket: SearchTicket,
    latency: Duration,
) -> SearchOutcome {
    if !latency.is_zero() {
        tokio::time::sleep(latency).await;
    }

    let result = source
        .books_matching(ticket.author, ticket.category)
        .await
        .map_err(|err| format!("{err:#}"));
    match &result {
        Ok(books) => info!(
            generation = ticket.generation,
            author = %ticket.author,
            category = %ticket.category,
            matches = books.len(),
            "search finished"
        ),
        Err(error) => info!(generation = ticket.generation, %error, "search failed"),
    }
    SearchOutcome { ticket, result }
}

#[cfg(test)]
#[path = "tests/search_tests.rs"]
mod tests;
