use std::sync::Arc;

use tokio::sync::watch;
use tracing::instrument;

use crate::catalog::{CatalogError, ProductCatalog};
use crate::product::model::SearchPage;
use crate::search::state::SearchState;
use crate::session::{StateCell, Ticket};

/// Query-keyed, paginated product search.
///
/// At most one page request is in flight per session. A new query supersedes
/// whatever is pending, and a response for a superseded request is dropped.
pub struct SearchSession {
    catalog: Arc<dyn ProductCatalog>,
    state: StateCell<SearchState>,
}

enum Merge {
    Replace,
    Append,
}

impl SearchSession {
    pub fn new(catalog: Arc<dyn ProductCatalog>) -> Self {
        Self {
            catalog,
            state: StateCell::new(SearchState::default()),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> SearchState {
        self.state.borrow().clone()
    }

    /// Runs a new search from page 1. Blank input is ignored entirely.
    #[instrument(skip(self))]
    pub async fn submit_query(&self, text: &str) {
        let query = text.trim();
        if query.is_empty() {
            return;
        }
        let Some(ticket) = self.state.begin(true, |s| {
            s.error = None;
            true
        }) else {
            return;
        };

        let result = self.catalog.search_products(query, 1).await;
        self.apply(ticket, query.to_string(), result, Merge::Replace);
    }

    /// Fetches the page after `current_page` and appends it. No-op while a
    /// request is in flight or when the remote reported nothing more.
    #[instrument(skip(self))]
    pub async fn load_more(&self) {
        let mut request = None;
        let Some(ticket) = self.state.begin(false, |s| {
            if s.is_loading || !s.has_more || !s.is_searched() {
                return false;
            }
            s.error = None;
            request = Some((s.query.clone(), s.current_page + 1));
            true
        }) else {
            return;
        };
        let Some((query, page)) = request else {
            return;
        };

        let result = self.catalog.search_products(&query, page).await;
        self.apply(ticket, query, result, Merge::Append);
    }

    /// Drops results and returns to the never-searched state.
    pub fn clear(&self) {
        self.state.reset(|s| *s = SearchState::default());
    }

    /// Tears the session down; responses still in flight are discarded.
    pub fn close(&self) {
        self.state.close();
    }

    fn apply(
        &self,
        ticket: Ticket<'_, SearchState>,
        query: String,
        result: Result<SearchPage, CatalogError>,
        merge: Merge,
    ) {
        let applied = self.state.settle(ticket, |s| match result {
            Ok(page) => {
                match merge {
                    Merge::Replace => s.results = page.items,
                    Merge::Append => s.results.extend(page.items),
                }
                s.current_page = page.page.max(1);
                s.has_more = (s.results.len() as u64) < page.total_count;
                s.query = query;
            }
            Err(e) => {
                tracing::warn!(error = %e, "search request failed");
                s.error = Some(e.to_string());
            }
        });
        if !applied {
            tracing::debug!("discarding stale search response");
        }
    }
}
