use serde::Serialize;

use crate::product::model::ProductSummary;
use crate::session::Loadable;

/// Snapshot of one search session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchState {
    /// Query whose results are held; empty until a search succeeds.
    pub query: String,
    /// Pages concatenated in arrival order. Duplicates are not filtered.
    pub results: Vec<ProductSummary>,
    pub current_page: u32,
    pub has_more: bool,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl Default for SearchState {
    fn default() -> Self {
        Self {
            query: String::new(),
            results: Vec::new(),
            current_page: 1,
            has_more: false,
            is_loading: false,
            error: None,
        }
    }
}

impl Loadable for SearchState {
    fn loading_mut(&mut self) -> &mut bool {
        &mut self.is_loading
    }
}

/// What a result list should show for a snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SearchView<'a> {
    /// No search has been run yet.
    NotSearched,
    /// First page in flight, nothing to show yet.
    Loading,
    Failed(&'a str),
    /// A search ran and matched nothing.
    NoResults,
    /// Accumulated results. `error` is set when the latest request failed and
    /// the list shown is what was kept from before.
    Results {
        items: &'a [ProductSummary],
        error: Option<&'a str>,
    },
}

impl SearchState {
    pub fn is_searched(&self) -> bool {
        !self.query.is_empty()
    }

    pub fn view(&self) -> SearchView<'_> {
        if !self.results.is_empty() {
            let error = if self.is_loading {
                None
            } else {
                self.error.as_deref()
            };
            return SearchView::Results {
                items: &self.results,
                error,
            };
        }
        if self.is_loading {
            return SearchView::Loading;
        }
        if let Some(error) = &self.error {
            return SearchView::Failed(error);
        }
        if self.is_searched() {
            SearchView::NoResults
        } else {
            SearchView::NotSearched
        }
    }

    /// Scroll trigger: true when the last visible row is the last rendered row
    /// and another page can be requested.
    pub fn should_load_more(&self, last_visible_index: usize, rendered_count: usize) -> bool {
        rendered_count > 0
            && last_visible_index + 1 >= rendered_count
            && self.has_more
            && !self.is_loading
    }
}
