use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;
use tracing::instrument;

use crate::catalog::ProductCatalog;
use crate::product::model::ProductSummary;
use crate::session::{Loadable, StateCell};

/// Categories offered on the home feed, in display order.
pub const CATEGORIES: [&str; 6] = [
    "snacks",
    "beverages",
    "dairies",
    "desserts",
    "breakfasts",
    "milks",
];

/// Products shown per category.
pub const FEED_LIMIT: usize = 6;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedState {
    pub selected: String,
    pub products: Vec<ProductSummary>,
    pub is_loading: bool,
}

impl Default for FeedState {
    fn default() -> Self {
        Self {
            selected: CATEGORIES[0].to_string(),
            products: Vec::new(),
            is_loading: false,
        }
    }
}

impl Loadable for FeedState {
    fn loading_mut(&mut self) -> &mut bool {
        &mut self.is_loading
    }
}

/// Home screen browser: first page of one category, trimmed to a few items.
/// A failed load shows an empty list rather than an error.
pub struct CategoryFeed {
    catalog: Arc<dyn ProductCatalog>,
    state: StateCell<FeedState>,
}

impl CategoryFeed {
    pub fn new(catalog: Arc<dyn ProductCatalog>) -> Self {
        Self {
            catalog,
            state: StateCell::new(FeedState::default()),
        }
    }

    pub fn categories(&self) -> &'static [&'static str] {
        &CATEGORIES
    }

    pub fn subscribe(&self) -> watch::Receiver<FeedState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> FeedState {
        self.state.borrow().clone()
    }

    /// Loads the currently selected category.
    pub async fn open(&self) {
        let selected = self.state.borrow().selected.clone();
        self.select_category(&selected).await;
    }

    #[instrument(skip(self))]
    pub async fn select_category(&self, category: &str) {
        let Some(ticket) = self.state.begin(true, |s| {
            s.selected = category.to_string();
            true
        }) else {
            return;
        };

        let products = match self.catalog.search_products(category, 1).await {
            Ok(page) => page.items.into_iter().take(FEED_LIMIT).collect(),
            Err(e) => {
                tracing::warn!(error = %e, category, "category feed failed to load");
                Vec::new()
            }
        };
        self.state.settle(ticket, |s| s.products = products);
    }

    pub fn close(&self) {
        self.state.close();
    }
}
