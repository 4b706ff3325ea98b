use std::sync::Arc;

use futures::stream::{FuturesUnordered, StreamExt};
use serde::Serialize;
use tokio::sync::watch;
use tracing::instrument;

use crate::catalog::{CatalogError, ProductCatalog};
use crate::compare::slots::Slot;
use crate::product::model::ProductDetail;
use crate::session::{Loadable, StateCell};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ComparisonState {
    pub detail_a: Option<ProductDetail>,
    pub detail_b: Option<ProductDetail>,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl Loadable for ComparisonState {
    fn loading_mut(&mut self) -> &mut bool {
        &mut self.is_loading
    }
}

impl ComparisonState {
    /// Both records are loaded and nothing failed.
    pub fn ready(&self) -> Option<(&ProductDetail, &ProductDetail)> {
        match (&self.detail_a, &self.detail_b, &self.error) {
            (Some(a), Some(b), None) if !self.is_loading => Some((a, b)),
            _ => None,
        }
    }
}

/// Fetches two full product records side by side.
///
/// Both lookups are issued together and the state settles once the slower one
/// finishes. If either fails, the first failure to arrive becomes the error
/// and neither detail is kept.
pub struct ComparisonSession {
    catalog: Arc<dyn ProductCatalog>,
    state: StateCell<ComparisonState>,
}

impl ComparisonSession {
    pub fn new(catalog: Arc<dyn ProductCatalog>) -> Self {
        Self {
            catalog,
            state: StateCell::new(ComparisonState::default()),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ComparisonState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> ComparisonState {
        self.state.borrow().clone()
    }

    #[instrument(skip(self))]
    pub async fn compare(&self, code_a: &str, code_b: &str) {
        let Some(ticket) = self.state.begin(true, |s| {
            *s = ComparisonState::default();
            true
        }) else {
            return;
        };

        let mut pending = FuturesUnordered::new();
        pending.push(self.fetch(Slot::First, code_a));
        pending.push(self.fetch(Slot::Second, code_b));

        let mut detail_a = None;
        let mut detail_b = None;
        let mut first_error: Option<CatalogError> = None;
        while let Some((slot, result)) = pending.next().await {
            match result {
                Ok(detail) => match slot {
                    Slot::First => detail_a = Some(detail),
                    Slot::Second => detail_b = Some(detail),
                },
                Err(e) => {
                    tracing::warn!(error = %e, ?slot, "comparison lookup failed");
                    first_error.get_or_insert(e);
                }
            }
        }

        let applied = self.state.settle(ticket, |s| match first_error {
            Some(e) => s.error = Some(e.to_string()),
            None => {
                s.detail_a = detail_a;
                s.detail_b = detail_b;
            }
        });
        if !applied {
            tracing::debug!("discarding stale comparison");
        }
    }

    pub fn close(&self) {
        self.state.close();
    }

    async fn fetch(&self, slot: Slot, code: &str) -> (Slot, Result<ProductDetail, CatalogError>) {
        let code = code.trim();
        if code.is_empty() {
            return (
                slot,
                Err(CatalogError::Validation("product code is empty".into())),
            );
        }
        (slot, self.catalog.product_by_code(code).await)
    }
}
