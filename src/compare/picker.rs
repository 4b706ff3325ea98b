use std::sync::Arc;

use tokio::sync::watch;

use crate::catalog::ProductCatalog;
use crate::compare::slots::{SelectionSlots, Slot};
use crate::product::model::ProductSummary;
use crate::search::SearchSession;

/// Compare flow: a product search plus the two slots results are picked into.
pub struct ComparePicker {
    search: SearchSession,
    slots: watch::Sender<SelectionSlots>,
}

impl ComparePicker {
    pub fn new(catalog: Arc<dyn ProductCatalog>) -> Self {
        let (slots, _rx) = watch::channel(SelectionSlots::default());
        Self {
            search: SearchSession::new(catalog),
            slots,
        }
    }

    pub fn search(&self) -> &SearchSession {
        &self.search
    }

    pub fn subscribe_slots(&self) -> watch::Receiver<SelectionSlots> {
        self.slots.subscribe()
    }

    pub fn slots(&self) -> SelectionSlots {
        self.slots.borrow().clone()
    }

    pub fn select(&self, slot: Slot, product: ProductSummary) {
        tracing::debug!(?slot, code = %product.code, "product selected");
        self.slots.send_modify(|s| s.select(slot, product));
    }

    /// Empties the transient search results when the picker is reopened.
    /// Slot selections are kept.
    pub fn clear(&self) {
        self.search.clear();
    }

    /// Both selected codes, ready to hand to a comparison.
    pub fn selected_codes(&self) -> Option<(String, String)> {
        self.slots
            .borrow()
            .codes()
            .map(|(a, b)| (a.to_string(), b.to_string()))
    }

    pub fn close(&self) {
        self.search.close();
    }
}
