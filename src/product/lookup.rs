use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;
use tracing::instrument;

use crate::account::Identity;
use crate::catalog::{CatalogError, ProductCatalog};
use crate::history::{ScanHistory, ScannedProduct};
use crate::product::model::ProductDetail;
use crate::session::{Loadable, StateCell};

pub const NOT_SIGNED_IN: &str = "User not logged in";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProductState {
    pub product: Option<ProductDetail>,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl Loadable for ProductState {
    fn loading_mut(&mut self) -> &mut bool {
        &mut self.is_loading
    }
}

/// Product page behind a scan or a typed code. A successful lookup is added
/// to the signed-in user's scan history.
pub struct ProductLookup {
    catalog: Arc<dyn ProductCatalog>,
    scans: Arc<dyn ScanHistory>,
    identity: Arc<dyn Identity>,
    state: StateCell<ProductState>,
}

impl ProductLookup {
    pub fn new(
        catalog: Arc<dyn ProductCatalog>,
        scans: Arc<dyn ScanHistory>,
        identity: Arc<dyn Identity>,
    ) -> Self {
        Self {
            catalog,
            scans,
            identity,
            state: StateCell::new(ProductState::default()),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ProductState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> ProductState {
        self.state.borrow().clone()
    }

    #[instrument(skip(self))]
    pub async fn fetch(&self, code: &str) {
        let Some(ticket) = self.state.begin(true, |s| {
            s.product = None;
            s.error = None;
            true
        }) else {
            return;
        };

        let code = code.trim();
        let result = if code.is_empty() {
            Err(CatalogError::Validation("product code is empty".into()))
        } else {
            self.catalog.product_by_code(code).await
        };

        let detail = match result {
            Ok(detail) => detail,
            Err(e) => {
                tracing::warn!(error = %e, code, "product lookup failed");
                self.state.settle(ticket, |s| s.error = Some(e.to_string()));
                return;
            }
        };

        let Some(user_id) = self.identity.current_user() else {
            self.state
                .settle(ticket, |s| s.error = Some(NOT_SIGNED_IN.to_string()));
            return;
        };

        if !self.state.is_current(&ticket) {
            tracing::debug!(code, "discarding stale product lookup");
            return;
        }
        let scan = ScannedProduct::from_detail(user_id, &detail);
        if let Err(e) = self.scans.record(scan).await {
            tracing::error!(error = %e, %user_id, code, "failed to record scan");
        }

        self.state.settle(ticket, |s| s.product = Some(detail));
    }

    pub fn close(&self) {
        self.state.close();
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::account::StaticIdentity;
    use crate::history::{MemoryScanHistory, MockScanHistory, StoreError};
    use crate::testing::{detail, FakeCatalog};

    fn signed_in(user: Uuid) -> Arc<dyn Identity> {
        Arc::new(StaticIdentity(Some(user)))
    }

    #[tokio::test]
    async fn unknown_code_reports_not_found() {
        let catalog = FakeCatalog::new();
        let mut scans = MockScanHistory::new();
        scans.expect_record().never();
        let lookup = ProductLookup::new(catalog, Arc::new(scans), signed_in(Uuid::new_v4()));

        lookup.fetch("0001").await;

        let state = lookup.snapshot();
        assert_eq!(state.error.as_deref(), Some("Not found"));
        assert!(!state.is_loading);
        assert_eq!(state.product, None);
    }

    #[tokio::test]
    async fn success_records_scan_for_user() {
        let user = Uuid::new_v4();
        let catalog = FakeCatalog::new();
        catalog.set_product("3017620422003", Ok(detail("3017620422003")));
        let scans = Arc::new(MemoryScanHistory::default());
        let lookup = ProductLookup::new(catalog, scans.clone(), signed_in(user));

        lookup.fetch("3017620422003").await;

        let state = lookup.snapshot();
        assert_eq!(state.error, None);
        assert_eq!(
            state.product.map(|p| p.code),
            Some("3017620422003".to_string())
        );
        let history = scans.list(user).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].code, "3017620422003");
        assert_eq!(
            history[0].product_name.as_deref(),
            Some("Product 3017620422003")
        );
    }

    #[tokio::test]
    async fn signed_out_user_gets_error_and_no_scan() {
        let catalog = FakeCatalog::new();
        catalog.set_product("1", Ok(detail("1")));
        let mut scans = MockScanHistory::new();
        scans.expect_record().never();
        let lookup = ProductLookup::new(
            catalog,
            Arc::new(scans),
            Arc::new(StaticIdentity::default()),
        );

        lookup.fetch("1").await;

        let state = lookup.snapshot();
        assert_eq!(state.error.as_deref(), Some(NOT_SIGNED_IN));
        assert_eq!(state.product, None);
        assert!(!state.is_loading);
    }

    #[tokio::test]
    async fn failed_scan_write_still_shows_product() {
        let user = Uuid::new_v4();
        let catalog = FakeCatalog::new();
        catalog.set_product("1", Ok(detail("1")));
        let mut scans = MockScanHistory::new();
        scans
            .expect_record()
            .withf(move |s| s.user_id == user && s.code == "1")
            .times(1)
            .returning(|_| Err(StoreError::NotFound));
        let lookup = ProductLookup::new(catalog, Arc::new(scans), signed_in(user));

        lookup.fetch("1").await;

        let state = lookup.snapshot();
        assert_eq!(state.error, None);
        assert!(state.product.is_some());
    }

    #[tokio::test]
    async fn blank_code_is_a_validation_error() {
        let catalog = FakeCatalog::new();
        let lookup = ProductLookup::new(
            catalog.clone(),
            Arc::new(MemoryScanHistory::default()),
            signed_in(Uuid::new_v4()),
        );

        lookup.fetch("   ").await;

        assert!(lookup
            .snapshot()
            .error
            .unwrap()
            .starts_with("Invalid request"));
        assert!(catalog.lookups().is_empty());
    }

    #[tokio::test]
    async fn superseded_fetch_is_neither_shown_nor_recorded() {
        let user = Uuid::new_v4();
        let catalog = FakeCatalog::new();
        catalog.set_product("old", Ok(detail("old")));
        catalog.set_product("new", Ok(detail("new")));
        let gate = catalog.gate_product("old");
        let mut scans = MockScanHistory::new();
        scans
            .expect_record()
            .withf(|s| s.code == "new")
            .times(1)
            .returning(|_| Ok(()));
        let lookup = ProductLookup::new(catalog.clone(), Arc::new(scans), signed_in(user));

        tokio::join!(lookup.fetch("old"), async {
            lookup.fetch("new").await;
            gate.notify_one();
        });

        assert_eq!(
            lookup.snapshot().product.map(|p| p.code),
            Some("new".to_string())
        );
    }
}
