use std::sync::Arc;

use crate::account::{Identity, StaticIdentity};
use crate::catalog::{OpenFoodFactsClient, ProductCatalog};
use crate::compare::{ComparePicker, ComparisonSession};
use crate::config::AppConfig;
use crate::db;
use crate::history::{
    MemoryProfileStore, MemoryScanHistory, PgProfileStore, PgScanHistory, ProfileStore,
    ScanHistory,
};
use crate::product::ProductLookup;
use crate::search::{CategoryFeed, SearchSession};

/// Shared collaborators. Sessions are created per view from here and owned by
/// whoever opened them.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub catalog: Arc<dyn ProductCatalog>,
    pub scans: Arc<dyn ScanHistory>,
    pub profiles: Arc<dyn ProfileStore>,
    pub identity: Arc<dyn Identity>,
}

impl AppState {
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let config = Arc::new(config);
        let client = OpenFoodFactsClient::new(&config.catalog)?;
        let catalog = Arc::new(client) as Arc<dyn ProductCatalog>;

        let (scans, profiles) = match &config.database_url {
            Some(url) => {
                let pool = db::connect(url).await?;
                (
                    Arc::new(PgScanHistory::new(pool.clone())) as Arc<dyn ScanHistory>,
                    Arc::new(PgProfileStore::new(pool)) as Arc<dyn ProfileStore>,
                )
            }
            None => {
                tracing::info!("DATABASE_URL not set; scan history is kept in memory");
                (
                    Arc::new(MemoryScanHistory::default()) as Arc<dyn ScanHistory>,
                    Arc::new(MemoryProfileStore::default()) as Arc<dyn ProfileStore>,
                )
            }
        };

        let identity = Arc::new(StaticIdentity(config.user_id)) as Arc<dyn Identity>;

        Ok(Self {
            config,
            catalog,
            scans,
            profiles,
            identity,
        })
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        catalog: Arc<dyn ProductCatalog>,
        scans: Arc<dyn ScanHistory>,
        profiles: Arc<dyn ProfileStore>,
        identity: Arc<dyn Identity>,
    ) -> Self {
        Self {
            config,
            catalog,
            scans,
            profiles,
            identity,
        }
    }

    pub fn search_session(&self) -> SearchSession {
        SearchSession::new(self.catalog.clone())
    }

    pub fn compare_picker(&self) -> ComparePicker {
        ComparePicker::new(self.catalog.clone())
    }

    pub fn comparison_session(&self) -> ComparisonSession {
        ComparisonSession::new(self.catalog.clone())
    }

    pub fn category_feed(&self) -> CategoryFeed {
        CategoryFeed::new(self.catalog.clone())
    }

    pub fn product_lookup(&self) -> ProductLookup {
        ProductLookup::new(
            self.catalog.clone(),
            self.scans.clone(),
            self.identity.clone(),
        )
    }
}
