use anyhow::Context;
use serde::Deserialize;
use uuid::Uuid;

pub const DEFAULT_BASE_URL: &str = "https://world.openfoodfacts.net/api/v2/";

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    pub base_url: String,
    pub user_agent: String,
    pub page_size: u32,
    pub timeout_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            user_agent: concat!("nutralis/", env!("CARGO_PKG_VERSION")).into(),
            page_size: 24,
            timeout_secs: 15,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    pub catalog: CatalogConfig,
    /// Postgres for scan history and profiles; in-memory stores when unset.
    pub database_url: Option<String>,
    /// Signed-in user used when recording scans.
    pub user_id: Option<Uuid>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process
    /// environment.
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = CatalogConfig::default();
        let catalog = CatalogConfig {
            base_url: var("OFF_BASE_URL").unwrap_or(defaults.base_url),
            user_agent: var("OFF_USER_AGENT").unwrap_or(defaults.user_agent),
            page_size: var("OFF_PAGE_SIZE")
                .and_then(|v| v.parse::<u32>().ok())
                .filter(|n| *n > 0)
                .unwrap_or(defaults.page_size),
            timeout_secs: var("OFF_TIMEOUT_SECS")
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(defaults.timeout_secs),
        };
        let database_url = var("DATABASE_URL").filter(|v| !v.is_empty());
        let user_id = match var("NUTRALIS_USER_ID") {
            Some(raw) if !raw.trim().is_empty() => Some(
                raw.trim()
                    .parse::<Uuid>()
                    .context("NUTRALIS_USER_ID is not a uuid")?,
            ),
            _ => None,
        };
        Ok(Self {
            catalog,
            database_url,
            user_id,
        })
    }
}
