mod memory;
mod repo;
pub mod repo_types;

pub use memory::{MemoryProfileStore, MemoryScanHistory};
pub use repo::{PgProfileStore, PgScanHistory};
pub use repo_types::{ScannedProduct, UserProfile};

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Not found")]
    NotFound,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Per-user record of scanned products.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScanHistory: Send + Sync {
    /// Inserts or refreshes the `(user_id, code)` entry.
    async fn record(&self, scan: ScannedProduct) -> Result<(), StoreError>;

    /// Newest first.
    async fn list(&self, user_id: Uuid) -> Result<Vec<ScannedProduct>, StoreError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get(&self, user_id: Uuid) -> Result<UserProfile, StoreError>;

    async fn upsert(&self, profile: UserProfile) -> Result<(), StoreError>;

    /// Fails with `NotFound` when the profile does not exist.
    async fn update(&self, user_id: Uuid, username: &str, avatar: &str) -> Result<(), StoreError>;

    async fn delete(&self, user_id: Uuid) -> Result<(), StoreError>;
}
