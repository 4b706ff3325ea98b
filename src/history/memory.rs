use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::repo_types::{ScannedProduct, UserProfile};
use super::{ProfileStore, ScanHistory, StoreError};

/// Process-local scan history, used when no database is configured.
#[derive(Default)]
pub struct MemoryScanHistory {
    scans: RwLock<HashMap<(Uuid, String), ScannedProduct>>,
}

#[async_trait]
impl ScanHistory for MemoryScanHistory {
    async fn record(&self, scan: ScannedProduct) -> Result<(), StoreError> {
        self.scans
            .write()
            .await
            .insert((scan.user_id, scan.code.clone()), scan);
        Ok(())
    }

    async fn list(&self, user_id: Uuid) -> Result<Vec<ScannedProduct>, StoreError> {
        let mut rows: Vec<_> = self
            .scans
            .read()
            .await
            .values()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.scanned_at.cmp(&a.scanned_at));
        Ok(rows)
    }
}

#[derive(Default)]
pub struct MemoryProfileStore {
    profiles: RwLock<HashMap<Uuid, UserProfile>>,
}

#[async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn get(&self, user_id: Uuid) -> Result<UserProfile, StoreError> {
        self.profiles
            .read()
            .await
            .get(&user_id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn upsert(&self, profile: UserProfile) -> Result<(), StoreError> {
        self.profiles.write().await.insert(profile.user_id, profile);
        Ok(())
    }

    async fn update(&self, user_id: Uuid, username: &str, avatar: &str) -> Result<(), StoreError> {
        let mut profiles = self.profiles.write().await;
        let profile = profiles.get_mut(&user_id).ok_or(StoreError::NotFound)?;
        profile.username = username.to_string();
        profile.avatar = avatar.to_string();
        Ok(())
    }

    async fn delete(&self, user_id: Uuid) -> Result<(), StoreError> {
        self.profiles.write().await.remove(&user_id);
        Ok(())
    }
}
