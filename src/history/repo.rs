use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::{ScannedProduct, UserProfile};
use super::{ProfileStore, ScanHistory, StoreError};

#[derive(Clone)]
pub struct PgScanHistory {
    db: PgPool,
}

impl PgScanHistory {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ScanHistory for PgScanHistory {
    async fn record(&self, scan: ScannedProduct) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO scanned_products
                (user_id, code, product_name, product_type, image_url,
                 nutriscore_grade, nutriscore_score, scanned_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (user_id, code) DO UPDATE SET
                product_name = EXCLUDED.product_name,
                product_type = EXCLUDED.product_type,
                image_url = EXCLUDED.image_url,
                nutriscore_grade = EXCLUDED.nutriscore_grade,
                nutriscore_score = EXCLUDED.nutriscore_score,
                scanned_at = EXCLUDED.scanned_at
            "#,
        )
        .bind(scan.user_id)
        .bind(&scan.code)
        .bind(&scan.product_name)
        .bind(&scan.product_type)
        .bind(&scan.image_url)
        .bind(&scan.nutriscore_grade)
        .bind(scan.nutriscore_score)
        .bind(scan.scanned_at)
        .execute(&self.db)
        .await?;
        Ok(())
    }

    async fn list(&self, user_id: Uuid) -> Result<Vec<ScannedProduct>, StoreError> {
        let rows = sqlx::query_as::<_, ScannedProduct>(
            r#"
            SELECT user_id, code, product_name, product_type, image_url,
                   nutriscore_grade, nutriscore_score, scanned_at
              FROM scanned_products
             WHERE user_id = $1
             ORDER BY scanned_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }
}

#[derive(Clone)]
pub struct PgProfileStore {
    db: PgPool,
}

impl PgProfileStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProfileStore for PgProfileStore {
    async fn get(&self, user_id: Uuid) -> Result<UserProfile, StoreError> {
        sqlx::query_as::<_, UserProfile>(
            r#"SELECT user_id, username, avatar FROM user_profiles WHERE user_id = $1"#,
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or(StoreError::NotFound)
    }

    async fn upsert(&self, profile: UserProfile) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO user_profiles (user_id, username, avatar)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id) DO UPDATE SET
                username = EXCLUDED.username,
                avatar = EXCLUDED.avatar
            "#,
        )
        .bind(profile.user_id)
        .bind(&profile.username)
        .bind(&profile.avatar)
        .execute(&self.db)
        .await?;
        Ok(())
    }

    async fn update(&self, user_id: Uuid, username: &str, avatar: &str) -> Result<(), StoreError> {
        let done = sqlx::query(
            r#"UPDATE user_profiles SET username = $2, avatar = $3 WHERE user_id = $1"#,
        )
        .bind(user_id)
        .bind(username)
        .bind(avatar)
        .execute(&self.db)
        .await?;
        if done.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn delete(&self, user_id: Uuid) -> Result<(), StoreError> {
        sqlx::query(r#"DELETE FROM user_profiles WHERE user_id = $1"#)
            .bind(user_id)
            .execute(&self.db)
            .await?;
        Ok(())
    }
}
