use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::product::model::ProductDetail;

/// One scan event, unique per `(user_id, code)`. Scanning the same product
/// again refreshes the row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ScannedProduct {
    pub user_id: Uuid,
    pub code: String,
    pub product_name: Option<String>,
    pub product_type: Option<String>,
    pub image_url: Option<String>,
    pub nutriscore_grade: Option<String>,
    pub nutriscore_score: Option<i32>,
    #[serde(with = "time::serde::rfc3339")]
    pub scanned_at: OffsetDateTime,
}

impl ScannedProduct {
    pub fn from_detail(user_id: Uuid, detail: &ProductDetail) -> Self {
        Self {
            user_id,
            code: detail.code.clone(),
            product_name: detail.name.clone(),
            product_type: detail.product_type.clone(),
            image_url: detail.image_url.clone(),
            nutriscore_grade: detail.nutrition_grade.map(|g| g.to_string()),
            nutriscore_score: detail.nutrition_score,
            scanned_at: OffsetDateTime::now_utc(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct UserProfile {
    pub user_id: Uuid,
    pub username: String,
    pub avatar: String,
}
