use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub icon_url: Option<String>,
    pub image_url: Option<String>,
    pub slug: String,
    pub sort_order: i32,
    pub is_featured: bool,
    // Self-referential parent pointer; NULL marks a top-level category.
    pub parent_category_id: Option<Uuid>,
    pub is_active: bool,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl Category {
    pub fn is_top_level(&self) -> bool {
        self.parent_category_id.is_none()
    }
}
