use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::BigDecimal;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "pricing_type", rename_all = "snake_case")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PricingType {
    Fixed,
    Hourly,
    Negotiable,
    QuoteBased,
    Package,
}

impl PricingType {
    pub fn to_str(&self) -> &str {
        match self {
            PricingType::Fixed => "fixed",
            PricingType::Hourly => "hourly",
            PricingType::Negotiable => "negotiable",
            PricingType::QuoteBased => "quote_based",
            PricingType::Package => "package",
        }
    }
}

/// A provider's service listing. `average_rating` and `total_reviews` are
/// denormalized from the reviews table and recomputed on review writes.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct ServiceListing {
    pub id: Uuid,
    pub provider_id: Uuid,
    pub category_id: Uuid,
    pub title: String,
    pub description: String,
    pub base_price: BigDecimal,
    pub pricing_type: PricingType,
    pub price_unit: Option<String>,
    pub estimated_duration_minutes: Option<i32>,
    pub service_area: Option<String>,
    pub is_available: bool,
    pub is_featured: bool,
    pub average_rating: BigDecimal,
    pub total_reviews: i32,
    pub slug: String,
    pub is_active: bool,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}
