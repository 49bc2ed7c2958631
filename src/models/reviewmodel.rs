use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::BigDecimal;
use uuid::Uuid;

/// One review per completed booking. Ratings are 1.0-5.0 with one decimal;
/// only `overall_rating` feeds the service's denormalized average.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Review {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub customer_id: Uuid,
    pub service_id: Uuid,
    pub provider_id: Uuid,
    pub overall_rating: BigDecimal,
    pub quality_rating: Option<BigDecimal>,
    pub communication_rating: Option<BigDecimal>,
    pub punctuality_rating: Option<BigDecimal>,
    pub value_rating: Option<BigDecimal>,
    pub title: Option<String>,
    pub comment: String,
    pub provider_response: Option<String>,
    pub provider_response_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl Review {
    pub fn has_provider_response(&self) -> bool {
        self.provider_response
            .as_deref()
            .map(|response| !response.trim().is_empty())
            .unwrap_or(false)
    }
}
