use serde::{Deserialize, Serialize};
use sqlx::types::BigDecimal;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::servicemodel::PricingType;

pub fn validate_positive_amount(amount: &BigDecimal) -> Result<(), ValidationError> {
    if amount <= &BigDecimal::from(0) {
        let mut error = ValidationError::new("invalid_amount");
        error.message = Some("Amount must be greater than 0".into());
        return Err(error);
    }
    Ok(())
}

#[derive(Validate, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateServiceDto {
    pub category_id: Uuid,

    #[validate(length(
        min = 5,
        max = 200,
        message = "Title must be between 5 and 200 characters"
    ))]
    pub title: String,

    #[validate(length(
        min = 20,
        max = 2000,
        message = "Description must be between 20 and 2000 characters"
    ))]
    pub description: String,

    #[validate(custom = "validate_positive_amount")]
    pub base_price: BigDecimal,

    pub pricing_type: PricingType,

    #[validate(length(max = 50, message = "Price unit must not exceed 50 characters"))]
    pub price_unit: Option<String>,

    #[validate(range(min = 1, message = "Estimated duration must be at least 1 minute"))]
    pub estimated_duration_minutes: Option<i32>,

    #[validate(length(max = 500, message = "Service area must not exceed 500 characters"))]
    pub service_area: Option<String>,

    pub is_available: Option<bool>,
}

#[derive(Serialize, Deserialize, Validate, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct SearchServicesQueryDto {
    pub q: Option<String>,
    pub category_id: Option<Uuid>,
    pub min_price: Option<BigDecimal>,
    pub max_price: Option<BigDecimal>,
    #[validate(range(min = 0.0, max = 5.0, message = "Minimum rating must be between 0 and 5"))]
    pub min_rating: Option<f64>,
    pub location: Option<String>,
    pub page: Option<u32>,
    #[validate(range(min = 1, max = 50))]
    pub size: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn positive_amounts_pass() {
        assert!(validate_positive_amount(&BigDecimal::from_str("0.01").unwrap()).is_ok());
        assert!(validate_positive_amount(&BigDecimal::from_str("100.00").unwrap()).is_ok());
    }

    #[test]
    fn zero_and_negative_amounts_fail() {
        assert!(validate_positive_amount(&BigDecimal::from_str("0").unwrap()).is_err());
        assert!(validate_positive_amount(&BigDecimal::from_str("-5.00").unwrap()).is_err());
    }

    #[test]
    fn create_service_rejects_short_title() {
        let dto = CreateServiceDto {
            category_id: Uuid::new_v4(),
            title: "AC".to_string(),
            description: "Professional air-conditioner servicing at home".to_string(),
            base_price: BigDecimal::from_str("499.00").unwrap(),
            pricing_type: PricingType::Fixed,
            price_unit: None,
            estimated_duration_minutes: None,
            service_area: None,
            is_available: None,
        };
        assert!(dto.validate().is_err());
    }
}
